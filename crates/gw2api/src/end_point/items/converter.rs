use serde_json::Value;

use super::contract::*;
use crate::convert::{collection, flags, optional_number};
use crate::discriminator::{resolve, resolve_object, Resolved, Symbol};
use crate::end_point::RawObject;
use crate::error::Result;
use crate::families::{
    ConsumableRegistry, ContainerRegistry, ItemRegistry, Registries, UnlockRegistry,
    UpgradeComponentRegistry,
};
use crate::model::*;

/// Unlock consumable details, resolved on `unlock_type`.
#[derive(Debug, Clone, Copy)]
pub struct UnlockConverter<'r> {
    unlocks: &'r UnlockRegistry,
}

impl<'r> UnlockConverter<'r> {
    pub fn new(unlocks: &'r UnlockRegistry) -> Self {
        Self { unlocks }
    }

    pub fn convert(&self, raw: RawObject) -> Result<Unlock> {
        let Resolved { kind, contract, .. } = resolve_object(raw, self.unlocks)?;
        Ok(match contract {
            UnlockContract::CraftingRecipe(recipe) => Unlock::CraftingRecipe {
                recipe_id: recipe.recipe_id,
                extra_recipe_ids: recipe.extra_recipe_ids.unwrap_or_default(),
            },
            UnlockContract::Dye(dye) => Unlock::Dye {
                color_id: dye.color_id,
            },
            UnlockContract::Plain(_) => Unlock::plain(kind),
        })
    }
}

/// Consumable details, resolved on `type`. Unlocks recurse into [UnlockConverter].
#[derive(Debug, Clone, Copy)]
pub struct ConsumableConverter<'r> {
    consumables: &'r ConsumableRegistry,
    unlocks: UnlockConverter<'r>,
}

impl<'r> ConsumableConverter<'r> {
    pub fn new(consumables: &'r ConsumableRegistry, unlocks: UnlockConverter<'r>) -> Self {
        Self {
            consumables,
            unlocks,
        }
    }

    pub fn convert(&self, item_id: ItemId, raw: RawObject) -> Result<ConsumableDetails> {
        let Resolved { kind, contract, .. } = resolve_object(raw, self.consumables)?;
        match contract {
            ConsumableContract::Plain(fields) => {
                consumable_details(item_id, fields, |_| Ok(Consumable::plain(kind)))
            }
            ConsumableContract::Generic(fields) => consumable_details(item_id, fields, |generic| {
                Ok(Consumable::Generic {
                    guild_upgrade_id: generic.guild_upgrade_id,
                })
            }),
            ConsumableContract::Transmutation(fields) => {
                consumable_details(item_id, fields, |transmutation| {
                    Ok(Consumable::Transmutation {
                        skins: transmutation.skins.unwrap_or_default(),
                    })
                })
            }
            ConsumableContract::Unlock(fields) => consumable_details(item_id, fields, |unlock| {
                self.unlocks.convert(unlock).map(Consumable::Unlock)
            }),
        }
    }
}

fn consumable_details<X>(
    item_id: ItemId,
    fields: ConsumableFields<X>,
    consumable: impl FnOnce(X) -> Result<Consumable>,
) -> Result<ConsumableDetails> {
    let ConsumableFields {
        name,
        description,
        icon,
        duration_ms,
        apply_count,
        extra,
    } = fields;
    Ok(ConsumableDetails {
        item_id,
        name,
        description,
        icon,
        duration_ms,
        apply_count,
        consumable: consumable(extra)?,
    })
}

/// Items of every kind. Details of consumables, containers and upgrade components are resolved
/// through their own families.
#[derive(Debug, Clone, Copy)]
pub struct ItemConverter<'r> {
    items: &'r ItemRegistry,
    consumables: ConsumableConverter<'r>,
    containers: &'r ContainerRegistry,
    upgrade_components: &'r UpgradeComponentRegistry,
}

impl<'r> ItemConverter<'r> {
    pub fn new(registries: &'r Registries) -> Self {
        Self {
            items: &registries.items,
            consumables: ConsumableConverter::new(
                &registries.consumables,
                UnlockConverter::new(&registries.unlocks),
            ),
            containers: &registries.containers,
            upgrade_components: &registries.upgrade_components,
        }
    }

    pub fn convert(&self, raw: Value) -> Result<Item> {
        let resolved = resolve(raw, self.items)?;
        self.convert_resolved(resolved)
    }

    pub fn convert_resolved(&self, resolved: Resolved<ItemKind, ItemContract>) -> Result<Item> {
        let Resolved {
            kind,
            raw_discriminator,
            contract,
            ..
        } = resolved;
        match contract {
            ItemContract::Armor(fields) => item(kind, fields, |item_id, armor| {
                Ok(ItemDetails::Armor(ArmorDetails {
                    item_id,
                    slot: ArmorSlot::from_optional(armor.slot.as_deref()),
                    weight: ArmorWeight::from_optional(armor.weight_class.as_deref()),
                    defense: armor.defense.unwrap_or_default(),
                    upgrades: equipment_upgrades(armor.upgrades)?,
                }))
            }),
            ItemContract::Back(fields) => item(kind, fields, |item_id, back| {
                Ok(ItemDetails::Back(BackDetails {
                    item_id,
                    upgrades: equipment_upgrades(back.upgrades)?,
                }))
            }),
            ItemContract::Bag(fields) => item(kind, fields, |item_id, bag| {
                Ok(ItemDetails::Bag(BagDetails {
                    item_id,
                    size: bag.size.unwrap_or_default(),
                    no_sell_or_sort: bag.no_sell_or_sort.unwrap_or_default(),
                }))
            }),
            ItemContract::Consumable(fields) => item(kind, fields, |item_id, details| {
                self.consumables
                    .convert(item_id, details)
                    .map(ItemDetails::Consumable)
            }),
            ItemContract::Container(fields) => item(kind, fields, |item_id, details| {
                let container = resolve_object(details, self.containers)?;
                Ok(ItemDetails::Container(ContainerDetails {
                    item_id,
                    kind: container.kind,
                }))
            }),
            ItemContract::Gathering(fields) => item(kind, fields, |item_id, gathering| {
                Ok(ItemDetails::Gathering(GatheringDetails {
                    item_id,
                    kind: GatheringKind::from_optional(gathering.kind.as_deref()),
                }))
            }),
            ItemContract::Gizmo(fields) => item(kind, fields, |item_id, gizmo| {
                Ok(ItemDetails::Gizmo(GizmoDetails {
                    item_id,
                    kind: GizmoKind::from_optional(gizmo.kind.as_deref()),
                    guild_upgrade_id: gizmo.guild_upgrade_id,
                    vendor_ids: gizmo.vendor_ids.unwrap_or_default(),
                }))
            }),
            ItemContract::MiniPet(fields) => item(kind, fields, |item_id, mini| {
                Ok(ItemDetails::MiniPet(MiniPetDetails {
                    item_id,
                    minipet_id: mini.minipet_id,
                }))
            }),
            ItemContract::Tool(fields) => item(kind, fields, |item_id, tool| {
                Ok(ItemDetails::Tool(ToolDetails {
                    item_id,
                    kind: ToolKind::from_optional(tool.kind.as_deref()),
                    charges: tool.charges.unwrap_or_default(),
                }))
            }),
            ItemContract::Trinket(fields) => item(kind, fields, |item_id, trinket| {
                Ok(ItemDetails::Trinket(TrinketDetails {
                    item_id,
                    kind: TrinketKind::from_optional(trinket.kind.as_deref()),
                    upgrades: equipment_upgrades(trinket.upgrades)?,
                }))
            }),
            ItemContract::UpgradeComponent(fields) => item(kind, fields, |item_id, details| {
                self.upgrade_component(item_id, details)
                    .map(ItemDetails::UpgradeComponent)
            }),
            ItemContract::Weapon(fields) => item(kind, fields, |item_id, weapon| {
                Ok(ItemDetails::Weapon(WeaponDetails {
                    item_id,
                    kind: WeaponKind::from_optional(weapon.kind.as_deref()),
                    damage_type: DamageType::from_optional(weapon.damage_type.as_deref()),
                    min_power: weapon.min_power.unwrap_or_default(),
                    max_power: weapon.max_power.unwrap_or_default(),
                    defense: weapon.defense.unwrap_or_default(),
                    upgrades: equipment_upgrades(weapon.upgrades)?,
                }))
            }),
            ItemContract::Plain(fields) => item(kind, fields, |_, _| {
                Ok(match kind {
                    ItemKind::Trophy => ItemDetails::Trophy,
                    _ => ItemDetails::CraftingMaterial,
                })
            }),
            ItemContract::Unknown(fields) => item(kind, fields, |item_id, details| {
                Ok(ItemDetails::Unknown(UnknownItemDetails {
                    item_id,
                    raw_kind: raw_discriminator,
                    details,
                }))
            }),
        }
    }

    fn upgrade_component(
        &self,
        item_id: ItemId,
        details: RawObject,
    ) -> Result<UpgradeComponentDetails> {
        let Resolved { kind, contract, .. } = resolve_object(details, self.upgrade_components)?;
        Ok(UpgradeComponentDetails {
            item_id,
            kind,
            flags: flags(contract.flags.as_deref()),
            infusion_upgrade_flags: flags(contract.infusion_upgrade_flags.as_deref()),
            suffix: contract.suffix.unwrap_or_default(),
            infix_upgrade: contract.infix_upgrade.map(infix_upgrade).transpose()?,
            bonuses: contract.bonuses.unwrap_or_default(),
        })
    }
}

/// Builds the details first, from nothing but the id of the item they belong to, then the item.
fn item<D: Default>(
    kind: ItemKind,
    fields: ItemFields<D>,
    details: impl FnOnce(ItemId, D) -> Result<ItemDetails>,
) -> Result<Item> {
    let ItemFields {
        id,
        chat_link,
        name,
        icon,
        description,
        rarity,
        level,
        vendor_value,
        default_skin,
        flags: item_flags,
        game_types,
        restrictions,
        upgrades_into,
        upgrades_from,
        details: raw_details,
    } = fields;
    let details = details(id, raw_details.unwrap_or_default())?;
    Ok(Item {
        id,
        kind,
        name: name.unwrap_or_default(),
        description: description.unwrap_or_default(),
        chat_link: chat_link.unwrap_or_default(),
        icon,
        rarity: Rarity::from_optional(rarity.as_deref()),
        level: level.unwrap_or_default(),
        vendor_value: vendor_value.unwrap_or_default(),
        default_skin,
        flags: flags(item_flags.as_deref()),
        game_types: flags(game_types.as_deref()),
        restrictions: flags(restrictions.as_deref()),
        upgrades_into: collection(upgrades_into, item_upgrade)?,
        upgrades_from: collection(upgrades_from, item_upgrade)?,
        details,
    })
}

fn item_upgrade(upgrade: ItemUpgradeContract) -> Result<ItemUpgrade> {
    Ok(ItemUpgrade {
        upgrade: upgrade.upgrade,
        item_id: upgrade.item_id,
    })
}

fn equipment_upgrades(upgrades: EquipmentUpgradesContract) -> Result<EquipmentUpgrades> {
    Ok(EquipmentUpgrades {
        infusion_slots: collection(upgrades.infusion_slots, |slot| {
            Ok(InfusionSlot {
                flags: flags(slot.flags.as_deref()),
                item_id: slot.item_id,
            })
        })?,
        attribute_adjustment: upgrades.attribute_adjustment.unwrap_or_default(),
        infix_upgrade: upgrades.infix_upgrade.map(infix_upgrade).transpose()?,
        suffix_item_id: optional_number(upgrades.suffix_item_id.as_ref())?,
        secondary_suffix_item_id: optional_number(upgrades.secondary_suffix_item_id.as_ref())?,
        stat_choices: upgrades.stat_choices.unwrap_or_default(),
    })
}

fn infix_upgrade(infix: InfixUpgradeContract) -> Result<InfixUpgrade> {
    Ok(InfixUpgrade {
        id: infix.id,
        attributes: collection(infix.attributes, |attribute| {
            Ok(InfixAttribute {
                attribute: Attribute::parse_or_unknown(&attribute.attribute),
                modifier: attribute.modifier,
            })
        })?,
        buff: infix.buff.map(|buff| InfixBuff {
            skill_id: buff.skill_id,
            description: buff.description.unwrap_or_default(),
        }),
    })
}

#[cfg(test)]
mod test {
    use enumflags2::BitFlags;
    use rstest::*;
    use serde_json::json;
    use similar_asserts::assert_eq;

    use super::*;
    use crate::error::ConversionError;

    const ITEMS_JSON: &str = include_str!("items.json");

    #[fixture]
    #[once]
    fn registries() -> Registries {
        Registries::new()
    }

    #[fixture]
    fn items(registries: &Registries) -> Vec<Item> {
        let raw: Vec<Value> = serde_json::from_str(ITEMS_JSON).expect("fixture is valid json");
        let converter = ItemConverter::new(registries);
        raw.into_iter()
            .map(|raw| converter.convert(raw).expect("fixture items convert"))
            .collect()
    }

    fn find(items: &[Item], id: ItemId) -> &Item {
        items
            .iter()
            .find(|item| item.id == id)
            .expect("item is in the fixture")
    }

    #[rstest]
    fn details_point_back_to_their_item(items: Vec<Item>) {
        assert_eq!(items.len(), 10);
        for item in &items {
            match item.details {
                ItemDetails::CraftingMaterial | ItemDetails::Trophy => {
                    assert_eq!(item.details.item_id(), None)
                }
                _ => assert_eq!(item.details.item_id(), Some(item.id), "{}", item.name),
            }
        }
    }

    #[rstest]
    fn armor(items: Vec<Item>) {
        let armor = find(&items, 11126);
        assert_eq!(armor.kind, ItemKind::Armor);
        assert_eq!(armor.rarity, Rarity::Exotic);
        assert_eq!(armor.default_skin, Some(88));
        assert_eq!(
            armor.flags,
            ItemFlag::HideSuffix | ItemFlag::NoSalvage | ItemFlag::SoulBindOnUse
        );
        assert_eq!(
            armor.game_types,
            GameType::Activity | GameType::Wvw | GameType::Dungeon | GameType::Pve
        );
        assert!(armor.icon.is_some());
        let ItemDetails::Armor(details) = &armor.details else {
            panic!("expected armor details, got {:?}", armor.details);
        };
        assert_eq!(details.slot, ArmorSlot::Helm);
        assert_eq!(details.weight, ArmorWeight::Medium);
        assert_eq!(details.defense, 102);
        assert_eq!(details.upgrades.suffix_item_id, Some(24836));
        // sent as an empty string
        assert_eq!(details.upgrades.secondary_suffix_item_id, None);
        let infix = details.upgrades.infix_upgrade.as_ref().expect("infix upgrade");
        assert_eq!(infix.id, Some(161));
        assert_eq!(
            infix
                .attributes
                .iter()
                .map(|attribute| (attribute.attribute, attribute.modifier))
                .collect::<Vec<_>>(),
            vec![
                (Attribute::Power, 63),
                (Attribute::Precision, 45),
                (Attribute::CritDamage, 45)
            ]
        );
        assert_eq!(details.upgrades.infusion_slots.len(), 1);
        assert_eq!(
            details.upgrades.infusion_slots[0].flags,
            BitFlags::from(InfusionFlag::Infusion)
        );
    }

    #[rstest]
    fn dye_unlock_resolves_through_two_families(items: Vec<Item>) {
        let dye = find(&items, 20370);
        let ItemDetails::Consumable(details) = &dye.details else {
            panic!("expected consumable details, got {:?}", dye.details);
        };
        assert_eq!(details.kind(), ConsumableKind::Unlock);
        assert_eq!(
            details.consumable,
            Consumable::Unlock(Unlock::Dye { color_id: Some(13) })
        );
    }

    #[rstest]
    fn food(items: Vec<Item>) {
        let food = find(&items, 12452);
        let ItemDetails::Consumable(details) = &food.details else {
            panic!("expected consumable details, got {:?}", food.details);
        };
        assert_eq!(details.consumable, Consumable::Food);
        assert_eq!(details.duration_ms, Some(1_800_000));
        assert_eq!(details.apply_count, Some(1));
        assert_eq!(details.name.as_deref(), Some("Nourishment"));
        assert_eq!(food.flags, BitFlags::empty());
    }

    #[rstest]
    #[case(68318, ContainerKind::GiftBox)]
    #[case(70001, ContainerKind::Unknown)]
    fn containers(items: Vec<Item>, #[case] id: ItemId, #[case] kind: ContainerKind) {
        let container = find(&items, id);
        assert_eq!(
            container.details,
            ItemDetails::Container(ContainerDetails { item_id: id, kind })
        );
    }

    #[rstest]
    fn absent_collections_are_empty(items: Vec<Item>) {
        let ecto = find(&items, 19721);
        assert_eq!(ecto.details, ItemDetails::CraftingMaterial);
        assert_eq!(ecto.flags, BitFlags::empty());
        assert_eq!(ecto.game_types, BitFlags::empty());
        assert_eq!(ecto.restrictions, BitFlags::empty());
        assert!(ecto.upgrades_into.is_empty());
        assert!(ecto.upgrades_from.is_empty());
        assert_eq!(ecto.description, "");
        assert_eq!(ecto.icon, None);
    }

    #[rstest]
    fn rune(items: Vec<Item>) {
        let rune = find(&items, 24836);
        let ItemDetails::UpgradeComponent(details) = &rune.details else {
            panic!("expected upgrade component details, got {:?}", rune.details);
        };
        assert_eq!(details.kind, UpgradeComponentKind::Rune);
        assert_eq!(
            details.flags,
            UpgradeComponentFlag::HeavyArmor
                | UpgradeComponentFlag::MediumArmor
                | UpgradeComponentFlag::LightArmor
        );
        assert_eq!(details.infusion_upgrade_flags, BitFlags::empty());
        assert_eq!(details.suffix, "of the Scholar");
        assert_eq!(details.bonuses.len(), 6);
        assert_eq!(details.bonuses[5], "+5% Damage while health is above 90%");
        assert_eq!(details.infix_upgrade, None);
    }

    #[rstest]
    fn weapon(items: Vec<Item>) {
        let weapon = find(&items, 46774);
        assert_eq!(
            weapon.upgrades_into,
            vec![ItemUpgrade {
                upgrade: "Infusion".to_string(),
                item_id: 46775
            }]
        );
        let ItemDetails::Weapon(details) = &weapon.details else {
            panic!("expected weapon details, got {:?}", weapon.details);
        };
        assert_eq!(details.kind, WeaponKind::Scepter);
        assert_eq!(details.damage_type, DamageType::Lightning);
        assert_eq!((details.min_power, details.max_power), (1000, 1100));
        assert_eq!(details.upgrades.stat_choices, vec![161, 155]);
        assert_eq!(details.upgrades.infusion_slots[0].item_id, Some(49432));
        assert_eq!(details.upgrades.infix_upgrade, None);
    }

    #[rstest]
    fn bag(items: Vec<Item>) {
        assert_eq!(
            find(&items, 9594).details,
            ItemDetails::Bag(BagDetails {
                item_id: 9594,
                size: 20,
                no_sell_or_sort: true
            })
        );
    }

    #[rstest]
    fn unknown_item_keeps_its_raw_details(items: Vec<Item>) {
        let relic = find(&items, 100916);
        assert_eq!(relic.kind, ItemKind::Unknown);
        assert_eq!(relic.flags, ItemFlag::AccountBound | ItemFlag::Unique);
        assert_eq!(
            relic.details,
            ItemDetails::Unknown(UnknownItemDetails {
                item_id: 100916,
                raw_kind: Some("Relic".to_string()),
                details: json!({"relic_id": 12}),
            })
        );
    }

    #[rstest]
    fn consumable_without_type_fails(registries: &Registries) {
        let raw = json!({
            "id": 1,
            "type": "Consumable",
            "details": {"text": "details unavailable"}
        });
        let error = ItemConverter::new(registries)
            .convert(raw)
            .expect_err("consumable details need a type");
        assert!(matches!(
            error,
            ConversionError::MissingDiscriminator {
                family: "ConsumableType",
                upstream: Some(text),
                ..
            } if text == "details unavailable"
        ));
    }

    #[rstest]
    fn consumable_without_details_fails(registries: &Registries) {
        let raw = json!({"id": 1, "type": "Consumable"});
        assert!(ItemConverter::new(registries).convert(raw).is_err());
    }

    #[rstest]
    fn container_without_details_is_unknown(registries: &Registries) {
        let item = ItemConverter::new(registries)
            .convert(json!({"id": 2, "type": "Container"}))
            .expect("containers fall back to unknown");
        assert_eq!(
            item.details,
            ItemDetails::Container(ContainerDetails {
                item_id: 2,
                kind: ContainerKind::Unknown
            })
        );
    }

    #[rstest]
    fn invalid_suffix_id_fails(registries: &Registries) {
        let raw = json!({
            "id": 3,
            "type": "Back",
            "details": {"suffix_item_id": "not a number"}
        });
        let error = ItemConverter::new(registries)
            .convert(raw)
            .expect_err("suffix must be numeric");
        assert!(matches!(error, ConversionError::InvalidNumber { .. }));
    }

    #[rstest]
    #[case(json!({"unlock_type": "CraftingRecipe", "recipe_id": 7, "extra_recipe_ids": [8, 9]}),
        Unlock::CraftingRecipe { recipe_id: Some(7), extra_recipe_ids: vec![8, 9] })]
    #[case(json!({"unlock_type": "CraftingRecipe", "recipe_id": 7}),
        Unlock::CraftingRecipe { recipe_id: Some(7), extra_recipe_ids: vec![] })]
    #[case(json!({"unlock_type": "BagSlot"}), Unlock::BagSlot)]
    #[case(json!({"unlock_type": "Hat"}), Unlock::Unknown)]
    #[case(json!({}), Unlock::Unknown)]
    fn unlocks(registries: &Registries, #[case] raw: Value, #[case] expected: Unlock) {
        let Value::Object(raw) = raw else {
            panic!("case is an object");
        };
        let unlock = UnlockConverter::new(&registries.unlocks)
            .convert(raw)
            .expect("unlocks never fail on their discriminator");
        assert_eq!(unlock, expected);
    }

    #[rstest]
    #[case("Transmutation", json!({"skins": [1, 2]}), Consumable::Transmutation { skins: vec![1, 2] })]
    #[case("Transmutation", json!({}), Consumable::Transmutation { skins: vec![] })]
    #[case("Generic", json!({"guild_upgrade_id": 44}), Consumable::Generic { guild_upgrade_id: Some(44) })]
    #[case("booze", json!({}), Consumable::Booze)]
    #[case("Mystery", json!({}), Consumable::Unknown)]
    fn consumables(
        registries: &Registries,
        #[case] kind: &str,
        #[case] extra: Value,
        #[case] expected: Consumable,
    ) {
        let Value::Object(mut raw) = extra else {
            panic!("case is an object");
        };
        raw.insert("type".to_string(), Value::String(kind.to_string()));
        let converter = ConsumableConverter::new(
            &registries.consumables,
            UnlockConverter::new(&registries.unlocks),
        );
        let details = converter.convert(5, raw).expect("known shape");
        assert_eq!(details.item_id, 5);
        assert_eq!(details.consumable, expected);
    }
}
