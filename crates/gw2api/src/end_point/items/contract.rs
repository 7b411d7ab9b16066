//! Wire shapes of `/v2/items`. Every field the api may omit is optional here, the converters
//! decide on defaults.
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::convert::Scalar;
use crate::end_point::{NoDetails, RawObject};
use crate::model::{ItemId, ItemStatId};

/// Fields shared by every item, with `details` shaped by the item's `type`.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemFields<D> {
    pub id: ItemId,
    pub chat_link: Option<String>,
    pub name: Option<String>,
    pub icon: Option<Url>,
    pub description: Option<String>,
    pub rarity: Option<String>,
    pub level: Option<i32>,
    pub vendor_value: Option<i32>,
    pub default_skin: Option<u32>,
    pub flags: Option<Vec<String>>,
    pub game_types: Option<Vec<String>>,
    pub restrictions: Option<Vec<String>>,
    pub upgrades_into: Option<Vec<ItemUpgradeContract>>,
    pub upgrades_from: Option<Vec<ItemUpgradeContract>>,
    pub details: Option<D>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemUpgradeContract {
    pub upgrade: String,
    pub item_id: ItemId,
}

/// One variant per details shape. Consumable, container and upgrade component details are
/// polymorphic themselves and stay raw until their own family resolves them.
#[derive(Debug, Clone)]
pub enum ItemContract {
    Armor(ItemFields<ArmorDetailsContract>),
    Back(ItemFields<BackDetailsContract>),
    Bag(ItemFields<BagDetailsContract>),
    Consumable(ItemFields<RawObject>),
    Container(ItemFields<RawObject>),
    Gathering(ItemFields<KindDetailsContract>),
    Gizmo(ItemFields<GizmoDetailsContract>),
    MiniPet(ItemFields<MiniPetDetailsContract>),
    Tool(ItemFields<ToolDetailsContract>),
    Trinket(ItemFields<TrinketDetailsContract>),
    UpgradeComponent(ItemFields<RawObject>),
    Weapon(ItemFields<WeaponDetailsContract>),
    /// crafting materials and trophies
    Plain(ItemFields<NoDetails>),
    Unknown(ItemFields<Value>),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EquipmentUpgradesContract {
    pub infusion_slots: Option<Vec<InfusionSlotContract>>,
    pub attribute_adjustment: Option<f64>,
    pub infix_upgrade: Option<InfixUpgradeContract>,
    pub suffix_item_id: Option<Scalar>,
    /// an empty string when there's no second suffix
    pub secondary_suffix_item_id: Option<Scalar>,
    pub stat_choices: Option<Vec<ItemStatId>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InfusionSlotContract {
    pub flags: Option<Vec<String>>,
    pub item_id: Option<ItemId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InfixUpgradeContract {
    pub id: Option<ItemStatId>,
    pub attributes: Option<Vec<InfixAttributeContract>>,
    pub buff: Option<InfixBuffContract>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InfixAttributeContract {
    pub attribute: String,
    pub modifier: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InfixBuffContract {
    pub skill_id: u32,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArmorDetailsContract {
    #[serde(rename = "type")]
    pub slot: Option<String>,
    pub weight_class: Option<String>,
    pub defense: Option<i32>,
    #[serde(flatten)]
    pub upgrades: EquipmentUpgradesContract,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackDetailsContract {
    #[serde(flatten)]
    pub upgrades: EquipmentUpgradesContract,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BagDetailsContract {
    pub size: Option<i32>,
    pub no_sell_or_sort: Option<bool>,
}

/// details that only carry a `type`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KindDetailsContract {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GizmoDetailsContract {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub guild_upgrade_id: Option<u32>,
    pub vendor_ids: Option<Vec<u32>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MiniPetDetailsContract {
    pub minipet_id: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolDetailsContract {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub charges: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrinketDetailsContract {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(flatten)]
    pub upgrades: EquipmentUpgradesContract,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeaponDetailsContract {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub damage_type: Option<String>,
    pub min_power: Option<i32>,
    pub max_power: Option<i32>,
    pub defense: Option<i32>,
    #[serde(flatten)]
    pub upgrades: EquipmentUpgradesContract,
}

/// Fields every consumable may carry, next to the ones of its own kind.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsumableFields<X> {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<Url>,
    pub duration_ms: Option<u64>,
    pub apply_count: Option<u32>,
    #[serde(flatten)]
    pub extra: X,
}

/// Consumable details after `type` was resolved. Kinds without data of their own share
/// [ConsumableContract::Plain], the resolved kind tells them apart.
#[derive(Debug, Clone)]
pub enum ConsumableContract {
    Plain(ConsumableFields<NoDetails>),
    Generic(ConsumableFields<GenericConsumableContract>),
    Transmutation(ConsumableFields<TransmutationContract>),
    /// everything not bound by [ConsumableFields], `unlock_type` included
    Unlock(ConsumableFields<RawObject>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenericConsumableContract {
    pub guild_upgrade_id: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransmutationContract {
    pub skins: Option<Vec<u32>>,
}

/// Unlock consumable details after `unlock_type` was resolved.
#[derive(Debug, Clone)]
pub enum UnlockContract {
    Plain(NoDetails),
    CraftingRecipe(CraftingRecipeUnlockContract),
    Dye(DyeUnlockContract),
}

#[derive(Debug, Clone, Deserialize)]
pub struct CraftingRecipeUnlockContract {
    pub recipe_id: Option<u32>,
    pub extra_recipe_ids: Option<Vec<u32>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DyeUnlockContract {
    pub color_id: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpgradeComponentDetailsContract {
    pub flags: Option<Vec<String>>,
    pub infusion_upgrade_flags: Option<Vec<String>>,
    pub suffix: Option<String>,
    pub infix_upgrade: Option<InfixUpgradeContract>,
    pub bonuses: Option<Vec<String>>,
}
