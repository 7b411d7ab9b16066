use enumflags2::{bitflags, BitFlags};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::RecipeId;

pub type ItemId = u32;
pub type SkinId = u32;
pub type ColorId = u32;
/// id of an entry in `/v2/itemstats`
pub type ItemStatId = u32;

symbol!(
    /// `type` of an item
    pub enum ItemKind {
        Armor,
        Back,
        Bag,
        Consumable,
        Container,
        CraftingMaterial,
        Gathering,
        Gizmo,
        MiniPet,
        Tool,
        Trinket,
        Trophy,
        UpgradeComponent,
        Weapon,
    }
);

symbol!(
    /// `details.type` of a consumable item
    pub enum ConsumableKind {
        AppearanceChange,
        Booze,
        ContractNpc,
        Currency,
        Food,
        Generic,
        Halloween,
        Immediate,
        MountRandomUnlock,
        RandomUnlock,
        TeleportToFriend,
        Transmutation,
        Unlock,
        UpgradeRemoval,
        Utility,
    }
);

symbol!(
    /// `details.unlock_type` of an unlock consumable
    pub enum UnlockKind {
        BagSlot,
        BankTab,
        BuildLibrarySlot,
        BuildLoadoutTab,
        Champion,
        CollectibleCapacity,
        Content,
        CraftingRecipe,
        Dye,
        GearLoadoutTab,
        GliderSkin,
        JadeBotSkin,
        Minipet,
        Ms,
        Outfit,
        RandomUnlock,
        SharedSlot,
    }
);

symbol!(
    /// `details.type` of a container item
    pub enum ContainerKind {
        Default,
        GiftBox,
        Immediate,
        #[strum(serialize = "OpenUI")]
        OpenUi,
    }
);

symbol!(
    /// `details.type` of an upgrade component item
    pub enum UpgradeComponentKind {
        Default,
        Gem,
        Rune,
        Sigil,
    }
);

symbol!(
    pub enum Rarity {
        Junk,
        Basic,
        Fine,
        Masterwork,
        Rare,
        Exotic,
        Ascended,
        Legendary,
    }
);

symbol!(
    pub enum ArmorWeight {
        Heavy,
        Medium,
        Light,
        Clothing,
    }
);

symbol!(
    pub enum ArmorSlot {
        Boots,
        Coat,
        Gloves,
        Helm,
        HelmAquatic,
        Leggings,
        Shoulders,
    }
);

symbol!(
    pub enum WeaponKind {
        Axe,
        Dagger,
        Mace,
        Pistol,
        Scepter,
        Sword,
        Focus,
        Shield,
        Torch,
        Warhorn,
        Greatsword,
        Hammer,
        LongBow,
        Rifle,
        ShortBow,
        Staff,
        Harpoon,
        Speargun,
        Trident,
        LargeBundle,
        SmallBundle,
        Toy,
        ToyTwoHanded,
    }
);

symbol!(
    pub enum DamageType {
        Fire,
        Ice,
        Lightning,
        Physical,
        Choking,
    }
);

symbol!(
    pub enum TrinketKind {
        Accessory,
        Amulet,
        Ring,
    }
);

symbol!(
    pub enum GatheringKind {
        Foraging,
        Logging,
        Mining,
        Bait,
        Lure,
    }
);

symbol!(
    pub enum GizmoKind {
        Default,
        ContainerKey,
        RentableContractNpc,
        UnlimitedConsumable,
    }
);

symbol!(
    pub enum ToolKind {
        Salvage,
    }
);

symbol!(
    pub enum Attribute {
        AgonyResistance,
        BoonDuration,
        ConditionDamage,
        ConditionDuration,
        CritDamage,
        Healing,
        Power,
        Precision,
        Toughness,
        Vitality,
    }
);

#[bitflags]
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::EnumString)]
#[strum(ascii_case_insensitive)]
pub enum ItemFlag {
    AccountBindOnUse = 1 << 0,
    AccountBound = 1 << 1,
    Attuned = 1 << 2,
    BulkConsume = 1 << 3,
    DeleteWarning = 1 << 4,
    HideSuffix = 1 << 5,
    Infused = 1 << 6,
    MonsterOnly = 1 << 7,
    NoMysticForge = 1 << 8,
    NoSalvage = 1 << 9,
    NoSell = 1 << 10,
    NotUpgradeable = 1 << 11,
    NoUnderwater = 1 << 12,
    SoulbindOnAcquire = 1 << 13,
    SoulBindOnUse = 1 << 14,
    Tonic = 1 << 15,
    Unique = 1 << 16,
}

#[bitflags]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::EnumString)]
#[strum(ascii_case_insensitive)]
pub enum GameType {
    Activity = 1 << 0,
    Dungeon = 1 << 1,
    Pve = 1 << 2,
    Pvp = 1 << 3,
    PvpLobby = 1 << 4,
    Wvw = 1 << 5,
}

/// races, genders and professions an item is restricted to
#[bitflags]
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::EnumString)]
#[strum(ascii_case_insensitive)]
pub enum ItemRestriction {
    Asura = 1 << 0,
    Charr = 1 << 1,
    Female = 1 << 2,
    Human = 1 << 3,
    Norn = 1 << 4,
    Sylvari = 1 << 5,
    Elementalist = 1 << 6,
    Engineer = 1 << 7,
    Guardian = 1 << 8,
    Mesmer = 1 << 9,
    Necromancer = 1 << 10,
    Ranger = 1 << 11,
    Revenant = 1 << 12,
    Thief = 1 << 13,
    Warrior = 1 << 14,
}

#[bitflags]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::EnumString)]
#[strum(ascii_case_insensitive)]
pub enum InfusionFlag {
    Enrichment = 1 << 0,
    Infusion = 1 << 1,
}

/// equipment an upgrade component can be slotted into
#[bitflags]
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::EnumString)]
#[strum(ascii_case_insensitive)]
pub enum UpgradeComponentFlag {
    Axe = 1 << 0,
    Dagger = 1 << 1,
    Focus = 1 << 2,
    Greatsword = 1 << 3,
    Hammer = 1 << 4,
    Harpoon = 1 << 5,
    LongBow = 1 << 6,
    Mace = 1 << 7,
    Pistol = 1 << 8,
    Rifle = 1 << 9,
    Scepter = 1 << 10,
    Shield = 1 << 11,
    ShortBow = 1 << 12,
    Speargun = 1 << 13,
    Staff = 1 << 14,
    Sword = 1 << 15,
    Torch = 1 << 16,
    Trident = 1 << 17,
    Warhorn = 1 << 18,
    HeavyArmor = 1 << 19,
    MediumArmor = 1 << 20,
    LightArmor = 1 << 21,
    Trinket = 1 << 22,
}

#[derive(Debug, Clone, Serialize)]
pub struct Item {
    pub id: ItemId,
    pub kind: ItemKind,
    pub name: String,
    pub description: String,
    pub chat_link: String,
    pub icon: Option<Url>,
    pub rarity: Rarity,
    pub level: i32,
    pub vendor_value: i32,
    pub default_skin: Option<SkinId>,
    pub flags: BitFlags<ItemFlag>,
    pub game_types: BitFlags<GameType>,
    pub restrictions: BitFlags<ItemRestriction>,
    pub upgrades_into: Vec<ItemUpgrade>,
    pub upgrades_from: Vec<ItemUpgrade>,
    pub details: ItemDetails,
}

/// A mystic forge or infusion link between two items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemUpgrade {
    /// `Attunement` or `Infusion`
    pub upgrade: String,
    pub item_id: ItemId,
}

/// The kind specific part of an item. Every variant that has details points back to its item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ItemDetails {
    Armor(ArmorDetails),
    Back(BackDetails),
    Bag(BagDetails),
    Consumable(ConsumableDetails),
    Container(ContainerDetails),
    CraftingMaterial,
    Gathering(GatheringDetails),
    Gizmo(GizmoDetails),
    MiniPet(MiniPetDetails),
    Tool(ToolDetails),
    Trinket(TrinketDetails),
    Trophy,
    UpgradeComponent(UpgradeComponentDetails),
    Weapon(WeaponDetails),
    Unknown(UnknownItemDetails),
}

impl ItemDetails {
    /// the owning item, for every variant that carries details
    pub fn item_id(&self) -> Option<ItemId> {
        Some(match self {
            ItemDetails::Armor(details) => details.item_id,
            ItemDetails::Back(details) => details.item_id,
            ItemDetails::Bag(details) => details.item_id,
            ItemDetails::Consumable(details) => details.item_id,
            ItemDetails::Container(details) => details.item_id,
            ItemDetails::Gathering(details) => details.item_id,
            ItemDetails::Gizmo(details) => details.item_id,
            ItemDetails::MiniPet(details) => details.item_id,
            ItemDetails::Tool(details) => details.item_id,
            ItemDetails::Trinket(details) => details.item_id,
            ItemDetails::UpgradeComponent(details) => details.item_id,
            ItemDetails::Weapon(details) => details.item_id,
            ItemDetails::Unknown(details) => details.item_id,
            ItemDetails::CraftingMaterial | ItemDetails::Trophy => return None,
        })
    }
}

/// Upgrade slots shared by armor, backs, trinkets and weapons.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EquipmentUpgrades {
    pub infusion_slots: Vec<InfusionSlot>,
    pub attribute_adjustment: f64,
    pub infix_upgrade: Option<InfixUpgrade>,
    pub suffix_item_id: Option<ItemId>,
    pub secondary_suffix_item_id: Option<ItemId>,
    /// selectable itemstats, for items whose stats are chosen on acquisition
    pub stat_choices: Vec<ItemStatId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfusionSlot {
    pub flags: BitFlags<InfusionFlag>,
    /// the infusion already in the slot
    pub item_id: Option<ItemId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfixUpgrade {
    pub id: Option<ItemStatId>,
    pub attributes: Vec<InfixAttribute>,
    pub buff: Option<InfixBuff>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfixAttribute {
    pub attribute: Attribute,
    pub modifier: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfixBuff {
    pub skill_id: u32,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArmorDetails {
    pub item_id: ItemId,
    pub slot: ArmorSlot,
    pub weight: ArmorWeight,
    pub defense: i32,
    pub upgrades: EquipmentUpgrades,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackDetails {
    pub item_id: ItemId,
    pub upgrades: EquipmentUpgrades,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BagDetails {
    pub item_id: ItemId,
    pub size: i32,
    /// invisible bags keep their contents out of vendors and sorting
    pub no_sell_or_sort: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsumableDetails {
    pub item_id: ItemId,
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<Url>,
    pub duration_ms: Option<u64>,
    pub apply_count: Option<u32>,
    pub consumable: Consumable,
}

impl ConsumableDetails {
    pub fn kind(&self) -> ConsumableKind {
        self.consumable.kind()
    }
}

/// What consuming the item does.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Consumable {
    AppearanceChange,
    Booze,
    ContractNpc,
    Currency,
    Food,
    Generic { guild_upgrade_id: Option<u32> },
    Halloween,
    Immediate,
    MountRandomUnlock,
    RandomUnlock,
    TeleportToFriend,
    Transmutation { skins: Vec<SkinId> },
    Unlock(Unlock),
    UpgradeRemoval,
    Utility,
    Unknown,
}

impl Consumable {
    /// the variant of `kind` when its details carry nothing beyond the common fields
    pub fn plain(kind: ConsumableKind) -> Self {
        match kind {
            ConsumableKind::AppearanceChange => Consumable::AppearanceChange,
            ConsumableKind::Booze => Consumable::Booze,
            ConsumableKind::ContractNpc => Consumable::ContractNpc,
            ConsumableKind::Currency => Consumable::Currency,
            ConsumableKind::Food => Consumable::Food,
            ConsumableKind::Generic => Consumable::Generic {
                guild_upgrade_id: None,
            },
            ConsumableKind::Halloween => Consumable::Halloween,
            ConsumableKind::Immediate => Consumable::Immediate,
            ConsumableKind::MountRandomUnlock => Consumable::MountRandomUnlock,
            ConsumableKind::RandomUnlock => Consumable::RandomUnlock,
            ConsumableKind::TeleportToFriend => Consumable::TeleportToFriend,
            ConsumableKind::Transmutation => Consumable::Transmutation { skins: vec![] },
            ConsumableKind::Unlock => Consumable::Unlock(Unlock::Unknown),
            ConsumableKind::UpgradeRemoval => Consumable::UpgradeRemoval,
            ConsumableKind::Utility => Consumable::Utility,
            ConsumableKind::Unknown => Consumable::Unknown,
        }
    }

    pub fn kind(&self) -> ConsumableKind {
        match self {
            Consumable::AppearanceChange => ConsumableKind::AppearanceChange,
            Consumable::Booze => ConsumableKind::Booze,
            Consumable::ContractNpc => ConsumableKind::ContractNpc,
            Consumable::Currency => ConsumableKind::Currency,
            Consumable::Food => ConsumableKind::Food,
            Consumable::Generic { .. } => ConsumableKind::Generic,
            Consumable::Halloween => ConsumableKind::Halloween,
            Consumable::Immediate => ConsumableKind::Immediate,
            Consumable::MountRandomUnlock => ConsumableKind::MountRandomUnlock,
            Consumable::RandomUnlock => ConsumableKind::RandomUnlock,
            Consumable::TeleportToFriend => ConsumableKind::TeleportToFriend,
            Consumable::Transmutation { .. } => ConsumableKind::Transmutation,
            Consumable::Unlock(_) => ConsumableKind::Unlock,
            Consumable::UpgradeRemoval => ConsumableKind::UpgradeRemoval,
            Consumable::Utility => ConsumableKind::Utility,
            Consumable::Unknown => ConsumableKind::Unknown,
        }
    }
}

/// What an unlock consumable unlocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Unlock {
    BagSlot,
    BankTab,
    BuildLibrarySlot,
    BuildLoadoutTab,
    Champion,
    CollectibleCapacity,
    Content,
    CraftingRecipe {
        recipe_id: Option<RecipeId>,
        extra_recipe_ids: Vec<RecipeId>,
    },
    Dye {
        color_id: Option<ColorId>,
    },
    GearLoadoutTab,
    GliderSkin,
    JadeBotSkin,
    Minipet,
    Ms,
    Outfit,
    RandomUnlock,
    SharedSlot,
    Unknown,
}

impl Unlock {
    /// the variant of a kind that has no data of its own
    pub fn plain(kind: UnlockKind) -> Self {
        match kind {
            UnlockKind::BagSlot => Unlock::BagSlot,
            UnlockKind::BankTab => Unlock::BankTab,
            UnlockKind::BuildLibrarySlot => Unlock::BuildLibrarySlot,
            UnlockKind::BuildLoadoutTab => Unlock::BuildLoadoutTab,
            UnlockKind::Champion => Unlock::Champion,
            UnlockKind::CollectibleCapacity => Unlock::CollectibleCapacity,
            UnlockKind::Content => Unlock::Content,
            UnlockKind::CraftingRecipe => Unlock::CraftingRecipe {
                recipe_id: None,
                extra_recipe_ids: vec![],
            },
            UnlockKind::Dye => Unlock::Dye { color_id: None },
            UnlockKind::GearLoadoutTab => Unlock::GearLoadoutTab,
            UnlockKind::GliderSkin => Unlock::GliderSkin,
            UnlockKind::JadeBotSkin => Unlock::JadeBotSkin,
            UnlockKind::Minipet => Unlock::Minipet,
            UnlockKind::Ms => Unlock::Ms,
            UnlockKind::Outfit => Unlock::Outfit,
            UnlockKind::RandomUnlock => Unlock::RandomUnlock,
            UnlockKind::SharedSlot => Unlock::SharedSlot,
            UnlockKind::Unknown => Unlock::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerDetails {
    pub item_id: ItemId,
    pub kind: ContainerKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GatheringDetails {
    pub item_id: ItemId,
    pub kind: GatheringKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GizmoDetails {
    pub item_id: ItemId,
    pub kind: GizmoKind,
    pub guild_upgrade_id: Option<u32>,
    pub vendor_ids: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MiniPetDetails {
    pub item_id: ItemId,
    pub minipet_id: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDetails {
    pub item_id: ItemId,
    pub kind: ToolKind,
    pub charges: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrinketDetails {
    pub item_id: ItemId,
    pub kind: TrinketKind,
    pub upgrades: EquipmentUpgrades,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpgradeComponentDetails {
    pub item_id: ItemId,
    pub kind: UpgradeComponentKind,
    pub flags: BitFlags<UpgradeComponentFlag>,
    pub infusion_upgrade_flags: BitFlags<InfusionFlag>,
    pub suffix: String,
    pub infix_upgrade: Option<InfixUpgrade>,
    /// rune set bonuses, in the order they unlock
    pub bonuses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeaponDetails {
    pub item_id: ItemId,
    pub kind: WeaponKind,
    pub damage_type: DamageType,
    pub min_power: i32,
    pub max_power: i32,
    pub defense: i32,
    pub upgrades: EquipmentUpgrades,
}

/// Details of an item whose `type` isn't recognized, kept as they were on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnknownItemDetails {
    pub item_id: ItemId,
    /// the item's `type`, if it had one
    pub raw_kind: Option<String>,
    pub details: Value,
}
