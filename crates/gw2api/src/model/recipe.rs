use enumflags2::{bitflags, BitFlags};
use serde::Serialize;

use super::ItemId;

pub type RecipeId = u32;
pub type GuildUpgradeId = u32;

symbol!(
    /// `type` of a recipe, the kind of its output
    pub enum RecipeKind {
        Amulet,
        Axe,
        Backpack,
        Bag,
        Boots,
        Bulk,
        Coat,
        Component,
        Consumable,
        Dagger,
        Dessert,
        Dye,
        Earring,
        Feast,
        Focus,
        Food,
        Gloves,
        Greatsword,
        GuildConsumable,
        GuildConsumableWvw,
        GuildDecoration,
        Hammer,
        Harpoon,
        Helm,
        IngredientCooking,
        Inscription,
        Insignia,
        LegendaryComponent,
        Leggings,
        LongBow,
        Mace,
        Meal,
        Pistol,
        Potion,
        Refinement,
        RefinementEctoplasm,
        RefinementObsidian,
        Rifle,
        Ring,
        Scepter,
        Seasoning,
        Shield,
        ShortBow,
        Shoulders,
        Snack,
        Soup,
        Speargun,
        Staff,
        Sword,
        Torch,
        Trident,
        UpgradeComponent,
        Warhorn,
    }
);

symbol!(
    /// `type` of a recipe ingredient. ingredients without one are items
    pub enum IngredientKind {
        Item,
        Currency,
        GuildUpgrade,
    }
);

#[bitflags]
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Discipline {
    Armorsmith = 1 << 0,
    Artificer = 1 << 1,
    Chef = 1 << 2,
    Huntsman = 1 << 3,
    Jeweler = 1 << 4,
    Leatherworker = 1 << 5,
    Scribe = 1 << 6,
    Tailor = 1 << 7,
    Weaponsmith = 1 << 8,
}

#[bitflags]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::EnumString)]
#[strum(ascii_case_insensitive)]
pub enum RecipeFlag {
    AutoLearned = 1 << 0,
    LearnedFromItem = 1 << 1,
}

#[derive(Debug, Clone, Serialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub kind: RecipeKind,
    pub output_item_id: ItemId,
    pub output_item_count: u32,
    pub min_rating: u32,
    pub time_to_craft_ms: u32,
    pub disciplines: BitFlags<Discipline>,
    pub flags: BitFlags<RecipeFlag>,
    pub ingredients: Vec<Ingredient>,
    pub guild_ingredients: Vec<GuildIngredient>,
    /// guild recipes produce an upgrade instead of an item
    pub output_upgrade_id: Option<GuildUpgradeId>,
    pub chat_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ingredient {
    pub kind: IngredientKind,
    /// item, currency or guild upgrade id depending on `kind`
    pub id: u32,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuildIngredient {
    pub upgrade_id: GuildUpgradeId,
    pub count: u32,
}
