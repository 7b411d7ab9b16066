//! The registry of every polymorphic family, built once and shared by reference.
use std::sync::OnceLock;

use strum::IntoEnumIterator;

use crate::discriminator::{MissingDiscriminator, Registry, Target};
use crate::end_point::events::LocationContract;
use crate::end_point::items::{
    ConsumableContract, ItemContract, UnlockContract, UpgradeComponentDetailsContract,
};
use crate::end_point::map_floor::PointOfInterestContract;
use crate::end_point::recipes::RecipeContract;
use crate::end_point::NoDetails;
use crate::model::{
    ConsumableKind, ContainerKind, ItemKind, LocationKind, PointOfInterestKind, RecipeKind,
    UnlockKind, UpgradeComponentKind,
};

/// Registers kinds that share one contract shape, naming each target `<Kind><suffix>`.
macro_rules! register_plain {
    ($registry: expr, $kind: ident, $suffix: literal, [$($variant: ident),+ $(,)?]) => {
        $registry
            $(.register(
                $kind::$variant,
                Target::plain(concat!(stringify!($variant), $suffix)),
            ))+
    };
}

/// Registers kinds whose contract is a variant of the family contract, naming each target
/// `<Kind><suffix>`.
macro_rules! register_wrapped {
    ($registry: expr, $kind: ident, $suffix: literal, [$($variant: ident => $wrap: expr),+ $(,)?]) => {
        $registry
            $(.register(
                $kind::$variant,
                Target::of(concat!(stringify!($variant), $suffix), $wrap),
            ))+
    };
}

pub type ItemRegistry = Registry<ItemKind, ItemContract>;
pub type ConsumableRegistry = Registry<ConsumableKind, ConsumableContract>;
pub type UnlockRegistry = Registry<UnlockKind, UnlockContract>;
pub type ContainerRegistry = Registry<ContainerKind, NoDetails>;
pub type UpgradeComponentRegistry = Registry<UpgradeComponentKind, UpgradeComponentDetailsContract>;
pub type RecipeRegistry = Registry<RecipeKind, RecipeContract>;
pub type LocationRegistry = Registry<LocationKind, LocationContract>;
pub type PointOfInterestRegistry = Registry<PointOfInterestKind, PointOfInterestContract>;

#[derive(Debug)]
pub struct Registries {
    pub items: ItemRegistry,
    pub consumables: ConsumableRegistry,
    pub unlocks: UnlockRegistry,
    pub containers: ContainerRegistry,
    pub upgrade_components: UpgradeComponentRegistry,
    pub recipes: RecipeRegistry,
    pub locations: LocationRegistry,
    pub points_of_interest: PointOfInterestRegistry,
}

impl Default for Registries {
    fn default() -> Self {
        Self::new()
    }
}

impl Registries {
    pub fn new() -> Self {
        Self {
            items: items(),
            consumables: consumables(),
            unlocks: unlocks(),
            containers: containers(),
            upgrade_components: upgrade_components(),
            recipes: recipes(),
            locations: locations(),
            points_of_interest: points_of_interest(),
        }
    }

    /// process wide instance, built on first use
    pub fn global() -> &'static Self {
        static REGISTRIES: OnceLock<Registries> = OnceLock::new();
        REGISTRIES.get_or_init(Registries::new)
    }
}

fn items() -> ItemRegistry {
    let registry = Registry::new(
        "ItemType",
        "type",
        Target::of("UnknownItem", ItemContract::Unknown),
    );
    register_wrapped!(registry, ItemKind, "Item", [
        Armor => ItemContract::Armor,
        Back => ItemContract::Back,
        Bag => ItemContract::Bag,
        Consumable => ItemContract::Consumable,
        Container => ItemContract::Container,
        CraftingMaterial => ItemContract::Plain,
        Gathering => ItemContract::Gathering,
        Gizmo => ItemContract::Gizmo,
        MiniPet => ItemContract::MiniPet,
        Tool => ItemContract::Tool,
        Trinket => ItemContract::Trinket,
        Trophy => ItemContract::Plain,
        UpgradeComponent => ItemContract::UpgradeComponent,
        Weapon => ItemContract::Weapon,
    ])
}

/// A consumable without `type` is almost always an error payload in disguise, so this family
/// refuses to guess.
fn consumables() -> ConsumableRegistry {
    let registry = Registry::new(
        "ConsumableType",
        "type",
        Target::of("UnknownConsumableDetails", ConsumableContract::Plain),
    )
    .on_missing(MissingDiscriminator::Fail);
    let registry = register_wrapped!(registry, ConsumableKind, "ConsumableDetails", [
        Generic => ConsumableContract::Generic,
        Transmutation => ConsumableContract::Transmutation,
        Unlock => ConsumableContract::Unlock,
    ]);
    register_wrapped!(registry, ConsumableKind, "ConsumableDetails", [
        AppearanceChange => ConsumableContract::Plain,
        Booze => ConsumableContract::Plain,
        ContractNpc => ConsumableContract::Plain,
        Currency => ConsumableContract::Plain,
        Food => ConsumableContract::Plain,
        Halloween => ConsumableContract::Plain,
        Immediate => ConsumableContract::Plain,
        MountRandomUnlock => ConsumableContract::Plain,
        RandomUnlock => ConsumableContract::Plain,
        TeleportToFriend => ConsumableContract::Plain,
        UpgradeRemoval => ConsumableContract::Plain,
        Utility => ConsumableContract::Plain,
    ])
}

fn unlocks() -> UnlockRegistry {
    let registry = Registry::new(
        "UnlockType",
        "unlock_type",
        Target::of("UnknownUnlock", UnlockContract::Plain),
    );
    let registry = register_wrapped!(registry, UnlockKind, "Unlock", [
        CraftingRecipe => UnlockContract::CraftingRecipe,
        Dye => UnlockContract::Dye,
    ]);
    register_wrapped!(registry, UnlockKind, "Unlock", [
        BagSlot => UnlockContract::Plain,
        BankTab => UnlockContract::Plain,
        BuildLibrarySlot => UnlockContract::Plain,
        BuildLoadoutTab => UnlockContract::Plain,
        Champion => UnlockContract::Plain,
        CollectibleCapacity => UnlockContract::Plain,
        Content => UnlockContract::Plain,
        GearLoadoutTab => UnlockContract::Plain,
        GliderSkin => UnlockContract::Plain,
        JadeBotSkin => UnlockContract::Plain,
        Minipet => UnlockContract::Plain,
        Ms => UnlockContract::Plain,
        Outfit => UnlockContract::Plain,
        RandomUnlock => UnlockContract::Plain,
        SharedSlot => UnlockContract::Plain,
    ])
}

fn containers() -> ContainerRegistry {
    let registry = Registry::new(
        "ContainerType",
        "type",
        Target::plain("UnknownContainerDetails"),
    );
    register_plain!(registry, ContainerKind, "ContainerDetails", [
        Default, GiftBox, Immediate, OpenUi,
    ])
}

fn upgrade_components() -> UpgradeComponentRegistry {
    let registry = Registry::new(
        "UpgradeComponentType",
        "type",
        Target::plain("UnknownUpgradeComponentDetails"),
    );
    register_plain!(registry, UpgradeComponentKind, "UpgradeComponentDetails", [
        Default, Gem, Rune, Sigil,
    ])
}

/// every recipe kind shares one shape, the kind only names the output
fn recipes() -> RecipeRegistry {
    RecipeKind::iter()
        .filter(|kind| *kind != RecipeKind::Unknown)
        .fold(
            Registry::new("RecipeType", "type", Target::plain("UnknownRecipe")),
            |registry, kind| registry.register(kind, Target::plain("Recipe")),
        )
}

fn locations() -> LocationRegistry {
    let registry = Registry::new(
        "LocationType",
        "type",
        Target::of("UnknownLocation", LocationContract::Unknown),
    );
    register_wrapped!(registry, LocationKind, "Location", [
        Sphere => LocationContract::Sphere,
        Cylinder => LocationContract::Cylinder,
        Polygon => LocationContract::Polygon,
    ])
}

fn points_of_interest() -> PointOfInterestRegistry {
    let registry = Registry::new(
        "PointOfInterestType",
        "type",
        Target::plain("UnknownPointOfInterest"),
    );
    register_plain!(registry, PointOfInterestKind, "PointOfInterest", [
        Landmark, Waypoint, Vista, Unlock,
    ])
}
