//! Domain entities produced by the entity converters.
//!
//! Entities with an identity (items, recipes, events, regions, maps, points of interest) compare and
//! hash by their id alone. Sub-objects point back to their owner by id (`item_id`, `map_id` ...),
//! never by reference.
//!
//! Optional collections are always materialized, an absent list on the wire becomes an empty `Vec`.

/// Declares a closed set of discriminator symbols with an extra `Unknown` variant.
///
/// Parsing is ascii case-insensitive and `Unknown` itself is never produced by
/// [crate::discriminator::Symbol::from_symbol].
macro_rules! symbol {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$variant_meta:meta])* $variant:ident),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Default,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            serde::Serialize,
            strum_macros::EnumString,
            strum_macros::EnumIter,
            strum_macros::IntoStaticStr,
        )]
        #[strum(ascii_case_insensitive)]
        $vis enum $name {
            $($(#[$variant_meta])* $variant,)+
            #[default]
            Unknown,
        }

        impl crate::discriminator::Symbol for $name {
            const UNKNOWN: Self = Self::Unknown;
        }
    };
}

mod event;
mod floor;
mod item;
mod recipe;

pub use event::*;
pub use floor::*;
pub use item::*;
pub use recipe::*;

/// implements id-only equality and hashing
macro_rules! identity {
    ($($entity:ty => $id:ident),+ $(,)?) => {
        $(
            impl PartialEq for $entity {
                fn eq(&self, other: &Self) -> bool {
                    self.$id == other.$id
                }
            }
            impl Eq for $entity {}
            impl std::hash::Hash for $entity {
                fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                    self.$id.hash(state);
                }
            }
        )+
    };
}

identity!(
    Item => id,
    Recipe => id,
    DynamicEvent => id,
    Region => id,
    MapDetails => id,
    PointOfInterest => id,
);
