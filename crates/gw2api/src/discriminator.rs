//! Resolution of type-discriminated contracts.
//!
//! A json object whose shape depends on one of its fields (`type`, `unlock_type` ...) is resolved in
//! two steps: the discriminator is looked up in the family's [Registry], and the remaining fields are
//! structurally decoded into the [Target] found there. Unrecognized discriminators never fail, they
//! resolve to the family's unknown target.
use std::fmt::Debug;
use std::hash::Hash;
use std::str::FromStr;

use serde_json::{Map, Value};
use tracing::trace;

use crate::error::{ConversionError, Result};

mod registry;
pub use registry::{Registry, Target};

/// An enumerated discriminator value with a designated unknown variant.
///
/// [FromStr] is expected to be ascii case-insensitive and to never produce [Symbol::UNKNOWN].
pub trait Symbol: Copy + Eq + Hash + Debug + FromStr + Send + Sync + 'static {
    const UNKNOWN: Self;

    /// `None` if `raw` isn't one of the family's symbols
    fn from_symbol(raw: &str) -> Option<Self> {
        raw.parse().ok().filter(|symbol| *symbol != Self::UNKNOWN)
    }

    fn parse_or_unknown(raw: &str) -> Self {
        Self::from_symbol(raw).unwrap_or(Self::UNKNOWN)
    }

    fn from_optional(raw: Option<&str>) -> Self {
        raw.map(Self::parse_or_unknown).unwrap_or(Self::UNKNOWN)
    }
}

/// What to do when the discriminator field is absent (or `null`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingDiscriminator {
    /// same as an unrecognized value: the unknown target
    #[default]
    Unknown,
    /// abort with [ConversionError::MissingDiscriminator], carrying the upstream error text if any
    Fail,
}

/// A contract whose concrete shape has been fixed by its discriminator.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<K, C> {
    pub kind: K,
    /// name of the target the fields were decoded into
    pub target: &'static str,
    /// the discriminator as it was on the wire. `None` if the field was absent
    pub raw_discriminator: Option<String>,
    pub contract: C,
}

/// Resolves any json value. Anything but an object is a structural failure.
pub fn resolve<K: Symbol, C: 'static>(
    raw: Value,
    registry: &Registry<K, C>,
) -> Result<Resolved<K, C>> {
    match raw {
        Value::Object(fields) => resolve_object(fields, registry),
        other => Err(ConversionError::NotAnObject {
            family: registry.family(),
            found: json_kind(&other),
        }),
    }
}

pub fn resolve_object<K: Symbol, C: 'static>(
    mut fields: Map<String, Value>,
    registry: &Registry<K, C>,
) -> Result<Resolved<K, C>> {
    let raw_discriminator = match fields.get(registry.key()) {
        None | Some(Value::Null) => None,
        Some(Value::String(raw)) => Some(raw.clone()),
        // numbers, bools ... are present but can never name a symbol
        Some(other) => Some(other.to_string()),
    };
    let (kind, target) = match raw_discriminator.as_deref() {
        Some(raw) => registry.lookup(raw),
        None => match registry.missing_policy() {
            MissingDiscriminator::Unknown => (K::UNKNOWN, registry.unknown_target()),
            MissingDiscriminator::Fail => {
                return Err(ConversionError::MissingDiscriminator {
                    family: registry.family(),
                    key: registry.key(),
                    upstream: upstream_error_text(&fields),
                })
            }
        },
    };
    if kind == K::UNKNOWN {
        trace!(
            family = registry.family(),
            discriminator = ?raw_discriminator,
            target = target.name(),
            "falling back to unknown target"
        );
    }
    if !target.declares_discriminator() {
        fields.remove(registry.key());
    }
    let contract = target
        .decode(fields)
        .map_err(|source| ConversionError::Decode {
            family: registry.family(),
            target: target.name(),
            source,
        })?;
    Ok(Resolved {
        kind,
        target: target.name(),
        raw_discriminator,
        contract,
    })
}

/// error payloads look like `{"text": "no such id"}` (v2) or `{"error": 10, "text": "..."}` (v1)
fn upstream_error_text(fields: &Map<String, Value>) -> Option<String> {
    ["text", "error"]
        .into_iter()
        .find_map(|key| match fields.get(key)? {
            Value::String(text) => Some(text.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod test {
    use rstest::*;
    use serde::Deserialize;
    use serde_json::json;
    use similar_asserts::assert_eq;

    use super::*;
    use crate::end_point::items::{ConsumableContract, UnlockContract};
    use crate::families::Registries;
    use crate::model::{
        ConsumableKind, ContainerKind, LocationKind, PointOfInterestKind, RecipeKind, UnlockKind,
    };

    #[fixture]
    #[once]
    fn registries() -> Registries {
        Registries::new()
    }

    /// every family degrades to its unknown target instead of failing
    #[rstest]
    #[case(json!("Treasure"))]
    #[case(json!("gift box"))]
    #[case(json!(7))]
    #[case(json!(true))]
    #[case(json!(""))]
    #[case(json!("Unknown"))]
    fn unknown_discriminators_never_fail(registries: &Registries, #[case] discriminator: Value) {
        let raw = json!({"id": 1, "output_item_id": 2, "type": discriminator});

        let container = resolve(raw.clone(), &registries.containers).expect("container");
        assert_eq!(container.kind, ContainerKind::Unknown);
        assert_eq!(container.target, "UnknownContainerDetails");

        let recipe = resolve(raw.clone(), &registries.recipes).expect("recipe");
        assert_eq!(recipe.kind, RecipeKind::Unknown);

        let location = resolve(raw.clone(), &registries.locations).expect("location");
        assert_eq!(location.kind, LocationKind::Unknown);

        let poi = resolve(raw.clone(), &registries.points_of_interest).expect("poi");
        assert_eq!(poi.kind, PointOfInterestKind::Unknown);

        let consumable = resolve(raw.clone(), &registries.consumables).expect("consumable");
        assert_eq!(consumable.kind, ConsumableKind::Unknown);
        assert_eq!(consumable.target, "UnknownConsumableDetails");
        assert!(matches!(consumable.contract, ConsumableContract::Plain(_)));

        let item = resolve(raw, &registries.items).expect("item");
        assert_eq!(item.target, "UnknownItem");
    }

    #[rstest]
    fn raw_discriminator_is_reported(registries: &Registries) {
        let resolved = resolve(json!({"type": "Treasure"}), &registries.containers)
            .expect("unknown container");
        assert_eq!(resolved.raw_discriminator.as_deref(), Some("Treasure"));
        let resolved =
            resolve(json!({"type": 7}), &registries.containers).expect("unknown container");
        assert_eq!(resolved.raw_discriminator.as_deref(), Some("7"));
    }

    #[rstest]
    #[case("GiftBox")]
    #[case("giftbox")]
    #[case("GIFTBOX")]
    fn lookup_is_case_insensitive(registries: &Registries, #[case] raw: &str) {
        let resolved =
            resolve(json!({ "type": raw }), &registries.containers).expect("gift box container");
        assert_eq!(resolved.kind, ContainerKind::GiftBox);
        assert_eq!(resolved.target, "GiftBoxContainerDetails");
    }

    #[rstest]
    fn missing_container_type_is_unknown(registries: &Registries) {
        let resolved = resolve(json!({}), &registries.containers).expect("no type is not an error");
        assert_eq!(resolved.kind, ContainerKind::Unknown);
        assert_eq!(resolved.target, "UnknownContainerDetails");
        assert_eq!(resolved.raw_discriminator, None);

        let resolved =
            resolve(json!({"type": null}), &registries.containers).expect("null is absent");
        assert_eq!(resolved.kind, ContainerKind::Unknown);
    }

    #[rstest]
    fn missing_consumable_type_fails_with_upstream_text(registries: &Registries) {
        let error = resolve(json!({"text": "no such id"}), &registries.consumables)
            .expect_err("consumables require a type");
        match error {
            ConversionError::MissingDiscriminator {
                family,
                key,
                upstream,
            } => {
                assert_eq!(family, "ConsumableType");
                assert_eq!(key, "type");
                assert_eq!(upstream.as_deref(), Some("no such id"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let error = resolve(json!({"error": 10}), &registries.consumables)
            .expect_err("consumables require a type");
        assert!(matches!(
            error,
            ConversionError::MissingDiscriminator { upstream: Some(text), .. } if text == "10"
        ));

        let error = resolve(json!({}), &registries.consumables)
            .expect_err("consumables require a type");
        assert!(matches!(
            error,
            ConversionError::MissingDiscriminator { upstream: None, .. }
        ));
    }

    #[rstest]
    fn unlock_resolves_recursively(registries: &Registries) {
        let resolved = resolve(
            json!({"type": "Unlock", "unlock_type": "Dye", "color_id": 1246}),
            &registries.consumables,
        )
        .expect("unlock consumable");
        assert_eq!(resolved.target, "UnlockConsumableDetails");
        let ConsumableContract::Unlock(unlock) = resolved.contract else {
            panic!("expected an unlock contract");
        };
        // the outer discriminator is consumed, the nested one is still there
        assert!(!unlock.extra.contains_key("type"));
        assert!(unlock.extra.contains_key("unlock_type"));
        let nested = resolve_object(unlock.extra, &registries.unlocks).expect("dye unlock");
        assert_eq!(nested.kind, UnlockKind::Dye);
        assert_eq!(nested.target, "DyeUnlock");
        assert!(matches!(nested.contract, UnlockContract::Dye(dye) if dye.color_id == Some(1246)));
    }

    #[rstest]
    #[case(json!(null), "null")]
    #[case(json!([1, 2]), "an array")]
    #[case(json!("Armor"), "a string")]
    fn non_objects_are_structural_failures(
        registries: &Registries,
        #[case] raw: Value,
        #[case] expected: &str,
    ) {
        let error = resolve(raw, &registries.items).expect_err("not an object");
        assert!(
            matches!(error, ConversionError::NotAnObject { found, .. } if found == expected)
        );
    }

    #[rstest]
    fn bad_fields_are_decode_failures(registries: &Registries) {
        let error = resolve(
            json!({"type": "sphere", "radius": {"nested": true}}),
            &registries.locations,
        )
        .expect_err("radius must be a number");
        assert!(matches!(
            error,
            ConversionError::Decode {
                family: "LocationType",
                target: "SphereLocation",
                ..
            }
        ));
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Tagged {
        #[serde(rename = "type")]
        kind: Option<String>,
        value: u32,
    }

    #[rstest]
    fn discriminator_is_stripped_unless_declared() {
        let registry: Registry<ContainerKind, Tagged> =
            Registry::new("TestType", "type", Target::plain("Stripped"))
                .register(ContainerKind::Default, Target::plain("Stripped"))
                .register(
                    ContainerKind::GiftBox,
                    Target::plain("Declared").declaring_discriminator(),
                );
        let stripped = resolve(json!({"type": "Default", "value": 1}), &registry)
            .expect("stripped target");
        assert_eq!(
            stripped.contract,
            Tagged {
                kind: None,
                value: 1
            }
        );
        let declared = resolve(json!({"type": "GiftBox", "value": 2}), &registry)
            .expect("declared target");
        assert_eq!(
            declared.contract,
            Tagged {
                kind: Some("GiftBox".to_string()),
                value: 2
            }
        );
    }
}
