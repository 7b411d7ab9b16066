use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::{MissingDiscriminator, Symbol};

type Decoder<C> = Box<dyn Fn(Map<String, Value>) -> serde_json::Result<C> + Send + Sync>;

/// A concrete shape the remaining fields of a contract are decoded into.
pub struct Target<C> {
    name: &'static str,
    declares_discriminator: bool,
    decode: Decoder<C>,
}

impl<C: 'static> Target<C> {
    /// Decodes the fields structurally into `T` and wraps it into the family contract `C`.
    pub fn of<T, F>(name: &'static str, wrap: F) -> Self
    where
        T: DeserializeOwned,
        F: Fn(T) -> C + Send + Sync + 'static,
    {
        Self {
            name,
            declares_discriminator: false,
            decode: Box::new(move |fields| serde_json::from_value(Value::Object(fields)).map(&wrap)),
        }
    }

    /// Keeps the discriminator field in the object handed to the decoder.
    /// Only for shapes that bind the discriminator as a real field of their own.
    pub fn declaring_discriminator(mut self) -> Self {
        self.declares_discriminator = true;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn declares_discriminator(&self) -> bool {
        self.declares_discriminator
    }

    pub(crate) fn decode(&self, fields: Map<String, Value>) -> serde_json::Result<C> {
        (self.decode)(fields)
    }
}

impl<C: DeserializeOwned + 'static> Target<C> {
    /// For families where every kind shares one shape. The kind travels next to the contract.
    pub fn plain(name: &'static str) -> Self {
        Self::of(name, |contract: C| contract)
    }
}

impl<C> std::fmt::Debug for Target<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Target")
            .field("name", &self.name)
            .field("declares_discriminator", &self.declares_discriminator)
            .finish_non_exhaustive()
    }
}

/// Dispatch table of one polymorphic family: discriminator symbol -> target shape.
///
/// Built once and only read afterwards. Lookups never fail, anything unresolvable lands on the
/// unknown target.
#[derive(Debug)]
pub struct Registry<K, C> {
    family: &'static str,
    key: &'static str,
    missing: MissingDiscriminator,
    targets: IndexMap<K, Target<C>>,
    unknown: Target<C>,
}

impl<K: Symbol, C: 'static> Registry<K, C> {
    /// `key` is the json field holding the discriminator, eg: `type` or `unlock_type`.
    pub fn new(family: &'static str, key: &'static str, unknown: Target<C>) -> Self {
        Self {
            family,
            key,
            missing: MissingDiscriminator::Unknown,
            targets: IndexMap::new(),
            unknown,
        }
    }

    pub fn on_missing(mut self, policy: MissingDiscriminator) -> Self {
        self.missing = policy;
        self
    }

    /// Registering the same kind twice replaces the earlier target.
    pub fn register(mut self, kind: K, target: Target<C>) -> Self {
        debug_assert!(
            kind != K::UNKNOWN,
            "{}: the unknown kind is reserved for the fallback target",
            self.family
        );
        self.targets.insert(kind, target);
        self
    }

    pub fn family(&self) -> &'static str {
        self.family
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn missing_policy(&self) -> MissingDiscriminator {
        self.missing
    }

    pub fn unknown_target(&self) -> &Target<C> {
        &self.unknown
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// registered kinds in registration order
    pub fn kinds(&self) -> impl Iterator<Item = K> + '_ {
        self.targets.keys().copied()
    }

    /// Case-insensitive. A value that isn't a symbol of the family, or a symbol without a
    /// registered target, gives `(K::UNKNOWN, unknown target)`.
    pub fn lookup(&self, raw: &str) -> (K, &Target<C>) {
        K::from_symbol(raw)
            .and_then(|kind| self.targets.get(&kind).map(|target| (kind, target)))
            .unwrap_or((K::UNKNOWN, &self.unknown))
    }
}

#[cfg(test)]
mod test {
    use rstest::*;
    use similar_asserts::assert_eq;

    use super::*;
    use crate::model::ContainerKind;

    #[fixture]
    fn containers() -> Registry<ContainerKind, ()> {
        Registry::new("ContainerType", "type", Target::of("Unknown", |_: Value| ()))
            .register(ContainerKind::Default, Target::of("Default", |_: Value| ()))
            .register(ContainerKind::GiftBox, Target::of("GiftBox", |_: Value| ()))
    }

    #[rstest]
    #[case("GiftBox", ContainerKind::GiftBox, "GiftBox")]
    #[case("giftbox", ContainerKind::GiftBox, "GiftBox")]
    #[case("DEFAULT", ContainerKind::Default, "Default")]
    // a real symbol that simply isn't registered here
    #[case("OpenUI", ContainerKind::Unknown, "Unknown")]
    #[case("Treasure", ContainerKind::Unknown, "Unknown")]
    #[case("", ContainerKind::Unknown, "Unknown")]
    #[case("Unknown", ContainerKind::Unknown, "Unknown")]
    fn lookup_falls_back_to_unknown(
        containers: Registry<ContainerKind, ()>,
        #[case] raw: &str,
        #[case] kind: ContainerKind,
        #[case] target: &str,
    ) {
        let (found_kind, found_target) = containers.lookup(raw);
        assert_eq!(found_kind, kind);
        assert_eq!(found_target.name(), target);
    }

    #[rstest]
    fn registration_order_is_kept(containers: Registry<ContainerKind, ()>) {
        assert_eq!(
            containers.kinds().collect::<Vec<_>>(),
            vec![ContainerKind::Default, ContainerKind::GiftBox]
        );
        assert_eq!(containers.len(), 2);
        assert_eq!(containers.missing_policy(), MissingDiscriminator::Unknown);
    }
}
