use dcbor::{CBOR, CBORCase, Map};

use crate::{CurrencyRegistry, Error, Result, Worth};

const WORTH_KEY: &str = "worth";

/// Per-entity currency state, carried by characters and items alike.
///
/// Entities create it empty, save it with [`store`](CurrencyData::store),
/// restore it with [`from_document`](CurrencyData::from_document), and clone
/// it when they are duplicated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CurrencyData {
    pub worth: Worth,
}

impl CurrencyData {
    /// Wraps an existing worth.
    pub fn new(worth: Worth) -> Self { Self { worth } }

    /// Restores currency data saved by [`store`](CurrencyData::store). A
    /// document without a worth restores as empty.
    pub fn from_document(registry: &CurrencyRegistry, document: &CBOR) -> Result<Self> {
        let CBORCase::Map(map) = document.as_case() else {
            return Err(Error::MalformedDocument(
                "currency data is not a map".to_string(),
            ));
        };
        let worth = match map.get::<_, CBOR>(WORTH_KEY) {
            Some(worth) => Worth::from_document(registry, &worth)?,
            None => Worth::new(),
        };
        Ok(Self { worth })
    }

    /// Saves the worth under a `"worth"` key.
    pub fn store(&self) -> CBOR {
        let mut document = Map::new();
        document.insert(WORTH_KEY, self.worth.store());
        CBOR::from(document)
    }
}

/// Anything that carries a [`Worth`]: characters, items, prototypes.
///
/// Implementors only expose their [`CurrencyData`]; the accessors are
/// provided.
///
/// # Examples
///
/// ```
/// use currency_worth::{CurrencyData, CurrencyRegistry, WorthHolder};
///
/// #[derive(Default)]
/// struct Npc {
///     currency: CurrencyData,
/// }
///
/// impl WorthHolder for Npc {
///     fn currency_data(&self) -> &CurrencyData { &self.currency }
///     fn currency_data_mut(&mut self) -> &mut CurrencyData { &mut self.currency }
/// }
///
/// let registry = CurrencyRegistry::standard();
/// let mut npc = Npc::default();
/// npc.set_amount(&registry, "gold", 4);
/// npc.set_amount(&registry, "silver", 3);
/// assert_eq!(npc.get_amount(&registry, "gold"), 4);
/// assert_eq!(npc.get_amount(&registry, "money"), 430);
/// ```
pub trait WorthHolder {
    fn currency_data(&self) -> &CurrencyData;

    fn currency_data_mut(&mut self) -> &mut CurrencyData;

    fn worth(&self) -> &Worth { &self.currency_data().worth }

    fn set_worth(&mut self, worth: Worth) { self.currency_data_mut().worth = worth; }

    /// Replaces the worth from a raw mapping, failing with
    /// [`Error::InvalidWorthSpec`] if it is not one.
    fn set_worth_json(
        &mut self,
        registry: &CurrencyRegistry,
        spec: &serde_json::Value,
    ) -> Result<()> {
        let worth = Worth::from_json(registry, spec)?;
        self.set_worth(worth);
        Ok(())
    }

    /// Reads one denomination's count, or a currency's total in base units.
    fn get_amount(&self, registry: &CurrencyRegistry, denomination: &str) -> i128 {
        self.worth().lookup(denomination, registry)
    }

    /// Sets one denomination's count, leaving every other entry untouched.
    ///
    /// The change is applied as a delta against the current count, so
    /// setting the current value does nothing.
    fn set_amount(&mut self, registry: &CurrencyRegistry, denomination: &str, count: i128) {
        let delta = count.saturating_sub(self.get_amount(registry, denomination));
        if delta == 0 {
            return;
        }
        let worth = self.worth().add_counts(registry, [(denomination, delta)]);
        self.set_worth(worth);
    }
}

/// Reads `denomination` from `entity`. Used by editing tools.
pub fn get_denomination<E>(entity: &E, registry: &CurrencyRegistry, denomination: &str) -> i128
where
    E: WorthHolder + ?Sized,
{
    entity.get_amount(registry, denomination)
}

/// Sets `denomination` on `entity`. Used by editing tools.
pub fn set_denomination<E>(
    entity: &mut E,
    registry: &CurrencyRegistry,
    denomination: &str,
    count: i128,
) where
    E: WorthHolder + ?Sized,
{
    entity.set_amount(registry, denomination, count);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct Thing {
        currency: CurrencyData,
    }

    impl WorthHolder for Thing {
        fn currency_data(&self) -> &CurrencyData { &self.currency }
        fn currency_data_mut(&mut self) -> &mut CurrencyData { &mut self.currency }
    }

    fn thing(registry: &CurrencyRegistry, counts: &[(&str, i64)]) -> Thing {
        let mut thing = Thing::default();
        thing.set_worth(Worth::from_counts(registry, counts.iter().copied()));
        thing
    }

    #[test]
    fn test_set_to_current_value_is_noop() {
        let registry = CurrencyRegistry::standard();
        let mut t = thing(&registry, &[("gold", 2), ("silver", 7)]);
        let before = t.worth().clone();
        set_denomination(&mut t, &registry, "gold", 2);
        assert_eq!(t.worth(), &before);
    }

    #[test]
    fn test_set_changes_only_that_denomination() {
        let registry = CurrencyRegistry::standard();
        let mut t = thing(&registry, &[("gold", 2), ("silver", 7)]);
        set_denomination(&mut t, &registry, "gold", 5);
        assert_eq!(get_denomination(&t, &registry, "gold"), 5);
        assert_eq!(get_denomination(&t, &registry, "silver"), 7);
        assert_eq!(t.worth().len(), 2);

        set_denomination(&mut t, &registry, "silver", 0);
        assert_eq!(t.worth(), &Worth::from_counts(&registry, [("gold", 5)]));
    }

    #[test]
    fn test_set_across_the_whole_i64_range() {
        let registry = CurrencyRegistry::standard();
        let mut t = thing(&registry, &[("gold", i64::MIN)]);
        set_denomination(&mut t, &registry, "gold", i128::from(i64::MAX));
        assert_eq!(get_denomination(&t, &registry, "gold"), i128::from(i64::MAX));
        assert_eq!(t.worth().len(), 1);
    }

    #[test]
    fn test_set_unknown_denomination_is_ignored() {
        let registry = CurrencyRegistry::standard();
        let mut t = thing(&registry, &[("gold", 2)]);
        set_denomination(&mut t, &registry, "doubloon", 9);
        assert_eq!(t.worth(), &Worth::from_counts(&registry, [("gold", 2)]));
    }

    #[test]
    fn test_set_worth_json() {
        let registry = CurrencyRegistry::standard();
        let mut t = Thing::default();
        t.set_worth_json(&registry, &serde_json::json!({"platinum": 1}))
            .unwrap();
        assert_eq!(t.get_amount(&registry, "money"), 1000);

        let err = t
            .set_worth_json(&registry, &serde_json::json!(["platinum"]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidWorthSpec(_)));
        // A rejected spec leaves the old worth in place.
        assert_eq!(t.get_amount(&registry, "platinum"), 1);
    }

    #[test]
    fn test_currency_data_persistence() {
        let registry = CurrencyRegistry::standard();
        let t = thing(&registry, &[("gold", 2), ("experience", 300)]);
        let document = t.currency_data().store();
        let restored = CurrencyData::from_document(&registry, &document).unwrap();
        assert_eq!(&restored, t.currency_data());

        let empty = CurrencyData::from_document(&registry, &CBOR::from(Map::new()))
            .unwrap();
        assert!(empty.worth.is_empty());
    }

    #[test]
    fn test_clone_copies_worth() {
        let registry = CurrencyRegistry::standard();
        let original = thing(&registry, &[("gold", 2)]);
        let mut copy = original.clone();
        copy.set_amount(&registry, "gold", 9);
        assert_eq!(original.get_amount(&registry, "gold"), 2);
        assert_eq!(copy.get_amount(&registry, "gold"), 9);
    }
}
