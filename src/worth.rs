use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, Sub};

use dcbor::{CBOR, CBORCase, Map};
use serde_json::Number;

use crate::{CurrencyRegistry, Error, Result};

const PAIRS_KEY: &str = "pairs";
const DENOMINATION_KEY: &str = "denomination";
const VALUE_KEY: &str = "value";

/// A collection of denomination counts: an amount of one or more
/// currencies.
///
/// A `Worth` only ever holds names known to the [`CurrencyRegistry`] it was
/// built against, and never holds a zero count. Counts may be negative, which
/// is how debts are carried through arithmetic before they net out.
///
/// Worths are values: arithmetic returns a new `Worth` and never changes its
/// operands. Mixed denominations of one currency are kept apart until
/// [`normalize`](Worth::normalize) reduces them to the currency's base unit.
///
/// Counts are held as `i128`, so converting any `i64` amount to base units
/// and adding such amounts together is exact.
///
/// Comparison is only a partial order within a shared currency. Two worths in
/// unrelated currencies are neither equal, greater nor less than each other,
/// which is why `Worth` does not implement `PartialOrd`. Its `PartialEq` is
/// structural (same stored counts); use [`is_equal_worth`] to compare values.
///
/// [`is_equal_worth`]: Worth::is_equal_worth
///
/// # Examples
///
/// ```
/// use currency_worth::{CurrencyRegistry, Worth};
///
/// let registry = CurrencyRegistry::standard();
///
/// let purse = Worth::from_counts(&registry, [("gold", 1), ("silver", 5)]);
/// let price = Worth::from_counts(&registry, [("copper", 120)]);
///
/// assert_eq!(purse.normalize(&registry).get("copper"), 150);
/// assert!(purse.is_greater_worth(&price, &registry));
///
/// let change = &purse - &price;
/// assert_eq!(change.display_with(&registry).to_string(), "-120 cp, 1 gp, 5 sp");
/// assert_eq!(change.lookup("money", &registry), 30);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Worth {
    values: BTreeMap<String, i128>,
}

/// The outcome of comparing two worths.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorthComparison {
    Less,
    Equal,
    Greater,
    /// Neither side dominates, e.g. the worths hold different currencies.
    Incomparable,
}

impl Worth {
    /// Creates an empty worth.
    pub fn new() -> Self { Self::default() }

    /// Builds a worth from denomination counts.
    ///
    /// Zero counts and names the registry does not know are dropped. Repeated
    /// names are summed.
    pub fn from_counts<K, C, I>(registry: &CurrencyRegistry, counts: I) -> Self
    where
        K: AsRef<str>,
        C: Into<i128>,
        I: IntoIterator<Item = (K, C)>,
    {
        let mut values = BTreeMap::new();
        for (name, count) in counts {
            let name = name.as_ref();
            if !registry.contains_denomination(name) {
                tracing::trace!("Dropping unknown denomination {}", name);
                continue;
            }
            let entry = values.entry(name.to_string()).or_insert(0i128);
            *entry = entry.saturating_add(count.into());
        }
        Self::from_values(values)
    }

    /// Builds a worth from an untyped raw mapping, such as a prototype's
    /// `{"gold": 3, "silver": 2}`.
    ///
    /// Fails with [`Error::InvalidWorthSpec`] unless `spec` is an object whose
    /// values are all integers. Unknown names and zero counts are dropped
    /// without error.
    ///
    /// # Examples
    ///
    /// ```
    /// use currency_worth::{CurrencyRegistry, Error, Worth};
    /// use serde_json::json;
    ///
    /// let registry = CurrencyRegistry::standard();
    ///
    /// let worth = Worth::from_json(&registry, &json!({"gold": 3, "doubloon": 9}))
    ///     .unwrap();
    /// assert_eq!(worth.len(), 1);
    ///
    /// let err = Worth::from_json(&registry, &json!({"gold": "five"})).unwrap_err();
    /// assert!(matches!(err, Error::InvalidWorthSpec(_)));
    /// ```
    pub fn from_json(
        registry: &CurrencyRegistry,
        spec: &serde_json::Value,
    ) -> Result<Self> {
        let object = spec.as_object().ok_or_else(|| {
            Error::InvalidWorthSpec(format!("expected a mapping, found {}", spec))
        })?;
        let mut counts = Vec::with_capacity(object.len());
        for (name, count) in object {
            let count = count.as_number().and_then(Number::as_i128).ok_or_else(|| {
                Error::InvalidWorthSpec(format!(
                    "count for {} is not an integer: {}",
                    name, count
                ))
            })?;
            counts.push((name.as_str(), count));
        }
        Ok(Self::from_counts(registry, counts))
    }

    /// Restores a worth from the document produced by [`store`].
    ///
    /// Denominations no longer in the registry are dropped, so saves survive
    /// changes to the registered set. A document without pairs restores as
    /// an empty worth.
    ///
    /// [`store`]: Worth::store
    pub fn from_document(registry: &CurrencyRegistry, document: &CBOR) -> Result<Self> {
        let CBORCase::Map(map) = document.as_case() else {
            return Err(Error::MalformedDocument(
                "worth document is not a map".to_string(),
            ));
        };
        let Some(pairs) = map.get::<_, CBOR>(PAIRS_KEY) else {
            return Ok(Self::new());
        };
        let CBORCase::Array(pairs) = pairs.as_case() else {
            return Err(Error::MalformedDocument(
                "worth pairs are not a list".to_string(),
            ));
        };

        let mut counts = Vec::with_capacity(pairs.len());
        for pair in pairs {
            let CBORCase::Map(pair) = pair.as_case() else {
                return Err(Error::MalformedDocument(
                    "worth pair is not a map".to_string(),
                ));
            };
            let name: String = pair.get(DENOMINATION_KEY).ok_or_else(|| {
                Error::MalformedDocument("worth pair has no denomination".to_string())
            })?;
            let count = pair
                .get::<_, CBOR>(VALUE_KEY)
                .as_ref()
                .and_then(count_from_cbor)
                .ok_or_else(|| {
                    Error::MalformedDocument(format!(
                        "worth pair {} has no integer value",
                        name
                    ))
                })?;
            counts.push((name, count));
        }
        Ok(Self::from_counts(registry, counts))
    }

    /// Decodes a worth from CBOR bytes written by [`to_cbor_data`].
    ///
    /// [`to_cbor_data`]: Worth::to_cbor_data
    pub fn from_cbor_data(
        registry: &CurrencyRegistry,
        data: impl AsRef<[u8]>,
    ) -> Result<Self> {
        let document = CBOR::try_from_data(data)?;
        Self::from_document(registry, &document)
    }

    fn from_values(mut values: BTreeMap<String, i128>) -> Self {
        values.retain(|_, count| *count != 0);
        Self { values }
    }

    /// The number of distinct denominations held, before normalization.
    pub fn len(&self) -> usize { self.values.len() }

    /// Whether no denomination is held.
    pub fn is_empty(&self) -> bool { self.values.is_empty() }

    /// The stored count of one denomination, or 0.
    pub fn get(&self, denomination: &str) -> i128 {
        self.values.get(denomination).copied().unwrap_or(0)
    }

    /// Looks up a denomination or a currency.
    ///
    /// For a denomination, returns the stored count. For a currency name
    /// that is not also a denomination, returns the currency's total in base
    /// units. Anything else is 0.
    pub fn lookup(&self, key: &str, registry: &CurrencyRegistry) -> i128 {
        if let Some(count) = self.values.get(key) {
            return *count;
        }
        if registry.contains_denomination(key) {
            return 0;
        }
        match registry.base_denomination(key) {
            Some(base) => self.normalize(registry).get(base.name()),
            None => 0,
        }
    }

    /// Iterates over `(denomination, count)` in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i128)> {
        self.values.iter().map(|(name, count)| (name.as_str(), *count))
    }

    /// Reduces every denomination to its currency's base unit, leaving one
    /// entry per currency.
    ///
    /// Currencies that total zero disappear. Entries of a currency without a
    /// registered base cannot be reduced and are carried over unchanged.
    pub fn normalize(&self, registry: &CurrencyRegistry) -> Worth {
        let mut bases: BTreeMap<String, i128> = BTreeMap::new();
        for (name, count) in &self.values {
            let Some(denomination) = registry.denomination_named(name) else {
                continue;
            };
            let (base_name, units) =
                match registry.base_denomination(denomination.currency()) {
                    Some(base) => (base.name(), denomination.base_units(*count)),
                    None => {
                        tracing::warn!(
                            "Currency {} has no base denomination; {} left unreduced",
                            denomination.currency(),
                            name
                        );
                        (name.as_str(), *count)
                    }
                };
            let total = bases.entry(base_name.to_string()).or_insert(0);
            *total = total.saturating_add(units);
        }
        Self::from_values(bases)
    }

    /// Whether both worths reduce to the same amounts of the same
    /// currencies.
    pub fn is_equal_worth(&self, other: &Worth, registry: &CurrencyRegistry) -> bool {
        let lhs = self.normalize(registry);
        let rhs = other.normalize(registry);
        lhs == rhs
    }

    /// Whether this worth holds strictly more of every currency `other`
    /// holds.
    ///
    /// Against an empty worth this is always true, including when `self` is
    /// empty too.
    pub fn is_greater_worth(&self, other: &Worth, registry: &CurrencyRegistry) -> bool {
        Self::dominates(&self.normalize(registry), &other.normalize(registry))
    }

    /// Whether `other` holds strictly more of every currency this worth
    /// holds. The mirror image of [`is_greater_worth`].
    ///
    /// [`is_greater_worth`]: Worth::is_greater_worth
    pub fn is_less_worth(&self, other: &Worth, registry: &CurrencyRegistry) -> bool {
        Self::dominates(&other.normalize(registry), &self.normalize(registry))
    }

    /// Whether this worth is greater than or equal to `other`.
    pub fn is_greater_or_equal_worth(
        &self,
        other: &Worth,
        registry: &CurrencyRegistry,
    ) -> bool {
        self.is_greater_worth(other, registry) || self.is_equal_worth(other, registry)
    }

    /// Whether this worth is less than or equal to `other`.
    pub fn is_less_or_equal_worth(
        &self,
        other: &Worth,
        registry: &CurrencyRegistry,
    ) -> bool {
        self.is_less_worth(other, registry) || self.is_equal_worth(other, registry)
    }

    /// Compares two worths, reporting `Incomparable` when no relation holds.
    ///
    /// Equality is checked first, so two empty worths are `Equal`.
    pub fn compare_worth(
        &self,
        other: &Worth,
        registry: &CurrencyRegistry,
    ) -> WorthComparison {
        let lhs = self.normalize(registry);
        let rhs = other.normalize(registry);
        if lhs == rhs {
            WorthComparison::Equal
        } else if Self::dominates(&lhs, &rhs) {
            WorthComparison::Greater
        } else if Self::dominates(&rhs, &lhs) {
            WorthComparison::Less
        } else {
            WorthComparison::Incomparable
        }
    }

    /// `big` has no fewer entries than `small` and a strictly greater count
    /// for every entry of `small`. Both sides must already be normalized.
    fn dominates(big: &Worth, small: &Worth) -> bool {
        if small.len() > big.len() {
            return false;
        }
        small.values.iter().all(|(name, count)| {
            big.values.get(name).is_some_and(|held| held > count)
        })
    }

    /// Adds raw counts to this worth. Unknown names are dropped.
    pub fn add_counts<K, C, I>(&self, registry: &CurrencyRegistry, counts: I) -> Worth
    where
        K: AsRef<str>,
        C: Into<i128>,
        I: IntoIterator<Item = (K, C)>,
    {
        self + &Worth::from_counts(registry, counts)
    }

    /// Subtracts raw counts from this worth. Unknown names are dropped.
    pub fn subtract_counts<K, C, I>(
        &self,
        registry: &CurrencyRegistry,
        counts: I,
    ) -> Worth
    where
        K: AsRef<str>,
        C: Into<i128>,
        I: IntoIterator<Item = (K, C)>,
    {
        self - &Worth::from_counts(registry, counts)
    }

    fn combine(&self, other: &Worth, op: fn(i128, i128) -> i128) -> Worth {
        let mut values = self.values.clone();
        for (name, count) in &other.values {
            let entry = values.entry(name.clone()).or_insert(0);
            *entry = op(*entry, *count);
        }
        Self::from_values(values)
    }

    /// Formats the worth using each denomination's shorthand.
    ///
    /// # Examples
    ///
    /// ```
    /// use currency_worth::{CurrencyRegistry, Worth};
    ///
    /// let registry = CurrencyRegistry::standard();
    /// let worth = Worth::from_counts(&registry, [("gold", 2), ("questpoints", 7)]);
    /// assert_eq!(worth.display_with(&registry).to_string(), "2 gp, 7 qp");
    /// assert_eq!(Worth::new().display_with(&registry).to_string(), "0");
    /// ```
    pub fn display_with<'a>(&'a self, registry: &'a CurrencyRegistry) -> WorthDisplay<'a> {
        WorthDisplay { worth: self, registry: Some(registry) }
    }

    /// Serializes the worth as a document of `(denomination, value)` pairs.
    ///
    /// Values are CBOR integers, which reach from `-2^64` to `2^64 - 1`.
    /// A count outside that range is clamped to it.
    pub fn store(&self) -> CBOR {
        let pairs: Vec<CBOR> = self
            .values
            .iter()
            .map(|(name, count)| {
                let mut pair = Map::new();
                pair.insert(DENOMINATION_KEY, name.as_str());
                pair.insert(VALUE_KEY, count_to_cbor(name, *count));
                CBOR::from(pair)
            })
            .collect();
        let mut document = Map::new();
        document.insert(PAIRS_KEY, pairs);
        CBOR::from(document)
    }

    /// Encodes [`store`](Worth::store) as CBOR bytes.
    pub fn to_cbor_data(&self) -> Vec<u8> { self.store().to_cbor_data() }

    /// The raw-mapping form accepted by [`from_json`](Worth::from_json).
    ///
    /// JSON numbers carry counts from `i64::MIN` to `u64::MAX`. A count
    /// outside that range is clamped to it.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.values
                .iter()
                .map(|(name, count)| (name.clone(), count_to_json(name, *count)))
                .collect(),
        )
    }
}

fn count_from_cbor(value: &CBOR) -> Option<i128> {
    match value.as_case() {
        CBORCase::Unsigned(n) => Some(i128::from(*n)),
        CBORCase::Negative(n) => Some(-1 - i128::from(*n)),
        _ => None,
    }
}

fn count_to_cbor(name: &str, count: i128) -> CBOR {
    let case = if count >= 0 {
        CBORCase::Unsigned(u64::try_from(count).unwrap_or_else(|_| {
            tracing::warn!("Clamping {} {} to the CBOR integer range", count, name);
            u64::MAX
        }))
    } else {
        CBORCase::Negative(u64::try_from(-1 - count).unwrap_or_else(|_| {
            tracing::warn!("Clamping {} {} to the CBOR integer range", count, name);
            u64::MAX
        }))
    };
    CBOR::from(case)
}

fn count_to_json(name: &str, count: i128) -> serde_json::Value {
    let clamped = count.clamp(i128::from(i64::MIN), i128::from(u64::MAX));
    if clamped != count {
        tracing::warn!("Clamping {} {} to the JSON integer range", count, name);
    }
    Number::from_i128(clamped).map_or(serde_json::Value::Null, serde_json::Value::Number)
}

impl Add<&Worth> for &Worth {
    type Output = Worth;

    fn add(self, rhs: &Worth) -> Worth { self.combine(rhs, i128::saturating_add) }
}

impl Add for Worth {
    type Output = Worth;

    fn add(self, rhs: Worth) -> Worth { &self + &rhs }
}

impl Sub<&Worth> for &Worth {
    type Output = Worth;

    fn sub(self, rhs: &Worth) -> Worth { self.combine(rhs, i128::saturating_sub) }
}

impl Sub for Worth {
    type Output = Worth;

    fn sub(self, rhs: Worth) -> Worth { &self - &rhs }
}

/// Renders a [`Worth`] as `"<count> <label>"` entries joined by commas, or
/// `0` when empty.
pub struct WorthDisplay<'a> {
    worth: &'a Worth,
    registry: Option<&'a CurrencyRegistry>,
}

impl fmt::Display for WorthDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.worth.is_empty() {
            return f.write_str("0");
        }
        for (i, (name, count)) in self.worth.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            let label = self
                .registry
                .and_then(|registry| registry.denomination_named(name))
                .map_or(name, |denomination| denomination.shorthand());
            write!(f, "{} {}", count, label)?;
        }
        Ok(())
    }
}

/// Formats with denomination names rather than shorthands, e.g.
/// `"1 gold, 5 silver"`, since no registry is at hand. Use
/// [`Worth::display_with`] for the shorthand form shown to players.
impl fmt::Display for Worth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&WorthDisplay { worth: self, registry: None }, f)
    }
}
