use std::borrow::Cow;
use std::fmt;

/// One unit of a currency, with a fixed exchange ratio to the currency's
/// base unit.
///
/// A denomination belongs to exactly one currency family (for example
/// `gold` belongs to `money`). Its `value` is the number of base units one
/// coin of this denomination is worth; the denomination whose value is `1`
/// is the currency's *base denomination*, the unit every
/// [`Worth`](crate::Worth) normalizes into.
///
/// Names are held as `Cow<'static, str>` so the standard denominations can
/// be declared as constants while denominations loaded at runtime own their
/// strings.
///
/// # Examples
///
/// ```
/// use currency_worth::Denomination;
///
/// let gold = Denomination::new("gold", "money", 100).with_shorthand("gp");
/// assert_eq!(gold.name(), "gold");
/// assert_eq!(gold.currency(), "money");
/// assert_eq!(gold.value(), 100);
/// assert_eq!(gold.shorthand(), "gp");
/// assert!(!gold.is_base());
///
/// // Without an explicit shorthand, the name is used.
/// let copper = Denomination::new("copper", "money", 1);
/// assert_eq!(copper.shorthand(), "copper");
/// assert!(copper.is_base());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Denomination {
    name: Cow<'static, str>,
    currency: Cow<'static, str>,
    value: u64,
    shorthand: Option<Cow<'static, str>>,
}

impl Denomination {
    /// Creates a denomination with owned names and no shorthand.
    pub fn new(
        name: impl Into<String>,
        currency: impl Into<String>,
        value: u64,
    ) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            currency: Cow::Owned(currency.into()),
            value,
            shorthand: None,
        }
    }

    /// Creates a denomination from static strings, usable in `const`
    /// context.
    pub const fn new_with_static_names(
        name: &'static str,
        currency: &'static str,
        value: u64,
        shorthand: &'static str,
    ) -> Self {
        Self {
            name: Cow::Borrowed(name),
            currency: Cow::Borrowed(currency),
            value,
            shorthand: Some(Cow::Borrowed(shorthand)),
        }
    }

    /// Sets the label used when a worth is displayed against a registry.
    pub fn with_shorthand(mut self, shorthand: impl Into<String>) -> Self {
        self.shorthand = Some(Cow::Owned(shorthand.into()));
        self
    }

    /// The unique name, e.g. `"gold"`.
    pub fn name(&self) -> &str { &self.name }

    /// The currency family this denomination belongs to, e.g. `"money"`.
    pub fn currency(&self) -> &str { &self.currency }

    /// How many base units one of this denomination is worth.
    pub fn value(&self) -> u64 { self.value }

    /// The short display label, falling back to the name.
    pub fn shorthand(&self) -> &str {
        self.shorthand.as_deref().unwrap_or(&self.name)
    }

    /// Whether this denomination is worth exactly one base unit.
    pub fn is_base(&self) -> bool { self.value == 1 }

    /// Converts `count` coins of this denomination into base units.
    ///
    /// Exact for any count that fits in an `i64`, whatever the value. Only
    /// products beyond the range of `i128` saturate.
    pub fn base_units(&self, count: i128) -> i128 {
        count.saturating_mul(i128::from(self.value))
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
