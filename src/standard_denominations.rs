use paste::paste;

use super::{CurrencyRegistry, Denomination};

/// A macro that declares a denomination at compile time.
///
/// This macro creates two constants:
/// - A raw u64 value constant with the suffix `_VALUE`
/// - A `Denomination` constant with the given name, currency and shorthand
///
/// # Examples
///
/// ```
/// use currency_worth::*;
/// use paste::paste;
///
/// const_denomination!(TOKEN, "token", "faction", 1, "tk");
///
/// assert_eq!(TOKEN.name(), "token");
/// assert_eq!(TOKEN.currency(), "faction");
/// assert_eq!(TOKEN.shorthand(), "tk");
///
/// paste! {
///     assert_eq!([<TOKEN _VALUE>], 1);
/// }
/// ```
#[macro_export]
macro_rules! const_denomination {
    ($const_name:ident, $name:expr, $currency:expr, $value:expr, $shorthand:expr) => {
        paste! {
            pub const [<$const_name _VALUE>]: u64 = $value;
        }
        pub const $const_name: $crate::Denomination =
            $crate::Denomination::new_with_static_names($name, $currency, $value, $shorthand);
    };
}

//
// Money
//

const_denomination!(COPPER, "copper", "money", 1, "cp");
const_denomination!(SILVER, "silver", "money", 10, "sp");
const_denomination!(GOLD, "gold", "money", 100, "gp");
const_denomination!(PLATINUM, "platinum", "money", 1000, "pp");

//
// Single-denomination currencies
//

const_denomination!(QUESTPOINTS, "questpoints", "questpoints", 1, "qp");
const_denomination!(EXPERIENCE, "experience", "experience", 1, "exp");

/// The standard denominations, in registration order.
pub const STANDARD_DENOMINATIONS: [Denomination; 6] =
    [COPPER, SILVER, GOLD, PLATINUM, QUESTPOINTS, EXPERIENCE];

impl CurrencyRegistry {
    /// Creates a registry holding the standard money, questpoint and
    /// experience denominations.
    ///
    /// # Examples
    ///
    /// ```
    /// use currency_worth::CurrencyRegistry;
    ///
    /// let registry = CurrencyRegistry::standard();
    /// assert_eq!(registry.denomination_named("gold").unwrap().value(), 100);
    /// assert_eq!(registry.base_denomination("money").unwrap().name(), "copper");
    /// ```
    pub fn standard() -> Self { Self::new(STANDARD_DENOMINATIONS) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry() {
        assert_eq!(PLATINUM_VALUE, 1000);
        let registry = CurrencyRegistry::standard();
        assert_eq!(registry.len(), 6);
        assert_eq!(registry.currencies(), ["experience", "money", "questpoints"]);
        assert_eq!(registry.denominations_of("money").len(), 4);
        assert_eq!(
            registry.base_denomination("questpoints").unwrap().shorthand(),
            "qp"
        );
    }
}
