use std::collections::HashMap;
#[cfg(feature = "directory-loading")]
use std::path::Path;

use super::denomination::Denomination;

/// The table of known denominations, grouped by currency.
///
/// The `CurrencyRegistry` maintains three views over the registered
/// denominations:
/// - denomination name to its [`Denomination`] (names are unique across all
///   currencies)
/// - currency name to its base denomination (the one with value `1`)
/// - currency name to its denominations, in registration order
///
/// A registry is built once while the game starts up and then handed by
/// reference to anything that needs to interpret a [`Worth`](crate::Worth).
///
/// # Examples
///
/// ```
/// use currency_worth::{CurrencyRegistry, Denomination};
///
/// let mut registry = CurrencyRegistry::default();
/// registry.register_denomination("copper", "money", 1, Some("cp"));
/// registry.register_denomination("silver", "money", 10, Some("sp"));
/// registry.register(Denomination::new("questpoints", "questpoints", 1));
///
/// assert_eq!(registry.denomination_named("silver").unwrap().value(), 10);
/// assert_eq!(registry.base_denomination("money").unwrap().name(), "copper");
/// assert!(registry.is_currency("questpoints"));
/// assert!(!registry.is_currency("copper"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct CurrencyRegistry {
    denominations: HashMap<String, Denomination>,
    currency_base: HashMap<String, Denomination>,
    currency_denominations: HashMap<String, Vec<Denomination>>,
}

impl CurrencyRegistry {
    /// Creates a registry populated with the given denominations, registered
    /// in iteration order.
    pub fn new<T>(denominations: T) -> Self
    where
        T: IntoIterator<Item = Denomination>,
    {
        let mut registry = Self::default();
        for denomination in denominations {
            registry.register(denomination);
        }
        registry
    }

    /// Registers a denomination.
    ///
    /// A denomination with value `1` becomes its currency's base, replacing
    /// any earlier base. Registering a name that already exists replaces the
    /// earlier definition everywhere it was indexed.
    pub fn register(&mut self, denomination: Denomination) {
        if let Some(old) = self.denominations.remove(denomination.name()) {
            self.forget(&old);
        }

        tracing::debug!(
            "Registered denomination {} ({} x{})",
            denomination.name(),
            denomination.currency(),
            denomination.value()
        );

        if denomination.is_base() {
            self.currency_base
                .insert(denomination.currency().to_string(), denomination.clone());
        }
        self.currency_denominations
            .entry(denomination.currency().to_string())
            .or_default()
            .push(denomination.clone());
        self.denominations
            .insert(denomination.name().to_string(), denomination);
    }

    /// Registers a denomination built from its parts. `shorthand` defaults
    /// to the name.
    pub fn register_denomination(
        &mut self,
        name: impl Into<String>,
        currency: impl Into<String>,
        value: u64,
        shorthand: Option<&str>,
    ) {
        let mut denomination = Denomination::new(name, currency, value);
        if let Some(shorthand) = shorthand {
            denomination = denomination.with_shorthand(shorthand);
        }
        self.register(denomination);
    }

    /// Looks up a denomination by name.
    pub fn denomination_named(&self, name: &str) -> Option<&Denomination> {
        self.denominations.get(name)
    }

    /// Whether a denomination of this name is registered.
    pub fn contains_denomination(&self, name: &str) -> bool {
        self.denominations.contains_key(name)
    }

    /// Returns the base denomination of `currency`, if one was registered.
    pub fn base_denomination(&self, currency: &str) -> Option<&Denomination> {
        self.currency_base.get(currency)
    }

    /// Returns the denominations of `currency` in registration order.
    pub fn denominations_of(&self, currency: &str) -> &[Denomination] {
        self.currency_denominations
            .get(currency)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether `name` names a currency family.
    ///
    /// A currency counts once it has a base denomination, since only then
    /// can totals be expressed for it.
    pub fn is_currency(&self, name: &str) -> bool {
        self.currency_base.contains_key(name)
    }

    /// Returns the names of all currencies with at least one denomination,
    /// sorted.
    pub fn currencies(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .currency_denominations
            .keys()
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names
    }

    /// Returns every denomination name, sorted. Editing menus number their
    /// entries in this order.
    pub fn sorted_denomination_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> =
            self.denominations.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The number of registered denominations.
    pub fn len(&self) -> usize { self.denominations.len() }

    pub fn is_empty(&self) -> bool { self.denominations.is_empty() }

    /// Iterates over every registered denomination, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Denomination> {
        self.denominations.values()
    }

    /// Removes a replaced definition from the per-currency indexes.
    fn forget(&mut self, old: &Denomination) {
        if let Some(list) = self.currency_denominations.get_mut(old.currency()) {
            list.retain(|d| d.name() != old.name());
            if list.is_empty() {
                self.currency_denominations.remove(old.currency());
            }
        }
        if self
            .currency_base
            .get(old.currency())
            .is_some_and(|base| base.name() == old.name())
        {
            self.currency_base.remove(old.currency());
        }
    }

    /// Loads and registers denominations from a directory of JSON files.
    ///
    /// Files are read in file-name order, so when two files both supply a
    /// base for the same currency the later file wins.
    ///
    /// This method is only available when the `directory-loading` feature
    /// is enabled.
    ///
    /// # Returns
    ///
    /// Returns `Ok(count)` with the number of denominations registered, or
    /// an error if any file cannot be read or parsed.
    #[cfg(feature = "directory-loading")]
    pub fn load_from_directory(
        &mut self,
        path: &Path,
    ) -> Result<usize, crate::LoadError> {
        let denominations = crate::directory_loader::load_from_directory(path)?;
        let count = denominations.len();
        for denomination in denominations {
            self.register(denomination);
        }
        Ok(count)
    }

    /// Loads denominations from every directory in `config`, registering
    /// them in directory order.
    ///
    /// Unreadable files are skipped and reported in the returned
    /// `LoadResult`.
    ///
    /// This method is only available when the `directory-loading` feature
    /// is enabled.
    #[cfg(feature = "directory-loading")]
    pub fn load_from_config(
        &mut self,
        config: &crate::DirectoryConfig,
    ) -> crate::LoadResult {
        let result = crate::directory_loader::load_from_config(config);
        for denomination in &result.denominations {
            self.register(denomination.clone());
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money() -> CurrencyRegistry {
        let mut registry = CurrencyRegistry::default();
        registry.register_denomination("copper", "money", 1, Some("cp"));
        registry.register_denomination("silver", "money", 10, Some("sp"));
        registry.register_denomination("gold", "money", 100, Some("gp"));
        registry
    }

    #[test]
    fn test_registration_order_is_kept() {
        let registry = money();
        let names: Vec<&str> = registry
            .denominations_of("money")
            .iter()
            .map(Denomination::name)
            .collect();
        assert_eq!(names, ["copper", "silver", "gold"]);
        assert!(registry.denominations_of("questpoints").is_empty());
    }

    #[test]
    fn test_later_base_wins() {
        let mut registry = money();
        registry.register_denomination("penny", "money", 1, None);
        assert_eq!(registry.base_denomination("money").unwrap().name(), "penny");
        // The earlier base is still a denomination in its own right.
        assert!(registry.contains_denomination("copper"));
        assert_eq!(registry.denominations_of("money").len(), 4);
    }

    #[test]
    fn test_reregistration_replaces_definition() {
        let mut registry = money();
        registry.register_denomination("silver", "money", 20, Some("s"));
        let silver = registry.denomination_named("silver").unwrap();
        assert_eq!(silver.value(), 20);
        assert_eq!(silver.shorthand(), "s");

        let names: Vec<&str> = registry
            .denominations_of("money")
            .iter()
            .map(Denomination::name)
            .collect();
        assert_eq!(names, ["copper", "gold", "silver"]);
    }

    #[test]
    fn test_moving_base_to_other_currency() {
        let mut registry = money();
        registry.register_denomination("copper", "scrap", 1, None);
        assert!(registry.base_denomination("money").is_none());
        assert_eq!(registry.base_denomination("scrap").unwrap().name(), "copper");
        assert_eq!(registry.currencies(), ["money", "scrap"]);
    }

    #[test]
    fn test_sorted_names() {
        let registry = money();
        assert_eq!(registry.sorted_denomination_names(), ["copper", "gold", "silver"]);
        assert_eq!(registry.len(), 3);
        assert!(!registry.is_empty());
        assert!(CurrencyRegistry::default().is_empty());
    }
}
