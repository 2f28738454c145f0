//! Currency Worth: denominated currencies and the value algebra over them.
//!
//! A *currency* is anything spendable: money, quest points, experience,
//! faction favor. Each currency has one or more *denominations* with fixed
//! exchange ratios to a base unit (1 gold = 10 silver = 100 copper). A
//! [`Worth`] holds counts of denominations, possibly of several currencies,
//! and supports normalization to base units, arithmetic and comparison.
//!
//! # Basic Usage
//!
//! ```rust
//! use currency_worth::{CurrencyRegistry, Worth};
//!
//! // Build the registry once at startup
//! let mut registry = CurrencyRegistry::default();
//! registry.register_denomination("copper", "money", 1, Some("cp"));
//! registry.register_denomination("silver", "money", 10, Some("sp"));
//! registry.register_denomination("gold", "money", 100, Some("gp"));
//!
//! // Worths interpret names through the registry
//! let purse = Worth::from_counts(&registry, [("gold", 1), ("silver", 5)]);
//! assert_eq!(purse.normalize(&registry).get("copper"), 150);
//!
//! // Same value, different coins
//! let other = Worth::from_counts(&registry, [("copper", 150)]);
//! assert!(purse.is_equal_worth(&other, &registry));
//! ```
//!
//! # Entities
//!
//! Characters and items carry their worth in a [`CurrencyData`] and expose
//! it through the [`WorthHolder`] trait. Items flagged as currency are
//! converted into the holder's worth by [`get_currency_hook`] and
//! [`give_currency_hook`].
//!
//! # Directory Loading Feature
//!
//! When the `directory-loading` feature is enabled (default), denominations
//! can also be defined in JSON files and loaded with
//! [`CurrencyRegistry::load_from_config`]:
//!
//! ```rust,ignore
//! use currency_worth::{CurrencyRegistry, DirectoryConfig};
//!
//! let mut registry = CurrencyRegistry::standard();
//! let result = registry.load_from_config(&DirectoryConfig::default_only());
//! for (path, error) in &result.errors {
//!     eprintln!("{}: {}", path.display(), error);
//! }
//! ```

mod error;
pub use error::{Error, Result};

mod denomination;
pub use denomination::Denomination;

mod currency_registry;
pub use currency_registry::CurrencyRegistry;

mod standard_denominations;
pub use standard_denominations::*;

mod worth;
pub use worth::{Worth, WorthComparison, WorthDisplay};

mod entity;
pub use entity::{CurrencyData, WorthHolder, get_denomination, set_denomination};

mod hooks;
pub use hooks::{
    CURRENCY_BIT, CurrencyItem, HookKind, ItemExtractor, TransferOutcome,
    get_currency_hook, give_currency_hook, has_currency_bit,
};

mod editor;
pub use editor::{EditError, WorthEditor, to_prototype};

#[cfg(feature = "directory-loading")]
mod directory_loader;

#[cfg(feature = "directory-loading")]
pub use directory_loader::{
    DenominationEntry, DirectoryConfig, LoadError, LoadResult, RegistryFile,
    load_from_config, load_from_directory,
};
