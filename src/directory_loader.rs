//! Directory-based loading of denominations from JSON registry files.
//!
//! This module lets a game define its currencies in data rather than code.
//! It is only available when the `directory-loading` feature is enabled
//! (which is the default).
//!
//! # Overview
//!
//! Denominations can be loaded from:
//! - A default directory: `~/.currency-worth/`
//! - Custom directories specified at runtime
//!
//! Files are read in file-name order and directories in configuration
//! order. Registration order matters: when two denominations of one
//! currency both have value `1`, the one registered last becomes the base.
//!
//! # JSON File Format
//!
//! ```json
//! {
//!   "currency": "money",
//!   "denominations": [
//!     {"name": "copper", "value": 1, "shorthand": "cp"},
//!     {"name": "silver", "value": 10, "shorthand": "sp"},
//!     {"name": "questpoints", "currency": "questpoints", "shorthand": "qp"}
//!   ]
//! }
//! ```
//!
//! An entry without a `currency` takes the file's `currency`. `value`
//! defaults to `1` and `shorthand` to the name.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::Denomination;

/// A single denomination in a JSON registry file.
#[derive(Debug, Deserialize)]
pub struct DenominationEntry {
    pub name: String,
    /// Overrides the file-level currency.
    pub currency: Option<String>,
    /// Base units per coin; `1` marks the base denomination.
    #[serde(default = "default_value")]
    pub value: u64,
    pub shorthand: Option<String>,
    /// Free-form notes for whoever maintains the file.
    pub description: Option<String>,
}

fn default_value() -> u64 { 1 }

/// Root structure of a denomination registry file.
#[derive(Debug, Deserialize)]
pub struct RegistryFile {
    /// The currency entries belong to unless they name their own.
    pub currency: Option<String>,
    pub denominations: Vec<DenominationEntry>,
}

impl RegistryFile {
    /// Resolves the entries into denominations, in file order.
    fn into_denominations(self, file: &Path) -> Result<Vec<Denomination>, LoadError> {
        let file_currency = self.currency;
        self.denominations
            .into_iter()
            .map(|entry| -> Result<Denomination, LoadError> {
                let currency = entry
                    .currency
                    .or_else(|| file_currency.clone())
                    .ok_or_else(|| LoadError::MissingCurrency {
                        file: file.to_path_buf(),
                        denomination: entry.name.clone(),
                    })?;
                let mut denomination = Denomination::new(entry.name, currency, entry.value);
                if let Some(shorthand) = entry.shorthand {
                    denomination = denomination.with_shorthand(shorthand);
                }
                Ok(denomination)
            })
            .collect()
    }
}

/// Errors that can occur when loading denominations from directories.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON parse error in {}: {error}", .file.display())]
    Json {
        file: PathBuf,
        #[source]
        error: serde_json::Error,
    },

    #[error("denomination {denomination} in {} has no currency", .file.display())]
    MissingCurrency { file: PathBuf, denomination: String },
}

/// Result of a directory loading operation.
#[derive(Debug, Default)]
pub struct LoadResult {
    /// Denominations loaded, in registration order.
    pub denominations: Vec<Denomination>,
    /// Directories that were read, even if some of their files failed.
    pub directories_processed: Vec<PathBuf>,
    /// Non-fatal errors encountered during loading.
    pub errors: Vec<(PathBuf, LoadError)>,
}

impl LoadResult {
    pub fn denominations_count(&self) -> usize { self.denominations.len() }

    pub fn denominations_iter(&self) -> impl Iterator<Item = &Denomination> {
        self.denominations.iter()
    }

    pub fn into_denominations(self) -> impl Iterator<Item = Denomination> {
        self.denominations.into_iter()
    }

    pub fn has_errors(&self) -> bool { !self.errors.is_empty() }
}

/// Configuration for loading denominations from directories.
///
/// Directories are processed in order, so denominations from later
/// directories replace same-named ones from earlier directories.
///
/// # Examples
///
/// ```rust,ignore
/// use currency_worth::DirectoryConfig;
///
/// // Use only the default directory (~/.currency-worth/)
/// let config = DirectoryConfig::default_only();
///
/// // Use custom paths with the default appended
/// let config = DirectoryConfig::with_paths_and_default(vec![
///     "/usr/share/mud/currency".into(),
/// ]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DirectoryConfig {
    paths: Vec<PathBuf>,
}

impl DirectoryConfig {
    pub fn new() -> Self { Self { paths: Vec::new() } }

    /// Creates configuration with only the default directory.
    pub fn default_only() -> Self {
        Self { paths: vec![Self::default_directory()] }
    }

    pub fn with_paths(paths: Vec<PathBuf>) -> Self { Self { paths } }

    /// Creates configuration with custom paths followed by the default
    /// directory, which therefore takes precedence.
    pub fn with_paths_and_default(mut paths: Vec<PathBuf>) -> Self {
        paths.push(Self::default_directory());
        Self { paths }
    }

    /// Returns the default directory: `~/.currency-worth/`
    ///
    /// Falls back to `./.currency-worth/` if the home directory cannot be
    /// determined.
    pub fn default_directory() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".currency-worth")
    }

    pub fn paths(&self) -> &[PathBuf] { &self.paths }

    pub fn add_path(&mut self, path: PathBuf) { self.paths.push(path); }
}

/// Lists the `.json` files of a directory in file-name order.
fn json_files(path: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(path)? {
        let file_path = entry?.path();
        if file_path.extension().is_some_and(|ext| ext == "json") {
            files.push(file_path);
        }
    }
    files.sort();
    Ok(files)
}

/// Loads all JSON registry files from a single directory.
///
/// # Returns
///
/// Returns `Ok` with the denominations in registration order, or an empty
/// vector if the directory doesn't exist. Any unreadable or invalid file
/// fails the whole load.
pub fn load_from_directory(path: &Path) -> Result<Vec<Denomination>, LoadError> {
    let mut denominations = Vec::new();

    if !path.is_dir() {
        return Ok(denominations);
    }

    for file_path in json_files(path)? {
        denominations.extend(load_single_file(&file_path)?);
    }

    Ok(denominations)
}

/// Loads denominations from all directories in the given configuration.
///
/// This function is fault-tolerant: files that fail to load are skipped and
/// their errors collected in the returned `LoadResult`.
pub fn load_from_config(config: &DirectoryConfig) -> LoadResult {
    let mut result = LoadResult::default();

    for dir_path in config.paths() {
        match load_from_directory_tolerant(dir_path) {
            Ok((denominations, errors)) => {
                result.denominations.extend(denominations);
                result.errors.extend(errors);
                result.directories_processed.push(dir_path.clone());
            }
            Err(e) => {
                tracing::warn!("Cannot read currency directory {}: {}", dir_path.display(), e);
                result.errors.push((dir_path.clone(), e));
            }
        }
    }

    tracing::info!(
        "Loaded {} denominations from {} directories ({} errors)",
        result.denominations_count(),
        result.directories_processed.len(),
        result.errors.len()
    );
    result
}

/// Loads from a directory with tolerance for individual file failures.
fn load_from_directory_tolerant(
    path: &Path,
) -> Result<(Vec<Denomination>, Vec<(PathBuf, LoadError)>), LoadError> {
    let mut denominations = Vec::new();
    let mut errors = Vec::new();

    if !path.is_dir() {
        return Ok((denominations, errors));
    }

    for file_path in json_files(path)? {
        match load_single_file(&file_path) {
            Ok(file_denominations) => denominations.extend(file_denominations),
            Err(e) => {
                tracing::warn!("Skipping currency file {}: {}", file_path.display(), e);
                errors.push((file_path, e));
            }
        }
    }

    Ok((denominations, errors))
}

fn load_single_file(path: &Path) -> Result<Vec<Denomination>, LoadError> {
    let content = fs::read_to_string(path)?;
    let registry: RegistryFile =
        serde_json::from_str(&content).map_err(|e| LoadError::Json {
            file: path.to_path_buf(),
            error: e,
        })?;
    registry.into_denominations(path)
}
