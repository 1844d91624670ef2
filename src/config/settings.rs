//! Application settings loading from config.toml
//!
//! The file is optional. A missing `[budget]` table falls back to Sunday-based weeks and
//! the weekly view; a missing `[[categories]]` list falls back to the built-in
//! aggregator taxonomy in [`super::categories`].

use crate::core::period::Granularity;
use crate::errors::{Error, Result};
use chrono::Weekday;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Budget engine settings
    #[serde(default)]
    pub budget: BudgetSettings,
    /// Default category mappings to seed; empty means "use the built-in list"
    #[serde(default)]
    pub categories: Vec<CategorySeed>,
}

/// Settings that shape period calculation and the initial view.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct BudgetSettings {
    /// First day of a weekly period
    #[serde(default = "default_week_start")]
    pub week_start: Weekday,
    /// Granularity shown when no period has been selected yet
    #[serde(default)]
    pub default_period: Granularity,
}

impl Default for BudgetSettings {
    fn default() -> Self {
        Self {
            week_start: default_week_start(),
            default_period: Granularity::default(),
        }
    }
}

const fn default_week_start() -> Weekday {
    Weekday::Sun
}

/// A single default `(category, subcategory)` mapping
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CategorySeed {
    /// Custom category name
    pub category: String,
    /// Raw aggregator subcategory label
    pub subcategory: String,
}

impl Config {
    /// Category seeds from the file, or the built-in defaults when none are configured.
    #[must_use]
    pub fn category_seeds(&self) -> Vec<CategorySeed> {
        if self.categories.is_empty() {
            super::categories::default_category_seeds()
        } else {
            self.categories.clone()
        }
    }
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A field has the wrong type (e.g. an unknown weekday)
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path_ref.display()),
    })
}

/// Loads configuration from `BUDGET_CONFIG` (default `./config.toml`).
///
/// A missing file is not an error: defaults are used instead.
pub fn load_app_configuration() -> Result<Config> {
    let path = std::env::var("BUDGET_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    if !Path::new(&path).exists() {
        info!("No configuration file at {}, using defaults", path);
        return Ok(Config::default());
    }
    load_config(&path)
}
