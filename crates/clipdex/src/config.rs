//! Configuration management for clipdex.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "clipdex";

/// Default catalog database file name.
const DATABASE_FILE_NAME: &str = "catalog.db";

/// Default corpus root directory, relative to the working directory.
const DEFAULT_CORPUS_ROOT: &str = "documentation";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `CLIPDEX_`)
/// 2. TOML config file at `~/.config/clipdex/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Corpus location configuration.
    pub corpus: CorpusConfig,
    /// Catalog configuration.
    pub catalog: CatalogConfig,
    /// Watcher configuration.
    pub watch: WatchConfig,
    /// Validation configuration.
    pub validate: ValidateConfig,
}

/// Corpus-location configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Path to the corpus root directory (the one holding the collection).
    /// Defaults to `./documentation`.
    pub root: Option<PathBuf>,
    /// Collection label under the corpus root.
    pub collection: String,
}

/// Catalog-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Path to the catalog database file.
    /// Defaults to `~/.local/share/clipdex/catalog.db`
    pub database_path: Option<PathBuf>,
}

/// Watcher configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Interval between corpus rescans in seconds.
    pub poll_interval_secs: u64,
}

/// Validation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidateConfig {
    /// Rule names to skip entirely.
    pub ignore_rules: Vec<String>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            root: None, // Will be resolved to default at runtime
            collection: crate::corpus::DEFAULT_COLLECTION.to_string(),
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 30,
        }
    }
}

impl Default for ValidateConfig {
    fn default() -> Self {
        Self {
            ignore_rules: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `CLIPDEX_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("CLIPDEX_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.watch.poll_interval_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "poll_interval_secs must be greater than 0".to_string(),
            });
        }

        if self.corpus.collection.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "collection must not be empty".to_string(),
            });
        }

        for name in &self.validate.ignore_rules {
            if crate::validate::rules::rule(name).is_none() {
                return Err(Error::ConfigValidation {
                    message: format!("unknown validation rule: {name}"),
                });
            }
        }

        Ok(())
    }

    /// Get the corpus root, resolving defaults if not set.
    #[must_use]
    pub fn corpus_root(&self) -> PathBuf {
        self.corpus
            .root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CORPUS_ROOT))
    }

    /// Get the collection root: corpus root joined with the collection label.
    #[must_use]
    pub fn collection_root(&self) -> PathBuf {
        self.corpus_root().join(&self.corpus.collection)
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.catalog
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the watcher poll interval as a Duration.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.watch.poll_interval_secs)
    }
}
