//! Configuration management for recordbook.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use chrono::{FixedOffset, Local, Offset};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::export::DEFAULT_RULE_WIDTH;
use crate::render::{validate_date_format, Renderer, DEFAULT_DATE_FORMAT};
use crate::storage::DEFAULT_KEY;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "recordbook";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "records.db";

/// Largest accepted UTC offset, in minutes.
const MAX_OFFSET_MINUTES: i32 = 24 * 60 - 1;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `RECORDBOOK_`, sections split by `__`)
/// 2. TOML config file at `~/.config/recordbook/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Display configuration.
    pub display: DisplayConfig,
    /// Export configuration.
    pub export: ExportConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/recordbook/records.db`
    pub database_path: Option<PathBuf>,
    /// Key the record collection is stored under.
    pub key: String,
    /// Write two sample records the first time the store is opened.
    pub seed_samples: bool,
}

/// How timestamps are shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// strftime pattern for timestamps.
    pub date_format: String,
    /// Fixed UTC offset in minutes; the local offset when unset.
    pub utc_offset_minutes: Option<i32>,
}

/// Export-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory export files are written to.
    /// Defaults to the current directory.
    pub directory: Option<PathBuf>,
    /// Width of the rule line after each exported record.
    pub rule_width: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None, // Will be resolved to default at runtime
            key: DEFAULT_KEY.to_string(),
            seed_samples: true,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            utc_offset_minutes: None,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: None,
            rule_width: DEFAULT_RULE_WIDTH,
        }
    }
}

impl Config {
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
            .merge(Env::prefixed("RECORDBOOK_").split("__"));

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
        if self.storage.key.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "storage key must not be empty".to_string(),
            });
        }

        validate_date_format(&self.display.date_format)?;

        if let Some(minutes) = self.display.utc_offset_minutes {
            if !(-MAX_OFFSET_MINUTES..=MAX_OFFSET_MINUTES).contains(&minutes) {
                return Err(Error::ConfigValidation {
                    message: format!(
                        "utc_offset_minutes ({minutes}) must be within ±{MAX_OFFSET_MINUTES}"
                    ),
                });
            }
        }

        if self.export.rule_width == 0 {
            return Err(Error::ConfigValidation {
                message: "rule_width must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the export directory, defaulting to the current directory.
    #[must_use]
    pub fn export_dir(&self) -> PathBuf {
        self.export
            .directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// The UTC offset timestamps are displayed in.
    #[must_use]
    pub fn display_offset(&self) -> FixedOffset {
        self.display
            .utc_offset_minutes
            .and_then(|minutes| minutes.checked_mul(60))
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Local::now().offset().fix())
    }

    /// Build a renderer from the display settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the date format is invalid.
    pub fn renderer(&self) -> Result<Renderer> {
        Renderer::new(self.display.date_format.clone(), self.display_offset())
    }
}
