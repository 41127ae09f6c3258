//! Tracker configuration, loaded from a TOML file.
//!
//! Every key is optional; absent keys take the built-in defaults so an empty
//! file (or no file at all) reproduces the stock tracker's factory setup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.example.com/stock_data";
pub const DEFAULT_REPORTS_DIR: &str = "reports";
pub const DEFAULT_SHEET_NAME: &str = "Dealership Stock Tracker";
pub const DEFAULT_CREDENTIALS_PATH: &str = "google_credentials.json";
pub const DEFAULT_STOCK_LIMIT: u64 = 500;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Full configuration for one tracker run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Directory receiving the dated CSV extracts.
    pub reports_dir: PathBuf,

    /// Advisory threshold on the number of records per fetch.
    pub stock_limit: u64,

    pub api: ApiConfig,

    pub sheet: SheetConfig,
}

/// Stock API endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub url: String,
}

/// Spreadsheet mirror target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Spreadsheet title as shown in Drive.
    pub name: String,

    /// Service-account JSON key file.
    pub credentials_path: PathBuf,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            reports_dir: PathBuf::from(DEFAULT_REPORTS_DIR),
            stock_limit: DEFAULT_STOCK_LIMIT,
            api: ApiConfig::default(),
            sheet: SheetConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_SHEET_NAME.to_string(),
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_PATH),
        }
    }
}

impl TrackerConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.url.trim().is_empty() {
            return Err(ConfigError::Invalid("api.url must not be empty".into()));
        }
        if self.sheet.name.trim().is_empty() {
            return Err(ConfigError::Invalid("sheet.name must not be empty".into()));
        }
        if self.stock_limit == 0 {
            return Err(ConfigError::Invalid("stock_limit must be at least 1".into()));
        }
        Ok(())
    }
}
