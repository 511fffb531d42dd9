//! Configuration loading and representation.

use std::path::PathBuf;

use thiserror::Error;

use stockroom_core::{DomainError, Quantity};
use stockroom_infra::DEFAULT_INVENTORY_FILE;
use stockroom_inventory::DEFAULT_LOW_STOCK_THRESHOLD;
use stockroom_observability::{LogFormat, UnknownLogFormat};

pub const ENV_FILE: &str = "STOCKROOM_FILE";
pub const ENV_LOW_STOCK_THRESHOLD: &str = "STOCKROOM_LOW_STOCK_THRESHOLD";
pub const ENV_LOG_FORMAT: &str = "STOCKROOM_LOG_FORMAT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var}: {source}")]
    InvalidThreshold {
        var: &'static str,
        #[source]
        source: DomainError,
    },

    #[error("STOCKROOM_LOG_FORMAT: {0}")]
    InvalidLogFormat(#[from] UnknownLogFormat),
}

/// Process configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Inventory file, relative to the working directory unless absolute.
    pub data_file: PathBuf,
    pub low_stock_threshold: Quantity,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_INVENTORY_FILE),
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            log_format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Read `STOCKROOM_*` variables; unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(file) = lookup(ENV_FILE).filter(|v| !v.trim().is_empty()) {
            config.data_file = PathBuf::from(file);
        }

        if let Some(raw) = lookup(ENV_LOW_STOCK_THRESHOLD) {
            config.low_stock_threshold =
                raw.parse().map_err(|source| ConfigError::InvalidThreshold {
                    var: ENV_LOW_STOCK_THRESHOLD,
                    source,
                })?;
        }

        if let Some(raw) = lookup(ENV_LOG_FORMAT) {
            config.log_format = raw.parse()?;
        }

        Ok(config)
    }

    /// Command-line flags win over the environment.
    pub fn with_overrides(mut self, file: Option<PathBuf>, threshold: Option<Quantity>) -> Self {
        if let Some(file) = file {
            self.data_file = file;
        }
        if let Some(threshold) = threshold {
            self.low_stock_threshold = threshold;
        }
        self
    }
}
