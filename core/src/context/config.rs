//! Application configuration
//!
//! Re-exports the shared types from ownermap-types and adds confy
//! loading for AppConfig.

pub use ownermap_types::{AppConfig, DEFAULT_ENGINE_COMMAND, DEFAULT_ROW_LIMIT, EngineConfig};

use super::ConfigError;

const APP_NAME: &str = "ownermap";
const CONFIG_NAME: &str = "config";

/// Extension trait for loading AppConfig
pub trait AppConfigExt: Sized {
    fn load() -> Self;
    fn try_load() -> Result<Self, ConfigError>;
    /// Row cap for a run: the requested one, else the configured default.
    fn row_limit(&self, requested: Option<usize>) -> usize;
}

impl AppConfigExt for AppConfig {
    /// Loads the stored config, falling back to defaults when it is missing
    /// or unreadable.
    fn load() -> Self {
        Self::try_load().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Using default configuration");
            Self::default()
        })
    }

    fn try_load() -> Result<Self, ConfigError> {
        Ok(confy::load(APP_NAME, CONFIG_NAME)?)
    }

    fn row_limit(&self, requested: Option<usize>) -> usize {
        match requested {
            Some(limit) => limit,
            None if self.default_limit > 0 => self.default_limit,
            None => DEFAULT_ROW_LIMIT,
        }
    }
}
