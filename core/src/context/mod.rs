mod config;
mod error;

pub use config::{AppConfig, AppConfigExt, DEFAULT_ENGINE_COMMAND, DEFAULT_ROW_LIMIT, EngineConfig};
pub use error::ConfigError;
