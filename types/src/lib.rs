//! Shared configuration types for ownermap
//!
//! Plain serde types with defaults. Persistence lives in
//! `ownermap-core::context`, which owns the confy dependency.

use serde::{Deserialize, Serialize};

/// Row cap used when neither the command line nor the config file sets one.
pub const DEFAULT_ROW_LIMIT: usize = 500_000;

/// Command line of the combat-log query engine, relative to `working_dir`.
pub const DEFAULT_ENGINE_COMMAND: &str = "npm run -s cli --";

// ─────────────────────────────────────────────────────────────────────────────
// Engine
// ─────────────────────────────────────────────────────────────────────────────

/// How to reach the external query engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Shell-style command line. Query arguments are appended to it.
    #[serde(default = "default_engine_command")]
    pub command: String,

    /// Directory the engine is started in. Inherits the caller's when unset.
    #[serde(default)]
    pub working_dir: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            command: default_engine_command(),
            working_dir: None,
        }
    }
}

impl EngineConfig {
    pub fn with_command(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Default::default()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Application
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineConfig,

    /// Row cap for the damage query when none is given on the command line.
    #[serde(default = "default_row_limit")]
    pub default_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            default_limit: DEFAULT_ROW_LIMIT,
        }
    }
}

fn default_engine_command() -> String {
    DEFAULT_ENGINE_COMMAND.to_string()
}

fn default_row_limit() -> usize {
    DEFAULT_ROW_LIMIT
}
