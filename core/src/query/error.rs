//! Error types for combat log queries

use std::path::PathBuf;
use thiserror::Error;

use crate::combat_log::DecodeError;

/// Exit code used when a failure carries no code of its own.
pub const GENERIC_FAILURE_CODE: i32 = 1;

/// Errors while querying the combat log engine and reading its response
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid engine command line: {command:?}")]
    InvalidCommand { command: String },

    #[error("failed to start query engine {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The engine ran and reported failure. `diagnostic` is its own output,
    /// unmodified.
    #[error("query engine failed with exit code {code:?}")]
    EngineFailed {
        code: Option<i32>,
        diagnostic: String,
    },

    #[error("failed to read captured response {path}")]
    ReadCapture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed query response")]
    Decode(#[from] DecodeError),
}

impl QueryError {
    /// Process exit code for this failure. Engine failures keep the engine's
    /// own code.
    pub fn exit_code(&self) -> i32 {
        match self {
            QueryError::EngineFailed {
                code: Some(code), ..
            } => *code,
            _ => GENERIC_FAILURE_CODE,
        }
    }
}
