//! Error types for tabular response decoding

use thiserror::Error;

/// Errors while decoding the query engine's tabular output
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("column {name} missing from response header")]
    MissingColumn { name: &'static str },

    /// `record` is 1-based and counts the header.
    #[error("unterminated quoted field in record {record}")]
    UnterminatedQuote { record: u64 },
}
