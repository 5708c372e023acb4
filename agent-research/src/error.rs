//! Error types for research pipeline helpers.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Model output did not match the expected schema
    #[error("Invalid structured output: {0}")]
    InvalidOutput(#[from] serde_json::Error),
}
