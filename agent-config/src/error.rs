//! Error types for agent configuration and platform startup.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading configuration or initializing the platform.
///
/// Every variant is fatal for startup; nothing here is retried.
#[derive(Error, Debug)]
pub enum Error {
    /// No project identifier could be resolved from the environment or ambient credentials
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// The platform initializer rejected the supplied settings
    #[error("Platform initialization failed: {0}")]
    PlatformInit(String),

    /// A deployment name could not be turned into an identifier
    #[error("Invalid identifier input: {0}")]
    InvalidIdentifier(String),

    /// A `.env` file exists but could not be read
    #[error("Failed to load env file {}: {message}", path.display())]
    EnvFile { path: PathBuf, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Short machine-friendly label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::MissingCredentials(_) => "missing_credentials",
            Error::PlatformInit(_) => "platform_init",
            Error::InvalidIdentifier(_) => "invalid_identifier",
            Error::EnvFile { .. } => "env_file",
            Error::Config(_) => "config",
            Error::Io(_) => "io",
            Error::Serialization(_) => "serialization",
        }
    }
}
