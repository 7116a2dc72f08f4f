//! Error types for Crosscast

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CrosscastError>;

#[derive(Error, Debug)]
pub enum CrosscastError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CrosscastError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CrosscastError::InvalidInput(_) => 3,
            CrosscastError::Platform(PlatformError::NotConnected(_)) => 2,
            CrosscastError::Platform(_) => 1,
            CrosscastError::Config(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Errors surfaced by platform capabilities.
///
/// `Upstream` carries the platform's own rejection detail verbatim; it is
/// reported once and never parsed or retried.
#[derive(Error, Debug, Clone)]
pub enum PlatformError {
    #[error("Platform not connected: {0}")]
    NotConnected(String),

    #[error("Content too long: {0}")]
    ContentTooLong(String),

    #[error("Cannot post an empty thread")]
    EmptyThread,

    #[error("Upstream failure: {0}")]
    Upstream(String),
}
