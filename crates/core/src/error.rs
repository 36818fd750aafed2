//! Unified error types for the session plugin.
//!
//! Session operations themselves never fail. Errors only come from the
//! edges: parsing events or settings off the wire, and loading configuration.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

impl Error {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Self::InvalidRecord(msg.into())
    }

    /// Short machine-readable code, used in log fields.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Serialization(_) => "SERDE",
            Self::InvalidConfig(_) => "CONFIG",
            Self::InvalidRecord(_) => "RECORD",
        }
    }
}
