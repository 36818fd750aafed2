//! Session plugin configuration.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{Error, Result};

/// Integration name Amplitude (Actions) is configured under.
pub const DEFAULT_INTEGRATION_KEY: &str = "Actions Amplitude";

/// Idle time after which a foreground resume starts a new session.
pub const DEFAULT_MIN_SESSION_GAP_SECS: u64 = 5 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SessionConfig {
    /// Key used in settings and in event integration options
    #[serde(default = "default_integration_key")]
    #[validate(length(min = 1, max = 128))]
    pub integration_key: String,
    /// Minimum idle gap, in seconds, before a resume rotates the session
    #[serde(default = "default_min_session_gap_secs")]
    #[validate(range(max = 86400))]
    pub min_session_gap_secs: u64,
}

fn default_integration_key() -> String {
    DEFAULT_INTEGRATION_KEY.to_string()
}

fn default_min_session_gap_secs() -> u64 {
    DEFAULT_MIN_SESSION_GAP_SECS
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            integration_key: default_integration_key(),
            min_session_gap_secs: default_min_session_gap_secs(),
        }
    }
}

impl SessionConfig {
    pub fn with_min_session_gap_secs(mut self, secs: u64) -> Self {
        self.min_session_gap_secs = secs;
        self
    }

    pub fn with_integration_key(mut self, key: impl Into<String>) -> Self {
        self.integration_key = key.into();
        self
    }

    pub fn min_session_gap(&self) -> Duration {
        Duration::seconds(self.min_session_gap_secs as i64)
    }

    /// Run field validations, mapping failures to [`Error::InvalidConfig`].
    pub fn validated(self) -> Result<Self> {
        self.validate()
            .map_err(|e| Error::invalid_config(format!("{}", e)))?;
        Ok(self)
    }
}
