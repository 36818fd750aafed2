//! Remote settings delivered to plugins by the host pipeline.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::events::null_as_empty;

/// Why a settings payload is being delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateType {
    /// First delivery after startup.
    #[default]
    Initial,
    /// A later refresh of already-delivered settings.
    Refresh,
}

/// Remote configuration, keyed by integration name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub integrations: Map<String, Value>,
}

impl Settings {
    /// Parse settings from JSON text.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Settings with one (empty) integration entry, mostly for tests and demos.
    pub fn with_integration(key: impl Into<String>) -> Self {
        let mut integrations = Map::new();
        integrations.insert(key.into(), Value::Object(Map::new()));
        Self { integrations }
    }

    /// Whether the destination `key` is configured.
    pub fn has_integration_settings(&self, key: &str) -> bool {
        self.integrations.contains_key(key)
    }
}
