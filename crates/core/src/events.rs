//! Segment-style event model.
//!
//! An [`Event`] carries the fields every event shares (ids, timestamp,
//! context, and the per-destination integration options map) plus an
//! [`EventKind`] holding the kind-specific payload. On the wire the kind is
//! flattened into the event and discriminated by its `type` field:
//!
//! ```json
//! {"type": "track", "event": "Song Played", "messageId": "...", "integrations": {}}
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::Result;

/// Track event name that does not count as session activity.
pub const APPLICATION_OPENED: &str = "Application Opened";

/// Reads an explicit `null` object field as an empty map.
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Kind-specific event payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventKind {
    Identify {
        #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Map::is_empty")]
        traits: Map<String, Value>,
    },
    Track {
        event: String,
        #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Map::is_empty")]
        properties: Map<String, Value>,
    },
    Screen {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        category: Option<String>,
        #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Map::is_empty")]
        properties: Map<String, Value>,
    },
    #[serde(rename_all = "camelCase")]
    Alias { previous_id: String },
    #[serde(rename_all = "camelCase")]
    Group {
        group_id: String,
        #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Map::is_empty")]
        traits: Map<String, Value>,
    },
}

impl EventKind {
    /// Returns the wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identify { .. } => "identify",
            Self::Track { .. } => "track",
            Self::Screen { .. } => "screen",
            Self::Alias { .. } => "alias",
            Self::Group { .. } => "group",
        }
    }
}

/// An outgoing analytics event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anonymous_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Map::is_empty")]
    pub context: Map<String, Value>,

    /// Per-destination options, keyed by integration name.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub integrations: Map<String, Value>,

    #[serde(flatten)]
    pub kind: EventKind,
}

impl Event {
    /// Creates an event with a fresh message id and the current timestamp.
    pub fn new(kind: EventKind) -> Self {
        Self {
            message_id: Some(Uuid::new_v4().to_string()),
            anonymous_id: None,
            user_id: None,
            timestamp: Some(Utc::now()),
            context: Map::new(),
            integrations: Map::new(),
            kind,
        }
    }

    pub fn identify(user_id: impl Into<String>) -> Self {
        Self::new(EventKind::Identify {
            traits: Map::new(),
        })
        .with_user_id(user_id)
    }

    pub fn track(name: impl Into<String>) -> Self {
        Self::new(EventKind::Track {
            event: name.into(),
            properties: Map::new(),
        })
    }

    pub fn screen(name: impl Into<String>) -> Self {
        Self::new(EventKind::Screen {
            name: Some(name.into()),
            category: None,
            properties: Map::new(),
        })
    }

    pub fn alias(previous_id: impl Into<String>) -> Self {
        Self::new(EventKind::Alias {
            previous_id: previous_id.into(),
        })
    }

    pub fn group(group_id: impl Into<String>) -> Self {
        Self::new(EventKind::Group {
            group_id: group_id.into(),
            traits: Map::new(),
        })
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_integration(mut self, key: impl Into<String>, value: Value) -> Self {
        self.set_integration(key, value);
        self
    }

    /// Parse an event from JSON text.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Serialize the event to compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Returns the wire name of the event kind.
    pub fn event_type(&self) -> &'static str {
        self.kind.as_str()
    }

    /// Whether processing this event counts as session activity.
    ///
    /// Every kind does, except the track event the host emits on app launch.
    pub fn refreshes_session(&self) -> bool {
        match &self.kind {
            EventKind::Track { event, .. } => event != APPLICATION_OPENED,
            EventKind::Identify { .. }
            | EventKind::Screen { .. }
            | EventKind::Alias { .. }
            | EventKind::Group { .. } => true,
        }
    }

    /// Sets the options entry for one integration, leaving the others alone.
    pub fn set_integration(&mut self, key: impl Into<String>, value: Value) {
        self.integrations.insert(key.into(), value);
    }

    /// Returns the options entry for one integration.
    pub fn integration(&self, key: &str) -> Option<&Value> {
        self.integrations.get(key)
    }
}
