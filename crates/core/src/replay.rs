//! Newline-delimited JSON replay of a host pipeline.
//!
//! Each input line is one of:
//! - an event: `{"type": "track", "event": "Song Played", ...}`
//! - a lifecycle signal: `{"lifecycle": "foreground"}` or `{"lifecycle": "background"}`
//! - a settings delivery: `{"settings": {"integrations": {...}}, "update": "refresh"}`
//! - a reset: `{"reset": true}`

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::events::Event;
use crate::plugin::{EventPlugin, Lifecycle};
use crate::session::SessionManager;
use crate::settings::{Settings, UpdateType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleSignal {
    Foreground,
    Background,
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplayRecord {
    Event(Box<Event>),
    Lifecycle(LifecycleSignal),
    Settings {
        settings: Settings,
        update_type: UpdateType,
    },
    Reset,
}

impl ReplayRecord {
    pub fn parse(line: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(line)?;

        let Value::Object(obj) = &value else {
            return Err(Error::invalid_record("line must be a JSON object"));
        };

        if obj.contains_key("type") {
            let event: Event = serde_json::from_value(value)?;
            return Ok(Self::Event(Box::new(event)));
        }

        if let Some(signal) = obj.get("lifecycle") {
            let signal: LifecycleSignal = serde_json::from_value(signal.clone())
                .map_err(|_| Error::invalid_record(format!("unknown lifecycle {}", signal)))?;
            return Ok(Self::Lifecycle(signal));
        }

        if let Some(settings) = obj.get("settings") {
            let settings: Settings = serde_json::from_value(settings.clone())?;
            let update_type = match obj.get("update") {
                Some(u) => serde_json::from_value(u.clone())?,
                None => UpdateType::default(),
            };
            return Ok(Self::Settings {
                settings,
                update_type,
            });
        }

        if obj.get("reset").and_then(Value::as_bool) == Some(true) {
            return Ok(Self::Reset);
        }

        Err(Error::invalid_record(
            "expected an event, 'lifecycle', 'settings', or 'reset'",
        ))
    }
}

/// Counters for a replay run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub events: u64,
    pub tagged: u64,
    pub resumes: u64,
}

/// Drives a [`SessionManager`] the way a host pipeline would.
#[derive(Debug)]
pub struct Replayer {
    manager: SessionManager,
    stats: ReplayStats,
}

impl Replayer {
    pub fn new(manager: SessionManager) -> Self {
        Self {
            manager,
            stats: ReplayStats::default(),
        }
    }

    pub fn manager(&self) -> &SessionManager {
        &self.manager
    }

    pub fn stats(&self) -> ReplayStats {
        self.stats
    }

    /// Apply one record. Returns the event to emit, if the record was an event.
    pub fn apply(&mut self, record: ReplayRecord) -> Option<Event> {
        match record {
            ReplayRecord::Event(event) => {
                self.stats.events += 1;
                let key = self.manager.key().to_string();
                let out = self.manager.execute(*event)?;
                if out.integration(&key).is_some() {
                    self.stats.tagged += 1;
                }
                Some(out)
            }
            ReplayRecord::Lifecycle(LifecycleSignal::Foreground) => {
                self.stats.resumes += 1;
                self.manager.on_foreground_resume();
                None
            }
            ReplayRecord::Lifecycle(LifecycleSignal::Background) => {
                self.manager.on_background_pause();
                None
            }
            ReplayRecord::Settings {
                settings,
                update_type,
            } => {
                self.manager.update(&settings, update_type);
                None
            }
            ReplayRecord::Reset => {
                EventPlugin::reset(&mut self.manager);
                None
            }
        }
    }

    /// Parse and apply one line.
    pub fn apply_line(&mut self, line: &str) -> Result<Option<Event>> {
        let record = ReplayRecord::parse(line)?;
        Ok(self.apply(record))
    }
}
