//! Plugin traits implemented by pipeline participants.
//!
//! The host pipeline owns plugins and calls them in order for every event.
//! Lifecycle callbacks are not broadcast globally; the embedding application
//! invokes [`Lifecycle`] methods itself.

use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::settings::{Settings, UpdateType};

/// Where a plugin sits in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginType {
    Before,
    Enrichment,
    Destination,
    After,
    Utility,
}

/// A plugin that sees every outgoing event.
pub trait EventPlugin {
    /// Integration name this plugin answers to in settings and options maps.
    fn key(&self) -> &str;

    fn plugin_type(&self) -> PluginType;

    /// Called whenever remote settings are delivered.
    fn update(&mut self, settings: &Settings, update_type: UpdateType);

    /// Process one event. Returning `None` drops it from the pipeline.
    fn execute(&mut self, event: Event) -> Option<Event>;

    /// Clear per-user state, e.g. on logout.
    fn reset(&mut self) {}
}

/// Foreground/background notifications from the host application.
pub trait Lifecycle {
    fn on_foreground_resume(&mut self);

    fn on_background_pause(&mut self) {}
}

/// A plugin that reports its own version.
pub trait VersionedPlugin {
    fn version() -> &'static str;
}
