//! Amplitude session id management.
//!
//! Amplitude groups events into sessions by a `session_id` carried in each
//! event's `integrations["Actions Amplitude"]` entry. The id is the session
//! start time in epoch milliseconds, truncated to whole seconds.
//!
//! A session is kept alive by event activity. When the app comes back to the
//! foreground after at least `min_session_gap` without activity, a new id is
//! minted. A caller that already tracks sessions elsewhere (for example a
//! native Amplitude SDK running alongside) can supply a [`SessionIdProvider`],
//! which then replaces the internal timing logic entirely.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use tracing::{debug, info, trace};

use crate::clock::{Clock, SystemClock};
use crate::config::SessionConfig;
use crate::error::Result;
use crate::events::Event;
use crate::plugin::{EventPlugin, Lifecycle, PluginType, VersionedPlugin};
use crate::settings::{Settings, UpdateType};

/// Field name inside the integration entry.
pub const SESSION_ID_FIELD: &str = "session_id";

/// Logged in place of the id when there is no session.
pub const NO_SESSION_SENTINEL: i64 = -1;

/// Plugin version reported through [`VersionedPlugin`].
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Externally owned source of session ids.
///
/// Implemented for any `Fn() -> Option<i64>` closure.
pub trait SessionIdProvider: Send + Sync {
    fn session_id(&self) -> Option<i64>;
}

impl<F> SessionIdProvider for F
where
    F: Fn() -> Option<i64> + Send + Sync,
{
    fn session_id(&self) -> Option<i64> {
        self()
    }
}

/// Where the current session id comes from.
pub enum SessionSource {
    /// Minted and rotated by the manager.
    Internal(Option<i64>),
    /// Supplied by the caller. `adopted` holds the value taken from the
    /// provider on the last foreground resume and is used whenever the
    /// provider has nothing at tag time.
    External {
        provider: Box<dyn SessionIdProvider>,
        adopted: Option<i64>,
    },
}

impl SessionSource {
    fn current(&self) -> Option<i64> {
        match self {
            Self::Internal(id) => *id,
            Self::External { provider, adopted } => provider.session_id().or(*adopted),
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, Self::External { .. })
    }
}

impl fmt::Debug for SessionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Internal(id) => f.debug_tuple("Internal").field(id).finish(),
            Self::External { adopted, .. } => f
                .debug_struct("External")
                .field("adopted", adopted)
                .finish_non_exhaustive(),
        }
    }
}

/// Session id for a session starting at `now`: epoch ms truncated to seconds.
pub fn mint_session_id(now: DateTime<Utc>) -> i64 {
    now.timestamp() * 1000
}

/// Tags outgoing events with the current Amplitude session id.
pub struct SessionManager {
    key: String,
    min_session_gap: Duration,
    active: bool,
    source: SessionSource,
    last_event_time: DateTime<Utc>,
    clock: Arc<dyn Clock>,
}

impl SessionManager {
    /// Default configuration, real time, internally minted ids.
    pub fn new() -> Self {
        Self::from_parts(SessionConfig::default(), Arc::new(SystemClock), None)
    }

    /// Default configuration with ids taken from `provider`.
    pub fn with_provider(provider: impl SessionIdProvider + 'static) -> Self {
        Self::from_parts(
            SessionConfig::default(),
            Arc::new(SystemClock),
            Some(Box::new(provider)),
        )
    }

    pub fn builder() -> SessionManagerBuilder {
        SessionManagerBuilder::default()
    }

    fn from_parts(
        config: SessionConfig,
        clock: Arc<dyn Clock>,
        provider: Option<Box<dyn SessionIdProvider>>,
    ) -> Self {
        let now = clock.now();
        let source = match provider {
            Some(provider) => SessionSource::External {
                provider,
                adopted: None,
            },
            None => SessionSource::Internal(Some(mint_session_id(now))),
        };

        Self {
            min_session_gap: config.min_session_gap(),
            key: config.integration_key,
            active: false,
            source,
            last_event_time: now,
            clock,
        }
    }

    /// Enable or disable tagging. Driven by remote settings.
    pub fn set_active(&mut self, enabled: bool) {
        if self.active != enabled {
            debug!(key = %self.key, active = enabled, "Session tagging toggled");
        }
        self.active = enabled;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The id events would be tagged with right now.
    pub fn session_id(&self) -> Option<i64> {
        self.source.current()
    }

    pub fn source(&self) -> &SessionSource {
        &self.source
    }

    pub fn last_event_time(&self) -> DateTime<Utc> {
        self.last_event_time
    }

    pub fn min_session_gap(&self) -> Duration {
        self.min_session_gap
    }

    /// Attach the current session id to `event`.
    ///
    /// Inactive managers and managers without an id pass the event through
    /// untouched. Other integration entries are never modified.
    pub fn tag_event(&mut self, mut event: Event) -> Event {
        if !self.active {
            return event;
        }

        if event.refreshes_session() {
            self.last_event_time = self.clock.now();
        }

        match self.source.current() {
            Some(session_id) => {
                trace!(
                    event_type = event.event_type(),
                    session_id,
                    "Tagging event with session id"
                );
                event.set_integration(self.key.clone(), json!({ SESSION_ID_FIELD: session_id }));
            }
            None => {
                trace!(event_type = event.event_type(), "No session id, event left untagged");
            }
        }

        event
    }

    /// Forget the current session. Tagging stops until a new id appears.
    pub fn reset_session(&mut self) {
        match &mut self.source {
            SessionSource::Internal(id) => *id = None,
            SessionSource::External { adopted, .. } => *adopted = None,
        }
        debug!(key = %self.key, "Session reset");
    }

    /// Handle the app returning to the foreground.
    pub fn resume(&mut self) {
        let now = self.clock.now();
        match &mut self.source {
            SessionSource::External { provider, adopted } => {
                *adopted = provider.session_id();
            }
            SessionSource::Internal(id) => {
                let idle = now - self.last_event_time;
                if idle >= self.min_session_gap {
                    let minted = mint_session_id(now);
                    debug!(
                        idle_secs = idle.num_seconds(),
                        previous = id.unwrap_or(NO_SESSION_SENTINEL),
                        session_id = minted,
                        "Session gap exceeded, starting new session"
                    );
                    *id = Some(minted);
                }
            }
        }

        let session_id = match &self.source {
            SessionSource::Internal(id) => *id,
            SessionSource::External { adopted, .. } => *adopted,
        };
        info!(
            session_id = session_id.unwrap_or(NO_SESSION_SENTINEL),
            "Amplitude Session ID: {}",
            session_id.unwrap_or(NO_SESSION_SENTINEL)
        );
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("key", &self.key)
            .field("min_session_gap", &self.min_session_gap)
            .field("active", &self.active)
            .field("source", &self.source)
            .field("last_event_time", &self.last_event_time)
            .finish_non_exhaustive()
    }
}

impl EventPlugin for SessionManager {
    fn key(&self) -> &str {
        &self.key
    }

    fn plugin_type(&self) -> PluginType {
        PluginType::Enrichment
    }

    fn update(&mut self, settings: &Settings, _update_type: UpdateType) {
        let enabled = settings.has_integration_settings(&self.key);
        self.set_active(enabled);
    }

    fn execute(&mut self, event: Event) -> Option<Event> {
        Some(self.tag_event(event))
    }

    fn reset(&mut self) {
        self.reset_session();
    }
}

impl Lifecycle for SessionManager {
    fn on_foreground_resume(&mut self) {
        self.resume();
    }

    fn on_background_pause(&mut self) {}
}

impl VersionedPlugin for SessionManager {
    fn version() -> &'static str {
        VERSION
    }
}

/// Builder for a [`SessionManager`] with non-default parts.
#[derive(Default)]
pub struct SessionManagerBuilder {
    config: SessionConfig,
    clock: Option<Arc<dyn Clock>>,
    provider: Option<Box<dyn SessionIdProvider>>,
}

impl SessionManagerBuilder {
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn provider(mut self, provider: impl SessionIdProvider + 'static) -> Self {
        self.provider = Some(Box::new(provider));
        self
    }

    /// Validate the configuration and construct the manager.
    pub fn build(self) -> Result<SessionManager> {
        let config = self.config.validated()?;
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        Ok(SessionManager::from_parts(config, clock, self.provider))
    }
}
