//! Test context: a session manager on a fake clock.

use std::sync::Arc;

use session_core::{
    EventPlugin, FakeClock, SessionConfig, SessionIdProvider, SessionManager, Settings,
    UpdateType, DEFAULT_INTEGRATION_KEY,
};

pub struct TestContext {
    pub clock: FakeClock,
    pub manager: SessionManager,
}

impl TestContext {
    /// Active manager with default config and internally minted ids.
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    pub fn with_config(config: SessionConfig) -> Self {
        Self::on_clock(FakeClock::new(), config)
    }

    /// Active manager whose clock starts at `ms` since the epoch.
    pub fn at_epoch_ms(ms: i64) -> Self {
        Self::on_clock(FakeClock::at_epoch_ms(ms), SessionConfig::default())
    }

    fn on_clock(clock: FakeClock, config: SessionConfig) -> Self {
        let manager = SessionManager::builder()
            .config(config)
            .clock(Arc::new(clock.clone()))
            .build()
            .expect("valid test config");
        Self::activated(clock, manager)
    }

    /// Active manager taking ids from `provider`.
    pub fn with_provider(provider: impl SessionIdProvider + 'static) -> Self {
        let clock = FakeClock::new();
        let manager = SessionManager::builder()
            .clock(Arc::new(clock.clone()))
            .provider(provider)
            .build()
            .expect("valid test config");
        Self::activated(clock, manager)
    }

    fn activated(clock: FakeClock, mut manager: SessionManager) -> Self {
        manager.update(
            &Settings::with_integration(DEFAULT_INTEGRATION_KEY),
            UpdateType::Initial,
        );
        Self { clock, manager }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
