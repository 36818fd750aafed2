//! Amplitude session replay tool
//!
//! Reads newline-delimited JSON from stdin (events, lifecycle signals,
//! settings deliveries, resets), runs them through a `SessionManager`, and
//! writes every resulting event as one JSON line on stdout.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::signal;
use tracing::{info, warn};

use session_core::{Replayer, SessionConfig, SessionManager};
use telemetry::init_tracing_from_env;

/// Application configuration.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default)]
    session: SessionConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing_from_env();

    info!("Starting amplitude-session v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;
    info!(
        key = %config.session.integration_key,
        min_session_gap_secs = config.session.min_session_gap_secs,
        "Loaded session config"
    );

    let manager = SessionManager::builder()
        .config(config.session)
        .build()
        .context("Invalid session configuration")?;
    let mut replayer = Replayer::new(manager);

    tokio::select! {
        result = replay_stdin(&mut replayer) => result?,
        _ = shutdown_signal() => {
            info!("Received Ctrl+C signal");
        }
    }

    let stats = replayer.stats();
    info!(
        events = stats.events,
        tagged = stats.tagged,
        resumes = stats.resumes,
        "Replay complete"
    );
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // e.g. AMPLITUDE_SESSION__SESSION__MIN_SESSION_GAP_SECS=60
        .add_source(
            config::Environment::with_prefix("AMPLITUDE_SESSION")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    config
        .try_deserialize()
        .context("Failed to deserialize configuration")
}

async fn replay_stdin(replayer: &mut Replayer) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut line_no: u64 = 0;

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match replayer.apply_line(line) {
            Ok(Some(event)) => {
                let mut out = event.to_json()?;
                out.push('\n');
                stdout
                    .write_all(out.as_bytes())
                    .await
                    .context("Failed to write stdout")?;
            }
            Ok(None) => {}
            Err(e) => {
                warn!(line = line_no, code = e.code(), error = %e, "Skipping malformed line");
            }
        }
    }

    stdout.flush().await.context("Failed to flush stdout")?;
    Ok(())
}

/// Resolves on Ctrl+C.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}
