//! Chameleon bridge host entry point.
//!
//! Serves the `chameleon_ultra` platform channel as JSON lines: requests on
//! stdin, responses and notifications on stdout, logs on stderr.
//!
//! ## Runtime note
//!
//! `Dispatcher::dispatch` blocks for the backend's duration, so every call
//! runs on `spawn_blocking`. Calls may overlap; the device handle serialises
//! them onto the transport.

mod server;
mod settings;
mod state;
mod transport;

use std::sync::Arc;

use chameleon_core::{DeviceHandle, Dispatcher, MockDevice};
use settings::{default_settings_path, load_settings};
use state::BridgeState;
use tokio::io::BufReader;
use tracing::{info, warn};

const DEFAULT_LOG_FILTER: &str = "chameleon_bridge=info,chameleon_core=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Tracing (stdout carries the protocol) ─────────────────────────────
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    info!("Chameleon bridge starting");

    let settings_path = default_settings_path();
    let settings = load_settings(&settings_path);
    let (connect_latency, command_latency, detect_latency) = settings.latency_summary();
    info!(
        settings_path = ?settings_path,
        channel = %settings.channel_name,
        default_port = %settings.default_port,
        default_baud_rate = settings.default_baud_rate,
        require_connection = settings.require_connection,
        ?connect_latency,
        ?command_latency,
        ?detect_latency,
        "bridge settings loaded"
    );

    // ── Dispatcher setup ──────────────────────────────────────────────────
    let device = DeviceHandle::new(MockDevice::new(settings.mock_config()));
    let dispatcher = Arc::new(Dispatcher::new(settings.bridge_config(), device));
    if !dispatcher.initialize() {
        warn!("continuing with uninitialized device backend");
    }

    let state = Arc::new(BridgeState::new(dispatcher));
    server::serve(
        Arc::clone(&state),
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await?;

    let diag = state.diagnostics_snapshot();
    info!(
        calls_total = diag.calls_total,
        calls_failed = diag.calls_failed,
        calls_not_implemented = diag.calls_not_implemented,
        frames_malformed = diag.frames_malformed,
        notifications_forwarded = diag.notifications_forwarded,
        notifications_lagged = diag.notifications_lagged,
        "bridge diagnostics snapshot on exit"
    );
    Ok(())
}
