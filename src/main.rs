//! linkcheckd service binary.
//!
//! Wires configuration, logging, snapshot restore, the optional stale
//! batch reaper, and the API server together, and coordinates the
//! graceful shutdown sequence: stop accepting submissions, drain in-flight
//! requests within the grace period, then write the snapshot.

use linkcheckd::{BatchStore, Config, LinkChecker, api, store};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "linkcheckd failed to start");
        std::process::exit(1);
    }
}

async fn run() -> linkcheckd::Result<()> {
    let config_path =
        std::env::var("LINKCHECKD_CONFIG").unwrap_or_else(|_| "linkcheckd.toml".to_string());
    let config = Arc::new(Config::load(&config_path)?);

    let batch_store = Arc::new(BatchStore::new(config.store.ttl()));

    // A malformed snapshot is surfaced to the operator but does not stop
    // the service; it starts with an empty store instead.
    if let Err(e) = batch_store.load(&config.store.snapshot_path) {
        tracing::error!(error = %e, "Failed to restore snapshot, starting with an empty store");
    }

    let checker = Arc::new(LinkChecker::new(batch_store.clone(), config.clone())?);
    let shutdown = CancellationToken::new();

    tokio::spawn({
        let shutdown = shutdown.clone();
        let checker = checker.clone();
        async move {
            linkcheckd::wait_for_signal().await;
            checker.begin_shutdown();
            shutdown.cancel();
        }
    });

    let reaper = config
        .store
        .reap_after_ttl_multiples
        .map(|multiples| store::spawn_reaper(batch_store.clone(), multiples, shutdown.clone()));

    api::start_api_server(checker.clone(), config.clone(), shutdown.clone()).await?;

    // The server has drained; persist the store before exiting. A failed
    // write is logged and does not block the rest of the shutdown.
    if let Err(e) = checker.shutdown() {
        tracing::error!(error = %e, "Failed to save snapshot during shutdown");
    }

    if let Some(reaper) = reaper {
        let _ = reaper.await;
    }

    tracing::info!("linkcheckd exiting");
    Ok(())
}
