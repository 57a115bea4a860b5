//! # linkcheckd
//!
//! Backend library for a link availability checking service.
//!
//! A submitted batch of URLs is probed concurrently, each URL resolving to
//! an available/unavailable status. The results are cached under a
//! monotonically increasing batch id with a fixed time-to-live; retrieving
//! a stale batch transparently re-probes the stored URLs and refreshes the
//! cache entry in place. Stored batches can be rendered into a printable
//! report, and the whole store survives restarts through a JSON snapshot
//! written on shutdown.
//!
//! ## Design Philosophy
//!
//! - **Library-first** - The REST surface in [`api`] is a thin layer over
//!   [`LinkChecker`]; everything is usable without the server
//! - **Sensible defaults** - [`Config::default()`] works out of the box
//! - **Failure absorption** - A probe never fails loudly; every network or
//!   parse problem collapses into [`LinkStatus::Unavailable`]
//!
//! ## Quick Start
//!
//! ```no_run
//! use linkcheckd::{BatchStore, Config, LinkChecker};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Arc::new(Config::default());
//!     let store = Arc::new(BatchStore::new(config.store.ttl()));
//!     let checker = Arc::new(LinkChecker::new(store, config)?);
//!
//!     let (id, links) = checker.submit(vec!["example.com".to_string()]).await?;
//!     println!("batch {}: {:?}", id, links);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Core link checking orchestration
pub mod checker;
/// Probe outcome classification
pub mod classify;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Report rendering
pub mod report;
/// TTL-keyed batch store with snapshot persistence
pub mod store;
/// Core types
pub mod types;

// Re-export commonly used types
pub use checker::LinkChecker;
pub use config::{Config, ProbeConfig, ServerConfig, StoreConfig};
pub use error::{ApiError, Error, ErrorDetail, Result, ToHttpStatus};
pub use report::{RenderedReport, ReportRenderer, TextReportRenderer};
pub use store::BatchStore;
pub use types::{Batch, BatchId, LinkInfo, LinkStatus};

/// Wait for a termination signal.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal
///   registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
#[cfg(unix)]
pub async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Signal registration may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

/// Wait for a termination signal (Ctrl+C on non-Unix platforms).
#[cfg(not(unix))]
pub async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
