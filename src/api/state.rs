//! Application state for the API server

use crate::{Config, LinkChecker};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Shared application state accessible to all route handlers
///
/// This struct is cloned for each request (cheap Arc clones) and provides
/// access to the checker, the configuration, and the shutdown token.
#[derive(Clone)]
pub struct AppState {
    /// The link checker instance
    pub checker: Arc<LinkChecker>,

    /// Configuration (read access)
    pub config: Arc<Config>,

    /// Cancellation token driving graceful shutdown of the whole process
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Create a new AppState
    pub fn new(checker: Arc<LinkChecker>, config: Arc<Config>, shutdown: CancellationToken) -> Self {
        Self {
            checker,
            config,
            shutdown,
        }
    }
}
