//! REST API server module
//!
//! Provides the HTTP surface over [`LinkChecker`]: batch submission,
//! report rendering, health, and lifecycle endpoints, plus an OpenAPI
//! specification.

use crate::{Config, Error, LinkChecker, Result};
use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod error_response;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::AppState;

/// Create the API router with all route definitions
///
/// # Routes
///
/// ## Links
/// - `POST /getjson` - Probe a batch of links, store it, return results + batch id
/// - `POST /getpdf` - Render stored batches into a printable report
///
/// ## System
/// - `GET /health` - Health check
/// - `GET /openapi.json` - OpenAPI specification
/// - `GET /swagger-ui` - Interactive Swagger UI documentation (if enabled)
/// - `POST /shutdown` - Graceful shutdown
pub fn create_router(
    checker: Arc<LinkChecker>,
    config: Arc<Config>,
    shutdown: CancellationToken,
) -> Router {
    let state = AppState::new(checker, config.clone(), shutdown);

    let router = Router::new()
        // Links
        .route("/getjson", post(routes::check_links))
        .route("/getpdf", post(routes::render_report))
        // System
        .route("/health", get(routes::health_check))
        .route("/openapi.json", get(routes::openapi_spec))
        .route("/shutdown", post(routes::shutdown));

    // Merge Swagger UI routes if enabled in config (before applying state)
    let router = if config.server.swagger_ui {
        router.merge(SwaggerUi::new("/swagger-ui").url("/openapi.json", ApiDoc::openapi()))
    } else {
        router
    };

    let router = router.with_state(state).layer(TraceLayer::new_for_http());

    // Apply CORS middleware if enabled in config
    if config.server.cors_enabled {
        let cors = build_cors_layer(&config.server.cors_origins);
        router.layer(cors)
    } else {
        router
    }
}

/// Build a CORS layer based on configured origins
///
/// `origins` is the list of allowed origins; `"*"` (or an empty list)
/// allows any origin.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_any = origins.iter().any(|o| o == "*");

    if allow_any || origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Start the API server on the configured bind address.
///
/// Binds a TCP listener and serves the router until `shutdown` is
/// cancelled. After cancellation the server stops accepting connections
/// and in-flight requests get the configured grace period to finish;
/// whatever is still running after that is dropped.
///
/// # Errors
///
/// Fails if the listener cannot bind (a fatal startup error) or if the
/// server loop itself errors out.
pub async fn start_api_server(
    checker: Arc<LinkChecker>,
    config: Arc<Config>,
    shutdown: CancellationToken,
) -> Result<()> {
    let bind_address = config.server.bind_address;
    let grace = config.server.shutdown_grace();

    tracing::info!(
        address = %bind_address,
        "Starting API server"
    );

    let app = create_router(checker, config, shutdown.clone());

    let listener = TcpListener::bind(bind_address).await.map_err(Error::Io)?;

    tracing::info!(
        address = %bind_address,
        "API server listening"
    );

    let graceful = {
        let shutdown = shutdown.clone();
        async move { shutdown.cancelled().await }
    };
    let server = axum::serve(listener, app).with_graceful_shutdown(graceful);

    tokio::select! {
        res = server => {
            res.map_err(|e| Error::ApiServerError(e.to_string()))?;
        }
        _ = async {
            shutdown.cancelled().await;
            tokio::time::sleep(grace).await;
        } => {
            tracing::warn!(
                grace_secs = grace.as_secs(),
                "Shutdown grace period expired, dropping remaining connections"
            );
        }
    }

    tracing::info!("API server stopped");
    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
