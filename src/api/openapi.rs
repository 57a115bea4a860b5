//! OpenAPI documentation and schema generation
//!
//! This module defines the OpenAPI specification for the linkcheckd REST
//! API using utoipa for compile-time spec generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the linkcheckd REST API
///
/// The spec can be accessed via:
/// - `/openapi.json` - JSON format OpenAPI specification
/// - `/swagger-ui` - Interactive Swagger UI documentation (if enabled)
#[derive(OpenApi)]
#[openapi(
    info(
        title = "linkcheckd REST API",
        version = "0.1.0",
        description = "REST API for probing link availability, caching result batches with a TTL, and rendering printable reports",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        // Links
        crate::api::routes::check_links,
        crate::api::routes::render_report,

        // System
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
        crate::api::routes::shutdown,
    ),
    components(
        schemas(
            crate::types::LinkStatus,
            crate::types::LinkInfo,
            crate::types::BatchId,
            crate::api::routes::CheckLinksRequest,
            crate::api::routes::CheckLinksResponse,
            crate::api::routes::ReportRequest,
            crate::error::ApiError,
            crate::error::ErrorDetail,
        )
    ),
    tags(
        (name = "links", description = "Batch submission and report rendering"),
        (name = "system", description = "Health and lifecycle")
    )
)]
pub struct ApiDoc;
