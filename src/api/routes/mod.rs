//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`links`] — Batch submission and report rendering
//! - [`system`] — Health, OpenAPI, shutdown

use crate::types::{BatchId, LinkInfo};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

mod links;
mod system;

// Re-export all handlers so `routes::function_name` continues to work
pub use links::*;
pub use system::*;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for POST /getjson
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CheckLinksRequest {
    /// URLs to probe, in the order results should be returned
    pub links: Vec<String>,
}

/// Response for POST /getjson
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CheckLinksResponse {
    /// Probe results, same order as the submitted URLs
    pub links: Vec<LinkInfo>,
    /// Identifier of the newly stored batch. The field name is a wire
    /// format legacy: it carries the batch id, not a count.
    pub links_num: BatchId,
}

/// Request body for POST /getpdf
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ReportRequest {
    /// Batch identifiers to include in the report; unknown ids are
    /// skipped silently
    pub links_list: Vec<BatchId>,
}
