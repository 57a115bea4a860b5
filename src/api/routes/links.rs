//! Link batch handlers: submission and report rendering.

use super::{CheckLinksRequest, CheckLinksResponse, ReportRequest};
use crate::api::AppState;
use crate::error::Result;
use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

/// POST /getjson - Probe a batch of links and store the results
#[utoipa::path(
    post,
    path = "/getjson",
    tag = "links",
    request_body = CheckLinksRequest,
    responses(
        (status = 200, description = "Probe results and the new batch id", body = CheckLinksResponse),
        (status = 400, description = "Malformed or empty submission", body = crate::error::ApiError),
        (status = 503, description = "Shutdown in progress", body = crate::error::ApiError)
    )
)]
pub async fn check_links(
    State(state): State<AppState>,
    Json(req): Json<CheckLinksRequest>,
) -> Result<impl IntoResponse> {
    let (id, links) = state.checker.submit(req.links).await?;

    Ok((
        StatusCode::OK,
        Json(CheckLinksResponse {
            links,
            links_num: id,
        }),
    ))
}

/// POST /getpdf - Render stored batches into a printable report
///
/// Stale batches are re-probed before rendering; identifiers that do not
/// resolve to a stored batch are skipped without an error.
#[utoipa::path(
    post,
    path = "/getpdf",
    tag = "links",
    request_body = ReportRequest,
    responses(
        (status = 200, description = "Printable report document"),
        (status = 400, description = "Malformed request body", body = crate::error::ApiError),
        (status = 500, description = "Report rendering failed", body = crate::error::ApiError)
    )
)]
pub async fn render_report(
    State(state): State<AppState>,
    Json(req): Json<ReportRequest>,
) -> Result<Response> {
    let report = state.checker.render_report(&req.links_list).await?;

    let headers = [
        (header::CONTENT_TYPE, report.content_type.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", report.filename),
        ),
    ];

    Ok((StatusCode::OK, headers, report.bytes).into_response())
}
