//! Structural check handler.

use axum::Json;
use penfix_check::{check_prepared, check_text};

use crate::error::ApiError;
use crate::schema::check::{CheckRequest, CheckResponse};

/// `POST /check`. With `repair`, the graph is sanitized before the graph
/// checks; the envelope is judged as sent.
pub async fn check(Json(req): Json<CheckRequest>) -> Result<Json<CheckResponse>, ApiError> {
    let report = if req.repair {
        check_prepared(&req.text, penfix_repair::sanitize)
    } else {
        check_text(&req.text)
    };
    Ok(Json(CheckResponse {
        clean: report.is_clean(),
        report,
    }))
}
