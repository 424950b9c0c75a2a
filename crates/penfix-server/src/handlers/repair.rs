//! Repair handler.

use axum::Json;

use crate::error::ApiError;
use crate::schema::repair::{RepairRequest, RepairResponse};

/// Runs the pipeline described by `options` over `text`.
///
/// `POST /repair`
pub async fn repair(Json(req): Json<RepairRequest>) -> Result<Json<RepairResponse>, ApiError> {
    let pipeline = req.options.build();
    let trace = pipeline.run_traced(&req.text);
    let changed = trace.output != req.text;

    let response = if req.trace {
        RepairResponse {
            output: trace.output,
            changed,
            rounds: Some(trace.rounds),
            changed_passes: Some(trace.changed_passes),
        }
    } else {
        RepairResponse {
            output: trace.output,
            changed,
            rounds: None,
            changed_passes: None,
        }
    };
    Ok(Json(response))
}
