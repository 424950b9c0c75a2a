//! Reward scoring handler.

use axum::extract::State;
use axum::Json;
use penfix_score::{CompositeScorer, RewardWeights, TripleMatcher};

use crate::error::ApiError;
use crate::schema::score::{ScoreRequest, ScoreResponse};
use crate::state::AppState;

fn validate_weights(weights: &RewardWeights) -> Result<(), ApiError> {
    let terms = [
        ("format", weights.format),
        ("balanced", weights.balanced),
        ("unique_variables", weights.unique_variables),
        ("naming", weights.naming),
        ("smatch", weights.smatch),
    ];
    for (name, value) in terms {
        if !value.is_finite() || value < 0.0 {
            return Err(ApiError::BadRequest(format!(
                "weight '{}' must be a finite non-negative number, got {}",
                name, value
            )));
        }
    }
    Ok(())
}

/// Scores each completion against the answer at the same index.
///
/// `POST /score`. The batch runs on the blocking pool with its own matcher,
/// after taking one of the server's scoring slots.
pub async fn score(
    State(state): State<AppState>,
    Json(req): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, ApiError> {
    if req.completions.len() != req.answers.len() {
        return Err(ApiError::BadRequest(format!(
            "got {} completions but {} answers",
            req.completions.len(),
            req.answers.len()
        )));
    }
    let weights = req.weights.unwrap_or_default();
    validate_weights(&weights)?;

    let _permit = state
        .scoring_slots
        .clone()
        .acquire_owned()
        .await
        .map_err(|e| ApiError::InternalError(format!("scoring slots closed: {}", e)))?;

    let ScoreRequest {
        completions,
        answers,
        ..
    } = req;
    let scores = tokio::task::spawn_blocking(move || {
        let mut scorer = CompositeScorer::new(TripleMatcher::new()).with_weights(weights);
        scorer.score_batch(
            completions
                .iter()
                .zip(answers.iter())
                .map(|(c, a)| (c.as_str(), a.as_str())),
        )
    })
    .await
    .map_err(|e| ApiError::InternalError(format!("scoring task failed: {}", e)))?;

    let mean = if scores.is_empty() {
        0.0
    } else {
        scores.iter().map(|s| s.total).sum::<f64>() / scores.len() as f64
    };
    tracing::debug!(pairs = scores.len(), mean, "scored batch");

    Ok(Json(ScoreResponse { scores, mean }))
}
