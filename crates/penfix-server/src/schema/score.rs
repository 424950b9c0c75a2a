use penfix_score::{RewardWeights, ScoreBreakdown};
use serde::{Deserialize, Serialize};

/// Request body for `POST /score`.
///
/// `completions[i]` is scored against `answers[i]`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreRequest {
    pub completions: Vec<String>,
    pub answers: Vec<String>,
    #[serde(default)]
    pub weights: Option<RewardWeights>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreResponse {
    pub scores: Vec<ScoreBreakdown>,
    /// Mean total reward; 0 for an empty batch.
    pub mean: f64,
}
