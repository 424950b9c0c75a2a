use penfix_core::{Action, DecodeWarning};
use serde::{Deserialize, Serialize};

/// Request body for `POST /actions`.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionsRequest {
    pub text: String,
    #[serde(default)]
    pub repair: bool,
}

/// Linearization of one graph.
///
/// `rendered` holds the same actions as `SHIFT(..)` / `ARC(..)` /
/// `REDUCE(..)` strings.
#[derive(Debug, Clone, Serialize)]
pub struct ActionsResponse {
    pub actions: Vec<Action>,
    pub rendered: Vec<String>,
    pub warnings: Vec<DecodeWarning>,
    pub node_count: usize,
    pub edge_count: usize,
}
