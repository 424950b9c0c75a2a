use penfix_repair::RepairOptions;
use serde::{Deserialize, Serialize};

/// Request body for `POST /repair`.
#[derive(Debug, Clone, Deserialize)]
pub struct RepairRequest {
    pub text: String,
    #[serde(default)]
    pub options: RepairOptions,
    /// Include round count and the passes that fired.
    #[serde(default)]
    pub trace: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RepairResponse {
    pub output: String,
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rounds: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changed_passes: Option<Vec<String>>,
}
