use penfix_check::StructuralReport;
use serde::{Deserialize, Serialize};

/// Request body for `POST /check`.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckRequest {
    pub text: String,
    /// Sanitize before checking.
    #[serde(default)]
    pub repair: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckResponse {
    pub clean: bool,
    pub report: StructuralReport,
}
