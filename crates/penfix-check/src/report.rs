use serde::{Deserialize, Serialize};

use crate::envelope::{extract_answer, well_formed_tag};
use crate::predicates::{balanced, duplicate_variables, naming_convention};

/// Every structural check for one text, computed together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralReport {
    /// A non-empty `<answer>` pair wraps the graph.
    pub well_formed_tag: bool,
    pub balanced: bool,
    pub unique_variables: bool,
    /// Variables defined more than once.
    pub duplicate_variables: Vec<String>,
    pub naming_convention: bool,
}

impl StructuralReport {
    /// All graph-level checks pass. The envelope is not considered.
    pub fn is_clean(&self) -> bool {
        self.balanced && self.unique_variables && self.naming_convention
    }
}

/// Checks `text`, which may be bare graph text or full model output. When
/// an `<answer>` pair is present the graph checks run on its content.
pub fn check_text(text: &str) -> StructuralReport {
    check_prepared(text, str::to_string)
}

/// Like [`check_text`], but the graph is passed through `prepare` (a
/// repair pipeline, typically) before the graph checks. The envelope is
/// always judged on the raw text.
pub fn check_prepared<F>(text: &str, prepare: F) -> StructuralReport
where
    F: FnOnce(&str) -> String,
{
    let graph = prepare(extract_answer(text).unwrap_or_else(|| text.trim()));
    let duplicate_variables = duplicate_variables(&graph);
    StructuralReport {
        well_formed_tag: well_formed_tag(text),
        balanced: balanced(&graph),
        unique_variables: duplicate_variables.is_empty(),
        duplicate_variables,
        naming_convention: naming_convention(&graph),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use penfix_repair::RepairPipeline;

    #[test]
    fn reports_on_answer_content() {
        let report = check_text("<answer>(b / bi_kịch :domain (c / chỗ :mod (đ / đó)))</answer>");
        assert!(report.well_formed_tag);
        assert!(report.is_clean());
    }

    #[test]
    fn reports_on_bare_graph() {
        let report = check_text("(a / alpha :mod (a / ant)");
        assert!(!report.well_formed_tag);
        assert!(!report.balanced);
        assert!(!report.unique_variables);
        assert_eq!(report.duplicate_variables, vec!["a"]);
        assert!(report.naming_convention);
    }

    #[test]
    fn repair_output_is_balanced() {
        let repaired = RepairPipeline::sanitize().run("(a / alpha)) :mod (b / beta / bird");
        let report = check_text(&repaired);
        assert!(report.balanced);
        assert!(report.unique_variables);
    }

    #[test]
    fn prepared_graph_keeps_envelope_verdict() {
        let text = "<answer>(a / alpha :ARG0 (b / beta</answer>";
        let report = check_prepared(text, |graph| RepairPipeline::sanitize().run(graph));
        assert!(report.well_formed_tag);
        assert!(report.balanced);
        assert!(!check_text(text).balanced);
    }

    #[test]
    fn serializes_flat() {
        let json = serde_json::to_value(check_text("(a / alpha)")).unwrap();
        assert_eq!(json["balanced"], true);
        assert_eq!(json["duplicate_variables"], serde_json::json!([]));
    }
}
