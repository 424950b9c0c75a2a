//! The `<think>` / `<answer>` envelope around model output.

const ANSWER_OPEN: &str = "<answer>";
const ANSWER_CLOSE: &str = "</answer>";
const THINK_OPEN: &str = "<think>";
const THINK_CLOSE: &str = "</think>";

fn answer_span(text: &str) -> Option<&str> {
    let start = text.find(ANSWER_OPEN)? + ANSWER_OPEN.len();
    let len = text[start..].find(ANSWER_CLOSE)?;
    Some(&text[start..start + len])
}

/// Content of the first `<answer>…</answer>` pair, trimmed. Spans lines.
pub fn extract_answer(text: &str) -> Option<&str> {
    answer_span(text).map(str::trim)
}

/// Whether an `<answer>…</answer>` pair exists, empty or not.
pub fn has_answer_tag(text: &str) -> bool {
    answer_span(text).is_some()
}

/// Whether an `<answer>…</answer>` pair exists with non-blank content.
pub fn well_formed_tag(text: &str) -> bool {
    extract_answer(text).is_some_and(|answer| !answer.is_empty())
}

/// Removes every `<think>…</think>` segment. An unclosed segment runs to
/// the end of the text.
pub fn strip_think(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find(THINK_OPEN) {
        out.push_str(&rest[..open]);
        let after = &rest[open + THINK_OPEN.len()..];
        match after.find(THINK_CLOSE) {
            Some(close) => rest = &after[close + THINK_CLOSE.len()..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_answer() {
        let text = "<think>plan</think>\n<answer>\n(a / alpha)\n</answer><answer>(b / beta)</answer>";
        assert_eq!(extract_answer(text), Some("(a / alpha)"));
    }

    #[test]
    fn answer_spans_lines() {
        let text = "<answer>(a / alpha\n    :mod (b / beta))</answer>";
        assert_eq!(extract_answer(text), Some("(a / alpha\n    :mod (b / beta))"));
    }

    #[test]
    fn missing_or_unclosed_answer() {
        assert_eq!(extract_answer("(a / alpha)"), None);
        assert_eq!(extract_answer("<answer>(a / alpha)"), None);
        assert!(!has_answer_tag("</answer><answer>"));
    }

    #[test]
    fn empty_answer_is_tagged_but_not_well_formed() {
        assert!(has_answer_tag("<answer>  </answer>"));
        assert!(!well_formed_tag("<answer>  </answer>"));
        assert!(well_formed_tag("<answer>(x / x)</answer>"));
    }

    #[test]
    fn strips_think_segments() {
        assert_eq!(
            strip_think("<think>a</think>keep<think>b</think> this"),
            "keep this"
        );
        assert_eq!(strip_think("before<think>never closed"), "before");
        assert_eq!(strip_think("plain"), "plain");
    }
}
