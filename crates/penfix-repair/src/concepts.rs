//! Repairs to node headers: multi-word concepts, repeated `/ concept`
//! bindings, and slashes with no concept after them.

use penfix_core::surface::{
    is_role_name_char, is_word_char, skip_hspace, skip_ws, token_end,
};

use crate::fixpoint::fixpoint;

fn ends_concept(c: char) -> bool {
    matches!(c, ':' | '/' | '(' | ')' | '\n' | '\r')
}

/// Joins the words of a concept with underscores.
///
/// The text after each `/` up to the next `:`, `/`, paren or line end is
/// trimmed and its inner whitespace runs become `_`, so `/ duy nhất :mod`
/// becomes `/ duy_nhất :mod`. Whitespace after the concept is kept.
pub fn join_multiword_concepts(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '/' {
            out.push(chars[i]);
            i += 1;
            continue;
        }

        let mut end = i + 1;
        while end < chars.len() && !ends_concept(chars[end]) {
            end += 1;
        }
        let segment: String = chars[i + 1..end].iter().collect();
        let words: Vec<&str> = segment.split_whitespace().collect();

        out.push('/');
        if words.is_empty() {
            out.push_str(&segment);
        } else {
            out.push(' ');
            out.push_str(&words.join("_"));
            let trailing = segment.len() - segment.trim_end().len();
            out.push_str(&segment[segment.len() - trailing..]);
        }
        i = end;
    }

    out
}

fn collapse_headers_once(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;

    while i < chars.len() {
        let Some(concept_end) = header_concept_end(&chars, i) else {
            out.push(chars[i]);
            i += 1;
            continue;
        };

        out.extend(&chars[i..concept_end]);
        let mut cursor = concept_end;
        loop {
            let slash = skip_ws(&chars, cursor);
            if chars.get(slash) != Some(&'/') {
                break;
            }
            let start = skip_ws(&chars, slash + 1);
            let end = token_end(&chars, start);
            if end == start {
                break;
            }
            cursor = end;
        }
        i = cursor;
    }

    out
}

/// If `(var / concept` starts at `open`, the index just past the concept.
fn header_concept_end(chars: &[char], open: usize) -> Option<usize> {
    if chars[open] != '(' {
        return None;
    }
    let var_start = skip_ws(chars, open + 1);
    let mut var_end = var_start;
    while var_end < chars.len() && is_word_char(chars[var_end]) {
        var_end += 1;
    }
    if var_end == var_start {
        return None;
    }
    let slash = skip_ws(chars, var_end);
    if chars.get(slash) != Some(&'/') {
        return None;
    }
    let concept_start = skip_ws(chars, slash + 1);
    let concept_end = token_end(chars, concept_start);
    (concept_end > concept_start).then_some(concept_end)
}

/// Keeps only the first binding of a node header:
/// `(v / a / b :mod ...)` becomes `(v / a :mod ...)`. Runs to a fixpoint.
pub fn collapse_duplicate_headers(input: &str) -> String {
    fixpoint(input, collapse_headers_once)
}

/// Deletes a `/` (and the spaces after it) when no concept follows: before
/// `)`, a role, a line end, or the end of the text.
pub fn strip_orphan_slashes(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '/' {
            out.push(chars[i]);
            i += 1;
            continue;
        }
        let next = skip_hspace(&chars, i + 1);
        let orphan = match chars.get(next) {
            None => true,
            Some(')') | Some('\n') | Some('\r') => true,
            Some(':') => chars.get(next + 1).is_some_and(|&c| is_role_name_char(c)),
            Some(_) => false,
        };
        if orphan {
            i = next;
        } else {
            out.push('/');
            i += 1;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_multiword_concept() {
        assert_eq!(
            join_multiword_concepts("(d / duy   nhất :mod (a / anh hùng lao động))"),
            "(d / duy_nhất :mod (a / anh_hùng_lao_động))"
        );
    }

    #[test]
    fn join_normalizes_missing_space() {
        assert_eq!(join_multiword_concepts("(a /alpha)"), "(a / alpha)");
    }

    #[test]
    fn join_stops_at_line_end() {
        assert_eq!(
            join_multiword_concepts("(a / big dog\n    :mod (b / very red))"),
            "(a / big_dog\n    :mod (b / very_red))"
        );
    }

    #[test]
    fn join_leaves_orphan_slash() {
        assert_eq!(join_multiword_concepts("(c / chỗ :mod (đ / ) )"), "(c / chỗ :mod (đ / ) )");
    }

    #[test]
    fn join_is_idempotent() {
        let once = join_multiword_concepts("(a / x y z :b (c / d e");
        assert_eq!(join_multiword_concepts(&once), once);
    }

    #[test]
    fn collapses_duplicate_header() {
        assert_eq!(
            collapse_duplicate_headers("(n3 / núi / hehe :mod (a / a))"),
            "(n3 / núi :mod (a / a))"
        );
    }

    #[test]
    fn collapses_many_repeated_bindings() {
        assert_eq!(
            collapse_duplicate_headers("(x / a / b / c / d :mod (y / e / f))"),
            "(x / a :mod (y / e))"
        );
    }

    #[test]
    fn header_collapse_terminates_on_adversarial_input() {
        let input = "(v / c ".to_string() + &"/ d ".repeat(500) + ")";
        assert_eq!(collapse_duplicate_headers(&input), "(v / c )");
    }

    #[test]
    fn strips_orphan_slashes() {
        assert_eq!(strip_orphan_slashes("(c / chỗ :mod (đ / ) )"), "(c / chỗ :mod (đ ) )");
        assert_eq!(strip_orphan_slashes("(a / :mod (b / c))"), "(a :mod (b / c))");
        assert_eq!(strip_orphan_slashes("(a /"), "(a ");
        assert_eq!(strip_orphan_slashes("(a /\n)"), "(a \n)");
    }

    #[test]
    fn keeps_slash_before_concept() {
        let clean = "(a / alpha :mod (b / beta))";
        assert_eq!(strip_orphan_slashes(clean), clean);
    }
}
