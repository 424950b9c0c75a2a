//! Role-level repairs: dangling roles, empty groups and duplicate references.

use std::collections::{BTreeSet, HashSet};
use std::ops::Range;

use penfix_core::surface::{
    bare_references, delete_ranges, is_role_name_char, role_marker_end, skip_hspace, skip_ws,
    token_end,
};
use serde::{Deserialize, Serialize};

use crate::fixpoint::fixpoint;
use crate::parens::trim_stray_closing_lines;

/// Which roles an opt-in repair applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "roles", rename_all = "snake_case")]
pub enum RoleFilter {
    #[default]
    AllRoles,
    /// Role names without the leading colon.
    OnlyRoles(BTreeSet<String>),
}

impl RoleFilter {
    /// Restricts to `roles`; names may be written with or without `:`.
    pub fn only<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        RoleFilter::OnlyRoles(
            roles
                .into_iter()
                .map(|r| r.as_ref().trim().trim_start_matches(':').to_string())
                .filter(|r| !r.is_empty())
                .collect(),
        )
    }

    /// Whether `role` (with or without `:`) is covered.
    pub fn matches(&self, role: &str) -> bool {
        match self {
            RoleFilter::AllRoles => true,
            RoleFilter::OnlyRoles(roles) => roles.contains(role.trim_start_matches(':')),
        }
    }
}

fn is_dangling(chars: &[char], role_end: usize) -> bool {
    let next = skip_ws(chars, role_end);
    match chars.get(next) {
        None | Some(')') => true,
        Some(':') => role_marker_end(chars, next).is_some(),
        Some(_) => false,
    }
}

/// True when the group opening at `open` is the value of a role.
fn is_role_value(chars: &[char], open: usize) -> bool {
    let mut end = open;
    while end > 0 && chars[end - 1].is_whitespace() {
        end -= 1;
    }
    let mut start = end;
    while start > 0 && is_role_name_char(chars[start - 1]) {
        start -= 1;
    }
    start > 0 && start < end && role_marker_end(chars, start - 1) == Some(end)
}

/// `()` anywhere, or `(tok)` holding a single bare token as a role value.
fn empty_group(chars: &[char], open: usize) -> Option<Range<usize>> {
    if chars[open] != '(' {
        return None;
    }
    let inner = skip_ws(chars, open + 1);
    if chars.get(inner) == Some(&')') {
        return Some(open..inner + 1);
    }
    let tok_end = token_end(chars, inner);
    if tok_end == inner {
        return None;
    }
    let close = skip_ws(chars, tok_end);
    (chars.get(close) == Some(&')') && is_role_value(chars, open)).then_some(open..close + 1)
}

fn remove_empty_roles_once(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut ranges = Vec::new();

    for i in 0..chars.len() {
        if let Some(role_end) = role_marker_end(&chars, i) {
            if is_dangling(&chars, role_end) {
                ranges.push(i..skip_hspace(&chars, role_end));
            }
        } else if let Some(group) = empty_group(&chars, i) {
            ranges.push(group);
        }
    }

    if ranges.is_empty() {
        return input.to_string();
    }
    delete_ranges(&chars, ranges)
}

/// Deletes roles with no value (followed by `)`, another role, or the end
/// of the text) and collapses the empty groups left behind. Runs to a
/// fixpoint, since removing a group can leave its role dangling.
pub fn remove_empty_roles(input: &str) -> String {
    fixpoint(input, remove_empty_roles_once)
}

/// Removes the second and later copies of an identical `:role var` pair.
///
/// Only bare references whose token starts with a letter are considered, so
/// constants such as `:quant 1` or `:polarity -` are never touched. The
/// first occurrence is kept verbatim. Surplus closers on trailing lines are
/// trimmed afterwards.
pub fn dedup_roles(input: &str, filter: &RoleFilter) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut ranges = Vec::new();

    for reference in bare_references(&chars) {
        let variable_like = reference
            .token
            .chars()
            .next()
            .is_some_and(char::is_alphabetic);
        if !variable_like || !filter.matches(&reference.role) {
            continue;
        }
        if !seen.insert((reference.role.clone(), reference.token.clone())) {
            ranges.push(reference.start..reference.end);
        }
    }

    let deduped = if ranges.is_empty() {
        input.to_string()
    } else {
        delete_ranges(&chars, ranges)
    };
    trim_stray_closing_lines(&deduped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_role_before_closer() {
        assert_eq!(remove_empty_roles("(a / alpha :mod )"), "(a / alpha)");
        assert_eq!(remove_empty_roles("(a / alpha :mod"), "(a / alpha");
    }

    #[test]
    fn removes_role_followed_by_role() {
        assert_eq!(
            remove_empty_roles("(a / alpha :mod :ARG0 (b / beta))"),
            "(a / alpha :ARG0 (b / beta))"
        );
    }

    #[test]
    fn collapses_group_left_by_orphan_slash() {
        assert_eq!(remove_empty_roles("(c / chỗ :mod (đ ) )"), "(c / chỗ)");
    }

    #[test]
    fn collapses_empty_parens() {
        assert_eq!(remove_empty_roles("(a / alpha :mod ())"), "(a / alpha)");
    }

    #[test]
    fn keeps_concept_less_root() {
        assert_eq!(remove_empty_roles("(a)"), "(a)");
    }

    #[test]
    fn keeps_values_on_next_line() {
        let text = "(a / alpha\n    :mod\n    (b / beta))";
        assert_eq!(remove_empty_roles(text), text);
    }

    #[test]
    fn clean_text_is_unchanged() {
        let clean = "(w / want :ARG0 (b / boy) :ARG1 (g / go :ARG0 b) :polarity -)";
        assert_eq!(remove_empty_roles(clean), clean);
    }

    #[test]
    fn filter_normalizes_colons() {
        let filter = RoleFilter::only([":ARG0", "mod", " "]);
        assert!(filter.matches("ARG0"));
        assert!(filter.matches(":mod"));
        assert!(!filter.matches("ARG1"));
        assert!(RoleFilter::AllRoles.matches("anything"));
    }

    #[test]
    fn dedups_repeated_reference() {
        assert_eq!(
            dedup_roles("(a / alpha :ARG0 b :ARG0 b :ARG1 b)", &RoleFilter::AllRoles),
            "(a / alpha :ARG0 b :ARG1 b)"
        );
    }

    #[test]
    fn dedup_respects_filter() {
        let text = "(a / alpha :ARG0 b :ARG0 b :mod c :mod c)";
        assert_eq!(
            dedup_roles(text, &RoleFilter::only(["mod"])),
            "(a / alpha :ARG0 b :ARG0 b :mod c)"
        );
    }

    #[test]
    fn dedup_keeps_constants() {
        let text = "(a / alpha :quant 1 :quant 1)";
        assert_eq!(dedup_roles(text, &RoleFilter::AllRoles), text);
    }

    #[test]
    fn dedup_trims_trailing_closers() {
        assert_eq!(
            dedup_roles("(a / alpha :ARG0 b :ARG0 b\n))", &RoleFilter::AllRoles),
            "(a / alpha :ARG0 b\n)"
        );
    }

    #[test]
    fn filter_serde_shape() {
        let json = serde_json::to_value(RoleFilter::only(["mod"])).unwrap();
        assert_eq!(json, serde_json::json!({"mode": "only_roles", "roles": ["mod"]}));
        let all: RoleFilter = serde_json::from_value(serde_json::json!({"mode": "all_roles"})).unwrap();
        assert_eq!(all, RoleFilter::AllRoles);
    }
}
