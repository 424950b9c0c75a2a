//! Removing childless leaf-wrapper nodes under leaf roles.

use std::collections::HashSet;
use std::ops::Range;

use penfix_core::surface::{
    bare_references, delete_ranges, group_end, role_marker_end, skip_ws, token_end,
};

use crate::fixpoint::fixpoint;
use crate::roles::RoleFilter;

/// Range of `:role (var / concept)` or `:role (concept)` starting at the
/// role marker `i`, when the group has no roles or groups of its own.
fn leaf_wrapper(
    chars: &[char],
    i: usize,
    filter: &RoleFilter,
    referenced: &HashSet<String>,
) -> Option<Range<usize>> {
    let role_end = role_marker_end(chars, i)?;
    let role: String = chars[i + 1..role_end].iter().collect();
    if !filter.matches(&role) {
        return None;
    }

    let open = skip_ws(chars, role_end);
    if chars.get(open) != Some(&'(') {
        return None;
    }
    let end = group_end(chars, open);
    if chars.get(end - 1) != Some(&')') {
        return None;
    }

    let inner = &chars[open + 1..end - 1];
    if inner.iter().any(|&c| c == '(' || c == ':') {
        return None;
    }

    let first_start = skip_ws(inner, 0);
    let first_end = token_end(inner, first_start);
    if first_end == first_start {
        return None;
    }
    let after = skip_ws(inner, first_end);
    if inner.get(after) == Some(&'/') {
        let variable: String = inner[first_start..first_end].iter().collect();
        if referenced.contains(&variable) {
            return None;
        }
    }

    Some(i..end)
}

fn prune_once(input: &str, filter: &RoleFilter) -> String {
    let chars: Vec<char> = input.chars().collect();
    let referenced: HashSet<String> = bare_references(&chars)
        .into_iter()
        .map(|r| r.token)
        .collect();

    let ranges: Vec<Range<usize>> = (0..chars.len())
        .filter_map(|i| leaf_wrapper(&chars, i, filter, &referenced))
        .collect();

    if ranges.is_empty() {
        return input.to_string();
    }
    delete_ranges(&chars, ranges)
}

/// Deletes leaf attachments `:role (var / concept)` and `:role (concept)`
/// for roles covered by `filter`, to a fixpoint: once a child is gone its
/// parent may become a leaf too. A leaf whose variable is referenced
/// elsewhere is kept.
pub fn prune_leaf_wrappers(input: &str, filter: &RoleFilter) -> String {
    fixpoint(input, |text| prune_once(text, filter))
}
