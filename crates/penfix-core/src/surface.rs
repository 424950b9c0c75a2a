//! Character-class scanning over raw, possibly malformed graph text.
//!
//! The codec in [`crate::parser`] only accepts well-formed input. Repair
//! passes and structural checks instead work on whatever the generator
//! produced, so they share the small set of lexical rules defined here:
//!
//! - a *role marker* is `:` followed by at least one alphanumeric or `-`
//!   character, at the start of the text or after whitespace or a paren;
//! - a *token* is a run of characters other than whitespace, parens, `:`
//!   and `/`;
//! - a *definition* is `(` + optional whitespace + word characters +
//!   optional whitespace + `/`.
//!
//! All functions operate on `&[char]` so positions are character indices.

use std::ops::Range;

/// `\w`: alphanumeric or underscore.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Characters allowed in a role name after the colon.
pub fn is_role_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-'
}

/// Characters allowed in a concept, variable or constant token.
pub fn is_token_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '(' | ')' | ':' | '/')
}

/// Horizontal whitespace only.
pub fn is_hspace(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Index of the first non-whitespace character at or after `i`.
pub fn skip_ws(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    i
}

/// Index of the first non-horizontal-whitespace character at or after `i`.
pub fn skip_hspace(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && is_hspace(chars[i]) {
        i += 1;
    }
    i
}

/// End of the token starting at `i` (equal to `i` when there is none).
pub fn token_end(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && is_token_char(chars[i]) {
        i += 1;
    }
    i
}

/// End of the role name when `chars[i]` is a colon followed by at least one
/// role-name character. Position is not checked.
pub fn role_name_end(chars: &[char], i: usize) -> Option<usize> {
    if chars.get(i) != Some(&':') {
        return None;
    }
    let mut end = i + 1;
    while end < chars.len() && is_role_name_char(chars[end]) {
        end += 1;
    }
    (end > i + 1).then_some(end)
}

/// End of the role marker at `i`, if `i` starts one.
pub fn role_marker_end(chars: &[char], i: usize) -> Option<usize> {
    let boundary = i == 0 || {
        let prev = chars[i - 1];
        prev.is_whitespace() || prev == '(' || prev == ')'
    };
    if !boundary {
        return None;
    }
    role_name_end(chars, i)
}

/// Index just past the `)` matching the `(` at `open`, or `chars.len()` when
/// the group is never closed.
pub fn group_end(chars: &[char], open: usize) -> usize {
    let mut depth = 0usize;
    for (offset, &c) in chars[open..].iter().enumerate() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return open + offset + 1;
                }
            }
            _ => {}
        }
    }
    chars.len()
}

/// A token has variable shape when it is one letter followed only by ASCII
/// digits: `x`, `x12`, `đ1`.
pub fn is_variable_shaped(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() => chars.all(|c| c.is_ascii_digit()),
        _ => false,
    }
}

/// A node header `(var / concept`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    /// Index of the opening paren.
    pub open: usize,
    pub variable: String,
    /// Token following the slash, if any.
    pub concept: Option<String>,
}

/// Every node header in textual order.
pub fn definitions(chars: &[char]) -> Vec<Definition> {
    let mut defs = Vec::new();
    for (open, &c) in chars.iter().enumerate() {
        if c != '(' {
            continue;
        }
        let start = skip_ws(chars, open + 1);
        let mut end = start;
        while end < chars.len() && is_word_char(chars[end]) {
            end += 1;
        }
        if end == start {
            continue;
        }
        let slash = skip_ws(chars, end);
        if chars.get(slash) != Some(&'/') {
            continue;
        }
        let concept_start = skip_ws(chars, slash + 1);
        let concept_end = token_end(chars, concept_start);
        defs.push(Definition {
            open,
            variable: chars[start..end].iter().collect(),
            concept: (concept_end > concept_start)
                .then(|| chars[concept_start..concept_end].iter().collect()),
        });
    }
    defs
}

/// A role directly followed by a bare token, e.g. `:ARG0 b`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BareReference {
    /// Index of the role's colon.
    pub start: usize,
    /// Index just past the token.
    pub end: usize,
    /// Role name without the colon.
    pub role: String,
    pub token: String,
}

/// Every `:role token` pair whose token is not itself followed by `/`.
pub fn bare_references(chars: &[char]) -> Vec<BareReference> {
    let mut refs = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let Some(role_end) = role_marker_end(chars, i) else {
            i += 1;
            continue;
        };
        let token_start = skip_ws(chars, role_end);
        let end = token_end(chars, token_start);
        if end > token_start && chars.get(skip_ws(chars, end)) != Some(&'/') {
            refs.push(BareReference {
                start: i,
                end,
                role: chars[i + 1..role_end].iter().collect(),
                token: chars[token_start..end].iter().collect(),
            });
        }
        i = role_end;
    }
    refs
}

/// Deletes `ranges` from `chars`.
///
/// Overlapping or nested ranges are merged. Horizontal whitespace in front
/// of a deleted range is dropped too when the range is followed by `)`,
/// whitespace, or the end of the text, so no stray separator is left behind.
pub fn delete_ranges(chars: &[char], mut ranges: Vec<Range<usize>>) -> String {
    ranges.retain(|r| r.start < r.end);
    ranges.sort_by_key(|r| (r.start, r.end));

    let mut merged: Vec<Range<usize>> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => last.end = last.end.max(range.end),
            _ => merged.push(range),
        }
    }

    let mut out = String::with_capacity(chars.len());
    let mut cursor = 0;
    for range in merged {
        let end = range.end.min(chars.len());
        out.extend(&chars[cursor..range.start]);
        let closes = match chars.get(end) {
            None => true,
            Some(&c) => c == ')' || c.is_whitespace(),
        };
        if closes {
            while out.ends_with([' ', '\t']) {
                out.pop();
            }
        }
        cursor = end;
    }
    out.extend(&chars[cursor.min(chars.len())..]);
    out
}
