//! Whitespace around roles, and final whitespace normalization.

use penfix_core::surface::{is_hspace, is_token_char, role_name_end};

/// Separates roles from whatever they are glued to.
///
/// - `word:role` becomes `word :role` (the role name must start with a
///   letter, so `12:30` is left alone);
/// - `:role(` becomes `:role (`;
/// - `:role_value` becomes `:role value` (split at the first underscore).
pub fn normalize_role_spacing(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 8);
    let mut i = 0;

    while i < chars.len() {
        let Some(end) = role_name_end(&chars, i) else {
            out.push(chars[i]);
            i += 1;
            continue;
        };

        let glued = i > 0 && {
            let prev = chars[i - 1];
            !prev.is_whitespace() && !matches!(prev, '(' | ')' | ':')
        };
        if glued && chars[i + 1].is_alphabetic() {
            out.push(' ');
        }
        out.extend(&chars[i..end]);
        i = end;

        match chars.get(i) {
            Some('(') => out.push(' '),
            Some('_') if chars.get(i + 1).is_some_and(|&c| is_token_char(c)) => {
                out.push(' ');
                i += 1;
            }
            _ => {}
        }
    }

    out
}

/// Collapses runs of spaces and tabs to one space and trims both ends.
pub fn collapse_whitespace(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_run = false;
    for c in input.chars() {
        if is_hspace(c) {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_role_glued_to_word() {
        assert_eq!(
            normalize_role_spacing("(x1 / bi_kịch:domain (x2 / chỗ))"),
            "(x1 / bi_kịch :domain (x2 / chỗ))"
        );
    }

    #[test]
    fn splits_role_glued_to_role() {
        assert_eq!(normalize_role_spacing("(a / b :mod:domain c)"), "(a / b :mod :domain c)");
    }

    #[test]
    fn separates_role_and_paren() {
        assert_eq!(
            normalize_role_spacing("(l / làm :condition(y / yêu))"),
            "(l / làm :condition (y / yêu))"
        );
    }

    #[test]
    fn splits_underscore_glued_value() {
        assert_eq!(normalize_role_spacing("(a / b :mod_c2)"), "(a / b :mod c2)");
    }

    #[test]
    fn leaves_times_and_clean_text_alone() {
        assert_eq!(normalize_role_spacing("(t / time :value 12:30)"), "(t / time :value 12:30)");
        let clean = "(a / alpha :ARG0 (b / beta) :quant 1)";
        assert_eq!(normalize_role_spacing(clean), clean);
    }

    #[test]
    fn spacing_is_idempotent() {
        let once = normalize_role_spacing("a:b(c:d_e");
        assert_eq!(normalize_role_spacing(&once), once);
    }

    #[test]
    fn collapses_horizontal_runs() {
        assert_eq!(collapse_whitespace("  (a  /\t\tb   :mod c) "), "(a / b :mod c)");
    }

    #[test]
    fn keeps_newlines() {
        assert_eq!(collapse_whitespace("(a / b\n   :mod c)"), "(a / b\n :mod c)");
    }

    #[test]
    fn empty_input() {
        assert_eq!(normalize_role_spacing(""), "");
        assert_eq!(collapse_whitespace(""), "");
    }
}
