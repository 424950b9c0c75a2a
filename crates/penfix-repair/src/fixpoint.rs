//! Bounded fixpoint iteration.

/// Applies `pass` until the text stops changing.
///
/// Every transform iterated this way deletes at least one character when it
/// changes anything, so `len + 1` rounds always suffice; the bound makes
/// termination independent of that argument.
pub fn fixpoint(input: &str, pass: impl Fn(&str) -> String) -> String {
    let mut current = input.to_string();
    for _ in 0..=input.chars().count() {
        let next = pass(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_when_stable() {
        let out = fixpoint("aaaa", |s| s.strip_prefix('a').unwrap_or(s).to_string());
        assert_eq!(out, "");
    }

    #[test]
    fn unchanged_input_is_returned() {
        assert_eq!(fixpoint("abc", |s| s.to_string()), "abc");
    }

    #[test]
    fn growing_pass_is_still_bounded() {
        let out = fixpoint("ab", |s| format!("{}x", s));
        assert_eq!(out, "abxxx");
    }
}
