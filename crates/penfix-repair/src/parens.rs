//! Parenthesis balancing.

/// Drops every `)` that would close nothing and appends the `)` characters
/// still missing at the end. The result always has equal counts and never
/// goes negative when read left to right.
pub fn balance_parens(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    let mut depth = 0usize;

    for c in input.chars() {
        match c {
            '(' => {
                depth += 1;
                out.push(c);
            }
            ')' if depth == 0 => {}
            ')' => {
                depth -= 1;
                out.push(c);
            }
            _ => out.push(c),
        }
    }

    out.push_str(&")".repeat(depth));
    out
}

/// Removes surplus closers from trailing lines made only of `)`.
///
/// Model output often ends with a line of closing parens that overshoots.
/// Only such trailing lines are touched; text that is already balanced, or
/// short of closers, comes back unchanged.
pub fn trim_stray_closing_lines(input: &str) -> String {
    let opens = input.chars().filter(|&c| c == '(').count();
    let closes = input.chars().filter(|&c| c == ')').count();
    let mut excess = closes.saturating_sub(opens);
    if excess == 0 {
        return input.to_string();
    }

    let mut lines: Vec<String> = input.lines().map(str::to_string).collect();
    for line in lines.iter_mut().rev() {
        if excess == 0 {
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !trimmed.chars().all(|c| c == ')') {
            break;
        }
        let count = trimmed.chars().count();
        let keep = count.saturating_sub(excess);
        excess -= count - keep;
        let indent_len = line.len() - line.trim_start().len();
        let indent = line[..indent_len].to_string();
        *line = if keep == 0 {
            String::new()
        } else {
            indent + &")".repeat(keep)
        };
    }

    let mut out = lines.join("\n");
    while out.ends_with('\n') {
        out.pop();
    }
    if out.trim_end() != input.trim_end() {
        out.trim_end().to_string()
    } else {
        input.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(s: &str) -> (usize, usize) {
        (
            s.chars().filter(|&c| c == '(').count(),
            s.chars().filter(|&c| c == ')').count(),
        )
    }

    #[test]
    fn appends_missing_closers() {
        assert_eq!(
            balance_parens("(a / alpha :mod (b / beta"),
            "(a / alpha :mod (b / beta))"
        );
    }

    #[test]
    fn drops_unmatched_closers() {
        assert_eq!(balance_parens("(a / alpha))) :x (b)"), "(a / alpha :x (b))");
        assert_eq!(balance_parens(")("), "()");
    }

    #[test]
    fn balanced_text_is_unchanged() {
        let clean = "(a / alpha :mod (b / beta))";
        assert_eq!(balance_parens(clean), clean);
    }

    #[test]
    fn trims_overshooting_closing_line() {
        let input = "(a / alpha\n    :mod (b / beta\n))))";
        assert_eq!(trim_stray_closing_lines(input), "(a / alpha\n    :mod (b / beta\n))");
    }

    #[test]
    fn trims_across_several_closing_lines() {
        let input = "(a / alpha\n)\n)\n)";
        assert_eq!(trim_stray_closing_lines(input), "(a / alpha\n)");
    }

    #[test]
    fn leaves_inline_excess_alone() {
        let input = "(a / alpha)) :mod x";
        assert_eq!(trim_stray_closing_lines(input), input);
    }

    #[test]
    fn short_text_is_unchanged() {
        let input = "(a / alpha :mod (b / beta\n";
        assert_eq!(trim_stray_closing_lines(input), input);
    }

    #[test]
    fn balance_then_counts_match() {
        for input in ["", ")))", "(((", "(a))(b((", "(a / b :c (d / e)) )"] {
            let (opens, closes) = counts(&balance_parens(input));
            assert_eq!(opens, closes, "input {input:?}");
        }
    }
}
