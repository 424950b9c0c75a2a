//! Reconciles variable definitions with bare references.
//!
//! Generators often declare a node twice (once in full, once as a bare
//! reference that should have been the only occurrence) or point at a
//! variable they never declared. Both break decoding or inflate the triple
//! count, so they are cut here before scoring.

use std::collections::{HashMap, HashSet};

use penfix_core::surface::{
    bare_references, definitions, delete_ranges, group_end, is_variable_shaped,
};
use serde::{Deserialize, Serialize};

use crate::roles::remove_empty_roles;

/// What to do with a variable that is both declared and referenced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReentrancyPolicy {
    /// Delete every subtree declaring the variable and every bare reference
    /// to it. Lossy on genuine reentrancies.
    #[default]
    StripConflicting,
    /// Keep the first declaration and its references; delete only later
    /// declarations of the same variable.
    KeepFirstDefinition,
}

/// Removes conflicting declarations and unresolvable references, then
/// cleans up the roles left without a value.
///
/// References to undeclared variable-shaped tokens are always deleted
/// together with their role. Declared variables follow `policy`.
pub fn reconcile_references(input: &str, policy: ReentrancyPolicy) -> String {
    let chars: Vec<char> = input.chars().collect();
    let defs = definitions(&chars);
    let refs = bare_references(&chars);

    let declared: HashSet<&str> = defs.iter().map(|d| d.variable.as_str()).collect();
    let mut ranges = Vec::new();

    for reference in &refs {
        let token = reference.token.as_str();
        if !declared.contains(token) && is_variable_shaped(token) {
            ranges.push(reference.start..reference.end);
        }
    }

    match policy {
        ReentrancyPolicy::StripConflicting => {
            let conflicting: HashSet<&str> = refs
                .iter()
                .map(|r| r.token.as_str())
                .filter(|t| declared.contains(t))
                .collect();
            for def in defs.iter().filter(|d| conflicting.contains(d.variable.as_str())) {
                ranges.push(def.open..group_end(&chars, def.open));
            }
            for reference in refs.iter().filter(|r| conflicting.contains(r.token.as_str())) {
                ranges.push(reference.start..reference.end);
            }
        }
        ReentrancyPolicy::KeepFirstDefinition => {
            let mut seen: HashMap<&str, usize> = HashMap::new();
            for def in &defs {
                let count = seen.entry(def.variable.as_str()).or_default();
                *count += 1;
                if *count > 1 {
                    ranges.push(def.open..group_end(&chars, def.open));
                }
            }
        }
    }

    if ranges.is_empty() {
        return remove_empty_roles(input);
    }
    remove_empty_roles(&delete_ranges(&chars, ranges))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn declared_count(text: &str) -> usize {
        let chars: Vec<char> = text.chars().collect();
        definitions(&chars).len()
    }

    #[test]
    fn strips_undeclared_reference() {
        assert_eq!(
            reconcile_references("(a / alpha :ARG0 x9 :mod (b / beta))", ReentrancyPolicy::default()),
            "(a / alpha :mod (b / beta))"
        );
    }

    #[test]
    fn strips_declared_and_referenced_variable() {
        assert_eq!(
            reconcile_references(
                "(w / want :ARG0 (b / boy) :ARG1 (g / go :ARG0 b))",
                ReentrancyPolicy::StripConflicting
            ),
            "(w / want :ARG1 (g / go))"
        );
    }

    #[test]
    fn keep_first_preserves_reentrancy() {
        let text = "(w / want :ARG0 (b / boy) :ARG1 (g / go :ARG0 b))";
        assert_eq!(reconcile_references(text, ReentrancyPolicy::KeepFirstDefinition), text);
    }

    #[test]
    fn keep_first_drops_later_definitions() {
        assert_eq!(
            reconcile_references(
                "(a / alpha :ARG0 (b / boy) :ARG1 (b / bird :mod (c / cat)))",
                ReentrancyPolicy::KeepFirstDefinition
            ),
            "(a / alpha :ARG0 (b / boy))"
        );
    }

    #[test]
    fn constants_are_not_references() {
        let text = "(a / alpha :quant 1 :polarity - :mode imperative :op1 \"x\")";
        assert_eq!(reconcile_references(text, ReentrancyPolicy::StripConflicting), text);
    }

    #[test]
    fn empty_input() {
        assert_eq!(reconcile_references("", ReentrancyPolicy::StripConflicting), "");
    }

    proptest! {
        #[test]
        fn never_adds_declarations_or_dangling_roles(
            pieces in proptest::collection::vec(
                proptest::sample::select(vec![
                    "(a / alpha", "(b / beta", "(x1 / xa", ":ARG0", ":mod", "a", "b", "x1",
                    "x2", ")", "1", "-",
                ]),
                0..16,
            ),
            keep_first in any::<bool>(),
        ) {
            let text = pieces.join(" ");
            let policy = if keep_first {
                ReentrancyPolicy::KeepFirstDefinition
            } else {
                ReentrancyPolicy::StripConflicting
            };
            let out = reconcile_references(&text, policy);
            prop_assert!(declared_count(&out) <= declared_count(&text));
            prop_assert_eq!(remove_empty_roles(&out), out);
        }
    }
}
