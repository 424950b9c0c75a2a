//! Built-in triple-overlap oracle.
//!
//! Both graphs are decoded with the in-tree codec and flattened to
//! instance, attribute and relation triples (concepts and constants are
//! compared lowercased). A mapping from left variables to right variables
//! is seeded by concept equality in declaration order and then improved by
//! hill climbing over single remaps and pairwise swaps until no move raises
//! the matched count. The search is deterministic and local; it finds the
//! optimum on the small, mostly tree-shaped graphs this crate scores but is
//! not a full alignment search.

use std::collections::{HashMap, HashSet};

use penfix_core::{decode, AmrGraph, Triple};

use crate::oracle::{MatchCounts, MatchOracle, OracleError, Side};

/// Triples of one graph with variables replaced by declaration indices.
#[derive(Debug)]
struct Flat {
    variables: usize,
    concepts: Vec<Option<String>>,
    instances: Vec<(usize, String)>,
    attributes: Vec<(usize, String, String)>,
    relations: Vec<(usize, String, usize)>,
}

impl Flat {
    fn from_text(text: &str, side: Side) -> Result<Self, OracleError> {
        let decoded = decode(text).map_err(|source| OracleError::Decode { side, source })?;
        let graph = AmrGraph::from_tree(&decoded.tree);
        let index: HashMap<String, usize> = graph
            .variables()
            .enumerate()
            .map(|(i, v)| (v.to_string(), i))
            .collect();

        let mut flat = Flat {
            variables: index.len(),
            concepts: vec![None; index.len()],
            instances: Vec::new(),
            attributes: Vec::new(),
            relations: Vec::new(),
        };

        let mut seen = HashSet::new();
        for triple in graph.triples() {
            if !seen.insert(triple.clone()) {
                continue;
            }
            match triple {
                Triple::Instance { variable, concept } => {
                    if let Some(&i) = index.get(&variable) {
                        let concept = concept.to_lowercase();
                        flat.concepts[i] = Some(concept.clone());
                        flat.instances.push((i, concept));
                    }
                }
                Triple::Attribute {
                    source,
                    role,
                    value,
                } => {
                    if let Some(&i) = index.get(&source) {
                        flat.attributes.push((i, role, value.to_lowercase()));
                    }
                }
                Triple::Relation {
                    source,
                    role,
                    target,
                } => {
                    if let (Some(&s), Some(&t)) = (index.get(&source), index.get(&target)) {
                        flat.relations.push((s, role, t));
                    }
                }
            }
        }
        Ok(flat)
    }

    fn total(&self) -> usize {
        self.instances.len() + self.attributes.len() + self.relations.len()
    }
}

/// Hash lookups over the right-hand graph.
struct Lookup<'a> {
    instances: HashSet<(usize, &'a str)>,
    attributes: HashSet<(usize, &'a str, &'a str)>,
    relations: HashSet<(usize, &'a str, usize)>,
}

impl<'a> Lookup<'a> {
    fn new(flat: &'a Flat) -> Self {
        Lookup {
            instances: flat.instances.iter().map(|(i, c)| (*i, c.as_str())).collect(),
            attributes: flat
                .attributes
                .iter()
                .map(|(i, r, v)| (*i, r.as_str(), v.as_str()))
                .collect(),
            relations: flat
                .relations
                .iter()
                .map(|(s, r, t)| (*s, r.as_str(), *t))
                .collect(),
        }
    }
}

fn unary_matches(left: &Flat, right: &Lookup<'_>, i: usize, j: usize) -> usize {
    let instances = left
        .instances
        .iter()
        .filter(|(v, c)| *v == i && right.instances.contains(&(j, c.as_str())))
        .count();
    let attributes = left
        .attributes
        .iter()
        .filter(|(v, r, val)| *v == i && right.attributes.contains(&(j, r.as_str(), val.as_str())))
        .count();
    instances + attributes
}

/// Hill-climbing triple matcher.
///
/// Per-pair instance and attribute scores are memoized by variable index.
/// Indices are only meaningful inside one comparison, so the cache must be
/// cleared with [`MatchOracle::reset`] before the next one.
#[derive(Debug, Default)]
pub struct TripleMatcher {
    pair_cache: HashMap<(usize, usize), usize>,
}

impl TripleMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of memoized variable pairs.
    pub fn cached_pairs(&self) -> usize {
        self.pair_cache.len()
    }

    fn unary(&mut self, left: &Flat, right: &Lookup<'_>, i: usize, j: usize) -> usize {
        *self
            .pair_cache
            .entry((i, j))
            .or_insert_with(|| unary_matches(left, right, i, j))
    }

    fn score(&mut self, left: &Flat, right: &Lookup<'_>, mapping: &[Option<usize>]) -> usize {
        let mut total = 0;
        for (i, target) in mapping.iter().enumerate() {
            if let Some(j) = *target {
                total += self.unary(left, right, i, j);
            }
        }
        total
            + left
                .relations
                .iter()
                .filter(|(s, role, t)| match (mapping[*s], mapping[*t]) {
                    (Some(ms), Some(mt)) => right.relations.contains(&(ms, role.as_str(), mt)),
                    _ => false,
                })
                .count()
    }

    fn best_mapping(&mut self, left: &Flat, right: &Flat, lookup: &Lookup<'_>) -> usize {
        let mut mapping: Vec<Option<usize>> = vec![None; left.variables];
        let mut used = vec![false; right.variables];

        for (i, concept) in left.concepts.iter().enumerate() {
            let Some(concept) = concept else { continue };
            let candidate = (0..right.variables)
                .find(|&j| !used[j] && right.concepts[j].as_deref() == Some(concept.as_str()));
            if let Some(j) = candidate {
                mapping[i] = Some(j);
                used[j] = true;
            }
        }

        let mut best = self.score(left, lookup, &mapping);
        loop {
            let mut improved: Option<(Vec<Option<usize>>, usize)> = None;
            let mut consider = |candidate: Vec<Option<usize>>, score: usize| {
                let threshold = improved.as_ref().map_or(best, |(_, s)| *s);
                if score > threshold {
                    improved = Some((candidate, score));
                }
            };

            for i in 0..left.variables {
                for j in (0..right.variables).filter(|&j| !used[j]) {
                    let mut candidate = mapping.clone();
                    candidate[i] = Some(j);
                    let score = self.score(left, lookup, &candidate);
                    consider(candidate, score);
                }
                for k in i + 1..left.variables {
                    if mapping[i] == mapping[k] {
                        continue;
                    }
                    let mut candidate = mapping.clone();
                    candidate.swap(i, k);
                    let score = self.score(left, lookup, &candidate);
                    consider(candidate, score);
                }
            }

            let Some((next, score)) = improved else { break };
            used = vec![false; right.variables];
            for j in next.iter().flatten() {
                used[*j] = true;
            }
            mapping = next;
            best = score;
        }
        best
    }
}

impl MatchOracle for TripleMatcher {
    fn match_triples(&mut self, left: &str, right: &str) -> Result<MatchCounts, OracleError> {
        let left = Flat::from_text(left, Side::Left)?;
        let right = Flat::from_text(right, Side::Right)?;
        let lookup = Lookup::new(&right);
        let matched = self.best_mapping(&left, &right, &lookup);
        Ok(MatchCounts {
            matched,
            left_total: left.total(),
            right_total: right.total(),
        })
    }

    fn reset(&mut self) {
        self.pair_cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compare(left: &str, right: &str) -> MatchCounts {
        let mut matcher = TripleMatcher::new();
        let counts = matcher.match_triples(left, right).unwrap();
        matcher.reset();
        counts
    }

    #[test]
    fn identical_graphs_match_fully() {
        let text = "(x1 / bi_kịch :domain (x2 / chỗ :mod (x3 / đó)))";
        // 3 instances + TOP + 2 relations
        assert_eq!(
            compare(text, text),
            MatchCounts {
                matched: 6,
                left_total: 6,
                right_total: 6,
            }
        );
    }

    #[test]
    fn variable_names_do_not_matter() {
        let counts = compare(
            "(w / want :ARG0 (b / boy) :ARG1 (g / go :ARG0 b))",
            "(a / want :ARG1 (c / go :ARG0 d) :ARG0 (d / boy))",
        );
        assert_eq!(counts.matched, counts.left_total);
        assert_eq!(counts.left_total, counts.right_total);
    }

    #[test]
    fn swaps_recover_from_bad_seed() {
        // Seeding maps the first `dog` to the first `dog`, which loses the
        // :mod edge until the two are swapped.
        let counts = compare(
            "(a / animal :ARG0 (d / dog) :ARG1 (e / dog :mod (r / red)))",
            "(a / animal :ARG1 (f / dog :mod (r / red)) :ARG0 (d / dog))",
        );
        assert_eq!(counts.matched, counts.left_total);
    }

    #[test]
    fn partial_overlap() {
        let counts = compare("(a / alpha :mod (b / beta))", "(a / alpha :mod (c / gamma))");
        // instance alpha, TOP, and the :mod relation
        assert_eq!(counts.matched, 3);
        assert_eq!(counts.left_total, 4);
        assert_eq!(counts.right_total, 4);
    }

    #[test]
    fn attributes_count() {
        let counts = compare("(n / người :quant 1)", "(m / người :quant 2)");
        assert_eq!(counts.matched, 2);
        assert_eq!(counts.left_total, 3);
    }

    #[test]
    fn concepts_compare_case_insensitively() {
        let counts = compare("(h / Hà_Nội)", "(h / hà_nội)");
        assert_eq!(counts.matched, 2);
    }

    #[test]
    fn undecodable_side_is_reported() {
        let mut matcher = TripleMatcher::new();
        let err = matcher.match_triples("(a / alpha", "(a / alpha)").unwrap_err();
        assert!(matches!(err, OracleError::Decode { side: Side::Left, .. }));
        let err = matcher.match_triples("(a / alpha)", "").unwrap_err();
        assert!(matches!(err, OracleError::Decode { side: Side::Right, .. }));
    }

    #[test]
    fn reset_clears_the_cache() {
        let mut matcher = TripleMatcher::new();
        matcher.match_triples("(a / alpha)", "(a / alpha)").unwrap();
        assert!(matcher.cached_pairs() > 0);
        matcher.reset();
        assert_eq!(matcher.cached_pairs(), 0);
    }

    #[test]
    fn stale_cache_corrupts_the_next_comparison() {
        let mut matcher = TripleMatcher::new();
        matcher.match_triples("(a / alpha)", "(a / alpha)").unwrap();

        // Without a reset the cached (0, 0) score from the previous pair
        // leaks into an unrelated comparison.
        let stale = matcher.match_triples("(b / beta)", "(c / gamma)").unwrap();
        assert_eq!(stale.matched, 2);

        matcher.reset();
        let fresh = matcher.match_triples("(b / beta)", "(c / gamma)").unwrap();
        assert_eq!(fresh.matched, 0);
    }
}
