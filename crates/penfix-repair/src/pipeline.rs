//! Ordered repair passes and the presets built from them.

use serde::{Deserialize, Serialize};

use crate::concepts::{collapse_duplicate_headers, join_multiword_concepts, strip_orphan_slashes};
use crate::parens::balance_parens;
use crate::prune::prune_leaf_wrappers;
use crate::reconcile::{reconcile_references, ReentrancyPolicy};
use crate::roles::{dedup_roles, remove_empty_roles, RoleFilter};
use crate::spacing::{collapse_whitespace, normalize_role_spacing};

/// A single repair transform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "pass", rename_all = "snake_case")]
pub enum Pass {
    RoleSpacing,
    JoinConcepts,
    DuplicateHeaders,
    OrphanSlashes,
    BalanceParens,
    EmptyRoles,
    CollapseWhitespace,
    Reconcile {
        #[serde(default)]
        policy: ReentrancyPolicy,
    },
    DedupRoles {
        #[serde(default)]
        filter: RoleFilter,
    },
    PruneLeaves {
        #[serde(default)]
        filter: RoleFilter,
    },
}

impl Pass {
    pub fn name(&self) -> &'static str {
        match self {
            Pass::RoleSpacing => "role_spacing",
            Pass::JoinConcepts => "join_concepts",
            Pass::DuplicateHeaders => "duplicate_headers",
            Pass::OrphanSlashes => "orphan_slashes",
            Pass::BalanceParens => "balance_parens",
            Pass::EmptyRoles => "empty_roles",
            Pass::CollapseWhitespace => "collapse_whitespace",
            Pass::Reconcile { .. } => "reconcile",
            Pass::DedupRoles { .. } => "dedup_roles",
            Pass::PruneLeaves { .. } => "prune_leaves",
        }
    }

    pub fn apply(&self, text: &str) -> String {
        match self {
            Pass::RoleSpacing => normalize_role_spacing(text),
            Pass::JoinConcepts => join_multiword_concepts(text),
            Pass::DuplicateHeaders => collapse_duplicate_headers(text),
            Pass::OrphanSlashes => strip_orphan_slashes(text),
            Pass::BalanceParens => balance_parens(text),
            Pass::EmptyRoles => remove_empty_roles(text),
            Pass::CollapseWhitespace => collapse_whitespace(text),
            Pass::Reconcile { policy } => reconcile_references(text, *policy),
            Pass::DedupRoles { filter } => dedup_roles(text, filter),
            Pass::PruneLeaves { filter } => prune_leaf_wrappers(text, filter),
        }
    }
}

const SANITIZE: [Pass; 7] = [
    Pass::RoleSpacing,
    Pass::JoinConcepts,
    Pass::DuplicateHeaders,
    Pass::OrphanSlashes,
    Pass::BalanceParens,
    Pass::EmptyRoles,
    Pass::CollapseWhitespace,
];

/// Result of [`RepairPipeline::run_traced`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairTrace {
    pub output: String,
    /// Full rounds run, including the final round that changed nothing.
    pub rounds: usize,
    /// Names of the passes that changed the text, in the order they did.
    pub changed_passes: Vec<String>,
}

/// An ordered list of passes, rerun until a round changes nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairPipeline {
    passes: Vec<Pass>,
}

impl Default for RepairPipeline {
    fn default() -> Self {
        Self::sanitize()
    }
}

impl RepairPipeline {
    pub fn new(passes: Vec<Pass>) -> Self {
        Self { passes }
    }

    /// The seven default transforms.
    pub fn sanitize() -> Self {
        Self::new(SANITIZE.to_vec())
    }

    /// Reference reconciliation, duplicate headers and paren balance ahead
    /// of the default transforms. Used on predictions before scoring.
    pub fn scoring() -> Self {
        let mut passes = vec![
            Pass::Reconcile {
                policy: ReentrancyPolicy::default(),
            },
            Pass::DuplicateHeaders,
            Pass::BalanceParens,
        ];
        passes.extend(SANITIZE);
        Self::new(passes)
    }

    /// Paren balance and multiword joining only, applied to corpus blocks
    /// before decoding.
    pub fn corpus() -> Self {
        Self::new(vec![Pass::BalanceParens, Pass::JoinConcepts])
    }

    /// The default transforms followed by leaf-wrapper removal.
    pub fn inference(filter: RoleFilter) -> Self {
        Self::sanitize().with_pass(Pass::PruneLeaves { filter })
    }

    pub fn with_pass(mut self, pass: Pass) -> Self {
        self.passes.push(pass);
        self
    }

    pub fn passes(&self) -> &[Pass] {
        &self.passes
    }

    pub fn run(&self, text: &str) -> String {
        self.run_traced(text).output
    }

    /// Runs every pass in order, repeating the whole list until a round
    /// leaves the text unchanged or the round limit is hit.
    pub fn run_traced(&self, text: &str) -> RepairTrace {
        let limit = text.chars().count() + 2;
        let mut current = text.to_string();
        let mut changed_passes = Vec::new();
        let mut rounds = 0;

        while rounds < limit {
            rounds += 1;
            let before = current.clone();
            for pass in &self.passes {
                let next = pass.apply(&current);
                if next != current {
                    changed_passes.push(pass.name().to_string());
                    current = next;
                }
            }
            if current == before {
                break;
            }
        }

        RepairTrace {
            output: current,
            rounds,
            changed_passes,
        }
    }
}

/// Named pipeline configurations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    #[default]
    Sanitize,
    Scoring,
    Corpus,
    Inference,
}

/// Caller-facing repair configuration: a preset plus the opt-in stages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairOptions {
    pub preset: Preset,
    /// Enables role deduplication for the given roles.
    pub dedup_roles: Option<RoleFilter>,
    /// Enables leaf-wrapper removal; `Inference` implies all roles.
    pub prune_leaves: Option<RoleFilter>,
    /// Overrides the reconciliation policy, adding the pass if the preset
    /// does not have one.
    pub reentrancy: Option<ReentrancyPolicy>,
}

impl RepairOptions {
    pub fn build(&self) -> RepairPipeline {
        let mut pipeline = match self.preset {
            Preset::Sanitize => RepairPipeline::sanitize(),
            Preset::Scoring => RepairPipeline::scoring(),
            Preset::Corpus => RepairPipeline::corpus(),
            Preset::Inference => RepairPipeline::sanitize(),
        };

        if let Some(policy) = self.reentrancy {
            let existing = pipeline
                .passes
                .iter_mut()
                .find(|p| matches!(p, Pass::Reconcile { .. }));
            match existing {
                Some(pass) => *pass = Pass::Reconcile { policy },
                None => pipeline.passes.insert(0, Pass::Reconcile { policy }),
            }
        }
        if let Some(filter) = &self.dedup_roles {
            pipeline = pipeline.with_pass(Pass::DedupRoles {
                filter: filter.clone(),
            });
        }
        let prune = match (&self.prune_leaves, self.preset) {
            (Some(filter), _) => Some(filter.clone()),
            (None, Preset::Inference) => Some(RoleFilter::AllRoles),
            (None, _) => None,
        };
        if let Some(filter) = prune {
            pipeline = pipeline.with_pass(Pass::PruneLeaves { filter });
        }
        pipeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn parens_balanced(text: &str) -> bool {
        let mut depth = 0i64;
        for c in text.chars() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth < 0 {
                        return false;
                    }
                }
                _ => {}
            }
        }
        depth == 0
    }

    #[test]
    fn sanitize_fixes_duplicate_header() {
        assert_eq!(
            RepairPipeline::sanitize().run("(n3 / núi / hehe :mod (a / a))"),
            "(n3 / núi :mod (a / a))"
        );
    }

    #[test]
    fn sanitize_closes_missing_parens() {
        assert_eq!(
            RepairPipeline::sanitize().run("(a / alpha :mod (b / beta"),
            "(a / alpha :mod (b / beta))"
        );
    }

    #[test]
    fn sanitize_cleans_orphan_slash() {
        assert_eq!(RepairPipeline::sanitize().run("(c / chỗ :mod (đ / ) )"), "(c / chỗ)");
    }

    #[test]
    fn sanitize_handles_glued_multiword_output() {
        assert_eq!(
            RepairPipeline::sanitize().run("(l / làm:condition(y / yêu thương :pivot (n / người\n  :quant 1)))))"),
            "(l / làm :condition (y / yêu_thương :pivot (n / người\n :quant 1)))"
        );
    }

    #[test]
    fn scoring_strips_conflicts_before_sanitizing() {
        assert_eq!(
            RepairPipeline::scoring().run("(w / want :ARG0 (b / boy) :ARG1 (g / go :ARG0 b :ARG2 x7"),
            "(w / want :ARG1 (g / go))"
        );
    }

    #[test]
    fn corpus_only_balances_and_joins() {
        let pipeline = RepairPipeline::corpus();
        assert_eq!(pipeline.passes().len(), 2);
        assert_eq!(pipeline.run("(a / big dog :mod (b / x"), "(a / big_dog :mod (b / x))");
    }

    #[test]
    fn trace_reports_changed_passes() {
        let trace = RepairPipeline::sanitize().run_traced("(a / alpha :mod (b / beta");
        assert_eq!(trace.output, "(a / alpha :mod (b / beta))");
        assert_eq!(trace.changed_passes, vec!["balance_parens"]);
        assert_eq!(trace.rounds, 2);
    }

    #[test]
    fn empty_input_stays_empty() {
        for pipeline in [
            RepairPipeline::sanitize(),
            RepairPipeline::scoring(),
            RepairPipeline::corpus(),
            RepairPipeline::inference(RoleFilter::AllRoles),
        ] {
            assert_eq!(pipeline.run(""), "");
        }
    }

    #[test]
    fn options_default_to_sanitize() {
        assert_eq!(RepairOptions::default().build(), RepairPipeline::sanitize());
        let options: RepairOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, RepairOptions::default());
    }

    #[test]
    fn options_override_reentrancy_in_place() {
        let options = RepairOptions {
            preset: Preset::Scoring,
            reentrancy: Some(ReentrancyPolicy::KeepFirstDefinition),
            ..Default::default()
        };
        let pipeline = options.build();
        assert_eq!(
            pipeline.passes()[0],
            Pass::Reconcile {
                policy: ReentrancyPolicy::KeepFirstDefinition
            }
        );
        assert_eq!(
            pipeline.passes().len(),
            RepairPipeline::scoring().passes().len()
        );
    }

    #[test]
    fn options_append_opt_in_stages() {
        let options = RepairOptions {
            preset: Preset::Inference,
            dedup_roles: Some(RoleFilter::only(["ARG0"])),
            ..Default::default()
        };
        let names: Vec<&str> = options.build().passes().iter().map(Pass::name).collect();
        assert_eq!(&names[7..], &["dedup_roles", "prune_leaves"]);
    }

    #[test]
    fn pass_serde_shape() {
        let pass: Pass =
            serde_json::from_str(r#"{"pass": "dedup_roles", "filter": {"mode": "only_roles", "roles": ["mod"]}}"#)
                .unwrap();
        assert_eq!(
            pass,
            Pass::DedupRoles {
                filter: RoleFilter::only(["mod"])
            }
        );
        let reconcile: Pass = serde_json::from_str(r#"{"pass": "reconcile"}"#).unwrap();
        assert_eq!(
            reconcile,
            Pass::Reconcile {
                policy: ReentrancyPolicy::StripConflicting
            }
        );
    }

    fn graph_like() -> impl Strategy<Value = String> {
        proptest::collection::vec(
            proptest::sample::select(vec![
                "(", ")", " ", "/", ":mod", ":ARG0", "a", "b1", "núi", "hehe", "1", "\n", "_", ":",
            ]),
            0..24,
        )
        .prop_map(|pieces| pieces.concat())
    }

    proptest! {
        #[test]
        fn sanitize_is_idempotent(text in graph_like()) {
            let pipeline = RepairPipeline::sanitize();
            let once = pipeline.run(&text);
            prop_assert_eq!(pipeline.run(&once), once);
        }

        #[test]
        fn scoring_is_idempotent(text in graph_like()) {
            let pipeline = RepairPipeline::scoring();
            let once = pipeline.run(&text);
            prop_assert_eq!(pipeline.run(&once), once);
        }

        #[test]
        fn sanitize_output_is_balanced(text in graph_like()) {
            prop_assert!(parens_balanced(&RepairPipeline::sanitize().run(&text)));
        }

        #[test]
        fn balance_pass_postcondition(text in "\\PC{0,64}") {
            prop_assert!(parens_balanced(&balance_parens(&text)));
        }

        #[test]
        fn header_collapse_terminates(repeats in 0usize..300) {
            let text = format!("(v / c{})", " / d".repeat(repeats));
            prop_assert_eq!(collapse_duplicate_headers(&text), "(v / c)");
        }
    }
}
