//! Composite reward scoring for generated graph text.
//!
//! A [`CompositeScorer`] repairs the prediction, runs the structural checks,
//! asks a [`MatchOracle`] for triple overlap against the reference and
//! combines everything into one reward in `[0, 1]`.
//!
//! Oracles are stateful. The scorer owns its oracle and resets it after
//! every comparison; parallel scoring builds one oracle per worker.

pub mod evaluate;
pub mod matcher;
pub mod oracle;
pub mod scorer;

pub use evaluate::{evaluate_pairs, Evaluation};
pub use matcher::TripleMatcher;
pub use oracle::{MatchCounts, MatchOracle, MatchScores, OracleError, Side};
pub use scorer::{score_parallel, CompositeScorer, RewardWeights, ScoreBreakdown};
