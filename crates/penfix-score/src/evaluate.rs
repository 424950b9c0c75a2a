//! Corpus-level overlap between predicted and gold graphs.

use serde::{Deserialize, Serialize};

use crate::oracle::{MatchOracle, MatchScores};

/// Averages over every evaluated pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub pairs: usize,
    /// Pairs the oracle could not compare; they count as zero.
    pub failures: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Compares each `(prediction, gold)` pair with `oracle` and averages the
/// scores. The oracle is reset after every pair.
pub fn evaluate_pairs<'a, O, I>(oracle: &mut O, pairs: I) -> Evaluation
where
    O: MatchOracle,
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut eval = Evaluation::default();
    let mut sum = MatchScores::default();

    for (prediction, gold) in pairs {
        let result = oracle.match_triples(prediction, gold);
        oracle.reset();
        eval.pairs += 1;
        match result.and_then(|counts| counts.validate()) {
            Ok(counts) => {
                let scores = MatchScores::from_counts(counts);
                sum.precision += scores.precision;
                sum.recall += scores.recall;
                sum.f1 += scores.f1;
            }
            Err(err) => {
                tracing::warn!(pair = eval.pairs - 1, error = %err, "pair not comparable");
                eval.failures += 1;
            }
        }
    }

    if eval.pairs > 0 {
        let n = eval.pairs as f64;
        eval.precision = sum.precision / n;
        eval.recall = sum.recall / n;
        eval.f1 = sum.f1 / n;
    }
    eval
}
