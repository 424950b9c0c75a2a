//! The composite reward.

use penfix_check::{balanced, extract_answer, naming_convention, unique_variables, well_formed_tag};
use penfix_repair::RepairPipeline;
use serde::{Deserialize, Serialize};

use crate::oracle::{MatchOracle, MatchScores};

/// Weight of each reward term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardWeights {
    pub format: f64,
    pub balanced: f64,
    pub unique_variables: f64,
    pub naming: f64,
    pub smatch: f64,
}

impl Default for RewardWeights {
    fn default() -> Self {
        RewardWeights {
            format: 0.1,
            balanced: 0.1,
            unique_variables: 0.1,
            naming: 0.1,
            smatch: 0.6,
        }
    }
}

/// Every term of one reward, already weighted, plus the raw overlap
/// scores and the repaired prediction they were computed on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub format: f64,
    pub balanced: f64,
    pub unique_variables: f64,
    pub naming: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Weighted F1 term.
    pub smatch: f64,
    pub total: f64,
    /// Repaired prediction; empty when the completion had no answer.
    pub prediction: String,
}

/// Scores completions against references with one owned oracle.
pub struct CompositeScorer<O> {
    oracle: O,
    pipeline: RepairPipeline,
    weights: RewardWeights,
}

impl<O: MatchOracle> CompositeScorer<O> {
    /// Scorer with the scoring repair preset and default weights.
    pub fn new(oracle: O) -> Self {
        CompositeScorer {
            oracle,
            pipeline: RepairPipeline::scoring(),
            weights: RewardWeights::default(),
        }
    }

    pub fn with_weights(mut self, weights: RewardWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_pipeline(mut self, pipeline: RepairPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn weights(&self) -> &RewardWeights {
        &self.weights
    }

    /// Overlap of `prediction` against `reference`.
    ///
    /// The oracle is reset right after it answers, whether it succeeded or
    /// not. Any failure is logged and scored as zero.
    pub fn compute_f1(&mut self, reference: &str, prediction: &str) -> MatchScores {
        let result = self.oracle.match_triples(prediction, reference);
        self.oracle.reset();
        match result.and_then(|counts| counts.validate()) {
            Ok(counts) => MatchScores::from_counts(counts),
            Err(err) => {
                tracing::warn!(error = %err, "matching oracle failed, scoring overlap as zero");
                MatchScores::default()
            }
        }
    }

    /// Reward for one completion against one reference.
    pub fn score(&mut self, completion: &str, reference: &str) -> ScoreBreakdown {
        let completion = completion.trim();
        let prediction = extract_answer(completion)
            .map(|answer| self.pipeline.run(answer))
            .unwrap_or_default();
        let reference = extract_answer(reference).unwrap_or_else(|| reference.trim());

        let w = self.weights;
        let has_prediction = !prediction.is_empty();
        let term = |passed: bool, weight: f64| if passed { weight } else { 0.0 };

        let format = term(well_formed_tag(completion), w.format);
        let balanced = term(has_prediction && balanced(&prediction), w.balanced);
        let unique = term(has_prediction && unique_variables(&prediction), w.unique_variables);
        let naming = term(has_prediction && naming_convention(&prediction), w.naming);

        let overlap = if has_prediction {
            self.compute_f1(reference, &prediction)
        } else {
            MatchScores::default()
        };
        let smatch = w.smatch * overlap.f1;
        let total = (format + balanced + unique + naming + smatch).clamp(0.0, 1.0);

        let breakdown = ScoreBreakdown {
            format,
            balanced,
            unique_variables: unique,
            naming,
            precision: overlap.precision,
            recall: overlap.recall,
            f1: overlap.f1,
            smatch,
            total,
            prediction,
        };
        tracing::debug!(
            format = breakdown.format,
            balanced = breakdown.balanced,
            unique_variables = breakdown.unique_variables,
            naming = breakdown.naming,
            f1 = breakdown.f1,
            total = breakdown.total,
            "scored completion"
        );
        breakdown
    }

    /// Scores `(completion, reference)` pairs in order.
    pub fn score_batch<'a, I>(&mut self, pairs: I) -> Vec<ScoreBreakdown>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        pairs
            .into_iter()
            .map(|(completion, reference)| self.score(completion, reference))
            .collect()
    }
}

/// Scores `pairs` on up to `workers` threads.
///
/// Each worker builds its own oracle with `make_oracle` and scores one
/// contiguous chunk; results come back in input order.
pub fn score_parallel<O, F>(
    pairs: &[(String, String)],
    workers: usize,
    weights: RewardWeights,
    make_oracle: F,
) -> Vec<ScoreBreakdown>
where
    O: MatchOracle,
    F: Fn() -> O + Sync,
{
    if pairs.is_empty() {
        return Vec::new();
    }
    let workers = workers.clamp(1, pairs.len());
    let chunk_size = pairs.len().div_ceil(workers);

    std::thread::scope(|scope| {
        let handles: Vec<_> = pairs
            .chunks(chunk_size)
            .map(|chunk| {
                let make_oracle = &make_oracle;
                scope.spawn(move || {
                    let mut scorer = CompositeScorer::new(make_oracle()).with_weights(weights);
                    scorer.score_batch(chunk.iter().map(|(c, r)| (c.as_str(), r.as_str())))
                })
            })
            .collect();

        let mut results = Vec::with_capacity(pairs.len());
        for handle in handles {
            match handle.join() {
                Ok(chunk) => results.extend(chunk),
                Err(panic) => std::panic::resume_unwind(panic),
            }
        }
        results
    })
}
