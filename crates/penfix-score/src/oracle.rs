//! The matching-oracle seam.

use penfix_core::DecodeError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which argument of a comparison an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// Errors an oracle may report. The scorer maps every one of them to a
/// zero overlap score.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("{side} graph does not decode: {source}")]
    Decode {
        side: Side,
        #[source]
        source: DecodeError,
    },

    #[error("inconsistent match counts: {matched} matched of {left_total}/{right_total}")]
    Inconsistent {
        matched: usize,
        left_total: usize,
        right_total: usize,
    },
}

/// Raw oracle result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCounts {
    /// Triples matched under the best mapping found.
    pub matched: usize,
    /// Triples in the left graph.
    pub left_total: usize,
    /// Triples in the right graph.
    pub right_total: usize,
}

impl MatchCounts {
    /// Rejects counts no mapping could produce.
    pub fn validate(self) -> Result<Self, OracleError> {
        if self.matched > self.left_total.min(self.right_total) {
            return Err(OracleError::Inconsistent {
                matched: self.matched,
                left_total: self.left_total,
                right_total: self.right_total,
            });
        }
        Ok(self)
    }
}

/// Counts triple overlap between two graph texts.
///
/// Implementations may memoize inside one comparison. Callers must invoke
/// [`MatchOracle::reset`] before the next comparison.
pub trait MatchOracle {
    fn match_triples(&mut self, left: &str, right: &str) -> Result<MatchCounts, OracleError>;

    fn reset(&mut self);
}

/// Precision, recall and F1 over one comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchScores {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl MatchScores {
    /// Scores for a prediction on the left and a reference on the right.
    /// Every ratio with a zero denominator is zero.
    pub fn from_counts(counts: MatchCounts) -> Self {
        let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };
        let precision = ratio(counts.matched, counts.left_total);
        let recall = ratio(counts.matched, counts.right_total);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        MatchScores {
            precision,
            recall,
            f1,
        }
    }
}
