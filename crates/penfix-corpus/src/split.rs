//! Reproducible train/test partitioning.
//!
//! Blocks are shuffled with a ChaCha8 PRNG seeded by the caller, so the
//! same seed always yields the same split.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::CorpusError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit<T> {
    pub train: Vec<T>,
    pub test: Vec<T>,
}

/// Shuffles `items` and moves the first `floor(len * test_ratio)` of them
/// into the test set.
pub fn split_train_test<T>(
    mut items: Vec<T>,
    test_ratio: f64,
    seed: u64,
) -> Result<TrainTestSplit<T>, CorpusError> {
    if !(0.0..=1.0).contains(&test_ratio) {
        return Err(CorpusError::InvalidRatio(test_ratio));
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    items.shuffle(&mut rng);

    let test_size = (items.len() as f64 * test_ratio).floor() as usize;
    let train = items.split_off(test_size);
    Ok(TrainTestSplit { train, test: items })
}
