//! Seeded train/test splitting.

use rand::prelude::*;
use rand::rngs::StdRng;

use crate::error::AppError;

/// Row indices assigned to each partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n` with a seeded RNG and carve off the test partition.
///
/// The test partition holds `round(n * test_fraction)` rows, but never fewer
/// than one; both partitions must end up non-empty or the split fails with an
/// insufficient-data error before any model is touched. The same seed over
/// the same `n` always produces the same partitions.
pub fn split_indices(n: usize, test_fraction: f64, seed: u64) -> Result<SplitIndices, AppError> {
    if !(test_fraction.is_finite() && test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(AppError::input(format!(
            "Test fraction must be in (0, 1); got {test_fraction}."
        )));
    }

    let n_test = ((n as f64) * test_fraction).round().max(1.0) as usize;
    if n < 2 || n_test >= n {
        return Err(AppError::insufficient_data(format!(
            "Cannot split {n} feature row(s) into non-empty train and test partitions \
             at test fraction {test_fraction}; more drivers are needed."
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test = indices[..n_test].to_vec();
    let train = indices[n_test..].to_vec();
    Ok(SplitIndices { train, test })
}
