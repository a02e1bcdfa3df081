//! Reporting utilities: rankings and formatted terminal output.

use std::cmp::Ordering;

use crate::domain::PredictionResult;

pub mod format;

pub use format::*;

/// The field ranked by predicted average lap time, fastest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    /// Ascending by predicted value; ties broken by driver name.
    pub entries: Vec<PredictionResult>,
}

impl Ranking {
    /// The predicted winner (fastest predicted average lap).
    pub fn winner(&self) -> Option<&PredictionResult> {
        self.entries.first()
    }

    /// The top `n` entries (the predicted podium for `n = 3`).
    pub fn podium(&self, n: usize) -> &[PredictionResult] {
        &self.entries[..n.min(self.entries.len())]
    }
}

/// Order the field by predicted value, ascending, with a stable name
/// tie-break so equal predictions always rank the same way.
pub fn rank_by_prediction(predictions: &[PredictionResult]) -> Ranking {
    let mut entries = predictions.to_vec();
    entries.sort_by(|a, b| {
        a.predicted
            .partial_cmp(&b.predicted)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.driver.cmp(&b.driver))
    });
    Ranking { entries }
}
