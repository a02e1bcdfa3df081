//! Gradient-boosted regression stumps.
//!
//! A deterministic boosted ensemble: each round fits a depth-1 tree (a single
//! feature/threshold split) to the current residuals and adds it to the
//! ensemble scaled by the learning rate. Thresholds are midpoints between
//! consecutive sorted feature values, scanned in a fixed order, so two fits
//! over the same data produce the same model.

use nalgebra::{DMatrix, DVector};

use crate::error::AppError;
use crate::model::{Regressor, validate_training_data};

/// Stop boosting once a round improves the residual SSE by less than this.
const MIN_SSE_IMPROVEMENT: f64 = 1e-12;

/// A single split: rows with `feature <= threshold` get `below`, others `above`.
#[derive(Debug, Clone)]
struct Stump {
    feature: usize,
    threshold: f64,
    below: f64,
    above: f64,
}

impl Stump {
    fn apply(&self, row: &[f64]) -> f64 {
        if row[self.feature] <= self.threshold {
            self.below
        } else {
            self.above
        }
    }
}

/// Boosted stump ensemble over the residuals of a constant base prediction.
#[derive(Debug, Clone)]
pub struct GradientBoost {
    rounds: usize,
    learning_rate: f64,
    base: f64,
    stumps: Vec<Stump>,
    fitted: bool,
}

impl GradientBoost {
    pub fn new(rounds: usize, learning_rate: f64) -> Self {
        Self {
            rounds,
            learning_rate,
            base: 0.0,
            stumps: Vec::new(),
            fitted: false,
        }
    }

    /// Number of stumps actually kept (early stopping may use fewer rounds).
    pub fn len(&self) -> usize {
        self.stumps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stumps.is_empty()
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        let boost: f64 = self.stumps.iter().map(|s| s.apply(row)).sum();
        self.base + self.learning_rate * boost
    }
}

impl Default for GradientBoost {
    fn default() -> Self {
        // Round count and learning rate sized for fields of tens of drivers.
        Self::new(500, 0.05)
    }
}

impl Regressor for GradientBoost {
    fn fit(&mut self, x: &DMatrix<f64>, y: &DVector<f64>) -> Result<(), AppError> {
        validate_training_data(x, y)?;
        if self.learning_rate <= 0.0 || !self.learning_rate.is_finite() {
            return Err(AppError::model("Learning rate must be positive and finite."));
        }

        let n = x.nrows();
        self.base = y.iter().sum::<f64>() / n as f64;
        self.stumps.clear();

        let mut residuals: Vec<f64> = (0..n).map(|i| y[i] - self.base).collect();

        for _ in 0..self.rounds {
            let before: f64 = residuals.iter().map(|r| r * r).sum();
            let Some(stump) = best_stump(x, &residuals) else {
                // No usable split (e.g. all feature values identical); the
                // ensemble degenerates to the base mean, which is still valid.
                break;
            };

            for i in 0..n {
                let row: Vec<f64> = x.row(i).iter().copied().collect();
                residuals[i] -= self.learning_rate * stump.apply(&row);
            }

            let after: f64 = residuals.iter().map(|r| r * r).sum();
            self.stumps.push(stump);
            if before - after < MIN_SSE_IMPROVEMENT {
                break;
            }
        }

        self.fitted = true;
        Ok(())
    }

    fn predict(&self, x: &DMatrix<f64>) -> Result<DVector<f64>, AppError> {
        if !self.fitted {
            return Err(AppError::model("Boosted model predicted before being fit."));
        }

        let preds: Vec<f64> = (0..x.nrows())
            .map(|i| {
                let row: Vec<f64> = x.row(i).iter().copied().collect();
                self.predict_row(&row)
            })
            .collect();
        Ok(DVector::from_vec(preds))
    }
}

/// Exhaustively pick the stump minimizing residual SSE.
///
/// Features are scanned in index order and thresholds in ascending order;
/// only a strictly better SSE replaces the incumbent, so ties resolve to the
/// first candidate and the search is deterministic.
fn best_stump(x: &DMatrix<f64>, residuals: &[f64]) -> Option<Stump> {
    let n = x.nrows();
    let mut best: Option<(f64, Stump)> = None;

    for feature in 0..x.ncols() {
        let mut values: Vec<f64> = (0..n).map(|r| x[(r, feature)]).collect();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        values.dedup();

        for pair in values.windows(2) {
            let threshold = (pair[0] + pair[1]) / 2.0;

            let (mut below_sum, mut below_n) = (0.0, 0usize);
            let (mut above_sum, mut above_n) = (0.0, 0usize);
            for r in 0..n {
                if x[(r, feature)] <= threshold {
                    below_sum += residuals[r];
                    below_n += 1;
                } else {
                    above_sum += residuals[r];
                    above_n += 1;
                }
            }
            if below_n == 0 || above_n == 0 {
                continue;
            }

            let below = below_sum / below_n as f64;
            let above = above_sum / above_n as f64;

            let sse: f64 = (0..n)
                .map(|r| {
                    let fitted = if x[(r, feature)] <= threshold { below } else { above };
                    let e = residuals[r] - fitted;
                    e * e
                })
                .sum();

            let is_better = best.as_ref().is_none_or(|(best_sse, _)| sse < *best_sse);
            if is_better {
                best = Some((
                    sse,
                    Stump {
                        feature,
                        threshold,
                        below,
                        above,
                    },
                ));
            }
        }
    }

    best.map(|(_, stump)| stump)
}
