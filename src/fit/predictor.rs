//! Fit the configured regressor, evaluate it, and predict every driver.

use nalgebra::{DMatrix, DVector};

use crate::domain::{FeatureRow, PredictConfig, PredictionResult};
use crate::error::AppError;
use crate::fit::split::split_indices;
use crate::model::build_regressor;

/// Everything the fit stage produces for reporting.
#[derive(Debug, Clone)]
pub struct FitOutcome {
    /// One prediction per input feature row, in input order.
    pub predictions: Vec<PredictionResult>,
    /// Mean absolute error on the held-out test partition, in seconds.
    pub mae: f64,
    pub n_train: usize,
    pub n_test: usize,
}

/// Split, fit, evaluate, and predict.
///
/// The split is seeded from the config, so identical inputs and config yield
/// identical predictions and error metric. Fails with an insufficient-data
/// error before the regressor is invoked when the rows cannot be split.
pub fn fit_and_predict(
    rows: &[FeatureRow],
    config: &PredictConfig,
) -> Result<FitOutcome, AppError> {
    if rows.is_empty() {
        return Err(AppError::insufficient_data(
            "No feature rows to model: no driver appears in every required source.",
        ));
    }

    let split = split_indices(rows.len(), config.test_fraction, config.seed)?;

    let x_train = matrix_for(rows, &split.train);
    let y_train = targets_for(rows, &split.train);
    let x_test = matrix_for(rows, &split.test);
    let y_test = targets_for(rows, &split.test);

    let mut regressor = build_regressor(config.regressor);
    regressor.fit(&x_train, &y_train)?;

    let y_pred_test = regressor.predict(&x_test)?;
    let mae = mean_absolute_error(&y_test, &y_pred_test);

    // Predict every driver, training rows included; the ranking covers the
    // whole field, not just the held-out partition.
    let all: Vec<usize> = (0..rows.len()).collect();
    let y_pred_all = regressor.predict(&matrix_for(rows, &all))?;

    let predictions = rows
        .iter()
        .zip(y_pred_all.iter())
        .map(|(row, &predicted)| PredictionResult {
            driver: row.driver.clone(),
            predicted,
        })
        .collect();

    Ok(FitOutcome {
        predictions,
        mae,
        n_train: split.train.len(),
        n_test: split.test.len(),
    })
}

fn matrix_for(rows: &[FeatureRow], indices: &[usize]) -> DMatrix<f64> {
    let width = rows.first().map_or(0, |r| r.features.len());
    DMatrix::from_fn(indices.len(), width, |r, c| rows[indices[r]].features[c])
}

fn targets_for(rows: &[FeatureRow], indices: &[usize]) -> DVector<f64> {
    DVector::from_iterator(indices.len(), indices.iter().map(|&i| rows[i].target))
}

fn mean_absolute_error(actual: &DVector<f64>, predicted: &DVector<f64>) -> f64 {
    let n = actual.len();
    let total: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).abs())
        .sum();
    total / n as f64
}
