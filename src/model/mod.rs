//! Regression models behind a narrow capability interface.
//!
//! The pipeline never names a concrete algorithm; it fits and predicts
//! through [`Regressor`], so swapping ordinary least squares for the boosted
//! ensemble (or a future model) touches nothing outside this module.

use nalgebra::{DMatrix, DVector};

use crate::domain::RegressorKind;
use crate::error::AppError;

pub mod boost;
pub mod linear;

pub use boost::GradientBoost;
pub use linear::LinearRegressor;

/// The capability interface every regression model satisfies.
pub trait Regressor {
    /// Fit the model on a design matrix (one row per driver) and targets.
    fn fit(&mut self, x: &DMatrix<f64>, y: &DVector<f64>) -> Result<(), AppError>;

    /// Predict targets for each row of `x`. Errors if called before `fit`.
    fn predict(&self, x: &DMatrix<f64>) -> Result<DVector<f64>, AppError>;
}

/// Construct the regressor selected on the command line.
pub fn build_regressor(kind: RegressorKind) -> Box<dyn Regressor> {
    match kind {
        RegressorKind::Linear => Box::new(LinearRegressor::new()),
        RegressorKind::Boost => Box::new(GradientBoost::default()),
    }
}

/// Reject design matrices the models cannot digest.
///
/// Shared by both implementations so a non-finite feature surfaces as a
/// model error (exit code 4) instead of a silent NaN prediction.
pub(crate) fn validate_training_data(
    x: &DMatrix<f64>,
    y: &DVector<f64>,
) -> Result<(), AppError> {
    if x.nrows() == 0 || x.ncols() == 0 {
        return Err(AppError::model("Empty design matrix."));
    }
    if x.nrows() != y.len() {
        return Err(AppError::model(format!(
            "Design matrix has {} rows but {} targets.",
            x.nrows(),
            y.len()
        )));
    }
    if x.iter().any(|v| !v.is_finite()) || y.iter().any(|v| !v.is_finite()) {
        return Err(AppError::model(
            "Non-finite value in the feature matrix or targets.",
        ));
    }
    Ok(())
}
