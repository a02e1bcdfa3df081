//! Ordinary least squares with an intercept.
//!
//! Feature matrices here are tiny (a handful of columns, tens of rows), so we
//! solve the least-squares problem by SVD, which stays robust when the design
//! matrix is tall or nearly collinear. (Nalgebra's `QR::solve` is intended
//! for square systems and will panic for non-square matrices.)

use nalgebra::{DMatrix, DVector};

use crate::error::AppError;
use crate::model::{Regressor, validate_training_data};

/// `y = β0 + β1·x1 + ... + βd·xd`, fit by SVD least squares.
#[derive(Debug, Clone, Default)]
pub struct LinearRegressor {
    betas: Option<DVector<f64>>,
}

impl LinearRegressor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fitted coefficients, intercept first. `None` before `fit`.
    pub fn coefficients(&self) -> Option<&DVector<f64>> {
        self.betas.as_ref()
    }
}

impl Regressor for LinearRegressor {
    fn fit(&mut self, x: &DMatrix<f64>, y: &DVector<f64>) -> Result<(), AppError> {
        validate_training_data(x, y)?;

        let design = with_intercept(x);
        let betas = solve_least_squares(&design, y).ok_or_else(|| {
            AppError::model("Least-squares solve failed: design matrix is too ill-conditioned.")
        })?;
        self.betas = Some(betas);
        Ok(())
    }

    fn predict(&self, x: &DMatrix<f64>) -> Result<DVector<f64>, AppError> {
        let betas = self
            .betas
            .as_ref()
            .ok_or_else(|| AppError::model("Linear model predicted before being fit."))?;
        Ok(with_intercept(x) * betas)
    }
}

/// Prepend a constant column so the model carries an intercept term.
fn with_intercept(x: &DMatrix<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(x.nrows(), x.ncols() + 1, |r, c| {
        if c == 0 { 1.0 } else { x[(r, c - 1)] }
    })
}

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if the strict solve fails; lap and
    // qualifying times sit in a narrow band, so columns can be near-collinear.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(betas) = svd.solve(y, tol) {
            if betas.iter().all(|v| v.is_finite()) {
                return Some(betas);
            }
        }
    }

    None
}
