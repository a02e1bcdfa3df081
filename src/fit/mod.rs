//! Model fitting orchestration.
//!
//! Responsibilities:
//!
//! - split feature rows into train/test partitions with a seeded shuffle
//! - fit the configured regressor on the training partition
//! - evaluate mean absolute error on the held-out partition
//! - predict the target for every row (training rows included)

pub mod predictor;
pub mod split;

pub use predictor::*;
pub use split::*;
