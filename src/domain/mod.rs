//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw timing inputs as loaded from source tables (`RawTimeValue`, `LapChart`)
//! - normalized per-lap and per-driver records (`LapRecord`, `DriverStats`)
//! - modeling inputs and outputs (`FeatureRow`, `PredictionResult`)
//! - run configuration (`PredictConfig`)

pub mod types;

pub use types::*;
