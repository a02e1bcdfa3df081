//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during the pipeline run
//! - exported to CSV
//! - constructed directly by tests and alternative loaders

use std::path::PathBuf;

use chrono::NaiveTime;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One cell of a timing table, before normalization into canonical seconds.
///
/// Source spreadsheets are inconsistent about how lap and qualifying times are
/// encoded: some cells arrive as true durations, some as a wall-clock value
/// (a "1:12.3" lap stored as a time-of-day), some as free text, and some as a
/// bare number of seconds. Exactly one variant is active per cell, and
/// `Missing` is distinct from a zero duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawTimeValue {
    /// A true duration, in seconds.
    Duration(f64),
    /// A lap time that was stored as a time-of-day value.
    ///
    /// Only the minute/second/sub-second fields are meaningful; the hour is
    /// ignored during normalization (lap times never exceed 60 minutes).
    WallClock(NaiveTime),
    /// Free text such as `"1:12.345"` or `"0:01:12.3"`.
    Text(String),
    /// A bare numeric value, taken to already be seconds.
    Numeric(f64),
    /// An empty cell. Distinct from a zero duration.
    Missing,
}

/// A wide lap chart: one row per driver, one column per lap.
#[derive(Debug, Clone, PartialEq)]
pub struct LapChart {
    /// Lap column names, in table order.
    pub lap_columns: Vec<String>,
    pub rows: Vec<LapChartRow>,
}

/// One driver's row of the wide lap chart.
#[derive(Debug, Clone, PartialEq)]
pub struct LapChartRow {
    /// Normalized driver identifier (see [`normalize_driver_id`]).
    pub driver: String,
    /// One cell per entry in `LapChart::lap_columns`.
    pub cells: Vec<RawTimeValue>,
}

/// One completed lap, produced by reshaping the wide lap chart.
///
/// Cells whose time could not be normalized never become records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LapRecord {
    pub driver: String,
    /// 1-based lap index (column position in the source chart).
    pub lap: u32,
    pub seconds: f64,
}

/// Per-driver summary statistics over completed laps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverStats {
    pub driver: String,
    pub mean: f64,
    /// Sample standard deviation (n-1 divisor); 0.0 for a single-lap driver.
    pub std_dev: f64,
    pub min: f64,
    /// Number of completed laps behind these statistics.
    pub laps: usize,
}

/// One driver's qualifying time, already normalized.
///
/// `None` means the source value was missing or unparsable; the join drops
/// such drivers the same way it drops any other missing key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualifyingEntry {
    pub driver: String,
    pub seconds: Option<f64>,
}

/// One driver's finishing position from the race results sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceResultEntry {
    pub driver: String,
    /// 1-based finishing position.
    pub position: u32,
}

/// One driver's feature vector and target, ready for the regressor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRow {
    pub driver: String,
    pub features: Vec<f64>,
    /// Mean lap time in seconds (the value the model predicts).
    pub target: f64,
}

/// One driver's predicted target value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub driver: String,
    pub predicted: f64,
}

/// Which feature set to build, as requested on the command line.
///
/// `Auto` means: `Extended` when a race-results sheet was supplied, otherwise
/// `Baseline`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FeatureSet {
    Auto,
    Baseline,
    Extended,
}

/// Concrete feature set actually used after resolving `FeatureSet::Auto`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureKind {
    /// Qualifying time only.
    Baseline,
    /// Qualifying time, lap-time standard deviation, lap-time minimum, and
    /// finishing position. Requires race results.
    Extended,
}

impl FeatureKind {
    /// Column labels for reports and exports, in feature-vector order.
    pub fn feature_names(self) -> &'static [&'static str] {
        match self {
            FeatureKind::Baseline => &["QualifyingTime_s"],
            FeatureKind::Extended => &[
                "QualifyingTime_s",
                "LapTimeStd",
                "LapTimeMin",
                "FinishPos",
            ],
        }
    }
}

/// Which regressor to fit behind the capability interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RegressorKind {
    /// Ordinary least squares with an intercept.
    Linear,
    /// Gradient-boosted regression stumps.
    Boost,
}

/// Resolved configuration for a single predict run.
#[derive(Debug, Clone)]
pub struct PredictConfig {
    pub laps_path: PathBuf,
    pub qualifying_path: PathBuf,
    pub results_path: Option<PathBuf>,
    pub feature_set: FeatureSet,
    pub regressor: RegressorKind,
    /// Seed for the train/test shuffle; fixing it makes runs reproducible.
    pub seed: u64,
    /// Fraction of feature rows held out for evaluation, in (0, 1).
    pub test_fraction: f64,
    /// Podium size printed in the full report.
    pub top_n: usize,
    pub export_results: Option<PathBuf>,
}

/// Normalize a driver identifier for joining across sources.
///
/// Sources disagree on casing and padding ("Palou", " PALOU "), and the joins
/// use exact equality, so identifiers are trimmed and upper-cased once at
/// ingestion.
pub fn normalize_driver_id(raw: &str) -> String {
    raw.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_id_normalization_trims_and_folds_case() {
        assert_eq!(normalize_driver_id("  Palou "), "PALOU");
        assert_eq!(normalize_driver_id("o'ward"), "O'WARD");
        assert_eq!(normalize_driver_id("ROSENQVIST"), "ROSENQVIST");
    }

    #[test]
    fn missing_is_not_a_zero_duration() {
        assert_ne!(RawTimeValue::Missing, RawTimeValue::Duration(0.0));
    }
}
