//! Shared "predict pipeline" logic used by both the `fit` and `rank` commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load -> normalize -> reshape -> aggregate -> join -> fit/predict -> rank
//!
//! The command handlers can then focus on presentation (full report vs
//! rankings only).

use crate::domain::{
    DriverStats, FeatureKind, FeatureRow, FeatureSet, PredictConfig, QualifyingEntry,
};
use crate::error::AppError;
use crate::features::join;
use crate::fit::{FitOutcome, fit_and_predict};
use crate::io::loader::{RowError, load_lap_chart, load_qualifying, load_race_results};
use crate::report::{Ranking, rank_by_prediction};
use crate::reshape::reshape;
use crate::stats::aggregate;

/// All computed outputs of a single predict run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub stats: Vec<DriverStats>,
    pub rows: Vec<FeatureRow>,
    pub feature_kind: FeatureKind,
    pub outcome: FitOutcome,
    pub ranking: Ranking,
    /// Row-level problems from all three loaders, surfaced in the report.
    pub row_errors: Vec<RowError>,
    /// Count of normalized times at or below zero (passed through unchanged).
    pub non_positive_times: usize,
}

/// Execute the full predict pipeline and return the computed outputs.
pub fn run_predict(config: &PredictConfig) -> Result<RunOutput, AppError> {
    // 1) Load the source tables.
    let chart_load = load_lap_chart(&config.laps_path)?;
    let quali_load = load_qualifying(&config.qualifying_path)?;
    let results_load = match &config.results_path {
        Some(path) => Some(load_race_results(path)?),
        None => None,
    };

    let mut row_errors = chart_load.row_errors;
    row_errors.extend(quali_load.row_errors);
    if let Some(load) = &results_load {
        row_errors.extend(load.row_errors.iter().cloned());
    }

    // 2) Reshape the wide chart and aggregate per-driver statistics.
    let records = reshape(&chart_load.chart);
    if records.is_empty() {
        return Err(AppError::insufficient_data(
            "No usable lap times remain after normalization.",
        ));
    }
    let stats = aggregate(&records);

    let non_positive_times = records.iter().filter(|r| r.seconds <= 0.0).count()
        + count_non_positive(&quali_load.entries);

    // 3) Resolve the feature set and join the sources.
    let feature_kind = resolve_feature_kind(config.feature_set, results_load.is_some())?;
    let rows = join(
        &stats,
        &quali_load.entries,
        results_load.as_ref().map(|l| l.entries.as_slice()),
        feature_kind,
    )?;

    // 4) Split, fit, evaluate, predict.
    let outcome = fit_and_predict(&rows, config)?;

    // 5) Rank the field by predicted average lap.
    let ranking = rank_by_prediction(&outcome.predictions);

    Ok(RunOutput {
        stats,
        rows,
        feature_kind,
        outcome,
        ranking,
        row_errors,
        non_positive_times,
    })
}

/// Resolve `FeatureSet::Auto` against the sources actually supplied.
pub fn resolve_feature_kind(
    feature_set: FeatureSet,
    have_results: bool,
) -> Result<FeatureKind, AppError> {
    match feature_set {
        FeatureSet::Baseline => Ok(FeatureKind::Baseline),
        FeatureSet::Extended if have_results => Ok(FeatureKind::Extended),
        FeatureSet::Extended => Err(AppError::input(
            "`--features extended` requires a race results sheet (`--results`).",
        )),
        FeatureSet::Auto if have_results => Ok(FeatureKind::Extended),
        FeatureSet::Auto => Ok(FeatureKind::Baseline),
    }
}

fn count_non_positive(entries: &[QualifyingEntry]) -> usize {
    entries
        .iter()
        .filter(|q| q.seconds.is_some_and(|s| s <= 0.0))
        .count()
}
