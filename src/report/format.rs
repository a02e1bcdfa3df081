//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the pipeline stages stay clean and testable
//! - output changes are localized

use crate::domain::{FeatureKind, FeatureRow, PredictConfig, RegressorKind};
use crate::fit::FitOutcome;
use crate::io::loader::RowError;
use crate::report::Ranking;

/// Format the full run summary: configuration, the table of data actually
/// used for modeling, held-out error, and any data-quality notes.
pub fn format_run_summary(
    rows: &[FeatureRow],
    kind: FeatureKind,
    outcome: &FitOutcome,
    config: &PredictConfig,
    row_errors: &[RowError],
    non_positive_times: usize,
) -> String {
    let mut out = String::new();

    out.push_str("=== race-pace - Predicted Race Pace ===\n");
    out.push_str(&format!(
        "Features: {} ({})\n",
        feature_kind_label(kind),
        kind.feature_names().join(", "),
    ));
    out.push_str(&format!(
        "Model: {} | seed={} | test fraction={:.2}\n",
        regressor_label(config.regressor),
        config.seed,
        config.test_fraction,
    ));
    out.push_str(&format!(
        "Rows: n={} (train={}, test={})\n",
        rows.len(),
        outcome.n_train,
        outcome.n_test,
    ));

    out.push_str("\n=== Data used for modeling ===\n");
    out.push_str(&format_feature_table(rows, kind));

    out.push_str(&format!("\nHeld-out MAE: {:.3} s\n", outcome.mae));

    if !row_errors.is_empty() {
        out.push_str(&format!("\nSkipped {} input row(s):\n", row_errors.len()));
        for err in row_errors {
            match &err.driver {
                Some(driver) => {
                    out.push_str(&format!("  - line {} ({}): {}\n", err.line, driver, err.message))
                }
                None => out.push_str(&format!("  - line {}: {}\n", err.line, err.message)),
            }
        }
    }
    if non_positive_times > 0 {
        out.push_str(&format!(
            "Note: {non_positive_times} non-positive time value(s) passed through unchanged.\n"
        ));
    }

    out
}

/// Format the ranked field: the top `top_n` entries plus the predicted winner.
pub fn format_rankings(ranking: &Ranking, top_n: usize) -> String {
    let mut out = String::new();

    out.push_str("=== Predicted ranking (fastest avg lap first) ===\n");
    for (pos, entry) in ranking.podium(top_n).iter().enumerate() {
        out.push_str(&format!(
            "{:>3}. {:<12} {:>10.3}\n",
            pos + 1,
            entry.driver,
            entry.predicted,
        ));
    }

    if let Some(winner) = ranking.winner() {
        out.push_str(&format!("\nPredicted winner: {}\n", winner.driver));
    }

    out
}

fn format_feature_table(rows: &[FeatureRow], kind: FeatureKind) -> String {
    let driver_width = rows
        .iter()
        .map(|r| r.driver.len())
        .chain(std::iter::once("Driver".len()))
        .max()
        .unwrap_or(6);

    let mut out = String::new();
    out.push_str(&format!("{:<driver_width$}", "Driver"));
    for name in kind.feature_names() {
        out.push_str(&format!("  {name:>16}"));
    }
    out.push_str(&format!("  {:>12}\n", "AvgLapTime"));

    for row in rows {
        out.push_str(&format!("{:<driver_width$}", row.driver));
        for value in &row.features {
            out.push_str(&format!("  {value:>16.3}"));
        }
        out.push_str(&format!("  {:>12.3}\n", row.target));
    }

    out
}

fn feature_kind_label(kind: FeatureKind) -> &'static str {
    match kind {
        FeatureKind::Baseline => "baseline",
        FeatureKind::Extended => "extended",
    }
}

fn regressor_label(kind: RegressorKind) -> &'static str {
    match kind {
        RegressorKind::Linear => "linear",
        RegressorKind::Boost => "boost",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeatureSet, PredictionResult};
    use crate::report::rank_by_prediction;

    fn sample_config() -> PredictConfig {
        PredictConfig {
            laps_path: "laps.csv".into(),
            qualifying_path: "qual.csv".into(),
            results_path: None,
            feature_set: FeatureSet::Auto,
            regressor: RegressorKind::Linear,
            seed: 42,
            test_fraction: 0.2,
            top_n: 3,
            export_results: None,
        }
    }

    #[test]
    fn summary_includes_table_and_mae() {
        let rows = vec![FeatureRow {
            driver: "PALOU".to_string(),
            features: vec![68.412],
            target: 71.842,
        }];
        let outcome = FitOutcome {
            predictions: vec![PredictionResult {
                driver: "PALOU".to_string(),
                predicted: 71.8,
            }],
            mae: 0.432,
            n_train: 1,
            n_test: 1,
        };

        let text = format_run_summary(
            &rows,
            FeatureKind::Baseline,
            &outcome,
            &sample_config(),
            &[],
            0,
        );
        assert!(text.contains("Data used for modeling"));
        assert!(text.contains("PALOU"));
        assert!(text.contains("QualifyingTime_s"));
        assert!(text.contains("Held-out MAE: 0.432 s"));
        assert!(!text.contains("non-positive"));
    }

    #[test]
    fn summary_surfaces_data_quality_notes() {
        let text = format_run_summary(
            &[],
            FeatureKind::Baseline,
            &FitOutcome {
                predictions: vec![],
                mae: 0.0,
                n_train: 0,
                n_test: 0,
            },
            &sample_config(),
            &[RowError {
                line: 5,
                driver: None,
                message: "CSV parse error".to_string(),
            }],
            2,
        );
        assert!(text.contains("Skipped 1 input row(s)"));
        assert!(text.contains("line 5"));
        assert!(text.contains("2 non-positive time value(s)"));
    }

    #[test]
    fn rankings_list_winner_first() {
        let ranking = rank_by_prediction(&[
            PredictionResult {
                driver: "A".to_string(),
                predicted: 71.2,
            },
            PredictionResult {
                driver: "B".to_string(),
                predicted: 69.9,
            },
        ]);

        let text = format_rankings(&ranking, 3);
        assert!(text.contains("  1. B"));
        assert!(text.contains("Predicted winner: B"));
    }
}
