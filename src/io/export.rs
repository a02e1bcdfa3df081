//! Export the ranked predictions to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::AppError;
use crate::report::Ranking;

/// Write the ranked field to a CSV file, one row per driver.
pub fn write_rankings_csv(path: &Path, ranking: &Ranking) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::input(format!(
            "Failed to create export CSV '{}': {e}",
            path.display()
        ))
    })?;

    writeln!(file, "rank,driver,predicted_avg_lap_s")
        .map_err(|e| AppError::input(format!("Failed to write export CSV header: {e}")))?;

    for (idx, entry) in ranking.entries.iter().enumerate() {
        writeln!(file, "{},{},{:.6}", idx + 1, entry.driver, entry.predicted)
            .map_err(|e| AppError::input(format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PredictionResult;
    use crate::report::rank_by_prediction;

    #[test]
    fn export_writes_header_and_one_row_per_driver() {
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

        let path = std::env::temp_dir().join("race-pace-export-test.csv");
        write_rankings_csv(&path, &ranking).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "rank,driver,predicted_avg_lap_s");
        assert!(lines[1].starts_with("1,B,"));
        assert!(lines[2].starts_with("2,A,"));
    }
}
