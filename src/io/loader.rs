//! CSV loading for the three source tables.
//!
//! This module turns heterogeneous race spreadsheet exports into tables of
//! [`RawTimeValue`] cells that are safe to feed into the pipeline.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (no hidden randomness)
//! - **Separation of concerns**: no time normalization or modeling here,
//!   except that qualifying times are normalized on the way in because the
//!   rest of the pipeline only ever sees them in canonical seconds

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{
    LapChart, LapChartRow, QualifyingEntry, RaceResultEntry, RawTimeValue, normalize_driver_id,
};
use crate::error::AppError;
use crate::time::to_seconds;

/// A row-level error encountered during loading.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub driver: Option<String>,
    pub message: String,
}

/// Loaded lap chart plus per-row diagnostics.
#[derive(Debug, Clone)]
pub struct LapChartLoad {
    pub chart: LapChart,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Loaded qualifying sheet plus per-row diagnostics.
#[derive(Debug, Clone)]
pub struct QualifyingLoad {
    pub entries: Vec<QualifyingEntry>,
    pub row_errors: Vec<RowError>,
}

/// Loaded race results plus per-row diagnostics.
#[derive(Debug, Clone)]
pub struct ResultsLoad {
    pub entries: Vec<RaceResultEntry>,
    pub row_errors: Vec<RowError>,
}

/// Load the wide lap chart: a `DRIVER` column plus one column per lap.
pub fn load_lap_chart(path: &Path) -> Result<LapChartLoad, AppError> {
    read_lap_chart(open(path)?)
        .map_err(|e| AppError::new(e.exit_code(), format!("{}: {e}", path.display())))
}

/// Load the qualifying sheet: `Driver` and `Time` columns.
pub fn load_qualifying(path: &Path) -> Result<QualifyingLoad, AppError> {
    read_qualifying(open(path)?)
        .map_err(|e| AppError::new(e.exit_code(), format!("{}: {e}", path.display())))
}

/// Load the race results: `Driver` and `Pos` columns.
pub fn load_race_results(path: &Path) -> Result<ResultsLoad, AppError> {
    read_race_results(open(path)?)
        .map_err(|e| AppError::new(e.exit_code(), format!("{}: {e}", path.display())))
}

fn open(path: &Path) -> Result<File, AppError> {
    File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))
}

/// Parse a wide lap chart from any reader (tests use in-memory bytes).
pub fn read_lap_chart<R: Read>(reader: R) -> Result<LapChartLoad, AppError> {
    let mut reader = csv_reader(reader);
    let headers = read_headers(&mut reader)?;
    let header_map = build_header_map(&headers);

    let driver_idx = *header_map
        .get("driver")
        .ok_or_else(|| AppError::input("Missing required column `driver` in the lap chart."))?;

    // Every non-driver column is a lap column, in table order.
    let lap_indices: Vec<usize> = (0..headers.len()).filter(|&i| i != driver_idx).collect();
    let lap_columns: Vec<String> = lap_indices
        .iter()
        .map(|&i| headers.get(i).unwrap_or("").trim().to_string())
        .collect();

    let mut rows = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header row, and CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    driver: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let Some(driver) = required_driver(&record, driver_idx) else {
            row_errors.push(RowError {
                line,
                driver: None,
                message: "Empty driver identifier.".to_string(),
            });
            continue;
        };

        let cells = lap_indices
            .iter()
            .map(|&i| classify_cell(record.get(i).unwrap_or("")))
            .collect();
        rows.push(LapChartRow { driver, cells });
    }

    Ok(LapChartLoad {
        chart: LapChart { lap_columns, rows },
        row_errors,
        rows_read,
    })
}

/// Parse a qualifying sheet from any reader.
///
/// Times are normalized here; an unparsable time is kept as an entry with an
/// undefined value (the join drops it later), not treated as a bad row.
pub fn read_qualifying<R: Read>(reader: R) -> Result<QualifyingLoad, AppError> {
    let mut reader = csv_reader(reader);
    let headers = read_headers(&mut reader)?;
    let header_map = build_header_map(&headers);

    let driver_idx = *header_map
        .get("driver")
        .ok_or_else(|| AppError::input("Missing required column `driver` in qualifying."))?;
    let time_idx = *header_map
        .get("time")
        .ok_or_else(|| AppError::input("Missing required column `time` in qualifying."))?;

    let mut entries = Vec::new();
    let mut row_errors = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    driver: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let Some(driver) = required_driver(&record, driver_idx) else {
            row_errors.push(RowError {
                line,
                driver: None,
                message: "Empty driver identifier.".to_string(),
            });
            continue;
        };

        let seconds = to_seconds(&classify_cell(record.get(time_idx).unwrap_or("")));
        entries.push(QualifyingEntry { driver, seconds });
    }

    Ok(QualifyingLoad {
        entries,
        row_errors,
    })
}

/// Parse race results from any reader.
pub fn read_race_results<R: Read>(reader: R) -> Result<ResultsLoad, AppError> {
    let mut reader = csv_reader(reader);
    let headers = read_headers(&mut reader)?;
    let header_map = build_header_map(&headers);

    let driver_idx = *header_map
        .get("driver")
        .ok_or_else(|| AppError::input("Missing required column `driver` in race results."))?;
    let pos_idx = *header_map
        .get("pos")
        .ok_or_else(|| AppError::input("Missing required column `pos` in race results."))?;

    let mut entries = Vec::new();
    let mut row_errors = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    driver: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let Some(driver) = required_driver(&record, driver_idx) else {
            row_errors.push(RowError {
                line,
                driver: None,
                message: "Empty driver identifier.".to_string(),
            });
            continue;
        };

        let raw_pos = record.get(pos_idx).unwrap_or("").trim();
        match raw_pos.parse::<u32>() {
            Ok(position) if position >= 1 => entries.push(RaceResultEntry { driver, position }),
            _ => {
                // Covers DNF/DNS markers and zero/garbage positions.
                row_errors.push(RowError {
                    line,
                    driver: Some(driver),
                    message: format!("Unusable finishing position '{raw_pos}'."),
                });
            }
        }
    }

    Ok(ResultsLoad {
        entries,
        row_errors,
    })
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn read_headers<R: Read>(reader: &mut csv::Reader<R>) -> Result<StringRecord, AppError> {
    Ok(reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?
        .clone())
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel exports sometimes carry a UTF-8 BOM on the first header; without
    // stripping it, schema validation reports the column as missing.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn required_driver(record: &StringRecord, driver_idx: usize) -> Option<String> {
    let raw = record.get(driver_idx)?.trim();
    if raw.is_empty() {
        return None;
    }
    Some(normalize_driver_id(raw))
}

/// Classify one cell of a time column.
///
/// Empty cells are `Missing`; cells that read as a number are `Numeric`
/// (already seconds); everything else is `Text` and left for the two-stage
/// time parser to interpret.
pub fn classify_cell(raw: &str) -> RawTimeValue {
    let s = raw.trim();
    if s.is_empty() {
        return RawTimeValue::Missing;
    }
    if let Ok(x) = s.parse::<f64>() {
        return RawTimeValue::Numeric(x);
    }
    RawTimeValue::Text(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_cell_covers_the_three_csv_shapes() {
        assert_eq!(classify_cell("  "), RawTimeValue::Missing);
        assert_eq!(classify_cell("70.25"), RawTimeValue::Numeric(70.25));
        assert_eq!(
            classify_cell("1:12.345"),
            RawTimeValue::Text("1:12.345".to_string())
        );
    }

    #[test]
    fn lap_chart_parses_drivers_and_lap_columns() {
        let csv = "DRIVER,Lap 1,Lap 2,Lap 3\n\
                   Palou,70.1,1:10.5,\n\
                   O'Ward,71.0,,71.4\n";
        let load = read_lap_chart(csv.as_bytes()).unwrap();

        assert_eq!(load.chart.lap_columns, ["Lap 1", "Lap 2", "Lap 3"]);
        assert_eq!(load.rows_read, 2);
        assert!(load.row_errors.is_empty());

        let first = &load.chart.rows[0];
        assert_eq!(first.driver, "PALOU");
        assert_eq!(first.cells[0], RawTimeValue::Numeric(70.1));
        assert_eq!(first.cells[1], RawTimeValue::Text("1:10.5".to_string()));
        assert_eq!(first.cells[2], RawTimeValue::Missing);
    }

    #[test]
    fn lap_chart_requires_a_driver_column() {
        let err = read_lap_chart("Name,Lap 1\nPalou,70.1\n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn bom_on_the_first_header_is_stripped() {
        let csv = "\u{feff}Driver,Time\nPalou,1:08.4\n";
        let load = read_qualifying(csv.as_bytes()).unwrap();
        assert_eq!(load.entries.len(), 1);
        assert_eq!(load.entries[0].driver, "PALOU");
    }

    #[test]
    fn qualifying_times_are_normalized_on_load() {
        let csv = "Driver,Time\nPalou,1:08.4\nDixon,68.9\nMalukas,banana\n";
        let load = read_qualifying(csv.as_bytes()).unwrap();

        assert_eq!(load.entries.len(), 3);
        assert!((load.entries[0].seconds.unwrap() - 68.4).abs() < 1e-12);
        assert_eq!(load.entries[1].seconds, Some(68.9));
        // Unparsable time: kept, undefined, dropped later by the join.
        assert_eq!(load.entries[2].seconds, None);
        assert!(load.row_errors.is_empty());
    }

    #[test]
    fn empty_driver_rows_are_skipped_with_a_row_error() {
        let csv = "Driver,Time\n ,1:08.4\nDixon,68.9\n";
        let load = read_qualifying(csv.as_bytes()).unwrap();

        assert_eq!(load.entries.len(), 1);
        assert_eq!(load.row_errors.len(), 1);
        assert_eq!(load.row_errors[0].line, 2);
    }

    #[test]
    fn race_results_reject_unusable_positions() {
        let csv = "Driver,Pos\nPalou,1\nDixon,DNF\nMalukas,0\n";
        let load = read_race_results(csv.as_bytes()).unwrap();

        assert_eq!(load.entries.len(), 1);
        assert_eq!(load.entries[0].position, 1);
        assert_eq!(load.row_errors.len(), 2);
    }

    #[test]
    fn header_matching_is_case_insensitive() {
        let csv = "DRIVER,POS\nPalou,2\n";
        let load = read_race_results(csv.as_bytes()).unwrap();
        assert_eq!(load.entries[0].position, 2);
    }
}
