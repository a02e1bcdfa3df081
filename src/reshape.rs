//! Lap chart reshaping: wide (one column per lap) to long (one record per lap).

use crate::domain::{LapChart, LapRecord};
use crate::time::to_seconds;

/// Melt a wide lap chart into one [`LapRecord`] per completed lap.
///
/// A cell whose time normalizes to `None` (the driver did not complete that
/// lap, or the value was unparsable) produces no record at all; it is not
/// carried forward as an undefined entry. Output order carries no meaning
/// downstream; aggregation treats each driver's laps as an unordered multiset.
pub fn reshape(chart: &LapChart) -> Vec<LapRecord> {
    let mut records = Vec::new();
    for row in &chart.rows {
        for (idx, cell) in row.cells.iter().enumerate() {
            if let Some(seconds) = to_seconds(cell) {
                records.push(LapRecord {
                    driver: row.driver.clone(),
                    lap: idx as u32 + 1,
                    seconds,
                });
            }
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LapChartRow, RawTimeValue};

    fn chart(rows: Vec<LapChartRow>) -> LapChart {
        let n = rows.first().map_or(0, |r| r.cells.len());
        LapChart {
            lap_columns: (1..=n).map(|i| format!("Lap {i}")).collect(),
            rows,
        }
    }

    #[test]
    fn missing_cells_are_dropped_not_kept_as_undefined() {
        // 6 cells, 2 missing -> exactly 4 records.
        let c = chart(vec![
            LapChartRow {
                driver: "A".to_string(),
                cells: vec![
                    RawTimeValue::Numeric(70.0),
                    RawTimeValue::Missing,
                    RawTimeValue::Numeric(71.0),
                ],
            },
            LapChartRow {
                driver: "B".to_string(),
                cells: vec![
                    RawTimeValue::Text("1:12.345".to_string()),
                    RawTimeValue::Text("not a time".to_string()),
                    RawTimeValue::Numeric(72.0),
                ],
            },
        ]);

        let records = reshape(&c);
        assert_eq!(records.len(), 4);
        assert!(records.iter().all(|r| r.seconds.is_finite()));
    }

    #[test]
    fn lap_index_tracks_column_position() {
        let c = chart(vec![LapChartRow {
            driver: "A".to_string(),
            cells: vec![RawTimeValue::Missing, RawTimeValue::Numeric(70.5)],
        }]);

        let records = reshape(&c);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].lap, 2);
        assert_eq!(records[0].seconds, 70.5);
    }

    #[test]
    fn empty_chart_yields_no_records() {
        assert!(reshape(&chart(vec![])).is_empty());
    }
}
