//! Per-driver lap statistics.

use std::collections::HashMap;

use crate::domain::{DriverStats, LapRecord};

/// Aggregate lap records into one [`DriverStats`] per distinct driver.
///
/// Standard deviation uses the sample convention (n-1 divisor); a driver with
/// a single lap gets 0.0 rather than an undefined value, so single-lap
/// drivers stay usable as feature rows. Output is sorted by driver id.
pub fn aggregate(records: &[LapRecord]) -> Vec<DriverStats> {
    let mut by_driver: HashMap<&str, Vec<f64>> = HashMap::new();
    for record in records {
        by_driver
            .entry(record.driver.as_str())
            .or_default()
            .push(record.seconds);
    }

    let mut out: Vec<DriverStats> = by_driver
        .into_iter()
        .map(|(driver, times)| {
            let n = times.len();
            let mean = times.iter().sum::<f64>() / n as f64;
            let min = times.iter().copied().fold(f64::INFINITY, f64::min);
            DriverStats {
                driver: driver.to_string(),
                mean,
                std_dev: sample_std_dev(&times, mean),
                min,
                laps: n,
            }
        })
        .collect();

    out.sort_by(|a, b| a.driver.cmp(&b.driver));
    out
}

fn sample_std_dev(times: &[f64], mean: f64) -> f64 {
    if times.len() < 2 {
        return 0.0;
    }
    let sum_sq: f64 = times.iter().map(|t| (t - mean).powi(2)).sum();
    (sum_sq / (times.len() - 1) as f64).sqrt()
}
