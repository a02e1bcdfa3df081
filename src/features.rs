//! Feature assembly: inner join of driver stats, qualifying, and results.

use std::collections::HashMap;

use crate::domain::{DriverStats, FeatureKind, FeatureRow, QualifyingEntry, RaceResultEntry};
use crate::error::AppError;

/// Join per-driver statistics with qualifying times (and, for the extended
/// feature set, finishing positions) into feature rows.
///
/// The join is an inner join on the normalized driver id: a driver absent
/// from any required source — or whose qualifying time is undefined — is
/// excluded from the result. That exclusion is deliberate filtering, not
/// data loss; the report surfaces how many drivers made it through.
///
/// The target of every row is the driver's mean lap time.
pub fn join(
    stats: &[DriverStats],
    qualifying: &[QualifyingEntry],
    results: Option<&[RaceResultEntry]>,
    kind: FeatureKind,
) -> Result<Vec<FeatureRow>, AppError> {
    let quali_by_driver: HashMap<&str, f64> = qualifying
        .iter()
        .filter_map(|q| q.seconds.map(|s| (q.driver.as_str(), s)))
        .collect();

    let positions_by_driver: Option<HashMap<&str, u32>> =
        results.map(|r| r.iter().map(|e| (e.driver.as_str(), e.position)).collect());

    if kind == FeatureKind::Extended && positions_by_driver.is_none() {
        return Err(AppError::input(
            "The extended feature set requires a race results sheet (`--results`).",
        ));
    }

    // `stats` is already sorted by driver id, so the output is too.
    let mut rows = Vec::new();
    for s in stats {
        let Some(&quali) = quali_by_driver.get(s.driver.as_str()) else {
            continue;
        };

        let features = match kind {
            FeatureKind::Baseline => vec![quali],
            FeatureKind::Extended => {
                let pos = positions_by_driver
                    .as_ref()
                    .and_then(|positions| positions.get(s.driver.as_str()));
                let Some(&pos) = pos else {
                    continue;
                };
                vec![quali, s.std_dev, s.min, f64::from(pos)]
            }
        };

        rows.push(FeatureRow {
            driver: s.driver.clone(),
            features,
            target: s.mean,
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(driver: &str, mean: f64, std_dev: f64, min: f64) -> DriverStats {
        DriverStats {
            driver: driver.to_string(),
            mean,
            std_dev,
            min,
            laps: 10,
        }
    }

    fn quali(driver: &str, seconds: Option<f64>) -> QualifyingEntry {
        QualifyingEntry {
            driver: driver.to_string(),
            seconds,
        }
    }

    fn result(driver: &str, position: u32) -> RaceResultEntry {
        RaceResultEntry {
            driver: driver.to_string(),
            position,
        }
    }

    #[test]
    fn inner_join_keeps_only_drivers_in_every_source() {
        let s = vec![stats("A", 72.0, 1.0, 70.0), stats("B", 73.0, 1.0, 71.0)];
        let q = vec![quali("A", Some(69.0)), quali("C", Some(68.5))];

        let rows = join(&s, &q, None, FeatureKind::Baseline).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].driver, "A");
        assert_eq!(rows[0].features, vec![69.0]);
        assert_eq!(rows[0].target, 72.0);
    }

    #[test]
    fn undefined_qualifying_time_excludes_the_driver() {
        let s = vec![stats("A", 72.0, 1.0, 70.0), stats("B", 73.0, 1.0, 71.0)];
        let q = vec![quali("A", None), quali("B", Some(70.0))];

        let rows = join(&s, &q, None, FeatureKind::Baseline).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].driver, "B");
    }

    #[test]
    fn extended_features_in_documented_order() {
        let s = vec![stats("A", 72.0, 1.5, 70.0)];
        let q = vec![quali("A", Some(69.0))];
        let r = vec![result("A", 4)];

        let rows = join(&s, &q, Some(&r), FeatureKind::Extended).unwrap();
        assert_eq!(rows[0].features, vec![69.0, 1.5, 70.0, 4.0]);
    }

    #[test]
    fn extended_excludes_drivers_missing_from_results() {
        let s = vec![stats("A", 72.0, 1.5, 70.0), stats("B", 73.0, 1.0, 71.0)];
        let q = vec![quali("A", Some(69.0)), quali("B", Some(70.0))];
        let r = vec![result("B", 2)];

        let rows = join(&s, &q, Some(&r), FeatureKind::Extended).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].driver, "B");
    }

    #[test]
    fn extended_without_results_is_a_usage_error() {
        let s = vec![stats("A", 72.0, 1.5, 70.0)];
        let q = vec![quali("A", Some(69.0))];

        let err = join(&s, &q, None, FeatureKind::Extended).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
