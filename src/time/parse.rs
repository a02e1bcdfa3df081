//! Canonicalization of raw time values into seconds.
//!
//! Every time column in the source tables goes through [`to_seconds`] exactly
//! once. The contract:
//!
//! - missing or unparsable input yields `None`, never a panic
//! - a parse must never be silently wrong ("01:12.3" must not become 1.123)
//! - text parsing is two-stage: a structured `H:MM:SS[.frac]` duration parse
//!   first, then a single `M:SS.sss` fallback split; anything beyond that
//!   fails to `None`

use chrono::{NaiveTime, Timelike};

use crate::domain::RawTimeValue;

/// Convert one raw time value into canonical seconds.
///
/// Returns `None` for missing cells, unparsable text, and NaN numerics.
/// Negative durations and numerics pass through unchanged; the report counts
/// non-positive times as a data-quality note.
pub fn to_seconds(value: &RawTimeValue) -> Option<f64> {
    match value {
        RawTimeValue::Missing => None,
        RawTimeValue::Duration(secs) => Some(*secs),
        RawTimeValue::WallClock(t) => Some(wall_clock_seconds(t)),
        RawTimeValue::Text(s) => parse_text(s),
        RawTimeValue::Numeric(x) => {
            if x.is_nan() {
                return None;
            }
            Some(*x)
        }
    }
}

/// Seconds encoded by a lap time that was stored as a time-of-day value.
///
/// The hour field is deliberately ignored: lap times never exceed 60 minutes,
/// so any hour component is an artifact of the spreadsheet cell type.
fn wall_clock_seconds(t: &NaiveTime) -> f64 {
    let micros = t.nanosecond() / 1_000;
    f64::from(t.minute()) * 60.0 + f64::from(t.second()) + f64::from(micros) / 1_000_000.0
}

fn parse_text(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(secs) = parse_structured_duration(s) {
        return Some(secs);
    }

    parse_minutes_seconds(s)
}

/// Structured duration parse: `H:MM:SS` or `H:MM:SS.frac`.
///
/// Minutes and seconds must be below 60. Any other shape (wrong field count,
/// out-of-range fields, non-digit characters) is rejected so the caller can
/// try the fallback.
fn parse_structured_duration(s: &str) -> Option<f64> {
    let mut parts = s.split(':');
    let (hours, minutes, seconds) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let hours = parse_int_field(hours)?;
    let minutes = parse_int_field(minutes)?;
    let seconds = parse_seconds_field(seconds)?;
    if minutes >= 60 || seconds >= 60.0 {
        return None;
    }

    Some(f64::from(hours) * 3600.0 + f64::from(minutes) * 60.0 + seconds)
}

/// Fallback parse: a single `:` separating integer minutes from float seconds,
/// e.g. `"1:12.345"` -> 72.345.
fn parse_minutes_seconds(s: &str) -> Option<f64> {
    let (minutes, seconds) = s.split_once(':')?;
    if seconds.contains(':') {
        return None;
    }

    let minutes = parse_int_field(minutes)?;
    let seconds: f64 = seconds.trim().parse().ok()?;
    if !seconds.is_finite() {
        return None;
    }

    Some(f64::from(minutes) * 60.0 + seconds)
}

/// An unsigned integer field: non-empty, ASCII digits only.
fn parse_int_field(s: &str) -> Option<u32> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// A seconds field: digits with at most one decimal point, e.g. `12` or `12.345`.
fn parse_seconds_field(s: &str) -> Option<f64> {
    let s = s.trim();
    let mut dots = 0usize;
    for b in s.bytes() {
        match b {
            b'0'..=b'9' => {}
            b'.' => dots += 1,
            _ => return None,
        }
    }
    if s.is_empty() || dots > 1 {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_is_undefined() {
        assert_eq!(to_seconds(&RawTimeValue::Missing), None);
    }

    #[test]
    fn duration_passes_through_unchanged() {
        assert_eq!(to_seconds(&RawTimeValue::Duration(71.5)), Some(71.5));
        assert_eq!(to_seconds(&RawTimeValue::Duration(-1.0)), Some(-1.0));
    }

    #[test]
    fn wall_clock_uses_minute_second_micros_and_ignores_hour() {
        let t = NaiveTime::from_hms_micro_opt(0, 1, 12, 345_000).unwrap();
        assert_eq!(to_seconds(&RawTimeValue::WallClock(t)), Some(72.345));

        // An hour component is a spreadsheet artifact, not part of the lap.
        let t = NaiveTime::from_hms_micro_opt(9, 1, 12, 345_000).unwrap();
        assert_eq!(to_seconds(&RawTimeValue::WallClock(t)), Some(72.345));
    }

    #[test]
    fn numeric_passes_through_except_nan() {
        assert_eq!(to_seconds(&RawTimeValue::Numeric(70.25)), Some(70.25));
        assert_eq!(to_seconds(&RawTimeValue::Numeric(-3.0)), Some(-3.0));
        assert_eq!(to_seconds(&RawTimeValue::Numeric(f64::NAN)), None);
    }

    #[test]
    fn minutes_seconds_fallback() {
        let text = |s: &str| to_seconds(&RawTimeValue::Text(s.to_string()));
        assert_eq!(text("1:12.345"), Some(72.345));
        assert_eq!(text("0:59.9"), Some(59.9));
        assert_eq!(text("12:03"), Some(723.0));
        // Leading zeros must not change the meaning.
        assert_eq!(text("01:12.3"), Some(72.3));
    }

    #[test]
    fn structured_duration_form() {
        let text = |s: &str| to_seconds(&RawTimeValue::Text(s.to_string()));
        assert_eq!(text("0:01:12.3"), Some(72.3));
        assert_eq!(text("1:00:00"), Some(3600.0));
        assert_eq!(text("0:00:59.999999"), Some(59.999999));
    }

    #[test]
    fn structured_rejects_out_of_range_fields() {
        let text = |s: &str| to_seconds(&RawTimeValue::Text(s.to_string()));
        assert_eq!(text("0:61:00"), None);
        assert_eq!(text("0:01:72.3"), None);
    }

    #[test]
    fn garbage_text_fails_to_undefined() {
        let text = |s: &str| to_seconds(&RawTimeValue::Text(s.to_string()));
        assert_eq!(text(""), None);
        assert_eq!(text("   "), None);
        assert_eq!(text("abc"), None);
        assert_eq!(text("1:2:3:4"), None);
        assert_eq!(text("::"), None);
        assert_eq!(text("1:abc"), None);
        assert_eq!(text("x:12.3"), None);
    }

    #[test]
    fn minute_colon_seconds_never_misreads_as_decimal() {
        // The classic corruption: "01:12.3" parsed as the number 1.123.
        let parsed = to_seconds(&RawTimeValue::Text("01:12.3".to_string())).unwrap();
        assert!((parsed - 72.3).abs() < 1e-12);
    }
}
