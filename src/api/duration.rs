//! ISO 8601 duration decoding for `contentDetails.duration`.
//!
//! Only the time designator (hours, minutes, seconds) is interpreted. Date
//! units (`Y`, `M`, `W`, `D`) are accepted by the grammar but contribute
//! nothing, so `P1DT1H` decodes to one hour.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::warn;

const SECONDS_PER_HOUR: u64 = 3600;
const SECONDS_PER_MINUTE: u64 = 60;

static DURATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^P(?:\d+[YMWD])*(?:T(?:(?P<h>\d+)H)?(?:(?P<m>\d+)M)?(?:(?P<s>\d+)S)?)?$")
        .expect("duration pattern is valid")
});

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    #[error("duration does not start with 'P': {0:?}")]
    MissingMarker(String),

    #[error("malformed duration: {0:?}")]
    Malformed(String),

    #[error("duration component out of range: {0:?}")]
    OutOfRange(String),
}

/// Decode a duration such as `PT1H2M10S` into whole seconds.
pub fn decode_duration(duration: &str) -> Result<u64, DurationError> {
    if !duration.starts_with('P') {
        return Err(DurationError::MissingMarker(duration.to_string()));
    }

    let captures = DURATION_PATTERN
        .captures(duration)
        .ok_or_else(|| DurationError::Malformed(duration.to_string()))?;

    let component = |name: &str| -> Result<u64, DurationError> {
        captures.name(name).map_or(Ok(0), |m| {
            m.as_str()
                .parse::<u64>()
                .map_err(|_| DurationError::OutOfRange(duration.to_string()))
        })
    };

    let hours = component("h")?;
    let minutes = component("m")?;
    let seconds = component("s")?;

    hours
        .checked_mul(SECONDS_PER_HOUR)
        .and_then(|h| minutes.checked_mul(SECONDS_PER_MINUTE).map(|m| (h, m)))
        .and_then(|(h, m)| h.checked_add(m))
        .and_then(|hm| hm.checked_add(seconds))
        .ok_or_else(|| DurationError::OutOfRange(duration.to_string()))
}

/// Lenient form of [`decode_duration`]: anything undecodable counts as zero.
pub fn parse_duration_secs(duration: &str) -> u64 {
    decode_duration(duration).unwrap_or_else(|e| {
        warn!(duration = %duration, error = %e, "Invalid duration format");
        0
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hours_minutes_seconds() {
        assert_eq!(parse_duration_secs("PT1H2M10S"), 3730);
    }

    #[test]
    fn test_seconds_only() {
        assert_eq!(parse_duration_secs("PT45S"), 45);
    }

    #[test]
    fn test_minutes_only() {
        assert_eq!(parse_duration_secs("PT30M"), 1800);
    }

    #[test]
    fn test_hours_and_seconds_without_minutes() {
        assert_eq!(parse_duration_secs("PT2H5S"), 7205);
    }

    #[test]
    fn test_day_units_ignored() {
        assert_eq!(parse_duration_secs("P1D"), 0);
        assert_eq!(parse_duration_secs("P1DT1H"), 3600);
        assert_eq!(parse_duration_secs("P1Y2M3W4DT5M"), 300);
    }

    #[test]
    fn test_bare_marker_is_zero() {
        assert_eq!(decode_duration("P"), Ok(0));
        assert_eq!(decode_duration("PT"), Ok(0));
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(
            decode_duration(""),
            Err(DurationError::MissingMarker(String::new()))
        );
        assert_eq!(parse_duration_secs(""), 0);
    }

    #[test]
    fn test_missing_marker() {
        assert!(matches!(
            decode_duration("1H2M"),
            Err(DurationError::MissingMarker(_))
        ));
        assert_eq!(parse_duration_secs("T1H"), 0);
    }

    #[test]
    fn test_out_of_grammar_durations_count_as_zero() {
        // fractional or out-of-order components are rejected outright
        // instead of being summed piecewise
        assert!(matches!(
            decode_duration("PT1.5S"),
            Err(DurationError::Malformed(_))
        ));
        assert!(matches!(
            decode_duration("PT10S5M"),
            Err(DurationError::Malformed(_))
        ));
        assert_eq!(parse_duration_secs("PT1.5S"), 0);
        assert_eq!(parse_duration_secs("PT10S5M"), 0);
    }

    #[test]
    fn test_malformed_time_designator() {
        assert!(matches!(
            decode_duration("PTXS"),
            Err(DurationError::Malformed(_))
        ));
        assert_eq!(parse_duration_secs("PTXS"), 0);
    }

    #[test]
    fn test_out_of_range_component() {
        let huge = format!("PT{}H", u64::MAX);
        assert!(matches!(
            decode_duration(&huge),
            Err(DurationError::OutOfRange(_))
        ));
        assert_eq!(parse_duration_secs("PT99999999999999999999999S"), 0);
    }

    #[test]
    fn test_error_display() {
        let error = DurationError::MissingMarker("abc".to_string());
        assert_eq!(format!("{}", error), "duration does not start with 'P': \"abc\"");
    }
}
