//! `M:SS` timestamp formatting and parsing.
//!
//! Used by the player overlay, the review list, and the annotation editor.
//! Minutes are not rolled into hours; a two-hour bout formats as `120:00`.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a timestamp string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimecodeError {
    #[error("timestamp '{0}' must be in M:SS format")]
    WrongShape(String),

    #[error("timestamp '{0}' must contain only whole, non-negative numbers")]
    NotNumeric(String),

    #[error("timestamp '{0}' has seconds outside 0-59")]
    SecondsOutOfRange(String),
}

impl From<TimecodeError> for CoreError {
    fn from(err: TimecodeError) -> Self {
        CoreError::Validation(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Format / parse
// ---------------------------------------------------------------------------

/// Format a seconds offset as `M:SS`.
///
/// Fractional seconds are floored. Negative and non-finite inputs format as
/// `0:00`.
pub fn format_timestamp(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// Parse an `M:SS` string into whole seconds.
///
/// Exactly one colon is required. Surrounding whitespace on each part is
/// tolerated; signs, decimals and empty parts are not.
pub fn parse_timestamp(input: &str) -> Result<u32, TimecodeError> {
    let mut parts = input.split(':');
    let (Some(mins), Some(secs), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(TimecodeError::WrongShape(input.to_string()));
    };

    let mins = parse_component(mins).ok_or_else(|| TimecodeError::NotNumeric(input.to_string()))?;
    let secs = parse_component(secs).ok_or_else(|| TimecodeError::NotNumeric(input.to_string()))?;

    if secs >= 60 {
        return Err(TimecodeError::SecondsOutOfRange(input.to_string()));
    }

    mins.checked_mul(60)
        .and_then(|m| m.checked_add(secs))
        .ok_or_else(|| TimecodeError::NotNumeric(input.to_string()))
}

fn parse_component(part: &str) -> Option<u32> {
    let part = part.trim();
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- format_timestamp --------------------------------------------------

    #[test]
    fn format_zero() {
        assert_eq!(format_timestamp(0.0), "0:00");
    }

    #[test]
    fn format_pads_seconds() {
        assert_eq!(format_timestamp(65.0), "1:05");
    }

    #[test]
    fn format_floors_fractional_seconds() {
        assert_eq!(format_timestamp(90.99), "1:30");
    }

    #[test]
    fn format_minutes_grow_past_an_hour() {
        assert_eq!(format_timestamp(3_725.0), "62:05");
    }

    #[test]
    fn format_negative_and_nan_clamp_to_zero() {
        assert_eq!(format_timestamp(-4.0), "0:00");
        assert_eq!(format_timestamp(f64::NAN), "0:00");
        assert_eq!(format_timestamp(f64::INFINITY), "0:00");
    }

    // -- parse_timestamp ---------------------------------------------------

    #[test]
    fn parse_simple() {
        assert_eq!(parse_timestamp("1:30"), Ok(90));
    }

    #[test]
    fn parse_unpadded_seconds() {
        assert_eq!(parse_timestamp("2:5"), Ok(125));
    }

    #[test]
    fn parse_large_minutes() {
        assert_eq!(parse_timestamp("75:00"), Ok(4_500));
    }

    #[test]
    fn parse_tolerates_whitespace_around_parts() {
        assert_eq!(parse_timestamp(" 1 : 30 "), Ok(90));
    }

    #[test]
    fn parse_rejects_missing_colon() {
        assert_eq!(
            parse_timestamp("130"),
            Err(TimecodeError::WrongShape("130".into()))
        );
    }

    #[test]
    fn parse_rejects_extra_colon() {
        assert!(matches!(
            parse_timestamp("1:02:03"),
            Err(TimecodeError::WrongShape(_))
        ));
    }

    #[test]
    fn parse_rejects_non_numeric() {
        assert!(matches!(parse_timestamp("a:30"), Err(TimecodeError::NotNumeric(_))));
        assert!(matches!(parse_timestamp("1:3x"), Err(TimecodeError::NotNumeric(_))));
        assert!(matches!(parse_timestamp(":30"), Err(TimecodeError::NotNumeric(_))));
        assert!(matches!(parse_timestamp("1.5:30"), Err(TimecodeError::NotNumeric(_))));
    }

    #[test]
    fn parse_rejects_negative_parts() {
        assert!(matches!(parse_timestamp("-1:30"), Err(TimecodeError::NotNumeric(_))));
        assert!(matches!(parse_timestamp("1:-5"), Err(TimecodeError::NotNumeric(_))));
    }

    #[test]
    fn parse_rejects_sixty_seconds() {
        assert!(matches!(
            parse_timestamp("1:60"),
            Err(TimecodeError::SecondsOutOfRange(_))
        ));
    }

    #[test]
    fn timecode_error_becomes_validation() {
        let err: CoreError = parse_timestamp("nope").unwrap_err().into();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    // -- round trip --------------------------------------------------------

    #[test]
    fn format_of_parse_normalizes_padding() {
        for (input, normalized) in [
            ("0:00", "0:00"),
            ("1:30", "1:30"),
            ("1:5", "1:05"),
            ("01:05", "1:05"),
            ("10:59", "10:59"),
            ("0:7", "0:07"),
        ] {
            let secs = parse_timestamp(input).unwrap();
            assert_eq!(format_timestamp(f64::from(secs)), normalized, "input {input}");
        }
    }
}
