//! Time utilities for run identifiers and record timestamps.
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use std::fmt::Write as _;

/// Pattern used for generated run identifiers, second resolution.
pub const RUN_ID_FORMAT: &str = "%y%m%d_%H%M%S";

/// Date pattern formatters use when none is configured.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Date pattern forced by the multi-line formatter.
pub const MULTILINE_DATE_FORMAT: &str = "%Y-%m-%d,%H:%M:%S";

/// Render a run identifier such as `261018_093015` for the given instant.
pub fn run_id_at(time: DateTime<Local>) -> String {
    time.format(RUN_ID_FORMAT).to_string()
}

/// Run identifier for the current local time.
pub fn run_id_now() -> String {
    run_id_at(Local::now())
}

/// Whether chrono understands every specifier in `pattern`.
pub fn is_valid_date_format(pattern: &str) -> bool {
    StrftimeItems::new(pattern).all(|item| !matches!(item, Item::Error))
}

/// Render a record timestamp with a strftime-style pattern.
///
/// Patterns chrono cannot render fall back to [`DEFAULT_DATE_FORMAT`].
pub fn format_timestamp(time: &DateTime<Local>, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", time.format(pattern)).is_err() {
        out.clear();
        let _ = write!(out, "{}", time.format(DEFAULT_DATE_FORMAT));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, 18, 9, 30, 15).unwrap()
    }

    #[test]
    fn test_run_id_has_second_resolution() {
        assert_eq!(run_id_at(fixed()), "261018_093015");
    }

    #[test]
    fn test_run_id_now_shape() {
        let id = run_id_now();
        assert_eq!(id.len(), 13);
        assert_eq!(id.as_bytes()[6], b'_');
        assert!(id.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_multiline_date_format() {
        assert_eq!(
            format_timestamp(&fixed(), MULTILINE_DATE_FORMAT),
            "2026-10-18,09:30:15"
        );
        assert_eq!(
            format_timestamp(&fixed(), DEFAULT_DATE_FORMAT),
            "2026-10-18 09:30:15"
        );
    }

    #[test]
    fn test_unknown_specifier_is_invalid() {
        assert!(is_valid_date_format(DEFAULT_DATE_FORMAT));
        assert!(is_valid_date_format("%d/%m/%Y %H:%M"));
        assert!(!is_valid_date_format("%Q"));
    }

    #[test]
    fn test_invalid_pattern_falls_back_to_default() {
        assert_eq!(format_timestamp(&fixed(), "%Q"), "2026-10-18 09:30:15");
    }
}
