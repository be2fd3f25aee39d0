//! Shared helpers for cell parsing and formatting.
//!
//! Used by ingestion (NA markers, numeric promotion), the quality reporter
//! (per-cell type inference, date detection) and the exporters (number
//! formatting).

use chrono::DateTime;
use once_cell::sync::Lazy;
use regex::Regex;

// =============================================================================
// Missing Value Markers
// =============================================================================

/// Text values read as missing by default, matching common spreadsheet and
/// dataframe conventions. Comparison is exact after trimming.
pub const DEFAULT_NA_VALUES: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Check if a string is one of the given NA markers.
pub fn is_na_marker(s: &str, na_values: &[String]) -> bool {
    let trimmed = s.trim();
    na_values.iter().any(|marker| marker == trimmed)
}

// =============================================================================
// Numeric Parsing
// =============================================================================

/// Try to parse a string as a finite number.
///
/// Surrounding whitespace is ignored. Infinities and NaN spellings are
/// rejected so that a parsed value can always be written back to csv, xlsx
/// and json.
///
/// # Example
///
/// ```rust
/// use tabsift::utils::parse_number;
///
/// assert_eq!(parse_number(" 42 "), Some(42.0));
/// assert_eq!(parse_number("1e3"), Some(1000.0));
/// assert_eq!(parse_number("inf"), None);
/// assert_eq!(parse_number("1,000"), None);
/// ```
pub fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Check if a string can be parsed as a number.
pub fn is_numeric_string(s: &str) -> bool {
    parse_number(s).is_some()
}

/// Format a number the way it should appear in reports and text exports.
///
/// Whole numbers drop the fractional part; everything else uses the shortest
/// representation that parses back to the same value.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

// =============================================================================
// Date Detection
// =============================================================================

// Date pattern regexes - compiled once at startup
static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^\d{4}[-/]\d{1,2}[-/]\d{1,2}$").expect("Invalid regex: YYYY-MM-DD"),
        Regex::new(r"^\d{1,2}[-/]\d{1,2}[-/]\d{4}$").expect("Invalid regex: MM-DD-YYYY"),
        Regex::new(r"^\d{4}-\d{2}-\d{2}\s\d{2}:\d{2}(:\d{2})?").expect("Invalid regex: datetime"),
        Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}").expect("Invalid regex: ISO"),
    ]
});

/// Check if a string looks like a calendar date or timestamp.
///
/// Plain numbers never count, even when they could be epoch timestamps.
pub fn looks_like_datetime(s: &str) -> bool {
    let trimmed = s.trim();
    if trimmed.is_empty() || is_numeric_string(trimmed) {
        return false;
    }
    if DateTime::parse_from_rfc3339(trimmed).is_ok() {
        return true;
    }
    DATE_PATTERNS.iter().any(|pattern| pattern.is_match(trimmed))
}

/// Fraction `part / total`, zero when `total` is zero.
pub fn ratio(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn default_markers() -> Vec<String> {
        DEFAULT_NA_VALUES.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_is_na_marker() {
        let markers = default_markers();
        assert!(is_na_marker("NA", &markers));
        assert!(is_na_marker("  null ", &markers));
        assert!(is_na_marker("#N/A", &markers));
        assert!(!is_na_marker("Nancy", &markers));
        assert!(!is_na_marker("0", &markers));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("42"), Some(42.0));
        assert_eq!(parse_number("-100.5"), Some(-100.5));
        assert_eq!(parse_number("  3.25\t"), Some(3.25));
        assert_eq!(parse_number(".5"), Some(0.5));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("hello"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("-infinity"), None);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(-20.0), "-20");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(5.0 / 3.0), "1.6666666666666667");
    }

    #[test]
    fn test_format_number_round_trips() {
        for value in [0.1, 1.0 / 3.0, 123456.789, -0.000_015] {
            assert_eq!(parse_number(&format_number(value)), Some(value));
        }
    }

    #[test]
    fn test_looks_like_datetime() {
        assert!(looks_like_datetime("2024-01-15"));
        assert!(looks_like_datetime("15/01/2024"));
        assert!(looks_like_datetime("2024-01-15 10:30"));
        assert!(looks_like_datetime("2024-01-15T10:30:00Z"));
        assert!(!looks_like_datetime("20240115"));
        assert!(!looks_like_datetime("hello"));
        assert!(!looks_like_datetime(""));
    }

    #[test]
    fn test_ratio() {
        assert_eq!(ratio(1, 4), 0.25);
        assert_eq!(ratio(3, 0), 0.0);
    }
}
