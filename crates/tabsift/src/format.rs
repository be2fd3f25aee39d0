//! Format tags accepted at the ingest and export boundaries.

use crate::error::{Result, SiftError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Formats the ingestor can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    Csv,
    Xlsx,
    Xls,
    Json,
}

impl InputFormat {
    /// All supported input formats.
    pub const ALL: [InputFormat; 4] = [Self::Csv, Self::Xlsx, Self::Xls, Self::Json];

    /// The lowercase tag, also used as the file extension.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
            Self::Xls => "xls",
            Self::Json => "json",
        }
    }

    /// Whether the format carries an explicit header of its own.
    ///
    /// JSON objects always name their fields, so header detection and the
    /// header row option do not apply.
    pub fn has_intrinsic_header(&self) -> bool {
        matches!(self, Self::Json)
    }

    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        ext.parse()
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputFormat {
    type Err = SiftError;

    fn from_str(s: &str) -> Result<Self> {
        let tag = s.trim().trim_start_matches('.').to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == tag)
            .ok_or_else(|| SiftError::UnsupportedFormat(s.to_string()))
    }
}

/// Formats the exporter can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Json,
}

impl ExportFormat {
    /// All supported export formats.
    pub const ALL: [ExportFormat; 3] = [Self::Csv, Self::Xlsx, Self::Json];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
            Self::Json => "json",
        }
    }

    /// The matching ingest format, used for round trips.
    pub fn input_format(&self) -> InputFormat {
        match self {
            Self::Csv => InputFormat::Csv,
            Self::Xlsx => InputFormat::Xlsx,
            Self::Json => InputFormat::Json,
        }
    }

    /// Guess the export format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        ext.parse()
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = SiftError;

    fn from_str(s: &str) -> Result<Self> {
        let tag = s.trim().trim_start_matches('.').to_ascii_lowercase();
        if tag == "excel" {
            return Ok(Self::Xlsx);
        }
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == tag)
            .ok_or_else(|| SiftError::UnsupportedExportFormat(s.to_string()))
    }
}

/// Where the header row of a csv / spreadsheet input lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderRow {
    /// Detect: the first row is a header when its values are all distinct,
    /// non-missing and non-numeric.
    #[default]
    Auto,
    /// Rows before the index are skipped, the indexed row names the columns.
    Row(usize),
}

impl fmt::Display for HeaderRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Row(row) => write!(f, "{row}"),
        }
    }
}

impl FromStr for HeaderRow {
    type Err = SiftError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        trimmed.parse::<usize>().map(Self::Row).map_err(|_| {
            SiftError::InvalidConfig(format!(
                "header row must be 'auto' or a non-negative integer, got '{s}'"
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_format_from_str() {
        assert_eq!("csv".parse::<InputFormat>().unwrap(), InputFormat::Csv);
        assert_eq!("XLSX".parse::<InputFormat>().unwrap(), InputFormat::Xlsx);
        assert_eq!(".xls".parse::<InputFormat>().unwrap(), InputFormat::Xls);
        assert_eq!(" json ".parse::<InputFormat>().unwrap(), InputFormat::Json);
    }

    #[test]
    fn test_input_format_rejects_unknown() {
        let err = "parquet".parse::<InputFormat>().unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
        assert!(err.to_string().contains("parquet"));
    }

    #[test]
    fn test_input_format_from_path() {
        let format = InputFormat::from_path(Path::new("data/sales.CSV")).unwrap();
        assert_eq!(format, InputFormat::Csv);
        assert!(InputFormat::from_path(Path::new("README")).is_err());
    }

    #[test]
    fn test_only_json_has_intrinsic_header() {
        let intrinsic: Vec<_> = InputFormat::ALL
            .into_iter()
            .filter(InputFormat::has_intrinsic_header)
            .collect();
        assert_eq!(intrinsic, vec![InputFormat::Json]);
    }

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("Excel".parse::<ExportFormat>().unwrap(), ExportFormat::Xlsx);
        let err = "xls".parse::<ExportFormat>().unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_EXPORT_FORMAT");
    }

    #[test]
    fn test_export_format_maps_to_input_format() {
        for format in ExportFormat::ALL {
            assert_eq!(format.input_format().as_str(), format.as_str());
        }
    }

    #[test]
    fn test_header_row_from_str() {
        assert_eq!("auto".parse::<HeaderRow>().unwrap(), HeaderRow::Auto);
        assert_eq!("AUTO".parse::<HeaderRow>().unwrap(), HeaderRow::Auto);
        assert_eq!("2".parse::<HeaderRow>().unwrap(), HeaderRow::Row(2));
        assert!("-1".parse::<HeaderRow>().is_err());
        assert!("first".parse::<HeaderRow>().is_err());
    }

    #[test]
    fn test_header_row_serde() {
        let json = serde_json::to_string(&HeaderRow::Row(3)).unwrap();
        assert_eq!(json, r#"{"row":3}"#);
        let parsed: HeaderRow = serde_json::from_str(r#""auto""#).unwrap();
        assert_eq!(parsed, HeaderRow::Auto);
    }
}
