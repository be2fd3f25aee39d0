//! Error types for ingesting, cleaning and exporting tables.
//!
//! Every failure mode of the pipeline is a variant of [`SiftError`]. Ingest and
//! export errors are returned to the caller as-is; cleaning errors are recorded
//! per concern inside a [`CleaningReport`](crate::cleaner::CleaningReport) so
//! that one failing column never aborts the rest of a directive.
//!
//! Errors serialize as `{code, message}` so a presentation layer can show them
//! without matching on the Rust type.

use crate::cleaner::MissingValueStrategy;
use crate::format::InputFormat;
use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the tabsift pipeline.
#[derive(Error, Debug)]
pub enum SiftError {
    /// The declared input format is not one of csv / xlsx / xls / json.
    #[error("Unsupported input format '{0}' (expected csv, xlsx, xls or json)")]
    UnsupportedFormat(String),

    /// The bytes could not be decoded under the declared format.
    #[error("Failed to parse {format} input: {reason}")]
    ParseError { format: InputFormat, reason: String },

    /// A fill strategy was requested on a column it cannot apply to.
    #[error("Cannot apply {strategy} to non-numeric column '{column}'")]
    InvalidFillStrategy {
        column: String,
        strategy: MissingValueStrategy,
    },

    /// The requested export format is not one of csv / xlsx / json.
    #[error("Unsupported export format '{0}' (expected csv, xlsx or json)")]
    UnsupportedExportFormat(String),

    /// Informational: coercion found no parseable cell and left the column as-is.
    #[error("Coercion of column '{column}' skipped: none of {attempted} values parse as numbers")]
    CoercionSkipped { column: String, attempted: usize },

    /// Column was not found in the table.
    #[error("Column '{0}' not found in table")]
    ColumnNotFound(String),

    /// No non-missing values available to compute a fill value.
    #[error("No valid values found in column '{0}'")]
    NoValidValues(String),

    /// A user-supplied header list does not match the column count.
    #[error("Expected {expected} column names, got {found}")]
    HeaderCountMismatch { expected: usize, found: usize },

    /// The explicit header row lies beyond the data.
    #[error("Header row {row} is out of range (input has {available} rows)")]
    HeaderRowOutOfRange { row: usize, available: usize },

    /// Columns of unequal length or with clashing names.
    #[error("Invalid table: {0}")]
    InvalidTable(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The table could not be written in the requested format.
    #[error("Failed to export {format}: {reason}")]
    ExportFailed { format: String, reason: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<SiftError>,
    },
}

impl SiftError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        SiftError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Shorthand for a [`SiftError::ParseError`].
    pub fn parse(format: InputFormat, reason: impl ToString) -> Self {
        SiftError::ParseError {
            format,
            reason: reason.to_string(),
        }
    }

    /// Stable machine-readable code for presentation layers.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            Self::ParseError { .. } => "PARSE_ERROR",
            Self::InvalidFillStrategy { .. } => "INVALID_FILL_STRATEGY",
            Self::UnsupportedExportFormat(_) => "UNSUPPORTED_EXPORT_FORMAT",
            Self::CoercionSkipped { .. } => "COERCION_SKIPPED",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::NoValidValues(_) => "NO_VALID_VALUES",
            Self::HeaderCountMismatch { .. } => "HEADER_COUNT_MISMATCH",
            Self::HeaderRowOutOfRange { .. } => "HEADER_ROW_OUT_OF_RANGE",
            Self::InvalidTable(_) => "INVALID_TABLE",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::ExportFailed { .. } => "EXPORT_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether this value is a note rather than a failure.
    pub fn is_informational(&self) -> bool {
        match self {
            Self::CoercionSkipped { .. } => true,
            Self::WithContext { source, .. } => source.is_informational(),
            _ => false,
        }
    }
}

/// Errors are serialized as `{code, message}`.
impl Serialize for SiftError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("SiftError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for tabsift operations.
pub type Result<T> = std::result::Result<T, SiftError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| SiftError::Polars(e).with_context(context))
    }
}
