//! Cleaning directives and the per-concern report they produce.

use crate::error::{Result, SiftError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What to do with missing values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingValueStrategy {
    /// Leave missing values alone.
    #[default]
    None,
    /// Drop every row with a missing value in a targeted column.
    Drop,
    /// Fill numeric columns with their mean.
    FillMean,
    /// Fill numeric columns with their median.
    FillMedian,
    /// Fill any column with its most frequent value.
    FillMode,
}

impl MissingValueStrategy {
    pub const ALL: [MissingValueStrategy; 5] = [
        Self::None,
        Self::Drop,
        Self::FillMean,
        Self::FillMedian,
        Self::FillMode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Drop => "drop",
            Self::FillMean => "fill-mean",
            Self::FillMedian => "fill-median",
            Self::FillMode => "fill-mode",
        }
    }

    /// Whether the strategy only applies to numeric columns.
    pub fn requires_numeric(&self) -> bool {
        matches!(self, Self::FillMean | Self::FillMedian)
    }
}

impl fmt::Display for MissingValueStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MissingValueStrategy {
    type Err = SiftError;

    /// Accepts the canonical names and the short forms `mean`, `median` and
    /// `mode`.
    fn from_str(s: &str) -> Result<Self> {
        let tag = s.trim().to_ascii_lowercase().replace('_', "-");
        let tag = match tag.as_str() {
            "mean" | "median" | "mode" => format!("fill-{}", tag),
            _ => tag,
        };
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == tag)
            .ok_or_else(|| {
                SiftError::InvalidConfig(format!(
                    "unknown missing-value strategy '{}' \
                     (expected none, drop, fill-mean, fill-median or fill-mode)",
                    s
                ))
            })
    }
}

/// User-selected cleaning operations.
///
/// Concerns are applied in a fixed order: numeric coercion, missing values,
/// constant columns, duplicate rows.
///
/// # Example
///
/// ```rust
/// use tabsift::cleaner::{CleaningDirective, MissingValueStrategy};
///
/// let directive: CleaningDirective = serde_json::from_str(
///     r#"{"missing": "fill-median", "remove_duplicates": true}"#,
/// )
/// .unwrap();
/// assert_eq!(directive.missing, MissingValueStrategy::FillMedian);
/// assert!(directive.coerce_numeric.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningDirective {
    pub missing: MissingValueStrategy,
    /// Restrict the missing-value strategy to these columns.
    pub missing_columns: Option<Vec<String>>,
    pub remove_duplicates: bool,
    pub remove_constant_columns: bool,
    /// Columns to parse as numbers. Repeated names are applied once.
    pub coerce_numeric: Vec<String>,
}

impl CleaningDirective {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn missing(mut self, strategy: MissingValueStrategy) -> Self {
        self.missing = strategy;
        self
    }

    pub fn missing_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.missing_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn remove_duplicates(mut self, remove: bool) -> Self {
        self.remove_duplicates = remove;
        self
    }

    pub fn remove_constant_columns(mut self, remove: bool) -> Self {
        self.remove_constant_columns = remove;
        self
    }

    pub fn coerce_numeric<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.coerce_numeric.extend(columns.into_iter().map(Into::into));
        self
    }

    /// True when the directive requests nothing.
    pub fn is_noop(&self) -> bool {
        self.missing == MissingValueStrategy::None
            && !self.remove_duplicates
            && !self.remove_constant_columns
            && self.coerce_numeric.is_empty()
    }
}

// =============================================================================
// Report
// =============================================================================

/// A cleaning concern of a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Concern {
    CoerceNumeric,
    MissingValues,
    ConstantColumns,
    DuplicateRows,
}

impl fmt::Display for Concern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::CoerceNumeric => "coerce-numeric",
            Self::MissingValues => "missing-values",
            Self::ConstantColumns => "constant-columns",
            Self::DuplicateRows => "duplicate-rows",
        };
        f.write_str(label)
    }
}

/// What an applied concern changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CleaningAction {
    /// Cells parsed as numbers; unparseable ones became missing.
    Coerced { converted: usize, unparseable: usize },
    /// Missing cells replaced by one value.
    Filled {
        strategy: MissingValueStrategy,
        value: String,
        cells: usize,
    },
    DroppedRows { rows: usize },
    DroppedColumns { columns: Vec<String> },
}

impl fmt::Display for CleaningAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coerced {
                converted,
                unparseable,
            } => write!(
                f,
                "converted {} values, {} unparseable set to missing",
                converted, unparseable
            ),
            Self::Filled {
                strategy,
                value,
                cells,
            } => write!(f, "filled {} cells with '{}' ({})", cells, value, strategy),
            Self::DroppedRows { rows } => write!(f, "dropped {} rows", rows),
            Self::DroppedColumns { columns } => {
                write!(f, "dropped columns: {}", columns.join(", "))
            }
        }
    }
}

/// Outcome of one concern, or of one column within a concern.
#[derive(Debug, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ConcernStatus {
    Applied(CleaningAction),
    /// Requested, but nothing needed changing.
    Unchanged,
    /// Left as-is with an informational note.
    Skipped(SiftError),
    Failed(SiftError),
}

impl ConcernStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for ConcernStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Applied(action) => write!(f, "applied: {}", action),
            Self::Unchanged => f.write_str("unchanged"),
            Self::Skipped(note) => write!(f, "skipped: {}", note),
            Self::Failed(error) => write!(f, "failed: {}", error),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConcernReport {
    pub concern: Concern,
    /// `None` when the entry covers the whole table.
    pub column: Option<String>,
    pub status: ConcernStatus,
}

/// Per-concern results of one cleaning call.
#[derive(Debug, Default, Serialize)]
pub struct CleaningReport {
    pub rows_before: usize,
    pub rows_after: usize,
    pub columns_before: usize,
    pub columns_after: usize,
    pub entries: Vec<ConcernReport>,
}

impl CleaningReport {
    pub(crate) fn record(
        &mut self,
        concern: Concern,
        column: Option<&str>,
        status: ConcernStatus,
    ) {
        self.entries.push(ConcernReport {
            concern,
            column: column.map(str::to_string),
            status,
        });
    }

    pub fn entries_for(&self, concern: Concern) -> impl Iterator<Item = &ConcernReport> {
        self.entries.iter().filter(move |e| e.concern == concern)
    }

    /// Errors recorded by failed concerns.
    pub fn failures(&self) -> impl Iterator<Item = &SiftError> {
        self.entries.iter().filter_map(|e| match &e.status {
            ConcernStatus::Failed(error) => Some(error),
            _ => None,
        })
    }

    pub fn has_failures(&self) -> bool {
        self.entries.iter().any(|e| e.status.is_failure())
    }

    /// True when no concern changed the table.
    pub fn is_noop(&self) -> bool {
        !self
            .entries
            .iter()
            .any(|e| matches!(e.status, ConcernStatus::Applied(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_from_str() {
        assert_eq!(
            "fill-mean".parse::<MissingValueStrategy>().unwrap(),
            MissingValueStrategy::FillMean
        );
        assert_eq!(
            "median".parse::<MissingValueStrategy>().unwrap(),
            MissingValueStrategy::FillMedian
        );
        assert_eq!(
            "FILL_MODE".parse::<MissingValueStrategy>().unwrap(),
            MissingValueStrategy::FillMode
        );
        let err = "interpolate".parse::<MissingValueStrategy>().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_strategy_serde_uses_kebab_case() {
        let json = serde_json::to_string(&MissingValueStrategy::FillMedian).unwrap();
        assert_eq!(json, r#""fill-median""#);
    }

    #[test]
    fn test_directive_defaults_are_noop() {
        let directive: CleaningDirective = serde_json::from_str("{}").unwrap();
        assert!(directive.is_noop());
        assert_eq!(directive, CleaningDirective::new());
    }

    #[test]
    fn test_directive_builder() {
        let directive = CleaningDirective::new()
            .missing(MissingValueStrategy::Drop)
            .missing_columns(["a"])
            .coerce_numeric(["b", "c"])
            .remove_duplicates(true);
        assert_eq!(directive.missing_columns, Some(vec!["a".to_string()]));
        assert_eq!(directive.coerce_numeric.len(), 2);
        assert!(!directive.remove_constant_columns);
        assert!(!directive.is_noop());
    }

    #[test]
    fn test_report_serialization() {
        let mut report = CleaningReport::default();
        report.record(
            Concern::DuplicateRows,
            None,
            ConcernStatus::Applied(CleaningAction::DroppedRows { rows: 2 }),
        );
        report.record(
            Concern::MissingValues,
            Some("city"),
            ConcernStatus::Failed(SiftError::InvalidFillStrategy {
                column: "city".to_string(),
                strategy: MissingValueStrategy::FillMean,
            }),
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["entries"][0]["status"]["status"], "applied");
        assert_eq!(json["entries"][0]["status"]["detail"]["action"], "dropped_rows");
        assert_eq!(
            json["entries"][1]["status"]["detail"]["code"],
            "INVALID_FILL_STRATEGY"
        );
        assert!(report.has_failures());
        assert_eq!(report.failures().count(), 1);
    }

    #[test]
    fn test_action_display() {
        let action = CleaningAction::Coerced {
            converted: 2,
            unparseable: 1,
        };
        assert_eq!(
            action.to_string(),
            "converted 2 values, 1 unparseable set to missing"
        );
    }
}
