//! Report types shared by the profiler, the quality reporter and the CLI.
//!
//! Everything here is plain data with serde derives so a presentation layer
//! can ship it as JSON.

use crate::table::ColumnKind;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Profiles
// =============================================================================

/// How a column's values should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    /// Every present value is a stored number.
    Numeric,
    /// Text without a dominant number or date reading.
    Categorical,
    /// Values infer to more than one primitive type.
    Mixed,
    /// Text where most values look like dates or timestamps.
    DatetimeCandidate,
    /// No present values.
    Empty,
}

impl SemanticType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Categorical => "categorical",
            Self::Mixed => "mixed",
            Self::DatetimeCandidate => "datetime_candidate",
            Self::Empty => "empty",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of a numeric column.
///
/// Every statistic is `None` when the column has no values; `std` is also
/// `None` for a single value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1 denominator).
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
    pub mode: Option<f64>,
}

/// A value and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Summary of a categorical, mixed or date-like column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalSummary {
    pub count: usize,
    pub mode: Option<String>,
    pub mode_frequency: usize,
    /// Most frequent values, most common first.
    pub top_values: Vec<ValueCount>,
}

/// Statistics of one column, chosen by its semantic type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnStatistics {
    Numeric(NumericSummary),
    Categorical(CategoricalSummary),
    /// All-missing columns have nothing to summarize.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub semantic_type: SemanticType,
    /// Storage-level kind, independent of the semantic reading.
    pub kind: ColumnKind,
    pub missing_count: usize,
    pub missing_percentage: f64,
    /// Distinct non-missing values.
    pub unique_count: usize,
    pub statistics: ColumnStatistics,
}

/// Pairwise Pearson correlations between numeric columns.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// `values[i][j]` correlates `columns[i]` with `columns[j]`; `None` when
    /// undefined.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values.get(i)?.get(j).copied().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Profile of a whole table snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableProfile {
    pub row_count: usize,
    pub column_count: usize,
    /// Column names were generated rather than read from the input.
    pub headers_synthesized: bool,
    pub columns: Vec<ColumnProfile>,
    pub correlations: CorrelationMatrix,
}

impl TableProfile {
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name == name)
    }
}

// =============================================================================
// Quality Report
// =============================================================================

/// Missing-value count of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingCount {
    pub column: String,
    pub count: usize,
    pub percentage: f64,
}

/// Type a text column most likely holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuspectedType {
    Numeric,
    Datetime,
}

impl fmt::Display for SuspectedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric => f.write_str("numeric"),
            Self::Datetime => f.write_str("datetime"),
        }
    }
}

/// A column whose values mostly read as another type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeMismatch {
    pub column: String,
    pub suspected_type: SuspectedType,
    /// Fraction of present values that parse as the suspected type.
    pub fraction: f64,
}

/// Category of a flattened quality issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MissingValues,
    DuplicateRows,
    ConstantColumn,
    MixedTypes,
    TypeMismatch,
    UnnamedColumn,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::MissingValues => "Missing values",
            Self::DuplicateRows => "Duplicate rows",
            Self::ConstantColumn => "Constant column",
            Self::MixedTypes => "Mixed data types",
            Self::TypeMismatch => "Potential type mismatch",
            Self::UnnamedColumn => "Unnamed column",
        };
        f.write_str(label)
    }
}

/// One row of the issue table shown to users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityIssue {
    pub issue: IssueKind,
    /// `None` for table-wide issues.
    pub column: Option<String>,
    pub details: String,
}

/// Data-quality findings for one table snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub row_count: usize,
    pub column_count: usize,
    /// One entry per column, in column order.
    pub missing_values: Vec<MissingCount>,
    /// Rows identical to an earlier row; first occurrences are not counted.
    pub duplicate_rows: usize,
    pub constant_columns: Vec<String>,
    pub mixed_type_columns: Vec<String>,
    pub type_mismatches: Vec<TypeMismatch>,
    pub unnamed_columns: Vec<String>,
    pub issues: Vec<QualityIssue>,
}

impl QualityReport {
    /// Missing count of one column; zero for unknown names.
    pub fn missing_count(&self, column: &str) -> usize {
        self.missing_values
            .iter()
            .find(|m| m.column == column)
            .map_or(0, |m| m.count)
    }

    pub fn total_missing(&self) -> usize {
        self.missing_values.iter().map(|m| m.count).sum()
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}
