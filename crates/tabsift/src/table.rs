//! In-memory table model.
//!
//! A [`Table`] is an ordered set of uniquely named, equal-length [`Column`]s of
//! [`Cell`]s. Tables expose no mutating operations: every pipeline stage builds
//! a new table, so a profile or quality report computed from one snapshot can
//! never observe another stage's changes.

use crate::error::{Result, SiftError};
use crate::utils::{format_number, parse_number};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

// =============================================================================
// Cells
// =============================================================================

/// A single table value.
///
/// Serializes untagged: numbers as JSON numbers, text as strings and
/// missing values as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    Missing,
}

/// Primitive type of a non-missing cell after inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellType {
    Numeric,
    Text,
}

/// Hashable identity of a cell, used for row signatures and distinct counts.
///
/// Blank text collapses to `Missing` and `-0.0` to `0.0` so that values which
/// read the same compare the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKey<'a> {
    Missing,
    Number(u64),
    Text(&'a str),
}

impl Cell {
    /// Build a text cell, mapping blank strings to `Missing`.
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            Cell::Missing
        } else {
            Cell::Text(value)
        }
    }

    /// Build a number cell, mapping non-finite values to `Missing`.
    pub fn number(value: f64) -> Self {
        if value.is_finite() {
            Cell::Number(value)
        } else {
            Cell::Missing
        }
    }

    /// True for `Missing` and for blank text.
    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Missing => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// The stored number, without parsing text.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// The stored text, if this is a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The numeric reading of this cell: stored numbers as-is, text parsed.
    pub fn parse_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            Cell::Text(s) => parse_number(s),
            Cell::Missing => None,
        }
    }

    /// Infer the primitive type of this cell on its own.
    ///
    /// Numbers and text that parses as a number are numeric, other text is
    /// text, missing cells have no type.
    pub fn infer_type(&self) -> Option<CellType> {
        if self.is_missing() {
            return None;
        }
        match self.parse_number() {
            Some(_) => Some(CellType::Numeric),
            None => Some(CellType::Text),
        }
    }

    pub fn key(&self) -> CellKey<'_> {
        match self {
            _ if self.is_missing() => CellKey::Missing,
            Cell::Number(v) => {
                let normalized = if *v == 0.0 { 0.0f64 } else { *v };
                CellKey::Number(normalized.to_bits())
            }
            Cell::Text(s) => CellKey::Text(s),
            Cell::Missing => CellKey::Missing,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(v) => f.write_str(&format_number(*v)),
            Cell::Text(s) => f.write_str(s),
            Cell::Missing => Ok(()),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::text(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Cell::Missing, Into::into)
    }
}

// =============================================================================
// Columns
// =============================================================================

/// Storage-level classification of a column's non-missing cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Every non-missing cell is a number.
    Numeric,
    /// Every non-missing cell is text.
    Text,
    /// Both numbers and text are stored.
    Mixed,
    /// No non-missing cells.
    Empty,
}

impl ColumnKind {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric)
    }
}

/// A named sequence of cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// Build a column from anything convertible to cells.
    ///
    /// ```rust
    /// use tabsift::table::{Cell, Column};
    ///
    /// let column = Column::from_values("A", [Some(1.0), None]);
    /// assert_eq!(column.cells(), &[Cell::Number(1.0), Cell::Missing]);
    /// ```
    pub fn from_values<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Cell>,
    {
        Self::new(name, values.into_iter().map(Into::into).collect())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<&Cell> {
        self.cells.get(row)
    }

    /// Iterate over the non-missing cells.
    pub fn present(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|cell| !cell.is_missing())
    }

    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_missing()).count()
    }

    /// Number of distinct non-missing values.
    pub fn distinct_count(&self) -> usize {
        self.present().map(Cell::key).collect::<HashSet<_>>().len()
    }

    /// Storage-level kind of this column.
    pub fn kind(&self) -> ColumnKind {
        let mut has_number = false;
        let mut has_text = false;
        for cell in self.present() {
            match cell {
                Cell::Number(_) => has_number = true,
                Cell::Text(_) => has_text = true,
                Cell::Missing => {}
            }
        }
        match (has_number, has_text) {
            (true, true) => ColumnKind::Mixed,
            (true, false) => ColumnKind::Numeric,
            (false, true) => ColumnKind::Text,
            (false, false) => ColumnKind::Empty,
        }
    }

    /// Stored numbers in row order, skipping everything else.
    pub fn numbers(&self) -> Vec<f64> {
        self.cells.iter().filter_map(Cell::as_number).collect()
    }

    /// Promote a text column to numeric when every non-missing cell parses.
    ///
    /// Used for formats without type tags, where every field arrives as text.
    pub fn infer_numeric(self) -> Self {
        if self.kind() != ColumnKind::Text || !self.present().all(|c| c.parse_number().is_some())
        {
            return self;
        }
        let cells = self
            .cells
            .into_iter()
            .map(|cell| match cell.parse_number() {
                Some(v) => Cell::Number(v),
                None => Cell::Missing,
            })
            .collect();
        Self {
            name: self.name,
            cells,
        }
    }

    /// Copy of this column under another name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self::new(name, self.cells.clone())
    }

    fn take_rows(&self, keep: &[bool]) -> Self {
        let cells = self
            .cells
            .iter()
            .zip(keep)
            .filter(|(_, keep)| **keep)
            .map(|(cell, _)| cell.clone())
            .collect();
        Self::new(self.name.clone(), cells)
    }
}

// =============================================================================
// Tables
// =============================================================================

/// An immutable table of named, equal-length columns.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
    /// Column names were generated rather than read from the input.
    headers_synthesized: bool,
}

static_assertions::assert_impl_all!(Table: Send, Sync);

impl Table {
    /// Build a table, checking that columns have equal length and unique names.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let row_count = columns.first().map_or(0, Column::len);
        if let Some(ragged) = columns.iter().find(|c| c.len() != row_count) {
            return Err(SiftError::InvalidTable(format!(
                "column '{}' has {} rows, expected {}",
                ragged.name(),
                ragged.len(),
                row_count
            )));
        }

        let mut seen = HashSet::new();
        if let Some(clash) = columns.iter().find(|c| !seen.insert(c.name())) {
            return Err(SiftError::InvalidTable(format!(
                "duplicate column name '{}'",
                clash.name()
            )));
        }

        Ok(Self {
            columns,
            row_count,
            headers_synthesized: false,
        })
    }

    /// A table with no rows and no columns.
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn with_synthesized_headers(mut self, synthesized: bool) -> Self {
        self.headers_synthesized = synthesized;
        self
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count, self.columns.len())
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0 || self.columns.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Look up a column, failing with `ColumnNotFound`.
    pub fn require_column(&self, name: &str) -> Result<&Column> {
        self.column(name)
            .ok_or_else(|| SiftError::ColumnNotFound(name.to_string()))
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Whether the column names are generated placeholders.
    pub fn headers_synthesized(&self) -> bool {
        self.headers_synthesized
    }

    /// Total number of missing cells.
    pub fn missing_cells(&self) -> usize {
        self.columns.iter().map(Column::missing_count).sum()
    }

    /// Cells of one row, left to right.
    pub fn row(&self, index: usize) -> Option<Vec<&Cell>> {
        if index >= self.row_count {
            return None;
        }
        self.columns.iter().map(|c| c.get(index)).collect()
    }

    /// Value-wise identity of a row.
    pub fn row_signature(&self, index: usize) -> Vec<CellKey<'_>> {
        self.columns
            .iter()
            .map(|c| c.get(index).map_or(CellKey::Missing, Cell::key))
            .collect()
    }

    /// For each row, whether it repeats an earlier row value-for-value.
    pub fn duplicate_mask(&self) -> Vec<bool> {
        let mut seen = HashSet::with_capacity(self.row_count);
        (0..self.row_count)
            .map(|i| !seen.insert(self.row_signature(i)))
            .collect()
    }

    /// New table keeping only rows whose mask entry is `true`.
    pub fn filter_rows(&self, keep: &[bool]) -> Self {
        let columns: Vec<Column> = self.columns.iter().map(|c| c.take_rows(keep)).collect();
        let row_count = keep.iter().take(self.row_count).filter(|k| **k).count();
        Self {
            columns,
            row_count,
            headers_synthesized: self.headers_synthesized,
        }
    }

    /// New table without the named columns. Unknown names are ignored.
    pub fn without_columns(&self, names: &[String]) -> Self {
        let drop: HashSet<&str> = names.iter().map(String::as_str).collect();
        let columns: Vec<Column> = self
            .columns
            .iter()
            .filter(|c| !drop.contains(c.name()))
            .cloned()
            .collect();
        let row_count = if columns.is_empty() { 0 } else { self.row_count };
        Self {
            columns,
            row_count,
            headers_synthesized: self.headers_synthesized,
        }
    }

    /// New table with the same-named column replaced.
    pub fn with_column(&self, column: Column) -> Result<Self> {
        let position = self
            .columns
            .iter()
            .position(|c| c.name() == column.name())
            .ok_or_else(|| SiftError::ColumnNotFound(column.name().to_string()))?;
        if column.len() != self.row_count {
            return Err(SiftError::InvalidTable(format!(
                "replacement column '{}' has {} rows, expected {}",
                column.name(),
                column.len(),
                self.row_count
            )));
        }
        let mut columns = self.columns.clone();
        columns[position] = column;
        Ok(Self {
            columns,
            row_count: self.row_count,
            headers_synthesized: self.headers_synthesized,
        })
    }

    /// New table with every column renamed, in order.
    ///
    /// Repeated names are disambiguated the same way ingestion does it.
    pub fn with_column_names<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        if names.len() != self.columns.len() {
            return Err(SiftError::HeaderCountMismatch {
                expected: self.columns.len(),
                found: names.len(),
            });
        }
        let names = unique_names(names.iter().map(|n| n.as_ref().trim().to_string()));
        let columns = self
            .columns
            .iter()
            .zip(names)
            .map(|(column, name)| column.renamed(name))
            .collect();
        Ok(Self {
            columns,
            row_count: self.row_count,
            headers_synthesized: false,
        })
    }
}

/// Make names unique by suffixing repeats with `_1`, `_2`, ...
pub(crate) fn unique_names(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let names: Vec<String> = names.into_iter().collect();
    let mut taken: HashSet<String> = HashSet::with_capacity(names.len());
    let mut counters: HashMap<String, usize> = HashMap::new();
    let mut result = Vec::with_capacity(names.len());

    for name in names {
        let mut candidate = name.clone();
        while taken.contains(&candidate) {
            let counter = counters.entry(name.clone()).or_insert(0);
            *counter += 1;
            candidate = format!("{}_{}", name, counter);
        }
        taken.insert(candidate.clone());
        result.push(candidate);
    }

    result
}
