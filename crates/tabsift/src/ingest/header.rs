//! Header resolution for formats that store names as an ordinary row.

use crate::config::SiftConfig;
use crate::error::{Result, SiftError};
use crate::format::HeaderRow;
use crate::table::{Cell, CellType, Column, Table, unique_names};
use std::collections::HashSet;
use tracing::debug;

/// Column-major grid of cells as read from csv or a worksheet, before any
/// row has been chosen as the header.
#[derive(Debug, Default)]
pub(crate) struct RawGrid {
    columns: Vec<Vec<Cell>>,
    rows: usize,
}

impl RawGrid {
    /// Build from columns, padding short ones with missing cells.
    pub(crate) fn from_columns(mut columns: Vec<Vec<Cell>>) -> Self {
        let rows = columns.iter().map(Vec::len).max().unwrap_or(0);
        for column in &mut columns {
            column.resize(rows, Cell::Missing);
        }
        Self { columns, rows }
    }

    /// Build from rows, padding short ones with missing cells.
    pub(crate) fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut columns: Vec<Vec<Cell>> = (0..width)
            .map(|_| Vec::with_capacity(rows.len()))
            .collect();
        for row in rows {
            let mut cells = row.into_iter();
            for column in &mut columns {
                column.push(cells.next().unwrap_or(Cell::Missing));
            }
        }
        Self::from_columns(columns)
    }

    pub(crate) fn row_count(&self) -> usize {
        self.rows
    }

    pub(crate) fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn row(&self, index: usize) -> Vec<&Cell> {
        self.columns.iter().map(|c| &c[index]).collect()
    }

    /// Name the columns and keep the rows from `data_start` on.
    pub(crate) fn into_table(self, names: Vec<String>, data_start: usize) -> Result<Table> {
        let columns = self
            .columns
            .into_iter()
            .zip(unique_names(names))
            .map(|(cells, name)| Column::new(name, cells.into_iter().skip(data_start).collect()))
            .collect();
        Table::new(columns)
    }
}

/// How the resolver should treat the columns it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Typing {
    /// Cells arrive as text and numeric columns must be promoted.
    Untyped,
    /// Cells already carry their types.
    Typed,
}

/// Choose the header row of a grid and build the table.
pub(crate) fn resolve_header(
    grid: RawGrid,
    header: HeaderRow,
    typing: Typing,
    config: &SiftConfig,
) -> Result<Table> {
    if grid.column_count() == 0 || grid.row_count() == 0 {
        return Ok(Table::empty());
    }

    let (names, data_start, synthesized) = match header {
        HeaderRow::Auto => {
            let first = grid.row(0);
            if is_header_row(&first, typing) {
                debug!("Detected header row: {} columns", first.len());
                (header_names(&first), 1, false)
            } else {
                debug!("First row looks like data, synthesizing column names");
                let names = (0..grid.column_count())
                    .map(|i| config.column_name(i))
                    .collect();
                (names, 0, true)
            }
        }
        HeaderRow::Row(row) => {
            if row >= grid.row_count() {
                return Err(SiftError::HeaderRowOutOfRange {
                    row,
                    available: grid.row_count(),
                });
            }
            (header_names(&grid.row(row)), row + 1, false)
        }
    };

    let table = grid.into_table(names, data_start)?;
    let table = match typing {
        Typing::Untyped => {
            let columns = table
                .columns()
                .iter()
                .map(|column| column.clone().infer_numeric())
                .collect();
            Table::new(columns)?
        }
        Typing::Typed => table,
    };

    Ok(table.with_synthesized_headers(synthesized))
}

/// A row names the columns when every value is present, textual and distinct.
///
/// Typed grids keep the stored cell type, so a string cell such as `"2020"`
/// is text there; untyped csv fields are text only when they do not parse.
fn is_header_row(row: &[&Cell], typing: Typing) -> bool {
    let mut seen = HashSet::with_capacity(row.len());
    !row.is_empty()
        && row.iter().all(|cell| {
            let textual = match typing {
                Typing::Untyped => cell.infer_type() == Some(CellType::Text),
                Typing::Typed => matches!(cell, Cell::Text(_)) && !cell.is_missing(),
            };
            textual && seen.insert(cell.to_string().trim().to_string())
        })
}

/// Names from a header row; blank cells become `Unnamed: <i>`.
fn header_names(row: &[&Cell]) -> Vec<String> {
    row.iter()
        .enumerate()
        .map(|(i, cell)| {
            let name = cell.to_string().trim().to_string();
            if name.is_empty() {
                format!("Unnamed: {}", i)
            } else {
                name
            }
        })
        .collect()
}
