//! JSON reading.
//!
//! Three layouts are accepted:
//! - records: `[{"A": 1, "B": "x"}, ...]`
//! - columns: `{"A": {"0": 1, "1": 2}}` or `{"A": [1, 2]}`
//! - rows: `[[1, "x"], [2, "y"]]`, with synthesized column names
//!
//! Column order follows first appearance.

use super::header::RawGrid;
use crate::config::SiftConfig;
use crate::error::{Result, SiftError};
use crate::format::InputFormat;
use crate::table::{Cell, Column, Table};
use serde_json::{Map, Value};
use tracing::debug;

fn parse_error(reason: impl ToString) -> SiftError {
    SiftError::parse(InputFormat::Json, reason)
}

/// Parse json bytes into a table.
pub(crate) fn read_table(bytes: &[u8], config: &SiftConfig) -> Result<Table> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Table::empty());
    }

    let value: Value = serde_json::from_slice(bytes).map_err(parse_error)?;
    match value {
        Value::Array(items) if items.is_empty() => Ok(Table::empty()),
        Value::Array(items) if items.iter().all(Value::is_object) => {
            debug!("Reading json records: {} rows", items.len());
            from_records(items)
        }
        Value::Array(items) if items.iter().all(Value::is_array) => {
            debug!("Reading json row arrays: {} rows", items.len());
            from_rows(items, config)
        }
        Value::Array(_) => Err(parse_error(
            "array must hold only objects or only arrays",
        )),
        Value::Object(columns) => {
            debug!("Reading json columns: {} columns", columns.len());
            from_columns(columns)
        }
        _ => Err(parse_error("expected an array or an object at the top level")),
    }
}

fn from_records(records: Vec<Value>) -> Result<Table> {
    let mut names: Vec<String> = Vec::new();
    for record in &records {
        if let Value::Object(fields) = record {
            for key in fields.keys() {
                if !names.contains(key) {
                    names.push(key.clone());
                }
            }
        }
    }

    let mut columns: Vec<Vec<Cell>> = vec![Vec::with_capacity(records.len()); names.len()];
    for record in records {
        let Value::Object(mut fields) = record else {
            continue;
        };
        for (name, cells) in names.iter().zip(columns.iter_mut()) {
            cells.push(fields.remove(name).map_or(Cell::Missing, to_cell));
        }
    }

    Table::new(
        names
            .into_iter()
            .zip(columns)
            .map(|(name, cells)| Column::new(name, cells))
            .collect(),
    )
}

fn from_columns(columns: Map<String, Value>) -> Result<Table> {
    // Index-keyed columns are aligned on the union of their keys.
    let mut index: Vec<String> = Vec::new();
    for value in columns.values() {
        if let Value::Object(cells) = value {
            for key in cells.keys() {
                if !index.contains(key) {
                    index.push(key.clone());
                }
            }
        }
    }

    let mut built = Vec::with_capacity(columns.len());
    for (name, value) in columns {
        let cells: Vec<Cell> = match value {
            Value::Array(values) => values.into_iter().map(to_cell).collect(),
            Value::Object(mut cells) => index
                .iter()
                .map(|key| cells.remove(key).map_or(Cell::Missing, to_cell))
                .collect(),
            _ => {
                return Err(parse_error(format!(
                    "column '{}' must be an array or an object",
                    name
                )));
            }
        };
        built.push(Column::new(name, cells));
    }

    Table::new(built).map_err(parse_error)
}

fn from_rows(rows: Vec<Value>, config: &SiftConfig) -> Result<Table> {
    let rows = rows
        .into_iter()
        .map(|row| match row {
            Value::Array(values) => values.into_iter().map(to_cell).collect(),
            _ => Vec::new(),
        })
        .collect();
    let grid = RawGrid::from_rows(rows);
    let names = (0..grid.column_count())
        .map(|i| config.column_name(i))
        .collect();
    Ok(grid.into_table(names, 0)?.with_synthesized_headers(true))
}

/// Map a json value onto a cell.
fn to_cell(value: Value) -> Cell {
    match value {
        Value::Null => Cell::Missing,
        Value::Number(n) => n.as_f64().map_or(Cell::Missing, Cell::number),
        Value::String(s) => Cell::text(s),
        Value::Bool(b) => Cell::Text(b.to_string()),
        nested => Cell::Text(nested.to_string()),
    }
}
