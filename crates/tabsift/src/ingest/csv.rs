//! CSV reading through polars.
//!
//! Every field is read as text (schema inference disabled) so that header
//! detection sees the raw first row; numeric columns are promoted afterwards.
//! The width of the table is set by the first row polars reads, so an
//! explicit header row is handled by skipping the lines above it. A later
//! row with more fields than that first row is a parse error rather than
//! being cut short; rows with fewer fields are padded with missing cells.
//!
//! Blank lines are kept as all-missing rows so that row positions match the
//! file. The `drop` missing-value strategy removes them.

use super::header::{RawGrid, Typing, resolve_header};
use crate::config::SiftConfig;
use crate::error::{Result, SiftError};
use crate::format::{HeaderRow, InputFormat};
use crate::table::{Cell, Table};
use crate::utils::is_na_marker;
use polars::prelude::*;
use std::io::Cursor;
use tracing::debug;

/// Read csv bytes into a table.
pub(crate) fn read_table(bytes: &[u8], header: HeaderRow, config: &SiftConfig) -> Result<Table> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| SiftError::parse(InputFormat::Csv, format!("invalid UTF-8: {}", e)))?;
    if text.trim().is_empty() {
        return Ok(Table::empty());
    }

    let (skip_rows, header) = match header {
        HeaderRow::Row(row) => {
            let available = text.lines().count();
            if row >= available {
                return Err(SiftError::HeaderRowOutOfRange { row, available });
            }
            (row, HeaderRow::Row(0))
        }
        HeaderRow::Auto => (0, HeaderRow::Auto),
    };

    let grid = read_grid(bytes, skip_rows, &config.na_values)?;
    resolve_header(grid, header, Typing::Untyped, config)
}

/// Read csv bytes into a text grid, mapping NA markers to missing cells.
fn read_grid(bytes: &[u8], skip_rows: usize, na_values: &[String]) -> Result<RawGrid> {
    let df = CsvReadOptions::default()
        .with_has_header(false)
        .with_skip_rows(skip_rows)
        .with_infer_schema_length(Some(0))
        .with_parse_options(
            CsvParseOptions::default()
                .with_quote_char(Some(b'"'))
                .with_truncate_ragged_lines(false),
        )
        .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
        .finish()
        .map_err(|e| {
            let reason = e.to_string();
            if reason.contains("more fields") {
                SiftError::parse(
                    InputFormat::Csv,
                    format!(
                        "a row has more fields than the first row; \
                         give the header row index if the file starts with a title ({})",
                        reason
                    ),
                )
            } else {
                SiftError::parse(InputFormat::Csv, reason)
            }
        })?;

    debug!("Read csv grid: {} rows x {} fields", df.height(), df.width());

    let columns = df
        .get_columns()
        .iter()
        .map(|column| {
            let values = column
                .as_materialized_series()
                .str()
                .map_err(|e| SiftError::parse(InputFormat::Csv, e))?;
            Ok(values
                .into_iter()
                .map(|value| match value {
                    Some(s) if !is_na_marker(s, na_values) => Cell::text(s),
                    _ => Cell::Missing,
                })
                .collect())
        })
        .collect::<Result<Vec<Vec<Cell>>>>()?;

    Ok(RawGrid::from_columns(columns))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers() -> Vec<String> {
        SiftConfig::default().na_values
    }

    #[test]
    fn test_reads_all_fields_as_text() {
        let grid = read_grid(b"a,b\n1,x\n2,y\n", 0, &markers()).unwrap();
        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.column_count(), 2);
    }

    #[test]
    fn test_quoted_fields() {
        let table = read_table(
            b"name,note\n\"Smith, J\",\"said \"\"hi\"\"\"\n",
            HeaderRow::Auto,
            &SiftConfig::default(),
        )
        .unwrap();
        assert_eq!(table.column("name").unwrap().cells(), &[Cell::text("Smith, J")]);
        assert_eq!(
            table.column("note").unwrap().cells(),
            &[Cell::text("said \"hi\"")]
        );
    }

    #[test]
    fn test_header_row_wider_than_preamble() {
        let table = read_table(
            b"report\nname,qty\npen,3\n",
            HeaderRow::Row(1),
            &SiftConfig::default(),
        )
        .unwrap();
        assert_eq!(table.column_names(), vec!["name", "qty"]);
        assert_eq!(table.column("qty").unwrap().numbers(), vec![3.0]);
    }

    #[test]
    fn test_row_wider_than_first_row_is_parse_error() {
        let err = read_table(b"a,b\n1,2,3\n", HeaderRow::Auto, &SiftConfig::default())
            .unwrap_err();
        assert_eq!(err.error_code(), "PARSE_ERROR");
    }

    #[test]
    fn test_title_line_needs_explicit_header_row() {
        let csv = b"title\na,b\n1,2\n";
        let err = read_table(csv, HeaderRow::Auto, &SiftConfig::default()).unwrap_err();
        assert_eq!(err.error_code(), "PARSE_ERROR");

        let table = read_table(csv, HeaderRow::Row(1), &SiftConfig::default()).unwrap();
        assert_eq!(table.column_names(), vec!["a", "b"]);
        assert_eq!(table.column("b").unwrap().numbers(), vec![2.0]);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = read_table(b"a,b\n1\n2,3\n", HeaderRow::Auto, &SiftConfig::default())
            .unwrap();
        assert_eq!(
            table.column("b").unwrap().cells(),
            &[Cell::Missing, Cell::Number(3.0)]
        );
    }

    #[test]
    fn test_blank_line_is_an_all_missing_row() {
        let table = read_table(b"a,b\n1,2\n\n3,4\n", HeaderRow::Auto, &SiftConfig::default())
            .unwrap();
        assert_eq!(table.shape(), (3, 2));
        assert_eq!(
            table.column("a").unwrap().cells(),
            &[Cell::Number(1.0), Cell::Missing, Cell::Number(3.0)]
        );
    }

    #[test]
    fn test_header_row_out_of_range() {
        let err = read_table(b"a,b\n1,2\n", HeaderRow::Row(5), &SiftConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            SiftError::HeaderRowOutOfRange {
                row: 5,
                available: 2
            }
        ));
    }

    #[test]
    fn test_empty_input_is_empty_table() {
        let table = read_table(b"  \n", HeaderRow::Row(3), &SiftConfig::default()).unwrap();
        assert_eq!(table.shape(), (0, 0));
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let err = read_table(&[0xff, 0xfe, b',', b'a'], HeaderRow::Auto, &SiftConfig::default())
            .unwrap_err();
        assert_eq!(err.error_code(), "PARSE_ERROR");
    }
}
