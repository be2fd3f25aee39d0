//! Xlsx writing through rust_xlsxwriter.

use crate::error::{Result, SiftError};
use crate::table::{Cell, Table};
use rust_xlsxwriter::{Workbook, XlsxError};
use tracing::debug;

/// Worksheet row limit, header row included.
const MAX_ROWS: usize = 1_048_576;
const MAX_COLUMNS: usize = 16_384;

fn export_failed(reason: impl ToString) -> SiftError {
    SiftError::ExportFailed {
        format: "xlsx".to_string(),
        reason: reason.to_string(),
    }
}

impl From<XlsxError> for SiftError {
    fn from(err: XlsxError) -> Self {
        export_failed(err)
    }
}

/// Stored in the last row when every cell there is missing. Readers stop the
/// used range at the last stored cell, and a blank string reads back as
/// missing.
const ROW_END_MARKER: &str = " ";

/// Header row of names, then typed cells. Missing cells stay blank.
pub(crate) fn write_table(table: &Table) -> Result<Vec<u8>> {
    check_limits(table.row_count(), table.column_count())?;

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, column) in table.columns().iter().enumerate() {
        let col = col as u16;
        worksheet.write_string(0, col, column.name())?;
        for (row, cell) in column.cells().iter().enumerate() {
            let row = row as u32 + 1;
            match cell {
                _ if cell.is_missing() => {}
                Cell::Number(v) => {
                    worksheet.write_number(row, col, *v)?;
                }
                Cell::Text(s) => {
                    worksheet.write_string(row, col, s)?;
                }
                Cell::Missing => {}
            }
        }
    }

    if trailing_row_is_missing(table) {
        worksheet.write_string(table.row_count() as u32, 0, ROW_END_MARKER)?;
    }

    debug!(
        "Writing xlsx sheet: {} rows x {} columns",
        table.row_count() + 1,
        table.column_count()
    );
    Ok(workbook.save_to_buffer()?)
}

fn trailing_row_is_missing(table: &Table) -> bool {
    let Some(last) = table.row_count().checked_sub(1) else {
        return false;
    };
    table
        .columns()
        .iter()
        .all(|column| column.get(last).is_none_or(Cell::is_missing))
}

fn check_limits(rows: usize, columns: usize) -> Result<()> {
    if rows + 1 > MAX_ROWS {
        return Err(export_failed(format!(
            "{} rows plus header exceed the worksheet limit of {}",
            rows, MAX_ROWS
        )));
    }
    if columns > MAX_COLUMNS {
        return Err(export_failed(format!(
            "{} columns exceed the worksheet limit of {}",
            columns, MAX_COLUMNS
        )));
    }
    Ok(())
}
