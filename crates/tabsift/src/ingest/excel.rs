//! Workbook reading through calamine. Only the first worksheet is read.

use super::header::RawGrid;
use crate::error::{Result, SiftError};
use crate::format::InputFormat;
use crate::table::Cell;
use calamine::{Data, Range, Reader, Xls, Xlsx};
use std::io::{Cursor, Read, Seek};
use tracing::debug;

/// Read the first worksheet of an xlsx or xls workbook into a typed grid.
///
/// Leading empty rows and columns are not part of the grid; calamine trims
/// the used range to the first non-empty cell.
pub(crate) fn read_grid(bytes: &[u8], format: InputFormat) -> Result<RawGrid> {
    let cursor = Cursor::new(bytes);
    let range = match format {
        InputFormat::Xlsx => {
            let mut workbook: Xlsx<_> =
                Xlsx::new(cursor).map_err(|e| SiftError::parse(format, e))?;
            first_sheet(&mut workbook, format)?
        }
        InputFormat::Xls => {
            let mut workbook: Xls<_> =
                Xls::new(cursor).map_err(|e| SiftError::parse(format, e))?;
            first_sheet(&mut workbook, format)?
        }
        other => {
            return Err(SiftError::parse(other, "not a workbook format"));
        }
    };

    debug!(
        "Read {} worksheet: {} rows x {} columns",
        format,
        range.height(),
        range.width()
    );

    let rows = range
        .rows()
        .map(|row| row.iter().map(to_cell).collect())
        .collect();
    Ok(RawGrid::from_rows(rows))
}

fn first_sheet<RS, R>(workbook: &mut R, format: InputFormat) -> Result<Range<Data>>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: std::fmt::Display,
{
    workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SiftError::parse(format, "workbook has no worksheets"))?
        .map_err(|e| SiftError::parse(format, e))
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Int(v) => Cell::number(*v as f64),
        Data::Float(v) => Cell::number(*v),
        Data::String(s) => Cell::text(s.as_str()),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => Cell::Text(datetime.to_string()),
            None => Cell::number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::text(s.as_str()),
        Data::Error(_) | Data::Empty => Cell::Missing,
    }
}
