//! Csv writing through polars.

use crate::error::Result;
use crate::table::{Column, Table};
use polars::prelude::{CsvWriter, DataFrame, NamedFrom, SerWriter, Series};

/// Numeric columns are written as floats, every other column as text.
/// Missing cells become empty fields.
pub(crate) fn write_table(table: &Table) -> Result<Vec<u8>> {
    let columns: Vec<polars::prelude::Column> = table
        .columns()
        .iter()
        .map(|column| to_series(column).into())
        .collect();
    let mut df = DataFrame::new(columns)?;

    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(&mut df)?;
    Ok(buffer)
}

fn to_series(column: &Column) -> Series {
    let name = column.name().into();
    if column.kind().is_numeric() {
        let values: Vec<Option<f64>> = column.cells().iter().map(|c| c.as_number()).collect();
        Series::new(name, values)
    } else {
        let values: Vec<Option<String>> = column
            .cells()
            .iter()
            .map(|c| (!c.is_missing()).then(|| c.to_string()))
            .collect();
        Series::new(name, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    #[test]
    fn test_writes_header_and_blank_missing() {
        let table = Table::new(vec![
            Column::from_values("a", [Some(1.5), None]),
            Column::from_values("b", [Some("x, y"), Some("z")]),
        ])
        .unwrap();
        let text = String::from_utf8(write_table(&table).unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "a,b");
        assert_eq!(lines[1], "1.5,\"x, y\"");
        assert_eq!(lines[2], ",z");
    }

    #[test]
    fn test_mixed_column_written_as_text() {
        let table = Table::new(vec![Column::new(
            "m",
            vec![Cell::Number(2.0), Cell::text("two")],
        )])
        .unwrap();
        let text = String::from_utf8(write_table(&table).unwrap()).unwrap();
        assert_eq!(text.lines().collect::<Vec<_>>(), vec!["m", "2", "two"]);
    }
}
