//! Serialization of a [`Table`] to bytes.
//!
//! Each writer produces output the [`Ingestor`](crate::ingest::Ingestor) reads
//! back: csv re-infers numeric columns, json and xlsx keep names and values.

mod csv;
mod excel;
mod json;

use crate::error::Result;
use crate::format::ExportFormat;
use crate::table::Table;
use tracing::info;

/// Writes tables as csv, xlsx or json.
pub struct Exporter;

impl Exporter {
    /// Serialize a table in the given format.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tabsift::export::Exporter;
    /// use tabsift::format::ExportFormat;
    /// use tabsift::table::{Column, Table};
    ///
    /// let table = Table::new(vec![Column::from_values("A", [Some(1.0), None])]).unwrap();
    /// let bytes = Exporter::export(&table, ExportFormat::Json).unwrap();
    /// assert_eq!(String::from_utf8(bytes).unwrap(), r#"[{"A":1.0},{"A":null}]"#);
    /// ```
    pub fn export(table: &Table, format: ExportFormat) -> Result<Vec<u8>> {
        let bytes = match format {
            ExportFormat::Csv => csv::write_table(table)?,
            ExportFormat::Xlsx => excel::write_table(table)?,
            ExportFormat::Json => json::write_table(table)?,
        };
        info!(
            "Exported {} rows x {} columns as {} ({} bytes)",
            table.row_count(),
            table.column_count(),
            format,
            bytes.len()
        );
        Ok(bytes)
    }

    /// Serialize a table under a format tag such as `"csv"` or `"excel"`.
    pub fn export_tagged(table: &Table, format: &str) -> Result<Vec<u8>> {
        let format: ExportFormat = format.parse()?;
        Self::export(table, format)
    }
}
