//! Ingestion of raw bytes into a [`Table`].
//!
//! - csv: parsed by polars with every field as text, NA markers become
//!   missing, numeric columns are promoted afterwards
//! - xlsx / xls: first worksheet read by calamine, cell types kept
//! - json: records, columns or row arrays via serde_json
//!
//! Csv and workbooks store the header as an ordinary row, resolved according
//! to [`HeaderRow`]. Json always names its fields, so the header option does
//! not apply.

mod csv;
mod excel;
mod header;
mod json;

use crate::config::SiftConfig;
use crate::error::{Result, ResultExt, SiftError};
use crate::format::{HeaderRow, InputFormat};
use crate::table::Table;
use header::Typing;
use std::path::Path;
use tracing::{debug, info};

/// Loads tabular files into tables.
pub struct Ingestor;

impl Ingestor {
    /// Parse `bytes` under the declared format.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tabsift::config::SiftConfig;
    /// use tabsift::format::{HeaderRow, InputFormat};
    /// use tabsift::ingest::Ingestor;
    ///
    /// let csv = b"name,score\nAnn,3\nBob,NA\n";
    /// let table =
    ///     Ingestor::ingest(csv, InputFormat::Csv, HeaderRow::Auto, &SiftConfig::default())
    ///         .unwrap();
    /// assert_eq!(table.shape(), (2, 2));
    /// assert_eq!(table.missing_cells(), 1);
    /// ```
    pub fn ingest(
        bytes: &[u8],
        format: InputFormat,
        header: HeaderRow,
        config: &SiftConfig,
    ) -> Result<Table> {
        if format.has_intrinsic_header() && header != HeaderRow::Auto {
            debug!("Ignoring header row {} for {} input", header, format);
        }

        let table = match format {
            InputFormat::Csv => csv::read_table(bytes, header, config)?,
            InputFormat::Xlsx | InputFormat::Xls => {
                let grid = excel::read_grid(bytes, format)?;
                header::resolve_header(grid, header, Typing::Typed, config)?
            }
            InputFormat::Json => json::read_table(bytes, config)?,
        };

        info!(
            "Ingested {} input: {} rows x {} columns{}",
            format,
            table.row_count(),
            table.column_count(),
            if table.headers_synthesized() {
                " (synthesized headers)"
            } else {
                ""
            }
        );
        Ok(table)
    }

    /// Parse `bytes` under a format tag such as `"csv"` or `".xlsx"`.
    pub fn ingest_tagged(
        bytes: &[u8],
        format: &str,
        header: HeaderRow,
        config: &SiftConfig,
    ) -> Result<Table> {
        let format: InputFormat = format.parse()?;
        Self::ingest(bytes, format, header, config)
    }

    /// Read a file, taking the format from its extension unless one is given.
    pub fn ingest_path(
        path: &Path,
        format: Option<InputFormat>,
        header: HeaderRow,
        config: &SiftConfig,
    ) -> Result<Table> {
        let format = match format {
            Some(format) => format,
            None => InputFormat::from_path(path)?,
        };
        let bytes = std::fs::read(path)
            .map_err(SiftError::from)
            .context(format!("Failed to read {}", path.display()))?;
        Self::ingest(&bytes, format, header, config)
    }
}
