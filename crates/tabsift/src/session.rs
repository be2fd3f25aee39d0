//! Session state.
//!
//! A [`Session`] owns the table loaded from the user's file and the current
//! cleaned version of it. Every pipeline call goes through the session value
//! the caller holds; there is no global state.
//!
//! ```text
//! ┌──────────────────────────── Session ────────────────────────────┐
//! │  source: Table    (as ingested, plus header overrides)          │
//! │  current: Table   (result of the cleaning runs so far)          │
//! │  history: Vec<HistoryEntry>  (newest first, max 10)             │
//! │  config: SiftConfig                                             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Profiles and quality reports are always computed from `current`.

use crate::cleaner::{CleaningDirective, CleaningReport, DataCleaner};
use crate::config::SiftConfig;
use crate::error::Result;
use crate::export::Exporter;
use crate::format::{ExportFormat, HeaderRow, InputFormat};
use crate::ingest::Ingestor;
use crate::profiler::DataProfiler;
use crate::quality::DataQualityAnalyzer;
use crate::table::Table;
use crate::types::{QualityReport, TableProfile};
use serde::Serialize;
use tracing::info;

const MAX_HISTORY: usize = 10;

/// Summary of one cleaning run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub directive: CleaningDirective,
    pub rows_before: usize,
    pub rows_after: usize,
    pub columns_before: usize,
    pub columns_after: usize,
    pub failures: usize,
}

impl HistoryEntry {
    fn new(directive: &CleaningDirective, report: &CleaningReport) -> Self {
        Self {
            directive: directive.clone(),
            rows_before: report.rows_before,
            rows_after: report.rows_after,
            columns_before: report.columns_before,
            columns_after: report.columns_after,
            failures: report.failures().count(),
        }
    }
}

/// Profile and quality report of one table snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub profile: TableProfile,
    pub quality: QualityReport,
}

#[derive(Debug, Clone)]
pub struct Session {
    config: SiftConfig,
    source: Table,
    current: Table,
    history: Vec<HistoryEntry>,
}

impl Session {
    /// Ingest a file's bytes and start a session over the result.
    pub fn open(
        bytes: &[u8],
        format: InputFormat,
        header: HeaderRow,
        config: SiftConfig,
    ) -> Result<Self> {
        config.validate()?;
        let table = Ingestor::ingest(bytes, format, header, &config)?;
        Ok(Self::from_table(table, config))
    }

    /// Start a session over an already built table.
    pub fn from_table(table: Table, config: SiftConfig) -> Self {
        Self {
            config,
            current: table.clone(),
            source: table,
            history: Vec::new(),
        }
    }

    pub fn config(&self) -> &SiftConfig {
        &self.config
    }

    /// The table as ingested.
    pub fn source(&self) -> &Table {
        &self.source
    }

    /// The table after the cleaning runs so far.
    pub fn current(&self) -> &Table {
        &self.current
    }

    /// Cleaning runs, newest first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Whether the column names were generated rather than read.
    pub fn headers_suspect(&self) -> bool {
        self.current.headers_synthesized()
    }

    /// Replace every column name of the source table.
    ///
    /// Cleaning runs are discarded, since their directives name the old
    /// columns.
    pub fn apply_headers<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        let renamed = self.source.with_column_names(names)?;
        info!("Applied {} user-supplied column names", names.len());
        self.source = renamed;
        self.reset();
        Ok(())
    }

    pub fn profile(&self) -> Result<TableProfile> {
        DataProfiler::profile_table(&self.current, &self.config)
    }

    pub fn quality(&self) -> QualityReport {
        DataQualityAnalyzer::analyze(&self.current, &self.config)
    }

    /// Profile and quality report of the same snapshot.
    pub fn assess(&self) -> Result<Assessment> {
        Ok(Assessment {
            profile: self.profile()?,
            quality: self.quality(),
        })
    }

    /// Clean the current table, making the result the new current table.
    pub fn clean(&mut self, directive: &CleaningDirective) -> CleaningReport {
        let (cleaned, report) = DataCleaner::clean(&self.current, directive);
        self.current = cleaned;

        self.history.insert(0, HistoryEntry::new(directive, &report));
        self.history.truncate(MAX_HISTORY);
        report
    }

    /// Drop all cleaning runs and return to the source table.
    pub fn reset(&mut self) {
        self.current = self.source.clone();
        self.history.clear();
    }

    pub fn export(&self, format: ExportFormat) -> Result<Vec<u8>> {
        Exporter::export(&self.current, format)
    }
}
