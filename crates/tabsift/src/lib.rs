//! Tabular Data Quality Toolkit
//!
//! Profiling, quality assessment, cleaning and export for csv, xlsx, xls and
//! json files.
//!
//! # Overview
//!
//! The pipeline runs leaf-first over immutable tables:
//!
//! - **Ingest**: bytes plus a format tag become a [`Table`], with header
//!   auto-detection ([`Ingestor`])
//! - **Profile**: semantic types and descriptive statistics per column
//!   ([`DataProfiler`])
//! - **Quality**: missing values, duplicate rows, constant columns, mixed
//!   types and type-mismatch candidates ([`DataQualityAnalyzer`])
//! - **Clean**: a [`CleaningDirective`] produces a new table and a per-concern
//!   report ([`DataCleaner`])
//! - **Export**: csv, xlsx or json bytes ([`Exporter`])
//!
//! A [`Session`] owns the source table and its current cleaned version.
//!
//! # Quick Start
//!
//! ```rust
//! use tabsift::{CleaningDirective, ExportFormat, HeaderRow, InputFormat};
//! use tabsift::{MissingValueStrategy, Session, SiftConfig};
//!
//! let csv = b"A,B\n1,x\n2,x\n2,x\n,x\n";
//! let mut session =
//!     Session::open(csv, InputFormat::Csv, HeaderRow::Auto, SiftConfig::default())?;
//!
//! let quality = session.quality();
//! assert_eq!(quality.missing_count("A"), 1);
//! assert_eq!(quality.duplicate_rows, 1);
//! assert_eq!(quality.constant_columns, vec!["B".to_string()]);
//!
//! let directive = CleaningDirective::new()
//!     .missing(MissingValueStrategy::FillMean)
//!     .remove_constant_columns(true);
//! let report = session.clean(&directive);
//! assert!(!report.has_failures());
//!
//! let json = session.export(ExportFormat::Json)?;
//! assert!(json.starts_with(b"[{\"A\":1.0}"));
//! # Ok::<(), tabsift::SiftError>(())
//! ```
//!
//! # Configuration
//!
//! ```rust
//! use tabsift::SiftConfig;
//!
//! let config = SiftConfig::builder()
//!     .mismatch_threshold(0.8) // Flag text columns when 80% of values parse
//!     .top_n_values(10)
//!     .column_prefix("col_")
//!     .build()
//!     .unwrap();
//! assert_eq!(config.column_name(2), "col_2");
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod ingest;
pub mod profiler;
pub mod quality;
pub mod session;
pub mod table;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{
    CleaningAction, CleaningDirective, CleaningReport, Concern, ConcernStatus, DataCleaner,
    MissingValueStrategy,
};
pub use config::{ConfigValidationError, SiftConfig, SiftConfigBuilder};
pub use error::{Result as SiftResult, ResultExt, SiftError};
pub use export::Exporter;
pub use format::{ExportFormat, HeaderRow, InputFormat};
pub use ingest::Ingestor;
pub use profiler::DataProfiler;
pub use quality::DataQualityAnalyzer;
pub use session::{Assessment, HistoryEntry, Session};
pub use table::{Cell, Column, ColumnKind, Table};
pub use types::{
    ColumnProfile, ColumnStatistics, IssueKind, QualityIssue, QualityReport, SemanticType,
    TableProfile,
};
