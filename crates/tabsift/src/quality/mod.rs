//! Data quality reporting.
//!
//! This module scans a table snapshot for missing values, duplicate rows,
//! constant columns, mixed-type columns, type-mismatch candidates and
//! placeholder headers.

mod analyzer;

pub use analyzer::DataQualityAnalyzer;
