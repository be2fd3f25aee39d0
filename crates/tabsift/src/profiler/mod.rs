//! Table profiling.
//!
//! This module computes, for one table snapshot:
//! - shape and per-column semantic types
//! - missing and distinct counts
//! - descriptive statistics (numeric summaries or value frequencies)
//! - pairwise correlations between numeric columns

mod statistics;
mod type_inference;

pub(crate) use statistics::mode_of;
pub(crate) use type_inference::{cell_types, datetime_fraction, numeric_fraction};

use crate::config::SiftConfig;
use crate::error::Result;
use crate::table::{Column, Table};
use crate::types::{
    ColumnProfile, ColumnStatistics, CorrelationMatrix, SemanticType, TableProfile,
};
use crate::utils::ratio;
use tracing::{debug, info};

/// Data profiler for analyzing table structure and statistics.
pub struct DataProfiler;

impl DataProfiler {
    /// Profile every column of a table.
    ///
    /// An empty table yields a zero-row profile, never an error.
    pub fn profile_table(table: &Table, config: &SiftConfig) -> Result<TableProfile> {
        let columns = table
            .columns()
            .iter()
            .map(|column| Self::profile_column(column, table.row_count(), config))
            .collect::<Result<Vec<_>>>()?;

        let numeric: Vec<&Column> = table
            .columns()
            .iter()
            .zip(&columns)
            .filter(|(_, profile)| profile.semantic_type == SemanticType::Numeric)
            .map(|(column, _)| column)
            .collect();
        let correlations = Self::correlation_matrix(&numeric);

        info!(
            "Profiled {} rows x {} columns ({} numeric)",
            table.row_count(),
            table.column_count(),
            numeric.len()
        );

        Ok(TableProfile {
            row_count: table.row_count(),
            column_count: table.column_count(),
            headers_synthesized: table.headers_synthesized(),
            columns,
            correlations,
        })
    }

    fn profile_column(column: &Column, rows: usize, config: &SiftConfig) -> Result<ColumnProfile> {
        let semantic_type =
            type_inference::infer_semantic_type(column, config.mismatch_threshold);
        let missing_count = column.missing_count();

        let statistics = match semantic_type {
            SemanticType::Numeric => {
                ColumnStatistics::Numeric(statistics::numeric_summary(column)?)
            }
            SemanticType::Empty => ColumnStatistics::Empty,
            SemanticType::Categorical | SemanticType::Mixed | SemanticType::DatetimeCandidate => {
                ColumnStatistics::Categorical(statistics::categorical_summary(
                    column,
                    config.top_n_values,
                ))
            }
        };

        debug!(
            "Column '{}': {} ({} missing)",
            column.name(),
            semantic_type,
            missing_count
        );

        Ok(ColumnProfile {
            name: column.name().to_string(),
            semantic_type,
            kind: column.kind(),
            missing_count,
            missing_percentage: ratio(missing_count, rows) * 100.0,
            unique_count: column.distinct_count(),
            statistics,
        })
    }

    fn correlation_matrix(columns: &[&Column]) -> CorrelationMatrix {
        let values = columns
            .iter()
            .map(|x| columns.iter().map(|y| statistics::pearson(x, y)).collect())
            .collect();
        CorrelationMatrix {
            columns: columns.iter().map(|c| c.name().to_string()).collect(),
            values,
        }
    }
}
