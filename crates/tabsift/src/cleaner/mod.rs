//! Data cleaning.
//!
//! This module applies a [`CleaningDirective`] to a table:
//! - Parsing selected columns as numbers
//! - Dropping or filling missing values
//! - Removing constant columns
//! - Removing duplicate rows
//!
//! Every call returns a new table. Failures are recorded per concern (and per
//! column) in the [`CleaningReport`] and never abort the remaining concerns.

mod converters;
mod directive;
mod imputer;

pub use directive::{
    CleaningAction, CleaningDirective, CleaningReport, Concern, ConcernReport, ConcernStatus,
    MissingValueStrategy,
};

use crate::error::SiftError;
use crate::quality::DataQualityAnalyzer;
use crate::table::Table;
use imputer::StatisticalImputer;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Data cleaner for user-directed cleaning operations.
pub struct DataCleaner;

impl DataCleaner {
    /// Apply a directive, returning the cleaned table and a per-concern report.
    ///
    /// Concerns run in the order coerce-numeric, missing values, constant
    /// columns, duplicate rows. Applying the same directive to its own output
    /// changes nothing.
    pub fn clean(table: &Table, directive: &CleaningDirective) -> (Table, CleaningReport) {
        let mut report = CleaningReport {
            rows_before: table.row_count(),
            columns_before: table.column_count(),
            ..CleaningReport::default()
        };

        info!(
            "Cleaning {} rows x {} columns",
            table.row_count(),
            table.column_count()
        );

        let mut current = table.clone();
        if !directive.coerce_numeric.is_empty() {
            current = Self::coerce_columns(current, &directive.coerce_numeric, &mut report);
        }
        match directive.missing {
            MissingValueStrategy::None => {}
            MissingValueStrategy::Drop => {
                current =
                    Self::drop_missing(current, directive.missing_columns.as_deref(), &mut report);
            }
            strategy => {
                current = Self::fill_missing(
                    current,
                    strategy,
                    directive.missing_columns.as_deref(),
                    &mut report,
                );
            }
        }
        if directive.remove_constant_columns {
            current = Self::remove_constant_columns(current, &mut report);
        }
        if directive.remove_duplicates {
            current = Self::remove_duplicates(current, &mut report);
        }

        report.rows_after = current.row_count();
        report.columns_after = current.column_count();

        for entry in report.entries.iter().filter(|e| e.status.is_failure()) {
            warn!(
                "{} failed{}: {}",
                entry.concern,
                entry
                    .column
                    .as_deref()
                    .map(|c| format!(" for '{}'", c))
                    .unwrap_or_default(),
                entry.status
            );
        }
        info!(
            "Cleaning done: {} -> {} rows, {} -> {} columns",
            report.rows_before, report.rows_after, report.columns_before, report.columns_after
        );

        (current, report)
    }

    fn coerce_columns(table: Table, columns: &[String], report: &mut CleaningReport) -> Table {
        let mut current = table;
        let mut seen = HashSet::new();

        for name in columns.iter().filter(|name| seen.insert(name.as_str())) {
            let column = match current.require_column(name) {
                Ok(column) => column,
                Err(error) => {
                    report.record(
                        Concern::CoerceNumeric,
                        Some(name.as_str()),
                        ConcernStatus::Failed(error),
                    );
                    continue;
                }
            };

            if column.kind().is_numeric() {
                report.record(
                    Concern::CoerceNumeric,
                    Some(name.as_str()),
                    ConcernStatus::Unchanged,
                );
                continue;
            }

            let Some(coercion) = converters::coerce_numeric(column) else {
                let note = SiftError::CoercionSkipped {
                    column: name.clone(),
                    attempted: column.present().count(),
                };
                debug!("{}", note);
                report.record(
                    Concern::CoerceNumeric,
                    Some(name.as_str()),
                    ConcernStatus::Skipped(note),
                );
                continue;
            };

            let action = CleaningAction::Coerced {
                converted: coercion.converted,
                unparseable: coercion.unparseable,
            };
            match current.with_column(coercion.column) {
                Ok(next) => {
                    debug!("Coerced '{}': {}", name, action);
                    current = next;
                    report.record(
                        Concern::CoerceNumeric,
                        Some(name.as_str()),
                        ConcernStatus::Applied(action),
                    );
                }
                Err(error) => {
                    report.record(
                        Concern::CoerceNumeric,
                        Some(name.as_str()),
                        ConcernStatus::Failed(error),
                    );
                }
            }
        }

        current
    }

    /// Resolve the columns a missing-value strategy targets, recording unknown
    /// names as failures.
    fn target_columns(
        table: &Table,
        subset: Option<&[String]>,
        report: &mut CleaningReport,
    ) -> Vec<String> {
        let Some(subset) = subset else {
            return table
                .column_names()
                .into_iter()
                .map(str::to_string)
                .collect();
        };

        let mut seen = HashSet::new();
        subset
            .iter()
            .filter(|name| seen.insert(name.as_str()))
            .filter_map(|name| match table.require_column(name) {
                Ok(_) => Some(name.clone()),
                Err(error) => {
                    report.record(
                        Concern::MissingValues,
                        Some(name.as_str()),
                        ConcernStatus::Failed(error),
                    );
                    None
                }
            })
            .collect()
    }

    fn drop_missing(table: Table, subset: Option<&[String]>, report: &mut CleaningReport) -> Table {
        let targets = Self::target_columns(&table, subset, report);
        let columns: Vec<_> = targets
            .iter()
            .filter_map(|name| table.column(name))
            .collect();

        let keep: Vec<bool> = (0..table.row_count())
            .map(|row| {
                columns
                    .iter()
                    .all(|column| column.get(row).is_some_and(|cell| !cell.is_missing()))
            })
            .collect();
        let dropped = keep.iter().filter(|k| !**k).count();

        if dropped == 0 {
            report.record(Concern::MissingValues, None, ConcernStatus::Unchanged);
            return table;
        }

        debug!("Dropping {} rows with missing values", dropped);
        report.record(
            Concern::MissingValues,
            None,
            ConcernStatus::Applied(CleaningAction::DroppedRows { rows: dropped }),
        );
        table.filter_rows(&keep)
    }

    fn fill_missing(
        table: Table,
        strategy: MissingValueStrategy,
        subset: Option<&[String]>,
        report: &mut CleaningReport,
    ) -> Table {
        let explicit = subset.is_some();
        let targets = Self::target_columns(&table, subset, report);
        let mut current = table;

        for name in &targets {
            let Some(column) = current.column(name) else {
                continue;
            };
            if column.missing_count() == 0 {
                if explicit {
                    report.record(
                        Concern::MissingValues,
                        Some(name.as_str()),
                        ConcernStatus::Unchanged,
                    );
                }
                continue;
            }

            let outcome = StatisticalImputer::fill_value(column, strategy).and_then(|value| {
                let (filled, cells) = StatisticalImputer::fill(column, &value);
                let next = current.with_column(filled)?;
                Ok((
                    next,
                    CleaningAction::Filled {
                        strategy,
                        value: value.to_string(),
                        cells,
                    },
                ))
            });

            match outcome {
                Ok((next, action)) => {
                    debug!("Filled '{}': {}", name, action);
                    current = next;
                    report.record(
                        Concern::MissingValues,
                        Some(name.as_str()),
                        ConcernStatus::Applied(action),
                    );
                }
                Err(error) => {
                    report.record(
                        Concern::MissingValues,
                        Some(name.as_str()),
                        ConcernStatus::Failed(error),
                    );
                }
            }
        }

        if report.entries_for(Concern::MissingValues).next().is_none() {
            report.record(Concern::MissingValues, None, ConcernStatus::Unchanged);
        }
        current
    }

    fn remove_constant_columns(table: Table, report: &mut CleaningReport) -> Table {
        let constant = DataQualityAnalyzer::constant_columns(&table);
        if constant.is_empty() {
            report.record(Concern::ConstantColumns, None, ConcernStatus::Unchanged);
            return table;
        }

        debug!("Removing constant columns: {:?}", constant);
        let next = table.without_columns(&constant);
        report.record(
            Concern::ConstantColumns,
            None,
            ConcernStatus::Applied(CleaningAction::DroppedColumns { columns: constant }),
        );
        next
    }

    fn remove_duplicates(table: Table, report: &mut CleaningReport) -> Table {
        let duplicates = table.duplicate_mask();
        let dropped = duplicates.iter().filter(|d| **d).count();
        if dropped == 0 {
            report.record(Concern::DuplicateRows, None, ConcernStatus::Unchanged);
            return table;
        }

        debug!("Removing {} duplicate rows", dropped);
        let keep: Vec<bool> = duplicates.iter().map(|d| !d).collect();
        report.record(
            Concern::DuplicateRows,
            None,
            ConcernStatus::Applied(CleaningAction::DroppedRows { rows: dropped }),
        );
        table.filter_rows(&keep)
    }
}
