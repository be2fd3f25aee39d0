use crate::config::SiftConfig;
use crate::profiler::{cell_types, datetime_fraction, numeric_fraction};
use crate::table::{CellType, Column, ColumnKind, Table};
use crate::types::{
    IssueKind, MissingCount, QualityIssue, QualityReport, SuspectedType, TypeMismatch,
};
use crate::utils::ratio;
use tracing::{debug, info};

pub struct DataQualityAnalyzer;

impl DataQualityAnalyzer {
    /// Scan a table for quality issues. Pure and deterministic.
    pub fn analyze(table: &Table, config: &SiftConfig) -> QualityReport {
        let missing_values = Self::missing_values(table);
        let duplicate_rows = Self::duplicate_rows(table);
        let constant_columns = Self::constant_columns(table);
        let mixed_type_columns = Self::mixed_type_columns(table);
        let type_mismatches = Self::type_mismatches(table, config.mismatch_threshold);
        let unnamed_columns = Self::unnamed_columns(table);

        let mut issues = Vec::new();
        for missing in missing_values.iter().filter(|m| m.count > 0) {
            issues.push(QualityIssue {
                issue: IssueKind::MissingValues,
                column: Some(missing.column.clone()),
                details: format!("{} missing ({:.1}%)", missing.count, missing.percentage),
            });
        }
        if duplicate_rows > 0 {
            issues.push(QualityIssue {
                issue: IssueKind::DuplicateRows,
                column: None,
                details: format!("{} duplicate rows", duplicate_rows),
            });
        }
        for name in &constant_columns {
            let all_missing = table
                .column(name)
                .is_some_and(|c| c.kind() == ColumnKind::Empty);
            issues.push(QualityIssue {
                issue: IssueKind::ConstantColumn,
                column: Some(name.clone()),
                details: if all_missing {
                    "All values are missing".to_string()
                } else {
                    "All values are identical".to_string()
                },
            });
        }
        for name in &mixed_type_columns {
            issues.push(QualityIssue {
                issue: IssueKind::MixedTypes,
                column: Some(name.clone()),
                details: "Values infer as both numeric and text".to_string(),
            });
        }
        for mismatch in &type_mismatches {
            issues.push(QualityIssue {
                issue: IssueKind::TypeMismatch,
                column: Some(mismatch.column.clone()),
                details: format!(
                    "{:.0}% of values parse as {}",
                    mismatch.fraction * 100.0,
                    mismatch.suspected_type
                ),
            });
        }
        for name in &unnamed_columns {
            issues.push(QualityIssue {
                issue: IssueKind::UnnamedColumn,
                column: Some(name.clone()),
                details: "Header is blank or a placeholder".to_string(),
            });
        }

        info!(
            "Quality scan: {} issues ({} duplicate rows, {} constant columns)",
            issues.len(),
            duplicate_rows,
            constant_columns.len()
        );

        QualityReport {
            row_count: table.row_count(),
            column_count: table.column_count(),
            missing_values,
            duplicate_rows,
            constant_columns,
            mixed_type_columns,
            type_mismatches,
            unnamed_columns,
            issues,
        }
    }

    fn missing_values(table: &Table) -> Vec<MissingCount> {
        table
            .columns()
            .iter()
            .map(|column| {
                let count = column.missing_count();
                MissingCount {
                    column: column.name().to_string(),
                    count,
                    percentage: ratio(count, table.row_count()) * 100.0,
                }
            })
            .collect()
    }

    /// Rows identical to an earlier row.
    pub(crate) fn duplicate_rows(table: &Table) -> usize {
        table.duplicate_mask().into_iter().filter(|d| *d).count()
    }

    /// Columns with at most one distinct present value, including all-missing
    /// ones. A zero-row table has none.
    pub(crate) fn constant_columns(table: &Table) -> Vec<String> {
        if table.row_count() == 0 {
            return Vec::new();
        }
        table
            .columns()
            .iter()
            .filter(|column| column.distinct_count() <= 1)
            .map(|column| column.name().to_string())
            .collect()
    }

    fn mixed_type_columns(table: &Table) -> Vec<String> {
        table
            .columns()
            .iter()
            .filter(|column| {
                let types = cell_types(column);
                let mixed = types.len() > 1;
                if mixed {
                    debug!(
                        "Column '{}' mixes {:?}",
                        column.name(),
                        types.iter().collect::<Vec<&CellType>>()
                    );
                }
                mixed
            })
            .map(|column| column.name().to_string())
            .collect()
    }

    fn type_mismatches(table: &Table, threshold: f64) -> Vec<TypeMismatch> {
        table
            .columns()
            .iter()
            .filter_map(|column| Self::suspect_type(column, threshold))
            .collect()
    }

    fn suspect_type(column: &Column, threshold: f64) -> Option<TypeMismatch> {
        if matches!(column.kind(), ColumnKind::Numeric | ColumnKind::Empty) {
            return None;
        }

        let numeric = numeric_fraction(column);
        if numeric >= threshold {
            return Some(TypeMismatch {
                column: column.name().to_string(),
                suspected_type: SuspectedType::Numeric,
                fraction: numeric,
            });
        }

        let dates = datetime_fraction(column);
        (dates >= threshold).then(|| TypeMismatch {
            column: column.name().to_string(),
            suspected_type: SuspectedType::Datetime,
            fraction: dates,
        })
    }

    fn unnamed_columns(table: &Table) -> Vec<String> {
        table
            .column_names()
            .into_iter()
            .filter(|name| name.trim().is_empty() || name.to_lowercase().contains("unnamed"))
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;
    use pretty_assertions::assert_eq;

    fn analyze(table: &Table) -> QualityReport {
        DataQualityAnalyzer::analyze(table, &SiftConfig::default())
    }

    fn scenario_table() -> Table {
        Table::new(vec![
            Column::from_values("A", [Some(1.0), Some(2.0), Some(2.0), None]),
            Column::from_values("B", ["x", "x", "x", "x"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_scenario_report() {
        let report = analyze(&scenario_table());
        assert_eq!(report.missing_count("A"), 1);
        assert_eq!(report.missing_count("B"), 0);
        assert_eq!(report.duplicate_rows, 1);
        assert_eq!(report.constant_columns, vec!["B".to_string()]);
        assert!(report.mixed_type_columns.is_empty());
        assert!(report.type_mismatches.is_empty());
    }

    #[test]
    fn test_missing_count_matches_cells() {
        let table = Table::new(vec![
            Column::new("a", vec![Cell::Missing, Cell::text(" "), Cell::Number(1.0)]),
            Column::new("b", vec![Cell::text("x"), Cell::Missing, Cell::Missing]),
        ])
        .unwrap();
        let report = analyze(&table);
        let independent = table
            .columns()
            .iter()
            .flat_map(|c| c.cells())
            .filter(|cell| matches!(cell, Cell::Missing) || cell.to_string().trim().is_empty())
            .count();
        assert_eq!(report.total_missing(), independent);
        assert_eq!(report.total_missing(), 4);
    }

    #[test]
    fn test_all_missing_column_is_constant() {
        let table = Table::new(vec![
            Column::new("empty", vec![Cell::Missing, Cell::Missing]),
            Column::from_values("a", [1.0, 2.0]),
        ])
        .unwrap();
        let report = analyze(&table);
        assert_eq!(report.constant_columns, vec!["empty".to_string()]);
        let issue = report
            .issues
            .iter()
            .find(|i| i.issue == IssueKind::ConstantColumn)
            .unwrap();
        assert_eq!(issue.details, "All values are missing");
    }

    #[test]
    fn test_zero_row_table_has_no_constant_columns() {
        let table = Table::new(vec![Column::new("a", Vec::new())]).unwrap();
        let report = analyze(&table);
        assert!(report.constant_columns.is_empty());
        assert!(!report.has_issues());
    }

    #[test]
    fn test_mixed_type_column() {
        let table = Table::new(vec![Column::from_values("m", ["1", "two", "3"])]).unwrap();
        let report = analyze(&table);
        assert_eq!(report.mixed_type_columns, vec!["m".to_string()]);
    }

    #[test]
    fn test_numeric_mismatch_threshold() {
        let mut values: Vec<String> = (0..9).map(|i| i.to_string()).collect();
        values.push("n/a-ish".to_string());
        let table = Table::new(vec![Column::from_values(
            "m",
            values.iter().map(String::as_str),
        )])
        .unwrap();

        let report = analyze(&table);
        assert_eq!(report.type_mismatches.len(), 1);
        assert_eq!(report.type_mismatches[0].suspected_type, SuspectedType::Numeric);
        assert!((report.type_mismatches[0].fraction - 0.9).abs() < 1e-12);

        let strict = SiftConfig::builder().mismatch_threshold(0.95).build().unwrap();
        let report = DataQualityAnalyzer::analyze(&table, &strict);
        assert!(report.type_mismatches.is_empty());
    }

    #[test]
    fn test_datetime_mismatch() {
        let table = Table::new(vec![Column::from_values(
            "when",
            ["2024-01-01", "2024-01-02", "2024-01-03"],
        )])
        .unwrap();
        let report = analyze(&table);
        assert_eq!(report.type_mismatches[0].suspected_type, SuspectedType::Datetime);
    }

    #[test]
    fn test_numeric_columns_are_not_mismatches() {
        let table = Table::new(vec![Column::from_values("n", [1.0, 2.0])]).unwrap();
        assert!(analyze(&table).type_mismatches.is_empty());
    }

    #[test]
    fn test_unnamed_columns() {
        let table = Table::new(vec![
            Column::from_values("Unnamed: 0", [1.0]),
            Column::from_values("name", [2.0]),
        ])
        .unwrap();
        assert_eq!(analyze(&table).unnamed_columns, vec!["Unnamed: 0".to_string()]);
    }

    #[test]
    fn test_issue_list_is_flattened() {
        let report = analyze(&scenario_table());
        let kinds: Vec<IssueKind> = report.issues.iter().map(|i| i.issue).collect();
        assert_eq!(
            kinds,
            vec![
                IssueKind::MissingValues,
                IssueKind::DuplicateRows,
                IssueKind::ConstantColumn
            ]
        );
        assert_eq!(report.issues[0].details, "1 missing (25.0%)");
        assert_eq!(report.issues[1].column, None);
    }

    #[test]
    fn test_analyze_is_deterministic() {
        let table = scenario_table();
        assert_eq!(analyze(&table), analyze(&table));
    }
}
