//! Semantic type inference for columns.

use crate::table::{Cell, CellType, Column, ColumnKind};
use crate::types::SemanticType;
use crate::utils::{looks_like_datetime, ratio};
use std::collections::BTreeSet;

/// Infer the semantic type of a column.
///
/// `datetime_threshold` is the fraction of present values that must look like
/// dates before a text column counts as a datetime candidate.
pub(crate) fn infer_semantic_type(column: &Column, datetime_threshold: f64) -> SemanticType {
    match column.kind() {
        ColumnKind::Empty => SemanticType::Empty,
        ColumnKind::Numeric => SemanticType::Numeric,
        ColumnKind::Text | ColumnKind::Mixed => {
            if cell_types(column).len() > 1 {
                SemanticType::Mixed
            } else if datetime_fraction(column) >= datetime_threshold {
                SemanticType::DatetimeCandidate
            } else {
                SemanticType::Categorical
            }
        }
    }
}

/// Distinct primitive types of the present cells, each inferred on its own.
pub(crate) fn cell_types(column: &Column) -> BTreeSet<CellType> {
    column.present().filter_map(Cell::infer_type).collect()
}

/// Fraction of present values that parse as numbers.
pub(crate) fn numeric_fraction(column: &Column) -> f64 {
    let total = column.present().count();
    let numeric = column
        .present()
        .filter(|cell| cell.parse_number().is_some())
        .count();
    ratio(numeric, total)
}

/// Fraction of present values that look like dates or timestamps.
pub(crate) fn datetime_fraction(column: &Column) -> f64 {
    let total = column.present().count();
    let dates = column
        .present()
        .filter(|cell| cell.as_text().is_some_and(looks_like_datetime))
        .count();
    ratio(dates, total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_column() {
        let column = Column::from_values("a", [Some(1.0), None]);
        assert_eq!(infer_semantic_type(&column, 0.9), SemanticType::Numeric);
    }

    #[test]
    fn test_categorical_column() {
        let column = Column::from_values("a", ["red", "blue"]);
        assert_eq!(infer_semantic_type(&column, 0.9), SemanticType::Categorical);
    }

    #[test]
    fn test_mixed_column() {
        let column = Column::from_values("a", ["1", "2", "three"]);
        assert_eq!(infer_semantic_type(&column, 0.9), SemanticType::Mixed);

        let stored = Column::new("b", vec![Cell::Number(1.0), Cell::text("x")]);
        assert_eq!(infer_semantic_type(&stored, 0.9), SemanticType::Mixed);
    }

    #[test]
    fn test_numeric_text_is_categorical_not_mixed() {
        let column = Column::from_values("a", ["1", "2"]);
        assert_eq!(infer_semantic_type(&column, 0.9), SemanticType::Categorical);
        assert_eq!(numeric_fraction(&column), 1.0);
    }

    #[test]
    fn test_datetime_candidate() {
        let column = Column::from_values("d", ["2024-01-01", "2024-02-01", "soon"]);
        assert_eq!(infer_semantic_type(&column, 0.6), SemanticType::DatetimeCandidate);
        assert_eq!(infer_semantic_type(&column, 0.9), SemanticType::Categorical);
    }

    #[test]
    fn test_empty_column() {
        let column = Column::new("e", vec![Cell::Missing, Cell::text("")]);
        assert_eq!(infer_semantic_type(&column, 0.9), SemanticType::Empty);
        assert_eq!(numeric_fraction(&column), 0.0);
    }

    #[test]
    fn test_semantic_type_serde() {
        let json = serde_json::to_string(&SemanticType::DatetimeCandidate).unwrap();
        assert_eq!(json, r#""datetime_candidate""#);
    }
}
