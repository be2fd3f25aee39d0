//! Type conversion for cleaning.

use crate::table::{Cell, Column};

/// Result of parsing a column as numbers.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Coercion {
    pub column: Column,
    /// Present cells that parsed.
    pub converted: usize,
    /// Present cells that did not parse and became missing.
    pub unparseable: usize,
}

/// Parse every present cell of a column as a number.
///
/// Returns `None` when no cell parses, in which case the column must be left
/// unchanged.
pub(crate) fn coerce_numeric(column: &Column) -> Option<Coercion> {
    let mut converted = 0;
    let mut unparseable = 0;
    let cells: Vec<Cell> = column
        .cells()
        .iter()
        .map(|cell| {
            if cell.is_missing() {
                return Cell::Missing;
            }
            match cell.parse_number() {
                Some(value) => {
                    converted += 1;
                    Cell::Number(value)
                }
                None => {
                    unparseable += 1;
                    Cell::Missing
                }
            }
        })
        .collect();

    (converted > 0).then(|| Coercion {
        column: Column::new(column.name(), cells),
        converted,
        unparseable,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_numeric_counts_unparseable() {
        let column = Column::from_values("a", ["1", "2", "x"]);
        let coercion = coerce_numeric(&column).unwrap();
        assert_eq!(
            coercion.column.cells(),
            &[Cell::Number(1.0), Cell::Number(2.0), Cell::Missing]
        );
        assert_eq!(coercion.converted, 2);
        assert_eq!(coercion.unparseable, 1);
    }

    #[test]
    fn test_coerce_numeric_keeps_missing() {
        let column = Column::new("a", vec![Cell::Missing, Cell::text(" 4 ")]);
        let coercion = coerce_numeric(&column).unwrap();
        assert_eq!(coercion.column.cells(), &[Cell::Missing, Cell::Number(4.0)]);
        assert_eq!(coercion.unparseable, 0);
    }

    #[test]
    fn test_coerce_numeric_nothing_parses() {
        let column = Column::from_values("a", ["x", "y"]);
        assert!(coerce_numeric(&column).is_none());
    }
}
