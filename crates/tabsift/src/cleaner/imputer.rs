//! Statistical imputation of missing values.

use super::directive::MissingValueStrategy;
use crate::error::{Result, SiftError};
use crate::profiler::mode_of;
use crate::table::{Cell, Column, ColumnKind};
use polars::prelude::*;

/// Statistical imputation methods for filling missing values.
pub(crate) struct StatisticalImputer;

impl StatisticalImputer {
    /// The value a fill strategy would write into the column's missing cells.
    ///
    /// Mean and median require a numeric column; mode takes the most frequent
    /// present value of any column.
    pub(crate) fn fill_value(column: &Column, strategy: MissingValueStrategy) -> Result<Cell> {
        let kind = column.kind();
        if kind == ColumnKind::Empty {
            return Err(SiftError::NoValidValues(column.name().to_string()));
        }
        if strategy.requires_numeric() && kind != ColumnKind::Numeric {
            return Err(SiftError::InvalidFillStrategy {
                column: column.name().to_string(),
                strategy,
            });
        }

        let value = match strategy {
            MissingValueStrategy::FillMean => Self::numeric_series(column).mean().map(Cell::number),
            MissingValueStrategy::FillMedian => {
                Self::numeric_series(column).median().map(Cell::number)
            }
            MissingValueStrategy::FillMode => {
                mode_of(column.cells().iter()).map(|(cell, _)| cell.clone())
            }
            MissingValueStrategy::None | MissingValueStrategy::Drop => {
                return Err(SiftError::InvalidConfig(format!(
                    "'{}' is not a fill strategy",
                    strategy
                )));
            }
        };

        value.ok_or_else(|| SiftError::NoValidValues(column.name().to_string()))
    }

    /// Replace every missing cell with `value`, returning the new column and
    /// the number of cells filled.
    pub(crate) fn fill(column: &Column, value: &Cell) -> (Column, usize) {
        let mut filled = 0;
        let cells = column
            .cells()
            .iter()
            .map(|cell| {
                if cell.is_missing() {
                    filled += 1;
                    value.clone()
                } else {
                    cell.clone()
                }
            })
            .collect();
        (Column::new(column.name(), cells), filled)
    }

    fn numeric_series(column: &Column) -> Series {
        Series::new(column.name().into(), column.numbers())
    }
}
