//! Descriptive statistics for column profiling.

use crate::error::Result;
use crate::table::{Cell, CellKey, Column};
use crate::types::{CategoricalSummary, NumericSummary, ValueCount};
use polars::prelude::*;
use std::collections::HashMap;

/// Summarize the stored numbers of a column.
pub(crate) fn numeric_summary(column: &Column) -> Result<NumericSummary> {
    let values = column.numbers();
    let count = values.len();
    if count == 0 {
        return Ok(NumericSummary {
            count,
            mean: None,
            std: None,
            min: None,
            q1: None,
            median: None,
            q3: None,
            max: None,
            mode: None,
        });
    }

    let series = Series::new(column.name().into(), values.as_slice());
    let mut sorted = values.clone();
    sorted.sort_by(f64::total_cmp);

    Ok(NumericSummary {
        count,
        mean: series.mean(),
        std: calculate_std(&series)?,
        min: series.min::<f64>()?,
        q1: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q3: quantile(&sorted, 0.75),
        max: series.max::<f64>()?,
        mode: mode_of(column.cells().iter().filter(|cell| cell.as_number().is_some()))
            .and_then(|(cell, _)| cell.as_number()),
    })
}

/// Summarize the values of a non-numeric column by frequency.
pub(crate) fn categorical_summary(column: &Column, top_n: usize) -> CategoricalSummary {
    let counts = value_counts(column.present());
    let count = counts.iter().map(|vc| vc.count).sum();
    let (mode, mode_frequency) = counts
        .first()
        .map_or((None, 0), |vc| (Some(vc.value.clone()), vc.count));

    CategoricalSummary {
        count,
        mode,
        mode_frequency,
        top_values: counts.into_iter().take(top_n).collect(),
    }
}

/// Count values by their displayed text, most common first; ties keep the
/// order of first appearance.
fn value_counts<'a>(cells: impl Iterator<Item = &'a Cell>) -> Vec<ValueCount> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for cell in cells {
        let value = cell.to_string();
        let entry = counts.entry(value.clone()).or_insert(0);
        if *entry == 0 {
            order.push(value);
        }
        *entry += 1;
    }

    let mut result: Vec<ValueCount> = order
        .into_iter()
        .map(|value| {
            let count = counts[&value];
            ValueCount { value, count }
        })
        .collect();
    // Stable sort keeps first-appearance order among equal counts.
    result.sort_by(|a, b| b.count.cmp(&a.count));
    result
}

/// Most frequent non-missing cell with its frequency; ties resolve to the
/// first seen.
pub(crate) fn mode_of<'a>(cells: impl Iterator<Item = &'a Cell>) -> Option<(&'a Cell, usize)> {
    let mut order: Vec<(CellKey<'a>, &'a Cell)> = Vec::new();
    let mut counts: HashMap<CellKey<'a>, usize> = HashMap::new();
    for cell in cells.filter(|cell| !cell.is_missing()) {
        let key = cell.key();
        let entry = counts.entry(key).or_insert(0);
        if *entry == 0 {
            order.push((key, cell));
        }
        *entry += 1;
    }

    let mut best: Option<(&'a Cell, usize)> = None;
    for (key, cell) in order {
        let count = counts[&key];
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((cell, count));
        }
    }
    best
}

/// Calculate the sample standard deviation of a series.
///
/// `None` for fewer than two values.
pub(crate) fn calculate_std(series: &Series) -> Result<Option<f64>> {
    let n = series.len() as f64;
    if n < 2.0 {
        return Ok(None);
    }
    let mean = series.mean().unwrap_or(0.0);

    let float_series = series.f64()?;
    let variance: f64 = float_series
        .into_iter()
        .filter_map(|v| v.map(|val| (val - mean).powi(2)))
        .sum::<f64>()
        / (n - 1.0);

    Ok(Some(variance.sqrt()))
}

/// Quantile of sorted values with linear interpolation between ranks.
pub(crate) fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Pearson correlation over rows where both values are present.
///
/// `None` with fewer than two complete pairs or when either side is constant.
pub(crate) fn pearson(x: &Column, y: &Column) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = x
        .cells()
        .iter()
        .zip(y.cells())
        .filter_map(|(a, b)| Some((a.as_number()?, b.as_number()?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(a, _)| a).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, b)| b).sum::<f64>() / n;

    let (mut covariance, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((covariance / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}
