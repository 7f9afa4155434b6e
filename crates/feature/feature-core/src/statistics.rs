//! Column statistics used for imputation and input bounds.

use std::cmp::Ordering;

use feature_spi::{FeatureError, HistoricalDataset, Result, Value};

/// Most frequent value; ties go to the value that sorts first under
/// [`Value::total_cmp`]. `None` for an empty input.
pub fn mode<'a, I>(values: I) -> Option<Value>
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut sorted: Vec<&Value> = values.into_iter().collect();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mut best: Option<(&Value, usize)> = None;
    for run in sorted.chunk_by(|a, b| a.total_cmp(b) == Ordering::Equal) {
        // Strictly greater: the earliest (smallest) run keeps a tie.
        if best.map_or(true, |(_, count)| run.len() > count) {
            best = Some((run[0], run.len()));
        }
    }
    best.map(|(value, _)| value.clone())
}

/// Arithmetic mean of the numeric values; text is ignored.
pub fn mean<'a, I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a Value>,
{
    let (sum, count) = values
        .into_iter()
        .filter_map(Value::as_f64)
        .fold((0.0_f64, 0_usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Round to the nearest integer, ties to even (banker's rounding).
///
/// `10.5 -> 10`, `11.5 -> 12`, `-2.5 -> -2`.
pub fn round_half_even(value: f64) -> f64 {
    value.round_ties_even()
}

/// Convert an already-rounded float into an `i64`, rejecting values that
/// would saturate.
pub fn to_integer(field: &str, value: f64) -> Result<i64> {
    // 2^63 is exactly representable; anything at or above it overflows.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if !value.is_finite() || value >= LIMIT || value < -LIMIT {
        return Err(FeatureError::InvalidDataset(format!(
            "value {} for '{}' does not fit an integer",
            value, field
        )));
    }
    Ok(value as i64)
}

/// Minimum and maximum of the defined numeric values in a column.
pub fn column_bounds(dataset: &HistoricalDataset, name: &str) -> Result<(f64, f64)> {
    let column = dataset.require(name)?;
    if !column.value_type().is_numeric() {
        return Err(FeatureError::ColumnTypeMismatch {
            field: name.to_string(),
            expected: feature_spi::ValueType::Float,
            actual: column.value_type(),
        });
    }

    column
        .defined()
        .filter_map(Value::as_f64)
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
        .ok_or_else(|| FeatureError::InsufficientHistory {
            field: name.to_string(),
        })
}
