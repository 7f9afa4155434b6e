//! Group-by aggregations over history.

use std::cmp::Ordering;

use feature_spi::{FeatureError, HistoricalDataset, Result, Value, ValueType};
use serde::{Deserialize, Serialize};

use crate::statistics::mean;

/// Statistics of one column within one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStat {
    /// Group key
    pub key: Value,
    /// Rows in the group, missing values included
    pub rows: usize,
    /// Defined values of the aggregated column
    pub count: usize,
    /// Mean of the defined values; `None` for text or all-missing groups
    pub mean: Option<f64>,
}

/// Group `dataset` by column `by` and summarize column `of`.
///
/// Rows whose key is missing are dropped; groups come back sorted by key.
pub fn group_stats(dataset: &HistoricalDataset, by: &str, of: &str) -> Result<Vec<GroupStat>> {
    let keys = dataset.require(by)?;
    let values = dataset.require(of)?;

    let mut rows: Vec<(&Value, Option<&Value>)> = keys
        .cells()
        .iter()
        .zip(values.cells())
        .filter_map(|(key, value)| key.as_ref().map(|k| (k, value.as_ref())))
        .collect();
    // Stable sort keeps row order inside each group.
    rows.sort_by(|a, b| a.0.total_cmp(b.0));

    let numeric = values.value_type().is_numeric();
    let stats = rows
        .chunk_by(|a, b| a.0.total_cmp(b.0) == Ordering::Equal)
        .map(|group| {
            let defined: Vec<&Value> = group.iter().filter_map(|(_, v)| *v).collect();
            GroupStat {
                key: group[0].0.clone(),
                rows: group.len(),
                count: defined.len(),
                mean: if numeric { mean(defined) } else { None },
            }
        })
        .collect();

    Ok(stats)
}

/// Mean of `of` per group of `by`. `of` must be numeric.
pub fn group_mean(dataset: &HistoricalDataset, by: &str, of: &str) -> Result<Vec<(Value, Option<f64>)>> {
    let actual = dataset.require(of)?.value_type();
    if !actual.is_numeric() {
        return Err(FeatureError::ColumnTypeMismatch {
            field: of.to_string(),
            expected: ValueType::Float,
            actual,
        });
    }
    Ok(group_stats(dataset, by, of)?
        .into_iter()
        .map(|s| (s.key, s.mean))
        .collect())
}

/// Count of defined `of` values per group of `by`.
pub fn group_count(dataset: &HistoricalDataset, by: &str, of: &str) -> Result<Vec<(Value, usize)>> {
    Ok(group_stats(dataset, by, of)?
        .into_iter()
        .map(|s| (s.key, s.count))
        .collect())
}
