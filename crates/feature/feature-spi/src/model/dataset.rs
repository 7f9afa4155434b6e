//! Immutable columnar history.

use std::collections::HashMap;

use crate::error::FeatureError;
use crate::model::{Value, ValueType};

/// A named, single-typed column. `None` marks a missing cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    value_type: ValueType,
    cells: Vec<Option<Value>>,
}

impl Column {
    /// Build a column, checking every defined cell against `value_type`.
    ///
    /// Float NaN cells are stored as missing, `-0.0` as `0.0`.
    pub fn new(
        name: &str,
        value_type: ValueType,
        cells: Vec<Option<Value>>,
    ) -> Result<Self, FeatureError> {
        let mut normalized = Vec::with_capacity(cells.len());
        for (row, cell) in cells.into_iter().enumerate() {
            let cell = match cell {
                Some(Value::Float(v)) if v.is_nan() => None,
                Some(Value::Float(v)) if v == 0.0 => Some(Value::Float(0.0)),
                other => other,
            };
            if let Some(value) = &cell {
                if value.value_type() != value_type {
                    return Err(FeatureError::InvalidDataset(format!(
                        "column '{}' row {}: {} value in {} column",
                        name,
                        row,
                        value.value_type(),
                        value_type
                    )));
                }
            }
            normalized.push(cell);
        }

        Ok(Self {
            name: name.to_string(),
            value_type,
            cells: normalized,
        })
    }

    pub fn integers(name: &str, cells: Vec<Option<i64>>) -> Self {
        Self {
            name: name.to_string(),
            value_type: ValueType::Integer,
            cells: cells.into_iter().map(|c| c.map(Value::Int)).collect(),
        }
    }

    pub fn floats(name: &str, cells: Vec<Option<f64>>) -> Self {
        Self {
            name: name.to_string(),
            value_type: ValueType::Float,
            cells: cells
                .into_iter()
                .map(|c| match c {
                    Some(v) if v.is_nan() => None,
                    Some(v) if v == 0.0 => Some(Value::Float(0.0)),
                    Some(v) => Some(Value::Float(v)),
                    None => None,
                })
                .collect(),
        }
    }

    pub fn texts(name: &str, cells: Vec<Option<&str>>) -> Self {
        Self {
            name: name.to_string(),
            value_type: ValueType::Text,
            cells: cells.into_iter().map(|c| c.map(Value::from)).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn cells(&self) -> &[Option<Value>] {
        &self.cells
    }

    /// Defined (non-missing) values in row order.
    pub fn defined(&self) -> impl Iterator<Item = &Value> {
        self.cells.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Read-only table of historical records.
///
/// Never mutated after construction; share it behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalDataset {
    columns: Vec<Column>,
    index: HashMap<String, usize>,
    row_count: usize,
}

impl HistoricalDataset {
    /// Build from columns of equal length with unique names.
    pub fn new(columns: Vec<Column>) -> Result<Self, FeatureError> {
        let row_count = columns.first().map(Column::len).unwrap_or(0);
        let mut index = HashMap::with_capacity(columns.len());

        for (i, column) in columns.iter().enumerate() {
            if column.len() != row_count {
                return Err(FeatureError::InvalidDataset(format!(
                    "column '{}' has {} rows, expected {}",
                    column.name(),
                    column.len(),
                    row_count
                )));
            }
            if index.insert(column.name().to_string(), i).is_some() {
                return Err(FeatureError::InvalidDataset(format!(
                    "duplicate column '{}'",
                    column.name()
                )));
            }
        }

        Ok(Self {
            columns,
            index,
            row_count,
        })
    }

    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            index: HashMap::new(),
            row_count: 0,
        }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.index.get(name).map(|&i| &self.columns[i])
    }

    /// Like [`column`](Self::column) but reports absence as an error.
    pub fn require(&self, name: &str) -> Result<&Column, FeatureError> {
        self.column(name)
            .ok_or_else(|| FeatureError::ColumnNotFound(name.to_string()))
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Column::name)
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Cell at `(row, column)`; `None` when missing or out of bounds.
    pub fn cell(&self, row: usize, column: &str) -> Option<&Value> {
        self.column(column)
            .and_then(|c| c.cells().get(row))
            .and_then(Option::as_ref)
    }

    /// New dataset holding only the rows where `column` equals `value`.
    ///
    /// Integer cells match float targets with the same numeric value.
    pub fn filter_eq(&self, column: &str, value: &Value) -> Result<Self, FeatureError> {
        let key = self.require(column)?;
        let keep: Vec<bool> = key
            .cells()
            .iter()
            .map(|cell| cell.as_ref().is_some_and(|c| cell_matches(c, value)))
            .collect();

        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                value_type: c.value_type,
                cells: c
                    .cells
                    .iter()
                    .zip(&keep)
                    .filter(|(_, flag)| **flag)
                    .map(|(cell, _)| cell.clone())
                    .collect(),
            })
            .collect();

        Self::new(columns)
    }
}

fn cell_matches(cell: &Value, target: &Value) -> bool {
    match (cell, target) {
        (Value::Text(a), Value::Text(b)) => a == b,
        (Value::Int(a), Value::Int(b)) => a == b,
        (a, b) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> HistoricalDataset {
        HistoricalDataset::new(vec![
            Column::texts("Activity", vec![Some("Sleep"), Some("Feed"), Some("Sleep"), None]),
            Column::integers("Hour", vec![Some(9), Some(10), Some(14), Some(15)]),
            Column::floats("Duration", vec![Some(45.0), None, Some(90.5), Some(f64::NAN)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_dataset_shape() {
        let ds = dataset();
        assert_eq!(ds.row_count(), 4);
        assert_eq!(ds.columns().len(), 3);
        let names: Vec<&str> = ds.column_names().collect();
        assert_eq!(names, vec!["Activity", "Hour", "Duration"]);
    }

    #[test]
    fn test_nan_is_missing() {
        let ds = dataset();
        assert_eq!(ds.cell(3, "Duration"), None);
        assert_eq!(ds.require("Duration").unwrap().defined().count(), 2);
    }

    #[test]
    fn test_ragged_columns_rejected() {
        let result = HistoricalDataset::new(vec![
            Column::integers("a", vec![Some(1), Some(2)]),
            Column::integers("b", vec![Some(1)]),
        ]);
        assert!(matches!(result, Err(FeatureError::InvalidDataset(_))));
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        let result = HistoricalDataset::new(vec![
            Column::integers("a", vec![Some(1)]),
            Column::integers("a", vec![Some(2)]),
        ]);
        assert!(matches!(result, Err(FeatureError::InvalidDataset(msg)) if msg.contains("duplicate")));
    }

    #[test]
    fn test_column_rejects_wrong_cell_type() {
        let result = Column::new("Hour", ValueType::Integer, vec![Some(Value::from("ten"))]);
        assert!(matches!(result, Err(FeatureError::InvalidDataset(_))));
    }

    #[test]
    fn test_require_missing_column() {
        let ds = dataset();
        assert_eq!(
            ds.require("Weekday"),
            Err(FeatureError::ColumnNotFound("Weekday".to_string()))
        );
    }

    #[test]
    fn test_filter_eq_text() {
        let sleeps = dataset().filter_eq("Activity", &Value::from("Sleep")).unwrap();
        assert_eq!(sleeps.row_count(), 2);
        assert_eq!(sleeps.cell(0, "Hour"), Some(&Value::Int(9)));
        assert_eq!(sleeps.cell(1, "Hour"), Some(&Value::Int(14)));
    }

    #[test]
    fn test_filter_eq_numeric_widening() {
        let ds = dataset().filter_eq("Hour", &Value::Float(10.0)).unwrap();
        assert_eq!(ds.row_count(), 1);
        assert_eq!(ds.cell(0, "Activity"), Some(&Value::from("Feed")));
    }

    #[test]
    fn test_empty_dataset() {
        let ds = HistoricalDataset::empty();
        assert!(ds.is_empty());
        assert!(ds.column("x").is_none());
    }
}
