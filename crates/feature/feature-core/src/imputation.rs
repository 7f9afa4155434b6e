//! Derived-field imputation from history.

use feature_spi::{
    Column, FeatureError, FieldSpec, HistoricalDataset, ImputationRule, Result, Schema, Value,
    ValueType,
};
use tracing::debug;

use crate::statistics::{mean, mode, round_half_even, to_integer};

/// Compute the backfill value for one derived field.
///
/// Fails with [`FeatureError::InsufficientHistory`] when the column is absent
/// or has no defined values, and with [`FeatureError::ColumnTypeMismatch`]
/// when the column type cannot feed the field.
pub fn impute(field: &FieldSpec, rule: ImputationRule, history: &HistoricalDataset) -> Result<Value> {
    let insufficient = || FeatureError::InsufficientHistory {
        field: field.name.clone(),
    };

    let column = history.column(&field.name).ok_or_else(insufficient)?;
    check_compatible(field, rule, column)?;

    let value = match rule {
        ImputationRule::Mode => {
            let found = if field.value_type == ValueType::Float {
                let widened: Vec<Value> = column
                    .defined()
                    .filter_map(Value::as_f64)
                    .map(Value::Float)
                    .collect();
                mode(&widened)
            } else {
                mode(column.defined())
            };
            found.ok_or_else(insufficient)?
        }
        ImputationRule::Mean => {
            let avg = mean(column.defined()).ok_or_else(insufficient)?;
            match field.value_type {
                ValueType::Integer => Value::Int(to_integer(&field.name, round_half_even(avg))?),
                _ if avg.is_finite() => Value::Float(avg),
                _ => {
                    return Err(FeatureError::InvalidDataset(format!(
                        "mean of '{}' is not finite",
                        field.name
                    )))
                }
            }
        }
    };

    debug!(field = %field.name, ?rule, %value, "imputed derived field");
    Ok(value)
}

fn check_compatible(field: &FieldSpec, rule: ImputationRule, column: &Column) -> Result<()> {
    let actual = column.value_type();
    let ok = match (rule, field.value_type) {
        (ImputationRule::Mean, _) => actual.is_numeric(),
        (ImputationRule::Mode, ValueType::Float) => actual.is_numeric(),
        (ImputationRule::Mode, declared) => actual == declared,
    };
    if ok {
        Ok(())
    } else {
        Err(FeatureError::ColumnTypeMismatch {
            field: field.name.clone(),
            expected: field.value_type,
            actual,
        })
    }
}

/// Precomputed backfill values for every derived field of a schema.
///
/// Computed once per dataset; feeding it to
/// [`FeatureRecordSynthesizer::synthesize_with`](crate::FeatureRecordSynthesizer::synthesize_with)
/// gives the same records as scanning history on every call.
#[derive(Debug, Clone, PartialEq)]
pub struct ImputedDefaults {
    values: Vec<(String, Value)>,
}

impl ImputedDefaults {
    /// Impute every derived field, in schema order. The first failure wins.
    pub fn compute(schema: &Schema, history: &HistoricalDataset) -> Result<Self> {
        let values = schema
            .derived_fields()
            .map(|(field, rule)| Ok((field.name.clone(), impute(field, rule, history)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { values })
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
