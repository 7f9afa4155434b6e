//! Single-row feature record synthesis.
//!
//! User-provided fields are copied verbatim; derived fields are backfilled
//! from history with the mode or mean of their column. The result is a pure
//! function of the schema, the history and the input.

use std::sync::Arc;

use feature_spi::{
    FeatureError, FeatureRecord, FieldSource, FieldSpec, HistoricalDataset, ImputationRule,
    MismatchKind, Result, Schema, UserInput, Value, ValueType,
};

use crate::imputation::{impute, ImputedDefaults};

/// Assemble one complete record from `history` and `input`.
///
/// Checks run in a fixed order and the first violation is returned:
/// missing user fields (schema order), unexpected input fields (sorted),
/// user value types (schema order), then derived fields (schema order).
pub fn synthesize(schema: &Schema, history: &HistoricalDataset, input: &UserInput) -> Result<FeatureRecord> {
    assemble(schema, input, |field, rule| impute(field, rule, history))
}

/// Synthesizer bound to one schema.
#[derive(Debug, Clone)]
pub struct FeatureRecordSynthesizer {
    schema: Arc<Schema>,
}

impl FeatureRecordSynthesizer {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema: Arc::new(schema),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Scan `history` for every derived field.
    pub fn synthesize(&self, history: &HistoricalDataset, input: &UserInput) -> Result<FeatureRecord> {
        synthesize(&self.schema, history, input)
    }

    /// Use precomputed derived values instead of scanning history.
    pub fn synthesize_with(&self, defaults: &ImputedDefaults, input: &UserInput) -> Result<FeatureRecord> {
        assemble(&self.schema, input, |field, _| {
            defaults
                .get(&field.name)
                .cloned()
                .ok_or_else(|| FeatureError::InsufficientHistory {
                    field: field.name.clone(),
                })
        })
    }

    /// Impute every derived field of this schema from `history`.
    pub fn defaults(&self, history: &HistoricalDataset) -> Result<ImputedDefaults> {
        ImputedDefaults::compute(&self.schema, history)
    }
}

fn assemble<F>(schema: &Schema, input: &UserInput, mut derive: F) -> Result<FeatureRecord>
where
    F: FnMut(&FieldSpec, ImputationRule) -> Result<Value>,
{
    check_coverage(schema, input)?;

    let user_values = schema
        .user_fields()
        .map(|field| {
            // Coverage was checked above.
            let value = input.get(&field.name).ok_or_else(|| FeatureError::SchemaMismatch {
                field: field.name.clone(),
                kind: MismatchKind::Missing,
            })?;
            accept_user_value(field, value)
        })
        .collect::<Result<Vec<_>>>()?;
    let mut user_values = user_values.into_iter();

    let mut fields = Vec::with_capacity(schema.len());
    for field in schema.fields() {
        let value = match field.source {
            FieldSource::UserProvided => match user_values.next() {
                Some(value) => value,
                None => {
                    return Err(FeatureError::SchemaMismatch {
                        field: field.name.clone(),
                        kind: MismatchKind::Missing,
                    })
                }
            },
            FieldSource::Derived(rule) => derive(field, rule)?,
        };
        fields.push((field.name.clone(), value));
    }

    Ok(FeatureRecord::from_fields(fields))
}

fn check_coverage(schema: &Schema, input: &UserInput) -> Result<()> {
    if let Some(field) = schema.user_fields().find(|f| !input.contains(&f.name)) {
        return Err(FeatureError::SchemaMismatch {
            field: field.name.clone(),
            kind: MismatchKind::Missing,
        });
    }

    let unexpected = input
        .names()
        .find(|name| !schema.field(name).is_some_and(FieldSpec::is_user_provided));
    if let Some(name) = unexpected {
        return Err(FeatureError::SchemaMismatch {
            field: name.to_string(),
            kind: MismatchKind::Unexpected,
        });
    }

    Ok(())
}

/// Type check only; integers widen into float fields, nothing else converts.
fn accept_user_value(field: &FieldSpec, value: &Value) -> Result<Value> {
    match (field.value_type, value) {
        (ValueType::Integer, Value::Int(_)) | (ValueType::Text, Value::Text(_)) => Ok(value.clone()),
        (ValueType::Float, Value::Float(v)) if v.is_finite() => Ok(value.clone()),
        (ValueType::Float, Value::Int(v)) => Ok(Value::Float(*v as f64)),
        _ => Err(FeatureError::InvalidValue {
            field: field.name.clone(),
            expected: field.value_type,
            found: match value {
                Value::Float(v) if !v.is_finite() => "non-finite float".to_string(),
                other => other.value_type().to_string(),
            },
        }),
    }
}
