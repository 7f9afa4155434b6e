//! Schema: the ordered field list a prediction model was trained on.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::FeatureError;
use crate::model::ValueType;

/// Statistic used to backfill a derived field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImputationRule {
    /// Most frequent historical value
    Mode,
    /// Arithmetic average of historical values
    Mean,
}

/// Where a field's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldSource {
    /// Supplied by the caller.
    UserProvided,
    /// Backfilled from history.
    Derived(ImputationRule),
}

/// One schema field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub value_type: ValueType,
    pub source: FieldSource,
}

impl FieldSpec {
    pub fn user(name: &str, value_type: ValueType) -> Self {
        Self {
            name: name.to_string(),
            value_type,
            source: FieldSource::UserProvided,
        }
    }

    pub fn mode(name: &str, value_type: ValueType) -> Self {
        Self {
            name: name.to_string(),
            value_type,
            source: FieldSource::Derived(ImputationRule::Mode),
        }
    }

    pub fn mean(name: &str, value_type: ValueType) -> Self {
        Self {
            name: name.to_string(),
            value_type,
            source: FieldSource::Derived(ImputationRule::Mean),
        }
    }

    pub fn is_user_provided(&self) -> bool {
        self.source == FieldSource::UserProvided
    }
}

/// Ordered, validated set of fields.
///
/// Field order is significant: records are emitted in this order.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// Build a schema, rejecting empty field lists, duplicate names and
    /// `mean` on text fields.
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self, FeatureError> {
        if fields.is_empty() {
            return Err(FeatureError::InvalidSchema(
                "schema must declare at least one field".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(FeatureError::InvalidSchema(format!(
                    "duplicate field '{}'",
                    field.name
                )));
            }
            if field.source == FieldSource::Derived(ImputationRule::Mean)
                && !field.value_type.is_numeric()
            {
                return Err(FeatureError::InvalidSchema(format!(
                    "field '{}' uses mean imputation but is declared {}",
                    field.name, field.value_type
                )));
            }
        }

        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn user_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.is_user_provided())
    }

    /// Derived fields paired with their imputation rule.
    pub fn derived_fields(&self) -> impl Iterator<Item = (&FieldSpec, ImputationRule)> {
        self.fields.iter().filter_map(|f| match f.source {
            FieldSource::Derived(rule) => Some((f, rule)),
            FieldSource::UserProvided => None,
        })
    }
}
