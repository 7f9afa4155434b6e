//! Schema and input-control configuration types.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use feature_spi::{FeatureError, FieldSource, FieldSpec, ImputationRule, Result, Schema, ValueType};
use serde::{Deserialize, Serialize};

/// How a configured field is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldRole {
    /// Entered by the user
    User,
    /// Backfilled with the historical mode
    Mode,
    /// Backfilled with the historical mean
    Mean,
}

impl From<FieldRole> for FieldSource {
    fn from(role: FieldRole) -> Self {
        match role {
            FieldRole::User => FieldSource::UserProvided,
            FieldRole::Mode => FieldSource::Derived(ImputationRule::Mode),
            FieldRole::Mean => FieldSource::Derived(ImputationRule::Mean),
        }
    }
}

impl From<FieldSource> for FieldRole {
    fn from(source: FieldSource) -> Self {
        match source {
            FieldSource::UserProvided => FieldRole::User,
            FieldSource::Derived(ImputationRule::Mode) => FieldRole::Mode,
            FieldSource::Derived(ImputationRule::Mean) => FieldRole::Mean,
        }
    }
}

/// One field of a configured schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Column name, exactly as the model was trained on it
    pub name: String,
    /// Declared value type
    #[serde(rename = "type")]
    pub value_type: ValueType,
    /// User-provided or imputed
    pub role: FieldRole,
}

impl FieldConfig {
    pub fn new(name: &str, value_type: ValueType, role: FieldRole) -> Self {
        Self {
            name: name.to_string(),
            value_type,
            role,
        }
    }
}

impl From<&FieldConfig> for FieldSpec {
    fn from(config: &FieldConfig) -> Self {
        FieldSpec {
            name: config.name.clone(),
            value_type: config.value_type,
            source: config.role.into(),
        }
    }
}

/// Serializable schema definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Fields in model order
    pub fields: Vec<FieldConfig>,
}

impl SchemaConfig {
    pub fn new(fields: Vec<FieldConfig>) -> Self {
        Self { fields }
    }

    /// Validate and convert into a [`Schema`].
    pub fn to_schema(&self) -> Result<Schema> {
        Schema::new(self.fields.iter().map(FieldSpec::from).collect())
    }

    /// Describe an existing schema.
    pub fn from_schema(schema: &Schema) -> Self {
        Self {
            fields: schema
                .fields()
                .iter()
                .map(|f| FieldConfig::new(&f.name, f.value_type, f.source.into()))
                .collect(),
        }
    }

    /// Read a schema definition from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| FeatureError::Json(e.to_string()))
    }

    /// Write this definition as pretty-printed JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .map_err(|e| FeatureError::Json(e.to_string()))
    }
}

/// Builder for SchemaConfig.
#[derive(Debug, Default)]
pub struct SchemaConfigBuilder {
    fields: Vec<FieldConfig>,
}

impl SchemaConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user-provided field.
    pub fn user(mut self, name: &str, value_type: ValueType) -> Self {
        self.fields.push(FieldConfig::new(name, value_type, FieldRole::User));
        self
    }

    /// Add a mode-imputed field.
    pub fn mode(mut self, name: &str, value_type: ValueType) -> Self {
        self.fields.push(FieldConfig::new(name, value_type, FieldRole::Mode));
        self
    }

    /// Add a mean-imputed field.
    pub fn mean(mut self, name: &str, value_type: ValueType) -> Self {
        self.fields.push(FieldConfig::new(name, value_type, FieldRole::Mean));
        self
    }

    /// Build the configuration without validating it.
    pub fn build(self) -> SchemaConfig {
        SchemaConfig { fields: self.fields }
    }

    /// Build and validate straight into a [`Schema`].
    pub fn build_schema(self) -> Result<Schema> {
        self.build().to_schema()
    }
}

/// A numeric input control for one user-provided field.
///
/// `min`/`max` left as `None` are derived from the dataset column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputFieldConfig {
    /// Schema field this control fills
    pub field: String,
    /// Prompt shown to the user
    pub label: String,
    /// Fixed lower bound
    #[serde(default)]
    pub min: Option<i64>,
    /// Fixed upper bound
    #[serde(default)]
    pub max: Option<i64>,
    /// Initial value
    pub default: i64,
    /// Increment between accepted values
    pub step: i64,
}

impl InputFieldConfig {
    /// Control whose bounds come from the dataset.
    pub fn derived(field: &str, label: &str, default: i64, step: i64) -> Self {
        Self {
            field: field.to_string(),
            label: label.to_string(),
            min: None,
            max: None,
            default,
            step,
        }
    }

    /// Control with fixed bounds.
    pub fn fixed(field: &str, label: &str, min: i64, max: i64, default: i64, step: i64) -> Self {
        Self {
            field: field.to_string(),
            label: label.to_string(),
            min: Some(min),
            max: Some(max),
            default,
            step,
        }
    }

    pub fn has_fixed_bounds(&self) -> bool {
        self.min.is_some() && self.max.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_builder_preserves_order() {
        let config = SchemaConfigBuilder::new()
            .user("hour", ValueType::Integer)
            .mode("caregiver", ValueType::Text)
            .mean("nap_count", ValueType::Integer)
            .build();

        let names: Vec<&str> = config.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["hour", "caregiver", "nap_count"]);
    }

    #[test]
    fn test_to_schema_maps_roles() {
        let schema = SchemaConfigBuilder::new()
            .user("hour", ValueType::Integer)
            .mean("nap_count", ValueType::Integer)
            .build_schema()
            .unwrap();

        assert_eq!(schema.field("hour").unwrap().source, FieldSource::UserProvided);
        assert_eq!(
            schema.field("nap_count").unwrap().source,
            FieldSource::Derived(ImputationRule::Mean)
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = SchemaConfigBuilder::new()
            .mean("caregiver", ValueType::Text)
            .build_schema();
        assert!(matches!(result, Err(FeatureError::InvalidSchema(_))));
    }

    #[test]
    fn test_json_field_format() {
        let json = r#"{"fields": [
            {"name": "Hour", "type": "integer", "role": "user"},
            {"name": "Caregiver", "type": "text", "role": "mode"},
            {"name": "Nursing Duration", "type": "float", "role": "mean"}
        ]}"#;
        let config: SchemaConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.fields[1], FieldConfig::new("Caregiver", ValueType::Text, FieldRole::Mode));
        assert_eq!(config.to_schema().unwrap().len(), 3);
    }

    #[test]
    fn test_schema_round_trip_through_file() {
        let config = SchemaConfigBuilder::new()
            .user("hour", ValueType::Integer)
            .mode("caregiver", ValueType::Text)
            .build();
        let file = NamedTempFile::new().unwrap();

        config.save_json(file.path()).unwrap();
        let loaded = SchemaConfig::load_json(file.path()).unwrap();

        assert_eq!(loaded, config);
        assert_eq!(SchemaConfig::from_schema(&loaded.to_schema().unwrap()), config);
    }

    #[test]
    fn test_load_json_missing_file() {
        let result = SchemaConfig::load_json(Path::new("/nonexistent/schema.json"));
        assert!(matches!(result, Err(FeatureError::Io(_))));
    }

    #[test]
    fn test_load_json_malformed() {
        let mut file = NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"{\"fields\": 3}").unwrap();
        let result = SchemaConfig::load_json(file.path());
        assert!(matches!(result, Err(FeatureError::Json(_))));
    }

    #[test]
    fn test_input_field_config_bounds() {
        let hour = InputFieldConfig::fixed("Hour", "Hour of day", 0, 23, 15, 1);
        let nap = InputFieldConfig::derived("Previous Nap Duration", "Last nap", 90, 15);
        assert!(hour.has_fixed_bounds());
        assert!(!nap.has_fixed_bounds());
    }

    #[test]
    fn test_input_field_config_json_defaults() {
        let json = r#"{"field": "Hour", "label": "Hour", "default": 15, "step": 1}"#;
        let control: InputFieldConfig = serde_json::from_str(json).unwrap();
        assert_eq!(control.min, None);
        assert_eq!(control.max, None);
    }
}
