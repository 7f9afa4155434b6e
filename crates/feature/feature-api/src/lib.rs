//! Feature Synthesis Consumer API
//!
//! Configuration types for consumers: serializable schema definitions,
//! input-control descriptions and the stock nap-duration tables.

mod config;
mod nap;

pub use config::{FieldConfig, FieldRole, InputFieldConfig, SchemaConfig, SchemaConfigBuilder};
pub use nap::{nap_input_controls, nap_schema_config, HOUR};

// Re-export SPI types
pub use feature_spi::{
    FeatureError, FieldSource, FieldSpec, ImputationRule, Result, Schema, ValueType,
};
