//! Feature Synthesis Core
//!
//! Implementations behind the feature SPI:
//! - Column statistics (mode, mean, round-half-to-even, bounds)
//! - Derived-field imputation and record synthesis
//! - A reloadable, shareable history store
//! - Group aggregations and input bounds
//! - CSV history loading and the prediction service

mod aggregate;
mod bounds;
mod csv_source;
mod imputation;
mod service;
mod store;
mod synthesizer;

pub mod statistics;

pub use aggregate::{group_count, group_mean, group_stats, GroupStat};
pub use bounds::{derive_input_bounds, InputBounds};
pub use csv_source::CsvHistorySource;
pub use imputation::{impute, ImputedDefaults};
pub use service::{Prediction, PredictionService};
pub use store::{HistorySnapshot, HistoryStore};
pub use synthesizer::{synthesize, FeatureRecordSynthesizer};

// Re-export from API for convenience
pub use feature_api::{
    nap_input_controls, nap_schema_config, FieldConfig, FieldRole, InputFieldConfig, SchemaConfig,
    SchemaConfigBuilder,
};

// Re-export SPI types and traits
pub use feature_spi::{
    Column, FeatureError, FeatureRecord, FieldSource, FieldSpec, HistoricalDataset, HistorySource,
    ImputationRule, MismatchKind, Predictor, Result, Schema, UserInput, Value, ValueType,
};
