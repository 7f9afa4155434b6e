//! Feature Synthesis Service Provider Interface
//!
//! Defines the shared model types, the error taxonomy and the collaborator
//! contracts for turning sparse user input into complete feature records.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::{HistorySource, Predictor};
pub use error::{FeatureError, MismatchKind};
pub use model::{
    Column, FeatureRecord, FieldSource, FieldSpec, HistoricalDataset, ImputationRule, Schema,
    UserInput, Value, ValueType,
};

/// Result type for feature operations.
pub type Result<T> = std::result::Result<T, FeatureError>;
