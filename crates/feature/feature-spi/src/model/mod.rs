//! Data models for feature synthesis.

mod dataset;
mod input;
mod record;
mod schema;
mod value;

pub use dataset::{Column, HistoricalDataset};
pub use input::UserInput;
pub use record::FeatureRecord;
pub use schema::{FieldSource, FieldSpec, ImputationRule, Schema};
pub use value::{Value, ValueType};
