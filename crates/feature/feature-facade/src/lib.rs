//! Feature Synthesis Facade
//!
//! Unified re-exports for the feature module:
//! - `feature_spi` - Model types, errors and collaborator traits
//! - `feature_api` - Schema and input-control configuration
//! - `feature_core` - Statistics, synthesis, history store, CSV source
//!
//! # Example
//!
//! ```rust,ignore
//! use feature_facade::prelude::*;
//!
//! let schema = nap_schema_config().to_schema()?;
//! let source = CsvHistorySource::new("naps.csv");
//! let store = HistoryStore::from_source(schema, &source)?;
//! let record = store.synthesize(&UserInput::new()
//!     .with("Hour", 15)
//!     .with("Previous Nap Duration", 90)
//!     .with("Minutes since Previous Nap", 180)
//!     .with("Minutes since Previous Nursing", 60))?;
//! ```

// Re-export everything from core (which includes API and SPI)
pub use feature_core::*;

/// Prelude module for convenient imports
pub mod prelude {
    // Traits
    pub use feature_spi::{HistorySource, Predictor};

    // Model types
    pub use feature_spi::{
        Column, FeatureRecord, FieldSource, FieldSpec, HistoricalDataset, ImputationRule, Schema,
        UserInput, Value, ValueType,
    };

    // Configuration
    pub use feature_api::{
        nap_input_controls, nap_schema_config, InputFieldConfig, SchemaConfig, SchemaConfigBuilder,
    };

    // Error types
    pub use feature_spi::{FeatureError, MismatchKind, Result};

    // Implementations
    pub use feature_core::{
        derive_input_bounds, group_count, group_mean, synthesize, CsvHistorySource,
        FeatureRecordSynthesizer, HistoryStore, ImputedDefaults, InputBounds, Prediction,
        PredictionService,
    };
}
