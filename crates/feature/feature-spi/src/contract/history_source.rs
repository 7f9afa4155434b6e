//! History source trait definition.

use crate::error::FeatureError;
use crate::model::HistoricalDataset;

/// Result type for history source operations.
pub type Result<T> = std::result::Result<T, FeatureError>;

/// Trait for sources that load the historical dataset.
///
/// Loading happens once at startup (and again on explicit reload); the
/// synthesizer itself never calls a source.
pub trait HistorySource: Send + Sync {
    /// Source name, for logs.
    fn name(&self) -> &str;

    /// Load a complete dataset.
    fn load(&self) -> Result<HistoricalDataset>;
}
