//! Prediction collaborator trait.

use crate::error::FeatureError;
use crate::model::FeatureRecord;

/// Result type for predictor operations.
pub type Result<T> = std::result::Result<T, FeatureError>;

/// Black-box model mapping one feature record to a duration in minutes.
///
/// Implementations report their own failures as
/// [`FeatureError::Prediction`].
pub trait Predictor: Send + Sync {
    /// Model name, for logs.
    fn name(&self) -> &str;

    /// Predict a single value for `record`.
    fn predict(&self, record: &FeatureRecord) -> Result<f64>;
}
