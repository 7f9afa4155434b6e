//! Prediction service: synthesis followed by a model call.

use std::sync::Arc;

use feature_spi::{FeatureError, FeatureRecord, Predictor, Result, UserInput};
use serde::Serialize;
use tracing::debug;

use crate::store::HistoryStore;

/// A prediction together with the record it was made from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub record: FeatureRecord,
    /// Predicted duration in minutes
    pub minutes: f64,
}

impl Prediction {
    /// Minutes truncated toward zero.
    pub fn whole_minutes(&self) -> i64 {
        self.minutes.trunc() as i64
    }
}

/// Couples a history store with a prediction model.
pub struct PredictionService<P: Predictor> {
    store: Arc<HistoryStore>,
    predictor: P,
}

impl<P: Predictor> PredictionService<P> {
    pub fn new(store: Arc<HistoryStore>, predictor: P) -> Self {
        Self { store, predictor }
    }

    pub fn store(&self) -> &Arc<HistoryStore> {
        &self.store
    }

    pub fn predictor(&self) -> &P {
        &self.predictor
    }

    /// Synthesize a record from `input` and run the model on it.
    pub fn predict(&self, input: &UserInput) -> Result<Prediction> {
        let record = self.store.synthesize(input)?;
        let minutes = self.predictor.predict(&record)?;
        if !minutes.is_finite() {
            return Err(FeatureError::Prediction(format!(
                "model '{}' returned {}",
                self.predictor.name(),
                minutes
            )));
        }
        debug!(model = self.predictor.name(), minutes, "prediction made");
        Ok(Prediction { record, minutes })
    }
}
