//! Shared history with reload.
//!
//! A snapshot pairs a dataset with the derived values computed from it. A
//! reload builds the whole replacement snapshot first and swaps it in under
//! the write lock, so readers never see defaults from one dataset paired with
//! another.

use std::sync::{Arc, PoisonError, RwLock};

use feature_spi::{FeatureRecord, HistoricalDataset, HistorySource, Result, Schema, UserInput};
use tracing::{info, warn};

use crate::imputation::ImputedDefaults;
use crate::synthesizer::FeatureRecordSynthesizer;

/// One published dataset and its precomputed derived values.
#[derive(Debug)]
pub struct HistorySnapshot {
    generation: u64,
    dataset: Arc<HistoricalDataset>,
    defaults: ImputedDefaults,
}

impl HistorySnapshot {
    /// Starts at 1 and increases by one per successful reload.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn dataset(&self) -> &Arc<HistoricalDataset> {
        &self.dataset
    }

    pub fn defaults(&self) -> &ImputedDefaults {
        &self.defaults
    }
}

/// Schema-bound history store shared across callers.
#[derive(Debug)]
pub struct HistoryStore {
    synthesizer: FeatureRecordSynthesizer,
    current: RwLock<Arc<HistorySnapshot>>,
}

impl HistoryStore {
    /// Publish `dataset` as generation 1. Fails if any derived field cannot
    /// be imputed from it.
    pub fn new(schema: Schema, dataset: HistoricalDataset) -> Result<Self> {
        let synthesizer = FeatureRecordSynthesizer::new(schema);
        let defaults = synthesizer.defaults(&dataset)?;
        let snapshot = HistorySnapshot {
            generation: 1,
            dataset: Arc::new(dataset),
            defaults,
        };
        Ok(Self {
            synthesizer,
            current: RwLock::new(Arc::new(snapshot)),
        })
    }

    /// Load the initial dataset from `source`.
    pub fn from_source(schema: Schema, source: &dyn HistorySource) -> Result<Self> {
        let dataset = source.load()?;
        info!(source = source.name(), rows = dataset.row_count(), "history loaded");
        Self::new(schema, dataset)
    }

    pub fn schema(&self) -> &Schema {
        self.synthesizer.schema()
    }

    pub fn synthesizer(&self) -> &FeatureRecordSynthesizer {
        &self.synthesizer
    }

    /// Current snapshot. Holding the `Arc` pins it across a reload.
    pub fn snapshot(&self) -> Arc<HistorySnapshot> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Replace the dataset. On error the previous snapshot stays published.
    pub fn reload(&self, dataset: HistoricalDataset) -> Result<u64> {
        let defaults = match self.synthesizer.defaults(&dataset) {
            Ok(defaults) => defaults,
            Err(err) => {
                warn!(error = %err, "history reload rejected");
                return Err(err);
            }
        };
        let dataset = Arc::new(dataset);

        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let generation = guard.generation + 1;
        *guard = Arc::new(HistorySnapshot {
            generation,
            dataset,
            defaults,
        });
        drop(guard);

        info!(generation, "history reloaded");
        Ok(generation)
    }

    /// Reload from `source`.
    pub fn reload_from(&self, source: &dyn HistorySource) -> Result<u64> {
        let dataset = source.load()?;
        self.reload(dataset)
    }

    /// Synthesize against the current snapshot.
    pub fn synthesize(&self, input: &UserInput) -> Result<FeatureRecord> {
        let snapshot = self.snapshot();
        self.synthesizer.synthesize_with(snapshot.defaults(), input)
    }
}
