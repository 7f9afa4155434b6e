//! Contract module containing collaborator traits.
//!
//! - [`HistorySource`] - Supplies the historical dataset
//! - [`Predictor`] - Maps a feature record to a prediction

mod history_source;
mod predictor;

pub use history_source::HistorySource;
pub use predictor::Predictor;
