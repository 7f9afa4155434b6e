//! Error module containing feature synthesis error types.

mod feature_error;

pub use feature_error::{FeatureError, MismatchKind};
