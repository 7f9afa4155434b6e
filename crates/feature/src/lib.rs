//! Nap feature synthesis
//!
//! Turns a handful of user-entered values into a complete, model-ready
//! feature record by backfilling every other feature with the mode or mean
//! of its historical column.

pub use feature_facade::*;
