//! Feature synthesis error types.

use std::fmt;

use thiserror::Error;

use crate::model::ValueType;

/// How a user input disagrees with the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchKind {
    /// A user-provided field has no value in the input.
    Missing,
    /// The input carries a field the schema does not ask the user for.
    Unexpected,
}

impl fmt::Display for MismatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MismatchKind::Missing => write!(f, "missing from user input"),
            MismatchKind::Unexpected => write!(f, "not a user-provided field"),
        }
    }
}

/// Feature synthesis errors.
///
/// Every variant is a permanent contract violation; nothing here is worth
/// retrying with the same inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    /// User input does not cover exactly the user-provided fields
    #[error("Schema mismatch on field '{field}': {kind}")]
    SchemaMismatch { field: String, kind: MismatchKind },

    /// A derived field has no defined historical values to impute from
    #[error("Insufficient history for field '{field}': no defined values")]
    InsufficientHistory { field: String },

    /// A user-supplied value has the wrong type for its field
    #[error("Invalid value for field '{field}': expected {expected}, got {found}")]
    InvalidValue {
        field: String,
        expected: ValueType,
        found: String,
    },

    /// A history column cannot feed the field's imputation rule
    #[error("Column '{field}' holds {actual} values, field needs {expected}")]
    ColumnTypeMismatch {
        field: String,
        expected: ValueType,
        actual: ValueType,
    },

    /// Column absent from the dataset
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Schema definition is unusable
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// Dataset shape is unusable
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    /// A cell could not be parsed as its column type
    #[error("Parse error in column '{column}' at row {row}: '{value}'")]
    Parse {
        column: String,
        row: usize,
        value: String,
    },

    /// Value outside the input control's bounds
    #[error("Value {value} for field '{field}' is out of range: {reason}")]
    OutOfRange {
        field: String,
        value: f64,
        reason: String,
    },

    /// Prediction collaborator failed
    #[error("Prediction failed: {0}")]
    Prediction(String),

    /// File access failed
    #[error("I/O error: {0}")]
    Io(String),

    /// CSV decoding failed
    #[error("CSV error: {0}")]
    Csv(String),

    /// JSON decoding or encoding failed
    #[error("JSON error: {0}")]
    Json(String),
}

impl From<std::io::Error> for FeatureError {
    fn from(err: std::io::Error) -> Self {
        FeatureError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_mismatch_missing() {
        let error = FeatureError::SchemaMismatch {
            field: "Hour".to_string(),
            kind: MismatchKind::Missing,
        };
        assert_eq!(
            error.to_string(),
            "Schema mismatch on field 'Hour': missing from user input"
        );
    }

    #[test]
    fn test_schema_mismatch_unexpected() {
        let error = FeatureError::SchemaMismatch {
            field: "Caregiver".to_string(),
            kind: MismatchKind::Unexpected,
        };
        assert_eq!(
            error.to_string(),
            "Schema mismatch on field 'Caregiver': not a user-provided field"
        );
    }

    #[test]
    fn test_insufficient_history() {
        let error = FeatureError::InsufficientHistory {
            field: "Nursing Duration".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Insufficient history for field 'Nursing Duration': no defined values"
        );
    }

    #[test]
    fn test_invalid_value() {
        let error = FeatureError::InvalidValue {
            field: "Hour".to_string(),
            expected: ValueType::Integer,
            found: "text".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid value for field 'Hour': expected integer, got text"
        );
    }

    #[test]
    fn test_column_type_mismatch() {
        let error = FeatureError::ColumnTypeMismatch {
            field: "Caregiver".to_string(),
            expected: ValueType::Text,
            actual: ValueType::Float,
        };
        assert_eq!(
            error.to_string(),
            "Column 'Caregiver' holds float values, field needs text"
        );
    }

    #[test]
    fn test_parse_error() {
        let error = FeatureError::Parse {
            column: "Hour".to_string(),
            row: 3,
            value: "noon".to_string(),
        };
        assert_eq!(error.to_string(), "Parse error in column 'Hour' at row 3: 'noon'");
    }

    #[test]
    fn test_out_of_range() {
        let error = FeatureError::OutOfRange {
            field: "Hour".to_string(),
            value: 24.0,
            reason: "above maximum 23".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Value 24 for field 'Hour' is out of range: above maximum 23"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let error: FeatureError = io.into();
        assert!(matches!(error, FeatureError::Io(ref msg) if msg == "gone"));
    }

    #[test]
    fn test_error_is_std_error() {
        let error: Box<dyn std::error::Error + Send + Sync> =
            Box::new(FeatureError::ColumnNotFound("Day".to_string()));
        assert_eq!(error.to_string(), "Column not found: Day");
    }
}
