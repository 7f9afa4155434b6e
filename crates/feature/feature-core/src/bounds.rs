//! Input bounds for user-provided fields.
//!
//! Bounds are enforced by whoever collects input, before synthesis; the
//! synthesizer itself only checks types.

use feature_api::InputFieldConfig;
use feature_spi::{FeatureError, HistoricalDataset, Result, Value};
use serde::{Deserialize, Serialize};

use crate::statistics::column_bounds;

/// Resolved numeric control for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputBounds {
    pub field: String,
    pub label: String,
    pub min: i64,
    pub max: i64,
    pub default: i64,
    pub step: i64,
}

impl InputBounds {
    /// Accept `value` if it is numeric, within `[min, max]` and a whole
    /// number of steps above `min`.
    pub fn check(&self, value: &Value) -> Result<()> {
        let v = value.as_f64().ok_or_else(|| FeatureError::InvalidValue {
            field: self.field.clone(),
            expected: feature_spi::ValueType::Integer,
            found: value.value_type().to_string(),
        })?;

        let out_of_range = |reason: String| FeatureError::OutOfRange {
            field: self.field.clone(),
            value: v,
            reason,
        };

        if v.is_nan() {
            return Err(out_of_range("not a number".to_string()));
        }
        if v < self.min as f64 {
            return Err(out_of_range(format!("below minimum {}", self.min)));
        }
        if v > self.max as f64 {
            return Err(out_of_range(format!("above maximum {}", self.max)));
        }
        let steps = (v - self.min as f64) / self.step as f64;
        if steps.fract() != 0.0 {
            return Err(out_of_range(format!(
                "not a multiple of {} from {}",
                self.step, self.min
            )));
        }
        Ok(())
    }
}

/// Resolve every control against `dataset`.
///
/// Fixed bounds are used as given. Missing bounds come from the column's
/// defined values, truncated toward zero. The default is clamped into the
/// resolved range.
pub fn derive_input_bounds(
    dataset: &HistoricalDataset,
    controls: &[InputFieldConfig],
) -> Result<Vec<InputBounds>> {
    controls.iter().map(|control| resolve(dataset, control)).collect()
}

fn resolve(dataset: &HistoricalDataset, control: &InputFieldConfig) -> Result<InputBounds> {
    if control.step <= 0 {
        return Err(FeatureError::InvalidSchema(format!(
            "control '{}' needs a positive step, got {}",
            control.field, control.step
        )));
    }

    let (min, max) = match (control.min, control.max) {
        (Some(min), Some(max)) => (min, max),
        (fixed_min, fixed_max) => {
            let (lo, hi) = column_bounds(dataset, &control.field)?;
            (
                fixed_min.unwrap_or(lo.trunc() as i64),
                fixed_max.unwrap_or(hi.trunc() as i64),
            )
        }
    };

    if min > max {
        return Err(FeatureError::InvalidSchema(format!(
            "control '{}' has min {} above max {}",
            control.field, min, max
        )));
    }

    Ok(InputBounds {
        field: control.field.clone(),
        label: control.label.clone(),
        min,
        max,
        default: control.default.clamp(min, max),
        step: control.step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_spi::Column;

    fn dataset() -> HistoricalDataset {
        HistoricalDataset::new(vec![
            Column::floats("Minutes since Previous Nursing", vec![Some(4.9), Some(312.7), None]),
            Column::integers("Previous Nap Duration", vec![Some(20), Some(45), Some(150)]),
            Column::texts("Caregiver", vec![Some("Mom"), None, None]),
        ])
        .unwrap()
    }

    #[test]
    fn test_fixed_bounds_ignore_dataset() {
        let controls = vec![InputFieldConfig::fixed("Hour", "Hour", 0, 23, 15, 1)];
        let bounds = derive_input_bounds(&dataset(), &controls).unwrap();
        assert_eq!((bounds[0].min, bounds[0].max, bounds[0].default), (0, 23, 15));
    }

    #[test]
    fn test_derived_bounds_truncate() {
        let controls = vec![InputFieldConfig::derived("Minutes since Previous Nursing", "Nursed", 60, 10)];
        let bounds = derive_input_bounds(&dataset(), &controls).unwrap();
        assert_eq!((bounds[0].min, bounds[0].max), (4, 312));
    }

    #[test]
    fn test_default_clamped() {
        let controls = vec![InputFieldConfig::derived("Previous Nap Duration", "Last nap", 180, 15)];
        let bounds = derive_input_bounds(&dataset(), &controls).unwrap();
        assert_eq!(bounds[0].default, 150);
    }

    #[test]
    fn test_text_column_rejected() {
        let controls = vec![InputFieldConfig::derived("Caregiver", "Who", 0, 1)];
        assert!(matches!(
            derive_input_bounds(&dataset(), &controls),
            Err(FeatureError::ColumnTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_non_positive_step_rejected() {
        let controls = vec![InputFieldConfig::fixed("Hour", "Hour", 0, 23, 15, 0)];
        assert!(matches!(
            derive_input_bounds(&dataset(), &controls),
            Err(FeatureError::InvalidSchema(_))
        ));
    }

    fn nap_bounds() -> InputBounds {
        InputBounds {
            field: "Previous Nap Duration".to_string(),
            label: "Last nap".to_string(),
            min: 20,
            max: 150,
            default: 90,
            step: 15,
        }
    }

    #[test]
    fn test_check_accepts_grid_values() {
        let b = nap_bounds();
        assert!(b.check(&Value::Int(20)).is_ok());
        assert!(b.check(&Value::Int(95)).is_ok());
        assert!(b.check(&Value::Float(140.0)).is_ok());
    }

    #[test]
    fn test_check_rejects_out_of_range() {
        let b = nap_bounds();
        assert!(matches!(
            b.check(&Value::Int(5)),
            Err(FeatureError::OutOfRange { reason, .. }) if reason == "below minimum 20"
        ));
        assert!(matches!(
            b.check(&Value::Int(155)),
            Err(FeatureError::OutOfRange { reason, .. }) if reason == "above maximum 150"
        ));
    }

    #[test]
    fn test_check_rejects_off_grid() {
        let b = nap_bounds();
        assert!(matches!(b.check(&Value::Int(90)), Err(FeatureError::OutOfRange { .. })));
    }

    #[test]
    fn test_check_rejects_text() {
        let b = nap_bounds();
        assert!(matches!(b.check(&Value::from("long")), Err(FeatureError::InvalidValue { .. })));
    }
}
