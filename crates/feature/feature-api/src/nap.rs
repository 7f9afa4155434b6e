//! Stock schema and input controls for the nap-duration model.

use feature_spi::ValueType;

use crate::config::{InputFieldConfig, SchemaConfig, SchemaConfigBuilder};

/// Hour-of-day field name.
pub const HOUR: &str = "Hour";

const PREVIOUS_NAP_DURATION: &str = "Previous Nap Duration";
const MINUTES_SINCE_NAP: &str = "Minutes since Previous Nap";
const MINUTES_SINCE_NURSING: &str = "Minutes since Previous Nursing";

/// The 14 features the nap model was trained on, in training order.
pub fn nap_schema_config() -> SchemaConfig {
    SchemaConfigBuilder::new()
        .mode("Caregiver", ValueType::Text)
        .mode("Year", ValueType::Integer)
        .mode("Quarter", ValueType::Integer)
        .mode("Month", ValueType::Integer)
        .mode("Weekday", ValueType::Integer)
        .mode("Day", ValueType::Integer)
        .user(HOUR, ValueType::Integer)
        .mode("Is_Weekend", ValueType::Integer)
        .user(PREVIOUS_NAP_DURATION, ValueType::Integer)
        .user(MINUTES_SINCE_NAP, ValueType::Integer)
        .mean("nap_duration_roll_count_24_hr", ValueType::Integer)
        .mean("Nursing Duration", ValueType::Float)
        .user(MINUTES_SINCE_NURSING, ValueType::Integer)
        .mode("Count of Feedings since Previous Nap", ValueType::Integer)
        .build()
}

/// Controls for the four user-provided nap features.
pub fn nap_input_controls() -> Vec<InputFieldConfig> {
    vec![
        InputFieldConfig::fixed(
            HOUR,
            "What hour of the day is it? (13 for 1 pm, 14 for 2 pm, ...)",
            0,
            23,
            15,
            1,
        ),
        InputFieldConfig::derived(
            MINUTES_SINCE_NURSING,
            "How many minutes since the last nursing?",
            60,
            10,
        ),
        InputFieldConfig::derived(
            MINUTES_SINCE_NAP,
            "How many minutes since the last nap?",
            180,
            15,
        ),
        InputFieldConfig::derived(
            PREVIOUS_NAP_DURATION,
            "How long was the last nap?",
            90,
            15,
        ),
    ]
}
