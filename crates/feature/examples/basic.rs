//! Basic example: backfill a nap feature record from in-memory history.
//!
//! Run with: cargo run --example basic -p feature

use feature::prelude::*;

fn main() -> Result<()> {
    println!("=== Feature Synthesis Example ===\n");

    let schema = SchemaConfigBuilder::new()
        .user("Hour", ValueType::Integer)
        .mode("Caregiver", ValueType::Text)
        .mean("nap_duration_roll_count_24_hr", ValueType::Integer)
        .mean("Nursing Duration", ValueType::Float)
        .build_schema()?;

    let history = HistoricalDataset::new(vec![
        Column::texts("Caregiver", vec![Some("Mom"), Some("Mom"), Some("Dad"), None]),
        Column::integers("nap_duration_roll_count_24_hr", vec![Some(2), Some(3), Some(3), Some(4)]),
        Column::floats("Nursing Duration", vec![Some(12.0), Some(18.5), None, Some(9.25)]),
    ])?;

    let synthesizer = FeatureRecordSynthesizer::new(schema);
    let record = synthesizer.synthesize(&history, &UserInput::new().with("Hour", 15))?;

    println!("Synthesized record:");
    for (name, value) in record.iter() {
        println!("  {:<32} {}", name, value);
    }

    let counts = group_count(&history, "Caregiver", "Nursing Duration")?;
    println!("\nNursing entries per caregiver:");
    for (caregiver, count) in counts {
        println!("  {:<8} {}", caregiver, count);
    }

    Ok(())
}
