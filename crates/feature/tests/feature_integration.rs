//! Integration tests for the feature crate

use feature::{
    derive_input_bounds, group_mean, nap_input_controls, nap_schema_config, synthesize, Column,
    CsvHistorySource, FeatureError, FeatureRecordSynthesizer, FieldSpec, HistoricalDataset,
    HistorySource, MismatchKind, Schema, UserInput, Value, ValueType,
};

fn scenario_schema() -> Schema {
    Schema::new(vec![
        FieldSpec::user("hour", ValueType::Integer),
        FieldSpec::mode("caregiver", ValueType::Text),
        FieldSpec::mean("nap_count", ValueType::Integer),
    ])
    .unwrap()
}

fn scenario_history() -> HistoricalDataset {
    HistoricalDataset::new(vec![
        Column::texts("caregiver", vec![Some("Mom"), Some("Mom"), Some("Dad"), None]),
        Column::integers("nap_count", vec![Some(2), Some(3), Some(3), Some(4)]),
    ])
    .unwrap()
}

#[test]
fn test_scenario_from_description() {
    let record = synthesize(&scenario_schema(), &scenario_history(), &UserInput::new().with("hour", 14)).unwrap();

    assert_eq!(record.len(), 3);
    assert_eq!(record.get("hour"), Some(&Value::Int(14)));
    assert_eq!(record.get("caregiver"), Some(&Value::from("Mom")));
    assert_eq!(record.get("nap_count"), Some(&Value::Int(3)));
}

#[test]
fn test_mode_tie_resolves_to_lowest() {
    let schema = Schema::new(vec![FieldSpec::mode("day", ValueType::Integer)]).unwrap();
    let history = HistoricalDataset::new(vec![Column::integers(
        "day",
        vec![Some(3), Some(3), Some(5), Some(5), Some(1)],
    )])
    .unwrap();

    let record = synthesize(&schema, &history, &UserInput::new()).unwrap();
    assert_eq!(record.get("day"), Some(&Value::Int(3)));
}

#[test]
fn test_integer_mean_unambiguous() {
    let schema = Schema::new(vec![FieldSpec::mean("n", ValueType::Integer)]).unwrap();
    let history = HistoricalDataset::new(vec![Column::integers("n", vec![Some(10), Some(20)])]).unwrap();

    let record = synthesize(&schema, &history, &UserInput::new()).unwrap();
    assert_eq!(record.get("n"), Some(&Value::Int(15)));
}

#[test]
fn test_integer_mean_half_rounds_to_even() {
    let schema = Schema::new(vec![FieldSpec::mean("n", ValueType::Integer)]).unwrap();
    let history = HistoricalDataset::new(vec![Column::integers("n", vec![Some(10), Some(11)])]).unwrap();

    let record = synthesize(&schema, &history, &UserInput::new()).unwrap();
    assert_eq!(record.get("n"), Some(&Value::Int(10)));
}

#[test]
fn test_record_field_set_equals_schema() {
    let schema = nap_schema_config().to_schema().unwrap();
    let history = HistoricalDataset::new(
        schema
            .fields()
            .iter()
            .filter(|f| !f.is_user_provided())
            .map(|f| match f.value_type {
                ValueType::Text => Column::texts(&f.name, vec![Some("Mom"), Some("Dad"), Some("Mom")]),
                ValueType::Integer => Column::integers(&f.name, vec![Some(1), Some(2), Some(2)]),
                ValueType::Float => Column::floats(&f.name, vec![Some(1.5), Some(2.5), None]),
            })
            .collect(),
    )
    .unwrap();
    let input = UserInput::new()
        .with("Hour", 15)
        .with("Previous Nap Duration", 90)
        .with("Minutes since Previous Nap", 180)
        .with("Minutes since Previous Nursing", 60);

    let record = synthesize(&schema, &history, &input).unwrap();

    let got: Vec<&str> = record.field_names().collect();
    let want: Vec<&str> = schema.field_names().collect();
    assert_eq!(got, want);
    assert_eq!(record.get("Nursing Duration"), Some(&Value::Float(2.0)));
    assert_eq!(record.get("nap_duration_roll_count_24_hr"), Some(&Value::Int(2)));
}

#[test]
fn test_missing_user_field_is_schema_mismatch() {
    let result = synthesize(&scenario_schema(), &scenario_history(), &UserInput::new());
    assert!(matches!(
        result,
        Err(FeatureError::SchemaMismatch { field, kind: MismatchKind::Missing }) if field == "hour"
    ));
}

#[test]
fn test_empty_derived_column_is_insufficient_history() {
    let history = HistoricalDataset::new(vec![
        Column::texts("caregiver", vec![None, None]),
        Column::integers("nap_count", vec![Some(2), Some(4)]),
    ])
    .unwrap();

    let result = synthesize(&scenario_schema(), &history, &UserInput::new().with("hour", 14));
    assert_eq!(
        result,
        Err(FeatureError::InsufficientHistory { field: "caregiver".to_string() })
    );
}

#[test]
fn test_synthesizer_shares_across_threads() {
    use std::sync::Arc;

    let synth = Arc::new(FeatureRecordSynthesizer::new(scenario_schema()));
    let history = Arc::new(scenario_history());

    let handles: Vec<_> = (0..4)
        .map(|hour| {
            let synth = Arc::clone(&synth);
            let history = Arc::clone(&history);
            std::thread::spawn(move || synth.synthesize(&history, &UserInput::new().with("hour", hour)))
        })
        .collect();

    for (hour, handle) in handles.into_iter().enumerate() {
        let record = handle.join().unwrap().unwrap();
        assert_eq!(record.get("hour"), Some(&Value::Int(hour as i64)));
        assert_eq!(record.get("caregiver"), Some(&Value::from("Mom")));
    }
}

#[test]
fn test_bounds_and_groups_from_csv() {
    let csv = "\
Hour,Nap Duration,Minutes since Previous Nursing,Minutes since Previous Nap,Previous Nap Duration
14,60,25,120,45
9,30,10.5,95,30
14,90,240,300,150
";
    let history = CsvHistorySource::from_reader(csv.as_bytes(), &Default::default()).unwrap();

    let bounds = derive_input_bounds(&history, &nap_input_controls()).unwrap();
    let nursing = bounds
        .iter()
        .find(|b| b.field == "Minutes since Previous Nursing")
        .unwrap();
    assert_eq!((nursing.min, nursing.max, nursing.default), (10, 240, 60));

    let means = group_mean(&history, "Hour", "Nap Duration").unwrap();
    assert_eq!(means, vec![(Value::Int(9), Some(30.0)), (Value::Int(14), Some(75.0))]);
}

#[test]
fn test_csv_source_as_trait_object() {
    let source: Box<dyn HistorySource> = Box::new(CsvHistorySource::new("/nonexistent/history.csv"));
    assert!(matches!(source.load(), Err(FeatureError::Io(_))));
}
