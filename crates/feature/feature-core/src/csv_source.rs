//! CSV history source.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use feature_spi::{Column, FeatureError, HistoricalDataset, HistorySource, Result, Value, ValueType};
use tracing::debug;

/// Loads history from a headered CSV file.
///
/// Columns listed in the type map are parsed as that type; the rest are
/// inferred (integer, then float, then text).
#[derive(Debug, Clone)]
pub struct CsvHistorySource {
    path: PathBuf,
    column_types: HashMap<String, ValueType>,
}

impl CsvHistorySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            column_types: HashMap::new(),
        }
    }

    /// Declare column types, typically the schema's field types.
    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = (S, ValueType)>,
        S: Into<String>,
    {
        self.column_types
            .extend(types.into_iter().map(|(name, ty)| (name.into(), ty)));
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse CSV from any reader.
    pub fn from_reader<R: Read>(
        reader: R,
        column_types: &HashMap<String, ValueType>,
    ) -> Result<HistoricalDataset> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| FeatureError::Csv(e.to_string()))?
            .iter()
            .map(String::from)
            .collect();

        let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for result in reader.records() {
            let record = result.map_err(|e| FeatureError::Csv(e.to_string()))?;
            for (cells, field) in raw.iter_mut().zip(record.iter()) {
                cells.push(field.to_string());
            }
        }

        let columns = headers
            .iter()
            .zip(raw)
            .map(|(name, cells)| {
                let value_type = column_types
                    .get(name)
                    .copied()
                    .unwrap_or_else(|| infer_type(&cells));
                parse_column(name, value_type, &cells)
            })
            .collect::<Result<Vec<_>>>()?;

        let dataset = HistoricalDataset::new(columns)?;
        debug!(
            rows = dataset.row_count(),
            columns = dataset.columns().len(),
            "parsed history CSV"
        );
        Ok(dataset)
    }
}

impl HistorySource for CsvHistorySource {
    fn name(&self) -> &str {
        "csv"
    }

    fn load(&self) -> Result<HistoricalDataset> {
        let file = File::open(&self.path)
            .map_err(|e| FeatureError::Io(format!("{}: {}", self.path.display(), e)))?;
        Self::from_reader(BufReader::new(file), &self.column_types)
    }
}

fn is_missing(raw: &str) -> bool {
    raw.is_empty()
        || ["na", "n/a", "#n/a", "<na>", "nan", "-nan", "null", "none"]
            .iter()
            .any(|token| raw.eq_ignore_ascii_case(token))
}

fn infer_type(cells: &[String]) -> ValueType {
    let mut defined = cells.iter().filter(|c| !is_missing(c)).peekable();
    if defined.peek().is_none() {
        return ValueType::Float;
    }
    let defined: Vec<&String> = defined.collect();
    if defined.iter().all(|c| c.parse::<i64>().is_ok()) {
        ValueType::Integer
    } else if defined.iter().all(|c| c.parse::<f64>().is_ok()) {
        ValueType::Float
    } else {
        ValueType::Text
    }
}

fn parse_column(name: &str, value_type: ValueType, cells: &[String]) -> Result<Column> {
    let parsed = cells
        .iter()
        .enumerate()
        .map(|(row, raw)| {
            if is_missing(raw) {
                return Ok(None);
            }
            parse_cell(raw, value_type)
                .map(Some)
                .ok_or_else(|| FeatureError::Parse {
                    column: name.to_string(),
                    row,
                    value: raw.clone(),
                })
        })
        .collect::<Result<Vec<_>>>()?;
    Column::new(name, value_type, parsed)
}

fn parse_cell(raw: &str, value_type: ValueType) -> Option<Value> {
    match value_type {
        ValueType::Integer => {
            if raw.eq_ignore_ascii_case("true") {
                return Some(Value::Int(1));
            }
            if raw.eq_ignore_ascii_case("false") {
                return Some(Value::Int(0));
            }
            // Integer columns exported next to missing values often read "3.0".
            raw.parse::<i64>().ok().map(Value::Int).or_else(|| {
                raw.parse::<f64>()
                    .ok()
                    .filter(|v| v.fract() == 0.0 && v.abs() < 9.0e15)
                    .map(|v| Value::Int(v as i64))
            })
        }
        ValueType::Float => raw.parse::<f64>().ok().map(Value::Float),
        ValueType::Text => Some(Value::Text(raw.to_string())),
    }
}
