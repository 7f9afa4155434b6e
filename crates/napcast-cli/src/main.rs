//! # napcast
//!
//! Command-line front end for nap feature synthesis: collects user inputs,
//! checks them against their input controls, backfills the remaining
//! features from a history CSV and prints the resulting record.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use feature::{
    derive_input_bounds, group_count, group_mean, nap_input_controls, nap_schema_config,
    CsvHistorySource, HistoricalDataset, HistorySource, HistoryStore, InputBounds,
    InputFieldConfig, SchemaConfig, UserInput, Value,
};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "napcast")]
#[command(about = "Backfill nap features from history for model input", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build one complete feature record from a few inputs
    Synthesize {
        /// History CSV file
        #[arg(long, env = "NAPCAST_HISTORY")]
        history: PathBuf,

        /// Schema JSON file (default: stock nap schema)
        #[arg(long)]
        schema: Option<PathBuf>,

        /// Input controls JSON file (default: stock nap controls)
        #[arg(long)]
        controls: Option<PathBuf>,

        /// User-provided value, NAME=VALUE (repeatable)
        #[arg(short, long = "set", value_parser = parse_assignment)]
        set: Vec<(String, String)>,

        /// Output file (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the input controls with bounds resolved from history
    Bounds {
        /// History CSV file
        #[arg(long, env = "NAPCAST_HISTORY")]
        history: PathBuf,

        /// Input controls JSON file (default: stock nap controls)
        #[arg(long)]
        controls: Option<PathBuf>,
    },

    /// Aggregate one column per value of another
    Group {
        /// History CSV file
        #[arg(long, env = "NAPCAST_HISTORY")]
        history: PathBuf,

        /// Column to group by
        #[arg(long)]
        by: String,

        /// Column to aggregate
        #[arg(long)]
        of: String,

        /// Statistic to report
        #[arg(long, value_enum, default_value = "mean")]
        stat: Stat,

        /// Keep only rows where COLUMN=VALUE
        #[arg(long = "where", value_parser = parse_assignment)]
        filter: Option<(String, String)>,
    },

    /// Write the stock nap schema as JSON
    Schema {
        /// Output file (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Stat {
    Mean,
    Count,
}

/// Split `NAME=VALUE` at the first `=`.
fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty name in '{}'", s));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

/// Integer if it parses as one, then float, else text.
fn parse_value(raw: &str) -> Value {
    if let Ok(v) = raw.parse::<i64>() {
        Value::Int(v)
    } else if let Ok(v) = raw.parse::<f64>() {
        Value::Float(v)
    } else {
        Value::Text(raw.to_string())
    }
}

fn load_schema_config(path: Option<&Path>) -> anyhow::Result<SchemaConfig> {
    match path {
        Some(path) => SchemaConfig::load_json(path)
            .with_context(|| format!("Failed to load schema {:?}", path)),
        None => Ok(nap_schema_config()),
    }
}

fn load_controls(path: Option<&Path>) -> anyhow::Result<Vec<InputFieldConfig>> {
    match path {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("Failed to parse controls {:?}", path))
        }
        None => Ok(nap_input_controls()),
    }
}

fn history_source(path: &Path, schema: &SchemaConfig) -> CsvHistorySource {
    CsvHistorySource::new(path).with_types(
        schema
            .fields
            .iter()
            .map(|f| (f.name.clone(), f.value_type)),
    )
}

fn load_history(path: &Path) -> anyhow::Result<HistoricalDataset> {
    history_source(path, &nap_schema_config())
        .load()
        .with_context(|| format!("Failed to load history {:?}", path))
}

/// Merge explicit assignments over control defaults. Assigned values are
/// checked against their control's bounds.
fn collect_input(bounds: &[InputBounds], assignments: &[(String, String)]) -> anyhow::Result<UserInput> {
    let mut input = UserInput::new();

    for b in bounds {
        input.insert(&b.field, b.default);
    }
    for (name, raw) in assignments {
        let value = parse_value(raw);
        if let Some(b) = bounds.iter().find(|b| &b.field == name) {
            b.check(&value)
                .with_context(|| format!("Rejected input for '{}'", b.label))?;
        }
        input.insert(name, value);
    }

    Ok(input)
}

/// Write JSON to a file or stdout.
fn emit_json<T: Serialize>(value: &T, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
            info!(path = %path.display(), "output written");
        }
        None => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

fn run_synthesize(
    history: &Path,
    schema: Option<&Path>,
    controls: Option<&Path>,
    set: &[(String, String)],
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let config = load_schema_config(schema)?;
    let source = history_source(history, &config);
    let store = HistoryStore::from_source(config.to_schema()?, &source)
        .with_context(|| format!("Failed to prepare history from {:?}", history))?;

    // Controls only apply to fields the schema asks the user for.
    let controls: Vec<InputFieldConfig> = load_controls(controls)?
        .into_iter()
        .filter(|c| store.schema().field(&c.field).is_some_and(|f| f.is_user_provided()))
        .collect();
    let bounds = derive_input_bounds(store.snapshot().dataset(), &controls)?;

    let input = collect_input(&bounds, set)?;
    debug!(fields = input.len(), "user input collected");

    let record = store.synthesize(&input)?;
    emit_json(&record, output)
}

fn run_bounds(history: &Path, controls: Option<&Path>) -> anyhow::Result<()> {
    let dataset = load_history(history)?;
    let bounds = derive_input_bounds(&dataset, &load_controls(controls)?)?;
    emit_json(&bounds, None)
}

fn run_group(
    history: &Path,
    by: &str,
    of: &str,
    stat: Stat,
    filter: Option<&(String, String)>,
) -> anyhow::Result<()> {
    let mut dataset = load_history(history)?;
    if let Some((column, raw)) = filter {
        dataset = dataset.filter_eq(column, &parse_value(raw))?;
        info!(column = %column, rows = dataset.row_count(), "rows filtered");
    }

    println!("{:<24} {}", by, of);
    match stat {
        Stat::Count => {
            for (key, count) in group_count(&dataset, by, of)? {
                println!("{:<24} {}", key.to_string(), count);
            }
        }
        Stat::Mean => {
            for (key, mean) in group_mean(&dataset, by, of)? {
                match mean {
                    Some(m) => println!("{:<24} {:.2}", key.to_string(), m),
                    None => println!("{:<24} -", key.to_string()),
                }
            }
        }
    }
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "napcast=info,feature_core=info".into()),
        )
        .init();
}

fn main() -> anyhow::Result<()> {
    // Load .env file (optional - won't fail if missing)
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Synthesize {
            history,
            schema,
            controls,
            set,
            output,
        } => run_synthesize(
            &history,
            schema.as_deref(),
            controls.as_deref(),
            &set,
            output.as_deref(),
        ),

        Commands::Bounds { history, controls } => run_bounds(&history, controls.as_deref()),

        Commands::Group {
            history,
            by,
            of,
            stat,
            filter,
        } => run_group(&history, &by, &of, stat, filter.as_ref()),

        Commands::Schema { output } => emit_json(&nap_schema_config(), output.as_deref()),
    }
}
