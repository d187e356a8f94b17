use clap::Args;
use tracing::info;

use cyclewatch_core::processor::{StandardTimeConfig, StandardTimeProcessor, StartHourSpec};
use cyclewatch_core::{
    Config, DuplicatePolicy, MonitorProductionSource, NativeProductionSource, StandardTimeMessage,
    TableProcessor,
};

use super::table::{production_query, TableArgs};
use super::{open_store, runtime, Engine};
use crate::common::parse_start_time;

#[derive(Args)]
pub struct StandardTimeArgs {
    /// Event-store servers (overrides the config file)
    #[arg(long = "elastic-server")]
    pub elastic_servers: Vec<String>,

    /// System, such as nwp_gfs
    #[arg(long)]
    pub system: String,

    /// Production stream, such as oper
    #[arg(long)]
    pub production_stream: Option<String>,

    /// Production type, such as grib2
    #[arg(long)]
    pub production_type: Option<String>,

    /// Production name, such as orig
    #[arg(long)]
    pub production_name: Option<String>,

    /// Start time range to sample history from
    #[arg(long, value_name = "YYYYMMDDHH/YYYYMMDDHH")]
    pub start_time: String,

    /// Data source schema
    #[arg(long, value_enum, default_value = "native")]
    pub engine: Engine,

    /// Cycle start hours, comma-separated (e.g. "00,12")
    #[arg(long, default_value = "00,12")]
    pub start_hours: String,

    /// Forecast hours, comma-separated (e.g. "0,3,6")
    #[arg(long)]
    pub forecast_hours: String,

    /// Bootstrap resampling rounds
    #[arg(long, default_value_t = 1000)]
    pub bootstrap_count: usize,

    /// Clocks drawn per round
    #[arg(long, default_value_t = 10)]
    pub bootstrap_sample: usize,

    /// Confidence interval size
    #[arg(long, default_value_t = 0.99)]
    pub quantile: f64,

    /// Fixed RNG seed for reproducible envelopes
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn run(args: StandardTimeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let store = open_store(&args.elastic_servers, &config)?;
    let selector = parse_start_time(&args.start_time)?;
    let forecast_hours = parse_hour_list(&args.forecast_hours)?;
    let start_hours: Vec<StartHourSpec> = args
        .start_hours
        .split(',')
        .map(|start_hour| StartHourSpec {
            start_hour: start_hour.trim().to_string(),
            forecast_hours: forecast_hours.clone(),
        })
        .collect();
    let processor = StandardTimeProcessor::new(StandardTimeConfig {
        start_hours,
        bootstrap_count: args.bootstrap_count,
        bootstrap_sample: args.bootstrap_sample,
        quantile: args.quantile,
        seed: args.seed,
    })?;

    // Reuse the table query surface; both commands retrieve the same events.
    let table_args = TableArgs {
        elastic_servers: args.elastic_servers.clone(),
        system: args.system.clone(),
        production_stream: args.production_stream.clone(),
        production_type: args.production_type.clone(),
        production_name: args.production_name.clone(),
        start_time: args.start_time.clone(),
        engine: args.engine,
        duplicate_policy: "first".to_string(),
        output_type: "print".to_string(),
        output_file: None,
    };
    let runtime = runtime()?;
    let (system, messages) = match args.engine {
        Engine::Native => {
            let source = NativeProductionSource::new();
            let query = production_query(&source, &table_args, &config, &selector);
            (
                query.system.clone(),
                runtime.block_on(store.search(&source, &query, &selector))?,
            )
        }
        Engine::Monitor => {
            let source = MonitorProductionSource::new();
            let query = production_query(&source, &table_args, &config, &selector);
            (
                query.system.clone(),
                runtime.block_on(store.search(&source, &query, &selector))?,
            )
        }
    };
    info!(count = messages.len(), "retrieved production messages");

    let table = TableProcessor::with_policy(DuplicatePolicy::KeepAll).process(&messages);
    let message = StandardTimeMessage {
        system,
        stream: args
            .production_stream
            .unwrap_or_else(|| config.defaults.stream.clone()),
        production_type: args
            .production_type
            .unwrap_or_else(|| config.defaults.production_type.clone()),
        production_name: args
            .production_name
            .unwrap_or_else(|| config.defaults.production_name.clone()),
        start_hours: processor.process(&table),
    };
    println!("{}", serde_json::to_string_pretty(&message)?);
    Ok(())
}

fn parse_hour_list(raw: &str) -> Result<Vec<i64>, Box<dyn std::error::Error>> {
    raw.split(',')
        .map(|token| {
            token
                .trim()
                .parse::<i64>()
                .map_err(|_| format!("invalid forecast hour '{token}'").into())
        })
        .collect()
}
