use clap::Args;
use tracing::info;

use cyclewatch_core::{
    Config, DuplicatePolicy, EsStore, EventSource, ExportFormat, FileExportPresenter,
    ForecastTable, MonitorProductionSource, NativeProductionSource, Presenter, PrintPresenter,
    ProductionEventMessage, ProductionQuery, TableProcessor, TimeSelector,
};

use super::{open_store, runtime, Engine};
use crate::common::parse_start_time;

#[derive(Args)]
pub struct TableArgs {
    /// Event-store servers (overrides the config file)
    #[arg(long = "elastic-server")]
    pub elastic_servers: Vec<String>,

    /// System, such as nwp_gfs or nwp_meso_3km
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

    /// Start time: YYYYMMDDHH, YYYYMMDDHH/YYYYMMDDHH or a comma list
    #[arg(long, value_name = "YYYYMMDDHH[/YYYYMMDDHH]")]
    pub start_time: String,

    /// Data source schema
    #[arg(long, value_enum, default_value = "native")]
    pub engine: Engine,

    /// Duplicate-row policy: first, last or all
    #[arg(long, default_value = "first")]
    pub duplicate_policy: String,

    /// Output type: print, csv or json
    #[arg(long, default_value = "print")]
    pub output_type: String,

    /// Output file path (required for csv/json)
    #[arg(long)]
    pub output_file: Option<String>,
}

pub fn run(args: TableArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let store = open_store(&args.elastic_servers, &config)?;
    let selector = parse_start_time(&args.start_time)?;
    let policy: DuplicatePolicy = args.duplicate_policy.parse()?;

    let messages = fetch_production_messages(&store, &args, &config, &selector)?;
    let table = TableProcessor::with_policy(policy).process(&messages);
    info!(rows = table.len(), "table ready");

    present(&table, &args.output_type, args.output_file.as_deref())
}

fn fetch_production_messages(
    store: &EsStore,
    args: &TableArgs,
    config: &Config,
    selector: &TimeSelector,
) -> Result<Vec<ProductionEventMessage>, Box<dyn std::error::Error>> {
    let runtime = runtime()?;
    let messages = match args.engine {
        Engine::Native => {
            let source = NativeProductionSource::new();
            let query = production_query(&source, args, config, selector);
            runtime.block_on(store.search(&source, &query, selector))?
        }
        Engine::Monitor => {
            let source = MonitorProductionSource::new();
            let query = production_query(&source, args, config, selector);
            runtime.block_on(store.search(&source, &query, selector))?
        }
    };
    Ok(messages)
}

pub(super) fn production_query<S: EventSource>(
    source: &S,
    args: &TableArgs,
    config: &Config,
    selector: &TimeSelector,
) -> ProductionQuery {
    let system = source.canonical_system(&args.system);
    info!(system = %system, "resolved system name");
    ProductionQuery {
        system,
        stream: Some(
            args.production_stream
                .clone()
                .unwrap_or_else(|| config.defaults.stream.clone()),
        ),
        production_type: Some(
            args.production_type
                .clone()
                .unwrap_or_else(|| config.defaults.production_type.clone()),
        ),
        production_name: Some(
            args.production_name
                .clone()
                .unwrap_or_else(|| config.defaults.production_name.clone()),
        ),
        start_time: Some(selector.clone()),
        forecast_time: None,
    }
}

fn present(
    table: &ForecastTable,
    output_type: &str,
    output_file: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    match output_type {
        "print" => PrintPresenter::new().present(table)?,
        "csv" | "json" => {
            let format: ExportFormat = output_type.parse()?;
            let path = output_file.ok_or("--output-file is required for csv/json output")?;
            FileExportPresenter::new(format, path).present(table)?;
        }
        other => return Err(format!("output type is not supported: {other}").into()),
    }
    Ok(())
}
