use clap::Args;
use tracing::info;

use cyclewatch_core::{
    Config, SchedulerClientQuery, SchedulerClientSource, SituationCalculator, SituationResult,
};

use super::{open_store, runtime};
use crate::common::{parse_run_date_range, run_date_selector};

#[derive(Args)]
pub struct SituationArgs {
    /// Event-store servers (overrides the config file)
    #[arg(long = "elastic-server")]
    pub elastic_servers: Vec<String>,

    /// Workflow node path, such as /model/forecast
    #[arg(long)]
    pub node_path: String,

    /// Half-open run-date range
    #[arg(long, value_name = "YYYYMMDD/YYYYMMDD")]
    pub run_date: String,

    /// Restrict to one scheduler host
    #[arg(long)]
    pub host: Option<String>,

    /// Restrict to one scheduler port
    #[arg(long)]
    pub port: Option<String>,

    /// Output type: text or json
    #[arg(long, default_value = "text")]
    pub output_type: String,
}

pub fn run(args: SituationArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let store = open_store(&args.elastic_servers, &config)?;
    let (start_date, end_date) = parse_run_date_range(&args.run_date)?;
    let selector = run_date_selector(start_date, end_date);

    let source = SchedulerClientSource::new();
    let query = SchedulerClientQuery {
        node_path: args.node_path.clone(),
        host: args.host.clone(),
        port: args.port.clone(),
        run_date: Some(selector.clone()),
    };
    let messages = runtime()?.block_on(store.search(&source, &query, &selector))?;
    info!(count = messages.len(), "retrieved scheduler messages");

    let results =
        SituationCalculator::new().compute(&messages, &args.node_path, start_date, end_date)?;

    match args.output_type.as_str() {
        "text" => print_text(&args.node_path, &results),
        "json" => println!("{}", serde_json::to_string_pretty(&results)?),
        other => return Err(format!("output type is not supported: {other}").into()),
    }
    Ok(())
}

fn print_text(node_path: &str, results: &[SituationResult]) {
    println!("Situations for {node_path}:");
    for result in results {
        println!("{}  {}", result.date.format("%Y%m%d"), result.situation.as_str());
        for period in &result.timeline.periods {
            let duration = period.end_time - period.start_time;
            println!(
                "    {:?}: {} -> {} ({}s)",
                period.kind,
                period.start_time.format("%H:%M:%S"),
                period.end_time.format("%H:%M:%S"),
                duration.num_seconds(),
            );
        }
    }
}
