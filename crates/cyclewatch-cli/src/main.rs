use clap::{Parser, Subcommand, ValueEnum};

mod commands;
mod common;
mod logging;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Parser)]
#[command(name = "cyclewatch-cli", version, about = "Cyclewatch CLI")]
pub(crate) struct Cli {
    /// Log level (overrides the CYCLEWATCH_LOG environment variable)
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Production events as a table
    Table(commands::table::TableArgs),
    /// Per-day situation report for a workflow node
    Situation(commands::situation::SituationArgs),
    /// Bootstrap standard-time envelopes for a production
    StandardTime(commands::standard_time::StandardTimeArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions(commands::completions::CompletionsArgs),
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.log_level);

    let result = match cli.command {
        Commands::Table(args) => commands::table::run(args),
        Commands::Situation(args) => commands::situation::run(args),
        Commands::StandardTime(args) => commands::standard_time::run(args),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
