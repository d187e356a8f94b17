pub mod completions;
pub mod config;
pub mod situation;
pub mod standard_time;
pub mod table;

use clap::ValueEnum;
use cyclewatch_core::{Config, EsStore};

/// Which upstream production-event schema to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Engine {
    Native,
    Monitor,
}

/// Build a store from CLI-supplied hosts, falling back to the config file.
pub fn open_store(
    cli_hosts: &[String],
    config: &Config,
) -> Result<EsStore, Box<dyn std::error::Error>> {
    let hosts: &[String] = if cli_hosts.is_empty() {
        &config.store.hosts
    } else {
        cli_hosts
    };
    if hosts.is_empty() {
        return Err("no store hosts given; pass --elastic-server or set [store] hosts".into());
    }
    Ok(EsStore::new(hosts)?.with_page_size(config.store.page_size))
}

/// Single-use runtime for the async store calls.
pub fn runtime() -> Result<tokio::runtime::Runtime, Box<dyn std::error::Error>> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}
