use clap::Subcommand;
use cyclewatch_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the resolved configuration file path
    Path,
    /// Show the effective configuration
    Show,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Path => {
            println!("{}", Config::path()?.display());
        }
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("{}", toml::to_string_pretty(&config)?);
        }
    }
    Ok(())
}
