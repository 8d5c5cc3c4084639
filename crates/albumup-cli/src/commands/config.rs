use std::process::ExitCode;

use albumup_core::config::AlbumupConfig;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Initialize ~/.albumup/ with a default config
    Init,
    /// Show current configuration
    Show,
}

pub fn run(action: ConfigAction) -> anyhow::Result<ExitCode> {
    match action {
        ConfigAction::Init => {
            let home = AlbumupConfig::init()?;
            println!("Initialized albumup at {}", home.display());
            println!("  config: {}", AlbumupConfig::config_path()?.display());
            Ok(ExitCode::SUCCESS)
        }
        ConfigAction::Show => {
            let config = AlbumupConfig::load()?;
            let toml_str = toml::to_string_pretty(&config)?;
            println!("{toml_str}");
            Ok(ExitCode::SUCCESS)
        }
    }
}
