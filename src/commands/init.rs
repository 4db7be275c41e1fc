//! Writes a default configuration file for later editing.

use crate::libs::config::{Config, DatabaseConfig, ServerConfig, CONFIG_FILE_NAME};
use crate::libs::data_storage::DataStorage;
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing configuration file
    #[arg(long)]
    pub force: bool,
}

pub fn cmd(args: InitArgs) -> Result<()> {
    let config_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

    if config_path.exists() && !args.force {
        println!("Configuration already exists at {} (use --force to overwrite)", config_path.display());
        return Ok(());
    }

    let config = Config {
        server: Some(ServerConfig::default()),
        database: Some(DatabaseConfig::default()),
    };
    config.save()?;

    println!("Wrote default configuration to {}", config_path.display());
    Ok(())
}
