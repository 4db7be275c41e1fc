//! Command-line interface for the taskdeck service.

pub mod init;
pub mod migrate;
pub mod serve;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Write a default configuration file")]
    Init(init::InitArgs),
    #[command(about = "Apply pending database migrations")]
    Migrate(migrate::MigrateArgs),
    #[command(about = "Run the HTTP API server")]
    Serve(serve::ServeArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Migrate(args) => migrate::cmd(args),
            Commands::Serve(args) => serve::cmd(args).await,
        }
    }
}
