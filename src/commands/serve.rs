//! Runs the HTTP API server.

use crate::db::db::Db;
use crate::libs::config::Config;
use crate::server;
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Bind address, e.g. 127.0.0.1:8080 (overrides the configuration file)
    #[arg(long)]
    pub listen: Option<String>,

    /// Per-request timeout in seconds (overrides the configuration file)
    #[arg(long)]
    pub request_timeout: Option<u64>,
}

pub async fn cmd(args: ServeArgs) -> Result<()> {
    let mut config = Config::read()?;

    let mut server_config = config.server();
    if let Some(listen) = args.listen {
        server_config.listen = listen;
    }
    if let Some(secs) = args.request_timeout {
        server_config.request_timeout_secs = secs;
    }
    config.server = Some(server_config);

    // Apply pending migrations before the first request arrives.
    Db::open(config.db_file())?;

    server::run(config).await
}
