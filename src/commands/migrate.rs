//! Applies pending schema migrations or reports migration state.

use crate::db::db::Db;
use crate::db::migrations::{self, MigrationManager};
use crate::libs::config::Config;
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Show the current schema version and applied migrations without
    /// changing anything
    #[arg(long)]
    pub status: bool,
}

pub fn cmd(args: MigrateArgs) -> Result<()> {
    let config = Config::read()?;

    if args.status {
        let conn = Db::open_without_migrations(config.db_file())?;
        let version = migrations::get_db_version(&conn)?;
        println!("Schema version: {}", version);

        if migrations::needs_migration(&conn)? {
            println!("Pending migrations available; run `taskdeck migrate` to apply them.");
        } else {
            println!("Schema is up to date.");
        }

        // The tracking table only exists once something has been applied.
        if version > 0 {
            let history = MigrationManager::new().get_migration_history(&conn)?;
            for (version, name, applied_at) in history {
                println!("  v{}: {} ({})", version, name, applied_at);
            }
        }
        return Ok(());
    }

    // Opening through Db applies anything pending.
    Db::open(config.db_file())?;
    println!("Migrations applied.");
    Ok(())
}
