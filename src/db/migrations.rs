//! Database schema migration management and versioning.
//!
//! Evolves the SQLite schema over time while keeping a complete record of
//! applied changes. Migrations run automatically when a connection is opened
//! through [`crate::db::db::Db`], and can be driven manually through the
//! `migrate` CLI command.
//!
//! ## Features
//!
//! - **Version Tracking**: Records every applied migration with a timestamp
//! - **Transaction Safety**: Pending migrations run within one transaction
//! - **History Inspection**: Full audit trail of schema changes
//! - **Rollback Support**: Development-time rollback (debug builds only)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use taskdeck::db::migrations::{init_with_migrations, get_db_version};
//! use rusqlite::Connection;
//!
//! let mut conn = Connection::open("taskdeck.db")?;
//! init_with_migrations(&mut conn)?;
//! let version = get_db_version(&conn)?;
//! # anyhow::Ok(())
//! ```

use anyhow::Result;
use rusqlite::{params, Connection, Transaction};

/// SQL schema for the migrations tracking table.
///
/// Each applied migration is recorded with its version, name, and
/// application timestamp, giving an audit trail of schema changes.
const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

/// A single schema migration: version, descriptive name, and the
/// transformation applied within a transaction.
#[derive(Debug, Clone)]
struct Migration {
    version: u32,
    name: &'static str,
    up: fn(&Transaction) -> Result<()>,
}

/// Registry of all migrations, in version order.
///
/// Designed for single-threaded use during startup; concurrent migration
/// attempts should be avoided.
pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl MigrationManager {
    /// Creates a manager with every known migration registered in
    /// chronological order.
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    /// Defines the complete schema evolution history.
    ///
    /// Migrations must be registered in sequential version order; each one
    /// builds on the schema state created by its predecessors.
    fn register_migrations(&mut self) {
        // Version 1: tasks table and filter indices
        self.add_migration(1, "create_tasks_table", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS tasks (
        id INTEGER NOT NULL PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT,
        status TEXT NOT NULL DEFAULT 'PENDING',
        priority TEXT,
        due_date TIMESTAMP,
        created_at TIMESTAMP NOT NULL,
        updated_at TIMESTAMP NOT NULL
    )",
                [],
            )?;

            // Secondary lookups by status, priority, and due date are the
            // expected filter paths, so each gets its own index.
            tx.execute("CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_tasks_priority ON tasks(priority)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_tasks_due_date ON tasks(due_date)", [])?;

            Ok(())
        });
    }

    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    /// Executes all pending migrations in order.
    ///
    /// Creates the tracking table if needed, determines the current version,
    /// and applies everything newer within a single transaction. A failing
    /// migration rolls the whole run back.
    pub fn run_migrations(&self, conn: &mut Connection) -> Result<()> {
        conn.execute(MIGRATIONS_TABLE, [])?;

        let current_version = self.get_current_version(conn)?;

        let pending: Vec<&Migration> = self.migrations.iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            tracing::debug!("database schema is up to date");
            return Ok(());
        }

        tracing::info!(count = pending.len(), "applying pending migrations");

        let tx = conn.transaction()?;

        for migration in pending {
            tracing::info!(version = migration.version, name = migration.name, "running migration");

            match (migration.up)(&tx) {
                Ok(()) => {
                    tx.execute(
                        "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
                        params![migration.version, migration.name],
                    )?;
                    tracing::debug!(version = migration.version, "migration completed");
                }
                Err(e) => {
                    tracing::error!(version = migration.version, error = %e, "migration failed");
                    return Err(e);
                }
            }
        }

        tx.commit()?;
        tracing::info!("all migrations completed");

        Ok(())
    }

    /// Highest applied migration version, or 0 for a fresh database.
    fn get_current_version(&self, conn: &Connection) -> Result<u32> {
        let version: Option<u32> = conn.query_row("SELECT MAX(version) FROM migrations", [], |row| row.get(0)).unwrap_or(Some(0));

        Ok(version.unwrap_or(0))
    }

    /// Whether a specific migration version has been applied.
    pub fn is_migration_applied(&self, conn: &Connection, version: u32) -> Result<bool> {
        let count: i32 = conn.query_row("SELECT COUNT(*) FROM migrations WHERE version = ?1", params![version], |row| row.get(0))?;

        Ok(count > 0)
    }

    /// Complete migration history as (version, name, applied_at) tuples,
    /// ordered by version.
    pub fn get_migration_history(&self, conn: &Connection) -> Result<Vec<(u32, String, String)>> {
        let mut stmt = conn.prepare("SELECT version, name, applied_at FROM migrations ORDER BY version")?;

        let history = stmt
            .query_map([], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(history)
    }

    /// Rolls the tracking table back to a target version (debug builds only).
    ///
    /// Removes migration records without reversing schema changes; useful
    /// only for development and testing scenarios.
    #[cfg(debug_assertions)]
    pub fn rollback_to(&self, conn: &mut Connection, target_version: u32) -> Result<()> {
        let current_version = self.get_current_version(conn)?;

        if target_version >= current_version {
            tracing::info!("nothing to roll back");
            return Ok(());
        }

        tracing::info!(from = current_version, to = target_version, "rolling back migration records");

        conn.execute("DELETE FROM migrations WHERE version > ?1", params![target_version])?;

        Ok(())
    }
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies all pending migrations to the given connection.
pub fn init_with_migrations(conn: &mut Connection) -> Result<()> {
    let manager = MigrationManager::new();
    manager.run_migrations(conn)?;
    Ok(())
}

/// Current schema version of the given database.
pub fn get_db_version(conn: &Connection) -> Result<u32> {
    let manager = MigrationManager::new();
    manager.get_current_version(conn)
}

/// Whether the database is behind the latest known migration.
pub fn needs_migration(conn: &Connection) -> Result<bool> {
    let manager = MigrationManager::new();
    let current = manager.get_current_version(conn)?;
    let latest = manager.migrations.last().map(|m| m.version).unwrap_or(0);
    Ok(current < latest)
}
