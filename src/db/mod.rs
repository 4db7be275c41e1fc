//! Database layer for the taskdeck service.
//!
//! A persistence layer built on SQLite with a versioned migration system.
//! Every repository call is a direct round-trip to the store; there is no
//! in-process cache to go stale.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use taskdeck::db::tasks::Tasks;
//! use taskdeck::libs::task::TaskFilter;
//!
//! let mut tasks = Tasks::new()?;
//! let all = tasks.fetch(&TaskFilter::default())?;
//! # anyhow::Ok(())
//! ```

/// Core database connection and initialization.
///
/// Provides the `Db` struct that opens SQLite connections and applies
/// pending migrations before handing the connection out.
pub mod db;

/// Database schema migration system.
///
/// Handles versioned schema changes, tracks migration history, and backs
/// the `migrate` CLI command.
pub mod migrations;

/// Task CRUD operations.
///
/// Single-record create, read, update, and delete primitives over the
/// `tasks` table, plus filtered listing.
pub mod tasks;
