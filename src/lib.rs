//! # Taskdeck
//!
//! A task-management service backed by SQLite, exposing a JSON HTTP API
//! for creating, listing, updating, and deleting tasks.
//!
//! ## Features
//!
//! - **Task Management**: Create, update, and delete tasks with status,
//!   priority, and due date tracking
//! - **Payload Validation**: Field-level validation with structured,
//!   field-attributed failure reporting
//! - **HTTP API**: Five JSON operations served by actix-web
//! - **Schema Migrations**: Versioned, transactional schema evolution
//! - **Configuration**: JSON configuration file with sensible defaults
//!
//! ## Usage
//!
//! ```rust,no_run
//! use taskdeck::commands::Cli;
//!
//! #[actix_web::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
pub mod server;
