use crate::db::migrations;
use crate::libs::data_storage::DataStorage;
use anyhow::Result;
use rusqlite::Connection;

pub const DB_FILE_NAME: &str = "taskdeck.db";

/// An open SQLite connection with all pending migrations applied.
pub struct Db {
    pub conn: Connection,
}

impl Db {
    /// Opens the default database file in the application data directory.
    pub fn new() -> Result<Db> {
        Self::open(DB_FILE_NAME)
    }

    /// Opens a named database file in the application data directory and
    /// brings its schema up to date.
    pub fn open(file_name: &str) -> Result<Db> {
        let mut conn = Self::open_without_migrations(file_name)?;
        migrations::init_with_migrations(&mut conn)?;

        Ok(Db { conn })
    }

    /// Opens a connection without touching the schema. Used by the migrate
    /// command to inspect state before changing it.
    pub fn open_without_migrations(file_name: &str) -> Result<Connection> {
        let db_file_path = DataStorage::new().get_path(file_name)?;
        Ok(Connection::open(db_file_path)?)
    }
}
