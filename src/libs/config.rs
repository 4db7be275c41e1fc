//! Configuration management for the taskdeck service.
//!
//! Settings live in a JSON file in the platform-specific application data
//! directory. A missing file is not an error: every section has a documented
//! default, so the server runs with no setup at all. The loaded [`Config`]
//! is passed explicitly into the server and service layers at startup; no
//! component reads configuration from the environment on its own.
//!
//! ## Sections
//!
//! - **Server**: bind address and per-request timeout
//! - **Database**: SQLite file name within the data directory
//!
//! ## Usage
//!
//! ```rust,no_run
//! use taskdeck::libs::config::Config;
//!
//! let config = Config::read()?;
//! println!("listening on {}", config.server().listen);
//! # anyhow::Ok(())
//! ```

use crate::libs::data_storage::DataStorage;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};

/// Configuration file name inside the application data directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Default bind address for the HTTP server.
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8080";

/// Default bound on any single request, in seconds. On expiry the caller
/// receives a timeout failure and the in-flight storage work is abandoned.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// HTTP server settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    pub listen: String,

    /// Maximum time a single request may run before the caller receives a
    /// timeout failure.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            listen: DEFAULT_LISTEN.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Storage settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DatabaseConfig {
    /// SQLite file name, resolved inside the application data directory.
    pub file: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            file: crate::db::db::DB_FILE_NAME.to_string(),
        }
    }
}

/// Root configuration object.
///
/// Sections are optional so a hand-written file only needs the settings it
/// actually overrides; unset sections fall back to their defaults and are
/// omitted when the file is written back.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseConfig>,
}

impl Config {
    /// Loads the configuration file, falling back to defaults when no file
    /// exists. A present-but-unparseable file is an error.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    /// Writes the configuration as pretty-printed JSON, overwriting any
    /// existing file.
    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Server settings with defaults applied.
    pub fn server(&self) -> ServerConfig {
        self.server.clone().unwrap_or_default()
    }

    /// SQLite file name with the default applied.
    pub fn db_file(&self) -> &str {
        self.database.as_ref().map(|db| db.file.as_str()).unwrap_or(crate::db::db::DB_FILE_NAME)
    }
}
