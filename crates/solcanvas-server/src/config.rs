//! Server configuration from environment variables.
//!
//! - `SOLCANVAS_DB_PATH`: SQLite database file path (default: "solcanvas.db")
//! - `SOLCANVAS_PORT`: Server listen port (default: 3000)
//! - `SOLCANVAS_SANDBOX_DIR`: Root directory for exported projects
//!   (default: "./sandbox")

use std::path::PathBuf;

use crate::error::ApiError;

pub const DEFAULT_DB_PATH: &str = "solcanvas.db";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SANDBOX_DIR: &str = "./sandbox";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub db_path: String,
    pub port: u16,
    pub sandbox_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            db_path: DEFAULT_DB_PATH.to_string(),
            port: DEFAULT_PORT,
            sandbox_dir: PathBuf::from(DEFAULT_SANDBOX_DIR),
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let defaults = ServerConfig::default();
        let port = match lookup("SOLCANVAS_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                ApiError::BadRequest(format!("SOLCANVAS_PORT is not a valid port: '{}'", raw))
            })?,
            None => defaults.port,
        };
        Ok(ServerConfig {
            db_path: lookup("SOLCANVAS_DB_PATH").unwrap_or(defaults.db_path),
            port,
            sandbox_dir: lookup("SOLCANVAS_SANDBOX_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.sandbox_dir),
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
