//! Configuration module for the board backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key for API authentication (required in production)
    pub api_psk: Option<String>,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Path to an optional JSON seed fixture imported into an empty store
    pub seed_path: Option<PathBuf>,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_psk = env::var("BOARD_API_PSK").ok();

        let db_path = env::var("BOARD_DB_PATH")
            .unwrap_or_else(|_| "./data/board.sqlite".to_string())
            .into();

        let seed_path = env::var("BOARD_SEED_PATH").ok().map(PathBuf::from);

        let bind_addr = env::var("BOARD_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid BOARD_BIND_ADDR format");

        let log_level = env::var("BOARD_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            api_psk,
            db_path,
            seed_path,
            bind_addr,
            log_level,
        }
    }
}
