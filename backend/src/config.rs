//! Runtime configuration, resolved from environment variables with defaults
//! suitable for local development.

use std::env;

pub struct Config {
    pub host: String,
    pub port: u16,
    /// Path of the SQLite database file.
    pub database_path: String,
}

impl Config {
    pub fn from_env() -> Config {
        let host = env::var("ESG_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("ESG_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        let database_path = env::var("ESG_DB").unwrap_or_else(|_| "esg.sqlite".to_string());
        Config {
            host,
            port,
            database_path,
        }
    }
}
