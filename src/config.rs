use std::env;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use dotenvy::dotenv;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    MySql,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" => Ok(StoreBackend::MySql),
            "memory" => Ok(StoreBackend::Memory),
            other => bail!("unknown STORE_BACKEND '{other}', expected 'mysql' or 'memory'"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    pub store_backend: StoreBackend,
    /// Required when the backend is MySQL.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,

    pub api_prefix: String,
    pub rate_api_per_min: u32,

    /// Re-run the leave rules on submit instead of trusting the form.
    pub server_side_validation: bool,

    pub log_dir: String,
    pub log_level: tracing::Level,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let store_backend: StoreBackend = var_or("STORE_BACKEND", "mysql")?;
        let database_url = env::var("DATABASE_URL").ok();
        if store_backend == StoreBackend::MySql && database_url.is_none() {
            bail!("DATABASE_URL must be set when STORE_BACKEND is mysql");
        }

        Ok(Self {
            server_addr: env::var("SERVER_ADDR").context("SERVER_ADDR must be set")?,
            store_backend,
            database_url,
            db_max_connections: var_or("DB_MAX_CONNECTIONS", "10")?,
            db_acquire_timeout_secs: var_or("DB_ACQUIRE_TIMEOUT_SECS", "5")?,

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
            rate_api_per_min: var_or("RATE_API_PER_MIN", "1000")?,

            server_side_validation: var_or("SERVER_SIDE_VALIDATION", "true")?,

            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            log_level: var_or("LOG_LEVEL", "debug")?,
        })
    }
}

fn var_or<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    raw.parse::<T>()
        .map_err(|e| anyhow::anyhow!("invalid {key} '{raw}': {e}"))
}
