use anyhow::{bail, Context, Result};
use sqlx::postgres::PgConnectOptions;

use crate::matching::query::DEFAULT_RESULT_LIMIT;

const REQUIRED_VARS: [&str; 4] = ["DB_HOST", "DB_NAME", "DB_USER", "DB_PASS"];

/// Application configuration loaded from environment variables.
/// Built once in `main` and handed to the router through `AppState`.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_host: String,
    pub db_name: String,
    pub db_user: String,
    pub db_pass: String,
    pub db_port: u16,
    pub port: u16,
    pub rust_log: String,
    /// Row cap applied to every search query.
    pub search_result_limit: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    /// Reports every missing required variable at once.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let missing: Vec<&str> = REQUIRED_VARS
            .iter()
            .copied()
            .filter(|key| lookup(*key).map_or(true, |v| v.trim().is_empty()))
            .collect();
        if !missing.is_empty() {
            bail!(
                "Missing required environment variables: {}",
                missing.join(", ")
            );
        }

        let require = |key: &str| lookup(key).unwrap_or_default();

        let search_result_limit = parse_or(&lookup, "SEARCH_RESULT_LIMIT", DEFAULT_RESULT_LIMIT)?;
        if search_result_limit == 0 {
            bail!("SEARCH_RESULT_LIMIT must be at least 1, got '0'");
        }

        Ok(Config {
            db_host: require("DB_HOST"),
            db_name: require("DB_NAME"),
            db_user: require("DB_USER"),
            db_pass: require("DB_PASS"),
            db_port: parse_or(&lookup, "DB_PORT", 5432)?,
            port: parse_or(&lookup, "PORT", 5000)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            search_result_limit,
        })
    }

    /// Connection options for the job store. Each search opens its own connection from these.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .database(&self.db_name)
            .username(&self.db_user)
            .password(&self.db_pass)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
