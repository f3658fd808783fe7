//! Application configuration loaded from environment variables.
//!
//! Fail-fast: required variables must be present and valid or the
//! application exits with a clear error message before binding anything.

use std::env;
use thiserror::Error;

/// Default HTTP port.
const DEFAULT_PORT: u16 = 8080;

/// Default database pool size.
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Default log filter.
const DEFAULT_RUST_LOG: &str = "info,vereno=debug";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is absent.
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// An environment variable has an unparseable value.
    #[error("Invalid value for {name}: {value}")]
    InvalidVar {
        /// Variable name.
        name: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string (`DATABASE_URL`, required).
    pub database_url: String,
    /// HTTP listen port (`HTTP_PORT`, default 8080).
    pub http_port: u16,
    /// Database pool size (`DB_MAX_CONNECTIONS`, default 10).
    pub max_connections: u32,
    /// Log filter (`RUST_LOG`, default `info,vereno=debug`).
    pub rust_log: String,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when `DATABASE_URL` is missing or a numeric
    /// variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?;

        let http_port = parse_var("HTTP_PORT", env::var("HTTP_PORT").ok(), DEFAULT_PORT)?;
        let max_connections = parse_var(
            "DB_MAX_CONNECTIONS",
            env::var("DB_MAX_CONNECTIONS").ok(),
            DEFAULT_MAX_CONNECTIONS,
        )?;
        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_RUST_LOG.to_string());

        Ok(Self {
            database_url,
            http_port,
            max_connections,
            rust_log,
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidVar { name, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var_uses_default_when_unset() {
        assert_eq!(parse_var("HTTP_PORT", None, DEFAULT_PORT).unwrap(), 8080);
    }

    #[test]
    fn test_parse_var_accepts_valid_values() {
        assert_eq!(
            parse_var("HTTP_PORT", Some("9000".to_string()), DEFAULT_PORT).unwrap(),
            9000
        );
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        let err = parse_var("HTTP_PORT", Some("not-a-port".to_string()), DEFAULT_PORT).unwrap_err();
        assert!(err.to_string().contains("HTTP_PORT"));
    }
}
