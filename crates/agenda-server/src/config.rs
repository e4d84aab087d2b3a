use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::HeaderValue;
use thiserror::Error;

/// Origins allowed to call the API from a browser.
#[derive(Debug, Clone, PartialEq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<HeaderValue>),
}

/// Server configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: PathBuf,
    pub cors_origins: AllowedOrigins,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_addr = lookup("AGENDA_LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse()
            .map_err(|_| {
                ConfigError::Invalid("AGENDA_LISTEN_ADDR", "must be a valid socket address")
            })?;

        let db_path = lookup("AGENDA_DB_PATH")
            .unwrap_or_else(|| "./agenda.redb".to_string())
            .into();

        let cors_origins = Self::parse_origins(
            &lookup("AGENDA_CORS_ORIGINS").unwrap_or_else(|| "http://localhost:3000".to_string()),
        )?;

        Ok(Config {
            listen_addr,
            db_path,
            cors_origins,
        })
    }

    fn parse_origins(value: &str) -> Result<AllowedOrigins, ConfigError> {
        if value.trim() == "*" {
            return Ok(AllowedOrigins::Any);
        }

        let mut origins = Vec::new();
        for origin in value.split(',') {
            let origin = origin.trim();
            if origin.is_empty() {
                continue;
            }
            if origin == "*" {
                return Err(ConfigError::Invalid(
                    "AGENDA_CORS_ORIGINS",
                    "`*` must be the only value when allowing any origin",
                ));
            }
            let header = HeaderValue::from_str(origin).map_err(|_| {
                ConfigError::Invalid("AGENDA_CORS_ORIGINS", "origins must be valid header values")
            })?;
            origins.push(header);
        }

        Ok(AllowedOrigins::List(origins))
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, &'static str),
}
