use std::{fmt::Display, net::SocketAddr, str::FromStr};

use thiserror::Error;
use time::Duration;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Origin used when rendering shareable profile links.
    pub public_url: String,
    pub session_ttl: Duration,
    pub verify_code_ttl: Duration,
    pub secure_cookies: bool,
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://mysterybox.db".to_owned(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            public_url: "http://localhost:8080".to_owned(),
            session_ttl: Duration::minutes(60),
            verify_code_ttl: Duration::minutes(60),
            secure_cookies: false,
            log_json: false,
        }
    }
}

impl Config {
    /// Reads the environment (and `.env`, if the caller loaded it).
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            database_url: dotenv::var("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_addr: try_load("BIND_ADDR", defaults.bind_addr)?,
            public_url: dotenv::var("PUBLIC_URL")
                .map(|url| url.trim_end_matches('/').to_owned())
                .unwrap_or(defaults.public_url),
            session_ttl: Duration::minutes(try_load("SESSION_TTL_MINUTES", 60)?),
            verify_code_ttl: Duration::minutes(try_load("VERIFY_CODE_TTL_MINUTES", 60)?),
            secure_cookies: try_load("SECURE_COOKIES", defaults.secure_cookies)?,
            log_json: try_load("LOG_JSON", defaults.log_json)?,
        })
    }
}

fn try_load<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match dotenv::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}
