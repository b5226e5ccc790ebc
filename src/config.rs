//! Server configuration, read from `WATCHLIST_*` environment variables.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::auth::DEFAULT_SESSION_TTL_DAYS;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Upper bound for `WATCHLIST_SESSION_DAYS` (ten years).
pub const MAX_SESSION_TTL_DAYS: i64 = 3650;

const ADDR_VAR: &str = "WATCHLIST_ADDR";
const PASSWORD_VAR: &str = "WATCHLIST_PASSWORD";
const SESSION_DAYS_VAR: &str = "WATCHLIST_SESSION_DAYS";
const DB_VAR: &str = "WATCHLIST_DB";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    Missing(&'static str),
    /// A variable is set but cannot be parsed.
    Invalid { var: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(var) => write!(f, "{} must be set", var),
            ConfigError::Invalid { var, reason } => write!(f, "{} is invalid: {}", var, reason),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub bind_addr: String,
    #[serde(skip_serializing)]
    pub shared_password: String,
    pub session_ttl_days: i64,
    /// SQLite file; `None` keeps everything in memory.
    pub database_path: Option<PathBuf>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bind_addr", &self.bind_addr)
            .field("shared_password", &"<redacted>")
            .field("session_ttl_days", &self.session_ttl_days)
            .field("database_path", &self.database_path)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let shared_password = get(PASSWORD_VAR).ok_or(ConfigError::Missing(PASSWORD_VAR))?;

        let session_ttl_days = match get(SESSION_DAYS_VAR) {
            None => DEFAULT_SESSION_TTL_DAYS,
            Some(raw) => {
                let days: i64 = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                    ConfigError::Invalid {
                        var: SESSION_DAYS_VAR,
                        reason: e.to_string(),
                    }
                })?;
                if !(1..=MAX_SESSION_TTL_DAYS).contains(&days) {
                    return Err(ConfigError::Invalid {
                        var: SESSION_DAYS_VAR,
                        reason: format!("must be between 1 and {}", MAX_SESSION_TTL_DAYS),
                    });
                }
                days
            }
        };

        Ok(Self {
            bind_addr: get(ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            shared_password,
            session_ttl_days,
            database_path: get(DB_VAR).map(PathBuf::from),
        })
    }
}
