//! Runtime configuration resolved from the environment.
//!
//! # Responsibility
//! - Decide where the database file lives and how logging is set up.
//!
//! # Invariants
//! - Every setting has a default except the log directory; file logging
//!   stays off until a directory is configured.
//! - Blank variables are treated as unset.

use crate::logging::{default_log_level, normalize_level, normalize_log_dir};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "PRIZEBOND_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "PRIZEBOND_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "PRIZEBOND_LOG_DIR";
const DEFAULT_DB_FILE_NAME: &str = "prizebond.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but its value is unusable.
    Invalid { key: &'static str, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid { key, message } => write!(f, "invalid {key}: {message}"),
        }
    }
}

impl Error for ConfigError {}

/// Resolved application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Loads settings from `PRIZEBOND_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads settings through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = read(DB_PATH_ENV) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = read(LOG_LEVEL_ENV) {
            config.log_level = normalize_level(&level).map_err(|message| ConfigError::Invalid {
                key: LOG_LEVEL_ENV,
                message,
            })?;
        }
        if let Some(dir) = read(LOG_DIR_ENV) {
            let dir = normalize_log_dir(&dir).map_err(|message| ConfigError::Invalid {
                key: LOG_DIR_ENV,
                message,
            })?;
            config.log_dir = Some(dir);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset_or_blank() {
        let config = AppConfig::from_lookup(lookup(&[(DB_PATH_ENV, "  ")])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config.db_path.ends_with("prizebond.sqlite3"));
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn reads_and_normalizes_values() {
        let log_dir = std::env::temp_dir().join("prizebond-config-test");
        let log_dir_str = log_dir.to_str().unwrap().to_string();
        let config = AppConfig::from_lookup(lookup(&[
            (DB_PATH_ENV, "/var/lib/prizebond/bonds.db"),
            (LOG_LEVEL_ENV, " WARNING "),
            (LOG_DIR_ENV, log_dir_str.as_str()),
        ]))
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/var/lib/prizebond/bonds.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(log_dir));
    }

    #[test]
    fn rejects_bad_level_and_relative_log_dir() {
        let err = AppConfig::from_lookup(lookup(&[(LOG_LEVEL_ENV, "loud")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key, .. } if key == LOG_LEVEL_ENV));

        let err = AppConfig::from_lookup(lookup(&[(LOG_DIR_ENV, "logs")])).unwrap_err();
        assert!(err.to_string().contains("absolute"));
    }
}
