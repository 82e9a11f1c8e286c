//! Runtime configuration for hosts embedding the blog store.
//!
//! # Responsibility
//! - Collect database location and logging settings in one value.
//! - Load them from environment variables or a JSON document.
//!
//! # Invariants
//! - A missing `db_path` selects an in-memory database.
//! - `log_level` always holds a level accepted by `init_logging`.

use crate::logging::{default_log_level, normalize_level};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "BLOG_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "BLOG_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "BLOG_LOG_DIR";

#[derive(Debug)]
pub enum ConfigError {
    InvalidLogLevel(String),
    InvalidJson(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(message) => write!(f, "{message}"),
            Self::InvalidJson(err) => write!(f, "invalid config document: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidLogLevel(_) => None,
            Self::InvalidJson(err) => Some(err),
        }
    }
}

/// Store and logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    /// SQLite file path. `None` opens an in-memory database.
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    /// Absolute directory for rolling log files. `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl BlogConfig {
    /// Reads `BLOG_DB_PATH`, `BLOG_LOG_LEVEL` and `BLOG_LOG_DIR`.
    ///
    /// Unset or blank variables fall back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Parses a JSON document; absent keys fall back to defaults.
    pub fn from_json_str(document: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(document).map_err(ConfigError::InvalidJson)?;
        config.normalized()
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();
        if let Some(path) = non_blank(ENV_DB_PATH) {
            config.db_path = Some(PathBuf::from(path.trim()));
        }
        if let Some(level) = non_blank(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(dir) = non_blank(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(dir.trim()));
        }
        config.normalized()
    }

    fn normalized(mut self) -> Result<Self, ConfigError> {
        self.log_level = normalize_level(&self.log_level)
            .map_err(ConfigError::InvalidLogLevel)?
            .to_string();
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = BlogConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, BlogConfig::default());
        assert!(config.db_path.is_none());
    }

    #[test]
    fn environment_values_are_normalized() {
        let config = BlogConfig::from_lookup(lookup_from(&[
            (ENV_DB_PATH, " /tmp/blog.db "),
            (ENV_LOG_LEVEL, "WARNING"),
            (ENV_LOG_DIR, "   "),
        ]))
        .unwrap();
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/blog.db")));
        assert_eq!(config.log_level, "warn");
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn unknown_level_is_rejected() {
        let err = BlogConfig::from_lookup(lookup_from(&[(ENV_LOG_LEVEL, "loud")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLogLevel(_)));
    }

    #[test]
    fn json_document_fills_missing_keys() {
        let config = BlogConfig::from_json_str(r#"{"db_path": "/srv/blog.sqlite3"}"#).unwrap();
        assert_eq!(config.db_path, Some(PathBuf::from("/srv/blog.sqlite3")));
        assert_eq!(config.log_level, default_log_level());

        assert!(matches!(
            BlogConfig::from_json_str("{not json"),
            Err(ConfigError::InvalidJson(_))
        ));
    }
}
