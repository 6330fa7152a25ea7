//! Runtime configuration for catalog drivers.
//!
//! # Responsibility
//! - Resolve where snapshots and logs live, and at which level to log.
//! - Build the two snapshot stores from the resolved paths.
//!
//! Precedence is defaults, then environment, then explicit overrides applied
//! by the caller (CLI flags).

use crate::logging::{LogLevel, LoggingError};
use crate::repo::{AnimeStore, ListStore};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "ANICAT_DATA_DIR";
pub const LOG_DIR_ENV: &str = "ANICAT_LOG_DIR";
pub const LOG_LEVEL_ENV: &str = "ANICAT_LOG_LEVEL";

pub const DEFAULT_DATA_DIR: &str = "data";
pub const ENTRIES_FILE_NAME: &str = "animes.json";
pub const LISTS_FILE_NAME: &str = "lists.json";

#[derive(Debug)]
pub enum ConfigError {
    /// A variable is set but empty or whitespace.
    EmptyValue { variable: &'static str },
    InvalidLogLevel {
        variable: &'static str,
        source: LoggingError,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyValue { variable } => write!(f, "`{variable}` is set but empty"),
            Self::InvalidLogLevel { variable, source } => write!(f, "`{variable}`: {source}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidLogLevel { source, .. } => Some(source),
            Self::EmptyValue { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Directory holding both snapshot files.
    pub data_dir: PathBuf,
    /// File logging is off when `None`.
    pub log_dir: Option<PathBuf>,
    pub log_level: LogLevel,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            log_dir: None,
            log_level: LogLevel::build_default(),
        }
    }
}

impl CatalogConfig {
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Defaults overridden by `ANICAT_*` process variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = non_empty(&lookup, DATA_DIR_ENV)? {
            config.data_dir = PathBuf::from(value);
        }
        if let Some(value) = non_empty(&lookup, LOG_DIR_ENV)? {
            config.log_dir = Some(PathBuf::from(value));
        }
        if let Some(value) = non_empty(&lookup, LOG_LEVEL_ENV)? {
            config.log_level =
                value
                    .parse()
                    .map_err(|source| ConfigError::InvalidLogLevel {
                        variable: LOG_LEVEL_ENV,
                        source,
                    })?;
        }

        Ok(config)
    }

    pub fn entries_path(&self) -> PathBuf {
        self.data_dir.join(ENTRIES_FILE_NAME)
    }

    pub fn lists_path(&self) -> PathBuf {
        self.data_dir.join(LISTS_FILE_NAME)
    }

    /// Unloaded stores for entries and lists. No I/O happens here.
    pub fn open_stores(&self) -> (AnimeStore, ListStore) {
        (
            AnimeStore::new(self.entries_path()),
            ListStore::new(self.lists_path()),
        )
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

fn non_empty<F>(lookup: &F, variable: &'static str) -> Result<Option<String>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(variable) {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Err(ConfigError::EmptyValue { variable }),
        Some(value) => Ok(Some(value.trim().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_without_variables() {
        let config = CatalogConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, CatalogConfig::default());
        assert_eq!(config.entries_path(), Path::new("data").join("animes.json"));
        assert_eq!(config.lists_path(), Path::new("data").join("lists.json"));
    }

    #[test]
    fn variables_override_defaults() {
        let config = CatalogConfig::from_lookup(lookup_from(&[
            (DATA_DIR_ENV, "/srv/anicat"),
            (LOG_DIR_ENV, "/var/log/anicat"),
            (LOG_LEVEL_ENV, "Warning"),
        ]))
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/srv/anicat"));
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/anicat")));
        assert_eq!(config.log_level, LogLevel::Warn);
    }

    #[test]
    fn empty_variable_is_rejected() {
        let err = CatalogConfig::from_lookup(lookup_from(&[(DATA_DIR_ENV, "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyValue { variable } if variable == DATA_DIR_ENV));
    }

    #[test]
    fn bad_level_is_rejected() {
        let err =
            CatalogConfig::from_lookup(lookup_from(&[(LOG_LEVEL_ENV, "loud")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLogLevel { .. }));
        assert!(err.to_string().contains(LOG_LEVEL_ENV));
    }

    #[test]
    fn open_stores_points_at_config_paths() {
        let config = CatalogConfig::with_data_dir("/tmp/catalog");
        let (entries, lists) = config.open_stores();
        assert_eq!(entries.path(), config.entries_path());
        assert_eq!(lists.path(), config.lists_path());
        assert!(!entries.is_loaded());
    }
}
