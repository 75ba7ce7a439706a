//! Runtime configuration.
//!
//! Values come from `CALENDAR_*` environment variables; unset or blank
//! variables fall back to the defaults.

use crate::logging::{default_log_level, normalize_level};
use crate::store::event_store::DEFAULT_STORAGE_KEY;
use crate::view::navigation::DEFAULT_NARROW_VIEWPORT_WIDTH;
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "CALENDAR_DB_PATH";
pub const ENV_STORAGE_KEY: &str = "CALENDAR_STORAGE_KEY";
pub const ENV_LOG_LEVEL: &str = "CALENDAR_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "CALENDAR_LOG_DIR";
pub const ENV_NARROW_WIDTH: &str = "CALENDAR_NARROW_WIDTH";

const DEFAULT_DB_FILE_NAME: &str = "calendar_events.sqlite3";

/// Settings shared by core callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file backing the key/value storage.
    pub db_path: PathBuf,
    /// Storage slot holding the serialized event set.
    pub storage_key: String,
    pub log_level: String,
    /// File logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    pub narrow_viewport_width: u32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            log_level: default_log_level().to_string(),
            log_dir: None,
            narrow_viewport_width: DEFAULT_NARROW_VIEWPORT_WIDTH,
        }
    }
}

impl CoreConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    /// - Log level is not one of `trace|debug|info|warn|error`.
    /// - Narrow width is not a positive integer.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(db_path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(db_path);
        }
        if let Some(storage_key) = read(ENV_STORAGE_KEY) {
            config.storage_key = storage_key;
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = normalize_level(&level)?.to_string();
        }
        config.log_dir = read(ENV_LOG_DIR).map(PathBuf::from);
        if let Some(width) = read(ENV_NARROW_WIDTH) {
            config.narrow_viewport_width = match width.parse::<u32>() {
                Ok(value) if value > 0 => value,
                _ => {
                    return Err(format!(
                        "{ENV_NARROW_WIDTH} must be a positive integer, got `{width}`"
                    ))
                }
            };
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, ENV_DB_PATH, ENV_LOG_LEVEL, ENV_NARROW_WIDTH, ENV_STORAGE_KEY};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name| values.get(name).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = CoreConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.storage_key, "calendarEvents");
        assert_eq!(config.narrow_viewport_width, 768);
    }

    #[test]
    fn overrides_are_trimmed_and_applied() {
        let config = CoreConfig::from_lookup(lookup(&[
            (ENV_DB_PATH, " /tmp/cal.db "),
            (ENV_STORAGE_KEY, "work"),
            (ENV_LOG_LEVEL, "WARNING"),
            (ENV_NARROW_WIDTH, "600"),
        ]))
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/tmp/cal.db"));
        assert_eq!(config.storage_key, "work");
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.narrow_viewport_width, 600);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = CoreConfig::from_lookup(lookup(&[(ENV_STORAGE_KEY, "   ")])).unwrap();
        assert_eq!(config.storage_key, "calendarEvents");
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = CoreConfig::from_lookup(lookup(&[(ENV_NARROW_WIDTH, "0")])).unwrap_err();
        assert!(err.contains(ENV_NARROW_WIDTH));

        let err = CoreConfig::from_lookup(lookup(&[(ENV_LOG_LEVEL, "loud")])).unwrap_err();
        assert!(err.contains("unsupported log level"));
    }
}
