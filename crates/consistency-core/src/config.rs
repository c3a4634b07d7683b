//! TOML-based application configuration.
//!
//! Stores:
//! - Metric tunables (walk bound, rolling window, score sample size)
//! - Chart window sizes
//! - The time zone offset used to turn raw timestamps into local dates
//! - Log level
//!
//! Configuration is stored at `~/.config/consistency-tracker/config.toml`.

use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::stats::{ChartConfig, MetricsConfig};
use crate::storage::data_dir;

/// Date handling configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatesConfig {
    /// Fixed UTC offset in minutes. When unset the caller's local offset
    /// is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utc_offset_minutes: Option<i32>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/consistency-tracker/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub charts: ChartConfig,
    #[serde(default)]
    pub dates: DatesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.to_string(),
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let obj = current.as_object_mut().ok_or_else(unknown)?;

            if parts.peek().is_some() {
                current = match obj.get_mut(part) {
                    Some(v) => v,
                    None => return Err(unknown()),
                };
                continue;
            }

            let new_value = match obj.get(part) {
                Some(serde_json::Value::Bool(_)) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|_| invalid(&format!("cannot parse '{value}' as bool")))?,
                ),
                Some(serde_json::Value::Number(_)) => value
                    .parse::<i64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .map_err(|_| invalid(&format!("cannot parse '{value}' as integer")))?,
                Some(serde_json::Value::String(_)) => serde_json::Value::String(value.into()),
                Some(_) => return Err(unknown()),
                // optional settings are omitted from the tree until set
                None if Self::is_optional_number(key) => value
                    .parse::<i64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .map_err(|_| invalid(&format!("cannot parse '{value}' as integer")))?,
                None => return Err(unknown()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    fn is_optional_number(key: &str) -> bool {
        key == "dates.utc_offset_minutes"
    }

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from a specific file; see [`Config::load`].
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(error = %e, "falling back to default configuration");
                Self::default()
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to a specific file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, in memory only.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit
    /// the setting's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.metrics.walk_limit == 0 {
            return Err(ConfigError::InvalidValue {
                key: "metrics.walk_limit".into(),
                message: "must be at least 1".into(),
            });
        }
        if let Some(minutes) = self.dates.utc_offset_minutes {
            if offset_from_minutes(minutes).is_none() {
                return Err(ConfigError::InvalidValue {
                    key: "dates.utc_offset_minutes".into(),
                    message: format!("{minutes} is outside -1439..=1439"),
                });
            }
        }
        Ok(())
    }

    /// Configured offset, or `fallback` when none is set.
    pub fn offset_or(&self, fallback: FixedOffset) -> FixedOffset {
        self.dates
            .utc_offset_minutes
            .and_then(offset_from_minutes)
            .unwrap_or(fallback)
    }
}

fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    minutes.checked_mul(60).and_then(FixedOffset::east_opt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.metrics.walk_limit, 365);
        assert_eq!(parsed.charts.recent_days, 4);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[metrics]\nscore_sample_days = 5\n").unwrap();
        assert_eq!(parsed.metrics.score_sample_days, 5);
        assert_eq!(parsed.metrics.walk_limit, 365);
        assert_eq!(parsed.logging.level, "warn");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("metrics.walk_limit").as_deref(), Some("365"));
        assert_eq!(cfg.get("logging.level").as_deref(), Some("warn"));
        assert_eq!(cfg.get("metrics.nope"), None);
        assert_eq!(cfg.get(""), None);
    }

    #[test]
    fn set_updates_number_and_string() {
        let mut cfg = Config::default();
        cfg.set("metrics.rolling_window_days", "14").unwrap();
        cfg.set("logging.level", "debug").unwrap();
        assert_eq!(cfg.metrics.rolling_window_days, 14);
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn set_optional_offset() {
        let mut cfg = Config::default();
        cfg.set("dates.utc_offset_minutes", "-300").unwrap();
        assert_eq!(cfg.dates.utc_offset_minutes, Some(-300));
        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(cfg.offset_or(utc), FixedOffset::west_opt(5 * 3600).unwrap());
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("metrics.unknown", "1"),
            Err(crate::CoreError::Config(ConfigError::UnknownKey(_)))
        ));
        assert!(cfg.set("metrics", "1").is_err());
    }

    #[test]
    fn set_rejects_invalid_values() {
        let mut cfg = Config::default();
        assert!(cfg.set("metrics.walk_limit", "lots").is_err());
        assert!(cfg.set("metrics.walk_limit", "0").is_err());
        assert!(cfg.set("metrics.walk_limit", "-3").is_err());
        assert!(cfg.set("dates.utc_offset_minutes", "5000").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn load_from_writes_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());

        let mut changed = cfg.clone();
        changed.set("charts.recent_weeks", "6").unwrap();
        changed.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().charts.recent_weeks, 6);
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "metrics = 3").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(crate::CoreError::Config(ConfigError::LoadFailed { .. }))
        ));
    }

    #[test]
    fn set_rejects_offset_that_overflows_seconds() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("dates.utc_offset_minutes", "100000000"),
            Err(crate::CoreError::Config(ConfigError::InvalidValue { .. }))
        ));
        assert_eq!(cfg.dates.utc_offset_minutes, None);
    }

    #[test]
    fn offset_or_falls_back_on_out_of_range_minutes() {
        let mut cfg = Config::default();
        cfg.dates.utc_offset_minutes = Some(i32::MAX);
        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(cfg.offset_or(utc), utc);
    }

    #[test]
    fn load_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        std::fs::write(&path, "[metrics]\nwalk_limit = 0\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(crate::CoreError::Config(ConfigError::InvalidValue { .. }))
        ));

        std::fs::write(&path, "[dates]\nutc_offset_minutes = 100000000\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(crate::CoreError::Config(ConfigError::InvalidValue { .. }))
        ));
    }
}
