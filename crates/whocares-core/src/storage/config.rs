//! TOML-based application configuration.
//!
//! Stores:
//! - The deployment environment tag (overridden by `WHOCARES_ENV`)
//! - An optional check-in window override
//! - Token reward settings
//! - Health bonus settings
//!
//! Configuration is stored at `~/.config/whocares/config.toml`.

use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{data_dir, ENV_VAR};
use crate::error::{ConfigError, Result};
use crate::health::HealthConfig;
use crate::scoring::RewardConfig;
use crate::window::{availability, Availability, Environment, WindowConfig};

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/whocares/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Deployment tag used when `WHOCARES_ENV` is unset.
    #[serde(default)]
    pub environment: Option<Environment>,
    /// Replaces the environment's window preset when set.
    #[serde(default)]
    pub window: Option<WindowConfig>,
    #[serde(default)]
    pub rewards: RewardConfig,
    #[serde(default)]
    pub health: HealthConfig,
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
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or write and return the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Only a missing file is replaced by the default; any other read
    /// failure is returned and the file is left alone.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default configuration");
            Self::default()
        })
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

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit it.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        if let Some(window) = &updated.window {
            window.validate()?;
        }
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    /// `WHOCARES_ENV`, then the configured tag, then development.
    pub fn resolve_environment(&self) -> Result<Environment, ConfigError> {
        self.resolve_environment_with(std::env::var(ENV_VAR).ok())
    }

    pub fn resolve_environment_with(&self, var: Option<String>) -> Result<Environment, ConfigError> {
        match var.filter(|v| !v.trim().is_empty()) {
            Some(tag) => tag.parse(),
            None => Ok(self.environment.unwrap_or_default()),
        }
    }

    /// The window to gate check-ins with in `env`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when the override is malformed.
    pub fn window_config(&self, env: Environment) -> Result<WindowConfig, ConfigError> {
        let window = self.window.clone().unwrap_or_else(|| env.window_config());
        window.validate()?;
        Ok(window)
    }

    /// Whether a check-in can be offered at local time `now`. `env`
    /// overrides [`Config::resolve_environment`].
    pub fn availability_at<T: Datelike + Timelike>(
        &self,
        env: Option<Environment>,
        now: &T,
    ) -> Result<(Environment, Availability)> {
        let environment = match env {
            Some(env) => env,
            None => self.resolve_environment()?,
        };
        let window = self.window_config(environment)?;
        let avail = availability(now, &window)?;
        tracing::debug!(%environment, ?avail, "check-in availability");
        Ok((environment, avail))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.rewards.base, 10_000);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed.rewards.health_point_value, 500);
        assert_eq!(parsed.health.cache_ttl_secs, 300);
        assert!(parsed.window.is_none());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("rewards.base").as_deref(), Some("10000"));
        assert_eq!(cfg.get("health.enabled").as_deref(), Some("true"));
        assert!(cfg.get("rewards.missing_key").is_none());
    }

    #[test]
    fn apply_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.apply("rewards.base", "20000").unwrap();
        cfg.apply("health.enabled", "false").unwrap();
        cfg.apply("health.sleep_hours_target", "7.5").unwrap();
        assert_eq!(cfg.rewards.base, 20_000);
        assert!(!cfg.health.enabled);
        assert_eq!(cfg.health.sleep_hours_target, 7.5);
    }

    #[test]
    fn apply_sets_environment_tag() {
        let mut cfg = Config::default();
        cfg.apply("environment", "production").unwrap();
        assert_eq!(cfg.environment, Some(Environment::Production));
        assert!(cfg.apply("environment", "qa").is_err());
    }

    #[test]
    fn apply_rejects_unknown_key_and_bad_type() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.apply("rewards.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            cfg.apply("health.enabled", "not_a_bool"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn apply_rejects_invalid_window() {
        let mut cfg = Config {
            window: Some(WindowConfig::weekly([0], 0, 23)),
            ..Config::default()
        };
        assert!(cfg.apply("window.start_hour", "30").is_err());
        assert_eq!(cfg.window.as_ref().unwrap().start_hour, 0);
        cfg.apply("window.start_hour", "8").unwrap();
        assert_eq!(cfg.window.as_ref().unwrap().start_hour, 8);
    }

    #[test]
    fn environment_resolution_order() {
        let cfg = Config::default();
        assert_eq!(cfg.resolve_environment_with(None).unwrap(), Environment::Development);

        let cfg = Config {
            environment: Some(Environment::Staging),
            ..Config::default()
        };
        assert_eq!(cfg.resolve_environment_with(None).unwrap(), Environment::Staging);
        assert_eq!(
            cfg.resolve_environment_with(Some("production".into())).unwrap(),
            Environment::Production
        );
        assert_eq!(cfg.resolve_environment_with(Some(" ".into())).unwrap(), Environment::Staging);
        assert!(cfg.resolve_environment_with(Some("moon".into())).is_err());
    }

    #[test]
    fn window_override_wins_over_preset() {
        let custom = WindowConfig::weekly([5], 18, 22);
        let cfg = Config {
            window: Some(custom.clone()),
            ..Config::default()
        };
        assert_eq!(cfg.window_config(Environment::Production).unwrap(), custom);
        assert!(Config::default()
            .window_config(Environment::Development)
            .unwrap()
            .always_open);
    }

    #[test]
    fn window_config_rejects_empty_override() {
        let cfg = Config {
            window: Some(WindowConfig::weekly([], 0, 23)),
            ..Config::default()
        };
        assert!(cfg.window_config(Environment::Production).is_err());
    }

    #[test]
    fn load_from_writes_default_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn save_and_load_preserve_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config {
            environment: Some(Environment::Production),
            window: Some(WindowConfig::weekly([0, 6], 9, 21)),
            rewards: RewardConfig {
                base: 5000,
                health_point_value: 250,
            },
            health: HealthConfig {
                samples_path: Some(dir.path().join("health.json")),
                ..HealthConfig::default()
            },
        };
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "rewards = 3").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::ParseFailed(_))));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "rewards = 3");
    }

    #[test]
    fn load_from_writes_default_file_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
        assert!(path.is_file());
    }

    #[test]
    fn unreadable_file_is_reported_and_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let bytes = b"[rewards]\nbase = 777\n# \xff\n";
        std::fs::write(&path, bytes).unwrap();

        assert!(matches!(Config::load_from(&path), Err(ConfigError::LoadFailed { .. })));
        assert_eq!(std::fs::read(&path).unwrap(), bytes);
    }

    #[test]
    fn availability_follows_environment() {
        // 2024-06-02 is a Sunday.
        let sunday = chrono::NaiveDate::from_ymd_opt(2024, 6, 2)
            .unwrap()
            .and_hms_opt(22, 0, 0)
            .unwrap();
        let monday = sunday + chrono::Duration::days(1);
        let cfg = Config::default();

        let (env, avail) = cfg.availability_at(Some(Environment::Production), &monday).unwrap();
        assert_eq!(env, Environment::Production);
        assert_eq!(avail, Availability::Closed { days_until_open: 6 });

        let (_, avail) = cfg.availability_at(Some(Environment::Production), &sunday).unwrap();
        assert!(avail.can_start());

        let (_, avail) = cfg.availability_at(Some(Environment::Development), &monday).unwrap();
        assert!(avail.can_start());
    }

    #[test]
    fn availability_rejects_bad_window_override() {
        let cfg = Config {
            window: Some(WindowConfig::weekly([9], 0, 23)),
            ..Config::default()
        };
        let now = chrono::NaiveDate::from_ymd_opt(2024, 6, 2)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert!(matches!(
            cfg.availability_at(Some(Environment::Staging), &now),
            Err(CoreError::Config(_))
        ));
    }
}
