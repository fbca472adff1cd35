use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Deployment environment tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// The check-in window preset for this environment.
    pub fn window_config(self) -> WindowConfig {
        match self {
            Environment::Development => WindowConfig::always_open(),
            // Sunday only, all day.
            Environment::Staging | Environment::Production => {
                WindowConfig::weekly([0], 0, 23)
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(ConfigError::UnknownEnvironment(other.to_string())),
        }
    }
}

/// When check-ins are offered.
///
/// Weekdays count from Sunday (`0`) to Saturday (`6`). Hours are local
/// wall-clock hours and both bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default)]
    pub always_open: bool,
    #[serde(default)]
    pub allowed_weekdays: BTreeSet<u8>,
    #[serde(default)]
    pub start_hour: u8,
    #[serde(default = "default_end_hour")]
    pub end_hour: u8,
}

fn default_end_hour() -> u8 {
    23
}

impl Default for WindowConfig {
    fn default() -> Self {
        Environment::default().window_config()
    }
}

impl WindowConfig {
    pub fn always_open() -> Self {
        Self {
            always_open: true,
            allowed_weekdays: (0..=6).collect(),
            start_hour: 0,
            end_hour: 23,
        }
    }

    pub fn weekly(weekdays: impl IntoIterator<Item = u8>, start_hour: u8, end_hour: u8) -> Self {
        Self {
            always_open: false,
            allowed_weekdays: weekdays.into_iter().collect(),
            start_hour,
            end_hour,
        }
    }

    /// Load-time sanity check.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a restricted window has no
    /// weekdays, a weekday is above 6, an hour is above 23, or the start hour
    /// comes after the end hour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(&day) = self.allowed_weekdays.iter().find(|&&d| d > 6) {
            return Err(invalid("window.allowed_weekdays", format!("weekday {day} is not in 0..=6")));
        }
        if self.always_open {
            return Ok(());
        }
        if self.allowed_weekdays.is_empty() {
            return Err(invalid(
                "window.allowed_weekdays",
                "a restricted window needs at least one weekday".to_string(),
            ));
        }
        if self.start_hour > 23 || self.end_hour > 23 {
            return Err(invalid(
                "window.end_hour",
                format!("hours must be in 0..=23 (got {}..={})", self.start_hour, self.end_hour),
            ));
        }
        if self.start_hour > self.end_hour {
            return Err(invalid(
                "window.start_hour",
                format!("start hour {} is after end hour {}", self.start_hour, self.end_hour),
            ));
        }
        Ok(())
    }
}

fn invalid(key: &str, message: String) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    }
}
