//! Core error types for whocares-core.
//!
//! Every error here is local-recoverable: a rejected session transition leaves
//! the session in its prior state, and configuration problems surface at load
//! time rather than inside the gate or the scoring engine.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for whocares-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Session transition errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Check-in window errors
    #[error("Window error: {0}")]
    Window(#[from] WindowError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Rejected check-in session transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Answer outside the 1..=9 scale
    #[error("Invalid answer value {value}: must be between {min} and {max}")]
    InvalidAnswerValue { value: i64, min: u8, max: u8 },

    /// Transition not allowed from the current state
    #[error("Cannot {action} while {state}")]
    InvalidTransition { action: &'static str, state: String },

    /// Finalize requested before reaching the summary
    #[error("Session not complete: still answering question {step}")]
    SessionNotComplete { step: usize },
}

/// Check-in window errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    /// Restricted window with no usable weekday
    #[error("Invalid check-in window config: {0}")]
    InvalidWindowConfig(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Unknown deployment environment tag
    #[error("Unknown environment '{0}' (expected development, staging or production)")]
    UnknownEnvironment(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Catalog too short to run a check-in
    #[error("Question catalog needs at least {min} questions, got {len}")]
    CatalogTooShort { min: usize, len: usize },

    /// Two questions share an id
    #[error("Duplicate question id {0}")]
    DuplicateQuestionId(u32),

    /// Band table without a catch-all tier
    #[error("Score band table must end with a catch-all band")]
    MissingCatchAll,

    /// Band with nothing to say
    #[error("Score band '{0}' has an empty message pool")]
    EmptyMessagePool(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Health collaborator errors.
///
/// These never escape [`crate::health::HealthService`]: any of them degrades
/// to a zero bonus, so [`CoreError`] has no variant for them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HealthError {
    /// Platform has no health store
    #[error("Health data is not available on this platform")]
    Unavailable,

    /// Authorization request failed outright
    #[error("Health authorization failed: {0}")]
    AuthorizationFailed(String),

    /// Sample query failed
    #[error("Health query failed: {0}")]
    QueryFailed(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
