//! # WhoCares Core Library
//!
//! This library provides the core logic for the WhoCares weekly check-in:
//! the user rates a fixed sequence of questions, gets a score, a message
//! and a token reward, and can only do so while the check-in window is open.
//! Presentation (the CLI here, a mobile app elsewhere) is a thin layer that
//! renders whatever the core's state says.
//!
//! ## Architecture
//!
//! - **Window Gate**: pure functions deciding whether the window is open and
//!   how long until it opens again
//! - **Check-In Session**: a state machine over the question catalog; the
//!   caller drives deferred default seeding through `tick()`
//! - **Scoring Engine**: score, band, message and reward for a completed session
//! - **Health**: optional bonus points from a health-data collaborator
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`CheckInSession`]: Check-in state machine
//! - [`ScoringEngine`]: Turns a completed session into a [`CheckInResult`]
//! - [`WindowConfig`]: When check-ins are offered
//! - [`Config`]: Application configuration management

pub mod catalog;
pub mod error;
pub mod events;
pub mod health;
pub mod scoring;
pub mod session;
pub mod storage;
pub mod window;

pub use catalog::{Question, QuestionCatalog};
pub use error::{ConfigError, CoreError, HealthError, SessionError, ValidationError, WindowError};
pub use events::Event;
pub use health::{HealthBonus, HealthService, HealthSource};
pub use scoring::{BandTable, CheckInResult, RewardConfig, ScoreBand, ScoringEngine};
pub use session::{AnswerSet, CheckInSession, Phase};
pub use storage::Config;
pub use window::{Availability, Environment, WindowConfig, WindowStatus};
