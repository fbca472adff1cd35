//! Health-data bonus collaborator.
//!
//! A [`HealthSource`] stands in for the platform health store. The
//! [`HealthService`] wraps one source instance, tracks its authorization
//! status, caches the weekly summary for a fixed TTL, and turns the summary
//! into bonus points. Every failure along the way (no platform support,
//! denied authorization, query errors) degrades to a zero bonus.

mod file;

pub use file::{FileHealthSource, SampleFile};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::HealthError;

/// Days covered by a weekly summary.
pub const WEEK_DAYS: i64 = 7;

/// One reading from the health store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSample {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Step count for step samples; unused for sleep.
    #[serde(default)]
    pub value: f64,
}

impl HealthSample {
    pub fn duration_hours(&self) -> f64 {
        (self.end_date - self.start_date).num_seconds() as f64 / 3600.0
    }
}

/// Platform health store.
pub trait HealthSource {
    /// Ask for read access. `Ok(false)` means the user declined.
    fn request_authorization(&mut self) -> Result<bool, HealthError>;

    fn sleep_samples(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<HealthSample>, HealthError>;

    fn step_samples(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<HealthSample>, HealthError>;
}

/// Source for platforms without a health store.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableSource;

impl HealthSource for UnavailableSource {
    fn request_authorization(&mut self) -> Result<bool, HealthError> {
        Ok(false)
    }

    fn sleep_samples(&mut self, _: DateTime<Utc>, _: DateTime<Utc>) -> Result<Vec<HealthSample>, HealthError> {
        Err(HealthError::Unavailable)
    }

    fn step_samples(&mut self, _: DateTime<Utc>, _: DateTime<Utc>) -> Result<Vec<HealthSample>, HealthError> {
        Err(HealthError::Unavailable)
    }
}

/// Health bonus settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_sleep_hours_target")]
    pub sleep_hours_target: f64,
    #[serde(default = "default_daily_steps_target")]
    pub daily_steps_target: f64,
    /// JSON sample export read by [`FileHealthSource`].
    #[serde(default)]
    pub samples_path: Option<std::path::PathBuf>,
}

fn default_true() -> bool {
    true
}
fn default_cache_ttl_secs() -> u64 {
    5 * 60
}
fn default_sleep_hours_target() -> f64 {
    7.0
}
fn default_daily_steps_target() -> f64 {
    10_000.0
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_ttl_secs: default_cache_ttl_secs(),
            sleep_hours_target: default_sleep_hours_target(),
            daily_steps_target: default_daily_steps_target(),
            samples_path: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorizationStatus {
    Unknown,
    Authorized,
    Denied,
    Error,
}

/// Weekly averages and the points they earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyHealth {
    pub avg_sleep_hours: f64,
    pub avg_steps: f64,
    pub bonus_points: u32,
}

/// Extra points from health data. Zero when the collaborator had nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthBonus {
    pub points: u32,
}

impl HealthBonus {
    pub const NONE: HealthBonus = HealthBonus { points: 0 };
}

/// Summarize a week of samples against the configured targets.
pub fn summarize_week(sleep: &[HealthSample], steps: &[HealthSample], config: &HealthConfig) -> WeeklyHealth {
    let days = WEEK_DAYS as f64;
    let avg_sleep_hours = sleep.iter().map(HealthSample::duration_hours).sum::<f64>() / days;
    let avg_steps = steps.iter().map(|s| s.value).sum::<f64>() / days;

    let mut bonus_points = 0;
    if avg_sleep_hours >= config.sleep_hours_target {
        bonus_points += 1;
    }
    if avg_steps >= config.daily_steps_target {
        bonus_points += 1;
    }

    WeeklyHealth {
        avg_sleep_hours,
        avg_steps,
        bonus_points,
    }
}

#[derive(Debug, Clone)]
struct CachedWeek {
    summary: WeeklyHealth,
    fetched_at: DateTime<Utc>,
}

/// One health collaborator instance with its own cache.
#[derive(Debug)]
pub struct HealthService<S> {
    source: S,
    config: HealthConfig,
    status: AuthorizationStatus,
    cache: Option<CachedWeek>,
}

impl<S: HealthSource> HealthService<S> {
    pub fn new(source: S, config: HealthConfig) -> Self {
        Self {
            source,
            config,
            status: AuthorizationStatus::Unknown,
            cache: None,
        }
    }

    pub fn status(&self) -> AuthorizationStatus {
        self.status
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Drop the cached summary so the next call queries the source.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    /// Request authorization unless already granted.
    pub fn authorize(&mut self) -> bool {
        if self.status == AuthorizationStatus::Authorized {
            return true;
        }
        match self.source.request_authorization() {
            Ok(true) => {
                self.status = AuthorizationStatus::Authorized;
                tracing::info!("health data authorized");
                true
            }
            Ok(false) => {
                self.status = AuthorizationStatus::Denied;
                tracing::info!("health data authorization denied");
                false
            }
            Err(e) => {
                self.status = AuthorizationStatus::Error;
                tracing::warn!(error = %e, "health authorization failed");
                false
            }
        }
    }

    /// The summary for the seven days before `now`, from cache when fresh.
    pub fn weekly_summary(&mut self, now: DateTime<Utc>) -> Option<WeeklyHealth> {
        if !self.config.enabled || !self.authorize() {
            return None;
        }

        if let Some(cached) = &self.cache {
            if !self.is_stale(cached, now) {
                return Some(cached.summary.clone());
            }
        }

        let start = now - Duration::days(WEEK_DAYS);
        let sleep = self.source.sleep_samples(start, now).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to fetch sleep samples");
            Vec::new()
        });
        let steps = self.source.step_samples(start, now).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to fetch step samples");
            Vec::new()
        });

        let summary = summarize_week(&sleep, &steps, &self.config);
        tracing::debug!(
            avg_sleep_hours = summary.avg_sleep_hours,
            avg_steps = summary.avg_steps,
            points = summary.bonus_points,
            "weekly health summary"
        );
        self.cache = Some(CachedWeek {
            summary: summary.clone(),
            fetched_at: now,
        });
        Some(summary)
    }

    /// Bonus points for the week; zero whenever data is missing.
    pub fn bonus(&mut self, now: DateTime<Utc>) -> HealthBonus {
        self.weekly_summary(now)
            .map(|s| HealthBonus { points: s.bonus_points })
            .unwrap_or(HealthBonus::NONE)
    }

    fn is_stale(&self, cached: &CachedWeek, now: DateTime<Utc>) -> bool {
        // TTLs past what chrono can represent never expire.
        let ttl = i64::try_from(self.config.cache_ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX);
        now - cached.fetched_at > ttl
    }
}
