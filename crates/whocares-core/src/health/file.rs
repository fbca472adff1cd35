use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{HealthSample, HealthSource};
use crate::error::HealthError;

/// On-disk export of health samples.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SampleFile {
    #[serde(default)]
    pub sleep: Vec<HealthSample>,
    #[serde(default)]
    pub steps: Vec<HealthSample>,
}

/// Health source backed by a JSON export file.
///
/// A missing file reads as declined authorization; an unreadable one as a
/// query failure.
#[derive(Debug, Clone)]
pub struct FileHealthSource {
    path: PathBuf,
}

impl FileHealthSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<SampleFile, HealthError> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| HealthError::QueryFailed(format!("{}: {e}", self.path.display())))?;
        serde_json::from_str(&content)
            .map_err(|e| HealthError::QueryFailed(format!("{}: {e}", self.path.display())))
    }
}

fn within(samples: Vec<HealthSample>, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<HealthSample> {
    samples
        .into_iter()
        .filter(|s| s.start_date >= start && s.start_date < end)
        .collect()
}

impl HealthSource for FileHealthSource {
    fn request_authorization(&mut self) -> Result<bool, HealthError> {
        Ok(self.path.is_file())
    }

    fn sleep_samples(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<HealthSample>, HealthError> {
        Ok(within(self.load()?.sleep, start, end))
    }

    fn step_samples(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<HealthSample>, HealthError> {
        Ok(within(self.load()?.steps, start, end))
    }
}
