use serde::{Deserialize, Serialize};

use crate::error::SessionError;

pub const MIN_ANSWER: u8 = 1;
pub const MAX_ANSWER: u8 = 9;
/// Neutral midpoint every question starts at.
pub const DEFAULT_ANSWER: u8 = 6;

/// Check a raw input against the 1..=9 scale.
///
/// # Errors
///
/// Returns [`SessionError::InvalidAnswerValue`] for anything outside the scale.
pub fn validate_answer(value: i64) -> Result<u8, SessionError> {
    if (i64::from(MIN_ANSWER)..=i64::from(MAX_ANSWER)).contains(&value) {
        Ok(value as u8)
    } else {
        Err(SessionError::InvalidAnswerValue {
            value,
            min: MIN_ANSWER,
            max: MAX_ANSWER,
        })
    }
}

/// One value per question, index-aligned with the catalog.
///
/// Every entry is always in range; unanswered entries hold
/// [`DEFAULT_ANSWER`]. `chosen` records whether a value was set explicitly,
/// either by the user or by deferred default seeding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSet {
    values: Vec<u8>,
    chosen: Vec<bool>,
}

impl AnswerSet {
    pub fn with_len(len: usize) -> Self {
        Self {
            values: vec![DEFAULT_ANSWER; len],
            chosen: vec![false; len],
        }
    }

    /// Build a fully chosen answer set from raw values.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidAnswerValue`] for the first value outside
    /// the scale.
    pub fn from_values(values: &[i64]) -> Result<Self, SessionError> {
        let values = values
            .iter()
            .map(|&v| validate_answer(v))
            .collect::<Result<Vec<_>, _>>()?;
        let chosen = vec![true; values.len()];
        Ok(Self { values, chosen })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<u8> {
        self.values.get(index).copied()
    }

    pub fn values(&self) -> &[u8] {
        &self.values
    }

    pub fn is_chosen(&self, index: usize) -> bool {
        self.chosen.get(index).copied().unwrap_or(false)
    }

    pub fn chosen(&self) -> &[bool] {
        &self.chosen
    }

    pub(crate) fn set(&mut self, index: usize, value: u8) {
        self.values[index] = value;
        self.chosen[index] = true;
    }
}
