//! Scoring engine.
//!
//! Everything here is a pure function of its inputs except message
//! selection, which goes through an injected [`MessagePicker`].

use chrono::{DateTime, Utc};
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::bands::{BandMessage, BandTable, ScoreBand};
use super::picker::{MessagePicker, RngPicker};
use crate::catalog::QuestionCatalog;
use crate::error::SessionError;
use crate::events::Event;
use crate::health::HealthBonus;
use crate::session::{AnswerSet, CheckInSession};

/// Token reward settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Paid for every completed check-in
    #[serde(default = "default_base")]
    pub base: i64,
    /// Tokens per health bonus point
    #[serde(default = "default_health_point_value")]
    pub health_point_value: i64,
}

fn default_base() -> i64 {
    10_000
}
fn default_health_point_value() -> i64 {
    500
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            base: default_base(),
            health_point_value: default_health_point_value(),
        }
    }
}

/// Band bonus and running total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub bonus: i64,
    pub total: i64,
}

/// One receipt line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownLine {
    pub question_id: u32,
    pub label: String,
    pub glyph: String,
    /// `+1` or `-1`
    pub weight: i32,
    pub value: u8,
}

impl BreakdownLine {
    pub fn signed_value(&self) -> i32 {
        self.weight * i32::from(self.value)
    }
}

/// Outcome of a finished check-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInResult {
    pub session_id: Uuid,
    pub score: i32,
    pub band: ScoreBand,
    pub message: String,
    pub glyph: String,
    pub base_reward: i64,
    pub bonus_reward: i64,
    pub health_bonus: i64,
    pub total_reward: i64,
    pub breakdown: Vec<BreakdownLine>,
    pub completed_at: DateTime<Utc>,
}

impl CheckInResult {
    pub fn finalized_event(&self) -> Event {
        Event::CheckInFinalized {
            session_id: self.session_id,
            score: self.score,
            band: self.band.name.clone(),
            total_reward: self.total_reward,
            at: self.completed_at,
        }
    }
}

/// Weighted sum of the answers: regular questions add, inverted ones subtract.
///
/// `answers` must be index-aligned with `catalog`; a session always is.
pub fn compute_score(answers: &AnswerSet, catalog: &QuestionCatalog) -> i32 {
    debug_assert_eq!(
        answers.len(),
        catalog.len(),
        "answer set does not match the question catalog"
    );
    catalog
        .iter()
        .zip(answers.values())
        .map(|(q, &v)| q.weight() * i32::from(v))
        .sum()
}

/// Uniform pick from the band's message pool.
pub fn pick_message(band: &ScoreBand, picker: &mut dyn MessagePicker) -> BandMessage {
    if band.messages.is_empty() {
        return BandMessage::default();
    }
    let index = picker.pick_index(band.messages.len());
    band.messages
        .get(index)
        .or_else(|| band.messages.first())
        .cloned()
        .unwrap_or_default()
}

pub fn compute_reward(band: &ScoreBand, base_reward: i64) -> Reward {
    let bonus = band.bonus_reward;
    Reward {
        bonus,
        total: base_reward + bonus,
    }
}

/// Turns completed sessions into results.
pub struct ScoringEngine<P = RngPicker<Mcg128Xsl64>> {
    bands: BandTable,
    rewards: RewardConfig,
    picker: P,
}

impl ScoringEngine {
    /// Standard bands with an entropy-seeded picker.
    pub fn new(rewards: RewardConfig) -> Self {
        Self::with_parts(BandTable::standard(), rewards, RngPicker::from_entropy())
    }

    /// Standard bands with a reproducible picker.
    pub fn seeded(rewards: RewardConfig, seed: u64) -> Self {
        Self::with_parts(BandTable::standard(), rewards, RngPicker::seeded(seed))
    }
}

impl<P: MessagePicker> ScoringEngine<P> {
    pub fn with_parts(bands: BandTable, rewards: RewardConfig, picker: P) -> Self {
        Self {
            bands,
            rewards,
            picker,
        }
    }

    pub fn bands(&self) -> &BandTable {
        &self.bands
    }

    pub fn rewards(&self) -> &RewardConfig {
        &self.rewards
    }

    /// Score a session that reached the summary.
    ///
    /// # Errors
    ///
    /// [`SessionError::SessionNotComplete`] while the session is still
    /// answering questions.
    pub fn finalize(
        &mut self,
        session: &CheckInSession,
        health: HealthBonus,
    ) -> Result<CheckInResult, SessionError> {
        if !session.is_complete() {
            return Err(SessionError::SessionNotComplete {
                step: session.step_index(),
            });
        }

        let catalog = session.catalog();
        let answers = session.answers();
        let score = compute_score(answers, catalog);
        let band = self.bands.select(score).clone();
        let message = pick_message(&band, &mut self.picker);
        let reward = compute_reward(&band, self.rewards.base);
        let health_bonus = i64::from(health.points) * self.rewards.health_point_value;

        let breakdown = catalog
            .iter()
            .zip(answers.values())
            .map(|(q, &value)| BreakdownLine {
                question_id: q.id,
                label: q.label.clone(),
                glyph: q.glyph.clone(),
                weight: q.weight(),
                value,
            })
            .collect();

        tracing::info!(
            session_id = %session.id(),
            score,
            band = %band.name,
            total = reward.total + health_bonus,
            "check-in finalized"
        );

        Ok(CheckInResult {
            session_id: session.id(),
            score,
            message: message.text,
            glyph: message.glyph,
            base_reward: self.rewards.base,
            bonus_reward: reward.bonus,
            health_bonus,
            total_reward: reward.total + health_bonus,
            band,
            breakdown,
            completed_at: Utc::now(),
        })
    }
}
