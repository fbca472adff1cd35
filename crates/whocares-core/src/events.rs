use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::SessionView;

/// Every session transition produces an Event.
/// The presentation layer renders from them; nothing here is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        session_id: Uuid,
        question_count: usize,
        at: DateTime<Utc>,
    },
    ValueSelected {
        session_id: Uuid,
        step_index: usize,
        value: u8,
        at: DateTime<Utc>,
    },
    /// The deferred default landed on a step nobody answered yet.
    DefaultSeeded {
        session_id: Uuid,
        step_index: usize,
        value: u8,
        at: DateTime<Utc>,
    },
    StepAdvanced {
        session_id: Uuid,
        from_step: usize,
        to_step: usize,
        at: DateTime<Utc>,
    },
    StepReturned {
        session_id: Uuid,
        from_step: usize,
        to_step: usize,
        at: DateTime<Utc>,
    },
    SummaryReached {
        session_id: Uuid,
        answers: Vec<u8>,
        at: DateTime<Utc>,
    },
    /// User left the summary to change answers.
    EditReopened {
        session_id: Uuid,
        step_index: usize,
        at: DateTime<Utc>,
    },
    SessionClosed {
        session_id: Uuid,
        completed: bool,
        at: DateTime<Utc>,
    },
    CheckInFinalized {
        session_id: Uuid,
        score: i32,
        band: String,
        total_reward: i64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        view: SessionView,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Wire name of the variant, matching the serialized `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::SessionStarted { .. } => "SessionStarted",
            Event::ValueSelected { .. } => "ValueSelected",
            Event::DefaultSeeded { .. } => "DefaultSeeded",
            Event::StepAdvanced { .. } => "StepAdvanced",
            Event::StepReturned { .. } => "StepReturned",
            Event::SummaryReached { .. } => "SummaryReached",
            Event::EditReopened { .. } => "EditReopened",
            Event::SessionClosed { .. } => "SessionClosed",
            Event::CheckInFinalized { .. } => "CheckInFinalized",
            Event::StateSnapshot { .. } => "StateSnapshot",
        }
    }
}
