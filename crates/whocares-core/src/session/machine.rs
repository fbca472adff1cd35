//! Check-in session state machine.
//!
//! A session exists only while the user is checking in: it is created by
//! [`CheckInSession::start`] and ends when [`CheckInSession::close`] consumes
//! it. Like the rest of the core it has no internal threads; the caller drives
//! deferred default seeding through [`CheckInSession::tick`].
//!
//! ## State Transitions
//!
//! ```text
//! Questioning(0) -confirm-> Questioning(1) ... Questioning(N-1) -confirm-> Summary
//!                <--back---                                     <--edit---
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut session = CheckInSession::start(QuestionCatalog::standard());
//! session.select_value(8)?;
//! session.confirm()?;
//! // In the UI loop:
//! session.tick(); // Returns Some(Event::DefaultSeeded) once the seed delay passes
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::answers::{validate_answer, AnswerSet, DEFAULT_ANSWER};
use super::deferred::StepScope;
use crate::catalog::{Question, QuestionCatalog};
use crate::error::SessionError;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Questioning,
    Summary,
}

/// What the presentation layer renders after every transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub phase: Phase,
    pub step_index: usize,
    pub question_count: usize,
    pub answers: Vec<u8>,
    pub chosen: Vec<bool>,
    /// The question on screen while answering.
    pub question: Option<Question>,
    pub seed_pending: bool,
}

/// One user's in-progress check-in.
#[derive(Debug)]
pub struct CheckInSession {
    id: Uuid,
    catalog: QuestionCatalog,
    phase: Phase,
    step_index: usize,
    answers: AnswerSet,
    scope: StepScope,
}

impl CheckInSession {
    /// Begin a check-in on the first question with every answer at the default.
    pub fn start(catalog: QuestionCatalog) -> Self {
        Self::start_at(catalog, now_ms())
    }

    /// [`start`](Self::start) with an explicit clock reading.
    pub fn start_at(catalog: QuestionCatalog, now_ms: u64) -> Self {
        let answers = AnswerSet::with_len(catalog.len());
        let id = Uuid::new_v4();
        tracing::info!(session_id = %id, questions = catalog.len(), "check-in started");
        Self {
            id,
            catalog,
            phase: Phase::Questioning,
            step_index: 0,
            answers,
            scope: StepScope::enter(0, true, now_ms),
        }
    }

    /// The event announcing this session, for callers that publish events.
    pub fn started_event(&self) -> Event {
        Event::SessionStarted {
            session_id: self.id,
            question_count: self.catalog.len(),
            at: Utc::now(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Summary
    }

    /// The question being answered, `None` on the summary.
    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            Phase::Questioning => self.catalog.get(self.step_index),
            Phase::Summary => None,
        }
    }

    /// When the pending default seed for the current step fires, if any.
    pub fn pending_seed_due_ms(&self) -> Option<u64> {
        self.scope.due_at_ms()
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            session_id: self.id,
            phase: self.phase,
            step_index: self.step_index,
            question_count: self.catalog.len(),
            answers: self.answers.values().to_vec(),
            chosen: self.answers.chosen().to_vec(),
            question: self.current_question().cloned(),
            seed_pending: self.scope.due_at_ms().is_some(),
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            view: self.view(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Set the value for the current question.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidAnswerValue`] outside 1..=9,
    /// [`SessionError::InvalidTransition`] on the summary.
    pub fn select_value(&mut self, value: i64) -> Result<Event, SessionError> {
        self.require_questioning("select a value")?;
        let value = validate_answer(value)?;
        self.answers.set(self.step_index, value);
        self.scope.cancel();
        tracing::debug!(session_id = %self.id, step = self.step_index, value, "value selected");
        Ok(Event::ValueSelected {
            session_id: self.id,
            step_index: self.step_index,
            value,
            at: Utc::now(),
        })
    }

    /// Accept the current answer: next question, or the summary after the last.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidTransition`] on the summary.
    pub fn confirm(&mut self) -> Result<Event, SessionError> {
        self.confirm_at(now_ms())
    }

    pub fn confirm_at(&mut self, now_ms: u64) -> Result<Event, SessionError> {
        self.require_questioning("confirm")?;
        let from = self.step_index;

        if from < self.catalog.last_index() {
            self.enter_step(from + 1, now_ms);
            tracing::debug!(session_id = %self.id, from, to = self.step_index, "step advanced");
            return Ok(Event::StepAdvanced {
                session_id: self.id,
                from_step: from,
                to_step: self.step_index,
                at: Utc::now(),
            });
        }

        self.phase = Phase::Summary;
        self.scope = StepScope::idle(from);
        tracing::debug!(session_id = %self.id, answers = ?self.answers.values(), "summary reached");
        Ok(Event::SummaryReached {
            session_id: self.id,
            answers: self.answers.values().to_vec(),
            at: Utc::now(),
        })
    }

    /// Go to the previous question without touching any answer.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidTransition`] on the first question or the summary.
    pub fn back(&mut self) -> Result<Event, SessionError> {
        self.back_at(now_ms())
    }

    pub fn back_at(&mut self, now_ms: u64) -> Result<Event, SessionError> {
        self.require_questioning("go back")?;
        if self.step_index == 0 {
            return Err(self.invalid("go back"));
        }
        let from = self.step_index;
        self.enter_step(from - 1, now_ms);
        tracing::debug!(session_id = %self.id, from, to = self.step_index, "step returned");
        Ok(Event::StepReturned {
            session_id: self.id,
            from_step: from,
            to_step: self.step_index,
            at: Utc::now(),
        })
    }

    /// Leave the summary and reopen the last question.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidTransition`] while still answering.
    pub fn edit(&mut self) -> Result<Event, SessionError> {
        self.edit_at(now_ms())
    }

    pub fn edit_at(&mut self, now_ms: u64) -> Result<Event, SessionError> {
        if self.phase != Phase::Summary {
            return Err(self.invalid("edit"));
        }
        self.phase = Phase::Questioning;
        self.enter_step(self.catalog.last_index(), now_ms);
        tracing::debug!(session_id = %self.id, step = self.step_index, "editing reopened");
        Ok(Event::EditReopened {
            session_id: self.id,
            step_index: self.step_index,
            at: Utc::now(),
        })
    }

    /// End the session from any state. Any pending seed goes with it.
    pub fn close(self) -> Event {
        let completed = self.is_complete();
        tracing::info!(session_id = %self.id, completed, "check-in closed");
        Event::SessionClosed {
            session_id: self.id,
            completed,
            at: Utc::now(),
        }
    }

    /// Call periodically. Returns `Some(Event::DefaultSeeded)` when the
    /// current step's default seed fires.
    pub fn tick(&mut self) -> Option<Event> {
        self.tick_at(now_ms())
    }

    pub fn tick_at(&mut self, now_ms: u64) -> Option<Event> {
        let step = self.scope.take_due(now_ms)?;
        self.answers.set(step, DEFAULT_ANSWER);
        tracing::debug!(session_id = %self.id, step, "default seeded");
        Some(Event::DefaultSeeded {
            session_id: self.id,
            step_index: step,
            value: DEFAULT_ANSWER,
            at: Utc::now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn enter_step(&mut self, step: usize, now_ms: u64) {
        self.step_index = step;
        self.scope = StepScope::enter(step, !self.answers.is_chosen(step), now_ms);
    }

    fn require_questioning(&self, action: &'static str) -> Result<(), SessionError> {
        match self.phase {
            Phase::Questioning => Ok(()),
            Phase::Summary => Err(self.invalid(action)),
        }
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        let state = match self.phase {
            Phase::Questioning => format!("on question {} of {}", self.step_index + 1, self.catalog.len()),
            Phase::Summary => "viewing the summary".to_string(),
        };
        SessionError::InvalidTransition { action, state }
    }
}

pub(crate) fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Question;

    fn session() -> CheckInSession {
        CheckInSession::start_at(QuestionCatalog::standard(), 0)
    }

    #[test]
    fn start_on_first_question_with_defaults() {
        let s = session();
        assert_eq!(s.phase(), Phase::Questioning);
        assert_eq!(s.step_index(), 0);
        assert_eq!(s.answers().values(), &[6, 6, 6, 6]);
        assert_eq!(s.current_question().unwrap().id, 1);
    }

    #[test]
    fn select_value_bounds() {
        let mut s = session();
        assert!(matches!(
            s.select_value(0),
            Err(SessionError::InvalidAnswerValue { value: 0, .. })
        ));
        assert!(matches!(
            s.select_value(10),
            Err(SessionError::InvalidAnswerValue { value: 10, .. })
        ));
        assert_eq!(s.answers().get(0), Some(6));

        s.select_value(1).unwrap();
        assert_eq!(s.answers().get(0), Some(1));
        s.select_value(9).unwrap();
        assert_eq!(s.answers().get(0), Some(9));
        assert_eq!(s.step_index(), 0);
        assert_eq!(s.phase(), Phase::Questioning);
    }

    #[test]
    fn confirm_walks_to_summary() {
        let mut s = session();
        for expected in 1..4 {
            let event = s.confirm_at(0).unwrap();
            assert!(matches!(event, Event::StepAdvanced { to_step, .. } if to_step == expected));
        }
        let event = s.confirm_at(0).unwrap();
        assert!(matches!(event, Event::SummaryReached { .. }));
        assert_eq!(s.phase(), Phase::Summary);
        assert_eq!(s.step_index(), 3);
        assert!(s.current_question().is_none());
    }

    #[test]
    fn back_rejected_on_first_question() {
        let mut s = session();
        let err = s.back_at(0).unwrap_err();
        assert!(matches!(err, SessionError::InvalidTransition { action: "go back", .. }));
        assert_eq!(s.step_index(), 0);
    }

    #[test]
    fn navigation_round_trip_keeps_answers() {
        let mut s = session();
        let picks = [8, 3, 5, 2];
        for (i, v) in picks.iter().enumerate() {
            s.select_value(*v).unwrap();
            if i < 3 {
                s.confirm_at(0).unwrap();
            }
        }
        for _ in 0..3 {
            s.back_at(0).unwrap();
        }
        assert_eq!(s.step_index(), 0);
        assert_eq!(s.answers().values(), &[8, 3, 5, 2]);
    }

    #[test]
    fn revisited_step_keeps_stored_value() {
        let mut s = session();
        s.confirm_at(0).unwrap();
        s.select_value(2).unwrap();
        s.back_at(0).unwrap();
        s.confirm_at(0).unwrap();
        assert_eq!(s.answers().get(1), Some(2));
    }

    #[test]
    fn commands_rejected_on_summary() {
        let mut s = session();
        for _ in 0..4 {
            s.confirm_at(0).unwrap();
        }
        assert!(matches!(s.select_value(5), Err(SessionError::InvalidTransition { .. })));
        assert!(matches!(s.confirm_at(0), Err(SessionError::InvalidTransition { .. })));
        assert!(matches!(s.back_at(0), Err(SessionError::InvalidTransition { .. })));
        assert_eq!(s.phase(), Phase::Summary);
    }

    #[test]
    fn edit_rejected_while_questioning() {
        let mut s = session();
        let err = s.edit_at(0).unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidTransition {
                action: "edit",
                state: "on question 1 of 4".to_string()
            }
        );
    }

    #[test]
    fn edit_lands_on_last_question() {
        let mut s = session();
        s.confirm_at(0).unwrap();
        s.back_at(0).unwrap();
        s.confirm_at(0).unwrap();
        s.confirm_at(0).unwrap();
        s.back_at(0).unwrap();
        s.confirm_at(0).unwrap();
        s.confirm_at(0).unwrap();
        assert_eq!(s.step_index(), 3);
        s.confirm_at(0).unwrap();
        assert_eq!(s.phase(), Phase::Summary);

        s.edit_at(0).unwrap();
        assert_eq!(s.phase(), Phase::Questioning);
        assert_eq!(s.step_index(), 3);
    }

    #[test]
    fn default_seed_fires_after_delay() {
        let mut s = session();
        assert_eq!(s.pending_seed_due_ms(), Some(100));
        assert!(s.tick_at(99).is_none());
        assert!(!s.answers().is_chosen(0));

        let event = s.tick_at(100).unwrap();
        assert!(matches!(event, Event::DefaultSeeded { step_index: 0, value: 6, .. }));
        assert!(s.answers().is_chosen(0));
        assert!(s.tick_at(1_000).is_none());
    }

    #[test]
    fn leaving_step_cancels_its_seed() {
        let mut s = session();
        s.confirm_at(10).unwrap();
        let event = s.tick_at(u64::MAX).unwrap();
        assert!(matches!(event, Event::DefaultSeeded { step_index: 1, .. }));
        assert!(!s.answers().is_chosen(0));
    }

    #[test]
    fn selecting_cancels_seed() {
        let mut s = session();
        s.select_value(3).unwrap();
        assert_eq!(s.pending_seed_due_ms(), None);
        assert!(s.tick_at(u64::MAX).is_none());
        assert_eq!(s.answers().get(0), Some(3));
    }

    #[test]
    fn chosen_step_is_not_reseeded_on_return() {
        let mut s = session();
        s.select_value(4).unwrap();
        s.confirm_at(0).unwrap();
        s.back_at(50).unwrap();
        assert_eq!(s.pending_seed_due_ms(), None);
        assert_eq!(s.answers().get(0), Some(4));
    }

    #[test]
    fn summary_has_no_pending_seed() {
        let mut s = session();
        for _ in 0..4 {
            s.confirm_at(0).unwrap();
        }
        assert_eq!(s.pending_seed_due_ms(), None);
        assert!(s.tick_at(u64::MAX).is_none());
    }

    #[test]
    fn close_reports_completion() {
        let s = session();
        assert!(matches!(s.close(), Event::SessionClosed { completed: false, .. }));

        let mut s = session();
        for _ in 0..4 {
            s.confirm_at(0).unwrap();
        }
        assert!(matches!(s.close(), Event::SessionClosed { completed: true, .. }));
    }

    #[test]
    fn works_with_two_question_catalog() {
        let catalog = QuestionCatalog::new(vec![
            Question::new(1, "Mood", "How was your mood?", "🙂"),
            Question::new(2, "Stress", "How stressed were you?", "😓").inverted(),
        ])
        .unwrap();
        let mut s = CheckInSession::start_at(catalog, 0);
        s.confirm_at(0).unwrap();
        assert!(matches!(s.confirm_at(0).unwrap(), Event::SummaryReached { .. }));
        s.edit_at(0).unwrap();
        assert_eq!(s.step_index(), 1);
    }

    #[test]
    fn view_reflects_state() {
        let mut s = session();
        s.select_value(7).unwrap();
        let view = s.view();
        assert_eq!(view.phase, Phase::Questioning);
        assert_eq!(view.answers, vec![7, 6, 6, 6]);
        assert_eq!(view.chosen, vec![true, false, false, false]);
        assert_eq!(view.question.unwrap().label, "Productivity");
        assert!(!view.seed_pending);
    }
}
