//! Deferred default seeding.
//!
//! When a question first becomes visible and nothing has been chosen for it
//! yet, the default value is written after a short delay so entry animations
//! can settle. The pending write lives inside a [`StepScope`]; the session
//! replaces its scope on every step change and drops it on close, so a seed
//! can only ever land on the step that scheduled it.

/// Delay between entering a step and seeding its default.
pub const DEFAULT_SEED_DELAY_MS: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingSeed {
    due_at_ms: u64,
}

/// Lifetime of "being on this step".
#[derive(Debug)]
pub(crate) struct StepScope {
    step: usize,
    pending: Option<PendingSeed>,
}

impl StepScope {
    /// Enter `step`, scheduling a seed when it has no chosen value.
    pub(crate) fn enter(step: usize, needs_seed: bool, now_ms: u64) -> Self {
        let pending = needs_seed.then(|| PendingSeed {
            due_at_ms: now_ms.saturating_add(DEFAULT_SEED_DELAY_MS),
        });
        Self { step, pending }
    }

    /// A scope with nothing scheduled.
    pub(crate) fn idle(step: usize) -> Self {
        Self { step, pending: None }
    }

    pub(crate) fn cancel(&mut self) {
        self.pending = None;
    }

    pub(crate) fn due_at_ms(&self) -> Option<u64> {
        self.pending.map(|p| p.due_at_ms)
    }

    /// Fire the pending seed if it is due, returning the step it belongs to.
    /// A seed fires at most once.
    pub(crate) fn take_due(&mut self, now_ms: u64) -> Option<usize> {
        match self.pending {
            Some(p) if now_ms >= p.due_at_ms => {
                self.pending = None;
                Some(self.step)
            }
            _ => None,
        }
    }
}
