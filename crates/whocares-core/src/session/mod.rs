mod answers;
mod deferred;
mod machine;

pub use answers::{validate_answer, AnswerSet, DEFAULT_ANSWER, MAX_ANSWER, MIN_ANSWER};
pub use deferred::DEFAULT_SEED_DELAY_MS;
pub use machine::{CheckInSession, Phase, SessionView};
