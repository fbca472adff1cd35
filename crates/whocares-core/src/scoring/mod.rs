mod bands;
mod engine;
mod picker;

pub use bands::{BandMessage, BandTable, ScoreBand, Threshold};
pub use engine::{
    compute_reward, compute_score, pick_message, BreakdownLine, CheckInResult, Reward,
    RewardConfig, ScoringEngine,
};
pub use picker::{MessagePicker, RngPicker};
