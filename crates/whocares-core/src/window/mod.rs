mod config;
mod gate;

pub use config::{Environment, WindowConfig};
pub use gate::{availability, evaluate, next_open_in_days, Availability, WindowStatus, ALWAYS_OPEN_HOURS};
