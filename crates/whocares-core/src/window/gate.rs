//! Check-in window gate.
//!
//! Pure functions of wall-clock time and a [`WindowConfig`]. Nothing is cached:
//! the presentation layer calls [`evaluate`] whenever it wants a fresh answer
//! and keeps the returned [`WindowStatus`] as a snapshot for the lifetime of
//! the screen that asked.

use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};

use super::config::WindowConfig;
use crate::error::WindowError;

/// Reported as `hours_remaining` when the window never closes.
pub const ALWAYS_OPEN_HOURS: u32 = 24;

/// Result of evaluating the window at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowStatus {
    pub is_open: bool,
    /// Whole hours until the window closes. `0` while closed, and also during
    /// the final open hour.
    pub hours_remaining: u32,
}

impl WindowStatus {
    const CLOSED: WindowStatus = WindowStatus {
        is_open: false,
        hours_remaining: 0,
    };

    /// True when open with at most one hour left.
    pub fn closing_soon(&self) -> bool {
        self.is_open && self.hours_remaining <= 1
    }
}

/// What the home screen should tell the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Availability {
    Open { hours_remaining: u32 },
    ClosingSoon { hours_remaining: u32 },
    Closed { days_until_open: u32 },
}

impl Availability {
    pub fn headline(&self) -> String {
        match self {
            Availability::Open { .. } => "check-in is open!".to_string(),
            Availability::ClosingSoon { .. } => "1 hour left!".to_string(),
            Availability::Closed { days_until_open } => {
                format!("check-in closed, come back in {days_until_open} days")
            }
        }
    }

    pub fn can_start(&self) -> bool {
        !matches!(self, Availability::Closed { .. })
    }
}

/// Decide whether the check-in window is open at `now`.
///
/// The end hour is inclusive: with `end_hour = 23` the window is still open at
/// 23:59.
pub fn evaluate<T: Datelike + Timelike>(now: &T, config: &WindowConfig) -> WindowStatus {
    if config.always_open {
        return WindowStatus {
            is_open: true,
            hours_remaining: ALWAYS_OPEN_HOURS,
        };
    }

    let weekday = now.weekday().num_days_from_sunday() as u8;
    if !config.allowed_weekdays.contains(&weekday) {
        return WindowStatus::CLOSED;
    }

    let hour = now.hour();
    let start = u32::from(config.start_hour);
    let end = u32::from(config.end_hour);
    if hour < start || hour > end {
        return WindowStatus::CLOSED;
    }

    WindowStatus {
        is_open: true,
        hours_remaining: end - hour,
    }
}

/// Days until the next allowed weekday after today.
///
/// Assumes the window is currently closed. Today's weekday is never returned
/// as "0 days away": if today is the only allowed day the answer is 7.
///
/// # Errors
///
/// Returns [`WindowError::InvalidWindowConfig`] for a restricted window with
/// no allowed weekdays.
pub fn next_open_in_days<T: Datelike>(now: &T, config: &WindowConfig) -> Result<u32, WindowError> {
    if config.always_open {
        return Ok(0);
    }

    let today = now.weekday().num_days_from_sunday();
    let days: Vec<u32> = config
        .allowed_weekdays
        .iter()
        .map(|&d| u32::from(d))
        .filter(|&d| d <= 6)
        .collect();

    let next = days
        .iter()
        .copied()
        .find(|&d| d > today)
        .or_else(|| days.first().copied())
        .ok_or_else(|| {
            WindowError::InvalidWindowConfig("no allowed weekdays in a restricted window".into())
        })?;

    Ok(if next > today {
        next - today
    } else {
        7 - today + next
    })
}

/// Evaluate the window and classify it for display.
///
/// # Errors
///
/// Propagates [`next_open_in_days`] failures when the window is closed.
pub fn availability<T: Datelike + Timelike>(
    now: &T,
    config: &WindowConfig,
) -> Result<Availability, WindowError> {
    let status = evaluate(now, config);
    if !status.is_open {
        let days_until_open = next_open_in_days(now, config)?;
        tracing::debug!(days_until_open, "check-in window closed");
        return Ok(Availability::Closed { days_until_open });
    }
    if status.closing_soon() {
        return Ok(Availability::ClosingSoon {
            hours_remaining: status.hours_remaining,
        });
    }
    Ok(Availability::Open {
        hours_remaining: status.hours_remaining,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    // 2024-06-02 is a Sunday.
    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, day)
            .unwrap()
            .and_hms_opt(hour, 30, 0)
            .unwrap()
    }

    fn sunday_only() -> WindowConfig {
        WindowConfig::weekly([0], 0, 23)
    }

    #[test]
    fn always_open_reports_sentinel() {
        let cfg = WindowConfig::always_open();
        for day in 2..=8 {
            for hour in [0, 7, 23] {
                let status = evaluate(&at(day, hour), &cfg);
                assert!(status.is_open);
                assert_eq!(status.hours_remaining, 24);
            }
        }
    }

    #[test]
    fn sunday_window_open_all_day() {
        let cfg = sunday_only();
        for hour in 0..24 {
            let status = evaluate(&at(2, hour), &cfg);
            assert!(status.is_open, "hour {hour}");
            assert_eq!(status.hours_remaining, 23 - hour);
        }
    }

    #[test]
    fn sunday_window_closed_on_other_days() {
        let cfg = sunday_only();
        for day in 3..=8 {
            for hour in [0, 12, 23] {
                assert_eq!(evaluate(&at(day, hour), &cfg), WindowStatus::CLOSED);
            }
        }
    }

    #[test]
    fn end_hour_is_inclusive() {
        let cfg = WindowConfig::weekly([0], 9, 17);
        let status = evaluate(&at(2, 17), &cfg);
        assert!(status.is_open);
        assert_eq!(status.hours_remaining, 0);
        assert!(status.closing_soon());

        assert!(!evaluate(&at(2, 18), &cfg).is_open);
        assert!(!evaluate(&at(2, 8), &cfg).is_open);
        assert!(evaluate(&at(2, 9), &cfg).is_open);
    }

    #[test]
    fn next_open_from_monday_is_six_days() {
        assert_eq!(next_open_in_days(&at(3, 10), &sunday_only()).unwrap(), 6);
    }

    #[test]
    fn next_open_wraps_to_next_week() {
        let cfg = WindowConfig::weekly([0], 9, 17);
        assert_eq!(next_open_in_days(&at(2, 20), &cfg).unwrap(), 7);
    }

    #[test]
    fn next_open_picks_nearest_later_day() {
        // Tuesday, Thursday, Saturday.
        let cfg = WindowConfig::weekly([2, 4, 6], 9, 17);
        // Wednesday -> Thursday.
        assert_eq!(next_open_in_days(&at(5, 10), &cfg).unwrap(), 1);
        // Saturday -> Tuesday.
        assert_eq!(next_open_in_days(&at(8, 20), &cfg).unwrap(), 3);
    }

    #[test]
    fn next_open_always_open_is_zero() {
        assert_eq!(next_open_in_days(&at(4, 1), &WindowConfig::always_open()).unwrap(), 0);
    }

    #[test]
    fn next_open_rejects_empty_weekdays() {
        let cfg = WindowConfig::weekly([], 0, 23);
        assert!(matches!(
            next_open_in_days(&at(3, 1), &cfg),
            Err(WindowError::InvalidWindowConfig(_))
        ));
    }

    #[test]
    fn availability_headlines() {
        let cfg = WindowConfig::weekly([0], 0, 23);

        let open = availability(&at(2, 10), &cfg).unwrap();
        assert_eq!(open, Availability::Open { hours_remaining: 13 });
        assert_eq!(open.headline(), "check-in is open!");

        let soon = availability(&at(2, 22), &cfg).unwrap();
        assert_eq!(soon, Availability::ClosingSoon { hours_remaining: 1 });
        assert_eq!(soon.headline(), "1 hour left!");

        let closed = availability(&at(3, 10), &cfg).unwrap();
        assert!(!closed.can_start());
        assert_eq!(closed.headline(), "check-in closed, come back in 6 days");
    }
}
