//! Weekend window calculation.
//!
//! The window is a recurring span of the location's local week, by default
//! Friday 18:00 to Sunday 21:00. Bounds are returned as real UTC unix
//! timestamps so they compare directly against provider sample timestamps.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::time::{SECONDS_PER_DAY, SECONDS_PER_HOUR, SECONDS_PER_WEEK, to_local};

/// Recurring weekend definition in local time.
///
/// `start_day`/`start_hour` must fall strictly before `end_day`/`end_hour`
/// within a Monday-based week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    pub start_day: Weekday,
    pub start_hour: u32,
    pub end_day: Weekday,
    pub end_hour: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            start_day: Weekday::Fri,
            start_hour: 18,
            end_day: Weekday::Sun,
            end_hour: 21,
        }
    }
}

impl WindowConfig {
    /// Offset of the window start from Monday 00:00, in seconds
    #[must_use]
    pub fn start_of_week_offset(&self) -> i64 {
        week_offset(self.start_day, self.start_hour)
    }

    /// Offset of the window end from Monday 00:00, in seconds
    #[must_use]
    pub fn end_of_week_offset(&self) -> i64 {
        week_offset(self.end_day, self.end_hour)
    }
}

fn week_offset(day: Weekday, hour: u32) -> i64 {
    i64::from(day.num_days_from_monday()) * SECONDS_PER_DAY + i64::from(hour) * SECONDS_PER_HOUR
}

/// Where "now" stands relative to the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WeekendPhase {
    /// Now lies inside the window
    Current,
    /// The window lies ahead
    Upcoming,
}

/// The weekend occurrence relevant to a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekendWindow {
    /// UTC timestamp of the window start
    pub begin: i64,
    /// UTC timestamp of the window end
    pub end: i64,
    pub phase: WeekendPhase,
}

impl WeekendWindow {
    #[must_use]
    pub fn is_currently_weekend(&self) -> bool {
        self.phase == WeekendPhase::Current
    }

    #[must_use]
    pub fn is_upcoming(&self) -> bool {
        self.phase == WeekendPhase::Upcoming
    }

    /// Inclusive on both ends
    #[must_use]
    pub fn contains(&self, timestamp_utc: i64) -> bool {
        timestamp_utc >= self.begin && timestamp_utc <= self.end
    }
}

/// Compute this week's window for `now_utc` at the given offset.
///
/// Inside the window the phase is `Current`. Before it the phase is
/// `Upcoming`. Once the end hour has been reached the window rolls forward by
/// exactly one week and the phase is `Upcoming`.
#[must_use]
pub fn compute_window(now_utc: i64, offset_seconds: i64, config: &WindowConfig) -> WeekendWindow {
    let local = to_local(now_utc, offset_seconds);
    let week_start_utc = local.week_start().saturating_sub(offset_seconds);

    let start_offset = config.start_of_week_offset();
    let end_offset = config.end_of_week_offset();
    let position = local.seconds_of_week();

    let (rollover, phase) = if position >= end_offset {
        (SECONDS_PER_WEEK, WeekendPhase::Upcoming)
    } else if position >= start_offset {
        (0, WeekendPhase::Current)
    } else {
        (0, WeekendPhase::Upcoming)
    };

    let window = WeekendWindow {
        begin: week_start_utc.saturating_add(start_offset).saturating_add(rollover),
        end: week_start_utc.saturating_add(end_offset).saturating_add(rollover),
        phase,
    };

    tracing::debug!(
        now_utc,
        offset_seconds,
        local_day = %local.day_of_week,
        local_hour = local.hour,
        begin = window.begin,
        end = window.end,
        phase = ?window.phase,
        "Computed weekend window"
    );

    window
}
