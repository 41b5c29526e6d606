//! Offset-naive local time.
//!
//! A location's local time is derived by adding its fixed UTC offset to a
//! UTC unix timestamp and reading the calendar fields of the sum as if it were
//! UTC. There is no timezone database and no DST handling.

use chrono::{DateTime, FixedOffset, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

pub const SECONDS_PER_MINUTE: i64 = 60;
pub const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
pub const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;
pub const SECONDS_PER_WEEK: i64 = 7 * SECONDS_PER_DAY;

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Calendar fields of an instant in a location's offset-naive local time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalTime {
    pub day_of_week: Weekday,
    /// 0-23
    pub hour: u32,
    /// 0-59
    pub minute: u32,
    /// UTC timestamp shifted by the offset
    pub epoch_local: i64,
}

impl LocalTime {
    /// Seconds elapsed since local midnight
    #[must_use]
    pub fn seconds_of_day(&self) -> i64 {
        self.epoch_local.rem_euclid(SECONDS_PER_DAY)
    }

    /// Shifted timestamp of the local midnight starting this day
    #[must_use]
    pub fn day_start(&self) -> i64 {
        self.epoch_local.saturating_sub(self.seconds_of_day())
    }

    /// Shifted timestamp of the Monday 00:00 starting this week
    #[must_use]
    pub fn week_start(&self) -> i64 {
        self.day_start()
            .saturating_sub(i64::from(self.day_of_week.num_days_from_monday()) * SECONDS_PER_DAY)
    }

    /// Seconds elapsed since Monday 00:00 of this week
    #[must_use]
    pub fn seconds_of_week(&self) -> i64 {
        self.epoch_local.saturating_sub(self.week_start())
    }

    /// Civil date of this local time, `None` outside chrono's supported range
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        DateTime::from_timestamp(self.epoch_local, 0).map(|dt| dt.date_naive())
    }

    /// Zero-padded `HH:MM`
    #[must_use]
    pub fn format_hm(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }
}

/// Convert a UTC unix timestamp into offset-naive local time.
///
/// Total over all integers: negative offsets and timestamps roll over civil
/// days the same way positive ones do.
#[must_use]
pub fn to_local(timestamp_utc: i64, offset_seconds: i64) -> LocalTime {
    let epoch_local = timestamp_utc.saturating_add(offset_seconds);
    let days = epoch_local.div_euclid(SECONDS_PER_DAY);
    let seconds_of_day = epoch_local.rem_euclid(SECONDS_PER_DAY);

    // 1970-01-01 was a Thursday
    let weekday_index = (days + 3).rem_euclid(7) as usize;

    LocalTime {
        day_of_week: WEEKDAYS[weekday_index],
        hour: (seconds_of_day / SECONDS_PER_HOUR) as u32,
        minute: ((seconds_of_day % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE) as u32,
        epoch_local,
    }
}

/// ISO 8601 rendering of the instant with its fixed offset, e.g.
/// `2024-03-15T19:30:00+02:00`.
///
/// Returns `None` when the offset is not a valid fixed offset (beyond ±24h)
/// or the timestamp is outside chrono's range.
#[must_use]
pub fn to_local_iso8601(timestamp_utc: i64, offset_seconds: i64) -> Option<String> {
    let offset = FixedOffset::east_opt(i32::try_from(offset_seconds).ok()?)?;
    let datetime = DateTime::from_timestamp(timestamp_utc, 0)?.with_timezone(&offset);
    Some(datetime.to_rfc3339())
}
