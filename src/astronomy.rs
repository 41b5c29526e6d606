//! Sunrise, sunset and twilight times in a location's local time
//!
//! Event instants come either from the provider payload (sunrise/sunset) or
//! from the `sunrise` crate (twilights). Polar days and nights are reported
//! as [`SunEvent::AllDay`] and [`SunEvent::Never`].

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use sunrise::{Coordinates, DawnType, SolarDay, SolarEvent};

use crate::weekend::time::{SECONDS_PER_HOUR, to_local};

/// Outcome of a solar event on one day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SunEvent {
    /// Event happens at this UTC unix timestamp
    At(i64),
    /// The sun stays on the event's side of the horizon for the whole day
    AllDay,
    /// The event never happens that day
    Never,
}

/// Whether an event opens or closes a period of light
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Begin,
    End,
}

/// Format an event as local `HH:MM`, `"00:00"`/`"23:59"` for all-day events
/// and `"-"` for events that do not occur.
#[must_use]
pub fn format_event(event: SunEvent, offset_seconds: i64, kind: EventKind) -> String {
    match (event, kind) {
        (SunEvent::Never, _) => "-".to_string(),
        (SunEvent::AllDay, EventKind::Begin) => "00:00".to_string(),
        (SunEvent::AllDay, EventKind::End) => "23:59".to_string(),
        (SunEvent::At(timestamp), _) => to_local(timestamp, offset_seconds).format_hm(),
    }
}

/// Formatted solar times for a location and day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AstronomicalData {
    pub sunrise: String,
    pub sunset: String,
    pub true_noon: String,
    /// Seconds of daylight left after 17:00 local, absent when the sun sets earlier
    pub daylight_after_5pm: Option<i64>,
    pub civil_twilight_begin: String,
    pub civil_twilight_end: String,
    pub nautical_twilight_begin: String,
    pub nautical_twilight_end: String,
    pub astronomical_twilight_begin: String,
    pub astronomical_twilight_end: String,
}

/// Twilight depth, by the sun's altitude in degrees at the event
#[derive(Debug, Clone, Copy, PartialEq)]
enum Horizon {
    Sunrise,
    Civil,
    Nautical,
    Astronomical,
}

impl Horizon {
    fn altitude(self) -> f64 {
        match self {
            Horizon::Sunrise => -0.833,
            Horizon::Civil => -6.0,
            Horizon::Nautical => -12.0,
            Horizon::Astronomical => -18.0,
        }
    }

    fn events(self) -> (SolarEvent, SolarEvent) {
        match self {
            Horizon::Sunrise => (SolarEvent::Sunrise, SolarEvent::Sunset),
            Horizon::Civil => (SolarEvent::Dawn(DawnType::Civil), SolarEvent::Dusk(DawnType::Civil)),
            Horizon::Nautical => (
                SolarEvent::Dawn(DawnType::Nautical),
                SolarEvent::Dusk(DawnType::Nautical),
            ),
            Horizon::Astronomical => (
                SolarEvent::Dawn(DawnType::Astronomical),
                SolarEvent::Dusk(DawnType::Astronomical),
            ),
        }
    }
}

/// Approximate solar declination in degrees for a day of the year
fn solar_declination(day_of_year: u32) -> f64 {
    let angle = (360.0 / 365.0 * (f64::from(day_of_year) + 10.0)).to_radians();
    -23.44 * angle.cos()
}

/// Decide whether a missing event means the sun never crosses `horizon`
/// because it stays above it (`AllDay`) or below it (`Never`).
fn classify_missing(latitude: f64, date: NaiveDate, horizon: Horizon) -> SunEvent {
    let declination = solar_declination(date.ordinal());
    let midnight_altitude = (latitude + declination).abs() - 90.0;
    if latitude * declination > 0.0 && midnight_altitude > horizon.altitude() {
        SunEvent::AllDay
    } else {
        SunEvent::Never
    }
}

fn solar_events(solar_day: &SolarDay, latitude: f64, date: NaiveDate, horizon: Horizon) -> (SunEvent, SunEvent) {
    let (begin, end) = horizon.events();
    let resolve = |event| match solar_day.event_time(event) {
        Some(time) => SunEvent::At(time.timestamp()),
        None => classify_missing(latitude, date, horizon),
    };
    (resolve(begin), resolve(end))
}

fn provider_event(timestamp: Option<i64>, latitude: f64, date: NaiveDate) -> SunEvent {
    match timestamp {
        Some(ts) if ts > 0 => SunEvent::At(ts),
        _ => classify_missing(latitude, date, Horizon::Sunrise),
    }
}

/// Seconds between 17:00 local and sunset on the same local day
#[must_use]
pub fn daylight_after_5pm(now_utc: i64, offset_seconds: i64, sunset_utc: i64) -> Option<i64> {
    let five_pm = to_local(now_utc, offset_seconds).day_start() + 17 * SECONDS_PER_HOUR;
    let sunset_local = sunset_utc + offset_seconds;
    (sunset_local > five_pm).then(|| sunset_local - five_pm)
}

/// Solar data for the local day containing `now_utc`.
///
/// `sunrise_utc`/`sunset_utc` are the provider's values; the provider omits
/// them (or sends 0) during polar day and night.
#[must_use]
pub fn astronomical_data(
    now_utc: i64,
    offset_seconds: i64,
    latitude: f64,
    longitude: f64,
    sunrise_utc: Option<i64>,
    sunset_utc: Option<i64>,
) -> AstronomicalData {
    let local = to_local(now_utc, offset_seconds);
    let date = local.date().unwrap_or_default();
    let fmt = |event, kind| format_event(event, offset_seconds, kind);

    let sunrise = provider_event(sunrise_utc, latitude, date);
    let sunset = provider_event(sunset_utc, latitude, date);

    let true_noon = match (sunrise, sunset) {
        (SunEvent::At(rise), SunEvent::At(set)) => SunEvent::At(rise + (set - rise) / 2),
        (SunEvent::AllDay, _) | (_, SunEvent::AllDay) => SunEvent::AllDay,
        _ => SunEvent::Never,
    };
    let daylight = match sunset {
        SunEvent::At(set) => daylight_after_5pm(now_utc, offset_seconds, set),
        _ => None,
    };

    let twilights = Coordinates::new(latitude, longitude).map(|coordinates| {
        let solar_day = SolarDay::new(coordinates, date);
        [Horizon::Civil, Horizon::Nautical, Horizon::Astronomical]
            .map(|horizon| solar_events(&solar_day, latitude, date, horizon))
    });
    if twilights.is_none() {
        tracing::warn!(latitude, longitude, "Invalid coordinates, skipping twilight calculation");
    }
    let [civil, nautical, astronomical] =
        twilights.unwrap_or([(SunEvent::Never, SunEvent::Never); 3]);

    AstronomicalData {
        sunrise: fmt(sunrise, EventKind::Begin),
        sunset: fmt(sunset, EventKind::End),
        // noon of an all-day sun is not a begin or end; show the earliest time
        true_noon: fmt(true_noon, EventKind::Begin),
        daylight_after_5pm: daylight,
        civil_twilight_begin: fmt(civil.0, EventKind::Begin),
        civil_twilight_end: fmt(civil.1, EventKind::End),
        nautical_twilight_begin: fmt(nautical.0, EventKind::Begin),
        nautical_twilight_end: fmt(nautical.1, EventKind::End),
        astronomical_twilight_begin: fmt(astronomical.0, EventKind::Begin),
        astronomical_twilight_end: fmt(astronomical.1, EventKind::End),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    // Friday 2024-03-15 17:30:00 UTC
    const FRIDAY_1730_UTC: i64 = 1_710_523_800;

    #[rstest]
    #[case(SunEvent::AllDay, EventKind::Begin, "00:00")]
    #[case(SunEvent::AllDay, EventKind::End, "23:59")]
    #[case(SunEvent::Never, EventKind::Begin, "-")]
    #[case(SunEvent::Never, EventKind::End, "-")]
    #[case(SunEvent::At(FRIDAY_1730_UTC), EventKind::End, "19:30")]
    fn test_format_event(#[case] event: SunEvent, #[case] kind: EventKind, #[case] expected: &str) {
        assert_eq!(format_event(event, 7200, kind), expected);
    }

    #[test]
    fn test_format_event_negative_offset_wraps_day() {
        // 03:05 UTC at UTC-5 is 22:05 the previous day
        assert_eq!(
            format_event(SunEvent::At(3 * 3600 + 5 * 60), -18_000, EventKind::Begin),
            "22:05"
        );
    }

    #[test]
    fn test_daylight_after_5pm() {
        // sunset 17:15 local at UTC+1
        let sunset = FRIDAY_1730_UTC - 75 * 60;
        assert_eq!(daylight_after_5pm(FRIDAY_1730_UTC, 3600, sunset), Some(15 * 60));
        // sunset 16:45 local
        let early = FRIDAY_1730_UTC - 90 * 60 - 15 * 60;
        assert_eq!(daylight_after_5pm(FRIDAY_1730_UTC, 3600, early), None);
    }

    #[test]
    fn test_polar_classification() {
        let midsummer = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let midwinter = NaiveDate::from_ymd_opt(2024, 12, 21).unwrap();

        assert_eq!(classify_missing(78.2, midsummer, Horizon::Sunrise), SunEvent::AllDay);
        assert_eq!(classify_missing(78.2, midwinter, Horizon::Sunrise), SunEvent::Never);
        assert_eq!(classify_missing(-77.8, midwinter, Horizon::Civil), SunEvent::AllDay);
        assert_eq!(classify_missing(-77.8, midsummer, Horizon::Astronomical), SunEvent::Never);
    }

    #[test]
    fn test_astronomical_data_mid_latitude() {
        // Berlin on 2024-03-15, provider sunrise 05:21 UTC, sunset 17:09 UTC
        let sunrise = 1_710_480_060;
        let sunset = 1_710_522_540;
        let data = astronomical_data(FRIDAY_1730_UTC, 3600, 52.52, 13.405, Some(sunrise), Some(sunset));

        assert_eq!(data.sunrise, "06:21");
        assert_eq!(data.sunset, "18:09");
        assert_eq!(data.true_noon, "12:15");
        assert_eq!(data.daylight_after_5pm, Some(69 * 60));
        for time in [
            &data.civil_twilight_begin,
            &data.civil_twilight_end,
            &data.nautical_twilight_begin,
            &data.astronomical_twilight_end,
        ] {
            assert_eq!(time.len(), 5, "unexpected time {time}");
            assert_eq!(&time[2..3], ":");
        }
    }

    #[test]
    fn test_astronomical_data_polar_day_without_provider_times() {
        // Longyearbyen around midsummer
        let now = 1_718_971_200; // 2024-06-21 12:00 UTC
        let data = astronomical_data(now, 7200, 78.22, 15.65, None, Some(0));
        assert_eq!(data.sunrise, "00:00");
        assert_eq!(data.sunset, "23:59");
        assert_eq!(data.daylight_after_5pm, None);
    }
}
