//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};

use weekendcast::models::{CurrentWeatherResponse, ForecastResponse};
use weekendcast::{WeatherSource, WeekendCastError};

pub const BERLIN: u64 = 2_950_159;

/// Monday 2024-03-11 00:00:00 UTC
pub const MONDAY: i64 = 1_710_115_200;
pub const HOUR: i64 = 3_600;
pub const DAY: i64 = 24 * HOUR;

pub fn current_weather_json(dt: i64, timezone: i64) -> Value {
    json!({
        "coord": { "lon": 13.41, "lat": 52.52 },
        "weather": [
            { "id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d" }
        ],
        "base": "stations",
        "main": {
            "temp": 11.3, "feels_like": 10.2, "temp_min": 9.9, "temp_max": 12.8,
            "pressure": 1018, "humidity": 71
        },
        "visibility": 10000,
        "wind": { "speed": 4.1, "deg": 240 },
        "clouds": { "all": 75 },
        "dt": dt,
        "sys": { "type": 2, "id": 2011538, "country": "DE", "sunrise": 1710480060, "sunset": 1710522540 },
        "timezone": timezone,
        "id": BERLIN,
        "name": "Berlin",
        "cod": 200
    })
}

pub fn forecast_item_json(dt: i64, temp: f64, main: &str, description: &str) -> Value {
    json!({
        "dt": dt,
        "main": {
            "temp": temp, "feels_like": temp - 1.0, "temp_min": temp - 0.5, "temp_max": temp + 0.5,
            "pressure": 1015, "sea_level": 1015, "grnd_level": 1010, "humidity": 80, "temp_kf": 0.3
        },
        "weather": [ { "id": 500, "main": main, "description": description, "icon": "10d" } ],
        "clouds": { "all": 90 },
        "wind": { "speed": 3.2, "deg": 200, "gust": 6.1 },
        "visibility": 10000,
        "pop": 0.4,
        "sys": { "pod": "d" },
        "dt_txt": "2024-03-16 12:00:00"
    })
}

pub fn forecast_json(timezone: i64, items: Vec<Value>) -> Value {
    json!({
        "cod": "200",
        "message": 0,
        "cnt": items.len(),
        "list": items,
        "city": {
            "id": BERLIN,
            "name": "Berlin",
            "coord": { "lat": 52.52, "lon": 13.41 },
            "country": "DE",
            "population": 1000000,
            "timezone": timezone,
            "sunrise": 1710480060,
            "sunset": 1710522540
        }
    })
}

/// 3-hourly forecast from Wednesday 00:00 UTC for five days, alternating
/// between clouds and rain
pub fn five_day_forecast_json(timezone: i64) -> Value {
    let items = (0..40)
        .map(|i| {
            let dt = MONDAY + 2 * DAY + i * 3 * HOUR;
            if i % 2 == 0 {
                forecast_item_json(dt, 8.0 + i as f64 / 4.0, "Clouds", "scattered clouds")
            } else {
                forecast_item_json(dt, 6.0 + i as f64 / 4.0, "Rain", "light rain")
            }
        })
        .collect();
    forecast_json(timezone, items)
}

/// In-memory weather source; a missing payload answers like an unknown city
#[derive(Default)]
pub struct FakeSource {
    pub current: Option<Value>,
    pub forecast: Option<Value>,
    pub calls: AtomicUsize,
}

impl FakeSource {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherSource for FakeSource {
    async fn current_weather(&self, _city_id: u64) -> weekendcast::Result<CurrentWeatherResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let value = self
            .current
            .clone()
            .ok_or_else(|| WeekendCastError::upstream("OpenWeatherMap", 404))?;
        Ok(serde_json::from_value(value)?)
    }

    async fn forecast(&self, _city_id: u64) -> weekendcast::Result<ForecastResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let value = self
            .forecast
            .clone()
            .ok_or_else(|| WeekendCastError::upstream("OpenWeatherMap", 404))?;
        Ok(serde_json::from_value(value)?)
    }
}
