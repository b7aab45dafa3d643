//! Deterministic fixtures shared by unit, behaviour and property tests.
//!
//! Patterns built by [`trend_pattern`] derive every weather factor from one
//! base series, so two patterns built from the same series correlate
//! perfectly on every factor and a reversed series anti-correlates.
#![expect(
    clippy::float_arithmetic,
    reason = "fixture weather is derived arithmetically from a base series"
)]

use chrono::NaiveDate;
use geo::Coord;

use crate::{
    DailyWeather, FactorStatistics, HistoricalIncident, HistoricalWeatherStatistics,
    PointConditions, ReferencePoint, TemperatureRange, WeatherPattern,
};

/// Warming base series, most recent day first.
pub const WARMING: [f64; 7] = [6.0, 4.0, 2.0, 0.0, -2.0, -4.0, -6.0];

/// Cooling base series. Every factor anti-correlates with [`WARMING`].
pub const COOLING: [f64; 7] = [-6.0, -4.0, -2.0, 0.0, 2.0, 4.0, 6.0];

/// Build a date from its parts.
///
/// # Panics
/// Panics when the parts do not form a calendar date.
#[must_use]
#[expect(clippy::expect_used, reason = "fixtures use literal dates")]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("fixture date must be valid")
}

/// One day whose factors all move with `base`.
#[must_use]
pub fn trend_day(base: f64) -> DailyWeather {
    DailyWeather {
        temperature_c: Some(base),
        precipitation_mm: Some(0.5f64.mul_add(base, 3.0)),
        wind_speed_kmh: Some(2.0f64.mul_add(base, 20.0)),
        visibility_km: Some(15.0 - base),
        cloud_cover_pct: Some(3.0f64.mul_add(base, 50.0)),
        temperature_range: Some(TemperatureRange {
            min_c: base - 3.0,
            mean_c: base,
            max_c: base + 3.0,
        }),
    }
}

/// Seven-day pattern derived from `base`.
///
/// # Panics
/// Never panics; seven days always fit a pattern.
#[must_use]
#[expect(clippy::expect_used, reason = "seven days always fit a pattern")]
pub fn trend_pattern(base: [f64; 7]) -> WeatherPattern {
    WeatherPattern::from_days(base.into_iter().map(trend_day)).expect("seven days fit")
}

/// Conditions carrying `pattern` and no statistics.
#[must_use]
pub const fn conditions(pattern: WeatherPattern) -> PointConditions {
    PointConditions {
        current_weather: Some(pattern),
        statistics: None,
    }
}

/// Statistics centred on the [`trend_day`] readings for `base`, with
/// `std_dev` for every tracked factor.
#[must_use]
pub fn statistics_around(base: f64, std_dev: f64) -> HistoricalWeatherStatistics {
    let day = trend_day(base);
    let around = |value: Option<f64>| value.map(|mean| FactorStatistics { mean, std_dev });
    HistoricalWeatherStatistics {
        temperature: around(day.temperature_c),
        precipitation: around(day.precipitation_mm),
        wind_speed: around(day.wind_speed_kmh),
        visibility: around(day.visibility_km),
    }
}

/// Incident at `(lat, lon)` with neutral attributes.
#[must_use]
pub const fn incident(id: u64, lat: f64, lon: f64, occurred_on: NaiveDate) -> HistoricalIncident {
    HistoricalIncident::new(id, Coord { x: lon, y: lat }, occurred_on)
}

/// Reference point at `(lat, lon)` without elevation.
#[must_use]
pub const fn reference_point(id: u64, lat: f64, lon: f64) -> ReferencePoint {
    ReferencePoint::new(id, Coord { x: lon, y: lat })
}
