//! Open-Meteo response types and their conversion to domain weather.
//!
//! See: <https://open-meteo.com/en/docs/historical-weather-api>
//!
//! The reanalysis archive has no visibility series, so patterns and
//! statistics built here leave visibility absent.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::Deserialize;
use talus_core::{
    DailyWeather, FactorStatistics, HistoricalWeatherStatistics, Season, TemperatureRange,
    WeatherPattern,
};

/// Daily variables requested from the archive endpoint.
pub const DAILY_FIELDS: &str = "temperature_2m_mean,temperature_2m_min,temperature_2m_max,\
precipitation_sum,wind_speed_10m_max,cloud_cover_mean";

/// Archive API response.
#[derive(Debug, Default, Deserialize)]
pub struct ArchiveResponse {
    /// Daily series; absent when the location has no coverage.
    #[serde(default)]
    pub daily: Option<DailySeries>,
}

/// Parallel daily arrays. Every series is aligned with `time`; shorter
/// series are treated as missing at the tail.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DailySeries {
    /// Observation dates.
    pub time: Vec<NaiveDate>,
    /// Mean air temperature at 2 m, °C.
    pub temperature_2m_mean: Vec<Option<f64>>,
    /// Minimum air temperature at 2 m, °C.
    pub temperature_2m_min: Vec<Option<f64>>,
    /// Maximum air temperature at 2 m, °C.
    pub temperature_2m_max: Vec<Option<f64>>,
    /// Total precipitation, mm.
    pub precipitation_sum: Vec<Option<f64>>,
    /// Maximum wind speed at 10 m, km/h.
    pub wind_speed_10m_max: Vec<Option<f64>>,
    /// Mean cloud cover, %.
    pub cloud_cover_mean: Vec<Option<f64>>,
}

fn at(series: &[Option<f64>], index: usize) -> Option<f64> {
    series
        .get(index)
        .copied()
        .flatten()
        .filter(|value| value.is_finite())
}

impl DailySeries {
    /// Observations keyed by date. Days with no usable value are skipped.
    #[must_use]
    pub fn by_date(&self) -> BTreeMap<NaiveDate, DailyWeather> {
        self.time
            .iter()
            .enumerate()
            .filter_map(|(index, date)| {
                let mean = at(&self.temperature_2m_mean, index);
                let temperature_range = match (
                    at(&self.temperature_2m_min, index),
                    mean,
                    at(&self.temperature_2m_max, index),
                ) {
                    (Some(min_c), Some(mean_c), Some(max_c)) => Some(TemperatureRange {
                        min_c,
                        mean_c,
                        max_c,
                    }),
                    _ => None,
                };
                let day = DailyWeather {
                    temperature_c: mean,
                    precipitation_mm: at(&self.precipitation_sum, index),
                    wind_speed_kmh: at(&self.wind_speed_10m_max, index),
                    visibility_km: None,
                    cloud_cover_pct: at(&self.cloud_cover_mean, index),
                    temperature_range,
                };
                (day != DailyWeather::default()).then_some((*date, day))
            })
            .collect()
    }

    /// The seven days ending on `date`, most recent first.
    ///
    /// Returns `None` when none of those days were observed.
    #[must_use]
    pub fn pattern_ending(&self, date: NaiveDate) -> Option<WeatherPattern> {
        let observed = self.by_date();
        let slots: Vec<Option<DailyWeather>> = (0..7_u64)
            .map(|offset| {
                date.checked_sub_days(Days::new(offset))
                    .and_then(|day| observed.get(&day).copied())
            })
            .collect();
        if slots.iter().all(Option::is_none) {
            return None;
        }
        WeatherPattern::new(slots).ok()
    }

    /// Mean and sample standard deviation per factor over days in `season`.
    ///
    /// Returns `None` when no factor has at least two samples.
    #[must_use]
    pub fn seasonal_statistics(&self, season: Season) -> Option<HistoricalWeatherStatistics> {
        let days: Vec<DailyWeather> = self
            .by_date()
            .into_iter()
            .filter(|(date, _)| Season::of(*date) == season)
            .map(|(_, day)| day)
            .collect();
        let summarise_by = |pick: fn(&DailyWeather) -> Option<f64>| {
            summarise(&days.iter().filter_map(pick).collect::<Vec<_>>())
        };
        let statistics = HistoricalWeatherStatistics {
            temperature: summarise_by(|day| day.temperature_c),
            precipitation: summarise_by(|day| day.precipitation_mm),
            wind_speed: summarise_by(|day| day.wind_speed_kmh),
            visibility: summarise_by(|day| day.visibility_km),
        };
        (statistics != HistoricalWeatherStatistics::default()).then_some(statistics)
    }
}

/// Mean and sample standard deviation of `values`.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "summary statistics")]
pub fn summarise(values: &[f64]) -> Option<FactorStatistics> {
    if values.len() < 2 {
        return None;
    }
    let count = f64::from(u32::try_from(values.len()).ok()?);
    let mean = values.iter().sum::<f64>() / count;
    let squares: f64 = values.iter().map(|value| (value - mean).powi(2)).sum();
    let std_dev = (squares / (count - 1.0)).sqrt();
    (mean.is_finite() && std_dev.is_finite()).then_some(FactorStatistics { mean, std_dev })
}

/// Elevation API response.
#[derive(Debug, Default, Deserialize)]
pub struct ElevationResponse {
    /// One elevation per requested coordinate, metres.
    #[serde(default)]
    pub elevation: Vec<f64>,
}

impl ElevationResponse {
    /// The first finite elevation.
    #[must_use]
    pub fn first(&self) -> Option<f64> {
        self.elevation.first().copied().filter(|value| value.is_finite())
    }
}
