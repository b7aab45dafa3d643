//! Seven-day weather patterns and long-window statistics.
//!
//! A [`WeatherPattern`] is the trailing week of daily observations around a
//! reference day: index `0` holds the reference day itself and index `i`
//! holds the day `i` days earlier. Missing days are `None`; a pattern is only
//! usable for similarity when at least [`MIN_PRESENT_DAYS`] of the
//! [`PATTERN_DAYS`] are present.

use std::hash::{DefaultHasher, Hasher};

use thiserror::Error;

/// Number of days in a weather pattern window.
pub const PATTERN_DAYS: usize = 7;

/// Minimum number of present days for a pattern to be valid.
pub const MIN_PRESENT_DAYS: usize = 5;

/// Scalar weather factors tracked per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WeatherFactor {
    /// Mean air temperature in °C.
    Temperature,
    /// Precipitation total in millimetres.
    Precipitation,
    /// Wind speed in km/h.
    WindSpeed,
    /// Visibility in kilometres.
    Visibility,
    /// Cloud cover percentage.
    CloudCover,
}

impl WeatherFactor {
    /// Every factor, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Temperature,
        Self::Precipitation,
        Self::WindSpeed,
        Self::Visibility,
        Self::CloudCover,
    ];

    /// Return the factor as a `snake_case` `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Precipitation => "precipitation",
            Self::WindSpeed => "wind_speed",
            Self::Visibility => "visibility",
            Self::CloudCover => "cloud_cover",
        }
    }
}

/// Minimum, mean and maximum temperature for a day in °C.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemperatureRange {
    /// Daily minimum.
    pub min_c: f64,
    /// Daily mean.
    pub mean_c: f64,
    /// Daily maximum.
    pub max_c: f64,
}

impl TemperatureRange {
    /// A freeze-thaw day dips below and climbs above 0 °C.
    #[must_use]
    pub fn is_freeze_thaw(&self) -> bool {
        self.min_c < 0.0 && self.max_c > 0.0
    }

    fn is_finite(&self) -> bool {
        self.min_c.is_finite() && self.mean_c.is_finite() && self.max_c.is_finite()
    }
}

/// One day of observations. Every field is optional.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DailyWeather {
    /// Mean air temperature in °C.
    pub temperature_c: Option<f64>,
    /// Precipitation total in millimetres.
    pub precipitation_mm: Option<f64>,
    /// Wind speed in km/h.
    pub wind_speed_kmh: Option<f64>,
    /// Visibility in kilometres.
    pub visibility_km: Option<f64>,
    /// Cloud cover percentage.
    pub cloud_cover_pct: Option<f64>,
    /// Daily temperature extremes.
    pub temperature_range: Option<TemperatureRange>,
}

impl DailyWeather {
    /// Read the value recorded for `factor`.
    #[must_use]
    pub const fn value(&self, factor: WeatherFactor) -> Option<f64> {
        match factor {
            WeatherFactor::Temperature => self.temperature_c,
            WeatherFactor::Precipitation => self.precipitation_mm,
            WeatherFactor::WindSpeed => self.wind_speed_kmh,
            WeatherFactor::Visibility => self.visibility_km,
            WeatherFactor::CloudCover => self.cloud_cover_pct,
        }
    }
}

/// Errors returned by [`WeatherPattern::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherPatternError {
    /// More than [`PATTERN_DAYS`] days were supplied.
    #[error("weather pattern holds at most {PATTERN_DAYS} days, got {0}")]
    TooManyDays(usize),
}

/// Trailing seven-day weather window. Immutable once built.
///
/// # Examples
/// ```
/// use talus_core::{DailyWeather, WeatherPattern};
///
/// let day = DailyWeather { temperature_c: Some(-4.0), ..DailyWeather::default() };
/// let pattern = WeatherPattern::new(vec![Some(day); 5])?;
/// assert!(pattern.is_valid());
/// assert_eq!(pattern.present_days(), 5);
/// # Ok::<(), talus_core::WeatherPatternError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        try_from = "Vec<Option<DailyWeather>>",
        into = "Vec<Option<DailyWeather>>"
    )
)]
pub struct WeatherPattern {
    days: Vec<Option<DailyWeather>>,
}

impl WeatherPattern {
    /// Build a pattern from up to seven days, most recent first.
    ///
    /// Shorter inputs are padded with missing days.
    ///
    /// # Errors
    /// Returns [`WeatherPatternError::TooManyDays`] when more than seven days
    /// are supplied.
    pub fn new(mut days: Vec<Option<DailyWeather>>) -> Result<Self, WeatherPatternError> {
        if days.len() > PATTERN_DAYS {
            return Err(WeatherPatternError::TooManyDays(days.len()));
        }
        days.resize(PATTERN_DAYS, None);
        Ok(Self { days })
    }

    /// Build a pattern where every supplied day is present.
    ///
    /// # Errors
    /// Returns [`WeatherPatternError::TooManyDays`] when more than seven days
    /// are supplied.
    pub fn from_days<I>(days: I) -> Result<Self, WeatherPatternError>
    where
        I: IntoIterator<Item = DailyWeather>,
    {
        Self::new(days.into_iter().map(Some).collect())
    }

    /// Day slots, most recent first. Always [`PATTERN_DAYS`] long.
    #[must_use]
    pub fn days(&self) -> &[Option<DailyWeather>] {
        &self.days
    }

    /// Number of days with observations.
    #[must_use]
    pub fn present_days(&self) -> usize {
        self.days.iter().flatten().count()
    }

    /// A pattern is valid when at least five of seven days are present.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.present_days() >= MIN_PRESENT_DAYS
    }

    /// Per-day values of `factor`, most recent first.
    ///
    /// Non-finite readings are reported as missing.
    #[must_use]
    pub fn series(&self, factor: WeatherFactor) -> Vec<Option<f64>> {
        self.days
            .iter()
            .map(|day| {
                day.and_then(|observed| observed.value(factor))
                    .filter(|value| value.is_finite())
            })
            .collect()
    }

    /// Most recent finite reading of `factor`, if any.
    #[must_use]
    pub fn latest(&self, factor: WeatherFactor) -> Option<f64> {
        self.series(factor).into_iter().flatten().next()
    }

    /// Count freeze-thaw days among days that report a temperature range.
    ///
    /// Returns `None` when no day carries a usable range.
    #[must_use]
    pub fn freeze_thaw_days(&self) -> Option<usize> {
        let ranges: Vec<TemperatureRange> = self
            .days
            .iter()
            .flatten()
            .filter_map(|day| day.temperature_range)
            .filter(TemperatureRange::is_finite)
            .collect();
        if ranges.is_empty() {
            return None;
        }
        Some(ranges.iter().filter(|range| range.is_freeze_thaw()).count())
    }

    fn feed<H: Hasher>(&self, state: &mut H) {
        for day in &self.days {
            match day {
                None => state.write_u8(0),
                Some(observed) => {
                    state.write_u8(1);
                    for factor in WeatherFactor::ALL {
                        feed_optional(state, observed.value(factor));
                    }
                    match observed.temperature_range {
                        None => state.write_u8(0),
                        Some(range) => {
                            state.write_u8(1);
                            state.write_u64(range.min_c.to_bits());
                            state.write_u64(range.mean_c.to_bits());
                            state.write_u64(range.max_c.to_bits());
                        }
                    }
                }
            }
        }
    }
}

impl TryFrom<Vec<Option<DailyWeather>>> for WeatherPattern {
    type Error = WeatherPatternError;

    fn try_from(days: Vec<Option<DailyWeather>>) -> Result<Self, Self::Error> {
        Self::new(days)
    }
}

impl From<WeatherPattern> for Vec<Option<DailyWeather>> {
    fn from(pattern: WeatherPattern) -> Self {
        pattern.days
    }
}

/// Mean and standard deviation of one factor over a long window.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FactorStatistics {
    /// Long-window mean.
    pub mean: f64,
    /// Long-window standard deviation.
    pub std_dev: f64,
}

impl FactorStatistics {
    /// Standard score of `value` against these statistics.
    ///
    /// Returns `None` when the deviation is not strictly positive or any
    /// input is non-finite.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "z-scores divide by the deviation")]
    pub fn z_score(&self, value: f64) -> Option<f64> {
        if !(self.std_dev > 0.0 && self.std_dev.is_finite() && self.mean.is_finite()) {
            return None;
        }
        let z = (value - self.mean) / self.std_dev;
        z.is_finite().then_some(z)
    }
}

/// Optional per-factor statistics for a location/season bucket.
///
/// Absence of the whole value, or of a single factor, only disables the
/// extreme-deviation amplification for that factor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HistoricalWeatherStatistics {
    /// Temperature statistics.
    pub temperature: Option<FactorStatistics>,
    /// Precipitation statistics.
    pub precipitation: Option<FactorStatistics>,
    /// Wind speed statistics.
    pub wind_speed: Option<FactorStatistics>,
    /// Visibility statistics.
    pub visibility: Option<FactorStatistics>,
}

impl HistoricalWeatherStatistics {
    /// Statistics recorded for `factor`. Cloud cover is never tracked.
    #[must_use]
    pub const fn for_factor(&self, factor: WeatherFactor) -> Option<FactorStatistics> {
        match factor {
            WeatherFactor::Temperature => self.temperature,
            WeatherFactor::Precipitation => self.precipitation,
            WeatherFactor::WindSpeed => self.wind_speed,
            WeatherFactor::Visibility => self.visibility,
            WeatherFactor::CloudCover => None,
        }
    }

    fn feed<H: Hasher>(&self, state: &mut H) {
        for factor in WeatherFactor::ALL {
            match self.for_factor(factor) {
                None => state.write_u8(0),
                Some(stats) => {
                    state.write_u8(1);
                    state.write_u64(stats.mean.to_bits());
                    state.write_u64(stats.std_dev.to_bits());
                }
            }
        }
    }
}

/// Deterministic digest of a point's weather inputs.
///
/// Points with identical conditions share the same fingerprint, which lets
/// a run reuse weather similarity results between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConditionsFingerprint(u64);

impl ConditionsFingerprint {
    /// Raw digest value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Weather inputs available at one reference point for one run.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PointConditions {
    /// Current trailing-week pattern, when the provider returned one.
    pub current_weather: Option<WeatherPattern>,
    /// Long-window statistics for the point's bucket.
    pub statistics: Option<HistoricalWeatherStatistics>,
}

impl PointConditions {
    /// Conditions with nothing known; every weather factor goes neutral.
    #[must_use]
    pub const fn unavailable() -> Self {
        Self {
            current_weather: None,
            statistics: None,
        }
    }

    /// Digest the conditions for similarity reuse.
    #[must_use]
    pub fn fingerprint(&self) -> ConditionsFingerprint {
        let mut hasher = DefaultHasher::new();
        match &self.current_weather {
            None => hasher.write_u8(0),
            Some(pattern) => {
                hasher.write_u8(1);
                pattern.feed(&mut hasher);
            }
        }
        match &self.statistics {
            None => hasher.write_u8(0),
            Some(stats) => {
                hasher.write_u8(1);
                stats.feed(&mut hasher);
            }
        }
        ConditionsFingerprint(hasher.finish())
    }
}

fn feed_optional<H: Hasher>(state: &mut H, value: Option<f64>) {
    match value {
        None => state.write_u8(0),
        Some(reading) => {
            state.write_u8(1);
            state.write_u64(reading.to_bits());
        }
    }
}
