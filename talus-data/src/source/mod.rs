//! Weather and elevation providers.
//!
//! Scoring never calls a provider directly. The
//! [`ConditionsFetcher`](crate::ConditionsFetcher) resolves provider data
//! ahead of a run and hands immutable
//! [`PointConditions`](talus_core::PointConditions) to the engine.

mod error;
mod http;
mod open_meteo;

use async_trait::async_trait;
use chrono::NaiveDate;
use geo::Coord;
use talus_core::{HistoricalWeatherStatistics, Season, WeatherPattern};

pub use error::SourceError;
pub use http::{DEFAULT_USER_AGENT, HttpWeatherSource, HttpWeatherSourceConfig};

/// Height of one statistics elevation band in metres.
pub const ELEVATION_BAND_METRES: f64 = 500.0;

/// Elevation band containing `elevation_m`, or `None` when the elevation is
/// unknown or not finite.
///
/// # Examples
/// ```
/// use talus_data::elevation_band;
///
/// assert_eq!(elevation_band(Some(1655.0)), Some(3));
/// assert_eq!(elevation_band(Some(-12.0)), Some(-1));
/// assert_eq!(elevation_band(None), None);
/// ```
#[must_use]
#[expect(clippy::float_arithmetic, reason = "elevations are divided into bands")]
#[expect(
    clippy::cast_possible_truncation,
    reason = "bands of a clamped elevation fit in i32"
)]
pub fn elevation_band(elevation_m: Option<f64>) -> Option<i32> {
    let metres = elevation_m.filter(|metres| metres.is_finite())?;
    Some((metres.clamp(-11_000.0, 9_000.0) / ELEVATION_BAND_METRES).floor() as i32)
}

/// Location, elevation band and season for which long-window statistics are
/// requested.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatisticsBucket {
    /// Location the statistics describe.
    pub location: Coord<f64>,
    /// Band of [`ELEVATION_BAND_METRES`] the location sits in, when known.
    pub elevation_band: Option<i32>,
    /// Season the daily samples are drawn from.
    pub season: Season,
    /// Last date of the sampling window.
    pub as_of: NaiveDate,
}

impl StatisticsBucket {
    /// Bucket for the season containing `as_of` and the band containing
    /// `elevation_m`.
    #[must_use]
    pub fn new(location: Coord<f64>, elevation_m: Option<f64>, as_of: NaiveDate) -> Self {
        Self {
            location,
            elevation_band: elevation_band(elevation_m),
            season: Season::of(as_of),
            as_of,
        }
    }

    /// Midpoint of the elevation band in metres.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "band midpoint")]
    pub fn band_midpoint_m(&self) -> Option<f64> {
        self.elevation_band.map(|band| {
            f64::from(band).mul_add(ELEVATION_BAND_METRES, ELEVATION_BAND_METRES / 2.0)
        })
    }
}

/// Supplies current weather weeks and historical statistics.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// The seven days ending on `date` at `location`, most recent first.
    ///
    /// Returns `Ok(None)` when the provider has no data for the location.
    async fn current_pattern(
        &self,
        location: Coord<f64>,
        date: NaiveDate,
    ) -> Result<Option<WeatherPattern>, SourceError>;

    /// Seasonal mean and standard deviation per weather factor.
    async fn historical_statistics(
        &self,
        bucket: &StatisticsBucket,
    ) -> Result<Option<HistoricalWeatherStatistics>, SourceError>;
}

/// Supplies terrain elevation.
#[async_trait]
pub trait ElevationSource: Send + Sync {
    /// Elevation in metres at `location`, when known.
    async fn elevation(&self, location: Coord<f64>) -> Result<Option<f64>, SourceError>;
}
