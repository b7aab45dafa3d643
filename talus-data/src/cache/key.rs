//! Cache keys: `(kind, spatial bucket, temporal bucket)`, with an optional
//! elevation band and tag.

use std::fmt;
use std::time::Duration;

use chrono::NaiveDate;
use geo::Coord;
use talus_core::Season;

/// Width of a spatial bucket in degrees (about 11 km of latitude).
pub const SPATIAL_BUCKET_DEGREES: f64 = 0.1;

/// Kind of cached value, which also fixes its time to live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    /// Current trailing-week weather.
    Forecast,
    /// Long-window seasonal statistics.
    Statistics,
    /// A computed score.
    Score,
}

impl CacheKind {
    /// How long values of this kind stay fresh.
    #[must_use]
    pub const fn ttl(self) -> Duration {
        match self {
            Self::Forecast => Duration::from_secs(60 * 60),
            Self::Statistics => Duration::from_secs(30 * 24 * 60 * 60),
            Self::Score => Duration::from_secs(6 * 60 * 60),
        }
    }

    /// Key prefix.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Forecast => "forecast",
            Self::Statistics => "stats",
            Self::Score => "score",
        }
    }
}

/// Grid cell containing a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpatialBucket {
    lat_cell: i32,
    lon_cell: i32,
}

impl SpatialBucket {
    /// Cell of [`SPATIAL_BUCKET_DEGREES`] containing `location`.
    ///
    /// Non-finite coordinates fall into cell zero.
    #[must_use]
    pub fn of(location: Coord<f64>) -> Self {
        Self {
            lat_cell: cell(location.y),
            lon_cell: cell(location.x),
        }
    }
}

#[expect(clippy::float_arithmetic, reason = "coordinates are divided into cells")]
#[expect(
    clippy::cast_possible_truncation,
    reason = "cells of a clamped coordinate fit in i32"
)]
fn cell(degrees: f64) -> i32 {
    if !degrees.is_finite() {
        return 0;
    }
    (degrees.clamp(-360.0, 360.0) / SPATIAL_BUCKET_DEGREES).floor() as i32
}

/// Time window a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemporalBucket {
    /// A single day.
    Day(NaiveDate),
    /// A season in any year.
    Season(Season),
}

/// Fully qualified cache key.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use geo::Coord;
/// use talus_data::{CacheKey, CacheKind, SpatialBucket, TemporalBucket};
///
/// let day = NaiveDate::from_ymd_opt(2024, 1, 7).expect("valid date");
/// let key = CacheKey::new(
///     CacheKind::Forecast,
///     SpatialBucket::of(Coord { x: -105.27, y: 40.01 }),
///     TemporalBucket::Day(day),
/// );
/// assert_eq!(key.to_string(), "forecast:400:-1053:2024-01-07");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Value kind.
    pub kind: CacheKind,
    /// Location cell.
    pub spatial: SpatialBucket,
    /// Time window.
    pub temporal: TemporalBucket,
    /// Elevation band, for statistics that depend on height.
    pub elevation_band: Option<i32>,
    /// Extra discriminator, such as a consumer id for scores.
    pub tag: Option<u64>,
}

impl CacheKey {
    /// Key without a discriminator.
    #[must_use]
    pub const fn new(kind: CacheKind, spatial: SpatialBucket, temporal: TemporalBucket) -> Self {
        Self {
            kind,
            spatial,
            temporal,
            elevation_band: None,
            tag: None,
        }
    }

    /// Attach an elevation band; `None` leaves the key band-less.
    #[must_use]
    pub const fn with_elevation_band(mut self, band: Option<i32>) -> Self {
        self.elevation_band = band;
        self
    }

    /// Attach a discriminator.
    #[must_use]
    pub const fn with_tag(mut self, tag: u64) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Time to live of the key's kind.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.kind.ttl()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:",
            self.kind.as_str(),
            self.spatial.lat_cell,
            self.spatial.lon_cell
        )?;
        match self.temporal {
            TemporalBucket::Day(day) => write!(f, "{day}")?,
            TemporalBucket::Season(season) => write!(f, "{season}")?,
        }
        if let Some(band) = self.elevation_band {
            write!(f, ":e{band}")?;
        }
        if let Some(tag) = self.tag {
            write!(f, ":{tag}")?;
        }
        Ok(())
    }
}
