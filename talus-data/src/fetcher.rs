//! Resolve weather and elevation for reference points ahead of scoring.
//!
//! Every provider and cache call made here may fail or stall. Failures are
//! logged and degrade to `None`, which the scorer treats as neutral, so a
//! slow provider never fails a run.

use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;

use chrono::NaiveDate;
use futures_util::{StreamExt, stream};
use geo::Coord;
use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use talus_core::{
    BatchPoint, BatchRequest, Consumer, ConsumerId, HistoricalWeatherStatistics, PointConditions,
    ReferencePoint, ScoreResult, WeatherPattern,
};
use tokio::time::timeout;

use crate::cache::{CacheKey, CacheKind, KeyValueCache, SpatialBucket, TemporalBucket};
use crate::cache::{decode, encode};
use crate::source::{ElevationSource, SourceError, StatisticsBucket, WeatherSource};

/// Default number of points fetched concurrently.
pub const DEFAULT_FETCH_CONCURRENCY: usize = 8;

/// Default bound on a single cache call.
pub const DEFAULT_CACHE_TIMEOUT: Duration = Duration::from_millis(250);

/// Concurrency and timeout settings for [`ConditionsFetcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchConfig {
    /// Maximum points in flight at once. Zero is treated as one.
    pub concurrency: usize,
    /// Bound on each cache read or write.
    pub cache_timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_FETCH_CONCURRENCY,
            cache_timeout: DEFAULT_CACHE_TIMEOUT,
        }
    }
}

impl FetchConfig {
    /// Override the concurrency cap.
    #[must_use]
    pub const fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Override the cache timeout.
    #[must_use]
    pub const fn with_cache_timeout(mut self, cache_timeout: Duration) -> Self {
        self.cache_timeout = cache_timeout;
        self
    }
}

/// What a pending batch point still lacks.
#[derive(Debug, Clone, Copy)]
struct Pending {
    index: usize,
    location: Coord<f64>,
    known_elevation_m: Option<f64>,
    weather: bool,
    statistics: bool,
    elevation: bool,
}

/// Values fetched for a pending batch point.
#[derive(Debug, Default)]
struct Filled {
    current_weather: Option<WeatherPattern>,
    statistics: Option<HistoricalWeatherStatistics>,
    elevation_m: Option<f64>,
}

/// Cache-first, bounded-concurrency access to weather and elevation.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use geo::Coord;
/// use talus_data::{
///     ConditionsFetcher, FetchConfig, MemoryCache, StatisticsBucket, WeatherSource,
/// };
/// use talus_core::{HistoricalWeatherStatistics, WeatherPattern};
///
/// struct NoWeather;
///
/// #[async_trait::async_trait]
/// impl WeatherSource for NoWeather {
///     async fn current_pattern(
///         &self,
///         _: Coord<f64>,
///         _: NaiveDate,
///     ) -> Result<Option<WeatherPattern>, talus_data::SourceError> {
///         Ok(None)
///     }
///
///     async fn historical_statistics(
///         &self,
///         _: &StatisticsBucket,
///     ) -> Result<Option<HistoricalWeatherStatistics>, talus_data::SourceError> {
///         Ok(None)
///     }
/// }
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().expect("runtime").block_on(async {
/// let cache = MemoryCache::new();
/// let fetcher = ConditionsFetcher::new(&NoWeather, &cache, FetchConfig::default());
/// let day = NaiveDate::from_ymd_opt(2024, 1, 7).expect("valid date");
/// let conditions = fetcher
///     .conditions(Coord { x: -105.27, y: 40.01 }, Some(1655.0), day)
///     .await;
/// assert!(conditions.current_weather.is_none());
/// # });
/// ```
pub struct ConditionsFetcher<'a> {
    weather: &'a dyn WeatherSource,
    cache: &'a dyn KeyValueCache,
    elevation: Option<&'a dyn ElevationSource>,
    config: FetchConfig,
}

impl std::fmt::Debug for ConditionsFetcher<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConditionsFetcher")
            .field("elevation", &self.elevation.is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<'a> ConditionsFetcher<'a> {
    /// Fetcher over a weather source and cache, without elevation lookups.
    #[must_use]
    pub const fn new(
        weather: &'a dyn WeatherSource,
        cache: &'a dyn KeyValueCache,
        config: FetchConfig,
    ) -> Self {
        Self {
            weather,
            cache,
            elevation: None,
            config,
        }
    }

    /// Also fill missing reference-point elevations from `source`.
    #[must_use]
    pub const fn with_elevation(mut self, source: &'a dyn ElevationSource) -> Self {
        self.elevation = Some(source);
        self
    }

    /// Active settings.
    #[must_use]
    pub const fn config(&self) -> FetchConfig {
        self.config
    }

    /// Current pattern at `location` and seasonal statistics for its
    /// elevation band.
    pub async fn conditions(
        &self,
        location: Coord<f64>,
        elevation_m: Option<f64>,
        date: NaiveDate,
    ) -> PointConditions {
        let (current_weather, statistics) = tokio::join!(
            self.current_pattern(location, date),
            self.statistics(location, elevation_m, date)
        );
        PointConditions {
            current_weather,
            statistics,
        }
    }

    /// Trailing week ending on `date`, cached per day and spatial bucket.
    pub async fn current_pattern(
        &self,
        location: Coord<f64>,
        date: NaiveDate,
    ) -> Option<WeatherPattern> {
        let key = CacheKey::new(
            CacheKind::Forecast,
            SpatialBucket::of(location),
            TemporalBucket::Day(date),
        );
        self.cached_or_fetch(key, self.weather.current_pattern(location, date))
            .await
    }

    /// Statistics for the season of `date`, cached per season, spatial
    /// bucket and elevation band.
    pub async fn statistics(
        &self,
        location: Coord<f64>,
        elevation_m: Option<f64>,
        date: NaiveDate,
    ) -> Option<HistoricalWeatherStatistics> {
        let bucket = StatisticsBucket::new(location, elevation_m, date);
        let key = CacheKey::new(
            CacheKind::Statistics,
            SpatialBucket::of(location),
            TemporalBucket::Season(bucket.season),
        )
        .with_elevation_band(bucket.elevation_band);
        self.cached_or_fetch(key, async move {
            self.weather.historical_statistics(&bucket).await
        })
        .await
    }

    /// Terrain elevation at `location`, when an elevation source is set.
    pub async fn elevation(&self, location: Coord<f64>) -> Option<f64> {
        let source = self.elevation?;
        match source.elevation(location).await {
            Ok(elevation) => elevation.filter(|metres| metres.is_finite()),
            Err(err) => {
                warn!("elevation lookup failed; continuing without elevation: {err}");
                None
            }
        }
    }

    /// Conditions for every reference point, in input order.
    pub async fn fetch_all(
        &self,
        points: &[ReferencePoint],
        date: NaiveDate,
    ) -> Vec<PointConditions> {
        let mut fetched: Vec<(usize, PointConditions)> =
            stream::iter(points.iter().enumerate())
                .map(|(index, point)| async move {
                    (
                        index,
                        self.conditions(point.location, point.elevation_m, date).await,
                    )
                })
                .buffer_unordered(self.config.concurrency.max(1))
                .collect()
                .await;
        fetched.sort_by_key(|(index, _)| *index);
        fetched.into_iter().map(|(_, conditions)| conditions).collect()
    }

    /// Fill weather, statistics and elevation that `points` do not already
    /// carry. Supplied values are never replaced.
    ///
    /// Returns the number of points that needed at least one lookup.
    pub async fn fill_missing(&self, points: &mut [BatchPoint], date: NaiveDate) -> usize {
        let pending: Vec<Pending> = points
            .iter()
            .enumerate()
            .filter_map(|(index, point)| {
                let job = Pending {
                    index,
                    location: point.reference_point.location,
                    known_elevation_m: point.reference_point.elevation_m,
                    weather: point.conditions.current_weather.is_none(),
                    statistics: point.conditions.statistics.is_none(),
                    elevation: self.elevation.is_some()
                        && point.reference_point.elevation_m.is_none(),
                };
                (job.weather || job.statistics || job.elevation).then_some(job)
            })
            .collect();
        let count = pending.len();
        debug!("filling conditions for {count} of {} points", points.len());

        let filled: Vec<(usize, Filled)> = stream::iter(pending)
            .map(|job| async move { (job.index, self.fill(job, date).await) })
            .buffer_unordered(self.config.concurrency.max(1))
            .collect()
            .await;
        for (index, values) in filled {
            let Some(point) = points.get_mut(index) else {
                continue;
            };
            if values.current_weather.is_some() {
                point.conditions.current_weather = values.current_weather;
            }
            if values.statistics.is_some() {
                point.conditions.statistics = values.statistics;
            }
            if values.elevation_m.is_some() {
                point.reference_point.elevation_m = values.elevation_m;
            }
        }
        count
    }

    /// Score `request`, reusing scores cached for the same consumer, spatial
    /// bucket and day.
    ///
    /// Only consumers without a cached score are handed to `score`; its
    /// results are cached for the score time to live. Cached scores assume
    /// the incident snapshot does not change within that window.
    pub async fn score_with_cache<F>(
        &self,
        request: &BatchRequest<'_>,
        score: F,
    ) -> BTreeMap<ConsumerId, ScoreResult>
    where
        F: FnOnce(&BatchRequest<'_>) -> BTreeMap<ConsumerId, ScoreResult>,
    {
        let date = request.target_date;
        let lookups = request.points.iter().enumerate().flat_map(|(point_index, point)| {
            point.consumers.iter().enumerate().map(move |(consumer_index, consumer)| {
                (point_index, consumer_index, point, consumer)
            })
        });
        let mut looked_up: Vec<(usize, usize, Option<ScoreResult>)> = stream::iter(lookups)
            .map(|(point_index, consumer_index, point, consumer)| async move {
                let cached = self
                    .cached_score(point.reference_point.location, consumer.id, date)
                    .await;
                (point_index, consumer_index, cached)
            })
            .buffer_unordered(self.config.concurrency.max(1))
            .collect()
            .await;
        looked_up.sort_by_key(|(point_index, consumer_index, _)| (*point_index, *consumer_index));

        let mut results = BTreeMap::new();
        let mut misses: Vec<BatchPoint> = Vec::new();
        let mut open: Option<(usize, BatchPoint)> = None;
        for (point_index, consumer_index, cached) in looked_up {
            let Some(point) = request.points.get(point_index) else {
                continue;
            };
            let Some(consumer) = point.consumers.get(consumer_index) else {
                continue;
            };
            if let Some(hit) = cached {
                results.insert(consumer.id, hit);
                continue;
            }
            match open.as_mut() {
                Some((index, partial)) if *index == point_index => {
                    partial.consumers.push(consumer.clone());
                }
                _ => {
                    if let Some((_, done)) = open.take() {
                        misses.push(done);
                    }
                    open = Some((point_index, miss_point(point, consumer)));
                }
            }
        }
        if let Some((_, done)) = open {
            misses.push(done);
        }
        debug!(
            "reusing {} cached scores; scoring {} points",
            results.len(),
            misses.len()
        );
        if misses.is_empty() {
            return results;
        }

        let fresh = score(&BatchRequest {
            target_date: date,
            incidents: request.incidents,
            points: &misses,
        });
        let stores = misses.iter().flat_map(|point| {
            point.consumers.iter().filter_map(|consumer| {
                fresh
                    .get(&consumer.id)
                    .map(|result| (point.reference_point.location, consumer.id, result))
            })
        });
        stream::iter(stores)
            .for_each_concurrent(self.config.concurrency.max(1), |(location, id, result)| {
                self.store_score(location, id, result)
            })
            .await;
        results.extend(fresh);
        results
    }

    /// A score cached for `consumer` near `location` on `date`.
    pub async fn cached_score(
        &self,
        location: Coord<f64>,
        consumer: ConsumerId,
        date: NaiveDate,
    ) -> Option<ScoreResult> {
        self.read(&score_key(location, consumer, date)).await
    }

    /// Remember `result` for `consumer` near `location`.
    pub async fn store_score(
        &self,
        location: Coord<f64>,
        consumer: ConsumerId,
        result: &ScoreResult,
    ) {
        self.write(&score_key(location, consumer, result.metadata.target_date), result)
            .await;
    }

    async fn fill(&self, job: Pending, date: NaiveDate) -> Filled {
        let (current_weather, (statistics, elevation_m)) = tokio::join!(
            async {
                if job.weather {
                    self.current_pattern(job.location, date).await
                } else {
                    None
                }
            },
            async {
                // Statistics are banded by elevation; resolve it first.
                let elevation_m = if job.elevation {
                    self.elevation(job.location).await
                } else {
                    None
                };
                let statistics = if job.statistics {
                    self.statistics(job.location, job.known_elevation_m.or(elevation_m), date)
                        .await
                } else {
                    None
                };
                (statistics, elevation_m)
            }
        );
        Filled {
            current_weather,
            statistics,
            elevation_m,
        }
    }

    async fn cached_or_fetch<T, F>(&self, key: CacheKey, fetch: F) -> Option<T>
    where
        T: Serialize + DeserializeOwned,
        F: Future<Output = Result<Option<T>, SourceError>>,
    {
        if let Some(value) = self.read(&key).await {
            return Some(value);
        }
        match fetch.await {
            Ok(Some(value)) => {
                self.write(&key, &value).await;
                Some(value)
            }
            Ok(None) => None,
            Err(err) => {
                warn!("weather lookup for {key} failed; using neutral weather: {err}");
                None
            }
        }
    }

    async fn read<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let rendered = key.to_string();
        let bytes = match timeout(self.config.cache_timeout, self.cache.get(&rendered)).await {
            Ok(Ok(bytes)) => bytes?,
            Ok(Err(err)) => {
                warn!("cache read for {rendered} failed: {err}");
                return None;
            }
            Err(_) => {
                warn!(
                    "cache read for {rendered} timed out after {:?}",
                    self.config.cache_timeout
                );
                return None;
            }
        };
        match decode(&bytes) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("ignoring undecodable cache entry {rendered}: {err}");
                None
            }
        }
    }

    async fn write<T: Serialize>(&self, key: &CacheKey, value: &T) {
        let rendered = key.to_string();
        let bytes = match encode(value) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!("not caching {rendered}: {err}");
                return;
            }
        };
        match timeout(
            self.config.cache_timeout,
            self.cache.set(&rendered, bytes, key.ttl()),
        )
        .await
        {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!("cache write for {rendered} failed: {err}"),
            Err(_) => warn!(
                "cache write for {rendered} timed out after {:?}",
                self.config.cache_timeout
            ),
        }
    }
}

fn miss_point(point: &BatchPoint, consumer: &Consumer) -> BatchPoint {
    BatchPoint {
        reference_point: point.reference_point,
        conditions: point.conditions.clone(),
        consumers: vec![consumer.clone()],
    }
}

fn score_key(location: Coord<f64>, consumer: ConsumerId, date: NaiveDate) -> CacheKey {
    CacheKey::new(
        CacheKind::Score,
        SpatialBucket::of(location),
        TemporalBucket::Day(date),
    )
    .with_tag(consumer.0)
}
