//! Data access for the Talus risk engine.
//!
//! This crate sits between the outside world and the pure scoring core:
//!
//! - [`WeatherSource`] and [`ElevationSource`] describe providers, with
//!   [`HttpWeatherSource`] talking to an Open-Meteo compatible API.
//! - [`KeyValueCache`] stores bincode-encoded values under bucketed
//!   [`CacheKey`]s; [`MemoryCache`] keeps them in process.
//! - [`ConditionsFetcher`] resolves weather for many reference points with
//!   bounded concurrency, degrading to neutral values on any failure.
//! - [`ingest_records`] turns raw [`IncidentRecord`] rows into a scoring
//!   snapshot using an injected
//!   [`CategoryClassifier`](talus_core::CategoryClassifier).
#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod cache;
mod fetcher;
mod ingest;
mod source;

pub use cache::{
    CacheError, CacheKey, CacheKind, KeyValueCache, MemoryCache, SPATIAL_BUCKET_DEGREES,
    SpatialBucket, TemporalBucket, decode, encode,
};
pub use fetcher::{ConditionsFetcher, DEFAULT_CACHE_TIMEOUT, DEFAULT_FETCH_CONCURRENCY, FetchConfig};
pub use ingest::{
    IncidentIngestReport, IncidentRecord, IngestError, PhraseRuleClassifier, infer_severity,
    ingest_incident_file, ingest_reader, ingest_records,
};
pub use source::{
    DEFAULT_USER_AGENT, ELEVATION_BAND_METRES, ElevationSource, HttpWeatherSource,
    HttpWeatherSourceConfig, SourceError, StatisticsBucket, WeatherSource, elevation_band,
};
