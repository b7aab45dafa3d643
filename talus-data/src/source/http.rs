//! HTTP weather and elevation source for Open-Meteo compatible services.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use geo::Coord;
//! use talus_data::{HttpWeatherSource, HttpWeatherSourceConfig, WeatherSource};
//!
//! # async fn run() -> Result<(), talus_data::SourceError> {
//! let config = HttpWeatherSourceConfig::new("https://archive-api.open-meteo.com")
//!     .with_timeout(Duration::from_secs(10));
//! let source = HttpWeatherSource::with_config(config)?;
//! let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 7).expect("valid date");
//! let week = source
//!     .current_pattern(Coord { x: -105.29, y: 40.0 }, date)
//!     .await?;
//! println!("days observed: {:?}", week.map(|pattern| pattern.present_days()));
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Days, Months, NaiveDate};
use geo::Coord;
use reqwest::Client;
use serde::de::DeserializeOwned;
use talus_core::{HistoricalWeatherStatistics, WeatherPattern};
use url::Url;

use super::open_meteo::{ArchiveResponse, DAILY_FIELDS, ElevationResponse};
use super::{ElevationSource, SourceError, StatisticsBucket, WeatherSource};

/// Default user agent for provider requests.
pub const DEFAULT_USER_AGENT: &str = "talus-weather/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Years of archive sampled for seasonal statistics.
const DEFAULT_STATISTICS_YEARS: u32 = 5;

/// Configuration for [`HttpWeatherSource`].
#[derive(Debug, Clone)]
pub struct HttpWeatherSourceConfig {
    /// Base URL of the archive service (e.g. `"https://archive-api.open-meteo.com"`).
    pub archive_url: String,
    /// Base URL of the elevation service.
    pub elevation_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Years of archive sampled for statistics.
    pub statistics_years: u32,
}

impl Default for HttpWeatherSourceConfig {
    fn default() -> Self {
        Self {
            archive_url: "https://archive-api.open-meteo.com".to_owned(),
            elevation_url: "https://api.open-meteo.com".to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            statistics_years: DEFAULT_STATISTICS_YEARS,
        }
    }
}

impl HttpWeatherSourceConfig {
    /// Configuration with the given archive base URL.
    #[must_use]
    pub fn new(archive_url: impl Into<String>) -> Self {
        Self {
            archive_url: archive_url.into(),
            ..Self::default()
        }
    }

    /// Set the elevation base URL.
    #[must_use]
    pub fn with_elevation_url(mut self, elevation_url: impl Into<String>) -> Self {
        self.elevation_url = elevation_url.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the statistics window in years.
    #[must_use]
    pub const fn with_statistics_years(mut self, years: u32) -> Self {
        self.statistics_years = years;
        self
    }
}

/// Weather and elevation over HTTP.
#[derive(Debug, Clone)]
pub struct HttpWeatherSource {
    client: Client,
    config: HttpWeatherSourceConfig,
}

impl HttpWeatherSource {
    /// Source with default configuration against `archive_url`.
    ///
    /// # Errors
    /// Returns [`SourceError::Client`] when the HTTP client fails to build.
    pub fn new(archive_url: impl Into<String>) -> Result<Self, SourceError> {
        Self::with_config(HttpWeatherSourceConfig::new(archive_url))
    }

    /// Source with explicit configuration.
    ///
    /// # Errors
    /// Returns [`SourceError::Client`] when the HTTP client fails to build.
    pub fn with_config(config: HttpWeatherSourceConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(|source| SourceError::Client { source })?;
        Ok(Self { client, config })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &HttpWeatherSourceConfig {
        &self.config
    }

    fn endpoint(base: &str, path: &str) -> Result<Url, SourceError> {
        let text = format!("{}{path}", base.trim_end_matches('/'));
        Url::parse(&text).map_err(|source| SourceError::Url { url: text, source })
    }

    /// Archive URL for daily series between `start` and `end` inclusive.
    ///
    /// An `elevation_m` asks the service to downscale to that height.
    fn archive_url(
        &self,
        location: Coord<f64>,
        elevation_m: Option<f64>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Url, SourceError> {
        let mut url = Self::endpoint(&self.config.archive_url, "/v1/archive")?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("latitude", &location.y.to_string())
                .append_pair("longitude", &location.x.to_string());
            if let Some(metres) = elevation_m {
                query.append_pair("elevation", &metres.to_string());
            }
            query
                .append_pair("start_date", &start.to_string())
                .append_pair("end_date", &end.to_string())
                .append_pair("daily", DAILY_FIELDS)
                .append_pair("timezone", "UTC");
        }
        Ok(url)
    }

    fn elevation_url(&self, location: Coord<f64>) -> Result<Url, SourceError> {
        let mut url = Self::endpoint(&self.config.elevation_url, "/v1/elevation")?;
        url.query_pairs_mut()
            .append_pair("latitude", &location.y.to_string())
            .append_pair("longitude", &location.x.to_string());
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, SourceError> {
        let text = url.to_string();
        log::debug!("requesting {text}");
        self.client
            .get(url)
            .send()
            .await
            .map_err(|err| SourceError::from_reqwest(&err, &text))?
            .error_for_status()
            .map_err(|err| SourceError::from_reqwest(&err, &text))?
            .json()
            .await
            .map_err(|err| SourceError::Parse {
                url: text.clone(),
                message: err.to_string(),
            })
    }

    fn statistics_window(&self, as_of: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        let months = self.config.statistics_years.checked_mul(12)?;
        let start = as_of.checked_sub_months(Months::new(months))?;
        let end = as_of.checked_sub_days(Days::new(1))?;
        (start <= end).then_some((start, end))
    }
}

#[async_trait]
impl WeatherSource for HttpWeatherSource {
    async fn current_pattern(
        &self,
        location: Coord<f64>,
        date: NaiveDate,
    ) -> Result<Option<WeatherPattern>, SourceError> {
        let Some(start) = date.checked_sub_days(Days::new(6)) else {
            return Ok(None);
        };
        let url = self.archive_url(location, None, start, date)?;
        let response: ArchiveResponse = self.get_json(url).await?;
        Ok(response
            .daily
            .and_then(|series| series.pattern_ending(date)))
    }

    async fn historical_statistics(
        &self,
        bucket: &StatisticsBucket,
    ) -> Result<Option<HistoricalWeatherStatistics>, SourceError> {
        let Some((start, end)) = self.statistics_window(bucket.as_of) else {
            return Ok(None);
        };
        let url = self.archive_url(bucket.location, bucket.band_midpoint_m(), start, end)?;
        let response: ArchiveResponse = self.get_json(url).await?;
        Ok(response
            .daily
            .and_then(|series| series.seasonal_statistics(bucket.season)))
    }
}

#[async_trait]
impl ElevationSource for HttpWeatherSource {
    async fn elevation(&self, location: Coord<f64>) -> Result<Option<f64>, SourceError> {
        let url = self.elevation_url(location)?;
        let response: ElevationResponse = self.get_json(url).await?;
        Ok(response.first())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use talus_core::test_support::date;

    #[fixture]
    fn source() -> HttpWeatherSource {
        HttpWeatherSource::new("http://weather.example.com/").expect("source should build")
    }

    fn query(url: &Url, key: &str) -> Option<String> {
        url.query_pairs()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.into_owned())
    }

    #[rstest]
    fn archive_url_carries_location_and_window(source: HttpWeatherSource) {
        let url = source
            .archive_url(
                Coord { x: -105.25, y: 40.5 },
                None,
                date(2024, 1, 1),
                date(2024, 1, 7),
            )
            .expect("url");
        assert_eq!(url.path(), "/v1/archive");
        assert_eq!(query(&url, "latitude").as_deref(), Some("40.5"));
        assert_eq!(query(&url, "longitude").as_deref(), Some("-105.25"));
        assert_eq!(query(&url, "start_date").as_deref(), Some("2024-01-01"));
        assert_eq!(query(&url, "end_date").as_deref(), Some("2024-01-07"));
        assert_eq!(query(&url, "daily").as_deref(), Some(DAILY_FIELDS));
        assert_eq!(query(&url, "elevation"), None);
    }

    #[rstest]
    fn statistics_url_carries_the_band_elevation(source: HttpWeatherSource) {
        let bucket =
            StatisticsBucket::new(Coord { x: 7.0, y: 46.0 }, Some(2_100.0), date(2024, 7, 1));
        let url = source
            .archive_url(
                bucket.location,
                bucket.band_midpoint_m(),
                date(2019, 7, 1),
                date(2024, 6, 30),
            )
            .expect("url");
        assert_eq!(query(&url, "elevation").as_deref(), Some("2250"));
    }

    #[rstest]
    fn elevation_url_uses_its_own_base(source: HttpWeatherSource) {
        let url = source
            .elevation_url(Coord { x: 7.0, y: 46.0 })
            .expect("url");
        assert!(url.as_str().starts_with("https://api.open-meteo.com/v1/elevation?"));
    }

    #[rstest]
    fn invalid_base_is_reported() {
        let source = HttpWeatherSource::new("not a url").expect("client builds");
        let err = source
            .archive_url(Coord { x: 0.0, y: 0.0 }, None, date(2024, 1, 1), date(2024, 1, 2))
            .expect_err("invalid base");
        assert!(matches!(err, SourceError::Url { .. }));
    }

    #[rstest]
    fn statistics_window_spans_configured_years(source: HttpWeatherSource) {
        let (start, end) = source
            .statistics_window(date(2024, 3, 1))
            .expect("window");
        assert_eq!(start, date(2019, 3, 1));
        assert_eq!(end, date(2024, 2, 29));
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = HttpWeatherSourceConfig::new("http://example.com")
            .with_elevation_url("http://elevation.example.com")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("test-agent/1.0")
            .with_statistics_years(3);
        assert_eq!(config.archive_url, "http://example.com");
        assert_eq!(config.elevation_url, "http://elevation.example.com");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "test-agent/1.0");
        assert_eq!(config.statistics_years, 3);
    }
}
