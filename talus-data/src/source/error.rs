//! Errors raised by weather and elevation sources.

use thiserror::Error;

/// Failures contacting or decoding a remote data source.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    Client {
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },
    /// A request URL could not be formed from the configured base.
    #[error("invalid source URL {url}: {source}")]
    Url {
        /// URL text that failed to parse.
        url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
    /// The server returned an HTTP error status.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        /// Fully qualified request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Short error description.
        message: String,
    },
    /// The request timed out.
    #[error("request to {url} timed out")]
    Timeout {
        /// Fully qualified request URL.
        url: String,
    },
    /// The request failed before a response arrived.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Fully qualified request URL.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The response body did not match the expected shape.
    #[error("failed to decode response from {url}: {message}")]
    Parse {
        /// Fully qualified request URL.
        url: String,
        /// Decoder error description.
        message: String,
    },
}

impl SourceError {
    /// Classify a `reqwest` failure for `url`.
    pub(crate) fn from_reqwest(error: &reqwest::Error, url: &str) -> Self {
        if error.is_timeout() {
            return Self::Timeout {
                url: url.to_owned(),
            };
        }
        if let Some(status) = error.status() {
            return Self::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }
        if error.is_decode() {
            return Self::Parse {
                url: url.to_owned(),
                message: error.to_string(),
            };
        }
        Self::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}
