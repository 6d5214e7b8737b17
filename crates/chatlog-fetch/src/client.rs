//! HTTP client for the log service.

use bytes::Bytes;
use chatlog_types::{Channel, DayWindow};
use reqwest::{Client, StatusCode};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::url::{DEFAULT_BASE_URL, channel_url};

/// Configuration for the log client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the log service.
    pub base_url: String,
    /// User agent string.
    pub user_agent: String,
    /// Total request timeout. `None` leaves the HTTP client's default in place.
    pub timeout: Option<Duration>,
    /// Connection timeout. `None` leaves the HTTP client's default in place.
    pub connect_timeout: Option<Duration>,
    /// Idle connections kept per host.
    pub pool_max_idle_per_host: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: format!("chatlog/{}", env!("CARGO_PKG_VERSION")),
            timeout: None,
            connect_timeout: None,
            pool_max_idle_per_host: 5,
        }
    }
}

impl ClientConfig {
    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the total request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Errors that can occur while fetching or storing a single day.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure (DNS, connect, reset, body read, timeout).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("HTTP status {status}")]
    HttpStatus {
        /// HTTP status code.
        status: StatusCode,
    },

    /// Writing the day file failed.
    #[error("Failed to write '{path}': {source}")]
    Filesystem {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// HTTP client with connection pooling. Requests are never retried.
#[derive(Debug, Clone)]
pub struct LogClient {
    client: Client,
    config: ClientConfig,
}

impl LogClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .user_agent(&config.user_agent)
            .gzip(true);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    /// Creates a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, reqwest::Error> {
        Self::new(ClientConfig::default())
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Downloads one day of logs, returning the raw body.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::HttpStatus`] for any non-2xx status and
    /// [`FetchError::Network`] for transport failures.
    pub async fn fetch_day(&self, channel: &Channel, window: &DayWindow) -> Result<Bytes, FetchError> {
        let url = channel_url(&self.config.base_url, channel);
        let params = window.query_params();
        debug!(%channel, day = %window.day(), %url, "requesting day");

        let response = self.client.get(&url).query(&params[..]).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus { status });
        }
        Ok(response.bytes().await?)
    }

    /// Requests the channel page without a window, returning status and body.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Network`] if the request or body read fails.
    pub async fn probe(&self, channel: &Channel) -> Result<(StatusCode, String), FetchError> {
        let url = channel_url(&self.config.base_url, channel);
        debug!(%channel, %url, "probing channel");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }
}
