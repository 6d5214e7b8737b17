//! Batch coordination across a date range.

use chatlog_types::{BatchResult, Channel, DateRange, DateRangeError, FetchOutcome, FetchTask};
use chrono::NaiveDate;
use futures::future;
use futures::stream::{self, StreamExt};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::{
    ChannelStatus, ChannelValidator, ConcurrencyGate, DEFAULT_CANCEL_GRACE, DayFetcher, LogClient,
    LogLayout, RateLimiter, ShutdownSignal,
};

/// Configuration for a batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Days processed concurrently.
    pub workers: usize,
    /// Network calls in flight at once.
    pub max_concurrent_requests: usize,
    /// Call starts allowed per `rate_period`.
    pub rate_limit: usize,
    /// Length of the rate limiting window.
    pub rate_period: Duration,
    /// Directory for day files.
    pub logs_dir: PathBuf,
    /// Directory for the failure report.
    pub report_dir: PathBuf,
    /// Probe the channel before scheduling any day.
    pub validate_channel: bool,
    /// How long in-flight requests may run after shutdown before they are abandoned.
    pub cancel_grace: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            workers: 10,
            max_concurrent_requests: ConcurrencyGate::DEFAULT_PERMITS,
            rate_limit: RateLimiter::DEFAULT_MAX_CALLS,
            rate_period: RateLimiter::DEFAULT_PERIOD,
            logs_dir: PathBuf::from("logs"),
            report_dir: PathBuf::from("."),
            validate_channel: true,
            cancel_grace: DEFAULT_CANCEL_GRACE,
        }
    }
}

impl BatchConfig {
    /// Sets the worker count.
    #[must_use]
    pub const fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Sets the number of concurrent network calls.
    #[must_use]
    pub const fn with_max_concurrent_requests(mut self, max: usize) -> Self {
        self.max_concurrent_requests = max;
        self
    }

    /// Sets the rate limit.
    #[must_use]
    pub const fn with_rate_limit(mut self, calls: usize, period: Duration) -> Self {
        self.rate_limit = calls;
        self.rate_period = period;
        self
    }

    /// Sets the directory for day files.
    #[must_use]
    pub fn with_logs_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.logs_dir = dir.into();
        self
    }

    /// Sets the directory for the failure report.
    #[must_use]
    pub fn with_report_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.report_dir = dir.into();
        self
    }

    /// Enables or disables the pre-flight channel probe.
    #[must_use]
    pub const fn with_channel_validation(mut self, enabled: bool) -> Self {
        self.validate_channel = enabled;
        self
    }

    /// Sets the grace period for in-flight requests after shutdown.
    /// Zero abandons them as soon as shutdown is requested.
    #[must_use]
    pub const fn with_cancel_grace(mut self, grace: Duration) -> Self {
        self.cancel_grace = grace;
        self
    }

    /// Checks that every limit is usable.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::Config`] naming the first zero-valued setting.
    pub fn validate(&self) -> Result<(), BatchError> {
        let checks = [
            ("workers", self.workers == 0),
            ("max_concurrent_requests", self.max_concurrent_requests == 0),
            ("rate_limit", self.rate_limit == 0),
            ("rate_period", self.rate_period.is_zero()),
        ];
        match checks.iter().find(|(_, bad)| *bad) {
            Some((name, _)) => Err(BatchError::Config(format!("{name} must be greater than zero"))),
            None => Ok(()),
        }
    }

    /// Returns the file layout described by this configuration.
    #[must_use]
    pub fn layout(&self) -> LogLayout {
        LogLayout::new(&self.logs_dir, &self.report_dir)
    }
}

/// Errors that stop a batch before any day is scheduled.
#[derive(Error, Debug)]
pub enum BatchError {
    /// Start is after end, or a date could not be parsed.
    #[error(transparent)]
    InvalidRange(#[from] DateRangeError),

    /// The channel probe did not find logs.
    #[error("Channel {channel} not available: {status}")]
    ChannelNotFound {
        /// The channel that was probed.
        channel: Channel,
        /// What the probe saw.
        status: ChannelStatus,
    },

    /// Invalid batch configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// An output directory could not be created.
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDir {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// Runs one [`DayFetcher`] per day of a range and aggregates the outcomes.
///
/// A failed day never aborts the batch. The run itself only fails on
/// pre-flight errors: bad range, bad configuration, unknown channel, or an
/// output directory that cannot be created.
#[derive(Debug, Clone)]
pub struct BatchCoordinator {
    client: LogClient,
    config: BatchConfig,
    shutdown: ShutdownSignal,
}

impl BatchCoordinator {
    /// Creates a coordinator.
    #[must_use]
    pub fn new(client: LogClient, config: BatchConfig) -> Self {
        Self {
            client,
            config,
            shutdown: ShutdownSignal::new(),
        }
    }

    /// Uses `shutdown` to stop scheduling new days and, after
    /// [`BatchConfig::cancel_grace`], to abandon requests still in flight.
    #[must_use]
    pub fn with_shutdown(mut self, shutdown: ShutdownSignal) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Returns the batch configuration.
    #[must_use]
    pub const fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Returns the shutdown signal observed by this coordinator.
    #[must_use]
    pub const fn shutdown(&self) -> &ShutdownSignal {
        &self.shutdown
    }

    /// Fetches every day from `start` to `end` inclusive.
    ///
    /// # Errors
    ///
    /// Returns an error only for pre-flight failures; per-day failures are
    /// recorded in the returned [`BatchResult`].
    pub async fn run(
        &self,
        channel: &Channel,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BatchResult, BatchError> {
        self.run_with_progress(channel, start, end, |_, _| {}).await
    }

    /// Like [`run`](Self::run), calling `on_outcome` as each day completes.
    ///
    /// Days complete in arbitrary order.
    ///
    /// # Errors
    ///
    /// Returns an error only for pre-flight failures.
    pub async fn run_with_progress<F>(
        &self,
        channel: &Channel,
        start: NaiveDate,
        end: NaiveDate,
        mut on_outcome: F,
    ) -> Result<BatchResult, BatchError>
    where
        F: FnMut(NaiveDate, &FetchOutcome),
    {
        self.config.validate()?;
        let range = DateRange::new(start, end)?;

        let layout = self.config.layout();
        layout
            .prepare()
            .await
            .map_err(|(path, source)| BatchError::OutputDir { path, source })?;

        if self.config.validate_channel {
            let status = ChannelValidator::new(self.client.clone()).probe(channel).await;
            if !status.is_available() {
                return Err(BatchError::ChannelNotFound {
                    channel: channel.clone(),
                    status,
                });
            }
        }

        let limiter = Arc::new(RateLimiter::new(
            self.config.rate_limit,
            self.config.rate_period,
        ));
        let gate = ConcurrencyGate::new(self.config.max_concurrent_requests);
        let fetcher = DayFetcher::new(self.client.clone(), limiter, gate.clone(), layout.clone())
            .with_cancellation(self.shutdown.clone(), self.config.cancel_grace);

        // Queued days waiting for a permit give up once shutdown is requested.
        let gate_closer = {
            let shutdown = self.shutdown.clone();
            let gate = gate.clone();
            tokio::spawn(async move {
                shutdown.wait_for_shutdown().await;
                gate.close();
            })
        };

        info!(
            %channel,
            %range,
            days = range.total_days(),
            workers = self.config.workers,
            max_concurrent_requests = self.config.max_concurrent_requests,
            "starting batch"
        );

        let mut result = BatchResult::new(channel.clone(), range.total_days());
        let shutdown = &self.shutdown;
        let fetcher = &fetcher;
        let mut outcomes = stream::iter(range.days())
            .take_while(|_| future::ready(!shutdown.is_shutdown_requested()))
            .map(|day| {
                let task = FetchTask::new(channel.clone(), day);
                async move {
                    let outcome = fetcher.fetch(&task).await;
                    (day, outcome)
                }
            })
            .buffer_unordered(self.config.workers);

        while let Some((day, outcome)) = outcomes.next().await {
            on_outcome(day, &outcome);
            result.record(day, outcome);
        }
        drop(outcomes);
        gate_closer.abort();

        if self.shutdown.is_shutdown_requested() {
            result.mark_cancelled();
            warn!(
                %channel,
                pending = result.pending(),
                abandoned = result.abandoned(),
                "batch cancelled"
            );
        }

        match layout.write_report(&result).await {
            Ok(Some(path)) => {
                warn!(
                    %channel,
                    failed = result.failed(),
                    report = %path.display(),
                    "wrote failure report"
                );
            }
            Ok(None) => {}
            Err(e) => {
                let report = layout.report_path(channel);
                error!(
                    %channel,
                    report = %report.display(),
                    error = %e,
                    "failed to write failure report"
                );
            }
        }

        info!(
            %channel,
            succeeded = result.succeeded(),
            skipped = result.skipped(),
            failed = result.failed(),
            "batch finished"
        );
        Ok(result)
    }
}
