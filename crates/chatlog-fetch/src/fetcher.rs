//! Single-day fetch: skip check, throttled request, persist.

use chatlog_types::{FetchOutcome, FetchTask};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{ConcurrencyGate, FetchError, LogClient, LogLayout, RateLimiter, ShutdownSignal};

/// Default time an in-flight request may keep running after shutdown.
pub const DEFAULT_CANCEL_GRACE: Duration = Duration::from_secs(2);

/// Fetches one day and stores it, turning every error into an outcome.
///
/// Cloning is cheap; clones share the same limiter, gate and shutdown signal.
#[derive(Debug, Clone)]
pub struct DayFetcher {
    client: LogClient,
    limiter: Arc<RateLimiter>,
    gate: ConcurrencyGate,
    layout: LogLayout,
    shutdown: ShutdownSignal,
    cancel_grace: Duration,
}

impl DayFetcher {
    /// Creates a fetcher over shared rate and concurrency state.
    ///
    /// The fetcher gets its own shutdown signal, so requests are never
    /// abandoned until [`with_cancellation`](Self::with_cancellation) is used.
    #[must_use]
    pub fn new(
        client: LogClient,
        limiter: Arc<RateLimiter>,
        gate: ConcurrencyGate,
        layout: LogLayout,
    ) -> Self {
        Self {
            client,
            limiter,
            gate,
            layout,
            shutdown: ShutdownSignal::new(),
            cancel_grace: DEFAULT_CANCEL_GRACE,
        }
    }

    /// Abandons in-flight requests once `grace` has passed after `shutdown` fires.
    #[must_use]
    pub fn with_cancellation(mut self, shutdown: ShutdownSignal, grace: Duration) -> Self {
        self.shutdown = shutdown;
        self.cancel_grace = grace;
        self
    }

    /// Returns the file layout.
    #[must_use]
    pub const fn layout(&self) -> &LogLayout {
        &self.layout
    }

    /// Fetches `task`'s day.
    ///
    /// - file already present: `Skipped`, no request made
    /// - non-2xx status, transport error, or write error: `Failed` with the error message
    /// - shutdown before the request started, or a request still running when
    ///   the grace period after shutdown ends: `Skipped` as cancelled, no file
    /// - otherwise the body is written verbatim and `Success` carries its length
    ///
    /// Failed requests are not retried; rerunning the batch picks them up.
    pub async fn fetch(&self, task: &FetchTask) -> FetchOutcome {
        match self.try_fetch(task).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(channel = %task.channel(), day = %task.day(), error = %e, "day failed");
                FetchOutcome::Failed(e.to_string())
            }
        }
    }

    async fn try_fetch(&self, task: &FetchTask) -> Result<FetchOutcome, FetchError> {
        let window = task.window();
        let path = self.layout.day_path(task.channel(), task.day());

        let exists = tokio::fs::try_exists(&path)
            .await
            .map_err(|source| FetchError::Filesystem {
                path: path.clone(),
                source,
            })?;
        if exists {
            debug!(path = %path.display(), "day already downloaded");
            return Ok(FetchOutcome::already_downloaded());
        }

        self.limiter.acquire().await;
        let request = self
            .gate
            .with_permit(self.client.fetch_day(task.channel(), &window));
        let response = tokio::select! {
            response = request => response,
            () = self.grace_expired() => {
                warn!(channel = %task.channel(), day = %task.day(), "request abandoned after shutdown");
                return Ok(FetchOutcome::cancelled());
            }
        };
        let Ok(response) = response else {
            return Ok(FetchOutcome::cancelled());
        };
        let body = response?;

        let written = self
            .layout
            .write_day(&path, &body)
            .await
            .map_err(|source| FetchError::Filesystem { path, source })?;
        Ok(FetchOutcome::Success(written))
    }

    /// Resolves once shutdown was requested and the grace period has elapsed.
    async fn grace_expired(&self) {
        self.shutdown.wait_for_shutdown().await;
        tokio::time::sleep(self.cancel_grace).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientConfig;
    use chatlog_types::Channel;
    use chrono::NaiveDate;
    use std::time::Instant;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher(base_url: &str, layout: LogLayout) -> DayFetcher {
        let client = LogClient::new(ClientConfig::default().with_base_url(base_url)).unwrap();
        DayFetcher::new(
            client,
            Arc::new(RateLimiter::new(100, Duration::from_secs(1))),
            ConcurrencyGate::new(2),
            layout,
        )
    }

    fn task(day: u32) -> FetchTask {
        FetchTask::new(
            Channel::new("foo").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_success_writes_body_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/channel/foo"))
            .and(query_param("from", "2024-01-05T00:00:00Z"))
            .respond_with(ResponseTemplate::new(200).set_body_string("a\nb\n"))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let fetcher = fetcher(&server.uri(), LogLayout::new(dir.path(), dir.path()));

        let outcome = fetcher.fetch(&task(5)).await;

        assert_eq!(outcome, FetchOutcome::Success(4));
        let stored = std::fs::read_to_string(dir.path().join("foo_logs_2024-01-05.txt")).unwrap();
        assert_eq!(stored, "a\nb\n");
    }

    #[tokio::test]
    async fn test_existing_file_is_skipped_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("foo_logs_2024-01-05.txt"), "old").unwrap();
        let fetcher = fetcher(&server.uri(), LogLayout::new(dir.path(), dir.path()));

        let outcome = fetcher.fetch(&task(5)).await;

        assert_eq!(outcome, FetchOutcome::already_downloaded());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("foo_logs_2024-01-05.txt")).unwrap(),
            "old"
        );
    }

    #[tokio::test]
    async fn test_http_error_is_failed_and_no_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let fetcher = fetcher(&server.uri(), LogLayout::new(dir.path(), dir.path()));

        let outcome = fetcher.fetch(&task(5)).await;

        let FetchOutcome::Failed(detail) = outcome else {
            panic!("expected failure, got {outcome:?}");
        };
        assert!(detail.contains("503"));
        assert!(!dir.path().join("foo_logs_2024-01-05.txt").exists());
    }

    #[tokio::test]
    async fn test_write_error_is_failed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("x"))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let layout = LogLayout::new(dir.path().join("does-not-exist"), dir.path());
        let fetcher = fetcher(&server.uri(), layout);

        let outcome = fetcher.fetch(&task(5)).await;

        assert!(outcome.is_failed());
    }

    #[tokio::test]
    async fn test_closed_gate_skips_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let fetcher = fetcher(&server.uri(), LogLayout::new(dir.path(), dir.path()));
        fetcher.gate.close();

        let outcome = fetcher.fetch(&task(5)).await;

        assert_eq!(outcome, FetchOutcome::cancelled());
    }

    #[tokio::test]
    async fn test_hung_request_is_abandoned_after_grace() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("late")
                    .set_delay(Duration::from_secs(30)),
            )
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let shutdown = ShutdownSignal::new();
        let fetcher = fetcher(&server.uri(), LogLayout::new(dir.path(), dir.path()))
            .with_cancellation(shutdown.clone(), Duration::from_millis(50));

        let started = Instant::now();
        let fetch = tokio::spawn(async move { fetcher.fetch(&task(5)).await });
        tokio::time::sleep(Duration::from_millis(100)).await;
        shutdown.request_shutdown();
        let outcome = fetch.await.unwrap();

        assert_eq!(outcome, FetchOutcome::cancelled());
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(!dir.path().join("foo_logs_2024-01-05.txt").exists());
    }

    #[tokio::test]
    async fn test_request_finishing_within_grace_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("ok")
                    .set_delay(Duration::from_millis(100)),
            )
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let shutdown = ShutdownSignal::new();
        shutdown.request_shutdown();
        let fetcher = fetcher(&server.uri(), LogLayout::new(dir.path(), dir.path()))
            .with_cancellation(shutdown, Duration::from_secs(10));

        let outcome = fetcher.fetch(&task(5)).await;

        assert_eq!(outcome, FetchOutcome::Success(2));
    }
}
