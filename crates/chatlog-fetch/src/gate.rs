//! Admission control for in-flight network calls.

use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;

/// The gate was closed while waiting for a permit.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("concurrency gate closed")]
pub struct GateClosed;

/// Counting gate limiting how many network calls run at once.
///
/// Independent of the worker count: workers decide how many days are being
/// processed, the gate decides how many of them hold an open request.
#[derive(Debug, Clone)]
pub struct ConcurrencyGate {
    semaphore: Arc<Semaphore>,
    permits: usize,
}

impl ConcurrencyGate {
    /// Default number of permits.
    pub const DEFAULT_PERMITS: usize = 5;

    /// Creates a gate with `permits` permits. Zero is treated as one.
    #[must_use]
    pub fn new(permits: usize) -> Self {
        let permits = permits.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(permits)),
            permits,
        }
    }

    /// Runs `body` while holding one permit.
    ///
    /// The permit is released when `body` finishes, whatever it returns, and
    /// also when this future is dropped mid-flight.
    ///
    /// # Errors
    ///
    /// Returns [`GateClosed`] if the gate is closed before a permit is acquired;
    /// `body` is not polled in that case.
    pub async fn with_permit<F, T>(&self, body: F) -> Result<T, GateClosed>
    where
        F: Future<Output = T>,
    {
        let _permit = self.semaphore.acquire().await.map_err(|_| GateClosed)?;
        Ok(body.await)
    }

    /// Stops admitting new calls. Calls already holding a permit are unaffected.
    pub fn close(&self) {
        self.semaphore.close();
    }

    /// Returns true once [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.semaphore.is_closed()
    }

    /// Returns the total number of permits.
    #[must_use]
    pub const fn permits(&self) -> usize {
        self.permits
    }

    /// Returns the number of currently free permits.
    #[must_use]
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

impl Default for ConcurrencyGate {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PERMITS)
    }
}
