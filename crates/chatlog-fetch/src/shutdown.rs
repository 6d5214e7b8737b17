//! Cooperative cancellation for batch runs.
//!
//! A [`ShutdownSignal`] is cloned into everything that needs to observe a
//! user abort. Requesting shutdown stops the coordinator from scheduling new
//! days. Requests already in flight get a grace period to finish, after which
//! they are abandoned and their days recorded as cancelled.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    requested: AtomicBool,
    notify: Notify,
}

/// Shared, cloneable shutdown flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    inner: Arc<Inner>,
}

impl ShutdownSignal {
    /// Creates a signal that has not been triggered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests shutdown. Wakes all waiters exactly once.
    pub fn request_shutdown(&self) {
        if !self.inner.requested.swap(true, Ordering::SeqCst) {
            self.inner.notify.notify_waiters();
        }
    }

    /// Whether shutdown has been requested.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.inner.requested.load(Ordering::SeqCst)
    }

    /// Waits until shutdown is requested. Returns immediately if already set.
    pub async fn wait_for_shutdown(&self) {
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);
        // Register before checking the flag so a concurrent request is not missed.
        notified.as_mut().enable();
        if self.is_shutdown_requested() {
            return;
        }
        notified.await;
    }

    /// Triggers this signal when the process receives Ctrl+C.
    pub fn install_ctrl_c_handler(&self) {
        let signal = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Ctrl+C received, stopping after in-flight days and saving progress");
                signal.request_shutdown();
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_initial_state() {
        let signal = ShutdownSignal::new();
        assert!(!signal.is_shutdown_requested());
    }

    #[tokio::test]
    async fn test_request_is_visible_to_clones() {
        let signal = ShutdownSignal::new();
        let clone = signal.clone();
        signal.request_shutdown();
        assert!(clone.is_shutdown_requested());
        // Already requested: returns immediately.
        clone.wait_for_shutdown().await;
    }

    #[tokio::test]
    async fn test_waiter_is_woken() {
        let signal = ShutdownSignal::new();
        let waiter = {
            let signal = signal.clone();
            tokio::spawn(async move { signal.wait_for_shutdown().await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        signal.request_shutdown();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake")
            .unwrap();
    }
}
