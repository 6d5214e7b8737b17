//! Rate-limited concurrent batch downloader for chatlog.
//!
//! This crate provides the download pipeline:
//!
//! - [`url::channel_url`] - Constructs log service URLs
//! - [`LogClient`] - HTTP client with connection pooling, no retries
//! - [`RateLimiter`] - Sliding-window limit on call starts, shared by all workers
//! - [`ConcurrencyGate`] - Bounds in-flight network calls
//! - [`DayFetcher`] - Fetches and stores a single day
//! - [`ChannelValidator`] - Pre-flight channel existence probe
//! - [`BatchCoordinator`] - Runs a whole date range and writes the failure report

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/chatlog-rs/chatlog/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod batch;
mod client;
mod fetcher;
mod gate;
mod layout;
mod rate_limit;
mod shutdown;
pub mod url;
mod validate;

pub use batch::{BatchConfig, BatchCoordinator, BatchError};
pub use client::{ClientConfig, FetchError, LogClient};
pub use chatlog_types::{SKIP_ALREADY_DOWNLOADED, SKIP_CANCELLED};
pub use fetcher::{DEFAULT_CANCEL_GRACE, DayFetcher};
pub use gate::{ConcurrencyGate, GateClosed};
pub use layout::LogLayout;
pub use rate_limit::RateLimiter;
pub use shutdown::ShutdownSignal;
pub use validate::{ChannelStatus, ChannelValidator, NO_LOGS_MARKER};
