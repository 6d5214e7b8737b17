//! Core types for the chatlog archive downloader.
//!
//! This crate provides the fundamental data structures used throughout chatlog:
//!
//! - [`Channel`] - A validated, lower-cased channel name
//! - [`DateRange`] - Inclusive calendar range, iterated one day at a time
//! - [`DayWindow`] - The half-open `[from, to)` UTC interval for one day
//! - [`FetchTask`] / [`FetchOutcome`] - One day's download and how it ended
//! - [`BatchResult`] - Per-day outcomes of a batch run with derived counts
//! - [`ChatLine`] - A single parsed chat message

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/chatlog-rs/chatlog/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod batch;
mod channel;
mod chat_line;
mod date_range;
mod error;

pub use batch::{BatchResult, FetchOutcome, FetchTask, SKIP_ALREADY_DOWNLOADED, SKIP_CANCELLED};
pub use channel::Channel;
pub use chat_line::{ChatLine, LINE_TIMESTAMP_FORMAT};
pub use date_range::{DateRange, DayIterator, DayWindow, WINDOW_TIMESTAMP_FORMAT, parse_date};
pub use error::{ChannelError, DateRangeError};
