//! Library for downloading and converting chat log archives.
//!
//! This is a facade crate that re-exports functionality from the chatlog
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```no_run
//! use chatlog_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let channel = Channel::new("forsen")?;
//!     let client = LogClient::with_defaults()?;
//!     let coordinator = BatchCoordinator::new(client, BatchConfig::default());
//!
//!     let result = coordinator
//!         .run(
//!             &channel,
//!             parse_date("2024-01-01")?,
//!             parse_date("2024-01-07")?,
//!         )
//!         .await?;
//!     println!("{result}");
//!
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/chatlog-rs/chatlog/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use chatlog_types::*;

// Re-export download pipeline
#[cfg(feature = "fetch")]
pub use chatlog_fetch::{
    BatchConfig, BatchCoordinator, BatchError, ChannelStatus, ChannelValidator, ClientConfig,
    ConcurrencyGate, DayFetcher, FetchError, GateClosed, LogClient, LogLayout, RateLimiter,
    ShutdownSignal, url,
};

// Re-export parsing and formatters
#[cfg(feature = "format")]
pub use chatlog_format::{
    COLUMNS, CollectStats, CsvFormatter, FormatError, Formatter, JsonFormatter, JsonStyle,
    OutputFormat, collect_lines, default_output_path, parse_chat_line,
};

#[cfg(all(feature = "format", feature = "parquet"))]
pub use chatlog_format::ParquetFormatter;

/// Prelude module for convenient imports.
///
/// ```
/// use chatlog_lib::prelude::*;
/// ```
pub mod prelude {
    pub use chatlog_types::{
        BatchResult, Channel, ChannelError, ChatLine, DateRange, DateRangeError, FetchOutcome,
        parse_date,
    };

    #[cfg(feature = "fetch")]
    pub use chatlog_fetch::{
        BatchConfig, BatchCoordinator, ChannelValidator, ClientConfig, LogClient, ShutdownSignal,
    };

    #[cfg(feature = "format")]
    pub use chatlog_format::{CsvFormatter, Formatter, JsonFormatter, OutputFormat, collect_lines};

    #[cfg(all(feature = "format", feature = "parquet"))]
    pub use chatlog_format::ParquetFormatter;
}
