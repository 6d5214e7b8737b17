//! Chat log parsing and output formatters for chatlog.
//!
//! This crate turns downloaded day files into one table:
//!
//! - [`parse_chat_line`] - Parses a single `[timestamp] #channel user: message` line
//! - [`collect_lines`] - Walks a logs directory and parses every `*.txt` file
//! - [`CsvFormatter`] - CSV format
//! - [`JsonFormatter`] - JSON array or NDJSON format
//! - [`ParquetFormatter`] - Apache Parquet columnar format

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/chatlog-rs/chatlog/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod collect;
#[cfg(feature = "csv")]
mod csv;
mod formatter;
mod json;
mod parse;

#[cfg(feature = "parquet")]
mod parquet;

pub use collect::{CollectStats, collect_lines, default_output_path};
#[cfg(feature = "csv")]
pub use crate::csv::CsvFormatter;
pub use formatter::{COLUMNS, FormatError, Formatter, OutputFormat};
pub use json::{JsonFormatter, JsonStyle};
pub use parse::parse_chat_line;

#[cfg(feature = "parquet")]
pub use crate::parquet::ParquetFormatter;
