//! The combined chat table and the formats it can be written in.

use chatlog_types::ChatLine;
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;

/// Column names of the combined table, in order.
///
/// CSV headers, JSON record keys and the Parquet schema all use these names.
/// [`ChatLine`] declares its fields in the same order.
pub const COLUMNS: [&str; 5] = ["timestamp", "channel", "username", "message", "source_file"];

/// File format for the combined chat table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// One header row, then one row per chat line.
    #[default]
    Csv,
    /// A single array of chat line records.
    Json,
    /// One chat line record per line.
    Ndjson,
    /// Columnar file with timestamps stored as UTC microseconds.
    Parquet,
}

impl OutputFormat {
    /// File extension used for the default output path.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Ndjson => "ndjson",
            Self::Parquet => "parquet",
        }
    }

    /// Every format the convert command accepts.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Csv, Self::Json, Self::Ndjson, Self::Parquet]
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "ndjson" | "jsonl" => Ok(Self::Ndjson),
            "parquet" | "pq" => Ok(Self::Parquet),
            _ => Err(FormatError::UnknownFormat(s.to_string())),
        }
    }
}

/// Errors that can occur while collecting or writing chat lines.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Format name not recognized when parsing an [`OutputFormat`].
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// The logs root does not exist or is not a directory.
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Reading a day file or writing the table failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be encoded as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A row could not be encoded as CSV.
    #[cfg(feature = "csv")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Building the Arrow batch or writing the Parquet file failed.
    #[error("Parquet error: {0}")]
    Parquet(String),
}

/// Writes a slice of chat lines as one table.
///
/// Implementations emit columns in [`COLUMNS`] order and write a valid,
/// empty table when `lines` is empty.
pub trait Formatter: Send + Sync {
    /// Writes `lines` to `writer` in input order.
    ///
    /// # Errors
    ///
    /// Returns an error if a line cannot be encoded or the writer fails.
    fn write_lines<W: Write + Send>(&self, lines: &[ChatLine], writer: W)
    -> Result<(), FormatError>;

    /// File extension for tables written by this formatter.
    fn extension(&self) -> &str;
}
