//! Parsed chat messages.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp format used by log lines and by tabular output.
pub const LINE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single chat message extracted from a log file.
///
/// Field order matches the column order of the combined table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatLine {
    /// When the message was sent, as written in the log (UTC).
    #[serde(with = "line_timestamp")]
    pub timestamp: NaiveDateTime,
    /// Channel the message was sent in.
    pub channel: String,
    /// Display name of the sender.
    pub username: String,
    /// Message text.
    pub message: String,
    /// Log file the line was read from.
    pub source_file: String,
}

impl ChatLine {
    /// Creates a new chat line.
    #[must_use]
    pub fn new(
        timestamp: NaiveDateTime,
        channel: impl Into<String>,
        username: impl Into<String>,
        message: impl Into<String>,
        source_file: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            channel: channel.into(),
            username: username.into(),
            message: message.into(),
            source_file: source_file.into(),
        }
    }
}

mod line_timestamp {
    use super::LINE_TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&ts.format(LINE_TIMESTAMP_FORMAT))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, LINE_TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}
