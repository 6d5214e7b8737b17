//! Pre-flight channel existence check.

use chatlog_types::Channel;
use reqwest::StatusCode;
use tracing::{debug, info};

use crate::LogClient;

/// Body marker the service returns (with HTTP 200) for unknown channels.
pub const NO_LOGS_MARKER: &str = "No logs found";

/// Result of probing a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelStatus {
    /// The service has logs for the channel.
    Available,
    /// The service answered 200 but reported no logs.
    NoLogs,
    /// The service answered with a status other than 200.
    HttpStatus(StatusCode),
    /// The request failed before a response was read.
    Unreachable(String),
}

impl ChannelStatus {
    /// Returns true only for [`ChannelStatus::Available`].
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}

impl std::fmt::Display for ChannelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => f.write_str("logs available"),
            Self::NoLogs => f.write_str("no logs found"),
            Self::HttpStatus(status) => write!(f, "HTTP status {status}"),
            Self::Unreachable(e) => write!(f, "unreachable: {e}"),
        }
    }
}

/// Checks whether the log service knows a channel.
///
/// Runs once before a batch and is not subject to the batch's rate limiter
/// or concurrency gate.
#[derive(Debug, Clone)]
pub struct ChannelValidator {
    client: LogClient,
}

impl ChannelValidator {
    /// Creates a validator using `client`.
    #[must_use]
    pub const fn new(client: LogClient) -> Self {
        Self { client }
    }

    /// Probes the channel and classifies the answer.
    pub async fn probe(&self, channel: &Channel) -> ChannelStatus {
        let status = match self.client.probe(channel).await {
            Ok((status, _)) if status != StatusCode::OK => ChannelStatus::HttpStatus(status),
            Ok((_, body)) if body.contains(NO_LOGS_MARKER) => ChannelStatus::NoLogs,
            Ok(_) => ChannelStatus::Available,
            Err(e) => ChannelStatus::Unreachable(e.to_string()),
        };
        debug!(%channel, %status, "channel probe finished");
        if status.is_available() {
            info!(%channel, "channel found");
        }
        status
    }

    /// Returns true if the channel has logs. Any error counts as "no".
    pub async fn exists(&self, channel: &Channel) -> bool {
        self.probe(channel).await.is_available()
    }
}
