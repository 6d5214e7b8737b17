//! Fetch tasks, their outcomes, and the aggregated batch result.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{Channel, DayWindow};

/// Download of one channel's logs for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchTask {
    channel: Channel,
    day: NaiveDate,
}

impl FetchTask {
    /// Creates a new task.
    #[must_use]
    pub const fn new(channel: Channel, day: NaiveDate) -> Self {
        Self { channel, day }
    }

    /// Returns the channel.
    #[must_use]
    pub const fn channel(&self) -> &Channel {
        &self.channel
    }

    /// Returns the day.
    #[must_use]
    pub const fn day(&self) -> NaiveDate {
        self.day
    }

    /// Returns the query window for this task's day.
    #[must_use]
    pub fn window(&self) -> DayWindow {
        DayWindow::for_day(self.day)
    }
}

impl std::fmt::Display for FetchTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.channel, self.day)
    }
}

/// Skip reason for days whose file is already on disk.
pub const SKIP_ALREADY_DOWNLOADED: &str = "already downloaded";
/// Skip reason for days given up because the batch was cancelled.
pub const SKIP_CANCELLED: &str = "cancelled";

/// How a single [`FetchTask`] ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "lowercase")]
pub enum FetchOutcome {
    /// No request was made.
    Skipped(String),
    /// The day was downloaded; carries the number of bytes written.
    Success(u64),
    /// The request or the write failed; carries the error message.
    Failed(String),
}

impl FetchOutcome {
    /// Returns true for [`FetchOutcome::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns true for [`FetchOutcome::Skipped`].
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }

    /// Returns true for [`FetchOutcome::Failed`].
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Returns true for a skip caused by cancellation. No file exists for such a day.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Skipped(reason) if reason == SKIP_CANCELLED)
    }

    /// The outcome for a day whose file was already present.
    #[must_use]
    pub fn already_downloaded() -> Self {
        Self::Skipped(SKIP_ALREADY_DOWNLOADED.to_string())
    }

    /// The outcome for a day given up because the batch was cancelled.
    #[must_use]
    pub fn cancelled() -> Self {
        Self::Skipped(SKIP_CANCELLED.to_string())
    }
}

impl std::fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Skipped(reason) => write!(f, "skipped ({reason})"),
            Self::Success(bytes) => write!(f, "downloaded {bytes} bytes"),
            Self::Failed(detail) => write!(f, "failed: {detail}"),
        }
    }
}

/// Outcomes of a batch run keyed by day.
///
/// Outcomes may be recorded in any order; iteration is always chronological.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    channel: Channel,
    planned: usize,
    outcomes: BTreeMap<NaiveDate, FetchOutcome>,
    cancelled: bool,
}

impl BatchResult {
    /// Creates an empty result for a batch of `planned` days.
    #[must_use]
    pub const fn new(channel: Channel, planned: usize) -> Self {
        Self {
            channel,
            planned,
            outcomes: BTreeMap::new(),
            cancelled: false,
        }
    }

    /// Records the outcome for a day, replacing any earlier one.
    pub fn record(&mut self, day: NaiveDate, outcome: FetchOutcome) {
        self.outcomes.insert(day, outcome);
    }

    /// Marks the batch as stopped before every day was scheduled.
    pub const fn mark_cancelled(&mut self) {
        self.cancelled = true;
    }

    /// Returns the channel this batch fetched.
    #[must_use]
    pub const fn channel(&self) -> &Channel {
        &self.channel
    }

    /// Returns the outcome recorded for a day.
    #[must_use]
    pub fn get(&self, day: NaiveDate) -> Option<&FetchOutcome> {
        self.outcomes.get(&day)
    }

    /// Iterates over recorded outcomes in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &FetchOutcome)> + '_ {
        self.outcomes.iter().map(|(day, outcome)| (*day, outcome))
    }

    /// Iterates over failed days and their error messages in chronological order.
    pub fn failures(&self) -> impl Iterator<Item = (NaiveDate, &str)> + '_ {
        self.outcomes.iter().filter_map(|(day, outcome)| match outcome {
            FetchOutcome::Failed(detail) => Some((*day, detail.as_str())),
            _ => None,
        })
    }

    /// Number of days the batch was asked to fetch.
    #[must_use]
    pub const fn planned(&self) -> usize {
        self.planned
    }

    /// Number of days with a recorded outcome.
    #[must_use]
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of downloaded days.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes.values().filter(|o| o.is_success()).count()
    }

    /// Number of days skipped without a request, not counting [`abandoned`](Self::abandoned) ones.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.outcomes
            .values()
            .filter(|o| o.is_skipped() && !o.is_cancelled())
            .count()
    }

    /// Number of days scheduled but given up on cancellation, with no file written.
    #[must_use]
    pub fn abandoned(&self) -> usize {
        self.outcomes.values().filter(|o| o.is_cancelled()).count()
    }

    /// Number of failed days.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.values().filter(|o| o.is_failed()).count()
    }

    /// Number of planned days without an outcome (only non-zero after cancellation).
    #[must_use]
    pub fn pending(&self) -> usize {
        self.planned.saturating_sub(self.outcomes.len())
    }

    /// Total bytes written across downloaded days.
    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        self.outcomes
            .values()
            .map(|o| match o {
                FetchOutcome::Success(bytes) => *bytes,
                _ => 0,
            })
            .sum()
    }

    /// Returns true if the batch was cancelled.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Returns true if any day failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.outcomes.values().any(FetchOutcome::is_failed)
    }

    /// Renders the failure report: one `YYYY-MM-DD: message` line per failed day.
    #[must_use]
    pub fn failure_report(&self) -> String {
        self.failures()
            .map(|(day, detail)| format!("{}: {detail}\n", day.format("%Y-%m-%d")))
            .collect()
    }
}

impl std::fmt::Display for BatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} downloaded, {} skipped, {} failed",
            self.channel,
            self.succeeded(),
            self.skipped(),
            self.failed()
        )?;
        let abandoned = self.abandoned();
        if abandoned > 0 {
            write!(f, ", {abandoned} abandoned")?;
        }
        if self.cancelled {
            write!(f, ", {} not attempted (cancelled)", self.pending())?;
        }
        Ok(())
    }
}
