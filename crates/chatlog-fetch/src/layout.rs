//! On-disk layout of downloaded days and failure reports.

use chatlog_types::{BatchResult, Channel};
use chrono::NaiveDate;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where day files and failure reports live.
///
/// Day files: `{logs_dir}/{channel}_logs_{YYYY-MM-DD}.txt`.
/// Failure report: `{report_dir}/failed_downloads_{channel}.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLayout {
    logs_dir: PathBuf,
    report_dir: PathBuf,
}

impl Default for LogLayout {
    fn default() -> Self {
        Self::new("logs", ".")
    }
}

impl LogLayout {
    /// Creates a layout rooted at the given directories.
    #[must_use]
    pub fn new(logs_dir: impl Into<PathBuf>, report_dir: impl Into<PathBuf>) -> Self {
        Self {
            logs_dir: logs_dir.into(),
            report_dir: report_dir.into(),
        }
    }

    /// Returns the directory holding day files.
    #[must_use]
    pub fn logs_dir(&self) -> &Path {
        &self.logs_dir
    }

    /// Returns the directory holding failure reports.
    #[must_use]
    pub fn report_dir(&self) -> &Path {
        &self.report_dir
    }

    /// Returns the file a day is stored in. Its existence means the day is done.
    #[must_use]
    pub fn day_path(&self, channel: &Channel, day: NaiveDate) -> PathBuf {
        self.logs_dir
            .join(format!("{channel}_logs_{}.txt", day.format("%Y-%m-%d")))
    }

    /// Returns the failure report path for a channel.
    #[must_use]
    pub fn report_path(&self, channel: &Channel) -> PathBuf {
        self.report_dir
            .join(format!("failed_downloads_{channel}.txt"))
    }

    /// Creates the logs and report directories if missing.
    ///
    /// # Errors
    ///
    /// Returns the path and error of the first directory that cannot be created.
    pub async fn prepare(&self) -> Result<(), (PathBuf, io::Error)> {
        for dir in [&self.logs_dir, &self.report_dir] {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| (dir.clone(), e))?;
        }
        Ok(())
    }

    /// Writes `body` to `path` through a `.part` file so readers never see a
    /// partially written day. Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns an error if writing or renaming fails; the `.part` file is
    /// removed on a best-effort basis.
    pub async fn write_day(&self, path: &Path, body: &[u8]) -> io::Result<u64> {
        let tmp_path = path.with_extension("txt.part");
        let result = async {
            tokio::fs::write(&tmp_path, body).await?;
            tokio::fs::rename(&tmp_path, path).await
        }
        .await;

        if let Err(e) = result {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e);
        }
        debug!(path = %path.display(), bytes = body.len(), "wrote day file");
        Ok(body.len() as u64)
    }

    /// Writes the failure report for `result` if any day failed.
    ///
    /// Returns the report path when a report was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the report cannot be written.
    pub async fn write_report(&self, result: &BatchResult) -> io::Result<Option<PathBuf>> {
        if !result.has_failures() {
            return Ok(None);
        }
        let path = self.report_path(result.channel());
        tokio::fs::write(&path, result.failure_report()).await?;
        Ok(Some(path))
    }
}
