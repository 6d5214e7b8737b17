//! Recursive collection of chat lines from a logs directory.

use chatlog_types::ChatLine;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::{FormatError, parse_chat_line};

/// Counters from a collection run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectStats {
    /// `*.txt` files read successfully.
    pub files_read: usize,
    /// `*.txt` files that could not be read and were skipped.
    pub files_skipped: usize,
    /// Lines read, including empty and malformed ones.
    pub lines_read: usize,
    /// Lines that became rows.
    pub rows: usize,
}

impl CollectStats {
    /// Lines that were read but produced no row.
    #[must_use]
    pub const fn dropped(&self) -> usize {
        self.lines_read.saturating_sub(self.rows)
    }
}

/// Reads every `*.txt` file below `root` and parses each line.
///
/// Files are visited in file-name order so output is stable between runs.
/// Unreadable files and directories are logged and skipped.
///
/// # Errors
///
/// Returns [`FormatError::NotADirectory`] if `root` is not a directory.
pub fn collect_lines(root: &Path) -> Result<(Vec<ChatLine>, CollectStats), FormatError> {
    if !root.is_dir() {
        return Err(FormatError::NotADirectory(root.to_path_buf()));
    }

    let mut rows = Vec::new();
    let mut stats = CollectStats::default();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_log_file(entry.path()) {
            continue;
        }

        let source = entry.path().display().to_string();
        debug!(file = %source, "processing log file");
        let content = match std::fs::read_to_string(entry.path()) {
            Ok(content) => content,
            Err(e) => {
                warn!(file = %source, error = %e, "skipping unreadable log file");
                stats.files_skipped += 1;
                continue;
            }
        };

        stats.files_read += 1;
        for line in content.lines() {
            stats.lines_read += 1;
            if let Some(row) = parse_chat_line(line, &source) {
                rows.push(row);
            }
        }
    }

    stats.rows = rows.len();
    Ok((rows, stats))
}

fn is_log_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "txt")
}

/// Default location of the combined table.
#[must_use]
pub fn default_output_path(extension: &str) -> PathBuf {
    PathBuf::from("processed_logs").join(format!("combined_chat_logs.{extension}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_collects_recursively_and_drops_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("foo");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            dir.path().join("a_logs_2024-01-01.txt"),
            "[2024-01-01 00:00:01] #a x: one\n\ngarbage\n",
        )
        .unwrap();
        fs::write(
            nested.join("foo_logs_2024-01-02.txt"),
            "[2024-01-02 12:00:00] #foo y: two\n[2024-01-02 12:00:01] #foo z: three\n",
        )
        .unwrap();
        fs::write(dir.path().join("notes.md"), "[2024-01-01 00:00:00] #a x: skip").unwrap();
        fs::write(dir.path().join("partial.txt.part"), "[2024-01-01 00:00:00] #a x: skip").unwrap();

        let (rows, stats) = collect_lines(dir.path()).unwrap();

        assert_eq!(stats.files_read, 2);
        assert_eq!(stats.lines_read, 5);
        assert_eq!(stats.rows, 3);
        assert_eq!(stats.dropped(), 2);
        let messages: Vec<_> = rows.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, vec!["one", "two", "three"]);
        assert!(rows[1].source_file.ends_with("foo_logs_2024-01-02.txt"));
    }

    #[test]
    fn test_invalid_utf8_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.txt"), [0xff, 0xfe, 0x00]).unwrap();
        fs::write(dir.path().join("good.txt"), "[2024-01-01 00:00:01] #a x: ok\n").unwrap();

        let (rows, stats) = collect_lines(dir.path()).unwrap();

        assert_eq!(stats.files_skipped, 1);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let err = collect_lines(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, FormatError::NotADirectory(_)));
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path("csv"),
            PathBuf::from("processed_logs/combined_chat_logs.csv")
        );
    }
}
