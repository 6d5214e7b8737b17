//! Convert command implementation.
//!
//! Collects every downloaded day file into one table.

use crate::display::{Format, write_lines};
use anyhow::{Context, Result};
use chatlog_lib::default_output_path;
use chatlog_lib::prelude::*;
use std::path::{Path, PathBuf};

/// Parse all `*.txt` files under `logs_dir` and write them as one table.
pub(crate) fn convert(
    logs_dir: &Path,
    output: Option<PathBuf>,
    format: Format,
    quiet: bool,
) -> Result<()> {
    let (lines, stats) = collect_lines(logs_dir)
        .with_context(|| format!("Failed to read logs from {}", logs_dir.display()))?;

    let output =
        output.unwrap_or_else(|| default_output_path(OutputFormat::from(format).extension()));
    write_lines(&lines, &output, format)?;

    if !quiet {
        println!(
            "Read {} lines from {} files, wrote {} rows ({} dropped)",
            stats.lines_read,
            stats.files_read,
            stats.rows,
            stats.dropped()
        );
        if stats.files_skipped > 0 {
            println!("Skipped {} unreadable files", stats.files_skipped);
        }
        println!("Output written to: {}", output.display());
    }

    Ok(())
}
