//! Output formatting for the chatlog CLI.

use anyhow::{Context, Result};
use chatlog_lib::prelude::*;
use clap::ValueEnum;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Output format for the combined table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    Csv,
    Json,
    Ndjson,
    Parquet,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => Self::Csv,
            Format::Json => Self::Json,
            Format::Ndjson => Self::Ndjson,
            Format::Parquet => Self::Parquet,
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", OutputFormat::from(*self))
    }
}

/// Write chat lines to a file in the specified format, creating parent directories.
pub(crate) fn write_lines(lines: &[ChatLine], output: &Path, format: Format) -> Result<()> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file = File::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let writer = BufWriter::new(file);

    match format {
        Format::Csv => CsvFormatter::new().write_lines(lines, writer)?,
        Format::Json => JsonFormatter::new().write_lines(lines, writer)?,
        Format::Ndjson => JsonFormatter::ndjson().write_lines(lines, writer)?,
        Format::Parquet => {
            #[cfg(feature = "parquet")]
            {
                ParquetFormatter::new().write_lines(lines, writer)?;
            }
            #[cfg(not(feature = "parquet"))]
            {
                anyhow::bail!("Parquet support not compiled in");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_lines_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("processed_logs/combined_chat_logs.ndjson");
        let ts = chatlog_lib::parse_date("2024-01-01")
            .unwrap()
            .and_hms_opt(0, 0, 1)
            .unwrap();
        let lines = vec![ChatLine::new(ts, "foo", "bar", "hi", "x.txt")];

        write_lines(&lines, &output, Format::Ndjson).unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written.lines().count(), 1);
    }

    #[test]
    fn test_format_display_is_extension() {
        assert_eq!(Format::Parquet.to_string(), "parquet");
        assert_eq!(OutputFormat::from(Format::Ndjson).extension(), "ndjson");
    }
}
