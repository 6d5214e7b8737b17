//! Chat lines as JSON records.
//!
//! Each line becomes one object whose keys are [`COLUMNS`](crate::COLUMNS), in table order,
//! so JSON output carries the same columns as the CSV and Parquet tables.

use chatlog_types::ChatLine;
use std::io::Write;

use crate::{FormatError, Formatter, OutputFormat};

/// How records are laid out in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// One top-level array holding every record.
    #[default]
    Array,
    /// One record per line, for appending and streaming readers.
    Ndjson,
}

/// Writes chat lines as JSON records.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    style: JsonStyle,
    /// Indent array output; records in NDJSON always stay on one line.
    pretty: bool,
}

impl JsonFormatter {
    /// Array of records on a single line.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            style: JsonStyle::Array,
            pretty: false,
        }
    }

    /// One record per line.
    #[must_use]
    pub const fn ndjson() -> Self {
        Self {
            style: JsonStyle::Ndjson,
            pretty: false,
        }
    }

    /// Indents array output.
    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Sets the record layout.
    #[must_use]
    pub const fn with_style(mut self, style: JsonStyle) -> Self {
        self.style = style;
        self
    }
}

impl Formatter for JsonFormatter {
    fn write_lines<W: Write + Send>(
        &self,
        lines: &[ChatLine],
        mut writer: W,
    ) -> Result<(), FormatError> {
        // ChatLine serializes its fields in COLUMNS order.
        match self.style {
            JsonStyle::Array if self.pretty => serde_json::to_writer_pretty(&mut writer, lines)?,
            JsonStyle::Array => serde_json::to_writer(&mut writer, lines)?,
            JsonStyle::Ndjson => {
                for line in lines {
                    serde_json::to_writer(&mut writer, line)?;
                    writeln!(writer)?;
                }
            }
        }
        if self.style == JsonStyle::Array {
            writeln!(writer)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn extension(&self) -> &str {
        match self.style {
            JsonStyle::Array => OutputFormat::Json.extension(),
            JsonStyle::Ndjson => OutputFormat::Ndjson.extension(),
        }
    }
}
