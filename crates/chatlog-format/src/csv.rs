//! CSV output format.

use chatlog_types::ChatLine;
use std::io::Write;

use crate::{COLUMNS, FormatError, Formatter};

/// CSV formatter.
///
/// Fields are quoted as needed, so messages may contain the delimiter,
/// quotes, or line breaks.
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    /// Field delimiter (default: comma).
    delimiter: u8,
    /// Whether to include header row.
    include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvFormatter {
    /// Creates a new CSV formatter with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: b',',
            include_header: true,
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether to include a header row.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Creates a tab-separated values (TSV) formatter.
    #[must_use]
    pub const fn tsv() -> Self {
        Self {
            delimiter: b'\t',
            include_header: true,
        }
    }
}

impl Formatter for CsvFormatter {
    fn write_lines<W: Write + Send>(
        &self,
        lines: &[ChatLine],
        writer: W,
    ) -> Result<(), FormatError> {
        // Headers are written by hand so an empty input still yields the header row.
        let mut out = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .from_writer(writer);

        if self.include_header {
            out.write_record(COLUMNS)?;
        }
        for line in lines {
            out.serialize(line)?;
        }
        out.flush()?;

        Ok(())
    }

    fn extension(&self) -> &str {
        if self.delimiter == b'\t' { "tsv" } else { "csv" }
    }
}
