//! Apache Parquet output format.

use arrow::array::{StringArray, TimestampMicrosecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chatlog_types::ChatLine;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::io::Write;
use std::sync::Arc;

use crate::{FormatError, Formatter};

/// Parquet formatter.
#[derive(Debug, Clone)]
pub struct ParquetFormatter {
    /// Row group size (number of rows per group).
    row_group_size: usize,
    /// Compression codec.
    compression: Compression,
}

impl Default for ParquetFormatter {
    fn default() -> Self {
        Self {
            row_group_size: 100_000,
            compression: Compression::SNAPPY,
        }
    }
}

impl ParquetFormatter {
    /// Creates a new Parquet formatter with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the row group size. Zero is treated as one.
    #[must_use]
    pub const fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = if size == 0 { 1 } else { size };
        self
    }

    /// Sets the compression codec.
    #[must_use]
    pub const fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Log timestamps carry no zone; they are stored as UTC.
    fn line_schema() -> Schema {
        Schema::new(vec![
            Field::new(
                "timestamp",
                DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
                false,
            ),
            Field::new("channel", DataType::Utf8, false),
            Field::new("username", DataType::Utf8, false),
            Field::new("message", DataType::Utf8, false),
            Field::new("source_file", DataType::Utf8, false),
        ])
    }

    fn lines_to_batch(schema: &Arc<Schema>, lines: &[ChatLine]) -> Result<RecordBatch, FormatError> {
        let timestamps: Vec<_> = lines
            .iter()
            .map(|l| l.timestamp.and_utc().timestamp_micros())
            .collect();

        RecordBatch::try_new(
            Arc::clone(schema),
            vec![
                Arc::new(TimestampMicrosecondArray::from(timestamps).with_timezone("UTC")),
                Arc::new(string_column(lines, |l| l.channel.as_str())),
                Arc::new(string_column(lines, |l| l.username.as_str())),
                Arc::new(string_column(lines, |l| l.message.as_str())),
                Arc::new(string_column(lines, |l| l.source_file.as_str())),
            ],
        )
        .map_err(|e| FormatError::Parquet(e.to_string()))
    }
}

fn string_column(lines: &[ChatLine], field: impl Fn(&ChatLine) -> &str) -> StringArray {
    StringArray::from_iter_values(lines.iter().map(field))
}

impl Formatter for ParquetFormatter {
    fn write_lines<W: Write + Send>(
        &self,
        lines: &[ChatLine],
        writer: W,
    ) -> Result<(), FormatError> {
        let schema = Arc::new(Self::line_schema());
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut arrow_writer = ArrowWriter::try_new(writer, Arc::clone(&schema), Some(props))
            .map_err(|e| FormatError::Parquet(e.to_string()))?;

        for chunk in lines.chunks(self.row_group_size) {
            let batch = Self::lines_to_batch(&schema, chunk)?;
            arrow_writer
                .write(&batch)
                .map_err(|e| FormatError::Parquet(e.to_string()))?;
        }

        arrow_writer
            .close()
            .map_err(|e| FormatError::Parquet(e.to_string()))?;

        Ok(())
    }

    fn extension(&self) -> &str {
        "parquet"
    }
}
