//! Timing reports for a finished batch.
//!
//! A report is either one JSON document holding the whole [`BatchSummary`],
//! or JSON Lines with one [`ProcessedImage`] record per line.

use serde::Serialize;
use std::io::{self, Write};

use crate::types::BatchSummary;

/// Report format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// The full summary as a single JSON object
    #[default]
    Json,
    /// One processed-image record per line (newline-delimited JSON)
    JsonLines,
}

/// A writer that serializes batch results as JSON or JSONL.
pub struct ReportWriter<W: Write> {
    writer: W,
    format: ReportFormat,
    pretty: bool,
    items_written: usize,
}

impl<W: Write> ReportWriter<W> {
    /// Create a new report writer.
    ///
    /// `pretty` only affects the JSON format.
    pub fn new(writer: W, format: ReportFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            items_written: 0,
        }
    }

    /// Write a single item as one JSON value followed by a newline.
    pub fn write<T: Serialize>(&mut self, item: &T) -> io::Result<()> {
        if self.pretty && self.format == ReportFormat::Json {
            serde_json::to_writer_pretty(&mut self.writer, item).map_err(io::Error::other)?;
        } else {
            serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
        }
        writeln!(self.writer)?;
        self.items_written += 1;
        Ok(())
    }

    /// Write a batch summary in the configured format.
    pub fn write_summary(&mut self, summary: &BatchSummary) -> io::Result<()> {
        match self.format {
            ReportFormat::Json => self.write(summary),
            ReportFormat::JsonLines => {
                for record in &summary.processed {
                    self.write(record)?;
                }
                Ok(())
            }
        }
    }

    /// Get the number of items written.
    pub fn items_written(&self) -> usize {
        self.items_written
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
