//! JSON Lines record sink
//!
//! Writes one JSON object per line in the emitted record schema. Each page is
//! flushed as soon as it is written so a fail-stop later in the run keeps
//! the records already harvested.

use crate::crawler::CrawlReport;
use crate::listing::ListingRecord;
use crate::output::traits::{RecordSink, SinkResult};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Stdout, Write};
use std::path::Path;

/// Sink writing records as JSON Lines to any writer
pub struct JsonLinesSink<W: Write> {
    writer: W,
    lines_written: u64,
}

impl<W: Write> JsonLinesSink<W> {
    /// Wraps a writer
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            lines_written: 0,
        }
    }

    /// Number of records written so far
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    /// Returns the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl JsonLinesSink<BufWriter<File>> {
    /// Creates (or truncates) a JSON Lines file
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl JsonLinesSink<Stdout> {
    /// Writes records to standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> RecordSink for JsonLinesSink<W> {
    fn write_page(&mut self, _page: u32, records: &[ListingRecord]) -> SinkResult<()> {
        for record in records {
            serde_json::to_writer(&mut self.writer, record)?;
            self.writer.write_all(b"\n")?;
            self.lines_written += 1;
        }
        self.writer.flush()?;
        Ok(())
    }

    fn finish(&mut self, _report: &CrawlReport) -> SinkResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn abort(&mut self) {
        let _ = self.writer.flush();
    }
}
