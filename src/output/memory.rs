//! In-memory and fan-out sinks

use crate::crawler::CrawlReport;
use crate::listing::ListingRecord;
use crate::output::traits::{RecordSink, SinkResult};

/// Collects records in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<ListingRecord>,
    pages: Vec<u32>,
    report: Option<CrawlReport>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records collected so far, in emission order
    pub fn records(&self) -> &[ListingRecord] {
        &self.records
    }

    /// Pages passed to `write_page`, in call order
    pub fn pages(&self) -> &[u32] {
        &self.pages
    }

    /// Report passed to `finish`, if the run has finished
    pub fn report(&self) -> Option<&CrawlReport> {
        self.report.as_ref()
    }
}

impl RecordSink for MemorySink {
    fn write_page(&mut self, page: u32, records: &[ListingRecord]) -> SinkResult<()> {
        self.pages.push(page);
        self.records.extend_from_slice(records);
        Ok(())
    }

    fn finish(&mut self, report: &CrawlReport) -> SinkResult<()> {
        self.report = Some(report.clone());
        Ok(())
    }
}

/// Forwards every call to several sinks, in order
///
/// A failing sink stops the fan-out for that call; the error is returned and
/// later sinks do not see the page.
#[derive(Default)]
pub struct MultiSink {
    sinks: Vec<Box<dyn RecordSink>>,
}

impl MultiSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sink to the end of the fan-out
    pub fn push(&mut self, sink: Box<dyn RecordSink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl RecordSink for MultiSink {
    fn write_page(&mut self, page: u32, records: &[ListingRecord]) -> SinkResult<()> {
        for sink in &mut self.sinks {
            sink.write_page(page, records)?;
        }
        Ok(())
    }

    fn finish(&mut self, report: &CrawlReport) -> SinkResult<()> {
        for sink in &mut self.sinks {
            sink.finish(report)?;
        }
        Ok(())
    }

    fn abort(&mut self) {
        for sink in &mut self.sinks {
            sink.abort();
        }
    }
}
