//! Record sink traits and types
//!
//! This module defines the trait interface for record sinks and the errors
//! they may raise.

use crate::crawler::CrawlReport;
use crate::listing::ListingRecord;
use crate::storage::StorageError;
use thiserror::Error;

/// Errors that can occur while writing records
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Trait for record sinks
///
/// The crawl loop calls `write_page` once per processed page, in page order,
/// with the page's records in server order. `finish` is called exactly once
/// when the run stops normally or on a fail-stop. `abort` is called instead
/// of `finish` when a sink write failed and the run is being torn down.
pub trait RecordSink {
    /// Writes the records of one processed page
    ///
    /// # Arguments
    ///
    /// * `page` - The page the records came from
    /// * `records` - The flattened records, possibly empty
    fn write_page(&mut self, page: u32, records: &[ListingRecord]) -> SinkResult<()>;

    /// Flushes pending output and records the run outcome
    fn finish(&mut self, report: &CrawlReport) -> SinkResult<()>;

    /// Best-effort cleanup after a failed write
    fn abort(&mut self) {}
}

impl<S: RecordSink + ?Sized> RecordSink for Box<S> {
    fn write_page(&mut self, page: u32, records: &[ListingRecord]) -> SinkResult<()> {
        (**self).write_page(page, records)
    }

    fn finish(&mut self, report: &CrawlReport) -> SinkResult<()> {
        (**self).finish(report)
    }

    fn abort(&mut self) {
        (**self).abort()
    }
}
