//! SQLite-based record sink implementation
//!
//! This module provides a sink that records harvested listings directly to
//! the SQLite storage backend, under a run row created when the sink opens.

use crate::crawler::CrawlReport;
use crate::listing::ListingRecord;
use crate::output::traits::{RecordSink, SinkResult};
use crate::storage::{RunStatus, RunTotals, SqliteStorage, Storage};

/// SQLite-based record sink
pub struct SqliteSink {
    storage: SqliteStorage,
    run_id: i64,
    pages_written: u32,
    records_written: u64,
}

impl SqliteSink {
    /// Opens a new run in `storage` and returns a sink writing into it
    ///
    /// # Arguments
    ///
    /// * `storage` - The storage backend to use
    /// * `config_hash` - Hash of the configuration driving the run
    /// * `category_slug` - Category the run searches
    pub fn start(
        mut storage: SqliteStorage,
        config_hash: &str,
        category_slug: &str,
    ) -> SinkResult<Self> {
        let run_id = storage.create_run(config_hash, category_slug)?;
        tracing::info!("Recording listings under run {}", run_id);
        Ok(Self {
            storage,
            run_id,
            pages_written: 0,
            records_written: 0,
        })
    }

    /// ID of the run this sink writes into
    pub fn run_id(&self) -> i64 {
        self.run_id
    }

    /// The underlying storage
    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }
}

impl RecordSink for SqliteSink {
    fn write_page(&mut self, page: u32, records: &[ListingRecord]) -> SinkResult<()> {
        let inserted = self.storage.insert_listings(self.run_id, page, records)?;
        self.pages_written += 1;
        self.records_written += inserted as u64;
        Ok(())
    }

    fn finish(&mut self, report: &CrawlReport) -> SinkResult<()> {
        let status = if report.stop_reason.is_failure() {
            RunStatus::Failed
        } else {
            RunStatus::Completed
        };
        let totals = RunTotals {
            status,
            pages_processed: report.pages_processed,
            records_emitted: report.records_emitted,
            stop_reason: report.stop_reason.to_string(),
        };
        self.storage.finish_run(self.run_id, &totals)?;
        Ok(())
    }

    fn abort(&mut self) {
        let totals = RunTotals {
            status: RunStatus::Failed,
            pages_processed: self.pages_written,
            records_emitted: self.records_written,
            stop_reason: "sink_error".to_string(),
        };
        if let Err(e) = self.storage.finish_run(self.run_id, &totals) {
            tracing::warn!("Failed to mark run {} as failed: {}", self.run_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::StopReason;
    use crate::listing::{CityRecord, StoreRecord};
    use serde_json::{json, Value};
    use std::time::Duration;

    fn record(id: &str, page: u32) -> ListingRecord {
        ListingRecord {
            id: json!(id),
            title: json!("Golf 7"),
            description: json!("Bon état"),
            price: json!(350),
            cities: vec![
                CityRecord {
                    id: json!("1"),
                    name: json!("Oran"),
                    region: json!("Oran"),
                },
                CityRecord::default(),
            ],
            store: StoreRecord {
                id: json!("9"),
                name: json!("Auto Plus"),
                slug: json!("auto-plus"),
            },
            default_media: json!("https://cdn.example/1.jpg"),
            created_at: Value::Null,
            price_preview: json!("350"),
            price_unit: json!("MILLION"),
            page,
        }
    }

    fn report(stop_reason: StopReason) -> CrawlReport {
        CrawlReport {
            requested_pages: vec![1, 2],
            pages_processed: 2,
            records_emitted: 3,
            last_page_reported: Some(4),
            stop_reason,
            elapsed: Duration::from_secs(1),
        }
    }

    #[test]
    fn test_persists_pages_and_completes_run() {
        let storage = SqliteStorage::new_in_memory().unwrap();
        let mut sink = SqliteSink::start(storage, "abc123", "automobiles_vehicules").unwrap();

        sink.write_page(1, &[record("1", 1), record("2", 1)]).unwrap();
        sink.write_page(2, &[record("3", 2)]).unwrap();
        sink.finish(&report(StopReason::NoMorePages)).unwrap();

        let run = sink.storage().get_run(sink.run_id()).unwrap();
        assert_eq!(run.status, RunStatus::Completed);
        assert_eq!(run.pages_processed, 2);
        assert_eq!(run.records_emitted, 3);
        assert_eq!(run.stop_reason.as_deref(), Some("no_more_pages"));
        assert_eq!(run.config_hash, "abc123");

        let stored = sink.storage().load_listings_for_run(sink.run_id()).unwrap();
        assert_eq!(stored.len(), 3);
        assert_eq!(stored[0], record("1", 1));
        assert_eq!(stored[2].page, 2);
    }

    #[test]
    fn test_fail_stop_marks_run_failed() {
        let storage = SqliteStorage::new_in_memory().unwrap();
        let mut sink = SqliteSink::start(storage, "h", "automobiles_vehicules").unwrap();

        sink.write_page(1, &[record("1", 1)]).unwrap();
        sink.finish(&report(StopReason::PageFailed { page: 2 })).unwrap();

        let run = sink.storage().get_run(sink.run_id()).unwrap();
        assert_eq!(run.status, RunStatus::Failed);
        assert_eq!(run.stop_reason.as_deref(), Some("page_failed (page 2)"));
    }

    #[test]
    fn test_abort_records_partial_totals() {
        let storage = SqliteStorage::new_in_memory().unwrap();
        let mut sink = SqliteSink::start(storage, "h", "automobiles_vehicules").unwrap();

        sink.write_page(1, &[record("1", 1), record("2", 1)]).unwrap();
        sink.abort();

        let run = sink.storage().get_run(sink.run_id()).unwrap();
        assert_eq!(run.status, RunStatus::Failed);
        assert_eq!(run.pages_processed, 1);
        assert_eq!(run.records_emitted, 2);
        assert_eq!(run.stop_reason.as_deref(), Some("sink_error"));
    }
}
