//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::listing::ListingRecord;
use crate::storage::{RunRecord, RunStatus};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Totals written when a run ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTotals {
    pub status: RunStatus,
    pub pages_processed: u32,
    pub records_emitted: u64,
    pub stop_reason: String,
}

/// Trait for storage backend implementations
///
/// This trait defines all database operations needed to persist harvested
/// listings and the runs that produced them.
pub trait Storage {
    // ===== Run Management =====

    /// Creates a new run in the `running` state
    ///
    /// # Arguments
    ///
    /// * `config_hash` - Hash of the configuration used for the run
    /// * `category_slug` - Category the run searches
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn create_run(&mut self, config_hash: &str, category_slug: &str) -> StorageResult<i64>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Lists all runs, newest first
    fn list_runs(&self) -> StorageResult<Vec<RunRecord>>;

    /// Records the final status and totals of a run
    fn finish_run(&mut self, run_id: i64, totals: &RunTotals) -> StorageResult<()>;

    // ===== Listings =====

    /// Inserts one page of records in a single transaction
    ///
    /// Records keep their position within the page so they can be read back
    /// in server order.
    ///
    /// # Returns
    ///
    /// The number of listings inserted
    fn insert_listings(
        &mut self,
        run_id: i64,
        page: u32,
        records: &[ListingRecord],
    ) -> StorageResult<usize>;

    /// Loads the records of a run ordered by page, then position
    fn load_listings_for_run(&self, run_id: i64) -> StorageResult<Vec<ListingRecord>>;

    // ===== Statistics =====

    /// Counts all stored listing rows
    fn count_listings(&self) -> StorageResult<u64>;

    /// Counts the listing rows of one run
    fn count_listings_for_run(&self, run_id: i64) -> StorageResult<u64>;

    /// Counts distinct marketplace listing IDs across all runs
    fn count_distinct_listings(&self) -> StorageResult<u64>;
}
