//! Run reports and statistics from the listings database
//!
//! This module provides functionality for printing the outcome of a crawl
//! and for extracting stored statistics from the storage layer.

use crate::crawler::CrawlReport;
use crate::storage::{RunRecord, Storage};
use crate::HarvestError;

/// Harvest statistics summary
#[derive(Debug, Clone)]
pub struct HarvestStatistics {
    /// Total number of stored listing rows
    pub total_listings: u64,

    /// Number of distinct marketplace listing IDs
    pub distinct_listings: u64,

    /// Stored runs, newest first, with their listing row counts
    pub runs: Vec<(RunRecord, u64)>,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(HarvestStatistics)` - Successfully loaded statistics
/// * `Err(HarvestError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn Storage) -> Result<HarvestStatistics, HarvestError> {
    let total_listings = storage.count_listings()?;
    let distinct_listings = storage.count_distinct_listings()?;

    let mut runs = Vec::new();
    for run in storage.list_runs()? {
        let count = storage.count_listings_for_run(run.id)?;
        runs.push((run, count));
    }

    Ok(HarvestStatistics {
        total_listings,
        distinct_listings,
        runs,
    })
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &HarvestStatistics) {
    println!("=== Harvest Statistics ===\n");

    println!("Overview:");
    println!("  Runs recorded: {}", stats.runs.len());
    println!("  Listing rows stored: {}", stats.total_listings);
    println!("  Distinct listings: {}", stats.distinct_listings);
    println!();

    if stats.runs.is_empty() {
        return;
    }

    println!("Runs (newest first):");
    for (run, count) in &stats.runs {
        println!(
            "  #{} [{}] {} - {} pages, {} listings ({} rows stored)",
            run.id,
            run.status.to_db_string(),
            run.category_slug,
            run.pages_processed,
            run.records_emitted,
            count
        );
        println!("      started:  {}", run.started_at);
        if let Some(finished) = &run.finished_at {
            println!("      finished: {}", finished);
        }
        if let Some(reason) = &run.stop_reason {
            println!("      stopped:  {}", reason);
        }
    }
}

/// Prints the outcome of a crawl to stdout
pub fn print_report(report: &CrawlReport) {
    println!("=== Harvest Report ===\n");
    println!("  Pages requested: {}", report.requests_issued());
    println!("  Pages processed: {}", report.pages_processed);
    println!("  Records emitted: {}", report.records_emitted);
    if let Some(last_page) = report.last_page_reported {
        println!("  Server last page: {}", last_page);
    }
    println!("  Stop reason: {}", report.stop_reason);
    println!("  Elapsed: {:.1}s", report.elapsed.as_secs_f64());
}
