//! Crawler module for paginated search harvesting
//!
//! This module contains the core harvesting logic, including:
//! - HTTP transport for the GraphQL search endpoint
//! - The crawl state machine and stop reasons
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod state;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, post_query, FetchResult, PaginatedFetcher};
pub use state::{CrawlReport, CrawlState, StopReason};

use crate::config::Config;
use crate::output::RecordSink;
use crate::HarvestError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a harvest. It will:
/// 1. Build the HTTP client
/// 2. Request page 1, then each following page while the server reports more
/// 3. Hand every processed page's records to `sink`
/// 4. Stop at the page cap, the server's last page, or the first failure
///
/// # Arguments
///
/// * `config` - The run configuration
/// * `sink` - Destination for the harvested records
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The run ended, normally or by fail-stop
/// * `Err(HarvestError)` - The client could not be built or a sink failed
pub async fn crawl(config: Config, sink: &mut dyn RecordSink) -> Result<CrawlReport, HarvestError> {
    run_crawl(config, sink).await
}
