//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the fetch loop that drives one run:
//! - Building each page request after the pacing wait
//! - Classifying the transport outcome
//! - Turning the response into records and handing them to the sink
//! - Deciding whether to request the next page or stop
//!
//! Exactly one request is in flight at a time. The loop stops at the first
//! page that fails to arrive or cannot be processed.

use crate::config::Config;
use crate::crawler::fetcher::{FetchResult, PaginatedFetcher};
use crate::crawler::state::{CrawlReport, CrawlState, StopReason};
use crate::output::RecordSink;
use crate::query::Pacer;
use crate::HarvestError;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Main crawler coordinator structure
pub struct Coordinator {
    fetcher: PaginatedFetcher,
    state: CrawlState,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The run configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(HarvestError)` - Failed to build the HTTP client
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        let fetcher = PaginatedFetcher::new(Arc::new(config))?;
        Ok(Self {
            fetcher,
            state: CrawlState::Idle,
        })
    }

    /// Replaces the pacer used between requests
    pub fn with_pacer(mut self, pacer: Pacer) -> Self {
        self.fetcher = self.fetcher.with_pacer(pacer);
        self
    }

    /// Current state of the run
    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// Runs the crawl to completion, writing records to `sink`
    ///
    /// Transport and page processing failures end the run with a failure
    /// [`StopReason`] and still return `Ok`. Only sink failures are returned
    /// as errors.
    pub async fn run(&mut self, sink: &mut dyn RecordSink) -> Result<CrawlReport, HarvestError> {
        let started = Instant::now();
        let max_pages = self.fetcher.config().search.max_pages;

        let mut requested_pages = Vec::new();
        let mut pages_processed = 0u32;
        let mut records_emitted = 0u64;
        let mut last_page_reported = None;

        info!(
            "Starting harvest of category '{}' (max {} pages)",
            self.fetcher.config().search.category_slug,
            max_pages
        );

        let mut page = 1;
        self.transition(CrawlState::Fetching { page });

        let stop_reason = loop {
            let request = self.fetcher.build_request(page).await;
            requested_pages.push(page);
            debug!("Requesting page {} from {}", page, request.url);

            let body = match self.fetcher.fetch(&request).await {
                FetchResult::Success { status_code, body } => {
                    debug!("Page {} returned {} ({} bytes)", page, status_code, body.len());
                    body
                }
                FetchResult::HttpError { status_code, body } => {
                    warn!("Page {} failed with HTTP {}", page, status_code);
                    debug!("Response text: {}", body);
                    break StopReason::TransportFailed { page };
                }
                FetchResult::NetworkError { error } => {
                    warn!("Page {} failed: {}", page, error);
                    break StopReason::TransportFailed { page };
                }
            };

            let outcome = match self.fetcher.handle_response(&body, page) {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("Error parsing page {}: {}", page, e);
                    error!("Response text: {}", body);
                    break StopReason::PageFailed { page };
                }
            };

            self.transition(CrawlState::Emitting { page });
            if let Err(e) = sink.write_page(page, &outcome.records) {
                error!("Failed to write records of page {}: {}", page, e);
                sink.abort();
                return Err(e.into());
            }
            pages_processed += 1;
            records_emitted += outcome.records.len() as u64;
            last_page_reported = Some(outcome.last_page);

            info!("Scraped page {} of {}", page, outcome.last_page);

            match outcome.next_page {
                Some(next) => {
                    self.transition(CrawlState::Fetching { page: next });
                    page = next;
                }
                None => {
                    break StopReason::exhausted(
                        page,
                        outcome.last_page,
                        outcome.has_more_pages,
                        max_pages,
                    )
                }
            }
        };

        self.transition(CrawlState::Stopped(stop_reason));

        let report = CrawlReport {
            requested_pages,
            pages_processed,
            records_emitted,
            last_page_reported,
            stop_reason,
            elapsed: started.elapsed(),
        };

        if stop_reason.is_failure() {
            warn!(
                "Harvest stopped early: {} ({} records from {} pages)",
                stop_reason, records_emitted, pages_processed
            );
        } else {
            info!(
                "Harvest finished: {} ({} records from {} pages)",
                stop_reason, records_emitted, pages_processed
            );
        }

        sink.finish(&report)?;
        Ok(report)
    }

    fn transition(&mut self, next: CrawlState) {
        debug_assert!(
            self.state.can_transition_to(&next),
            "illegal crawl transition {} -> {}",
            self.state,
            next
        );
        debug!("Crawl state {} -> {}", self.state, next);
        self.state = next;
    }
}

/// Runs a complete crawl with the pacing taken from `config`
pub async fn run_crawl(
    config: Config,
    sink: &mut dyn RecordSink,
) -> Result<CrawlReport, HarvestError> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run(sink).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::MemorySink;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn search_page(ids: &[&str], last_page: u32, has_more_pages: bool) -> serde_json::Value {
        let data: Vec<_> = ids
            .iter()
            .map(|id| json!({"id": id, "title": format!("Listing {}", id)}))
            .collect();
        json!({
            "data": {"search": {"announcements": {
                "data": data,
                "paginatorInfo": {"lastPage": last_page, "hasMorePages": has_more_pages}
            }}}
        })
    }

    async fn mount_page(server: &MockServer, page: u32, body: serde_json::Value) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"variables": {"filter": {"page": page}}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    fn config_for(server: &MockServer) -> Config {
        let mut config = Config::default();
        config.endpoint.url = format!("{}/graphql", server.uri());
        config.pacing.min_delay_ms = 0;
        config.pacing.max_delay_ms = 0;
        config
    }

    #[test]
    fn test_coordinator_starts_idle() {
        let coordinator = Coordinator::new(Config::default()).unwrap();
        assert_eq!(coordinator.state(), CrawlState::Idle);
    }

    #[tokio::test]
    async fn test_run_ends_in_stopped_state() {
        let server = MockServer::start().await;
        mount_page(&server, 1, search_page(&["1"], 2, true)).await;
        mount_page(&server, 2, search_page(&["2"], 2, true)).await;

        let mut coordinator = Coordinator::new(config_for(&server))
            .unwrap()
            .with_pacer(Pacer::disabled());
        let mut sink = MemorySink::new();
        let report = coordinator.run(&mut sink).await.unwrap();

        assert_eq!(report.stop_reason, StopReason::LastPageReached);
        assert_eq!(
            coordinator.state(),
            CrawlState::Stopped(StopReason::LastPageReached)
        );
        assert_eq!(report.requested_pages, vec![1, 2]);
        assert_eq!(report.last_page_reported, Some(2));
        assert_eq!(sink.report(), Some(&report));
    }

    #[tokio::test]
    async fn test_shape_error_stops_without_records() {
        let server = MockServer::start().await;
        mount_page(&server, 1, json!({"data": {"search": {"announcements": {"data": "oops"}}}})).await;

        let mut sink = MemorySink::new();
        let report = run_crawl(config_for(&server), &mut sink).await.unwrap();

        assert_eq!(report.stop_reason, StopReason::PageFailed { page: 1 });
        assert_eq!(report.pages_processed, 0);
        assert!(sink.records().is_empty());
        assert!(sink.pages().is_empty());
    }
}
