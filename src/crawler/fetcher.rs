//! HTTP fetcher implementation
//!
//! This module handles all HTTP traffic of a run:
//! - Building the HTTP client with the configured user agent
//! - POSTing one search query per page
//! - Classifying transport outcomes
//!
//! [`PaginatedFetcher`] bundles the client with the run configuration and
//! the pacer, and exposes the two page operations: building a request and
//! handling its response.

use crate::config::{Config, EndpointConfig};
use crate::listing::{self, PageOutcome};
use crate::query::{Pacer, QueryRequest};
use crate::{HarvestError, PageProcessingError};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// The endpoint answered with a 2xx status
    Success {
        /// HTTP status code
        status_code: u16,
        /// Response body
        body: String,
    },

    /// The endpoint answered with a non-2xx status
    HttpError {
        /// HTTP status code
        status_code: u16,
        /// Response body, when it could be read
        body: String,
    },

    /// Network error (connection refused, timeout, unreadable body, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The endpoint configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &EndpointConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// POSTs a search query and classifies the outcome
///
/// Never returns an error: every failure is mapped to a [`FetchResult`]
/// variant so the crawl loop can decide how to stop.
pub async fn post_query(client: &Client, request: &QueryRequest) -> FetchResult {
    let body = match request.body_json() {
        Ok(body) => body,
        Err(e) => {
            return FetchResult::NetworkError {
                error: format!("Cannot encode request body: {}", e),
            }
        }
    };

    let mut builder = client.post(&request.url);
    for (name, value) in request.headers() {
        builder = builder.header(name, value);
    }

    let response = match builder.body(body).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else {
                e.to_string()
            };
            return FetchResult::NetworkError { error };
        }
    };

    let status = response.status();
    match response.text().await {
        Ok(body) if status.is_success() => FetchResult::Success {
            status_code: status.as_u16(),
            body,
        },
        Ok(body) => FetchResult::HttpError {
            status_code: status.as_u16(),
            body,
        },
        Err(e) if status.is_success() => FetchResult::NetworkError {
            error: format!("Failed to read response body: {}", e),
        },
        Err(_) => FetchResult::HttpError {
            status_code: status.as_u16(),
            body: String::new(),
        },
    }
}

/// Issues the page requests of one run
pub struct PaginatedFetcher {
    config: Arc<Config>,
    client: Client,
    pacer: Pacer,
}

impl PaginatedFetcher {
    /// Creates a fetcher with a client and pacer derived from `config`
    pub fn new(config: Arc<Config>) -> Result<Self, HarvestError> {
        let client = build_http_client(&config.endpoint)?;
        let pacer = Pacer::new(&config.pacing);
        Ok(Self {
            config,
            client,
            pacer,
        })
    }

    /// Replaces the pacer
    pub fn with_pacer(mut self, pacer: Pacer) -> Self {
        self.pacer = pacer;
        self
    }

    /// Run configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Waits out the pacing delay, then builds the request for `page`
    pub async fn build_request(&self, page: u32) -> QueryRequest {
        self.pacer.wait().await;
        QueryRequest::for_page(&self.config, page)
    }

    /// Sends a request built by [`build_request`](Self::build_request)
    pub async fn fetch(&self, request: &QueryRequest) -> FetchResult {
        post_query(&self.client, request).await
    }

    /// Decodes the response body for `page` using the run's search settings
    pub fn handle_response(
        &self,
        body: &str,
        page: u32,
    ) -> Result<PageOutcome, PageProcessingError> {
        listing::handle_response(body, page, &self.config.search)
    }
}
