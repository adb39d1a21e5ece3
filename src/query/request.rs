//! Search request construction
//!
//! A [`QueryRequest`] is built fresh for every page. It carries the endpoint,
//! the page number it asks for, the static headers and the JSON body.

use crate::config::Config;
use crate::query::document::{OPERATION_NAME, SEARCH_QUERY};
use serde::Serialize;

/// One POST to the search endpoint for a single page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryRequest {
    /// Endpoint receiving the query
    pub url: String,

    /// Page this request asks for (1-based)
    pub page: u32,

    /// User-Agent header value
    pub user_agent: String,

    /// JSON body
    pub body: QueryBody,
}

/// GraphQL request body: `{operationName, variables, query}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryBody {
    pub operation_name: &'static str,
    pub variables: SearchVariables,
    pub query: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchVariables {
    pub media_size: String,
    pub q: Option<String>,
    pub filter: SearchFilter,
}

/// Search filter; everything except category, page and count is left at the
/// API's "no filter" value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilter {
    pub category_slug: String,
    pub origin: Option<String>,
    pub connected: bool,
    pub delivery: Option<bool>,
    pub region_ids: Vec<u64>,
    pub city_ids: Vec<u64>,
    pub price_range: [Option<u64>; 2],
    pub exchange: bool,
    pub has_pictures: bool,
    pub has_price: bool,
    pub price_unit: Option<String>,
    pub fields: Vec<serde_json::Value>,
    pub page: u32,
    pub count: u32,
}

impl SearchFilter {
    fn for_page(category_slug: &str, page: u32, count: u32) -> Self {
        Self {
            category_slug: category_slug.to_string(),
            origin: None,
            connected: false,
            delivery: None,
            region_ids: Vec::new(),
            city_ids: Vec::new(),
            price_range: [None, None],
            exchange: false,
            has_pictures: false,
            has_price: false,
            price_unit: None,
            fields: Vec::new(),
            page,
            count,
        }
    }
}

impl QueryRequest {
    /// Builds the request for `page` from the run configuration
    ///
    /// Pure: no pacing happens here. Page numbers start at 1.
    pub fn for_page(config: &Config, page: u32) -> Self {
        debug_assert!(page >= 1, "page numbers are 1-based");

        let filter = SearchFilter::for_page(
            &config.search.category_slug,
            page,
            config.search.page_size,
        );

        Self {
            url: config.endpoint.url.clone(),
            page,
            user_agent: config.endpoint.user_agent.clone(),
            body: QueryBody {
                operation_name: OPERATION_NAME,
                variables: SearchVariables {
                    media_size: config.search.media_size.clone(),
                    q: None,
                    filter,
                },
                query: SEARCH_QUERY,
            },
        }
    }

    /// Static headers sent with every query
    pub fn headers(&self) -> [(&'static str, &str); 3] {
        [
            ("Content-Type", "application/json"),
            ("Accept", "application/json"),
            ("User-Agent", self.user_agent.as_str()),
        ]
    }

    /// Serializes the body as it goes on the wire
    pub fn body_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.body)
    }
}
