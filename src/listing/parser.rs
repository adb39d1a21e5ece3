//! Search response handling
//!
//! Turns one raw response body into the page's records and the pagination
//! decision. The whole page either succeeds or fails: on any error no record
//! from the page is returned.

use crate::config::SearchConfig;
use crate::listing::accessors::{
    bool_or, expect_array, expect_object, get, get_path, items, u32_or,
};
use crate::listing::record::{CityRecord, ListingRecord, StoreRecord};
use crate::PageProcessingError;
use serde_json::Value;

/// Result of handling one search response
#[derive(Debug, Clone, PartialEq)]
pub struct PageOutcome {
    /// Page the response belongs to
    pub page: u32,

    /// Records in server order
    pub records: Vec<ListingRecord>,

    /// `paginatorInfo.lastPage`, defaulting to 1
    pub last_page: u32,

    /// `paginatorInfo.hasMorePages`, defaulting to false
    pub has_more_pages: bool,

    /// Page to request next, if the crawl continues
    pub next_page: Option<u32>,
}

/// Decodes a search response for `page` into records and a continuation
///
/// # Arguments
///
/// * `body` - Raw response text
/// * `page` - Page number the originating request asked for
/// * `search` - Search settings; `max_pages` bounds the continuation
///
/// # Returns
///
/// * `Ok(PageOutcome)` - All records for the page and the next page, if any
/// * `Err(PageProcessingError)` - The body is not JSON or has an unusable shape
pub fn handle_response(
    body: &str,
    page: u32,
    search: &SearchConfig,
) -> Result<PageOutcome, PageProcessingError> {
    let document: Value = serde_json::from_str(body)?;

    if !document.is_object() {
        return Err(PageProcessingError::UnexpectedShape {
            path: "$".to_string(),
            expected: "object",
        });
    }

    let data = expect_object(get(&document, "data"), "data")?;
    let search_data = expect_object(get(data, "search"), "data.search")?;
    let announcements = expect_object(
        get(search_data, "announcements"),
        "data.search.announcements",
    )?;
    let paginator = expect_object(
        get(announcements, "paginatorInfo"),
        "data.search.announcements.paginatorInfo",
    )?;
    let entries = expect_array(
        get(announcements, "data"),
        "data.search.announcements.data",
    )?;

    let records = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| flatten_listing(entry, page, index))
        .collect::<Result<Vec<_>, _>>()?;

    let last_page = u32_or(get(paginator, "lastPage"), 1);
    let has_more_pages = bool_or(get(paginator, "hasMorePages"), false);

    Ok(PageOutcome {
        page,
        records,
        last_page,
        has_more_pages,
        next_page: next_page(page, last_page, has_more_pages, search.max_pages),
    })
}

/// Pagination rule: continue iff more pages exist and both caps allow it
pub fn next_page(page: u32, last_page: u32, has_more_pages: bool, max_pages: u32) -> Option<u32> {
    if has_more_pages && page < max_pages && page < last_page {
        Some(page + 1)
    } else {
        None
    }
}

/// Flattens one announcement entry
///
/// Scalars are copied through untouched. A `null` entry yields a record with
/// every field null; any other non-object is rejected.
fn flatten_listing(
    entry: &Value,
    page: u32,
    index: usize,
) -> Result<ListingRecord, PageProcessingError> {
    let entry = expect_object(entry, &format!("data.search.announcements.data[{}]", index))?;

    Ok(ListingRecord {
        id: get(entry, "id").clone(),
        title: get(entry, "title").clone(),
        description: get(entry, "description").clone(),
        price: get(entry, "price").clone(),
        cities: items(get(entry, "cities")).iter().map(flatten_city).collect(),
        store: flatten_store(get(entry, "store")),
        default_media: get_path(entry, &["defaultMedia", "mediaUrl"]).clone(),
        created_at: get(entry, "createdAt").clone(),
        price_preview: get(entry, "pricePreview").clone(),
        price_unit: get(entry, "priceUnit").clone(),
        page,
    })
}

fn flatten_city(city: &Value) -> CityRecord {
    CityRecord {
        id: get(city, "id").clone(),
        name: get(city, "name").clone(),
        region: get_path(city, &["region", "name"]).clone(),
    }
}

fn flatten_store(store: &Value) -> StoreRecord {
    StoreRecord {
        id: get(store, "id").clone(),
        name: get(store, "name").clone(),
        slug: get(store, "slug").clone(),
    }
}
