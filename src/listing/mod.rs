//! Listing module for decoding search responses
//!
//! This module turns raw search responses into flat listing records:
//! - Record types in the downstream schema
//! - Total accessors over untyped JSON
//! - Response handling and the pagination decision

pub mod accessors;
mod parser;
mod record;

pub use parser::{handle_response, next_page, PageOutcome};
pub use record::{CityRecord, ListingRecord, StoreRecord};
