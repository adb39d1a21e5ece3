//! Query module for building search requests
//!
//! This module contains everything that goes into one outbound query:
//! - The GraphQL search document
//! - The request body and its filter variables
//! - The pacing delay applied before each request

mod document;
mod pacing;
mod request;

pub use document::{OPERATION_NAME, SEARCH_QUERY};
pub use pacing::Pacer;
pub use request::{QueryBody, QueryRequest, SearchFilter, SearchVariables};
