//! Configuration module for Kniss-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so a missing file or an empty file yields the
//! marketplace's standard vehicle search.
//!
//! # Example
//!
//! ```no_run
//! use kniss_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Fetching at most {} pages", config.search.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, EndpointConfig, OutputConfig, PacingConfig, SearchConfig, DEFAULT_CATEGORY_SLUG,
    DEFAULT_ENDPOINT_URL, DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{
    compute_config_hash, hash_config, load_config, load_config_or_default, parse_config,
};

/// Validates a configuration assembled in code (e.g. after CLI overrides)
pub fn validate_config(config: &Config) -> crate::ConfigResult<()> {
    validation::validate(config)
}
