use serde::{Deserialize, Serialize};

/// Default GraphQL endpoint of the marketplace
pub const DEFAULT_ENDPOINT_URL: &str = "https://api.ouedkniss.com/graphql";

/// Browser-like user agent sent with every query
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/96.0.4664.93 Safari/537.36";

/// Category filter for vehicle listings
pub const DEFAULT_CATEGORY_SLUG: &str = "automobiles_vehicules";

/// Listings requested per page
pub const DEFAULT_PAGE_SIZE: u32 = 48;

/// Hard cap on the number of pages fetched in one run
pub const DEFAULT_MAX_PAGES: u32 = 5;

pub const DEFAULT_MEDIA_SIZE: &str = "MEDIUM";

pub const DEFAULT_MIN_DELAY_MS: u64 = 1_000;
pub const DEFAULT_MAX_DELAY_MS: u64 = 3_000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Main configuration structure for Kniss-Harvest
///
/// Every section is optional in the TOML file; missing sections and keys
/// fall back to the marketplace defaults above.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub endpoint: EndpointConfig,
    pub search: SearchConfig,
    pub pacing: PacingConfig,
    pub output: OutputConfig,
}

/// Remote endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EndpointConfig {
    /// GraphQL endpoint receiving the POSTed queries
    pub url: String,

    /// User-Agent header value
    pub user_agent: String,

    /// Per-request timeout (seconds)
    pub timeout_secs: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ENDPOINT_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Search filter and pagination bounds
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SearchConfig {
    /// Category slug sent as `filter.categorySlug`
    pub category_slug: String,

    /// Number of listings per page (`filter.count`)
    pub page_size: u32,

    /// Maximum number of pages fetched in one run
    pub max_pages: u32,

    /// Size of the default media requested for each listing
    pub media_size: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            category_slug: DEFAULT_CATEGORY_SLUG.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            media_size: DEFAULT_MEDIA_SIZE.to_string(),
        }
    }
}

/// Bounds of the random wait inserted before each request (milliseconds)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PacingConfig {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: DEFAULT_MIN_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
        }
    }
}

/// Where emitted records go
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// JSON Lines file, one record per line
    pub jsonl_path: Option<String>,

    /// SQLite database file
    pub database_path: Option<String>,
}
