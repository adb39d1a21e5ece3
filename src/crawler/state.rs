//! Crawl state machine and run report
//!
//! A run moves `Idle → Fetching(1) → Emitting(1) → Fetching(2) → … → Stopped`.
//! Pages only ever advance by one and a stopped run never restarts.

use std::fmt;
use std::time::Duration;

/// Why a crawl ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The server reported `hasMorePages: false`
    NoMorePages,

    /// The page just processed was the server's last page
    LastPageReached,

    /// The configured page cap was reached
    MaxPagesReached,

    /// The response for `page` could not be processed
    PageFailed { page: u32 },

    /// The request for `page` failed before a usable response arrived
    TransportFailed { page: u32 },
}

impl StopReason {
    /// Classifies a normal end of pagination after `page` was processed
    pub fn exhausted(page: u32, last_page: u32, has_more_pages: bool, max_pages: u32) -> Self {
        if !has_more_pages {
            Self::NoMorePages
        } else if page >= max_pages {
            Self::MaxPagesReached
        } else {
            debug_assert!(page >= last_page);
            Self::LastPageReached
        }
    }

    /// True for the fail-stop reasons
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::PageFailed { .. } | Self::TransportFailed { .. })
    }

    /// Converts the stop reason to a database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::NoMorePages => "no_more_pages",
            Self::LastPageReached => "last_page_reached",
            Self::MaxPagesReached => "max_pages_reached",
            Self::PageFailed { .. } => "page_failed",
            Self::TransportFailed { .. } => "transport_failed",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PageFailed { page } | Self::TransportFailed { page } => {
                write!(f, "{} (page {})", self.to_db_string(), page)
            }
            _ => write!(f, "{}", self.to_db_string()),
        }
    }
}

/// Where a crawl run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlState {
    Idle,
    Fetching { page: u32 },
    Emitting { page: u32 },
    Stopped(StopReason),
}

impl CrawlState {
    /// Returns true once the run has stopped
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped(_))
    }

    /// Checks whether moving to `next` is a legal step
    ///
    /// Failures stop the run from `Fetching`; normal exhaustion stops it from
    /// `Emitting`, after the page's records are out.
    pub fn can_transition_to(&self, next: &CrawlState) -> bool {
        match (self, next) {
            (Self::Idle, Self::Fetching { page }) => *page == 1,
            (Self::Fetching { page: a }, Self::Emitting { page: b }) => a == b,
            (Self::Fetching { .. }, Self::Stopped(reason)) => reason.is_failure(),
            (Self::Emitting { page: a }, Self::Fetching { page: b }) => *b == a + 1,
            (Self::Emitting { .. }, Self::Stopped(reason)) => !reason.is_failure(),
            _ => false,
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Fetching { page } => write!(f, "fetching({})", page),
            Self::Emitting { page } => write!(f, "emitting({})", page),
            Self::Stopped(reason) => write!(f, "stopped({})", reason),
        }
    }
}

/// Summary of a finished crawl
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlReport {
    /// Pages requested, in request order
    pub requested_pages: Vec<u32>,

    /// Pages whose records were emitted
    pub pages_processed: u32,

    /// Total records emitted across all pages
    pub records_emitted: u64,

    /// Last page reported by the server on the most recent processed page
    pub last_page_reported: Option<u32>,

    pub stop_reason: StopReason,

    pub elapsed: Duration,
}

impl CrawlReport {
    /// Number of requests issued
    pub fn requests_issued(&self) -> usize {
        self.requested_pages.len()
    }
}
