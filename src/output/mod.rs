//! Output module for delivering harvested records
//!
//! This module handles:
//! - Writing records as JSON Lines
//! - Persisting records to the SQLite listings database
//! - Fanning records out to several sinks
//! - Printing run reports and stored statistics

mod jsonl;
mod memory;
mod sqlite_output;
pub mod stats;
mod traits;

pub use jsonl::JsonLinesSink;
pub use memory::{MemorySink, MultiSink};
pub use sqlite_output::SqliteSink;
pub use stats::{load_statistics, print_report, print_statistics, HarvestStatistics};
pub use traits::{RecordSink, SinkError, SinkResult};
