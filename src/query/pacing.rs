//! Request pacing
//!
//! Every outbound query is preceded by a random wait drawn uniformly from the
//! configured bounds. The crawl loop awaits the wait inline, so no other
//! request is in flight while it runs.

use crate::config::PacingConfig;
use rand::Rng;
use std::time::Duration;

/// Random delay source for outbound requests
#[derive(Debug, Clone)]
pub struct Pacer {
    min_ms: u64,
    max_ms: u64,
}

impl Pacer {
    /// Creates a pacer from validated bounds (`min_delay_ms <= max_delay_ms`)
    pub fn new(config: &PacingConfig) -> Self {
        Self {
            min_ms: config.min_delay_ms.min(config.max_delay_ms),
            max_ms: config.max_delay_ms,
        }
    }

    /// A pacer that never waits
    pub fn disabled() -> Self {
        Self {
            min_ms: 0,
            max_ms: 0,
        }
    }

    /// Draws the next delay
    pub fn next_delay(&self) -> Duration {
        if self.min_ms == self.max_ms {
            return Duration::from_millis(self.min_ms);
        }
        Duration::from_millis(rand::rng().random_range(self.min_ms..=self.max_ms))
    }

    /// Sleeps for a freshly drawn delay and returns it
    pub async fn wait(&self) -> Duration {
        let delay = self.next_delay();
        if !delay.is_zero() {
            tracing::trace!("Pacing for {}ms", delay.as_millis());
            tokio::time::sleep(delay).await;
        }
        delay
    }
}
