//! Request scheduling: global concurrency limit and pre-request delay
//!
//! Every uncached fetch passes through the scheduler before touching the
//! network:
//! - A global semaphore caps how many fetches run at the same time
//! - A fixed delay is waited before each request
//!
//! The delay is global, not per host, and each caller sleeps on its own; it
//! is not a queue that spaces requests apart.

use crate::config::CrawlerConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Permission to issue one request
///
/// The concurrency slot is released when this is dropped.
#[derive(Debug)]
pub struct RequestSlot {
    _permit: OwnedSemaphorePermit,
}

/// Scheduler gating every network request
#[derive(Debug, Clone)]
pub struct Scheduler {
    /// Global semaphore for limiting concurrent fetches
    semaphore: Arc<Semaphore>,

    /// Delay waited before each request
    delay: Duration,
}

impl Scheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `max_concurrency` - Maximum number of fetches in flight (at least 1)
    /// * `delay` - Delay before each request
    pub fn new(max_concurrency: usize, delay: Duration) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrency.max(1))),
            delay,
        }
    }

    /// Creates a scheduler from the crawler configuration
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(
            config.max_concurrency as usize,
            Duration::from_millis(config.rate_limit_delay),
        )
    }

    /// Waits for a free concurrency slot, then for the request delay
    ///
    /// The caller may issue its request as soon as this returns.
    pub async fn acquire(&self) -> RequestSlot {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .expect("request semaphore is never closed");

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        RequestSlot { _permit: permit }
    }

    /// Returns the number of free concurrency slots
    pub fn available_slots(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Returns the pre-request delay
    pub fn delay(&self) -> Duration {
        self.delay
    }
}
