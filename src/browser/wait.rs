//! Element waits
//!
//! Polls a lookup until it succeeds or the ceiling passes. There is no retry
//! beyond the polling itself: an expired wait fails the run.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tracing::trace;

use crate::core::{Result, ShotError};

/// Ceiling and poll interval of an element wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub timeout: Duration,
    pub interval: Duration,
}

impl WaitPolicy {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }

    /// Run `attempt` until it returns `Ok`. `target` names what is awaited in
    /// the timeout error.
    pub async fn until<T, E, F, Fut>(&self, target: &str, mut attempt: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: Display,
    {
        let deadline = Instant::now() + self.timeout;

        loop {
            match attempt().await {
                Ok(found) => return Ok(found),
                Err(e) => {
                    trace!("{} not there yet: {}", target, e);
                    if Instant::now() >= deadline {
                        return Err(ShotError::not_found(
                            target,
                            self.timeout.as_millis() as u64,
                        ));
                    }
                }
            }
            tokio::time::sleep(self.interval).await;
        }
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(30), Duration::from_millis(100))
    }
}
