//! Retry delay after consecutive poll failures.
//!
//! The delay is added on top of the regular poll interval, so a healthy
//! loop never waits longer than configured.

use std::time::Duration;

/// Base delay for the first retry.
const BASE_DELAY_MS: u64 = 100;

/// Calculates the retry delay in milliseconds for a given attempt number.
///
/// Uses exponential backoff:
/// - Base delay: 100ms
/// - Multiplier: 2^(attempt - 1)
///
/// Attempt `0` means "no failure yet" and yields zero.
pub fn calculate_retry_delay(attempt: u32) -> u64 {
    if attempt == 0 {
        return 0;
    }
    let shift = attempt.saturating_sub(1).min(30); // keeps the shift in range
    BASE_DELAY_MS.saturating_mul(1 << shift)
}

/// Counts consecutive failures and turns them into a capped delay.
#[derive(Debug, Clone)]
pub struct Backoff {
    attempt: u32,
    max: Duration,
}

impl Backoff {
    pub fn new(max: Duration) -> Self {
        Self { attempt: 0, max }
    }

    /// Record a failure and return `(attempt, extra_delay)`.
    pub fn record_failure(&mut self) -> (u32, Duration) {
        self.attempt = self.attempt.saturating_add(1);
        let delay = Duration::from_millis(calculate_retry_delay(self.attempt)).min(self.max);
        (self.attempt, delay)
    }

    /// Record a success; the next failure starts from the base delay again.
    pub fn reset(&mut self) {
        self.attempt = 0;
    }

    /// Consecutive failures so far.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }
}
