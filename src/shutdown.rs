//! Cooperative shutdown flag.
//!
//! The signal handler sets the flag; the poll loop checks it between
//! iterations and while sleeping, so a Ctrl-C takes effect within one
//! poll slice instead of after a full poll interval.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Granularity of [`Shutdown::sleep`].
pub const DEFAULT_CANCEL_POLL_MS: u64 = 100;

/// Cloneable handle to a shared shutdown flag.
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    flag: Arc<AtomicBool>,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown.  Idempotent.
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Sleep for `dur`, waking early if shutdown is requested.
    ///
    /// Returns `true` if the full duration elapsed, `false` if cancelled.
    pub fn sleep(&self, dur: Duration) -> bool {
        let deadline = Instant::now() + dur;
        let slice = Duration::from_millis(DEFAULT_CANCEL_POLL_MS);
        loop {
            if self.is_triggered() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            std::thread::sleep(slice.min(deadline - now));
        }
    }
}
