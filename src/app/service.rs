//! Application service: the hexagonal core.
//!
//! [`SwitchService`] owns the last-issued command and the retry state.
//! All I/O flows through port traits injected at call sites, making the
//! entire service testable with mock adapters.
//!
//! ```text
//!  TimelinePort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                   │     SwitchService       │
//!    DevicePort ◀── │ classify · dedupe · wait│
//!                   └────────────────────────┘
//! ```

use std::time::Duration;

use log::{debug, info};

use crate::backoff::Backoff;
use crate::config::SwitchConfig;
use crate::error::Result;
use crate::shutdown::Shutdown;

use super::commands::{SwitchCommand, classify};
use super::events::AppEvent;
use super::ports::{DevicePort, EventSink, TimelinePort};

/// What a single poll did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The command byte was written and the state changed.
    Switched(SwitchCommand),
    /// The post asked for the current state; nothing written.
    Unchanged(SwitchCommand),
    /// The post carried no control tag.
    Unrecognized,
    /// The account has no posts.
    NoPost,
}

// ───────────────────────────────────────────────────────────────
// SwitchService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct SwitchService {
    handle: String,
    /// Most recently issued device state.  Starts `Off`.
    last_command: SwitchCommand,
    poll_interval: Duration,
    close_on_unrecognized: bool,
    backoff: Backoff,
    poll_count: u64,
}

impl SwitchService {
    /// Construct the service from configuration.
    pub fn new(config: &SwitchConfig) -> Self {
        Self {
            handle: config.handle().to_string(),
            last_command: SwitchCommand::Off,
            poll_interval: Duration::from_secs(config.poll_interval_secs),
            close_on_unrecognized: config.close_on_unrecognized,
            backoff: Backoff::new(Duration::from_secs(config.max_backoff_secs)),
            poll_count: 0,
        }
    }

    /// Override the configured poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Announce the service.  Call once before the first poll.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started {
            handle: self.handle.clone(),
            initial: self.last_command,
        });
        info!("SwitchService started, polling every {:?}", self.poll_interval);
    }

    /// Poll until `shutdown` is triggered.  Returns the number of polls made.
    ///
    /// Failures never end the loop; they are reported through `sink` and
    /// delay the next poll by the backoff.
    pub fn run(
        &mut self,
        timeline: &mut impl TimelinePort,
        device: &mut impl DevicePort,
        sink: &mut impl EventSink,
        shutdown: &Shutdown,
    ) -> u64 {
        let first = self.poll_count;
        while !shutdown.is_triggered() {
            let result = self.poll_once(timeline, device, sink);
            let delay = self.settle(result, sink);
            if !shutdown.sleep(delay) {
                break;
            }
        }
        let polls = self.poll_count - first;
        sink.emit(&AppEvent::Stopped { polls });
        polls
    }

    // ── Per-poll orchestration ────────────────────────────────

    /// Run one full cycle: fetch → classify → write if changed.
    ///
    /// `last_command` only moves after the byte has been written, so a
    /// failed write is retried by the next poll of the same post.
    pub fn poll_once(
        &mut self,
        timeline: &mut impl TimelinePort,
        device: &mut impl DevicePort,
        sink: &mut impl EventSink,
    ) -> Result<PollOutcome> {
        self.poll_count += 1;

        let Some(post) = timeline.latest_post()? else {
            sink.emit(&AppEvent::NoPost);
            return Ok(PollOutcome::NoPost);
        };
        debug!("poll #{}: latest post id={}", self.poll_count, post.id);

        let Some(target) = classify(&post.text) else {
            sink.emit(&AppEvent::Unrecognized { text: post.text });
            if self.close_on_unrecognized && device.is_open() {
                device.close();
                sink.emit(&AppEvent::PortClosed);
            }
            return Ok(PollOutcome::Unrecognized);
        };

        sink.emit(&AppEvent::PostMatched {
            text: post.text,
            command: target,
        });

        if target == self.last_command {
            sink.emit(&AppEvent::Unchanged(target));
            return Ok(PollOutcome::Unchanged(target));
        }

        if !device.is_open() {
            device.open()?;
        }
        if let Err(e) = device.write_byte(target.wire_byte()) {
            // Drop the handle so the next attempt starts from a fresh open.
            device.close();
            return Err(e.into());
        }

        self.last_command = target;
        sink.emit(&AppEvent::Switched(target));
        Ok(PollOutcome::Switched(target))
    }

    /// A single poll whose failure is also reported through `sink`.
    ///
    /// Used when there is no loop to [`settle`](Self::settle) the result;
    /// the error is still returned so the caller can exit non-zero.
    pub fn poll_reported(
        &mut self,
        timeline: &mut impl TimelinePort,
        device: &mut impl DevicePort,
        sink: &mut impl EventSink,
    ) -> Result<PollOutcome> {
        let result = self.poll_once(timeline, device, sink);
        if let Err(e) = &result {
            sink.emit(&AppEvent::PollFailed(e.clone()));
        }
        result
    }

    /// Report the result of a poll and decide how long to wait before the next.
    pub fn settle(&mut self, result: Result<PollOutcome>, sink: &mut impl EventSink) -> Duration {
        match result {
            Ok(_) => {
                self.backoff.reset();
                self.poll_interval
            }
            Err(e) => {
                sink.emit(&AppEvent::PollFailed(e));
                let (attempt, extra) = self.backoff.record_failure();
                sink.emit(&AppEvent::RetryScheduled {
                    attempt,
                    delay: extra,
                });
                self.poll_interval + extra
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Most recently issued device state.
    pub fn last_command(&self) -> SwitchCommand {
        self.last_command
    }

    /// Total polls attempted since construction.
    pub fn poll_count(&self) -> u64 {
        self.poll_count
    }

    /// Consecutive failed polls.
    pub fn consecutive_failures(&self) -> u32 {
        self.backoff.attempt()
    }

    /// Account being watched, without `@`.
    pub fn handle(&self) -> &str {
        &self.handle
    }
}
