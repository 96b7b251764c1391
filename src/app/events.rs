//! Outbound application events.
//!
//! The [`SwitchService`](super::service::SwitchService) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them.  The `Display` impl is the console
//! wording.

use core::fmt;
use std::time::Duration;

use super::commands::SwitchCommand;
use crate::error::Error;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The poll loop started watching `handle`.
    Started { handle: String, initial: SwitchCommand },

    /// A post carried a control tag; `text` is echoed verbatim.
    PostMatched { text: String, command: SwitchCommand },

    /// The command byte reached the device.
    Switched(SwitchCommand),

    /// The post asked for the state the device is already in.
    Unchanged(SwitchCommand),

    /// The latest post carried neither tag.
    Unrecognized { text: String },

    /// The serial port was closed in response to an unrecognised post.
    PortClosed,

    /// The account has no posts yet.
    NoPost,

    /// A poll failed; the loop keeps running.
    PollFailed(Error),

    /// The next poll is delayed by `delay` after `attempt` consecutive failures.
    RetryScheduled { attempt: u32, delay: Duration },

    /// The loop stopped after `polls` iterations.
    Stopped { polls: u64 },
}

impl fmt::Display for AppEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started { handle, initial } => {
                write!(f, "watching @{} (assumed device state {})", handle, initial)
            }
            Self::PostMatched { text, .. } => write!(f, "{}", text),
            Self::Switched(cmd) => {
                write!(f, "Write {} on serial port", cmd.wire_byte() as char)
            }
            Self::Unchanged(cmd) => write!(f, "device already {}, nothing written", cmd),
            Self::Unrecognized { .. } => write!(f, "invalid tweet"),
            Self::PortClosed => write!(f, "serial port closed"),
            Self::NoPost => write!(f, "timeline is empty"),
            Self::PollFailed(e) => write!(f, "poll failed: {}", e),
            Self::RetryScheduled { attempt, delay } => write!(
                f,
                "retry #{} backing off an extra {} ms",
                attempt,
                delay.as_millis()
            ),
            Self::Stopped { polls } => write!(f, "stopped after {} polls", polls),
        }
    }
}
