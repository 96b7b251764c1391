//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the `log`
//! facade.  The binary installs `env_logger`, so this ends up on stderr.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::PollFailed(_) => warn!("POLL  | {}", event),
            AppEvent::RetryScheduled { .. } => warn!("RETRY | {}", event),
            AppEvent::PostMatched { command, .. } => info!("POST  | [{}] {}", command, event),
            AppEvent::Switched(_) => info!("WRITE | {}", event),
            AppEvent::Unrecognized { text } => {
                info!("POST  | {}", event);
                debug!("POST  | ignored text: {:?}", text);
            }
            AppEvent::Unchanged(_) | AppEvent::NoPost => debug!("POLL  | {}", event),
            AppEvent::PortClosed => info!("PORT  | {}", event),
            AppEvent::Started { .. } => info!("START | {}", event),
            AppEvent::Stopped { .. } => info!("STOP  | {}", event),
        }
    }
}
