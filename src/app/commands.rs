//! Device commands and post classification.
//!
//! A post is turned into a [`SwitchCommand`] purely by substring
//! containment.  `#switchon` is checked first, so a post carrying both
//! tags energises the device.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Hashtag that energises the device.
pub const TAG_ON: &str = "#switchon";

/// Hashtag that de-energises the device.
pub const TAG_OFF: &str = "#switchoff";

/// The two states the serial device can be commanded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwitchCommand {
    /// Energise the relay (`'1'` on the wire).
    On,
    /// De-energise the relay (`'0'` on the wire).
    #[default]
    Off,
}

impl SwitchCommand {
    /// The single ASCII byte written to the serial device.
    pub const fn wire_byte(self) -> u8 {
        match self {
            Self::On => b'1',
            Self::Off => b'0',
        }
    }
}

impl fmt::Display for SwitchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => write!(f, "ON"),
            Self::Off => write!(f, "OFF"),
        }
    }
}

/// Classify post text.  Returns `None` when neither tag is present.
///
/// Matching is case-sensitive and anywhere in the text, so `#switchonce`
/// also selects [`SwitchCommand::On`].
pub fn classify(text: &str) -> Option<SwitchCommand> {
    if text.contains(TAG_ON) {
        Some(SwitchCommand::On)
    } else if text.contains(TAG_OFF) {
        Some(SwitchCommand::Off)
    } else {
        None
    }
}
