//! Unified error type for the switch.
//!
//! Every port error converts into [`Error`].  The poll loop only ever sees
//! [`Error::Fetch`] and [`Error::Device`], logs them and backs off.
//! [`Error::Config`] comes out of [`resolve_config`](crate::config::resolve_config)
//! at startup and ends the program.

use core::fmt;

use crate::app::ports::{ConfigError, DeviceError, FetchError};

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The timeline could not be fetched.
    Fetch(FetchError),
    /// The serial device could not be opened or written.
    Device(DeviceError),
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(e) => write!(f, "fetch: {e}"),
            Self::Device(e) => write!(f, "device: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Fetch(e) => Some(e),
            Self::Device(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

impl From<FetchError> for Error {
    fn from(e: FetchError) -> Self {
        Self::Fetch(e)
    }
}

impl From<DeviceError> for Error {
    fn from(e: DeviceError) -> Self {
        Self::Device(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
