//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ SwitchService (domain)
//! ```
//!
//! Driven adapters (timeline client, serial device, event sinks, config
//! storage) implement these traits.  The
//! [`SwitchService`](super::service::SwitchService) consumes them via
//! generics, so the domain core never touches the network or a tty directly.
//!
//! ## Security notes
//!
//! - **TimelinePort** implementations hold API credentials; they MUST NOT
//!   include them in `Display`/`Debug` output or in error messages.
//! - **ConfigPort** implementations MUST validate before persisting.

use core::fmt;

use crate::config::SwitchConfig;

// ───────────────────────────────────────────────────────────────
// Timeline port (driven adapter: social-media API → domain)
// ───────────────────────────────────────────────────────────────

/// One timeline entry.  Only `text` drives behaviour; `id` is for logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: String,
    pub text: String,
}

impl Post {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Read-side port: the domain calls this once per poll.
pub trait TimelinePort {
    /// Fetch the single most recent post of the configured account.
    ///
    /// Returns `Ok(None)` when the account has no posts.
    fn latest_post(&mut self) -> Result<Option<Post>, FetchError>;
}

// ───────────────────────────────────────────────────────────────
// Device port (driven adapter: domain → serial hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the single serial endpoint receiving ON/OFF bytes.
pub trait DevicePort {
    /// Whether the connection is currently open.
    fn is_open(&self) -> bool;

    /// Open the connection.  Opening an already-open device is a no-op.
    fn open(&mut self) -> Result<(), DeviceError>;

    /// Write one command byte and flush it.
    fn write_byte(&mut self, byte: u8) -> Result<(), DeviceError>;

    /// Close the connection.  Closing a closed device is a no-op.
    fn close(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists the switch configuration.
///
/// # Security
///
/// Implementations MUST validate config values before persisting.
/// Invalid ranges are rejected with [`ConfigError::ValidationFailed`],
/// not silently clamped.
pub trait ConfigPort {
    /// Load configuration.  Returns [`ConfigError::NotFound`] if nothing
    /// is stored yet; callers usually fall back to defaults.
    fn load(&self) -> Result<SwitchConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SwitchConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`TimelinePort`] operations.  All are transient from the
/// loop's point of view: the next poll tries again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Connection, TLS or timeout failure.
    Transport(String),
    /// The API rejected the credentials (401/403).
    Unauthorized,
    /// The API rate limit was hit (429).
    RateLimited,
    /// Any other non-success HTTP status.
    Status(u16),
    /// The configured handle does not resolve to an account.
    UnknownAccount(String),
    /// The response body was not the expected JSON shape.
    Decode(String),
    /// No credentials were supplied.
    MissingCredentials,
}

/// Errors from [`DevicePort`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// The port could not be opened (missing device, permissions, busy).
    Open(String),
    /// Writing or flushing the command byte failed.
    Write(String),
    /// A write was attempted on a closed port.
    NotOpen,
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No config stored at the expected location.
    NotFound,
    /// Stored config failed to deserialize.
    Corrupted(String),
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "transport error: {}", msg),
            Self::Unauthorized => write!(f, "credentials rejected"),
            Self::RateLimited => write!(f, "rate limited"),
            Self::Status(code) => write!(f, "unexpected HTTP status {}", code),
            Self::UnknownAccount(handle) => write!(f, "unknown account @{}", handle),
            Self::Decode(msg) => write!(f, "malformed response: {}", msg),
            Self::MissingCredentials => write!(f, "no bearer token configured"),
        }
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open(msg) => write!(f, "open failed: {}", msg),
            Self::Write(msg) => write!(f, "write failed: {}", msg),
            Self::NotOpen => write!(f, "port not open"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted(msg) => write!(f, "config corrupted: {}", msg),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}
impl std::error::Error for DeviceError {}
impl std::error::Error for ConfigError {}
