//! Switch configuration parameters
//!
//! Everything the switch needs to know (account, port, timings) lives
//! here.  Values come from defaults, then an optional JSON file, then CLI
//! flags.  Credentials are deliberately absent: they are read from the
//! environment by the binary and never serialised.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::error::{Error, Result};

/// Core switch configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SwitchConfig {
    // --- Timeline ---
    /// Account whose latest post is polled (leading `@` is accepted)
    pub account_handle: String,
    /// API root, without trailing slash
    pub api_base_url: String,
    /// Per-request HTTP timeout (milliseconds)
    pub request_timeout_ms: u64,

    // --- Serial ---
    /// OS name of the serial port (`/dev/ttyACM0`, `COM3`, ...)
    pub port_name: String,
    /// Line speed
    pub baud_rate: u32,
    /// Serial read/write timeout (milliseconds)
    pub serial_timeout_ms: u64,
    /// Wait after a fresh open before the first write (milliseconds).
    /// Opening the port resets most Arduino boards; bytes sent while the
    /// bootloader runs are lost.
    pub open_settle_ms: u64,

    // --- Loop ---
    /// Delay between polls (seconds)
    pub poll_interval_secs: u64,
    /// Upper bound on the extra delay added after consecutive failures (seconds)
    pub max_backoff_secs: u64,
    /// Close the serial port when a post carries no control tag
    pub close_on_unrecognized: bool,
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self {
            // Timeline
            account_handle: String::new(),
            api_base_url: "https://api.twitter.com".to_string(),
            request_timeout_ms: 10_000,

            // Serial
            port_name: "/dev/ttyACM0".to_string(),
            baud_rate: 9600,
            serial_timeout_ms: 1000,
            open_settle_ms: 2000,

            // Loop
            poll_interval_secs: 30,
            max_backoff_secs: 300,
            close_on_unrecognized: false,
        }
    }
}

impl SwitchConfig {
    /// The handle with any leading `@` removed.
    pub fn handle(&self) -> &str {
        self.account_handle.trim().trim_start_matches('@')
    }

    /// `api_base_url` without a trailing slash.
    pub fn api_root(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    /// Overwrite every field that `overrides` sets.
    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(handle) = &overrides.account_handle {
            self.account_handle.clone_from(handle);
        }
        if let Some(port) = &overrides.port_name {
            self.port_name.clone_from(port);
        }
        if let Some(baud) = overrides.baud_rate {
            self.baud_rate = baud;
        }
        if let Some(interval) = overrides.poll_interval_secs {
            self.poll_interval_secs = interval;
        }
        if let Some(close) = overrides.close_on_unrecognized {
            self.close_on_unrecognized = close;
        }
    }
}

/// Command-line values layered over the file.  `None` keeps the lower layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub account_handle: Option<String>,
    pub port_name: Option<String>,
    pub baud_rate: Option<u32>,
    pub poll_interval_secs: Option<u64>,
    pub close_on_unrecognized: Option<bool>,
}

/// Build the effective configuration: defaults, then the file, then overrides.
///
/// `loaded` is the outcome of [`ConfigPort::load`](crate::app::ports::ConfigPort::load),
/// or `None` when no file was given.  A missing file falls back to defaults;
/// any other load failure, and a merged result that fails validation, is
/// returned as [`Error::Config`].
pub fn resolve_config(
    loaded: Option<core::result::Result<SwitchConfig, ConfigError>>,
    overrides: &ConfigOverrides,
) -> Result<SwitchConfig> {
    let mut config = match loaded {
        Some(Ok(cfg)) => cfg,
        Some(Err(ConfigError::NotFound)) => {
            warn!("Config file not found, using defaults");
            SwitchConfig::default()
        }
        Some(Err(e)) => return Err(Error::Config(e)),
        None => SwitchConfig::default(),
    };
    config.apply(overrides);
    validate_config(&config)?;
    Ok(config)
}

/// Range-check every field.  Shared by the file adapter and the binary
/// (after CLI overrides are applied).
pub fn validate_config(cfg: &SwitchConfig) -> core::result::Result<(), ConfigError> {
    let handle = cfg.handle();
    if handle.is_empty() {
        return Err(ConfigError::ValidationFailed("account_handle must be set"));
    }
    if handle.len() > 15 || !handle.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
        return Err(ConfigError::ValidationFailed(
            "account_handle must be 1–15 characters of A–Z, a–z, 0–9 or _",
        ));
    }
    if !(cfg.api_base_url.starts_with("http://") || cfg.api_base_url.starts_with("https://")) {
        return Err(ConfigError::ValidationFailed(
            "api_base_url must start with http:// or https://",
        ));
    }
    if !(100..=120_000).contains(&cfg.request_timeout_ms) {
        return Err(ConfigError::ValidationFailed(
            "request_timeout_ms must be 100–120000",
        ));
    }
    if cfg.port_name.trim().is_empty() {
        return Err(ConfigError::ValidationFailed("port_name must be set"));
    }
    if !(300..=4_000_000).contains(&cfg.baud_rate) {
        return Err(ConfigError::ValidationFailed("baud_rate must be 300–4000000"));
    }
    if !(1..=60_000).contains(&cfg.serial_timeout_ms) {
        return Err(ConfigError::ValidationFailed(
            "serial_timeout_ms must be 1–60000",
        ));
    }
    if cfg.open_settle_ms > 10_000 {
        return Err(ConfigError::ValidationFailed("open_settle_ms must be 0–10000"));
    }
    if !(1..=86_400).contains(&cfg.poll_interval_secs) {
        return Err(ConfigError::ValidationFailed(
            "poll_interval_secs must be 1–86400",
        ));
    }
    if !(1..=86_400).contains(&cfg.max_backoff_secs) {
        return Err(ConfigError::ValidationFailed(
            "max_backoff_secs must be 1–86400",
        ));
    }
    Ok(())
}
