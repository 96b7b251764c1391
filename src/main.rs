//! HashSwitch: Main Entry Point
//!
//! Watches one account's latest post and drives a serial relay from it.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                   │
//! │                                                          │
//! │  HttpTimeline     SerialDevice   LogEventSink            │
//! │  (TimelinePort)   (DevicePort)   (EventSink)             │
//! │  FileConfigAdapter (ConfigPort)                          │
//! │                                                          │
//! │  ──────────────── Port Trait Boundary ─────────────      │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────┐      │
//! │  │        SwitchService (pure logic)              │      │
//! │  │  classify · dedupe · backoff                   │      │
//! │  └────────────────────────────────────────────────┘      │
//! │                                                          │
//! │  Shutdown (Ctrl-C / SIGTERM)                             │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use hashswitch::adapters::config_file::FileConfigAdapter;
use hashswitch::adapters::log_sink::LogEventSink;
use hashswitch::adapters::serial::SerialDevice;
use hashswitch::adapters::timeline::HttpTimeline;
use hashswitch::app::ports::{ConfigPort, DevicePort};
use hashswitch::app::service::SwitchService;
use hashswitch::config::{ConfigOverrides, SwitchConfig, resolve_config};
use hashswitch::shutdown::Shutdown;

const DEFAULT_TOKEN_ENV: &str = "HASHSWITCH_BEARER_TOKEN";

#[derive(Parser, Debug)]
#[command(name = "hashswitch", version, about = "Toggle a serial relay from #switchon / #switchoff posts")]
struct Cli {
    #[arg(long, short, help = "JSON config file (missing file means defaults)")]
    config: Option<PathBuf>,
    #[arg(long, help = "Account to watch, with or without @")]
    handle: Option<String>,
    #[arg(long, help = "Serial port name, e.g. /dev/ttyACM0 or COM3")]
    port: Option<String>,
    #[arg(long, help = "Serial baud rate")]
    baud: Option<u32>,
    #[arg(long, value_name = "SECS", help = "Seconds between polls")]
    interval: Option<u64>,
    #[arg(
        long,
        value_name = "VAR",
        default_value = DEFAULT_TOKEN_ENV,
        help = "Environment variable holding the API bearer token"
    )]
    bearer_token_env: String,
    #[arg(
        long,
        overrides_with = "no_close_on_unrecognized",
        help = "Close the serial port when a post has no control tag"
    )]
    close_on_unrecognized: bool,
    #[arg(
        long,
        overrides_with = "close_on_unrecognized",
        help = "Keep the serial port open on untagged posts"
    )]
    no_close_on_unrecognized: bool,
    #[arg(long, help = "Poll once and exit")]
    once: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        let close_on_unrecognized = match (self.close_on_unrecognized, self.no_close_on_unrecognized) {
            (true, _) => Some(true),
            (false, true) => Some(false),
            (false, false) => None,
        };
        ConfigOverrides {
            account_handle: self.handle.clone(),
            port_name: self.port.clone(),
            baud_rate: self.baud,
            poll_interval_secs: self.interval,
            close_on_unrecognized,
        }
    }
}

fn load_config(cli: &Cli) -> Result<SwitchConfig> {
    let loaded = cli.config.as_ref().map(|path| {
        info!("Loading config from {}", path.display());
        FileConfigAdapter::new(path).load()
    });
    let config = resolve_config(loaded, &cli.overrides()).context("invalid configuration")?;
    Ok(config)
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. Bootstrap ──────────────────────────────────────────
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    info!("HashSwitch v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration + credentials ────────────────────────
    let config = load_config(&cli)?;
    let token = std::env::var(&cli.bearer_token_env)
        .with_context(|| format!("bearer token not set: export {}", cli.bearer_token_env))?;

    // ── 3. Construct adapters ─────────────────────────────────
    let mut timeline = HttpTimeline::new(&config, token).context("building timeline client")?;
    let mut device = SerialDevice::new(&config);
    let mut sink = LogEventSink::new();

    // Open eagerly so a wrong port name shows up at startup; the service
    // reopens on demand if this fails.
    info!(
        "Serial port {} at {} baud, {:?} settle after open",
        config.port_name,
        config.baud_rate,
        device.settle_delay()
    );
    if let Err(e) = device.open() {
        warn!("Serial port not available yet ({}), will retry on first command", e);
    }

    // ── 4. Construct app service ──────────────────────────────
    let mut app = SwitchService::new(&config);
    app.start(&mut sink);

    if cli.once {
        let result = app.poll_reported(&mut timeline, &mut device, &mut sink);
        device.close();
        let outcome = result.context("single poll failed")?;
        info!("Single poll finished: {:?}", outcome);
        return Ok(());
    }

    // ── 5. Shutdown wiring ────────────────────────────────────
    let shutdown = Shutdown::new();
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || shutdown.trigger()).context("installing signal handler")?;
    }

    info!("Entering poll loop (Ctrl-C to stop)");

    // ── 6. Poll loop ──────────────────────────────────────────
    app.run(&mut timeline, &mut device, &mut sink, &shutdown);
    device.close();
    Ok(())
}
