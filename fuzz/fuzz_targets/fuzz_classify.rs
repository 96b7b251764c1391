//! Fuzz target: post classification and the switch state machine
//!
//! Splits the input into posts on NUL bytes and polls each one through a
//! `SwitchService` with in-memory ports, verifying:
//! - No panics under arbitrary UTF-8 text
//! - Bytes written to the device are only `b'1'` / `b'0'` and alternate
//! - The final state equals the last byte written
//!
//! cargo fuzz run fuzz_classify

#![no_main]

use libfuzzer_sys::fuzz_target;

use hashswitch::app::commands::SwitchCommand;
use hashswitch::app::events::AppEvent;
use hashswitch::app::ports::{DeviceError, DevicePort, EventSink, FetchError, Post, TimelinePort};
use hashswitch::app::service::SwitchService;
use hashswitch::config::SwitchConfig;

struct Posts<'a>(std::str::Split<'a, char>);

impl TimelinePort for Posts<'_> {
    fn latest_post(&mut self) -> Result<Option<Post>, FetchError> {
        Ok(self.0.next().map(|t| Post::new("0", t)))
    }
}

#[derive(Default)]
struct Wire {
    open: bool,
    bytes: Vec<u8>,
}

impl DevicePort for Wire {
    fn is_open(&self) -> bool {
        self.open
    }
    fn open(&mut self) -> Result<(), DeviceError> {
        self.open = true;
        Ok(())
    }
    fn write_byte(&mut self, byte: u8) -> Result<(), DeviceError> {
        self.bytes.push(byte);
        Ok(())
    }
    fn close(&mut self) {
        self.open = false;
    }
}

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    let posts = text.split('\0').count();

    let config = SwitchConfig {
        account_handle: "fuzz".into(),
        close_on_unrecognized: data.first().is_some_and(|b| b & 1 == 1),
        ..SwitchConfig::default()
    };
    let mut app = SwitchService::new(&config);
    let mut timeline = Posts(text.split('\0'));
    let mut wire = Wire::default();

    for _ in 0..posts {
        app.poll_once(&mut timeline, &mut wire, &mut Discard)
            .expect("in-memory ports never fail");
    }

    assert!(wire.bytes.iter().all(|b| *b == b'1' || *b == b'0'));
    assert!(wire.bytes.windows(2).all(|w| w[0] != w[1]));
    let expected = match wire.bytes.last() {
        Some(b'1') => SwitchCommand::On,
        _ => SwitchCommand::Off,
    };
    assert_eq!(app.last_command(), expected);
});
