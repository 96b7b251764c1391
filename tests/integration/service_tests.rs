//! Integration tests for the SwitchService → device pipeline.
//!
//! One `poll_once` per scripted post; assertions are on the bytes that
//! reached the mock device and on the emitted events.

use super::mock_hw::{DeviceCall, MockDevice, MockTimeline, RecordingSink};

use hashswitch::app::commands::SwitchCommand;
use hashswitch::app::events::AppEvent;
use hashswitch::app::ports::{DeviceError, FetchError};
use hashswitch::app::service::{PollOutcome, SwitchService};
use hashswitch::config::SwitchConfig;
use hashswitch::error::Error;

fn config() -> SwitchConfig {
    SwitchConfig {
        account_handle: "@pradeeka7".into(),
        ..SwitchConfig::default()
    }
}

fn make_app() -> (SwitchService, MockDevice, RecordingSink) {
    let mut app = SwitchService::new(&config());
    let mut sink = RecordingSink::new();
    app.start(&mut sink);
    (app, MockDevice::new(), sink)
}

// ── Switching ─────────────────────────────────────────────────

#[test]
fn switchon_from_off_writes_one_and_turns_on() {
    let (mut app, mut dev, mut sink) = make_app();
    let mut tl = MockTimeline::with_texts(&["switching on now #switchon"]);

    let outcome = app.poll_once(&mut tl, &mut dev, &mut sink).unwrap();

    assert_eq!(outcome, PollOutcome::Switched(SwitchCommand::On));
    assert_eq!(app.last_command(), SwitchCommand::On);
    assert_eq!(dev.writes(), vec![b'1']);
    assert_eq!(dev.calls, vec![DeviceCall::Open, DeviceCall::Write(b'1')]);
    let lines = sink.lines();
    assert!(lines.contains(&"switching on now #switchon".to_string()));
    assert!(lines.contains(&"Write 1 on serial port".to_string()));
}

#[test]
fn switchoff_after_on_writes_zero() {
    let (mut app, mut dev, mut sink) = make_app();
    let mut tl = MockTimeline::with_texts(&["#switchon", "night night #switchoff"]);

    app.poll_once(&mut tl, &mut dev, &mut sink).unwrap();
    let outcome = app.poll_once(&mut tl, &mut dev, &mut sink).unwrap();

    assert_eq!(outcome, PollOutcome::Switched(SwitchCommand::Off));
    assert_eq!(app.last_command(), SwitchCommand::Off);
    assert_eq!(dev.writes(), vec![b'1', b'0']);
    assert_eq!(dev.count(&DeviceCall::Open), 1, "port stays open between writes");
}

#[test]
fn switchoff_while_already_off_writes_nothing() {
    let (mut app, mut dev, mut sink) = make_app();
    let mut tl = MockTimeline::with_texts(&["#switchoff"]);

    let outcome = app.poll_once(&mut tl, &mut dev, &mut sink).unwrap();

    assert_eq!(outcome, PollOutcome::Unchanged(SwitchCommand::Off));
    assert!(dev.calls.is_empty(), "device must not be touched");
    assert!(sink.events.contains(&AppEvent::PostMatched {
        text: "#switchoff".into(),
        command: SwitchCommand::Off,
    }));
}

// ── Idempotence ──────────────────────────────────────────────

#[test]
fn repeated_switchon_writes_once() {
    let (mut app, mut dev, mut sink) = make_app();
    let mut tl = MockTimeline::with_texts(&["#switchon", "#switchon"]);

    let first = app.poll_once(&mut tl, &mut dev, &mut sink).unwrap();
    let second = app.poll_once(&mut tl, &mut dev, &mut sink).unwrap();

    assert_eq!(first, PollOutcome::Switched(SwitchCommand::On));
    assert_eq!(second, PollOutcome::Unchanged(SwitchCommand::On));
    assert_eq!(dev.writes(), vec![b'1']);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::Switched(_))), 1);
}

#[test]
fn already_open_device_is_not_reopened() {
    let (mut app, _, mut sink) = make_app();
    let mut dev = MockDevice::opened();
    let mut tl = MockTimeline::with_texts(&["#switchon"]);

    app.poll_once(&mut tl, &mut dev, &mut sink).unwrap();

    assert_eq!(dev.calls, vec![DeviceCall::Write(b'1')]);
}

// ── Unrecognised posts ───────────────────────────────────────

#[test]
fn untagged_post_is_invalid_and_ignored() {
    let (mut app, _, mut sink) = make_app();
    let mut dev = MockDevice::opened();
    let mut tl = MockTimeline::with_texts(&["random post with no tags"]);

    let outcome = app.poll_once(&mut tl, &mut dev, &mut sink).unwrap();

    assert_eq!(outcome, PollOutcome::Unrecognized);
    assert!(dev.calls.is_empty());
    assert!(sink.lines().contains(&"invalid tweet".to_string()));
    assert_eq!(app.last_command(), SwitchCommand::Off);
}

#[test]
fn untagged_post_closes_port_when_enabled() {
    let cfg = SwitchConfig {
        close_on_unrecognized: true,
        ..config()
    };
    let mut app = SwitchService::new(&cfg);
    let mut sink = RecordingSink::new();
    let mut dev = MockDevice::opened();
    let mut tl = MockTimeline::with_texts(&["random post with no tags", "#switchon"]);

    app.poll_once(&mut tl, &mut dev, &mut sink).unwrap();
    assert_eq!(dev.calls, vec![DeviceCall::Close]);
    assert!(sink.events.contains(&AppEvent::PortClosed));

    // The next command reopens the port.
    app.poll_once(&mut tl, &mut dev, &mut sink).unwrap();
    assert_eq!(
        dev.calls,
        vec![DeviceCall::Close, DeviceCall::Open, DeviceCall::Write(b'1')]
    );
}

#[test]
fn empty_timeline_is_not_an_error() {
    let (mut app, mut dev, mut sink) = make_app();
    let mut tl = MockTimeline::new();
    tl.push_empty();

    assert_eq!(
        app.poll_once(&mut tl, &mut dev, &mut sink).unwrap(),
        PollOutcome::NoPost
    );
    assert!(dev.calls.is_empty());
    assert!(sink.events.contains(&AppEvent::NoPost));
}

// ── Failures ─────────────────────────────────────────────────

#[test]
fn fetch_failure_leaves_state_untouched() {
    let (mut app, mut dev, mut sink) = make_app();
    let mut tl = MockTimeline::new();
    tl.push_error(FetchError::RateLimited);

    let err = app.poll_once(&mut tl, &mut dev, &mut sink).unwrap_err();

    assert_eq!(err, Error::Fetch(FetchError::RateLimited));
    assert_eq!(app.last_command(), SwitchCommand::Off);
    assert!(dev.calls.is_empty());
}

#[test]
fn open_failure_is_retried_on_next_poll() {
    let (mut app, mut dev, mut sink) = make_app();
    dev.fail_opens = 1;
    let mut tl = MockTimeline::with_texts(&["#switchon", "#switchon"]);

    let err = app.poll_once(&mut tl, &mut dev, &mut sink).unwrap_err();
    assert!(matches!(err, Error::Device(DeviceError::Open(_))));
    assert_eq!(app.last_command(), SwitchCommand::Off, "state moves only after a write");

    let outcome = app.poll_once(&mut tl, &mut dev, &mut sink).unwrap();
    assert_eq!(outcome, PollOutcome::Switched(SwitchCommand::On));
    assert_eq!(dev.writes(), vec![b'1']);
}

#[test]
fn write_failure_closes_port_and_retries() {
    let (mut app, mut dev, mut sink) = make_app();
    dev.fail_writes = 1;
    let mut tl = MockTimeline::with_texts(&["#switchon", "#switchon"]);

    let err = app.poll_once(&mut tl, &mut dev, &mut sink).unwrap_err();
    assert!(matches!(err, Error::Device(DeviceError::Write(_))));
    assert_eq!(app.last_command(), SwitchCommand::Off);
    assert_eq!(dev.calls, vec![DeviceCall::Open, DeviceCall::Close]);

    app.poll_once(&mut tl, &mut dev, &mut sink).unwrap();
    assert_eq!(
        dev.calls,
        vec![
            DeviceCall::Open,
            DeviceCall::Close,
            DeviceCall::Open,
            DeviceCall::Write(b'1')
        ]
    );
    assert_eq!(app.last_command(), SwitchCommand::On);
}

#[test]
fn poll_count_includes_failures() {
    let (mut app, mut dev, mut sink) = make_app();
    let mut tl = MockTimeline::new();
    tl.push_error(FetchError::Status(503)).push_post("1", "#switchon");

    let _ = app.poll_once(&mut tl, &mut dev, &mut sink);
    let _ = app.poll_once(&mut tl, &mut dev, &mut sink);

    assert_eq!(app.poll_count(), 2);
    assert_eq!(tl.fetches, 2);
}

// ── Single poll ──────────────────────────────────────────────

#[test]
fn reported_poll_emits_failure_and_returns_it() {
    let (mut app, mut dev, mut sink) = make_app();
    let mut tl = MockTimeline::new();
    tl.push_error(FetchError::Unauthorized);

    let err = app.poll_reported(&mut tl, &mut dev, &mut sink).unwrap_err();

    assert_eq!(err, Error::Fetch(FetchError::Unauthorized));
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::PollFailed(Error::Fetch(FetchError::Unauthorized)))),
        1
    );
    assert_eq!(sink.count(|e| matches!(e, AppEvent::RetryScheduled { .. })), 0);
}

#[test]
fn reported_poll_success_emits_no_failure() {
    let (mut app, mut dev, mut sink) = make_app();
    let mut tl = MockTimeline::with_texts(&["#switchon"]);

    let outcome = app.poll_reported(&mut tl, &mut dev, &mut sink).unwrap();

    assert_eq!(outcome, PollOutcome::Switched(SwitchCommand::On));
    assert_eq!(sink.count(|e| matches!(e, AppEvent::PollFailed(_))), 0);
    assert_eq!(dev.writes(), vec![b'1']);
}
