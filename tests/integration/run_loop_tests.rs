//! Integration tests for `SwitchService::run`: looping, backoff and shutdown.
//!
//! The poll interval is zero so each test finishes in milliseconds; the
//! mock timeline triggers shutdown once its script is exhausted.

use std::time::{Duration, Instant};

use super::mock_hw::{MockDevice, MockTimeline, RecordingSink};

use hashswitch::app::commands::SwitchCommand;
use hashswitch::app::events::AppEvent;
use hashswitch::app::ports::FetchError;
use hashswitch::app::service::SwitchService;
use hashswitch::config::SwitchConfig;
use hashswitch::shutdown::Shutdown;

fn fast_app() -> SwitchService {
    let cfg = SwitchConfig {
        account_handle: "lamp_bot".into(),
        max_backoff_secs: 1,
        ..SwitchConfig::default()
    };
    SwitchService::new(&cfg).with_poll_interval(Duration::ZERO)
}

#[test]
fn loop_runs_until_shutdown() {
    let shutdown = Shutdown::new();
    let mut tl = MockTimeline::with_texts(&[
        "#switchon",
        "#switchon",
        "random post with no tags",
        "#switchoff",
    ])
    .stop_when_done(shutdown.clone());
    let mut dev = MockDevice::new();
    let mut sink = RecordingSink::new();
    let mut app = fast_app();

    let polls = app.run(&mut tl, &mut dev, &mut sink, &shutdown);

    assert_eq!(polls, 4);
    assert_eq!(dev.writes(), vec![b'1', b'0']);
    assert_eq!(app.last_command(), SwitchCommand::Off);
    assert_eq!(sink.events.last(), Some(&AppEvent::Stopped { polls: 4 }));
}

#[test]
fn failures_do_not_stop_the_loop() {
    let shutdown = Shutdown::new();
    let mut tl = MockTimeline::new();
    tl.push_error(FetchError::Transport("connection reset".into()))
        .push_error(FetchError::RateLimited)
        .push_post("7", "#switchon");
    let mut tl = tl.stop_when_done(shutdown.clone());
    let mut dev = MockDevice::new();
    let mut sink = RecordingSink::new();
    let mut app = fast_app();

    let polls = app.run(&mut tl, &mut dev, &mut sink, &shutdown);

    assert_eq!(polls, 3);
    assert_eq!(dev.writes(), vec![b'1']);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::PollFailed(_))), 2);
    let retries: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::RetryScheduled { attempt, delay } => Some((*attempt, *delay)),
            _ => None,
        })
        .collect();
    assert_eq!(
        retries,
        vec![
            (1, Duration::from_millis(100)),
            (2, Duration::from_millis(200))
        ]
    );
    assert_eq!(app.consecutive_failures(), 0, "success resets the backoff");
}

#[test]
fn pre_triggered_shutdown_never_polls() {
    let shutdown = Shutdown::new();
    shutdown.trigger();
    let mut tl = MockTimeline::with_texts(&["#switchon"]);
    let mut dev = MockDevice::new();
    let mut sink = RecordingSink::new();
    let mut app = fast_app();

    assert_eq!(app.run(&mut tl, &mut dev, &mut sink, &shutdown), 0);
    assert_eq!(tl.fetches, 0);
    assert!(dev.calls.is_empty());
}

#[test]
fn shutdown_interrupts_the_sleep() {
    let cfg = SwitchConfig {
        account_handle: "lamp_bot".into(),
        ..SwitchConfig::default()
    };
    // Default 30 s interval: the test only finishes quickly if the sleep is cut short.
    let mut app = SwitchService::new(&cfg);
    let shutdown = Shutdown::new();
    let remote = shutdown.clone();
    let stopper = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(100));
        remote.trigger();
    });

    let mut tl = MockTimeline::with_texts(&["#switchon", "#switchoff"]);
    let mut dev = MockDevice::new();
    let mut sink = RecordingSink::new();
    let start = Instant::now();

    let polls = app.run(&mut tl, &mut dev, &mut sink, &shutdown);
    stopper.join().unwrap();

    assert_eq!(polls, 1);
    assert!(start.elapsed() < Duration::from_secs(10));
    assert_eq!(dev.writes(), vec![b'1']);
}
