mod harness;

use approx::assert_abs_diff_eq;
use harness::Harness;
use std::thread;
use std::time::Duration;

use tiltguess::config::{GestureConfig, Thresholds};
use tiltguess::gesture::DebounceState;
use tiltguess::permission::{ChannelPermission, PermissionStatus};
use tiltguess::sensor::{TiltReading, TiltSource, TraceFileSource};
use tiltguess::{Position, TiltAction};

fn unsmoothed() -> GestureConfig {
    GestureConfig {
        smoothing_window: 1,
        ..GestureConfig::default()
    }
}

#[test]
fn test_smoothing_starts_from_available_samples() {
    let mut h = Harness::new();
    let outcomes = h.feed(0, &[1.0, 2.0, 3.0, 4.0, 5.0]);

    assert_eq!(outcomes.len(), 5);
    assert_abs_diff_eq!(outcomes[0].smoothed, 1.0);
    assert_abs_diff_eq!(outcomes[1].smoothed, 1.5);
    assert_abs_diff_eq!(h.engine.snapshot().smoothed, 3.0);
    assert!(h.actions().is_empty());
}

#[test]
fn test_noisy_plateau_is_smoothed() {
    let mut h = Harness::new();
    h.calibrate(0, 0.0);
    h.feed(100, &[48.0, 49.0, 51.0, 50.0, 52.0]);

    let snapshot = h.engine.snapshot();
    assert_abs_diff_eq!(snapshot.smoothed, 50.0, epsilon = 0.5);
    assert_eq!(snapshot.last_raw, 52.0);
}

#[test]
fn test_calibration_sets_baseline_and_resets_position() {
    let mut h = Harness::new();
    h.calibrate(0, 0.0);
    h.hold(100, 90.0, 5);
    assert_eq!(h.engine.position(), Position::Up);

    h.calibrate(200, 10.0);
    let snapshot = h.engine.snapshot();
    assert_eq!(snapshot.baseline, 10.0);
    assert_eq!(snapshot.smoothed, 10.0);
    assert_eq!(snapshot.position, Position::Neutral);
    assert!(snapshot.calibrated);
    assert_eq!(*h.engine.debounce(), DebounceState::new());
}

#[test]
fn test_held_tilt_fires_once() {
    let mut h = Harness::new();
    h.calibrate(0, 0.0);
    for i in 0..10 {
        h.feed(i * 200, &[90.0]);
    }

    assert_eq!(h.actions(), &[TiltAction::Correct]);
    assert_eq!(h.engine.position(), Position::Up);
}

#[test]
fn test_downward_tilt_skips() {
    let mut h = Harness::new();
    h.calibrate(0, 20.0);
    let outcomes = h.hold(100, -60.0, 5);

    assert_eq!(h.actions(), &[TiltAction::Skip]);
    assert_eq!(h.engine.position(), Position::Down);
    assert!(outcomes.iter().all(|o| o.delta <= 0.0));
}

#[test]
fn test_delta_exactly_at_baseline_is_neutral() {
    let mut h = Harness::new();
    h.calibrate(0, 30.0);
    let outcomes = h.feed(100, &[30.0]);
    assert_eq!(outcomes[0].delta, 0.0);
    assert_eq!(outcomes[0].position, Position::Neutral);
}

#[test]
fn test_dead_zone_rearms_after_neutral_pass() {
    let mut h = Harness::with_config(unsmoothed());
    h.calibrate(0, 0.0);

    h.feed(0, &[90.0]);
    assert_eq!(h.count(TiltAction::Correct), 1);

    let outcome = h.feed(100, &[30.0])[0];
    assert_eq!(outcome.position, Position::Neutral);
    assert!(h.engine.debounce().has_returned_to_neutral);
    assert!(h.engine.debounce().is_processing_action);

    h.feed(200, &[0.0]);
    assert!(h.engine.debounce().is_processing_action);

    h.feed(1200, &[90.0]);
    assert_eq!(h.count(TiltAction::Correct), 2);
}

#[test]
fn test_missing_angle_behaves_like_zero() {
    let mut missing = Harness::new();
    let mut zero = Harness::new();
    missing.calibrate(0, 0.0);
    zero.calibrate(0, 0.0);

    let with_missing = [
        TiltReading::missing(),
        TiltReading::new(90.0),
        TiltReading::new(90.0),
        TiltReading::missing(),
        TiltReading::new(90.0),
        TiltReading::new(f32::NAN),
    ];
    let with_zero = [
        TiltReading::new(0.0),
        TiltReading::new(90.0),
        TiltReading::new(90.0),
        TiltReading::new(0.0),
        TiltReading::new(90.0),
        TiltReading::new(0.0),
    ];

    let a = missing.feed_readings(100, &with_missing);
    let b = zero.feed_readings(100, &with_zero);

    assert_eq!(a, b);
    assert_eq!(missing.engine.snapshot(), zero.engine.snapshot());
    assert_eq!(missing.actions(), zero.actions());
}

#[test]
fn test_disable_detaches_and_keeps_state() {
    let mut h = Harness::new();
    h.calibrate(0, 5.0);
    h.hold(100, 90.0, 5);
    assert_eq!(h.bus.listener_count(), 1);

    h.engine.disable();
    assert_eq!(h.bus.listener_count(), 0);
    assert_eq!(h.bus.publish(TiltReading::new(-90.0)), 0);
    assert!(h.hold(200, -90.0, 5).is_empty());

    let snapshot = h.engine.snapshot();
    assert!(!snapshot.enabled);
    assert_eq!(snapshot.position, Position::Up);
    assert_eq!(snapshot.baseline, 5.0);
    assert_eq!(snapshot.last_raw, 90.0);

    assert!(h.engine.enable(&h.bus));
    assert_eq!(h.bus.listener_count(), 1);
    assert_eq!(h.engine.position(), Position::Up);
    assert_eq!(h.actions(), &[TiltAction::Correct]);
}

#[test]
fn test_repeated_calibrate_captures_once() {
    let mut h = Harness::new();
    assert!(h.engine.calibrate());
    assert!(!h.engine.calibrate());

    let outcomes = h.feed(0, &[5.0, 60.0]);
    assert!(outcomes[0].calibration);
    assert!(!outcomes[1].calibration);
    assert_eq!(h.engine.snapshot().baseline, 5.0);
    assert_abs_diff_eq!(outcomes[1].delta, 27.5);
    assert!(!h.engine.snapshot().calibration_pending);
}

#[test]
fn test_calibration_cancels_settle_timer() {
    let mut h = Harness::new();
    h.calibrate(0, 0.0);
    h.hold(0, 90.0, 2);
    assert_eq!(h.count(TiltAction::Correct), 1);

    h.hold(100, 0.0, 5);
    assert!(h.engine.debounce().is_processing_action);
    assert!(h.engine.snapshot().settle_pending);

    h.calibrate(200, 0.0);
    assert_eq!(*h.engine.debounce(), DebounceState::new());
    assert!(!h.engine.snapshot().settle_pending);

    h.hold(300, 90.0, 2);
    assert_eq!(h.count(TiltAction::Correct), 2);

    h.clock.set(700);
    assert!(!h.engine.poll_timers());
    assert!(h.engine.debounce().is_processing_action);
}

#[test]
fn test_poll_timers_settles_without_readings() {
    let mut h = Harness::new();
    h.calibrate(0, 0.0);
    h.hold(0, 90.0, 2);
    h.hold(100, 0.0, 5);

    h.clock.set(599);
    assert!(!h.engine.poll_timers());
    h.clock.set(600);
    assert!(h.engine.poll_timers());
    assert!(!h.engine.debounce().is_processing_action);
}

#[test]
fn test_thresholds_change_mid_session() {
    let mut h = Harness::new();
    h.calibrate(0, 0.0);
    h.hold(0, 30.0, 5);
    assert!(h.actions().is_empty());

    h.engine
        .set_thresholds(Thresholds::new(5.0, 20.0).unwrap())
        .unwrap();
    let outcome = h.feed(100, &[30.0])[0];

    assert_eq!(outcome.action, Some(TiltAction::Correct));
    assert_eq!(h.engine.config().action_threshold, 20.0);
}

#[test]
fn test_permission_flow_with_host_prompt() {
    let mut h = Harness::new();
    h.engine.disable();

    let (mut permission, prompter) = ChannelPermission::new(Some(Duration::from_secs(5)));
    h.engine.probe_capability(&permission);
    assert!(!h.engine.motion_available());
    assert!(!h.engine.enable(&h.bus));

    let host = thread::spawn(move || {
        for status in [PermissionStatus::Default, PermissionStatus::Granted] {
            prompter.prompts.recv().unwrap();
            prompter.replies.send(status).unwrap();
        }
    });

    assert!(!h.engine.request_permission(&mut permission));
    assert!(!h.engine.snapshot().calibration_pending);
    assert!(h.engine.request_permission(&mut permission));
    host.join().unwrap();

    assert!(h.engine.snapshot().calibration_pending);
    assert!(h.engine.enable(&h.bus));

    let outcomes = h.feed(0, &[12.0]);
    assert!(outcomes[0].calibration);
    assert_eq!(h.engine.snapshot().baseline, 12.0);
}

#[test]
fn test_replay_recorded_trace() {
    let mut content = String::from("# t_ms,beta\n0,0\n20,0\n40,0\n");
    for t in (60..=140).step_by(20) {
        content.push_str(&format!("{},90\n", t));
    }
    for t in (200..=280).step_by(20) {
        content.push_str(&format!("{},0\n", t));
    }
    content.push_str("300,null\n");
    for t in (1500..=1580).step_by(20) {
        content.push_str(&format!("{},-90\n", t));
    }

    let mut source = TraceFileSource::from_str(&content).unwrap();
    let mut readings = Vec::new();
    while let Some(reading) = source.next_reading().unwrap() {
        readings.push(reading);
    }
    assert_eq!(readings.len(), 19);

    let mut h = Harness::new();
    h.engine.calibrate();
    let outcomes = h.replay(&readings);

    assert!(outcomes[0].calibration);
    assert_eq!(h.actions(), &[TiltAction::Correct, TiltAction::Skip]);
    assert_eq!(h.engine.position(), Position::Down);
}
