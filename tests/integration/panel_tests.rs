//! Integration tests: diagnostic panel cards and verdicts.

use std::rc::Rc;

use futures_lite::future::{block_on, poll_once};
use sensorkit::adapters::capabilities::StaticCapabilities;
use sensorkit::app::events::SensorKind;
use sensorkit::app::panel::{CardState, DiagnosticPanel, Verdict};
use sensorkit::events::{OrientationEvent, TouchPhase};

use super::mock_platform::{harness, harness_with, motion, one_finger};

#[test]
fn cards_start_idle_with_capabilities() {
    let h = harness();
    let panel = DiagnosticPanel::new(Rc::clone(&h.ctx));
    for kind in SensorKind::ALL {
        assert_eq!(
            panel.card(kind),
            CardState {
                supported: true,
                testing: false,
                verdict: None,
            }
        );
    }
}

#[test]
fn passing_test_records_pass() {
    let h = harness();
    let panel = DiagnosticPanel::new(Rc::clone(&h.ctx));

    let mut run = Box::pin(panel.run_test(SensorKind::Orientation));
    assert_eq!(block_on(poll_once(&mut run)), None);
    assert!(panel.card(SensorKind::Orientation).testing);

    h.events.orientation.dispatch(&OrientationEvent::new(0.0, 1.0, 2.0));
    assert_eq!(block_on(run), Some(Verdict::Pass));

    let card = panel.card(SensorKind::Orientation);
    assert!(!card.testing);
    assert_eq!(card.verdict, Some(Verdict::Pass));
}

#[test]
fn timeout_records_no_signal() {
    let h = harness();
    let panel = DiagnosticPanel::new(Rc::clone(&h.ctx));

    let mut run = Box::pin(panel.run_test(SensorKind::Touch));
    assert_eq!(block_on(poll_once(&mut run)), None);
    h.timer.expire();
    assert_eq!(block_on(run), Some(Verdict::NoSignal));
    assert_eq!(panel.card(SensorKind::Touch).verdict, Some(Verdict::NoSignal));
    assert_eq!(Verdict::NoSignal.to_string(), "No signal");
}

#[test]
fn second_run_while_testing_is_refused() {
    let h = harness();
    let panel = DiagnosticPanel::new(Rc::clone(&h.ctx));

    let mut first = Box::pin(panel.run_test(SensorKind::Motion));
    assert_eq!(block_on(poll_once(&mut first)), None);
    let listeners = h.events.listener_count();

    assert_eq!(block_on(panel.run_test(SensorKind::Motion)), None);
    assert_eq!(h.events.listener_count(), listeners);

    h.events.motion.dispatch(&motion(0.1, 0.1, 0.1));
    assert_eq!(block_on(first), Some(Verdict::Pass));
}

#[test]
fn unsupported_sensor_is_never_tested() {
    let h = harness_with(StaticCapabilities::none());
    let panel = DiagnosticPanel::new(Rc::clone(&h.ctx));
    for kind in SensorKind::ALL {
        assert!(!panel.card(kind).supported);
        assert_eq!(block_on(panel.run_test(kind)), None);
        assert_eq!(panel.card(kind).verdict, None);
    }
    assert!(h.timer.requested().is_empty());
}

#[test]
fn run_all_tests_concurrently() {
    let h = harness();
    let panel = DiagnosticPanel::new(Rc::clone(&h.ctx));
    let baseline = h.events.listener_count();

    let mut all = Box::pin(panel.run_all());
    assert_eq!(block_on(poll_once(&mut all)), None);
    assert_eq!(h.events.listener_count(), baseline + 3);

    h.events.motion.dispatch(&motion(0.0, 0.0, 0.0));
    h.events.touch.dispatch(&one_finger(TouchPhase::Start));
    h.timer.expire();

    assert_eq!(
        block_on(all),
        [Some(Verdict::Pass), Some(Verdict::NoSignal), Some(Verdict::Pass)]
    );
    assert_eq!(h.events.listener_count(), baseline);
}

#[test]
fn abandoned_run_frees_the_card() {
    let h = harness();
    let panel = DiagnosticPanel::new(Rc::clone(&h.ctx));
    let baseline = h.events.listener_count();

    let mut run = Box::pin(panel.run_test(SensorKind::Touch));
    assert_eq!(block_on(poll_once(&mut run)), None);
    assert!(panel.card(SensorKind::Touch).testing);
    drop(run);

    assert_eq!(
        panel.card(SensorKind::Touch),
        CardState {
            supported: true,
            testing: false,
            verdict: None,
        }
    );
    assert_eq!(h.events.listener_count(), baseline);

    let mut again = Box::pin(panel.run_test(SensorKind::Touch));
    assert_eq!(block_on(poll_once(&mut again)), None);
    h.events.touch.dispatch(&one_finger(TouchPhase::Start));
    assert_eq!(block_on(again), Some(Verdict::Pass));
}
