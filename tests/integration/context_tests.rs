//! Integration tests: context wiring, sinks and recorder.

use core::cell::RefCell;
use std::rc::Rc;

use sensorkit::adapters::capabilities::StaticCapabilities;
use sensorkit::adapters::event_target::HostEvents;
use sensorkit::adapters::log_sink::LogReadingSink;
use sensorkit::app::context::SensorContext;
use sensorkit::app::events::{Reading, SensorKind};
use sensorkit::app::ports::ReadingSink;
use sensorkit::config::SensorConfig;
use sensorkit::diagnostics::{RecordedSession, SessionRecorder};
use sensorkit::events::{OrientationEvent, TouchPhase};
use sensorkit::sensors::Lifecycle;
use sensorkit::{Error, LifecycleError};

use super::mock_platform::{FixedClock, harness, harness_with, motion, no_fingers, two_fingers};

#[derive(Default)]
struct VecSink(Vec<Reading>);

impl ReadingSink for VecSink {
    fn emit(&mut self, reading: &Reading) {
        self.0.push(reading.clone());
    }
}

#[test]
fn pipe_into_forwards_all_three_streams() {
    let h = harness();
    let sink = Rc::new(RefCell::new(VecSink::default()));
    let subs = h.ctx.pipe_into(Rc::clone(&sink));
    assert_eq!(subs.len(), 3);

    h.events.motion.dispatch(&motion(1.0, 0.0, 0.0));
    h.events.orientation.dispatch(&OrientationEvent::new(0.0, 45.0, -10.0));
    h.events.touch.dispatch(&two_fingers(TouchPhase::Start, 30.0));

    let kinds: Vec<SensorKind> = sink.borrow().0.iter().map(Reading::kind).collect();
    assert_eq!(
        kinds,
        vec![SensorKind::Motion, SensorKind::Orientation, SensorKind::Touch]
    );

    subs.unsubscribe_all();
    subs.unsubscribe_all();
    h.events.motion.dispatch(&motion(1.0, 0.0, 0.0));
    assert_eq!(sink.borrow().0.len(), 3);
    assert_eq!(h.ctx.motion.subscriber_count(), 0);
}

#[test]
fn log_sink_accepts_every_kind() {
    let h = harness();
    let subs = h.ctx.pipe_into(Rc::new(RefCell::new(LogReadingSink::new())));
    h.events.motion.dispatch(&motion(0.2, 0.2, 0.2));
    h.events.orientation.dispatch(&OrientationEvent::new(1.0, 2.0, 3.0));
    h.events.touch.dispatch(&no_fingers(TouchPhase::End));
    subs.unsubscribe_all();
}

#[test]
fn recorder_captures_a_session() {
    let h = harness();
    let recorder = Rc::new(RefCell::new(SessionRecorder::new(
        h.ctx.config().recorder_capacity,
        Rc::new(FixedClock),
    )));
    let _subs = h.ctx.pipe_into(Rc::clone(&recorder));

    h.events.motion.dispatch(&motion(1.0, 1.0, 1.0));
    assert_eq!(recorder.borrow().stats().total(), 0, "not started");

    recorder.borrow_mut().start(2, "Rotate the device");
    h.events.motion.dispatch(&motion(1.0, 1.0, 1.0));
    h.events.orientation.dispatch(&OrientationEvent {
        alpha: None,
        ..OrientationEvent::new(0.0, 0.0, 0.0)
    });
    h.events.orientation.dispatch(&OrientationEvent::new(10.0, 20.0, 30.0));
    h.events.touch.dispatch(&two_fingers(TouchPhase::Start, 50.0));
    h.events.touch.dispatch(&no_fingers(TouchPhase::End));
    recorder.borrow_mut().stop();
    h.events.motion.dispatch(&motion(1.0, 1.0, 1.0));

    let stats = recorder.borrow().stats();
    assert_eq!((stats.motion, stats.orientation, stats.touch), (1, 1, 1));

    let json = recorder.borrow().export_json().unwrap();
    let session: RecordedSession = serde_json::from_str(&json).unwrap();
    assert_eq!(session.question_id, 2);
    assert_eq!(session.frames.len(), 3);
    assert!(matches!(&session.frames[2], Reading::Touch(t) if t.touch_count == 2));
}

#[test]
fn attach_is_idempotent_and_destroy_is_final() {
    let h = harness();
    h.ctx.attach().unwrap();
    assert_eq!(h.events.listener_count(), 3);

    h.ctx.destroy();
    h.ctx.destroy();
    assert_eq!(h.events.listener_count(), 0);
    for lifecycle in [
        h.ctx.motion.lifecycle(),
        h.ctx.orientation.lifecycle(),
        h.ctx.touch.lifecycle(),
    ] {
        assert_eq!(lifecycle, Lifecycle::Destroyed);
    }
    assert_eq!(
        h.ctx.attach(),
        Err(Error::Lifecycle(LifecycleError::Destroyed))
    );
}

#[test]
fn invalid_config_is_rejected() {
    let events = HostEvents::new();
    let config = SensorConfig {
        motion_threshold: -1.0,
        ..SensorConfig::default()
    };
    let result = SensorContext::host(&events, StaticCapabilities::full(), config);
    assert!(matches!(result, Err(Error::Config(_))));
    assert_eq!(events.listener_count(), 0);
}

#[test]
fn config_threshold_reaches_the_adapter() {
    let config = SensorConfig::from_json(r#"{ "motion_threshold": 5.0 }"#).unwrap();
    let events = HostEvents::new();
    let ctx = SensorContext::host(&events, StaticCapabilities::full(), config).unwrap();
    ctx.attach().unwrap();
    assert!((ctx.motion.motion_threshold() - 5.0).abs() < f64::EPSILON);

    events.motion.dispatch(&motion(1.0, 1.0, 1.0));
    assert!(!ctx.motion.snapshot().motion_detected);
}

#[test]
fn unsupported_device_reports_every_adapter() {
    let h = harness_with(StaticCapabilities::none());
    assert!(!h.ctx.motion.is_supported());
    assert!(!h.ctx.orientation.is_supported());
    assert!(!h.ctx.touch.is_supported());
}
