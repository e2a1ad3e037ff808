//! Mock platform for integration tests.
//!
//! A manual timer (deadlines fire only when a test says so), a frozen
//! clock, and a harness wiring both into a [`SensorContext`] over
//! in-process event targets.

use core::cell::{Cell, RefCell};
use core::task::{Poll, Waker};
use core::time::Duration;
use std::rc::Rc;

use futures_lite::FutureExt;
use futures_lite::future::{self, BoxedLocal};
use sensorkit::adapters::capabilities::StaticCapabilities;
use sensorkit::adapters::event_target::HostEvents;
use sensorkit::app::context::SensorContext;
use sensorkit::app::ports::{ClockPort, Platform, TimerPort};
use sensorkit::config::SensorConfig;
use sensorkit::events::{MotionEvent, RawRotation, RawTouch, RawVector, TouchEvent, TouchPhase};

// ── ManualTimer ───────────────────────────────────────────────

#[derive(Default)]
struct TimerState {
    expired: Cell<bool>,
    requested: RefCell<Vec<Duration>>,
    wakers: RefCell<Vec<Waker>>,
}

/// Every sleep stays pending until [`ManualTimer::expire`].
#[derive(Clone, Default)]
pub struct ManualTimer {
    state: Rc<TimerState>,
}

#[allow(dead_code)]
impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire every pending and future deadline.
    pub fn expire(&self) {
        self.state.expired.set(true);
        for waker in self.state.wakers.borrow_mut().drain(..) {
            waker.wake();
        }
    }

    pub fn requested(&self) -> Vec<Duration> {
        self.state.requested.borrow().clone()
    }
}

impl TimerPort for ManualTimer {
    fn sleep(&self, duration: Duration) -> BoxedLocal<()> {
        self.state.requested.borrow_mut().push(duration);
        let state = Rc::clone(&self.state);
        future::poll_fn(move |cx| {
            if state.expired.get() {
                Poll::Ready(())
            } else {
                state.wakers.borrow_mut().push(cx.waker().clone());
                Poll::Pending
            }
        })
        .boxed_local()
    }
}

// ── FixedClock ────────────────────────────────────────────────

pub const CLOCK_MS: f64 = 5000.0;

pub struct FixedClock;

impl ClockPort for FixedClock {
    fn now_ms(&self) -> f64 {
        CLOCK_MS
    }
}

// ── Harness ───────────────────────────────────────────────────

pub struct Harness {
    pub events: HostEvents,
    pub timer: ManualTimer,
    pub ctx: Rc<SensorContext>,
}

#[allow(dead_code)]
pub fn harness_with(capabilities: StaticCapabilities) -> Harness {
    let events = HostEvents::new();
    let timer = ManualTimer::new();
    let platform = Platform::new(
        Rc::new(capabilities),
        Rc::new(FixedClock),
        Rc::new(timer.clone()),
    );
    let ctx = SensorContext::new(events.sources(), platform, SensorConfig::default())
        .expect("default config is valid");
    Harness {
        events,
        timer,
        ctx: Rc::new(ctx),
    }
}

/// Fully capable device, adapters attached.
#[allow(dead_code)]
pub fn harness() -> Harness {
    let h = harness_with(StaticCapabilities::full());
    h.ctx.attach().expect("fresh context attaches");
    h
}

// ── Event builders ────────────────────────────────────────────

#[allow(dead_code)]
pub fn motion(x: f64, y: f64, z: f64) -> MotionEvent {
    MotionEvent {
        acceleration: Some(RawVector::new(x, y, z)),
        acceleration_including_gravity: Some(RawVector::new(x, y, z + 9.81)),
        rotation_rate: Some(RawRotation::new(0.0, 0.0, 0.0)),
        interval: Some(16.0),
        timestamp: Some(100.0),
    }
}

/// Two contacts `distance` apart on the x axis.
#[allow(dead_code)]
pub fn two_fingers(phase: TouchPhase, distance: f64) -> TouchEvent {
    TouchEvent::new(
        phase,
        vec![RawTouch::at(0, 100.0, 300.0), RawTouch::at(1, 100.0 + distance, 300.0)],
    )
}

#[allow(dead_code)]
pub fn one_finger(phase: TouchPhase) -> TouchEvent {
    TouchEvent::new(phase, vec![RawTouch::at(0, 50.0, 50.0)])
}

#[allow(dead_code)]
pub fn no_fingers(phase: TouchPhase) -> TouchEvent {
    TouchEvent::new(phase, vec![])
}
