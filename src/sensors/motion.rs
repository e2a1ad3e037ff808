//! Device-motion adapter (accelerometer + gyroscope).
//!
//! Every raw event replaces the snapshot wholesale: missing vectors or
//! axes become 0, every component is rounded to two decimals, and
//! `motion_detected` is derived from the **unrounded** acceleration:
//!
//! ```text
//! motion_detected = |ax + ay + az| > threshold      (default 1.0)
//! ```

use core::cell::{Cell, RefCell};
use core::time::Duration;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::probe::SelfTest;
use super::{Binding, Lifecycle, SubscriberList, Subscription, round2};
use crate::app::ports::{ClockPort, EventSource, Platform};
use crate::config::SensorConfig;
use crate::error::Result;
use crate::events::{MotionEvent, RawRotation, RawVector, timestamp_or};

/// Three-axis value in m/s².
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Rotation rate in degrees per second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RotationRate {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

/// Last computed motion reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotionSnapshot {
    pub acceleration: Vector3,
    pub acceleration_including_gravity: Vector3,
    pub rotation_rate: RotationRate,
    /// Sampling interval (milliseconds).
    pub interval: f64,
    pub motion_detected: bool,
    pub timestamp: f64,
    pub is_valid: bool,
}

/// Absent and NaN both read as 0.
fn axis(value: Option<f64>) -> f64 {
    value.filter(|v| !v.is_nan()).unwrap_or(0.0)
}

fn rounded_vector(raw: Option<RawVector>) -> Vector3 {
    let raw = raw.unwrap_or_default();
    Vector3 {
        x: round2(axis(raw.x)),
        y: round2(axis(raw.y)),
        z: round2(axis(raw.z)),
    }
}

fn rounded_rotation(raw: Option<RawRotation>) -> RotationRate {
    let raw = raw.unwrap_or_default();
    RotationRate {
        alpha: round2(axis(raw.alpha)),
        beta: round2(axis(raw.beta)),
        gamma: round2(axis(raw.gamma)),
    }
}

/// Pure snapshot computation for one event.
pub fn compute_snapshot(
    event: &MotionEvent,
    threshold: f64,
    now_ms: impl FnOnce() -> f64,
) -> MotionSnapshot {
    let raw = event.acceleration.unwrap_or_default();
    let total = (axis(raw.x) + axis(raw.y) + axis(raw.z)).abs();

    MotionSnapshot {
        acceleration: rounded_vector(event.acceleration),
        acceleration_including_gravity: rounded_vector(event.acceleration_including_gravity),
        rotation_rate: rounded_rotation(event.rotation_rate),
        interval: axis(event.interval),
        motion_detected: total > threshold,
        timestamp: timestamp_or(event.timestamp, now_ms),
        is_valid: true,
    }
}

/// A self-test accepts any event carrying acceleration or rotation data.
fn qualifies(event: &MotionEvent) -> bool {
    event.acceleration.is_some() || event.rotation_rate.is_some()
}

struct MotionCore {
    snapshot: RefCell<MotionSnapshot>,
    threshold: Cell<f64>,
    subscribers: SubscriberList<MotionSnapshot>,
    clock: Rc<dyn ClockPort>,
}

impl MotionCore {
    fn handle(&self, event: &MotionEvent) {
        let snapshot = compute_snapshot(event, self.threshold.get(), || self.clock.now_ms());
        *self.snapshot.borrow_mut() = snapshot;
        self.subscribers.notify(&snapshot);
    }
}

/// Motion adapter.
pub struct MotionAdapter {
    core: Rc<MotionCore>,
    binding: Binding<MotionEvent>,
    platform: Platform,
    test_timeout: Duration,
}

impl MotionAdapter {
    pub const NAME: &'static str = "motion";

    /// Construct without touching the event source; call [`attach`](Self::attach) next.
    pub fn new(
        source: Rc<dyn EventSource<MotionEvent>>,
        platform: Platform,
        config: &SensorConfig,
    ) -> Self {
        let core = Rc::new(MotionCore {
            snapshot: RefCell::new(MotionSnapshot::default()),
            threshold: Cell::new(config.motion_threshold),
            subscribers: SubscriberList::new(),
            clock: Rc::clone(&platform.clock),
        });
        Self {
            core,
            binding: Binding::new(Self::NAME, source),
            platform,
            test_timeout: Duration::from_millis(config.motion_test_timeout_ms),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn attach(&self) -> Result<()> {
        self.binding.attach(|| {
            let core = Rc::downgrade(&self.core);
            Rc::new(move |event: &MotionEvent| {
                if let Some(core) = core.upgrade() {
                    core.handle(event);
                }
            })
        })
    }

    /// Detach from the platform and drop every subscriber.  Terminal.
    pub fn destroy(&self) {
        self.binding.destroy();
        self.core.subscribers.clear();
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.binding.lifecycle()
    }

    // ── Contract ──────────────────────────────────────────────

    pub fn is_supported(&self) -> bool {
        self.platform.capabilities.motion_supported()
    }

    pub fn snapshot(&self) -> MotionSnapshot {
        *self.core.snapshot.borrow()
    }

    pub fn subscribe(&self, callback: impl Fn(MotionSnapshot) + 'static) -> Subscription {
        if self.lifecycle() == Lifecycle::Destroyed {
            return Subscription::inert();
        }
        self.core.subscribers.subscribe(callback)
    }

    pub fn subscriber_count(&self) -> usize {
        self.core.subscribers.len()
    }

    /// Applies from the next incoming event.
    pub fn set_motion_threshold(&self, threshold: f64) {
        self.core.threshold.set(threshold);
    }

    pub fn motion_threshold(&self) -> f64 {
        self.core.threshold.get()
    }

    /// Wait for a motion event carrying acceleration or rotation data.
    pub fn test(&self) -> SelfTest {
        self.binding.self_test(
            self.is_supported(),
            self.platform.timer.as_ref(),
            self.test_timeout,
            qualifies,
        )
    }
}
