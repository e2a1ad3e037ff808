//! Multi-touch adapter.
//!
//! Every start / move / end / cancel event rebuilds the snapshot from the
//! active contact set:
//!
//! - force defaults to 0.5 when unreported (absent or 0), radii to 0
//! - area per contact = π · rx · ry
//! - average force is rounded to two decimals; max force and total area
//!   are not
//!
//! The gesture label is the only field carried across events; see
//! [`GestureTracker`].

use core::cell::RefCell;
use core::f64::consts::PI;
use core::time::Duration;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::gesture::{GestureTracker, GestureType};
use super::probe::SelfTest;
use super::{Binding, Lifecycle, SubscriberList, Subscription, round2};
use crate::app::ports::{ClockPort, EventSource, Platform};
use crate::config::SensorConfig;
use crate::error::Result;
use crate::events::{RawTouch, TouchEvent, TouchPhase, timestamp_or};

/// One active contact, normalized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TouchPoint {
    pub identifier: i64,
    /// Client X.
    pub x: f64,
    /// Client Y.
    pub y: f64,
    pub force: f64,
    pub radius_x: f64,
    pub radius_y: f64,
    pub page_x: f64,
    pub page_y: f64,
}

impl TouchPoint {
    pub fn area(&self) -> f64 {
        PI * self.radius_x * self.radius_y
    }
}

/// Last computed touch state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TouchSnapshot {
    pub touch_count: usize,
    pub touches: Vec<TouchPoint>,
    pub average_force: f64,
    pub max_force: f64,
    pub total_area: f64,
    pub multi_touch_detected: bool,
    pub gesture_type: GestureType,
    pub timestamp: f64,
    pub is_valid: bool,
}

/// What the host reports about touch hardware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TouchSupportInfo {
    pub touch_supported: bool,
    pub max_touch_points: u32,
    pub force_supported: bool,
    pub radius_supported: bool,
}

/// Absent, zero and NaN all read as unreported.
fn reported(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}

fn normalize(raw: &RawTouch, default_force: f64) -> TouchPoint {
    TouchPoint {
        identifier: raw.identifier,
        x: raw.client_x,
        y: raw.client_y,
        force: reported(raw.force).unwrap_or(default_force),
        radius_x: reported(raw.radius_x).unwrap_or(0.0),
        radius_y: reported(raw.radius_y).unwrap_or(0.0),
        page_x: raw.page_x,
        page_y: raw.page_y,
    }
}

/// Aggregate the active contacts.  `gesture_type` is supplied by the caller.
pub fn compute_snapshot(
    event: &TouchEvent,
    default_force: f64,
    gesture_type: GestureType,
    now_ms: impl FnOnce() -> f64,
) -> TouchSnapshot {
    let touches: Vec<TouchPoint> = event
        .touches
        .iter()
        .map(|raw| normalize(raw, default_force))
        .collect();

    let count = touches.len();
    let (average_force, max_force) = if count == 0 {
        (0.0, 0.0)
    } else {
        let sum: f64 = touches.iter().map(|t| t.force).sum();
        let max = touches.iter().map(|t| t.force).fold(f64::NEG_INFINITY, f64::max);
        (round2(sum / count as f64), max)
    };

    TouchSnapshot {
        touch_count: count,
        total_area: touches.iter().map(TouchPoint::area).sum(),
        touches,
        average_force,
        max_force,
        multi_touch_detected: count > 1,
        gesture_type,
        timestamp: timestamp_or(event.timestamp, now_ms),
        is_valid: true,
    }
}

fn qualifies(event: &TouchEvent) -> bool {
    event.phase == TouchPhase::Start
}

struct TouchCore {
    snapshot: RefCell<TouchSnapshot>,
    tracker: RefCell<GestureTracker>,
    default_force: f64,
    subscribers: SubscriberList<TouchSnapshot>,
    clock: Rc<dyn ClockPort>,
}

impl TouchCore {
    fn handle(&self, event: &TouchEvent) {
        let previous = self.snapshot.borrow().gesture_type;
        let gesture = self
            .tracker
            .borrow_mut()
            .observe(event.phase, &event.touches, previous);
        let snapshot =
            compute_snapshot(event, self.default_force, gesture, || self.clock.now_ms());
        *self.snapshot.borrow_mut() = snapshot.clone();
        self.subscribers.notify(&snapshot);
    }
}

/// Touch adapter.
pub struct TouchAdapter {
    core: Rc<TouchCore>,
    binding: Binding<TouchEvent>,
    platform: Platform,
    test_timeout: Duration,
}

impl TouchAdapter {
    pub const NAME: &'static str = "touch";

    pub fn new(
        source: Rc<dyn EventSource<TouchEvent>>,
        platform: Platform,
        config: &SensorConfig,
    ) -> Self {
        let core = Rc::new(TouchCore {
            snapshot: RefCell::new(TouchSnapshot::default()),
            tracker: RefCell::new(GestureTracker::new(config.gesture_distance_threshold)),
            default_force: config.default_touch_force,
            subscribers: SubscriberList::new(),
            clock: Rc::clone(&platform.clock),
        });
        Self {
            core,
            binding: Binding::new(Self::NAME, source),
            platform,
            test_timeout: Duration::from_millis(config.touch_test_timeout_ms),
        }
    }

    pub fn attach(&self) -> Result<()> {
        self.binding.attach(|| {
            let core = Rc::downgrade(&self.core);
            Rc::new(move |event: &TouchEvent| {
                if let Some(core) = core.upgrade() {
                    core.handle(event);
                }
            })
        })
    }

    pub fn destroy(&self) {
        self.binding.destroy();
        self.core.subscribers.clear();
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.binding.lifecycle()
    }

    /// Touch events exist, or the platform reports at least one contact point.
    pub fn is_supported(&self) -> bool {
        let caps = self.platform.capabilities.touch_capabilities();
        caps.touch_events || caps.max_touch_points > 0
    }

    /// Synchronous capability report; force/radius need touch events.
    pub fn support_info(&self) -> TouchSupportInfo {
        let caps = self.platform.capabilities.touch_capabilities();
        TouchSupportInfo {
            touch_supported: caps.touch_events || caps.max_touch_points > 0,
            max_touch_points: caps.max_touch_points,
            force_supported: caps.touch_events && caps.force,
            radius_supported: caps.touch_events && caps.radius,
        }
    }

    pub fn snapshot(&self) -> TouchSnapshot {
        self.core.snapshot.borrow().clone()
    }

    pub fn subscribe(&self, callback: impl Fn(TouchSnapshot) + 'static) -> Subscription {
        if self.lifecycle() == Lifecycle::Destroyed {
            return Subscription::inert();
        }
        self.core.subscribers.subscribe(callback)
    }

    pub fn subscriber_count(&self) -> usize {
        self.core.subscribers.len()
    }

    /// Wait for any touch-start.
    pub fn test(&self) -> SelfTest {
        self.binding.self_test(
            self.is_supported(),
            self.platform.timer.as_ref(),
            self.test_timeout,
            qualifies,
        )
    }
}
