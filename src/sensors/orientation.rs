//! Device-orientation adapter.
//!
//! A strict three-field gate: an event updates the snapshot only when
//! alpha, beta and gamma are all present.  Anything less is dropped
//! without touching the snapshot or notifying anyone.

use core::cell::RefCell;
use core::time::Duration;
use std::rc::Rc;

use log::debug;
use serde::{Deserialize, Serialize};

use super::probe::SelfTest;
use super::{Binding, Lifecycle, SubscriberList, Subscription, round2};
use crate::app::ports::{ClockPort, EventSource, Platform};
use crate::config::SensorConfig;
use crate::error::Result;
use crate::events::{OrientationEvent, timestamp_or};

/// Last accepted orientation, in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrientationSnapshot {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub is_valid: bool,
    pub timestamp: f64,
}

/// `None` when any angle is missing.
pub fn compute_snapshot(
    event: &OrientationEvent,
    now_ms: impl FnOnce() -> f64,
) -> Option<OrientationSnapshot> {
    let (Some(alpha), Some(beta), Some(gamma)) = (event.alpha, event.beta, event.gamma) else {
        return None;
    };
    Some(OrientationSnapshot {
        alpha: round2(alpha),
        beta: round2(beta),
        gamma: round2(gamma),
        is_valid: true,
        timestamp: timestamp_or(event.timestamp, now_ms),
    })
}

fn qualifies(event: &OrientationEvent) -> bool {
    event.alpha.is_some()
}

struct OrientationCore {
    snapshot: RefCell<OrientationSnapshot>,
    subscribers: SubscriberList<OrientationSnapshot>,
    clock: Rc<dyn ClockPort>,
}

impl OrientationCore {
    fn handle(&self, event: &OrientationEvent) {
        let Some(snapshot) = compute_snapshot(event, || self.clock.now_ms()) else {
            debug!("orientation: incomplete event dropped");
            return;
        };
        *self.snapshot.borrow_mut() = snapshot;
        self.subscribers.notify(&snapshot);
    }
}

/// Orientation adapter.
pub struct OrientationAdapter {
    core: Rc<OrientationCore>,
    binding: Binding<OrientationEvent>,
    platform: Platform,
    test_timeout: Duration,
}

impl OrientationAdapter {
    pub const NAME: &'static str = "orientation";

    pub fn new(
        source: Rc<dyn EventSource<OrientationEvent>>,
        platform: Platform,
        config: &SensorConfig,
    ) -> Self {
        let core = Rc::new(OrientationCore {
            snapshot: RefCell::new(OrientationSnapshot::default()),
            subscribers: SubscriberList::new(),
            clock: Rc::clone(&platform.clock),
        });
        Self {
            core,
            binding: Binding::new(Self::NAME, source),
            platform,
            test_timeout: Duration::from_millis(config.orientation_test_timeout_ms),
        }
    }

    pub fn attach(&self) -> Result<()> {
        self.binding.attach(|| {
            let core = Rc::downgrade(&self.core);
            Rc::new(move |event: &OrientationEvent| {
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

    pub fn is_supported(&self) -> bool {
        self.platform.capabilities.orientation_supported()
    }

    pub fn snapshot(&self) -> OrientationSnapshot {
        *self.core.snapshot.borrow()
    }

    pub fn subscribe(&self, callback: impl Fn(OrientationSnapshot) + 'static) -> Subscription {
        if self.lifecycle() == Lifecycle::Destroyed {
            return Subscription::inert();
        }
        self.core.subscribers.subscribe(callback)
    }

    pub fn subscriber_count(&self) -> usize {
        self.core.subscribers.len()
    }

    /// Wait for an orientation event with alpha present.
    pub fn test(&self) -> SelfTest {
        self.binding.self_test(
            self.is_supported(),
            self.platform.timer.as_ref(),
            self.test_timeout,
            qualifies,
        )
    }
}
