//! Sensor context — one adapter of each kind, built once and passed to
//! whatever consumes them.
//!
//! ```text
//!  EventSources ──▶ ┌──────────────────────────┐ ──▶ subscribers
//!                   │      SensorContext       │
//!      Platform ──▶ │ Motion · Orient. · Touch │ ──▶ ReadingSink
//!                   └──────────────────────────┘
//! ```
//!
//! Construction registers nothing; [`SensorContext::attach`] arms all
//! three adapters and [`SensorContext::destroy`] tears them down for good.

use core::cell::RefCell;
use std::rc::Rc;

use log::info;

use super::events::Reading;
use super::ports::{EventSource, Platform, ReadingSink};
use crate::adapters::capabilities::StaticCapabilities;
use crate::adapters::event_target::HostEvents;
use crate::adapters::time::{EmbassyTimer, SystemClock};
use crate::config::SensorConfig;
use crate::error::Result;
use crate::events::{MotionEvent, OrientationEvent, TouchEvent};
use crate::sensors::Subscription;
use crate::sensors::motion::MotionAdapter;
use crate::sensors::orientation::OrientationAdapter;
use crate::sensors::touch::TouchAdapter;

/// Adapter-side handles to the three raw event streams.
#[derive(Clone)]
pub struct EventSources {
    pub motion: Rc<dyn EventSource<MotionEvent>>,
    pub orientation: Rc<dyn EventSource<OrientationEvent>>,
    pub touch: Rc<dyn EventSource<TouchEvent>>,
}

/// Owns the three sensor adapters.
pub struct SensorContext {
    pub motion: MotionAdapter,
    pub orientation: OrientationAdapter,
    pub touch: TouchAdapter,
    config: SensorConfig,
    platform: Platform,
}

impl SensorContext {
    /// Validate `config` and build the adapters.  Does **not** attach.
    pub fn new(sources: EventSources, platform: Platform, config: SensorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            motion: MotionAdapter::new(sources.motion, platform.clone(), &config),
            orientation: OrientationAdapter::new(sources.orientation, platform.clone(), &config),
            touch: TouchAdapter::new(sources.touch, platform.clone(), &config),
            config,
            platform,
        })
    }

    /// Context over in-process event targets with the host clock and timer.
    pub fn host(
        events: &HostEvents,
        capabilities: StaticCapabilities,
        config: SensorConfig,
    ) -> Result<Self> {
        let platform = Platform::new(
            Rc::new(capabilities),
            Rc::new(SystemClock),
            Rc::new(EmbassyTimer),
        );
        Self::new(events.sources(), platform, config)
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Register all three platform listeners.
    pub fn attach(&self) -> Result<()> {
        self.motion.attach()?;
        self.orientation.attach()?;
        self.touch.attach()?;
        info!("sensor context attached");
        Ok(())
    }

    /// Terminal teardown of all three adapters.
    pub fn destroy(&self) {
        self.motion.destroy();
        self.orientation.destroy();
        self.touch.destroy();
        info!("sensor context destroyed");
    }

    // ── Consumers ─────────────────────────────────────────────

    /// Forward every snapshot from every adapter into `sink`.
    pub fn pipe_into<S: ReadingSink + 'static>(&self, sink: Rc<RefCell<S>>) -> SubscriptionSet {
        let motion = {
            let sink = Rc::clone(&sink);
            self.motion
                .subscribe(move |m| sink.borrow_mut().emit(&Reading::Motion(m)))
        };
        let orientation = {
            let sink = Rc::clone(&sink);
            self.orientation
                .subscribe(move |o| sink.borrow_mut().emit(&Reading::Orientation(o)))
        };
        let touch = self
            .touch
            .subscribe(move |t| sink.borrow_mut().emit(&Reading::Touch(t)));
        SubscriptionSet(vec![motion, orientation, touch])
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }
}

/// A group of subscriptions released together.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionSet(Vec<Subscription>);

impl SubscriptionSet {
    pub fn unsubscribe_all(&self) {
        for subscription in &self.0 {
            subscription.unsubscribe();
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
