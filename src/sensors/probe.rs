//! Self-test probes.
//!
//! A probe races a one-shot event listener against a deadline timer:
//!
//! ```text
//!            ┌── qualifying event ──▶ settle(true)  ─┐
//!   arm() ───┤                                       ├──▶ listener removed,
//!            └── timer expires ─────▶ settle(false) ─┘    loser dropped
//! ```
//!
//! Whichever side fires first settles the probe; later attempts observe the
//! stored outcome.  The listener is also removed on explicit cancellation
//! and when the [`SelfTest`] future is dropped unresolved.

use core::cell::{Cell, RefCell};
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use core::time::Duration;
use std::rc::{Rc, Weak};

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::signal::Signal;
use futures_lite::FutureExt;
use futures_lite::future::{self, BoxedLocal};
use log::info;

use crate::app::ports::{EventSource, TimerPort};

struct Probe {
    name: &'static str,
    outcome: Cell<Option<bool>>,
    signal: Signal<NoopRawMutex, bool>,
    detach: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl Probe {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            outcome: Cell::new(None),
            signal: Signal::new(),
            detach: RefCell::new(None),
        }
    }

    /// First caller wins; returns the settled outcome.
    fn settle(&self, passed: bool) -> bool {
        if let Some(outcome) = self.outcome.get() {
            return outcome;
        }
        self.outcome.set(Some(passed));
        self.release();
        info!(
            "{} self-test: {}",
            self.name,
            if passed { "pass" } else { "no signal" }
        );
        self.signal.signal(passed);
        passed
    }

    fn release(&self) {
        let detach = self.detach.borrow_mut().take();
        if let Some(detach) = detach {
            detach();
        }
    }
}

/// Future resolving to `true` when the sensor proved live before the
/// deadline, `false` otherwise.  Never errors.
pub struct SelfTest {
    probe: Rc<Probe>,
    race: BoxedLocal<bool>,
}

impl SelfTest {
    /// Install a listener on `source` and start the deadline.
    pub(crate) fn arm<E: 'static>(
        name: &'static str,
        source: &Rc<dyn EventSource<E>>,
        timer: &dyn TimerPort,
        timeout: Duration,
        qualifies: fn(&E) -> bool,
    ) -> Self {
        let probe = Rc::new(Probe::new(name));

        let weak = Rc::downgrade(&probe);
        let id = source.add_listener(Rc::new(move |event: &E| {
            if qualifies(event) {
                if let Some(probe) = weak.upgrade() {
                    probe.settle(true);
                }
            }
        }));
        let source = Rc::clone(source);
        *probe.detach.borrow_mut() = Some(Box::new(move || {
            source.remove_listener(id);
        }));

        let deadline = timer.sleep(timeout);
        let on_event = Rc::clone(&probe);
        let on_timeout = Rc::clone(&probe);
        let race = future::or(async move { on_event.signal.wait().await }, async move {
            deadline.await;
            on_timeout.settle(false)
        })
        .boxed_local();

        Self { probe, race }
    }

    /// A probe that is already decided (unsupported sensor, destroyed adapter).
    pub(crate) fn resolved(name: &'static str, passed: bool) -> Self {
        let probe = Rc::new(Probe::new(name));
        probe.settle(passed);
        Self {
            probe,
            race: future::ready(passed).boxed_local(),
        }
    }

    /// Resolve `false` now and remove the listener.
    pub fn cancel(&self) {
        self.probe.settle(false);
    }

    /// Handle for cancelling from outside the task awaiting this future.
    pub fn canceller(&self) -> ProbeCancel {
        ProbeCancel {
            probe: Rc::downgrade(&self.probe),
        }
    }

    /// Outcome, once decided.
    pub fn outcome(&self) -> Option<bool> {
        self.probe.outcome.get()
    }
}

impl Future for SelfTest {
    type Output = bool;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<bool> {
        self.race.as_mut().poll(cx)
    }
}

impl Drop for SelfTest {
    fn drop(&mut self) {
        self.probe.release();
    }
}

/// Detached cancellation handle for a [`SelfTest`].
#[derive(Clone)]
pub struct ProbeCancel {
    probe: Weak<Probe>,
}

impl ProbeCancel {
    /// No-op once the probe has settled or its future was dropped.
    pub fn cancel(&self) {
        if let Some(probe) = self.probe.upgrade() {
            probe.settle(false);
        }
    }

    /// The future is alive and undecided.
    pub fn is_pending(&self) -> bool {
        self.probe
            .upgrade()
            .is_some_and(|probe| probe.outcome.get().is_none())
    }
}
