//! Sensor subsystem — the three adapters and the plumbing they share.
//!
//! Every adapter follows the same shape:
//!
//! ```text
//!   EventSource<E> ──listener──▶ core.handle(&E) ──▶ SubscriberList<S>
//!                                      │
//!                                      └── RefCell<S>  (last snapshot)
//! ```
//!
//! Construction is pure; [`Binding::attach`] registers the platform
//! listener and `destroy()` removes it for good.

pub mod gesture;
pub mod motion;
pub mod orientation;
pub mod probe;
pub mod touch;

use core::cell::{Cell, RefCell};
use core::fmt;
use core::time::Duration;
use std::rc::{Rc, Weak};

use log::{info, warn};

use self::probe::{ProbeCancel, SelfTest};
use crate::app::ports::{EventSource, Listener, ListenerId, TimerPort};
use crate::error::{LifecycleError, Result};

/// Round to two decimal places, half away from zero.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Subscribers
// ---------------------------------------------------------------------------

type Callback<T> = Rc<dyn Fn(T)>;

struct Registry<T> {
    next_id: u64,
    entries: Vec<(u64, Callback<T>)>,
}

trait Detach {
    fn detach(&self, id: u64);
}

impl<T> Detach for RefCell<Registry<T>> {
    fn detach(&self, id: u64) {
        self.borrow_mut().entries.retain(|(entry, _)| *entry != id);
    }
}

/// Ordered list of snapshot callbacks.
///
/// Fan-out runs over a copy of the list taken when it starts, so callbacks
/// may subscribe or unsubscribe (themselves or others) mid-delivery.
pub struct SubscriberList<T> {
    registry: Rc<RefCell<Registry<T>>>,
}

impl<T: Clone + 'static> SubscriberList<T> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    pub fn subscribe(&self, callback: impl Fn(T) + 'static) -> Subscription {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.entries.push((id, Rc::new(callback)));
            id
        };
        let registry: Weak<dyn Detach> = Rc::downgrade(&self.registry) as Weak<dyn Detach>;
        Subscription { registry, id }
    }

    /// Hand every current subscriber its own copy of `value`.
    pub fn notify(&self, value: &T) {
        let stable: Vec<Callback<T>> = self
            .registry
            .borrow()
            .entries
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        for callback in stable {
            callback(value.clone());
        }
    }

    pub fn clear(&self) {
        self.registry.borrow_mut().entries.clear();
    }

    pub fn len(&self) -> usize {
        self.registry.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + 'static> Default for SubscriberList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle returned by `subscribe`.  Dropping it does **not** unsubscribe.
#[derive(Clone)]
pub struct Subscription {
    registry: Weak<dyn Detach>,
    id: u64,
}

impl Subscription {
    /// A subscription that is not attached to anything.
    pub fn inert() -> Self {
        let registry: Weak<RefCell<Registry<()>>> = Weak::new();
        Self {
            registry: registry as Weak<dyn Detach>,
            id: 0,
        }
    }

    /// Remove exactly this callback.  Safe to call repeatedly, from inside
    /// the callback itself, or after the adapter is gone.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.detach(self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("live", &(self.registry.strong_count() > 0))
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Platform binding
// ---------------------------------------------------------------------------

/// Where an adapter is in its one-way lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Detached,
    Attached,
    Destroyed,
}

/// Owns the adapter's registration with its event source, including the
/// listeners of self-tests still in flight.
pub(crate) struct Binding<E> {
    name: &'static str,
    source: Rc<dyn EventSource<E>>,
    listener: Cell<Option<ListenerId>>,
    lifecycle: Cell<Lifecycle>,
    pending: RefCell<Vec<ProbeCancel>>,
}

impl<E: 'static> Binding<E> {
    pub(crate) fn new(name: &'static str, source: Rc<dyn EventSource<E>>) -> Self {
        Self {
            name,
            source,
            listener: Cell::new(None),
            lifecycle: Cell::new(Lifecycle::Detached),
            pending: RefCell::new(Vec::new()),
        }
    }

    /// Register the listener built by `make`.  Idempotent while attached.
    pub(crate) fn attach(&self, make: impl FnOnce() -> Listener<E>) -> Result<()> {
        match self.lifecycle.get() {
            Lifecycle::Attached => Ok(()),
            Lifecycle::Destroyed => {
                warn!("{}: attach after destroy ignored", self.name);
                Err(LifecycleError::Destroyed.into())
            }
            Lifecycle::Detached => {
                let id = self.source.add_listener(make());
                self.listener.set(Some(id));
                self.lifecycle.set(Lifecycle::Attached);
                info!("{}: attached", self.name);
                Ok(())
            }
        }
    }

    /// Pending self-tests settle `false` and release their listeners.
    pub(crate) fn destroy(&self) {
        if let Some(id) = self.listener.take() {
            self.source.remove_listener(id);
        }
        let pending = self.pending.take();
        for probe in &pending {
            probe.cancel();
        }
        if self.lifecycle.replace(Lifecycle::Destroyed) != Lifecycle::Destroyed {
            info!("{}: destroyed", self.name);
        }
    }

    pub(crate) fn lifecycle(&self) -> Lifecycle {
        self.lifecycle.get()
    }

    /// Arm a self-test on this source, or resolve `false` at once when the
    /// sensor is unsupported or the adapter is destroyed.
    pub(crate) fn self_test(
        &self,
        supported: bool,
        timer: &dyn TimerPort,
        timeout: Duration,
        qualifies: fn(&E) -> bool,
    ) -> SelfTest {
        if !supported || self.lifecycle.get() == Lifecycle::Destroyed {
            return SelfTest::resolved(self.name, false);
        }
        let test = SelfTest::arm(self.name, &self.source, timer, timeout, qualifies);
        let mut pending = self.pending.borrow_mut();
        pending.retain(ProbeCancel::is_pending);
        pending.push(test.canceller());
        test
    }
}
