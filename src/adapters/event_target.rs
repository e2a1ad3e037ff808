//! In-process event dispatcher.
//!
//! Implements [`EventSource`] for whatever feeds raw platform events into
//! the crate: a browser binding, a replay harness, or a test.  The host
//! side keeps a clone and calls [`EventTarget::dispatch`]; adapters see
//! only the port.
//!
//! Dispatch iterates over a copy of the listener list, so listeners may
//! add or remove listeners (including themselves) while an event is in
//! flight.  Changes take effect from the next event.

use core::cell::RefCell;
use std::rc::Rc;

use crate::app::context::EventSources;
use crate::app::ports::{EventSource, Listener, ListenerId};
use crate::events::{MotionEvent, OrientationEvent, TouchEvent};

struct Listeners<E> {
    next_id: u64,
    entries: Vec<(ListenerId, Listener<E>)>,
}

/// Cloneable handle to one event stream.
pub struct EventTarget<E> {
    inner: Rc<RefCell<Listeners<E>>>,
}

impl<E> Clone for EventTarget<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E> Default for EventTarget<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventTarget<E> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Listeners {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Deliver `event` to every listener registered when the call starts.
    pub fn dispatch(&self, event: &E) {
        let stable: Vec<Listener<E>> = self
            .inner
            .borrow()
            .entries
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in stable {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().entries.len()
    }
}

impl<E> EventSource<E> for EventTarget<E> {
    fn add_listener(&self, listener: Listener<E>) -> ListenerId {
        let mut inner = self.inner.borrow_mut();
        let id = ListenerId(inner.next_id);
        inner.next_id += 1;
        inner.entries.push((id, listener));
        id
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.entries.len();
        inner.entries.retain(|(entry, _)| *entry != id);
        inner.entries.len() != before
    }
}

/// The three host-side streams, kept by whatever feeds platform events in.
#[derive(Clone, Default)]
pub struct HostEvents {
    pub motion: EventTarget<MotionEvent>,
    pub orientation: EventTarget<OrientationEvent>,
    pub touch: EventTarget<TouchEvent>,
}

impl HostEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adapter-side view of the same streams.
    pub fn sources(&self) -> EventSources {
        EventSources {
            motion: Rc::new(self.motion.clone()),
            orientation: Rc::new(self.orientation.clone()),
            touch: Rc::new(self.touch.clone()),
        }
    }

    /// Platform listeners still registered across all three streams.
    pub fn listener_count(&self) -> usize {
        self.motion.listener_count()
            + self.orientation.listener_count()
            + self.touch.listener_count()
    }
}
