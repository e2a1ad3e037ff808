//! Port traits — the hexagonal boundary between the adapters and the host.
//!
//! ```text
//!   Host platform ──▶ Port trait ──▶ Sensor adapter ──▶ ReadingSink
//! ```
//!
//! Driven adapters (event dispatch, capability detection, clocks, timers)
//! implement these traits.  The sensor adapters consume them through
//! `Rc<dyn …>` handles, so the domain core never touches a real event
//! loop and tests can inject fakes.
//!
//! Everything here is single-threaded: no `Send`/`Sync` bounds.

use core::time::Duration;
use std::rc::Rc;

use futures_lite::future::BoxedLocal;

use super::events::Reading;

// ───────────────────────────────────────────────────────────────
// Event source port (driven adapter: host → adapters)
// ───────────────────────────────────────────────────────────────

/// Callback registered with an [`EventSource`].
pub type Listener<E> = Rc<dyn Fn(&E)>;

/// Handle identifying one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// A stream of raw platform events of type `E`.
///
/// Implementations must tolerate `add_listener`/`remove_listener` calls
/// made from inside a listener while an event is being dispatched.
pub trait EventSource<E> {
    /// Register a listener; it receives every subsequent event.
    fn add_listener(&self, listener: Listener<E>) -> ListenerId;

    /// Remove a listener.  Returns `false` if it was not registered.
    fn remove_listener(&self, id: ListenerId) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Capability port
// ───────────────────────────────────────────────────────────────

/// Raw touch capabilities exposed by the platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TouchCapabilities {
    /// The platform delivers touch lifecycle events.
    pub touch_events: bool,
    /// Maximum simultaneous contacts (0 when unknown).
    pub max_touch_points: u32,
    /// Contacts carry a pressure value.
    pub force: bool,
    /// Contacts carry contact-ellipse radii.
    pub radius: bool,
}

/// Synchronous capability checks.  Never fails: absence is `false`.
pub trait CapabilityPort {
    fn motion_supported(&self) -> bool;

    fn orientation_supported(&self) -> bool;

    fn touch_capabilities(&self) -> TouchCapabilities;
}

// ───────────────────────────────────────────────────────────────
// Time ports
// ───────────────────────────────────────────────────────────────

/// Wall-clock source used when an event carries no timestamp.
pub trait ClockPort {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> f64;
}

/// Deadline source for the self-test probes.
///
/// Dropping the returned future cancels the timer.
pub trait TimerPort {
    fn sleep(&self, duration: Duration) -> BoxedLocal<()>;
}

// ───────────────────────────────────────────────────────────────
// Reading sink port (driven adapter: adapters → logging / recording)
// ───────────────────────────────────────────────────────────────

/// Consumers receive snapshots through this port.  Adapters on the other
/// side decide what to do with them — log, record, render.
pub trait ReadingSink {
    fn emit(&mut self, reading: &Reading);
}

// ───────────────────────────────────────────────────────────────
// Bundled platform handles
// ───────────────────────────────────────────────────────────────

/// The non-event half of the host: capabilities, clock and timer.
#[derive(Clone)]
pub struct Platform {
    pub capabilities: Rc<dyn CapabilityPort>,
    pub clock: Rc<dyn ClockPort>,
    pub timer: Rc<dyn TimerPort>,
}

impl Platform {
    pub fn new(
        capabilities: Rc<dyn CapabilityPort>,
        clock: Rc<dyn ClockPort>,
        timer: Rc<dyn TimerPort>,
    ) -> Self {
        Self {
            capabilities,
            clock,
            timer,
        }
    }
}
