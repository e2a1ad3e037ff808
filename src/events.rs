//! Raw platform events consumed by the sensor adapters.
//!
//! These mirror what the host's event dispatch hands over: every field
//! the platform may omit is an `Option`.  Events are produced by:
//! - the device-motion stream (accelerometer + gyroscope)
//! - the device-orientation stream (Euler angles)
//! - the touch lifecycle stream (start / move / end / cancel)
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Host motion  │────▶│              │     │ MotionAdapter│
//! │ Host orient. │────▶│ EventSource  │────▶│ Orientation… │
//! │ Host touch   │────▶│ (listeners)  │     │ TouchAdapter │
//! └──────────────┘     └──────────────┘     └──────────────┘
//! ```

/// A three-axis reading where the platform may leave any axis null.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawVector {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
}

impl RawVector {
    /// Fully populated vector.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
        }
    }
}

/// Rotation rate around the three device axes (degrees per second).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawRotation {
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub gamma: Option<f64>,
}

impl RawRotation {
    pub const fn new(alpha: f64, beta: f64, gamma: f64) -> Self {
        Self {
            alpha: Some(alpha),
            beta: Some(beta),
            gamma: Some(gamma),
        }
    }
}

/// One device-motion event.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionEvent {
    pub acceleration: Option<RawVector>,
    pub acceleration_including_gravity: Option<RawVector>,
    pub rotation_rate: Option<RawRotation>,
    /// Sampling interval reported by the platform (milliseconds).
    pub interval: Option<f64>,
    /// Event timestamp (milliseconds).  `None` or 0 falls back to the clock.
    pub timestamp: Option<f64>,
}

/// One device-orientation event (degrees).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrientationEvent {
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub gamma: Option<f64>,
    pub timestamp: Option<f64>,
}

impl OrientationEvent {
    pub const fn new(alpha: f64, beta: f64, gamma: f64) -> Self {
        Self {
            alpha: Some(alpha),
            beta: Some(beta),
            gamma: Some(gamma),
            timestamp: None,
        }
    }
}

/// Touch lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// One active contact as reported by the platform.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawTouch {
    pub identifier: i64,
    pub client_x: f64,
    pub client_y: f64,
    pub page_x: f64,
    pub page_y: f64,
    pub force: Option<f64>,
    pub radius_x: Option<f64>,
    pub radius_y: Option<f64>,
}

impl RawTouch {
    /// Contact at client position `(x, y)`; page coordinates equal client ones.
    pub const fn at(identifier: i64, x: f64, y: f64) -> Self {
        Self {
            identifier,
            client_x: x,
            client_y: y,
            page_x: x,
            page_y: y,
            force: None,
            radius_x: None,
            radius_y: None,
        }
    }

    pub const fn with_force(mut self, force: f64) -> Self {
        self.force = Some(force);
        self
    }

    pub const fn with_radius(mut self, radius_x: f64, radius_y: f64) -> Self {
        self.radius_x = Some(radius_x);
        self.radius_y = Some(radius_y);
        self
    }
}

/// One touch lifecycle event carrying the set of contacts still active
/// after it, in platform order.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    pub touches: Vec<RawTouch>,
    pub timestamp: Option<f64>,
}

impl TouchEvent {
    pub fn new(phase: TouchPhase, touches: Vec<RawTouch>) -> Self {
        Self {
            phase,
            touches,
            timestamp: None,
        }
    }
}

/// Platform timestamp, or `fallback` when absent/zero.
pub(crate) fn timestamp_or(timestamp: Option<f64>, fallback: impl FnOnce() -> f64) -> f64 {
    match timestamp {
        Some(t) if t != 0.0 => t,
        _ => fallback(),
    }
}
