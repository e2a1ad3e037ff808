//! Fixed capability table.
//!
//! The host binding fills this in once at startup from whatever feature
//! detection it has; tests build it directly.

use crate::app::ports::{CapabilityPort, TouchCapabilities};

/// Capability answers decided up front.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StaticCapabilities {
    pub motion: bool,
    pub orientation: bool,
    pub touch: TouchCapabilities,
}

impl StaticCapabilities {
    /// A phone-like device: every sensor present, ten contacts, force and radii.
    pub const fn full() -> Self {
        Self {
            motion: true,
            orientation: true,
            touch: TouchCapabilities {
                touch_events: true,
                max_touch_points: 10,
                force: true,
                radius: true,
            },
        }
    }

    /// A desktop without sensors.
    pub const fn none() -> Self {
        Self {
            motion: false,
            orientation: false,
            touch: TouchCapabilities {
                touch_events: false,
                max_touch_points: 0,
                force: false,
                radius: false,
            },
        }
    }
}

impl CapabilityPort for StaticCapabilities {
    fn motion_supported(&self) -> bool {
        self.motion
    }

    fn orientation_supported(&self) -> bool {
        self.orientation
    }

    fn touch_capabilities(&self) -> TouchCapabilities {
        self.touch
    }
}
