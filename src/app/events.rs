//! Outbound readings.
//!
//! Consumers that want all three sensors through one channel receive
//! [`Reading`]s via the [`ReadingSink`](super::ports::ReadingSink) port.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::sensors::motion::MotionSnapshot;
use crate::sensors::orientation::OrientationSnapshot;
use crate::sensors::touch::TouchSnapshot;

/// A snapshot from any of the three adapters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Reading {
    Motion(MotionSnapshot),
    Orientation(OrientationSnapshot),
    Touch(TouchSnapshot),
}

impl Reading {
    pub fn kind(&self) -> SensorKind {
        match self {
            Self::Motion(_) => SensorKind::Motion,
            Self::Orientation(_) => SensorKind::Orientation,
            Self::Touch(_) => SensorKind::Touch,
        }
    }

    pub fn timestamp(&self) -> f64 {
        match self {
            Self::Motion(m) => m.timestamp,
            Self::Orientation(o) => o.timestamp,
            Self::Touch(t) => t.timestamp,
        }
    }
}

/// The three adapter kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SensorKind {
    Motion,
    Orientation,
    Touch,
}

impl SensorKind {
    pub const ALL: [Self; 3] = [Self::Motion, Self::Orientation, Self::Touch];
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Motion => f.write_str("motion"),
            Self::Orientation => f.write_str("orientation"),
            Self::Touch => f.write_str("touch"),
        }
    }
}
