//! Two-finger pinch/spread classifier.
//!
//! ## State machine
//!
//! | Event                          | Effect                                          |
//! |--------------------------------|-------------------------------------------------|
//! | start, 2 contacts              | baseline = distance(p0, p1)                     |
//! | start, other count             | baseline cleared                                |
//! | move, 2 contacts, baseline set | \|d - baseline\| > threshold → spread / pinch   |
//! | move, other count              | baseline cleared                                |
//! | any event, 1 contact           | gesture = single                                |
//! | end/cancel                     | baseline cleared; 0 left → none, else single    |
//!
//! Two contacts with no baseline evidence keep whatever gesture came
//! before.  The baseline is not moved by a classification: every move is
//! measured against the distance captured at touch-start.

use core::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::events::{RawTouch, TouchPhase};

/// Coarse gesture label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureType {
    #[default]
    None,
    Single,
    Pinch,
    Spread,
}

impl fmt::Display for GestureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Single => f.write_str("single"),
            Self::Pinch => f.write_str("pinch"),
            Self::Spread => f.write_str("spread"),
        }
    }
}

/// Euclidean distance between two contacts in client coordinates.
pub fn distance(a: &RawTouch, b: &RawTouch) -> f64 {
    (a.client_x - b.client_x).hypot(a.client_y - b.client_y)
}

/// Holds the pinch baseline between events.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    threshold: f64,
    baseline: Option<f64>,
}

impl GestureTracker {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            baseline: None,
        }
    }

    pub fn baseline(&self) -> Option<f64> {
        self.baseline
    }

    /// Classify one event given the gesture carried over from the last snapshot.
    pub fn observe(
        &mut self,
        phase: TouchPhase,
        touches: &[RawTouch],
        previous: GestureType,
    ) -> GestureType {
        let count = touches.len();

        let next = match phase {
            TouchPhase::Start => {
                self.baseline = match touches {
                    [a, b] => Some(distance(a, b)),
                    _ => None,
                };
                previous
            }
            TouchPhase::Move => match (touches, self.baseline) {
                ([a, b], Some(baseline)) => {
                    let delta = distance(a, b) - baseline;
                    if delta.abs() > self.threshold {
                        if delta > 0.0 { GestureType::Spread } else { GestureType::Pinch }
                    } else {
                        previous
                    }
                }
                ([_, _], None) => previous,
                _ => {
                    self.baseline = None;
                    previous
                }
            },
            TouchPhase::End | TouchPhase::Cancel => {
                self.baseline = None;
                if count == 0 { GestureType::None } else { GestureType::Single }
            }
        };

        let next = if count == 1 { GestureType::Single } else { next };
        if next != previous {
            debug!("gesture: {} -> {}", previous, next);
        }
        next
    }
}
