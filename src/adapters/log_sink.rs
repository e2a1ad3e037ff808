//! Log-based reading sink adapter.
//!
//! Implements [`ReadingSink`] by writing every snapshot to the `log`
//! facade.  A recorder or renderer implements the same trait.

use log::info;

use crate::app::events::Reading;
use crate::app::ports::ReadingSink;

/// Adapter that logs every [`Reading`].
#[derive(Debug, Default)]
pub struct LogReadingSink;

impl LogReadingSink {
    pub fn new() -> Self {
        Self
    }
}

impl ReadingSink for LogReadingSink {
    fn emit(&mut self, reading: &Reading) {
        match reading {
            Reading::Motion(m) => {
                info!(
                    "MOTION | acc=({:.2},{:.2},{:.2}) | g=({:.2},{:.2},{:.2}) | \
                     rot=({:.2},{:.2},{:.2}) | dt={}ms | moving={}",
                    m.acceleration.x,
                    m.acceleration.y,
                    m.acceleration.z,
                    m.acceleration_including_gravity.x,
                    m.acceleration_including_gravity.y,
                    m.acceleration_including_gravity.z,
                    m.rotation_rate.alpha,
                    m.rotation_rate.beta,
                    m.rotation_rate.gamma,
                    m.interval,
                    if m.motion_detected { "YES" } else { "no" },
                );
            }
            Reading::Orientation(o) => {
                info!(
                    "ORIENT | \u{03b1}={:.2} \u{03b2}={:.2} \u{03b3}={:.2}",
                    o.alpha, o.beta, o.gamma
                );
            }
            Reading::Touch(t) => {
                info!(
                    "TOUCH  | n={} | force avg={:.2} max={:.2} | area={:.1} | gesture={}",
                    t.touch_count,
                    t.average_force,
                    t.max_force,
                    t.total_area,
                    t.gesture_type,
                );
            }
        }
    }
}
