//! Sensor configuration parameters
//!
//! All tunable parameters for the adapters, the self-test probes and the
//! session recorder.  Defaults reproduce the browser panel's behaviour;
//! overrides can be loaded from JSON.

use anyhow::Context;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Core sensor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    // --- Motion ---
    /// |ax + ay + az| above this marks the snapshot as "motion detected"
    pub motion_threshold: f64,
    /// Self-test deadline for the motion adapter (milliseconds)
    pub motion_test_timeout_ms: u64,

    // --- Orientation ---
    /// Self-test deadline for the orientation adapter (milliseconds)
    pub orientation_test_timeout_ms: u64,

    // --- Touch ---
    /// Self-test deadline for the touch adapter (milliseconds)
    pub touch_test_timeout_ms: u64,
    /// Two-finger distance change needed to classify pinch/spread
    pub gesture_distance_threshold: f64,
    /// Force substituted when the platform does not report one
    pub default_touch_force: f64,

    // --- Recorder ---
    /// Maximum frames retained by the session recorder
    pub recorder_capacity: usize,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            // Motion
            motion_threshold: 1.0,
            motion_test_timeout_ms: 3000,

            // Orientation
            orientation_test_timeout_ms: 3000,

            // Touch
            touch_test_timeout_ms: 5000,
            gesture_distance_threshold: 10.0,
            default_touch_force: 0.5,

            // Recorder
            recorder_capacity: 4096,
        }
    }
}

impl SensorConfig {
    /// Parse a JSON override document.  Missing fields keep their defaults.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(json).context("parsing sensor config")?;
        config.validate().context("validating sensor config")?;
        Ok(config)
    }

    /// Reject values the adapters cannot operate with.
    pub fn validate(&self) -> Result<()> {
        let check = |ok: bool, msg: &'static str| {
            if ok {
                Ok(())
            } else {
                warn!("config rejected: {msg}");
                Err(Error::Config(msg))
            }
        };

        check(
            self.motion_threshold.is_finite() && self.motion_threshold >= 0.0,
            "motion_threshold must be a finite value >= 0",
        )?;
        check(self.motion_test_timeout_ms > 0, "motion_test_timeout_ms must be > 0")?;
        check(
            self.orientation_test_timeout_ms > 0,
            "orientation_test_timeout_ms must be > 0",
        )?;
        check(self.touch_test_timeout_ms > 0, "touch_test_timeout_ms must be > 0")?;
        check(
            self.gesture_distance_threshold.is_finite() && self.gesture_distance_threshold >= 0.0,
            "gesture_distance_threshold must be a finite value >= 0",
        )?;
        check(
            self.default_touch_force > 0.0 && self.default_touch_force <= 1.0,
            "default_touch_force must be in (0, 1]",
        )?;
        check(self.recorder_capacity > 0, "recorder_capacity must be > 0")
    }
}
