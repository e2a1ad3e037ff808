//! Host time adapters.
//!
//! - [`SystemClock`] — wall-clock milliseconds, used to stamp events that
//!   arrive without a platform timestamp.
//! - [`EmbassyTimer`] — self-test deadlines on the `embassy-time` std
//!   driver.  Dropping the sleep future cancels the timer.

use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

use futures_lite::FutureExt;
use futures_lite::future::BoxedLocal;

use crate::app::ports::{ClockPort, TimerPort};

/// Wall clock backed by `std::time::SystemTime`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ClockPort for SystemClock {
    fn now_ms(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0.0, |d| d.as_secs_f64() * 1000.0)
    }
}

/// Deadline timer backed by `embassy_time::Timer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyTimer;

impl TimerPort for EmbassyTimer {
    fn sleep(&self, duration: Duration) -> BoxedLocal<()> {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        embassy_time::Timer::after(embassy_time::Duration::from_millis(millis)).boxed_local()
    }
}
