//! Sensorkit library.
//!
//! Motion, orientation and multi-touch adapters for a diagnostic panel.
//! Each adapter wraps one platform event stream, normalizes it into a
//! snapshot, fans snapshots out to subscribers, and offers an async
//! self-test.  Everything runs on one thread; the host feeds events in
//! through the [`app::ports::EventSource`] port.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod diagnostics;
pub mod events;
pub mod sensors;

mod error;

pub use error::{Error, LifecycleError, Result};
