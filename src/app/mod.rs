//! Application core — the adapter context and its consumers.
//!
//! The sensor adapters talk to the host only through the **port traits**
//! defined in [`ports`], keeping this layer testable with fake event
//! sources, clocks and timers.

pub mod context;
pub mod events;
pub mod panel;
pub mod ports;
