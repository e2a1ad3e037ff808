//! Integration test suite.
//!
//! Drives the sensor adapters end to end through in-process event
//! targets, a manual timer, and a frozen clock.

mod context_tests;
mod mock_platform;
mod panel_tests;
