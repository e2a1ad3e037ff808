//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements      | Connects to                   |
//! |----------------|-----------------|-------------------------------|
//! | `event_target` | EventSource     | In-process event dispatch     |
//! | `capabilities` | CapabilityPort  | Feature detection table       |
//! | `time`         | ClockPort       | `std::time::SystemTime`       |
//! |                | TimerPort       | `embassy-time` std driver     |
//! | `log_sink`     | ReadingSink     | `log` facade                  |

pub mod capabilities;
pub mod event_target;
pub mod log_sink;
pub mod time;
