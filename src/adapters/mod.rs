//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements                       | Connects to               |
//! |---------------|----------------------------------|---------------------------|
//! | `log_sink`    | EventSink                        | `log` facade              |
//! | `sim`         | SensorPort, DisplayPort, KeyBus  | in-process device models  |
//! |               | OutputPin, DelayNs, TickSource   | host threads and clocks   |

pub mod log_sink;

#[cfg(feature = "sim")]
pub mod sim;
