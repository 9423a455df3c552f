//! Application core: main-loop domain logic, zero direct I/O.
//!
//! The controller in [`service`] sequences monitoring, page rendering, key
//! handling and settings edits. All interaction with hardware happens through
//! the **port traits** in [`ports`], keeping this layer fully testable without
//! real peripherals.

pub mod events;
pub mod ports;
pub mod service;
