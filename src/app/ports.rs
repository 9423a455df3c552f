//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Controller (domain)
//! ```
//!
//! Driven adapters (sensor bus, LCD bus, keypad port, event sinks) implement
//! these traits. The [`Controller`](super::service::Controller) consumes them
//! via generics, so the domain core never touches hardware directly.
//! Actuator pins and the delay primitive come straight from `embedded-hal`.

use crate::error::SensorError;
use crate::sensors::StoredConfig;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: one-wire bus ↔ domain)
// ───────────────────────────────────────────────────────────────

/// The single temperature sensor and its nonvolatile registers.
pub trait SensorPort {
    /// Begin a temperature conversion. Completion is paced by tick count,
    /// not polled.
    fn start_conversion(&mut self) -> Result<(), SensorError>;

    /// Read the last converted temperature in 1/16 °C.
    fn read_raw(&mut self) -> Result<i16, SensorError>;

    /// Limits and resolution as currently stored.
    fn stored_config(&mut self) -> Result<StoredConfig, SensorError>;

    /// Write limits and resolution to the volatile registers.
    fn write_config(&mut self, config: StoredConfig) -> Result<(), SensorError>;

    /// Copy the volatile registers to EEPROM.
    fn persist(&mut self) -> Result<(), SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → LCD bus)
// ───────────────────────────────────────────────────────────────

/// Raw HD44780 bus. Fire-and-forget: the controller has no busy flag wired.
pub trait DisplayPort {
    fn write_command(&mut self, cmd: u8);
    fn write_data(&mut self, data: u8);
}

// ───────────────────────────────────────────────────────────────
// Key bus (driving adapter: keypad port → domain)
// ───────────────────────────────────────────────────────────────

/// The 8-bit port the keypad and mode line share.
///
/// Returns the raw level of every line; decoders apply their own masks
/// (see [`crate::pins`]).
pub trait KeyBus {
    fn sample(&mut self) -> u8;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`ApplianceEvent`](super::events::ApplianceEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::ApplianceEvent);
}
