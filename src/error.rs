//! Unified error types for the ThermoWatch firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! main loop's error handling uniform. All variants are `Copy` so they can be
//! passed around the controller and logged without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The temperature sensor could not be read or written.
    Sensor(SensorError),
    /// An actuator output could not be driven.
    Actuator(ActuatorError),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// No presence pulse on the one-wire bus.
    NoDevice,
    /// Scratchpad CRC mismatch.
    CrcMismatch,
    /// Copy-scratchpad to EEPROM did not complete.
    PersistFailed,
    /// Stored register contents do not decode.
    InvalidRegister,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDevice => write!(f, "no device on bus"),
            Self::CrcMismatch => write!(f, "scratchpad CRC mismatch"),
            Self::PersistFailed => write!(f, "EEPROM copy failed"),
            Self::InvalidRegister => write!(f, "invalid register contents"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// GPIO set failed on the relay line.
    RelayWriteFailed,
    /// GPIO set failed on the motor line.
    MotorWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RelayWriteFailed => write!(f, "relay write failed"),
            Self::MotorWriteFailed => write!(f, "motor write failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensor_error_converts_and_displays() {
        let e: Error = SensorError::CrcMismatch.into();
        assert_eq!(e, Error::Sensor(SensorError::CrcMismatch));
        assert_eq!(e.to_string(), "sensor: scratchpad CRC mismatch");
    }

    #[test]
    fn config_error_carries_reason() {
        let e = Error::Config("upper limit must exceed lower limit");
        assert!(e.to_string().starts_with("config: upper"));
    }
}
