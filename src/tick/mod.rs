//! Tick-driven timing core.
//!
//! A single periodic interrupt is the only time base. Every tick runs the
//! consumers below, in this order, with integer arithmetic only:
//!
//! ```text
//!   TickSource ──▶ TickHandler::on_tick
//!                    ├─ pacer::on_tick   conversion counter → "conversion complete"
//!                    ├─ duty::on_tick    duty counter → motor pin
//!                    ├─ clock::on_tick   upper/lower violation clocks
//!                    └─ relay mirror     relay demand → relay pin
//! ```
//!
//! Nothing in here blocks or logs. While the conversion workflow is halted
//! (Settings mode) the handler only holds both actuator pins low.

pub mod clock;
pub mod duty;
pub mod pacer;

use embedded_hal::digital::{OutputPin, PinState};

use crate::config::TimingConfig;
use crate::error::ActuatorError;
use crate::shared::SharedState;

// ---------------------------------------------------------------------------
// Tick source capability
// ---------------------------------------------------------------------------

/// A periodic interrupt source.
///
/// Firmware backs this with an auto-reload hardware timer; the simulator
/// backs it with a thread.
pub trait TickSource {
    /// Install `callback` to run every `period_ns` nanoseconds.
    fn register(&mut self, period_ns: u32, callback: fn());

    /// Ticks delivered since registration.
    fn elapsed_ticks(&self) -> u32;
}

// ---------------------------------------------------------------------------
// Tick handler
// ---------------------------------------------------------------------------

/// Owns the actuator pins and runs the per-tick consumers.
pub struct TickHandler<'a, M, R> {
    shared: &'a SharedState,
    timing: TimingConfig,
    motor: M,
    relay: R,
}

impl<'a, M: OutputPin, R: OutputPin> TickHandler<'a, M, R> {
    pub fn new(shared: &'a SharedState, timing: TimingConfig, motor: M, relay: R) -> Self {
        Self {
            shared,
            timing,
            motor,
            relay,
        }
    }

    /// One tick of the timing core.
    pub fn on_tick(&mut self) -> Result<(), ActuatorError> {
        if !self.shared.workflow_running() {
            self.shared.set_motor_on(false);
            self.motor
                .set_low()
                .map_err(|_| ActuatorError::MotorWriteFailed)?;
            return self
                .relay
                .set_low()
                .map_err(|_| ActuatorError::RelayWriteFailed);
        }

        pacer::on_tick(self.shared, &self.timing);

        let motor_on = duty::on_tick(self.shared, &self.timing);
        self.motor
            .set_state(PinState::from(motor_on))
            .map_err(|_| ActuatorError::MotorWriteFailed)?;

        clock::on_tick(self.shared, self.timing.ticks_per_hundredth);

        self.relay
            .set_state(PinState::from(self.shared.relay_closed()))
            .map_err(|_| ActuatorError::RelayWriteFailed)
    }

    /// Release the pins.
    pub fn into_pins(self) -> (M, R) {
        (self.motor, self.relay)
    }
}
