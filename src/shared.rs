//! State shared between interrupt context and the main loop.
//!
//! There is no lock anywhere: every field has exactly one writing context and
//! one reading context, and each field is a single atomic. Transitions that
//! touch several fields and must look atomic to the other side are wrapped in
//! `critical_section::with` by the writer.
//!
//! ```text
//!  field                    writer                    reader
//!  ───────────────────────  ────────────────────────  ──────────────────────
//!  conversion_complete      tick (raise)              main loop (clear)
//!  conversion_count         tick                      mode toggle (reset*)
//!  duty_count, motor_on     tick                      main loop (display)
//!  upper/lower_clock        tick                      main loop (display)
//!  resolution               main loop                 tick
//!  fan_enabled, fan_gear    main loop (Viewing)       tick
//!  relay_closed             main loop (Viewing)       tick (mirrors to pin)
//!  above_upper, below_lower main loop                 tick
//!  editing                  main loop                 mode toggle
//!  settings_mode            mode toggle               main loop
//!  workflow_running         mode toggle / boot        tick
//!  settings/view_redraw     mode toggle (raise)       main loop (take)
//!  resume_pending           mode toggle (raise)       main loop (take)
//!  actuator_fault           tick (record)             main loop (take)
//! ```
//!
//! `*` the mode toggle only resets pacing fields while the workflow is
//! halted, i.e. while the tick handler does not touch them. The same holds for
//! the fan and relay demands, which the mode toggle forces off only when it
//! enters Settings, where the monitor never runs.
//!
//! Firmware keeps one instance in a `static`; tests build their own.

use core::sync::atomic::{AtomicBool, AtomicU8, AtomicU16, Ordering};

use crate::error::ActuatorError;
use crate::mode::DeviceMode;
use crate::tick::clock::ElapsedClock;

/// The interrupt ↔ main-loop record.
pub struct SharedState {
    // ── Tick → main loop ──────────────────────────────────────
    conversion_complete: AtomicBool,
    conversion_count: AtomicU16,
    duty_count: AtomicU16,
    motor_on: AtomicBool,
    pub upper_clock: ElapsedClock,
    pub lower_clock: ElapsedClock,

    // ── Main loop → tick ──────────────────────────────────────
    resolution: AtomicU8,
    fan_enabled: AtomicBool,
    fan_gear: AtomicU8,
    relay_closed: AtomicBool,
    above_upper: AtomicBool,
    below_lower: AtomicBool,
    editing: AtomicBool,

    // ── Mode toggle → main loop / tick ───────────────────────
    settings_mode: AtomicBool,
    workflow_running: AtomicBool,
    settings_redraw: AtomicBool,
    view_redraw: AtomicBool,
    resume_pending: AtomicBool,

    // ── Tick → main loop, reported ────────────────────────────
    actuator_fault: AtomicU8,
}

impl SharedState {
    const NO_FAULT: u8 = 0;
    const MOTOR_FAULT: u8 = 1;
    const RELAY_FAULT: u8 = 2;

    /// Power-on state: Viewing mode, workflow halted until boot completes.
    pub const fn new() -> Self {
        Self {
            conversion_complete: AtomicBool::new(false),
            conversion_count: AtomicU16::new(0),
            duty_count: AtomicU16::new(0),
            motor_on: AtomicBool::new(false),
            upper_clock: ElapsedClock::new(),
            lower_clock: ElapsedClock::new(),

            resolution: AtomicU8::new(crate::config::RESOLUTION_MAX),
            fan_enabled: AtomicBool::new(false),
            fan_gear: AtomicU8::new(0),
            relay_closed: AtomicBool::new(false),
            above_upper: AtomicBool::new(false),
            below_lower: AtomicBool::new(false),
            editing: AtomicBool::new(false),

            settings_mode: AtomicBool::new(false),
            workflow_running: AtomicBool::new(false),
            settings_redraw: AtomicBool::new(false),
            view_redraw: AtomicBool::new(false),
            resume_pending: AtomicBool::new(false),

            actuator_fault: AtomicU8::new(Self::NO_FAULT),
        }
    }

    // ── Conversion pacing ─────────────────────────────────────

    /// True while a finished conversion waits to be read.
    pub fn conversion_complete(&self) -> bool {
        self.conversion_complete.load(Ordering::Acquire)
    }

    /// Hand the finished conversion to the main loop.
    pub(crate) fn raise_conversion_complete(&self) {
        self.conversion_complete.store(true, Ordering::Release);
    }

    /// Main loop: the reading has been consumed; pacing resumes.
    pub fn clear_conversion_complete(&self) {
        self.conversion_complete.store(false, Ordering::Release);
    }

    pub fn conversion_count(&self) -> u16 {
        self.conversion_count.load(Ordering::Relaxed)
    }

    pub(crate) fn set_conversion_count(&self, count: u16) {
        self.conversion_count.store(count, Ordering::Relaxed);
    }

    /// Zero the pacing counter and drop any pending completion.
    pub fn restart_conversion_pacing(&self) {
        self.conversion_count.store(0, Ordering::Relaxed);
        self.conversion_complete.store(false, Ordering::Release);
    }

    pub fn resolution(&self) -> u8 {
        self.resolution.load(Ordering::Relaxed)
    }

    pub fn set_resolution(&self, resolution: u8) {
        self.resolution.store(resolution, Ordering::Relaxed);
    }

    // ── Fan / relay ───────────────────────────────────────────

    pub fn set_fan(&self, enabled: bool, gear: u8) {
        self.fan_gear.store(gear, Ordering::Relaxed);
        self.fan_enabled.store(enabled, Ordering::Release);
    }

    pub fn fan_enabled(&self) -> bool {
        self.fan_enabled.load(Ordering::Acquire)
    }

    pub fn fan_gear(&self) -> u8 {
        self.fan_gear.load(Ordering::Relaxed)
    }

    pub fn duty_count(&self) -> u16 {
        self.duty_count.load(Ordering::Relaxed)
    }

    pub(crate) fn set_duty_count(&self, count: u16) {
        self.duty_count.store(count, Ordering::Relaxed);
    }

    /// Last level the duty modulator drove onto the motor line.
    pub fn motor_on(&self) -> bool {
        self.motor_on.load(Ordering::Relaxed)
    }

    pub(crate) fn set_motor_on(&self, on: bool) {
        self.motor_on.store(on, Ordering::Relaxed);
    }

    pub fn set_relay_closed(&self, closed: bool) {
        self.relay_closed.store(closed, Ordering::Release);
    }

    pub fn relay_closed(&self) -> bool {
        self.relay_closed.load(Ordering::Acquire)
    }

    // ── Violations ────────────────────────────────────────────

    pub fn set_violations(&self, above_upper: bool, below_lower: bool) {
        self.above_upper.store(above_upper, Ordering::Release);
        self.below_lower.store(below_lower, Ordering::Release);
    }

    pub fn above_upper(&self) -> bool {
        self.above_upper.load(Ordering::Acquire)
    }

    pub fn below_lower(&self) -> bool {
        self.below_lower.load(Ordering::Acquire)
    }

    // ── Mode ──────────────────────────────────────────────────

    pub fn mode(&self) -> DeviceMode {
        if self.settings_mode.load(Ordering::Acquire) {
            DeviceMode::Settings
        } else {
            DeviceMode::Viewing
        }
    }

    pub(crate) fn set_mode(&self, mode: DeviceMode) {
        self.settings_mode
            .store(mode == DeviceMode::Settings, Ordering::Release);
    }

    /// True while the tick-driven conversion workflow runs.
    pub fn workflow_running(&self) -> bool {
        self.workflow_running.load(Ordering::Acquire)
    }

    pub fn set_workflow_running(&self, running: bool) {
        self.workflow_running.store(running, Ordering::Release);
    }

    pub fn editing(&self) -> bool {
        self.editing.load(Ordering::Acquire)
    }

    pub fn set_editing(&self, editing: bool) {
        self.editing.store(editing, Ordering::Release);
    }

    pub(crate) fn raise_settings_redraw(&self) {
        self.settings_redraw.store(true, Ordering::Release);
    }

    /// Consume the "settings screen needs a full redraw" flag.
    pub fn take_settings_redraw(&self) -> bool {
        self.settings_redraw.swap(false, Ordering::AcqRel)
    }

    pub(crate) fn raise_view_redraw(&self) {
        self.view_redraw.store(true, Ordering::Release);
    }

    /// Consume the "view needs a full redraw" flag.
    pub fn take_view_redraw(&self) -> bool {
        self.view_redraw.swap(false, Ordering::AcqRel)
    }

    pub(crate) fn raise_resume_pending(&self) {
        self.resume_pending.store(true, Ordering::Release);
    }

    /// Consume the "persist and restart the sensor" request.
    pub fn take_resume_pending(&self) -> bool {
        self.resume_pending.swap(false, Ordering::AcqRel)
    }

    // ── Faults ────────────────────────────────────────────────

    /// Tick context: note a failed pin write for the main loop to report.
    /// Later faults overwrite an unreported one.
    pub fn record_actuator_fault(&self, fault: ActuatorError) {
        let code = match fault {
            ActuatorError::MotorWriteFailed => Self::MOTOR_FAULT,
            ActuatorError::RelayWriteFailed => Self::RELAY_FAULT,
        };
        self.actuator_fault.store(code, Ordering::Release);
    }

    /// Consume the last recorded actuator fault.
    pub fn take_actuator_fault(&self) -> Option<ActuatorError> {
        match self.actuator_fault.swap(Self::NO_FAULT, Ordering::AcqRel) {
            Self::MOTOR_FAULT => Some(ActuatorError::MotorWriteFailed),
            Self::RELAY_FAULT => Some(ActuatorError::RelayWriteFailed),
            _ => None,
        }
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_on_state() {
        let s = SharedState::new();
        assert_eq!(s.mode(), DeviceMode::Viewing);
        assert!(!s.workflow_running());
        assert!(!s.conversion_complete());
        assert!(!s.fan_enabled());
        assert!(!s.relay_closed());
    }

    #[test]
    fn redraw_flags_are_one_shot() {
        let s = SharedState::new();
        s.raise_view_redraw();
        assert!(s.take_view_redraw());
        assert!(!s.take_view_redraw());
    }

    #[test]
    fn actuator_fault_is_reported_once() {
        let s = SharedState::new();
        assert_eq!(s.take_actuator_fault(), None);
        s.record_actuator_fault(ActuatorError::RelayWriteFailed);
        assert_eq!(s.take_actuator_fault(), Some(ActuatorError::RelayWriteFailed));
        assert_eq!(s.take_actuator_fault(), None);
    }

    #[test]
    fn restart_pacing_clears_pending_completion() {
        let s = SharedState::new();
        s.set_conversion_count(17);
        s.raise_conversion_complete();
        s.restart_conversion_pacing();
        assert_eq!(s.conversion_count(), 0);
        assert!(!s.conversion_complete());
    }
}
