//! Viewing / Settings mode and the long-press toggle that flips it.
//!
//! The toggle runs from the falling-edge interrupt of its dedicated line, at
//! lower priority than the tick. It confirms a long press by polling the bus
//! a fixed number of times; any poll that does not show the toggle line alone
//! aborts without touching anything.
//!
//! ```text
//!            long press                        long press
//!  Viewing ───────────────▶ Settings ─────────────────────────▶ Viewing
//!           fan/relay off              pacing reset, workflow on,
//!           workflow halted            persist + restart requested
//!           settings redraw            view redraw
//! ```
//!
//! Only atomic effects happen here. Persisting the staged limits and
//! restarting the sensor run on the main loop when it consumes
//! `resume_pending`.

use embedded_hal::delay::DelayNs;

use crate::app::ports::KeyBus;
use crate::config::TimingConfig;
use crate::pins::{TOGGLE_CODE, TOGGLE_SAMPLE_MASK};
use crate::shared::SharedState;

/// Top-level operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceMode {
    #[default]
    Viewing,
    Settings,
}

impl DeviceMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Viewing => Self::Settings,
            Self::Settings => Self::Viewing,
        }
    }
}

/// Debounced long-press detector on the mode line.
#[derive(Debug, Clone, Copy)]
pub struct ModeToggle {
    polls: u8,
    spacing_ms: u32,
}

impl ModeToggle {
    pub fn new(timing: &TimingConfig) -> Self {
        Self {
            polls: timing.long_press_polls,
            spacing_ms: timing.long_press_spacing_ms,
        }
    }

    /// Edge handler. Returns the new mode if the press was confirmed.
    ///
    /// Ignored while an edit session is open.
    pub fn on_edge(
        &self,
        bus: &mut impl KeyBus,
        delay: &mut impl DelayNs,
        shared: &SharedState,
    ) -> Option<DeviceMode> {
        if shared.editing() {
            return None;
        }
        if !self.confirm_long_press(bus, delay) {
            return None;
        }

        let next = shared.mode().toggled();
        critical_section::with(|_| {
            match next {
                DeviceMode::Settings => enter_settings(shared),
                DeviceMode::Viewing => leave_settings(shared),
            }
            shared.set_mode(next);
        });
        Some(next)
    }

    fn confirm_long_press(&self, bus: &mut impl KeyBus, delay: &mut impl DelayNs) -> bool {
        for poll in 0..self.polls {
            if bus.sample() | TOGGLE_SAMPLE_MASK != TOGGLE_CODE {
                return false;
            }
            if poll + 1 < self.polls {
                delay.delay_ms(self.spacing_ms);
            }
        }
        true
    }
}

fn enter_settings(shared: &SharedState) {
    shared.set_workflow_running(false);
    shared.set_fan(false, 0);
    shared.set_relay_closed(false);
    shared.raise_settings_redraw();
}

fn leave_settings(shared: &SharedState) {
    shared.restart_conversion_pacing();
    shared.set_workflow_running(true);
    shared.raise_view_redraw();
    shared.raise_resume_pending();
}
