//! Tier 3: adjusting a value inside an edit session.
//!
//! The sample is debounced before anything else so every call takes the same
//! time, which keeps the editor's blink cadence steady.
//!
//! K2/K3 step on the first confirmed poll of a hold, then autorepeat: once
//! the hold has lasted `repeat_warmup_polls` polls, one more step every
//! `repeat_interval_polls` polls. K1/K4 act once, on release.
//!
//! ```text
//!  poll      1    2 ..  79   80   81 ..  95   96  ...  112
//!  step      ●              ●              ●          ●
//! ```

use embedded_hal::delay::DelayNs;

use super::{Debounce, Key, KeySample, sample_keys};
use crate::app::ports::KeyBus;
use crate::config::TimingConfig;

/// One tier-3 outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditInput {
    Idle,
    Increment,
    Decrement,
    Confirm,
    Cancel,
}

pub struct EditKeys {
    debounce: Debounce,
    warmup: u32,
    interval: u32,
    held: Option<Key>,
    hold_polls: u32,
}

impl EditKeys {
    pub fn new(timing: &TimingConfig) -> Self {
        Self {
            debounce: Debounce::new(timing.debounce_ms),
            warmup: u32::from(timing.repeat_warmup_polls),
            interval: u32::from(timing.repeat_interval_polls.max(1)),
            held: None,
            hold_polls: 0,
        }
    }

    pub fn poll(&mut self, bus: &mut impl KeyBus, delay: &mut impl DelayNs) -> EditInput {
        let code = sample_keys(bus);
        if !self.debounce.confirm(code, bus, delay) {
            return EditInput::Idle;
        }

        match KeySample::decode(code) {
            KeySample::Pressed(key @ (Key::K2 | Key::K3)) => {
                if self.held == Some(key) {
                    self.hold_polls = self.hold_polls.saturating_add(1);
                    if self.hold_polls >= self.warmup && self.hold_polls % self.interval == 0 {
                        step(key)
                    } else {
                        EditInput::Idle
                    }
                } else {
                    self.held = Some(key);
                    self.hold_polls = 1;
                    step(key)
                }
            }
            KeySample::Pressed(key) => {
                self.held = Some(key);
                self.hold_polls = 0;
                EditInput::Idle
            }
            KeySample::Released => {
                self.hold_polls = 0;
                match self.held.take() {
                    Some(Key::K1) => EditInput::Cancel,
                    Some(Key::K4) => EditInput::Confirm,
                    _ => EditInput::Idle,
                }
            }
            KeySample::Noise => {
                self.held = None;
                self.hold_polls = 0;
                EditInput::Idle
            }
        }
    }

    pub fn reset(&mut self) {
        self.held = None;
        self.hold_polls = 0;
    }
}

fn step(key: Key) -> EditInput {
    if key == Key::K2 {
        EditInput::Increment
    } else {
        EditInput::Decrement
    }
}
