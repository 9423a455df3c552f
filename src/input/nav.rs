//! Tier 2: browsing the settings list.

use embedded_hal::delay::DelayNs;

use super::{Debounce, Key, KeySample, sample_keys};
use crate::app::ports::KeyBus;

/// What a released tier-2 key asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    /// K1: open the in-place editor on the selected option.
    Edit,
    /// K2: next option, wrapping to the first.
    Next,
    /// K3: previous option, wrapping to the last.
    Previous,
    /// K4: jump to the first option.
    First,
}

impl NavAction {
    fn for_key(key: Key) -> Self {
        match key {
            Key::K1 => Self::Edit,
            Key::K2 => Self::Next,
            Key::K3 => Self::Previous,
            Key::K4 => Self::First,
        }
    }
}

/// Latches on a confirmed press and acts on the confirmed release. A hold
/// interrupted by another key or an unconfirmed sample acts on nothing.
pub struct NavKeys {
    debounce: Debounce,
    latched: Option<Key>,
}

impl NavKeys {
    pub fn new(debounce: Debounce) -> Self {
        Self {
            debounce,
            latched: None,
        }
    }

    pub fn poll(&mut self, bus: &mut impl KeyBus, delay: &mut impl DelayNs) -> Option<NavAction> {
        let code = sample_keys(bus);
        match KeySample::decode(code) {
            KeySample::Pressed(key) => {
                let held = self.debounce.confirm(code, bus, delay);
                self.latched = (held && self.latched.is_none_or(|k| k == key)).then_some(key);
                None
            }
            KeySample::Released => {
                let key = self.latched?;
                if !self.debounce.confirm(code, bus, delay) {
                    return None;
                }
                self.latched = None;
                Some(NavAction::for_key(key))
            }
            KeySample::Noise => {
                self.latched = None;
                None
            }
        }
    }

    /// Forget any latched key, e.g. after an edit session consumed the bus.
    pub fn reset(&mut self) {
        self.latched = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::test_support::{NoDelay, Script};

    #[test]
    fn each_key_maps_on_release() {
        for (raw, action) in [
            (0x7F, NavAction::Edit),
            (0xBF, NavAction::Next),
            (0xDF, NavAction::Previous),
            (0xEF, NavAction::First),
        ] {
            let mut k = NavKeys::new(Debounce::new(10));
            let samples: &'static [u8] = Box::leak(Box::new([raw, raw, 0xFF, 0xFF]));
            let mut bus = Script::new(samples);
            assert_eq!(k.poll(&mut bus, &mut NoDelay), None);
            assert_eq!(k.poll(&mut bus, &mut NoDelay), Some(action));
        }
    }

    #[test]
    fn release_without_press_does_nothing() {
        let mut k = NavKeys::new(Debounce::new(10));
        let mut bus = Script::new(&[0xFF]);
        assert_eq!(k.poll(&mut bus, &mut NoDelay), None);
    }

    #[test]
    fn unconfirmed_press_drops_latch() {
        let mut k = NavKeys::new(Debounce::new(10));
        // K2 held, then a K3 sample that does not confirm, then release
        let mut bus = Script::new(&[0xBF, 0xBF, 0xDF, 0xFF, 0xFF, 0xFF]);
        for _ in 0..4 {
            assert_eq!(k.poll(&mut bus, &mut NoDelay), None);
        }
    }

    #[test]
    fn other_key_mid_hold_drops_latch() {
        let mut k = NavKeys::new(Debounce::new(10));
        // K2 held, then K4 confirmed once, then release
        let mut bus = Script::new(&[0xBF, 0xBF, 0xEF, 0xEF, 0xFF, 0xFF]);
        for _ in 0..3 {
            assert_eq!(k.poll(&mut bus, &mut NoDelay), None);
        }
    }

    #[test]
    fn held_key_acts_once() {
        let mut k = NavKeys::new(Debounce::new(10));
        let mut bus = Script::new(&[0xBF, 0xBF, 0xBF, 0xBF, 0xBF, 0xBF, 0xFF, 0xFF, 0xFF]);
        let mut actions = 0;
        for _ in 0..6 {
            if k.poll(&mut bus, &mut NoDelay).is_some() {
                actions += 1;
            }
        }
        assert_eq!(actions, 1);
    }
}
