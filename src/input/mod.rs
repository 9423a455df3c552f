//! Keypad decoding.
//!
//! Three decoders share the same four keys, one per interaction tier:
//!
//! | Tier | Decoder              | Active when             | K1          | K2         | K3             | K4          |
//! |------|----------------------|-------------------------|-------------|------------|----------------|-------------|
//! | 1    | [`PageKeys`]         | Viewing                 | Main page   | Extremes   | Timers         | Summary     |
//! | 2    | [`NavKeys`]          | Settings, browsing      | edit option | next       | previous       | first       |
//! | 3    | [`EditKeys`]         | Settings, edit session  | cancel      | +1 (repeat)| −1 (repeat)    | confirm     |
//!
//! Every decoder follows the same debounce law: a candidate transition is
//! acted on only if a second sample taken [`TimingConfig::debounce_ms`] later
//! shows the same code. A mismatch is noise and changes nothing.
//!
//! [`TimingConfig::debounce_ms`]: crate::config::TimingConfig::debounce_ms

pub mod edit;
pub mod nav;
pub mod page;

pub use edit::{EditInput, EditKeys};
pub use nav::{NavAction, NavKeys};
pub use page::PageKeys;

use embedded_hal::delay::DelayNs;

use crate::app::ports::KeyBus;
use crate::pins::{KEY_SAMPLE_MASK, KEY1_CODE, KEY2_CODE, KEY3_CODE, KEY4_CODE, RELEASED_CODE};

/// One of the four keypad keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    K1,
    K2,
    K3,
    K4,
}

impl Key {
    pub const ALL: [Key; 4] = [Key::K1, Key::K2, Key::K3, Key::K4];

    /// Masked bus code with only this key's line low.
    pub const fn code(self) -> u8 {
        match self {
            Self::K1 => KEY1_CODE,
            Self::K2 => KEY2_CODE,
            Self::K3 => KEY3_CODE,
            Self::K4 => KEY4_CODE,
        }
    }
}

/// Classification of one masked sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySample {
    /// Exactly one key line low.
    Pressed(Key),
    /// Every key line high.
    Released,
    /// Anything else, including chords.
    Noise,
}

impl KeySample {
    pub fn decode(code: u8) -> Self {
        match code {
            KEY1_CODE => Self::Pressed(Key::K1),
            KEY2_CODE => Self::Pressed(Key::K2),
            KEY3_CODE => Self::Pressed(Key::K3),
            KEY4_CODE => Self::Pressed(Key::K4),
            RELEASED_CODE => Self::Released,
            _ => Self::Noise,
        }
    }
}

/// Sample the bus with the non-key lines masked off.
pub fn sample_keys(bus: &mut impl KeyBus) -> u8 {
    bus.sample() | KEY_SAMPLE_MASK
}

/// The debounce law shared by all tiers.
#[derive(Debug, Clone, Copy)]
pub struct Debounce {
    ms: u32,
}

impl Debounce {
    pub fn new(ms: u32) -> Self {
        Self { ms }
    }

    /// Wait, re-sample, and report whether the bus still shows `code`.
    pub fn confirm(&self, code: u8, bus: &mut impl KeyBus, delay: &mut impl DelayNs) -> bool {
        delay.delay_ms(self.ms);
        sample_keys(bus) == code
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{NoDelay, Script};
    use super::*;
    use crate::pins::ALL_PRESSED_CODE;

    #[test]
    fn decode_ignores_low_nibble() {
        let mut bus = Script::new(&[0x70]);
        assert_eq!(
            KeySample::decode(sample_keys(&mut bus)),
            KeySample::Pressed(Key::K1)
        );
    }

    #[test]
    fn chords_are_noise() {
        assert_eq!(KeySample::decode(0x3F), KeySample::Noise);
        assert_eq!(KeySample::decode(ALL_PRESSED_CODE), KeySample::Noise);
    }

    #[test]
    fn debounce_rejects_bounce() {
        let d = Debounce::new(10);
        let mut bus = Script::new(&[0xFF]);
        assert!(!d.confirm(KEY2_CODE, &mut bus, &mut NoDelay));
        let mut bus = Script::new(&[0xBF]);
        assert!(d.confirm(KEY2_CODE, &mut bus, &mut NoDelay));
    }
}
