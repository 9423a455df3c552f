//! Tier 1: page selection while viewing.
//!
//! A key different from the current page is latched on a confirmed press;
//! the page switches on the confirmed release that follows. Any other press
//! pattern in between, including the current page's own key, drops the latch.

use embedded_hal::delay::DelayNs;

use super::{Debounce, Key, KeySample, sample_keys};
use crate::app::ports::KeyBus;
use crate::view::ViewPage;

pub struct PageKeys {
    debounce: Debounce,
    latched: Option<Key>,
}

impl PageKeys {
    pub fn new(debounce: Debounce) -> Self {
        Self {
            debounce,
            latched: None,
        }
    }

    /// Poll once. Returns the page to switch to, if any.
    pub fn poll(
        &mut self,
        bus: &mut impl KeyBus,
        delay: &mut impl DelayNs,
        current: ViewPage,
    ) -> Option<ViewPage> {
        let code = sample_keys(bus);
        match KeySample::decode(code) {
            KeySample::Pressed(key) => {
                let held = key != current.key() && self.debounce.confirm(code, bus, delay);
                // A latch survives only the same key, confirmed again.
                self.latched = (held && self.latched.is_none_or(|k| k == key)).then_some(key);
                None
            }
            KeySample::Released => {
                let key = self.latched?;
                if !self.debounce.confirm(code, bus, delay) {
                    return None;
                }
                self.latched = None;
                Some(ViewPage::for_key(key))
            }
            KeySample::Noise => {
                self.latched = None;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::test_support::{NoDelay, Script};

    fn keys() -> PageKeys {
        PageKeys::new(Debounce::new(10))
    }

    #[test]
    fn press_then_release_switches() {
        let mut k = keys();
        // press (sample + confirm), release (sample + confirm)
        let mut bus = Script::new(&[0xBF, 0xBF, 0xFF, 0xFF]);
        assert_eq!(k.poll(&mut bus, &mut NoDelay, ViewPage::Main), None);
        assert_eq!(
            k.poll(&mut bus, &mut NoDelay, ViewPage::Main),
            Some(ViewPage::Extremes)
        );
    }

    #[test]
    fn current_page_key_is_ignored() {
        let mut k = keys();
        let mut bus = Script::new(&[0x7F, 0xFF]);
        assert_eq!(k.poll(&mut bus, &mut NoDelay, ViewPage::Main), None);
        assert_eq!(k.poll(&mut bus, &mut NoDelay, ViewPage::Main), None);
    }

    #[test]
    fn noise_clears_latch() {
        let mut k = keys();
        let mut bus = Script::new(&[0xDF, 0xDF, 0x9F, 0xFF, 0xFF]);
        k.poll(&mut bus, &mut NoDelay, ViewPage::Main);
        k.poll(&mut bus, &mut NoDelay, ViewPage::Main);
        assert_eq!(k.poll(&mut bus, &mut NoDelay, ViewPage::Main), None);
    }

    #[test]
    fn current_page_key_drops_latch() {
        let mut k = keys();
        // K2 held, then K1 (the page on screen) held, then release
        let mut bus = Script::new(&[0xBF, 0xBF, 0x7F, 0x7F, 0xFF, 0xFF]);
        for _ in 0..4 {
            assert_eq!(k.poll(&mut bus, &mut NoDelay, ViewPage::Main), None);
        }
    }

    #[test]
    fn unconfirmed_other_key_drops_latch() {
        let mut k = keys();
        // K2 held, then a K3 sample that does not confirm, then release
        let mut bus = Script::new(&[0xBF, 0xBF, 0xDF, 0xFF, 0xFF, 0xFF]);
        for _ in 0..4 {
            assert_eq!(k.poll(&mut bus, &mut NoDelay, ViewPage::Main), None);
        }
    }

    #[test]
    fn switching_keys_mid_hold_drops_latch() {
        let mut k = keys();
        // K2 confirmed, K4 confirmed once, then release
        let mut bus = Script::new(&[0xBF, 0xBF, 0xEF, 0xEF, 0xFF, 0xFF]);
        for _ in 0..3 {
            assert_eq!(k.poll(&mut bus, &mut NoDelay, ViewPage::Main), None);
        }
    }

    #[test]
    fn long_hold_still_switches() {
        let mut k = keys();
        let mut bus = Script::new(&[0xDF, 0xDF, 0xDF, 0xDF, 0xDF, 0xDF, 0xFF, 0xFF]);
        for _ in 0..3 {
            assert_eq!(k.poll(&mut bus, &mut NoDelay, ViewPage::Main), None);
        }
        assert_eq!(
            k.poll(&mut bus, &mut NoDelay, ViewPage::Main),
            Some(ViewPage::ViolationTimers)
        );
    }

    #[test]
    fn bouncy_release_keeps_latch() {
        let mut k = keys();
        let mut bus = Script::new(&[0xEF, 0xEF, 0xFF, 0xEF, 0xFF, 0xFF]);
        k.poll(&mut bus, &mut NoDelay, ViewPage::Main);
        // release not confirmed
        assert_eq!(k.poll(&mut bus, &mut NoDelay, ViewPage::Main), None);
        assert_eq!(
            k.poll(&mut bus, &mut NoDelay, ViewPage::Main),
            Some(ViewPage::SettingsSummary)
        );
    }
}
