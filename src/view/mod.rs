//! Viewing-mode pages.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  PAGES                                                           │
//! │  ┌─────────────────┬─────┬──────────────┬──────────────────────┐ │
//! │  │ ViewPage        │ key │ draw         │ refresh              │ │
//! │  ├─────────────────┼─────┼──────────────┼──────────────────────┤ │
//! │  │ Main            │ K1  │ fn(scr, vm)  │ temperature, gear    │ │
//! │  │ Extremes        │ K2  │ fn(scr, vm)  │ highest, lowest      │ │
//! │  │ ViolationTimers │ K3  │ fn(scr, vm)  │ active clock only    │ │
//! │  │ SettingsSummary │ K4  │ fn(scr, vm)  │ nothing              │ │
//! │  └─────────────────┴─────┴──────────────┴──────────────────────┘ │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Entering a page draws it in full once; afterwards every main-loop pass
//! only rewrites the page's dynamic fields.

mod pages;

use crate::config::Settings;
use crate::display::TextScreen;
use crate::input::Key;
use crate::monitor::{Extremes, Temperature};
use crate::tick::clock::ClockReading;

// ---------------------------------------------------------------------------
// Page identity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum ViewPage {
    #[default]
    Main = 0,
    Extremes = 1,
    ViolationTimers = 2,
    SettingsSummary = 3,
}

impl ViewPage {
    pub const COUNT: usize = 4;

    /// The key that selects this page.
    pub fn key(self) -> Key {
        match self {
            Self::Main => Key::K1,
            Self::Extremes => Key::K2,
            Self::ViolationTimers => Key::K3,
            Self::SettingsSummary => Key::K4,
        }
    }

    pub fn for_key(key: Key) -> Self {
        match key {
            Key::K1 => Self::Main,
            Key::K2 => Self::Extremes,
            Key::K3 => Self::ViolationTimers,
            Key::K4 => Self::SettingsSummary,
        }
    }
}

// ---------------------------------------------------------------------------
// View model
// ---------------------------------------------------------------------------

/// Everything a page may show, captured once per main-loop pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewModel {
    pub settings: Settings,
    pub temperature: Option<Temperature>,
    pub fan_gear: u8,
    pub extremes: Option<Extremes>,
    pub above_upper: bool,
    pub below_lower: bool,
    pub upper_clock: ClockReading,
    pub lower_clock: ClockReading,
}

// ---------------------------------------------------------------------------
// Descriptor table
// ---------------------------------------------------------------------------

pub type DrawFn = fn(&mut dyn TextScreen, &ViewModel);

/// Function pointers for a single page.
#[derive(Clone, Copy)]
pub struct PageDescriptor {
    pub page: ViewPage,
    pub draw: DrawFn,
    pub refresh: DrawFn,
}

/// Indexed by `ViewPage as usize`.
pub static PAGES: [PageDescriptor; ViewPage::COUNT] = [
    PageDescriptor {
        page: ViewPage::Main,
        draw: pages::main_draw,
        refresh: pages::main_refresh,
    },
    PageDescriptor {
        page: ViewPage::Extremes,
        draw: pages::extremes_draw,
        refresh: pages::extremes_refresh,
    },
    PageDescriptor {
        page: ViewPage::ViolationTimers,
        draw: pages::timers_draw,
        refresh: pages::timers_refresh,
    },
    PageDescriptor {
        page: ViewPage::SettingsSummary,
        draw: pages::summary_draw,
        refresh: pages::nothing,
    },
];

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

pub struct ViewStateMachine {
    page: ViewPage,
    changed: bool,
}

impl ViewStateMachine {
    /// Boot state: Main page, full redraw pending.
    pub fn new() -> Self {
        Self {
            page: ViewPage::Main,
            changed: true,
        }
    }

    pub fn page(&self) -> ViewPage {
        self.page
    }

    pub fn needs_redraw(&self) -> bool {
        self.changed
    }

    /// Switch page. Selecting the current page changes nothing.
    pub fn select(&mut self, page: ViewPage) {
        if page != self.page {
            self.page = page;
            self.changed = true;
        }
    }

    /// Request a full redraw of the current page on the next render.
    pub fn invalidate(&mut self) {
        self.changed = true;
    }

    /// One main-loop pass: full draw if the page changed, then the page's
    /// dynamic fields.
    pub fn render(&mut self, screen: &mut dyn TextScreen, model: &ViewModel) {
        let desc = &PAGES[self.page as usize];
        if self.changed {
            (desc.draw)(screen, model);
            self.changed = false;
        }
        (desc.refresh)(screen, model);
    }

    /// Boot splash: the Main page typed out with the cursor visible.
    pub fn render_boot(&mut self, screen: &mut dyn TextScreen, model: &ViewModel, per_char_ms: u32) {
        self.page = ViewPage::Main;
        screen.set_cursor_visible(true);
        screen.set_typewriter(per_char_ms);
        (PAGES[ViewPage::Main as usize].draw)(screen, model);
        screen.set_cursor_visible(false);
        screen.set_typewriter(0);
        self.changed = false;
    }
}

impl Default for ViewStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_indexed_by_page() {
        for (i, desc) in PAGES.iter().enumerate() {
            assert_eq!(desc.page as usize, i);
        }
    }

    #[test]
    fn keys_and_pages_are_one_to_one() {
        for key in Key::ALL {
            assert_eq!(ViewPage::for_key(key).key(), key);
        }
    }

    #[test]
    fn reselecting_current_page_keeps_partial_refresh() {
        let mut v = ViewStateMachine::new();
        v.changed = false;
        v.select(ViewPage::Main);
        assert!(!v.needs_redraw());
        v.select(ViewPage::Extremes);
        assert!(v.needs_redraw());
    }
}
