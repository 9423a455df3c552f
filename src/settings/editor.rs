//! In-place value editor.
//!
//! Blocks the main loop until the user confirms or cancels. The value cell
//! blinks between blanks and the staged value; tier-3 keys step the staged
//! value inside the option's range. Whatever the outcome, the cell ends
//! showing the authoritative value.
//!
//! While the session is open the shared `editing` flag is set, which makes
//! the mode toggle ignore long presses.

use embedded_hal::delay::DelayNs;
use log::debug;

use super::{OptionDescriptor, SettingsOption};
use crate::app::ports::KeyBus;
use crate::config::{Settings, TimingConfig};
use crate::display::TextScreen;
use crate::input::{EditInput, EditKeys};
use crate::shared::SharedState;

/// How an edit session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Committed(i16),
    Cancelled,
    /// The option is display only; no session was opened.
    NotEditable,
}

pub struct Editor {
    keys: EditKeys,
    blink_polls: u8,
}

impl Editor {
    pub fn new(timing: &TimingConfig) -> Self {
        Self {
            keys: EditKeys::new(timing),
            blink_polls: timing.blink_polls.max(1),
        }
    }

    /// Run one edit session on `option`.
    pub fn run(
        &mut self,
        option: SettingsOption,
        settings: &mut Settings,
        scr: &mut dyn TextScreen,
        bus: &mut impl KeyBus,
        delay: &mut impl DelayNs,
        shared: &SharedState,
    ) -> EditOutcome {
        let desc = option.descriptor();
        let Some((min, max)) = (desc.range)(settings) else {
            debug!("editor: {:?} is display only", option);
            return EditOutcome::NotEditable;
        };

        shared.set_editing(true);
        self.keys.reset();
        let mut staged = (desc.get)(settings);
        let mut countdown = self.blink_polls;
        let mut blank = false;

        let outcome = loop {
            countdown -= 1;
            if countdown == 0 {
                countdown = self.blink_polls;
                blank = !blank;
            }
            paint(desc, scr, staged, blank);

            match self.keys.poll(bus, delay) {
                EditInput::Idle => {}
                EditInput::Increment if staged < max => staged += 1,
                EditInput::Decrement if staged > min => staged -= 1,
                EditInput::Increment | EditInput::Decrement => {}
                EditInput::Confirm => {
                    (desc.set)(settings, staged);
                    break EditOutcome::Committed(staged);
                }
                EditInput::Cancel => break EditOutcome::Cancelled,
            }
        };

        paint(desc, scr, (desc.get)(settings), false);
        shared.set_editing(false);
        outcome
    }
}

fn paint(desc: &OptionDescriptor, scr: &mut dyn TextScreen, value: i16, blank: bool) {
    scr.set_cursor(desc.row(), desc.value_col());
    if blank {
        for _ in 0..desc.style.width() {
            scr.put_byte(b' ');
        }
    } else {
        desc.put_value(scr, value);
    }
}
