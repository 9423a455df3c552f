//! Settings mode: a six-entry option list shown two rows at a time.
//!
//! | Ordinal | Option        | Group | Range              | Cell          |
//! |---------|---------------|-------|--------------------|---------------|
//! | 0       | upper limit   | 0     | lower+1 ..= 127    | row 0, col 10 |
//! | 1       | lower limit   | 0     | −55 ..= upper−1    | row 1, col 10 |
//! | 2       | resolution    | 1     | 0 ..= 3            | row 0, col 14 |
//! | 3       | fan gear step | 1     | 0 ..= 7            | row 1, col 14 |
//! | 4       | ringtone      | 2     | 0 ..= 3            | row 0, col 13 |
//! | 5       | volume        | 2     | display only       | row 1, col 8  |
//!
//! The selected row carries arrow markers in columns 0 and 15. Moving within
//! a group only moves the markers; moving to another group redraws the
//! screen.

pub mod editor;

pub use editor::{EditOutcome, Editor};

use crate::config::{
    FAN_GEAR_STEP_MAX, LIMIT_MAX, LIMIT_MIN, RESOLUTION_MAX, RINGTONE_MAX, Settings,
};
use crate::display::TextScreen;
use crate::display::format::{put_degrees, put_fmt};
use crate::input::NavAction;
use crate::pins::{GLYPH_ARROW_LEFT, GLYPH_ARROW_RIGHT, GLYPH_BLOCK};

// ---------------------------------------------------------------------------
// Option identity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SettingsOption {
    UpperLimit = 0,
    LowerLimit = 1,
    Resolution = 2,
    FanGearStep = 3,
    Ringtone = 4,
    Volume = 5,
}

impl SettingsOption {
    pub const COUNT: u8 = 6;

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            0 => Some(Self::UpperLimit),
            1 => Some(Self::LowerLimit),
            2 => Some(Self::Resolution),
            3 => Some(Self::FanGearStep),
            4 => Some(Self::Ringtone),
            5 => Some(Self::Volume),
            _ => None,
        }
    }

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Screen group: both options of a group share one screen.
    pub fn group(self) -> u8 {
        self.ordinal() / 2
    }

    /// Row within the group's screen.
    pub fn row(self) -> u8 {
        self.ordinal() & 1
    }

    pub fn next(self) -> Self {
        Self::from_ordinal((self.ordinal() + 1) % Self::COUNT).unwrap_or(Self::UpperLimit)
    }

    pub fn previous(self) -> Self {
        Self::from_ordinal((self.ordinal() + Self::COUNT - 1) % Self::COUNT)
            .unwrap_or(Self::UpperLimit)
    }

    pub fn descriptor(self) -> &'static OptionDescriptor {
        &OPTIONS[self as usize]
    }
}

// ---------------------------------------------------------------------------
// Descriptor table
// ---------------------------------------------------------------------------

/// How a value is rendered in its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueStyle {
    /// Three-column signed number followed by `°C`.
    Degrees,
    /// Single digit.
    Digit,
    /// One block glyph per unit.
    Bar,
}

impl ValueStyle {
    /// Columns the editor blanks while blinking.
    pub fn width(self) -> u8 {
        match self {
            Self::Degrees => 3,
            Self::Digit => 1,
            Self::Bar => 0,
        }
    }
}

/// Everything the group renderer and the editor need about one option.
pub struct OptionDescriptor {
    pub option: SettingsOption,
    pub label: &'static str,
    pub label_col: u8,
    pub style: ValueStyle,
    pub get: fn(&Settings) -> i16,
    pub set: fn(&mut Settings, i16),
    /// Editable range given the other settings; `None` if display only.
    pub range: fn(&Settings) -> Option<(i16, i16)>,
}

impl OptionDescriptor {
    /// Column of the value cell.
    pub fn value_col(&self) -> u8 {
        self.label_col + self.label.len() as u8
    }

    pub fn row(&self) -> u8 {
        self.option.row()
    }

    /// Draw `value` in the value cell (cursor must already be there).
    pub fn put_value(&self, scr: &mut dyn TextScreen, value: i16) {
        match self.style {
            ValueStyle::Degrees => {
                put_fmt(scr, format_args!("{:3}", value));
                put_degrees(scr);
            }
            ValueStyle::Digit => put_fmt(scr, format_args!("{}", value)),
            ValueStyle::Bar => {
                for _ in 0..value.max(0) {
                    scr.put_byte(GLYPH_BLOCK);
                }
            }
        }
    }
}

/// Indexed by ordinal.
pub static OPTIONS: [OptionDescriptor; SettingsOption::COUNT as usize] = [
    OptionDescriptor {
        option: SettingsOption::UpperLimit,
        label: "H Limit: ",
        label_col: 1,
        style: ValueStyle::Degrees,
        get: |s| i16::from(s.upper_limit),
        set: |s, v| s.upper_limit = v as i8,
        range: |s| Some((i16::from(s.lower_limit) + 1, i16::from(LIMIT_MAX))),
    },
    OptionDescriptor {
        option: SettingsOption::LowerLimit,
        label: "L Limit: ",
        label_col: 1,
        style: ValueStyle::Degrees,
        get: |s| i16::from(s.lower_limit),
        set: |s, v| s.lower_limit = v as i8,
        range: |s| Some((i16::from(LIMIT_MIN), i16::from(s.upper_limit) - 1)),
    },
    OptionDescriptor {
        option: SettingsOption::Resolution,
        label: "TResolution: ",
        label_col: 1,
        style: ValueStyle::Digit,
        get: |s| i16::from(s.resolution),
        set: |s, v| s.resolution = v as u8,
        range: |_| Some((0, i16::from(RESOLUTION_MAX))),
    },
    OptionDescriptor {
        option: SettingsOption::FanGearStep,
        label: "FGear' Step: ",
        label_col: 1,
        style: ValueStyle::Digit,
        get: |s| i16::from(s.fan_gear_step),
        set: |s, v| s.fan_gear_step = v as u8,
        range: |_| Some((0, i16::from(FAN_GEAR_STEP_MAX))),
    },
    OptionDescriptor {
        option: SettingsOption::Ringtone,
        label: "Ringtone:  ",
        label_col: 2,
        style: ValueStyle::Digit,
        get: |s| i16::from(s.ringtone),
        set: |s, v| s.ringtone = v as u8,
        range: |_| Some((0, i16::from(RINGTONE_MAX))),
    },
    OptionDescriptor {
        option: SettingsOption::Volume,
        label: "Volume:",
        label_col: 1,
        style: ValueStyle::Bar,
        get: |s| i16::from(s.volume),
        set: |s, v| s.volume = v as u8,
        range: |_| None,
    },
];

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Which option is selected, and what is on screen.
pub struct SettingsStateMachine {
    option: Option<SettingsOption>,
}

impl SettingsStateMachine {
    pub fn new() -> Self {
        Self { option: None }
    }

    pub fn option(&self) -> Option<SettingsOption> {
        self.option
    }

    /// Full redraw with the first option selected.
    pub fn show(&mut self, scr: &mut dyn TextScreen, settings: &Settings) {
        self.option = None;
        self.select(scr, settings, SettingsOption::UpperLimit);
    }

    /// Move the selection to `opt`, redrawing as little as possible.
    pub fn select(&mut self, scr: &mut dyn TextScreen, settings: &Settings, opt: SettingsOption) {
        if self.option == Some(opt) {
            return;
        }
        if self.option.map(SettingsOption::group) != Some(opt.group()) {
            draw_group(scr, settings, opt.group());
        }
        draw_markers(scr, opt.row());
        self.option = Some(opt);
    }

    /// Apply a browsing action. `Edit` is handled by the caller.
    pub fn navigate(
        &mut self,
        scr: &mut dyn TextScreen,
        settings: &Settings,
        action: NavAction,
    ) -> Option<SettingsOption> {
        let target = match (action, self.option) {
            (NavAction::Edit, _) => return None,
            (NavAction::First, _) | (NavAction::Next, None) => SettingsOption::UpperLimit,
            (NavAction::Next, Some(o)) => o.next(),
            (NavAction::Previous, None) => SettingsOption::Volume,
            (NavAction::Previous, Some(o)) => o.previous(),
        };
        self.select(scr, settings, target);
        Some(target)
    }
}

impl Default for SettingsStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

fn draw_group(scr: &mut dyn TextScreen, settings: &Settings, group: u8) {
    scr.clear();
    for desc in OPTIONS.iter().filter(|d| d.option.group() == group) {
        scr.set_cursor(desc.row(), desc.label_col);
        scr.put_str(desc.label);
        desc.put_value(scr, (desc.get)(settings));
    }
}

fn draw_markers(scr: &mut dyn TextScreen, selected_row: u8) {
    for row in 0..2 {
        let (left, right) = if row == selected_row {
            (GLYPH_ARROW_RIGHT, GLYPH_ARROW_LEFT)
        } else {
            (b' ', b' ')
        };
        scr.set_cursor(row, 0);
        scr.put_byte(left);
        scr.set_cursor(row, 15);
        scr.put_byte(right);
    }
}
