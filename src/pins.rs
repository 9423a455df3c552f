//! Keypad bus layout for the ThermoWatch main board.
//!
//! Single source of truth: every decoder references this module rather than
//! hard-coding bus patterns.
//!
//! The keypad shares one 8-bit port. Lines are active low:
//!
//! | Bit | Line | Function                           |
//! |-----|------|------------------------------------|
//! | 7   | P37  | K1: page 1 / enter editor / cancel |
//! | 6   | P36  | K2: page 2 / next option / +1      |
//! | 5   | P35  | K3: page 3 / previous option / −1  |
//! | 4   | P34  | K4: page 4 / first option / confirm|
//! | 2   | P32  | mode toggle (INT0, falling edge)    |
//! | 0,1,3 | -  | not keypad lines                    |

// ---------------------------------------------------------------------------
// Key lines
// ---------------------------------------------------------------------------

/// OR-mask applied to every key sample: ignores P30..P33.
pub const KEY_SAMPLE_MASK: u8 = 0x0F;

pub const KEY1_CODE: u8 = 0x7F;
pub const KEY2_CODE: u8 = 0xBF;
pub const KEY3_CODE: u8 = 0xDF;
pub const KEY4_CODE: u8 = 0xEF;
/// Every key line high.
pub const RELEASED_CODE: u8 = 0xFF;
/// Every key line low, treated as noise.
pub const ALL_PRESSED_CODE: u8 = 0x0F;

// ---------------------------------------------------------------------------
// Mode toggle line
// ---------------------------------------------------------------------------

/// OR-mask applied to mode-toggle samples: ignores P30 and P31 only, so a
/// key held together with the toggle line breaks the pattern.
pub const TOGGLE_SAMPLE_MASK: u8 = 0x03;
/// Toggle line low and nothing else.
pub const TOGGLE_CODE: u8 = 0xFB;

// ---------------------------------------------------------------------------
// LCD glyphs
// ---------------------------------------------------------------------------

/// Right-pointing arrow in the HD44780 A00 ROM.
pub const GLYPH_ARROW_RIGHT: u8 = 0x7E;
/// Left-pointing arrow.
pub const GLYPH_ARROW_LEFT: u8 = 0x7F;
/// Degree sign.
pub const GLYPH_DEGREE: u8 = 0xDF;
/// Full block, used for the volume bar.
pub const GLYPH_BLOCK: u8 = 0xFF;
