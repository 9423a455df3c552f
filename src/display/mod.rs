//! 2x16 character display.
//!
//! [`TextScreen`] is what the view and settings machines draw on. [`Lcd`]
//! implements it for an HD44780-class controller reached through a
//! [`DisplayPort`]; tests and the simulator implement it over a framebuffer.
//!
//! | Command        | Byte          |
//! |----------------|---------------|
//! | clear          | `0x01`        |
//! | entry mode     | `0x06`        |
//! | display on     | `0x0C` / `0x0E` with cursor |
//! | function set   | `0x38` (8-bit, 2 lines, 5x7) |
//! | DDRAM address  | `0x80 \| col` row 0, `0xC0 \| col` row 1 |

pub mod format;

use embedded_hal::delay::DelayNs;

use crate::app::ports::DisplayPort;

pub const ROWS: u8 = 2;
pub const COLS: u8 = 16;

/// Character-cell drawing surface.
pub trait TextScreen {
    fn clear(&mut self);

    /// Move the write position. Rows and columns are zero-based.
    fn set_cursor(&mut self, row: u8, col: u8);

    /// Write one glyph at the cursor and advance it.
    fn put_byte(&mut self, byte: u8);

    fn put_str(&mut self, s: &str) {
        for b in s.bytes() {
            self.put_byte(b);
        }
    }

    fn set_cursor_visible(&mut self, visible: bool);

    /// Per-character delay for the boot typewriter effect; 0 disables it.
    fn set_typewriter(&mut self, per_char_ms: u32);
}

// ---------------------------------------------------------------------------
// HD44780 driver
// ---------------------------------------------------------------------------

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_INCREMENT: u8 = 0x06;
const CMD_DISPLAY_ON: u8 = 0x0C;
const CMD_DISPLAY_ON_CURSOR: u8 = 0x0E;
const CMD_FUNCTION_8BIT_2LINE: u8 = 0x38;
const CMD_DDRAM_ROW0: u8 = 0x80;
const CMD_DDRAM_ROW1: u8 = 0xC0;

/// Clear-display execution time.
const CLEAR_SETTLE_US: u32 = 1_640;

pub struct Lcd<P, D> {
    port: P,
    delay: D,
    typewriter_ms: u32,
}

impl<P: DisplayPort, D: DelayNs> Lcd<P, D> {
    pub fn new(port: P, delay: D) -> Self {
        Self {
            port,
            delay,
            typewriter_ms: 0,
        }
    }

    /// Power-on initialisation: 8-bit bus, cursor hidden, blank screen.
    pub fn init(&mut self) {
        self.port.write_command(CMD_FUNCTION_8BIT_2LINE);
        self.port.write_command(CMD_DISPLAY_ON);
        self.port.write_command(CMD_ENTRY_INCREMENT);
        self.clear();
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn release(self) -> (P, D) {
        (self.port, self.delay)
    }
}

impl<P: DisplayPort, D: DelayNs> TextScreen for Lcd<P, D> {
    fn clear(&mut self) {
        self.port.write_command(CMD_CLEAR);
        self.delay.delay_us(CLEAR_SETTLE_US);
    }

    fn set_cursor(&mut self, row: u8, col: u8) {
        let base = if row == 0 { CMD_DDRAM_ROW0 } else { CMD_DDRAM_ROW1 };
        self.port.write_command(base | (col & 0x3F));
    }

    fn put_byte(&mut self, byte: u8) {
        self.port.write_data(byte);
        if self.typewriter_ms > 0 {
            self.delay.delay_ms(self.typewriter_ms);
        }
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.port.write_command(if visible {
            CMD_DISPLAY_ON_CURSOR
        } else {
            CMD_DISPLAY_ON
        });
    }

    fn set_typewriter(&mut self, per_char_ms: u32) {
        self.typewriter_ms = per_char_ms;
    }
}
