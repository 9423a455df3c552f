//! Fixed-width field formatting for the 16-column screen.

use core::fmt::{self, Write};

use heapless::String;

use super::{COLS, TextScreen};
use crate::monitor::Temperature;
use crate::pins::GLYPH_DEGREE;
use crate::tick::clock::ClockReading;

/// Format into a row-sized buffer and write it at the cursor.
///
/// Output longer than a row is cut at the row width.
pub fn put_fmt(screen: &mut dyn TextScreen, args: fmt::Arguments<'_>) {
    let mut line = String::<{ COLS as usize }>::new();
    // Overflow only truncates.
    let _ = TruncatingWriter(&mut line).write_fmt(args);
    screen.put_str(&line);
}

/// `°C`.
pub fn put_degrees(screen: &mut dyn TextScreen) {
    screen.put_byte(GLYPH_DEGREE);
    screen.put_byte(b'C');
}

/// A temperature that may not have been read yet; `{:5}` renders ` --.-`.
#[derive(Debug, Clone, Copy)]
pub struct MaybeTemp(pub Option<Temperature>);

impl fmt::Display for MaybeTemp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(t) => fmt::Display::fmt(&t, f),
            None => f.pad_integral(true, "", "--.-"),
        }
    }
}

/// Violation clock as `mm`m`ss`.`t`s`, minutes capped at 99.
#[derive(Debug, Clone, Copy)]
pub struct ClockField(pub ClockReading);

impl fmt::Display for ClockField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}m{:02}.{}s",
            self.0.minutes.min(99),
            self.0.seconds,
            self.0.tenths()
        )
    }
}

struct TruncatingWriter<'a, const N: usize>(&'a mut String<N>);

impl<const N: usize> Write for TruncatingWriter<'_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            self.0.push(c).map_err(|()| fmt::Error)?;
        }
        Ok(())
    }
}
