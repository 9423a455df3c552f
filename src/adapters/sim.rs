//! Host simulation of the appliance's peripherals.
//!
//! | Adapter         | Implements          | Simulates                           |
//! |-----------------|---------------------|-------------------------------------|
//! | `SimDisplay`    | DisplayPort         | HD44780 DDRAM, rendered to a string |
//! | `SimSensor`     | SensorPort          | one-wire sensor scratchpad + EEPROM |
//! | `SimKeyBus`     | KeyBus              | keypad / mode-line port             |
//! | `SimPin`        | OutputPin           | motor and relay lines               |
//! | `StdDelay`      | DelayNs             | busy-wait via `thread::sleep`       |
//! | `SimTickSource` | TickSource          | auto-reload timer on a thread       |
//!
//! Every handle is cheap to clone and shares its state, so the simulator's
//! stdin thread can poke the same key lines and temperature the controller
//! reads.

use std::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI16, AtomicU8, AtomicU32, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};

use crate::app::ports::{DisplayPort, KeyBus, SensorPort};
use crate::config::Settings;
use crate::display::{COLS, ROWS};
use crate::error::SensorError;
use crate::pins::{GLYPH_ARROW_LEFT, GLYPH_ARROW_RIGHT, GLYPH_BLOCK, GLYPH_DEGREE};
use crate::sensors::{StoredConfig, decode_scratchpad, encode_scratchpad};
use crate::tick::TickSource;

// ── Display ───────────────────────────────────────────────────

#[derive(Debug)]
struct Ddram {
    cells: [[u8; COLS as usize]; ROWS as usize],
    row: usize,
    col: usize,
    cursor_visible: bool,
}

/// HD44780 model: interprets the command subset the driver uses.
#[derive(Debug, Clone)]
pub struct SimDisplay {
    ram: Arc<Mutex<Ddram>>,
}

impl SimDisplay {
    pub fn new() -> Self {
        Self {
            ram: Arc::new(Mutex::new(Ddram {
                cells: [[b' '; COLS as usize]; ROWS as usize],
                row: 0,
                col: 0,
                cursor_visible: false,
            })),
        }
    }

    /// Both rows, with the ROM glyphs the firmware uses mapped to Unicode.
    pub fn render(&self) -> String {
        let ram = self.ram.lock().unwrap_or_else(|p| p.into_inner());
        ram.cells
            .iter()
            .map(|row| row.iter().map(|&b| glyph(b)).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for SimDisplay {
    fn default() -> Self {
        Self::new()
    }
}

fn glyph(b: u8) -> char {
    match b {
        GLYPH_DEGREE => '°',
        GLYPH_ARROW_RIGHT => '→',
        GLYPH_ARROW_LEFT => '←',
        GLYPH_BLOCK => '█',
        0x20..=0x7D => char::from(b),
        _ => '?',
    }
}

impl DisplayPort for SimDisplay {
    fn write_command(&mut self, cmd: u8) {
        let mut ram = self.ram.lock().unwrap_or_else(|p| p.into_inner());
        match cmd {
            0x01 => {
                ram.cells = [[b' '; COLS as usize]; ROWS as usize];
                ram.row = 0;
                ram.col = 0;
            }
            0x0C => ram.cursor_visible = false,
            0x0E => ram.cursor_visible = true,
            c if c & 0x80 != 0 => {
                ram.row = usize::from(c & 0x40 != 0);
                ram.col = usize::from(c & 0x3F);
            }
            _ => {}
        }
    }

    fn write_data(&mut self, data: u8) {
        let mut ram = self.ram.lock().unwrap_or_else(|p| p.into_inner());
        let (row, col) = (ram.row, ram.col);
        if col < COLS as usize {
            ram.cells[row][col] = data;
        }
        ram.col += 1;
    }
}

// ── Sensor ────────────────────────────────────────────────────

#[derive(Debug)]
struct SensorRegs {
    scratch: [u8; 3],
    eeprom: [u8; 3],
    persists: u32,
}

/// One-wire sensor model. Reads go through the real scratchpad codec.
#[derive(Debug, Clone)]
pub struct SimSensor {
    raw: Arc<AtomicI16>,
    regs: Arc<Mutex<SensorRegs>>,
}

impl SimSensor {
    pub fn new(initial_celsius: f32) -> Self {
        let stored = StoredConfig::from_settings(&Settings::default()).encode();
        let sensor = Self {
            raw: Arc::new(AtomicI16::new(0)),
            regs: Arc::new(Mutex::new(SensorRegs {
                scratch: stored,
                eeprom: stored,
                persists: 0,
            })),
        };
        sensor.set_celsius(initial_celsius);
        sensor
    }

    pub fn set_celsius(&self, celsius: f32) {
        let raw = (celsius * 16.0).round().clamp(-55.0 * 16.0, 125.0 * 16.0) as i16;
        self.raw.store(raw, Ordering::Relaxed);
    }

    pub fn persist_count(&self) -> u32 {
        self.regs.lock().unwrap_or_else(|p| p.into_inner()).persists
    }
}

impl SensorPort for SimSensor {
    fn start_conversion(&mut self) -> Result<(), SensorError> {
        Ok(())
    }

    fn read_raw(&mut self) -> Result<i16, SensorError> {
        let scratch = self.regs.lock().unwrap_or_else(|p| p.into_inner()).scratch;
        let config = StoredConfig::decode(scratch)?;
        let pad = encode_scratchpad(self.raw.load(Ordering::Relaxed), &config);
        decode_scratchpad(&pad).map(|(raw, _)| raw)
    }

    fn stored_config(&mut self) -> Result<StoredConfig, SensorError> {
        let regs = self.regs.lock().unwrap_or_else(|p| p.into_inner());
        StoredConfig::decode(regs.eeprom)
    }

    fn write_config(&mut self, config: StoredConfig) -> Result<(), SensorError> {
        self.regs.lock().unwrap_or_else(|p| p.into_inner()).scratch = config.encode();
        Ok(())
    }

    fn persist(&mut self) -> Result<(), SensorError> {
        let mut regs = self.regs.lock().unwrap_or_else(|p| p.into_inner());
        regs.eeprom = regs.scratch;
        regs.persists += 1;
        Ok(())
    }
}

// ── Key bus ───────────────────────────────────────────────────

/// Port latch shared by every clone; lines are active low.
#[derive(Debug, Clone)]
pub struct SimKeyBus {
    lines: Arc<AtomicU8>,
}

impl SimKeyBus {
    pub fn new() -> Self {
        Self {
            lines: Arc::new(AtomicU8::new(0xFF)),
        }
    }

    /// Pull the lines in `mask` low.
    pub fn press(&self, mask: u8) {
        self.lines.fetch_and(!mask, Ordering::AcqRel);
    }

    /// Let the lines in `mask` float high.
    pub fn release(&self, mask: u8) {
        self.lines.fetch_or(mask, Ordering::AcqRel);
    }
}

impl Default for SimKeyBus {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyBus for SimKeyBus {
    fn sample(&mut self) -> u8 {
        self.lines.load(Ordering::Acquire)
    }
}

// ── Output pins ───────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct SimPin {
    high: Arc<AtomicBool>,
}

impl SimPin {
    pub fn is_high(&self) -> bool {
        self.high.load(Ordering::Relaxed)
    }
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.high.store(false, Ordering::Relaxed);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.high.store(true, Ordering::Relaxed);
        Ok(())
    }
}

// ── Delay ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(u64::from(ns)));
    }
}

// ── Tick source ───────────────────────────────────────────────

/// Runs the tick callback from a thread, one burst per 10 ms.
///
/// Host sleeps are far coarser than a 278 µs period, so ticks are delivered
/// in bursts that add up to the right rate.
#[derive(Debug, Default)]
pub struct SimTickSource {
    ticks: Arc<AtomicU32>,
    stop: Arc<AtomicBool>,
}

impl SimTickSource {
    const BURST_PERIOD_NS: u32 = 10_000_000;

    pub fn new() -> Self {
        Self::default()
    }
}

impl TickSource for SimTickSource {
    fn register(&mut self, period_ns: u32, callback: fn()) {
        let burst = (Self::BURST_PERIOD_NS / period_ns.max(1)).max(1);
        let ticks = Arc::clone(&self.ticks);
        let stop = Arc::clone(&self.stop);
        thread::spawn(move || {
            while !stop.load(Ordering::Relaxed) {
                for _ in 0..burst {
                    callback();
                }
                ticks.fetch_add(burst, Ordering::Relaxed);
                thread::sleep(Duration::from_nanos(u64::from(Self::BURST_PERIOD_NS)));
            }
        });
    }

    fn elapsed_ticks(&self) -> u32 {
        self.ticks.load(Ordering::Relaxed)
    }
}

impl Drop for SimTickSource {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}
