//! Mock hardware adapters for integration tests.
//!
//! Each mock records what the core did to it so tests can assert on the
//! outcome without real buses, pins or timers.

use std::collections::VecDeque;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin};

use thermowatch::app::events::ApplianceEvent;
use thermowatch::app::ports::{DisplayPort, EventSink, KeyBus, SensorPort};
use thermowatch::config::Settings;
use thermowatch::error::SensorError;
use thermowatch::sensors::StoredConfig;

// ── Display ───────────────────────────────────────────────────

/// HD44780 DDRAM model: clear, DDRAM address and data writes.
pub struct MockDisplay {
    pub cells: [[u8; 16]; 2],
    row: usize,
    col: usize,
    pub clears: u32,
}

#[allow(dead_code)]
impl MockDisplay {
    pub fn new() -> Self {
        Self {
            cells: [[b' '; 16]; 2],
            row: 0,
            col: 0,
            clears: 0,
        }
    }

    /// One row with the degree glyph shown as `°` and arrows as `>` / `<`.
    pub fn row(&self, row: usize) -> String {
        self.cells[row]
            .iter()
            .map(|&b| match b {
                0xDF => '°',
                0x7E => '>',
                0x7F => '<',
                0xFF => '#',
                b => char::from(b),
            })
            .collect()
    }
}

impl Default for MockDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayPort for MockDisplay {
    fn write_command(&mut self, cmd: u8) {
        if cmd == 0x01 {
            self.cells = [[b' '; 16]; 2];
            self.row = 0;
            self.col = 0;
            self.clears += 1;
        } else if cmd & 0x80 != 0 {
            self.row = usize::from(cmd & 0x40 != 0);
            self.col = usize::from(cmd & 0x3F);
        }
    }

    fn write_data(&mut self, data: u8) {
        if self.col < 16 {
            self.cells[self.row][self.col] = data;
        }
        self.col += 1;
    }
}

// ── Keys ──────────────────────────────────────────────────────

pub const K1: u8 = 0x7F;
pub const K2: u8 = 0xBF;
pub const K3: u8 = 0xDF;
pub const K4: u8 = 0xEF;
pub const RELEASED: u8 = 0xFF;
pub const TOGGLE: u8 = 0xFB;

/// Replays queued samples, then reads `idle` forever.
pub struct ScriptedKeys {
    queue: VecDeque<u8>,
    idle: u8,
}

#[allow(dead_code)]
impl ScriptedKeys {
    pub fn new() -> Self {
        Self::idle_at(RELEASED)
    }

    pub fn idle_at(idle: u8) -> Self {
        Self {
            queue: VecDeque::new(),
            idle,
        }
    }

    /// A clean press and release: two samples each, matching the
    /// sample-then-confirm pattern of every decoder.
    pub fn tap(&mut self, code: u8) -> &mut Self {
        self.queue.extend([code, code, RELEASED, RELEASED]);
        self
    }

    pub fn push(&mut self, samples: &[u8]) -> &mut Self {
        self.queue.extend(samples.iter().copied());
        self
    }

    pub fn is_drained(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Default for ScriptedKeys {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyBus for ScriptedKeys {
    fn sample(&mut self) -> u8 {
        self.queue.pop_front().unwrap_or(self.idle)
    }
}

// ── Sensor ────────────────────────────────────────────────────

/// Sensor with a settable reading and an observable EEPROM.
pub struct MockSensor {
    pub raw: i16,
    pub scratch: StoredConfig,
    pub eeprom: StoredConfig,
    pub conversions: u32,
    pub persists: u32,
    pub fail_reads: bool,
    pub fail_persist: bool,
}

#[allow(dead_code)]
impl MockSensor {
    pub fn at_celsius(celsius: i16) -> Self {
        let stored = StoredConfig::from_settings(&Settings::default());
        Self {
            raw: celsius * 16,
            scratch: stored,
            eeprom: stored,
            conversions: 0,
            persists: 0,
            fail_reads: false,
            fail_persist: false,
        }
    }
}

impl SensorPort for MockSensor {
    fn start_conversion(&mut self) -> Result<(), SensorError> {
        self.conversions += 1;
        Ok(())
    }

    fn read_raw(&mut self) -> Result<i16, SensorError> {
        if self.fail_reads {
            Err(SensorError::NoDevice)
        } else {
            Ok(self.raw)
        }
    }

    fn stored_config(&mut self) -> Result<StoredConfig, SensorError> {
        Ok(self.eeprom)
    }

    fn write_config(&mut self, config: StoredConfig) -> Result<(), SensorError> {
        self.scratch = config;
        Ok(())
    }

    fn persist(&mut self) -> Result<(), SensorError> {
        if self.fail_persist {
            return Err(SensorError::PersistFailed);
        }
        self.eeprom = self.scratch;
        self.persists += 1;
        Ok(())
    }
}

// ── Delay ─────────────────────────────────────────────────────

/// Records requested waits without sleeping.
#[derive(Default)]
pub struct RecordingDelay {
    pub total_ns: u64,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}

// ── Pins ──────────────────────────────────────────────────────

/// Output line that remembers its level; `fail` makes every write error.
#[derive(Default)]
pub struct RecordingPin {
    pub high: bool,
    pub rising_edges: u32,
    pub fail: bool,
}

#[allow(dead_code)]
impl RecordingPin {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

impl ErrorType for RecordingPin {
    type Error = ErrorKind;
}

impl OutputPin for RecordingPin {
    fn set_low(&mut self) -> Result<(), ErrorKind> {
        if self.fail {
            return Err(ErrorKind::Other);
        }
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), ErrorKind> {
        if self.fail {
            return Err(ErrorKind::Other);
        }
        if !self.high {
            self.rising_edges += 1;
        }
        self.high = true;
        Ok(())
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<ApplianceEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &ApplianceEvent) {
        self.events.push(*event);
    }
}
