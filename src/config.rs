//! System configuration parameters.
//!
//! Two records live here:
//!
//! - [`TimingConfig`]: calibration constants of the timing core. Every period,
//!   threshold and delay the firmware uses is named here; nothing is inlined.
//! - [`Settings`]: the user-editable quantities. Limits and resolution are
//!   loaded from (and persisted to) the sensor's own nonvolatile registers;
//!   the rest start from defaults at power-on.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Ranges
// ---------------------------------------------------------------------------

/// Lowest temperature limit the sensor can represent (°C).
pub const LIMIT_MIN: i8 = -55;
/// Highest temperature limit (°C).
pub const LIMIT_MAX: i8 = 127;
/// Sensor resolutions 0..=3 (9..=12 bit).
pub const RESOLUTION_MAX: u8 = 3;
pub const FAN_GEAR_STEP_MAX: u8 = 7;
pub const RINGTONE_MAX: u8 = 3;
pub const VOLUME_MAX: u8 = 7;

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// Calibration constants of the tick-driven timing core.
///
/// The defaults describe an 8-bit auto-reload timer overflowing every 256
/// machine cycles at 11.0592 MHz / 12, i.e. 3.6 ticks per millisecond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    // --- Tick source ---
    /// Tick period in nanoseconds (≈ 1/3.6 ms).
    pub tick_period_ns: u32,
    /// Ticks per hundredth of a second.
    pub ticks_per_hundredth: u8,

    // --- Conversion pacing ---
    /// Ticks the sensor needs per conversion, indexed by resolution 0..=3.
    pub conversion_ticks: [u16; 4],
    /// Same table in milliseconds, for the blocking wait at boot.
    pub conversion_ms: [u16; 4],

    // --- Fan duty ---
    /// Software PWM carrier period in ticks (≈ 1 s).
    pub duty_carrier_ticks: u16,
    /// Number of equal bands the carrier is split into.
    pub duty_bands: u8,

    // --- Monitor ---
    /// Ticks credited to the active violation clock for each blocking read.
    pub read_compensation_ticks: u8,
    /// Guard busy-wait after restarting a conversion (µs).
    pub read_guard_us: u32,

    // --- Keys ---
    /// Delay before the confirming re-sample of a key transition (ms).
    pub debounce_ms: u32,
    /// Number of polls the mode-toggle line must stay low.
    pub long_press_polls: u8,
    /// Spacing between mode-toggle polls (ms).
    pub long_press_spacing_ms: u32,
    /// Polls before an autorepeat key starts repeating.
    pub repeat_warmup_polls: u16,
    /// Polls between repeats once warmed up.
    pub repeat_interval_polls: u16,

    // --- Display ---
    /// Editor polls per blink phase.
    pub blink_polls: u8,
    /// Per-character delay of the boot typewriter effect (ms).
    pub typewriter_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_period_ns: 277_778,
            ticks_per_hundredth: 36,

            // 93.75 / 187.5 / 375 / 750 ms at 3.6 ticks per ms
            conversion_ticks: [338, 675, 1350, 2700],
            conversion_ms: [94, 188, 375, 750],

            duty_carrier_ticks: 3600,
            duty_bands: 4,

            // ~5373 machine cycles inside the masked read ≈ 21 overflows
            read_compensation_ticks: 21,
            read_guard_us: 90,

            debounce_ms: 10,
            long_press_polls: 20,
            long_press_spacing_ms: 50,
            repeat_warmup_polls: 80,
            repeat_interval_polls: 16,

            blink_polls: 24,
            typewriter_ms: 40,
        }
    }
}

impl TimingConfig {
    /// Conversion threshold in ticks for a resolution (clamped to the table).
    pub fn conversion_threshold(&self, resolution: u8) -> u16 {
        self.conversion_ticks[usize::from(resolution.min(RESOLUTION_MAX))]
    }

    /// Width of one duty band in ticks.
    pub fn duty_band_ticks(&self) -> u16 {
        self.duty_carrier_ticks / u16::from(self.duty_bands.max(1))
    }
}

// ---------------------------------------------------------------------------
// User settings
// ---------------------------------------------------------------------------

/// User-editable quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Upper temperature limit (°C). Above it the fan runs.
    pub upper_limit: i8,
    /// Lower temperature limit (°C). Below it the relay closes.
    pub lower_limit: i8,
    /// Sensor resolution index 0..=3.
    pub resolution: u8,
    /// Degrees per fan gear above the upper limit.
    pub fan_gear_step: u8,
    /// Boot ringtone index.
    pub ringtone: u8,
    /// Buzzer volume 0..=7 (display only).
    pub volume: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            upper_limit: 30,
            lower_limit: 10,
            resolution: RESOLUTION_MAX,
            fan_gear_step: 1,
            ringtone: 0,
            volume: 4,
        }
    }
}

impl Settings {
    /// Check every field against its range and the limit ordering.
    pub fn validate(&self) -> Result<()> {
        if !(LIMIT_MIN..=LIMIT_MAX).contains(&self.upper_limit) {
            return Err(Error::Config("upper limit out of range"));
        }
        if !(LIMIT_MIN..=LIMIT_MAX).contains(&self.lower_limit) {
            return Err(Error::Config("lower limit out of range"));
        }
        if self.upper_limit <= self.lower_limit {
            return Err(Error::Config("upper limit must exceed lower limit"));
        }
        if self.resolution > RESOLUTION_MAX {
            return Err(Error::Config("resolution out of range"));
        }
        if self.fan_gear_step > FAN_GEAR_STEP_MAX {
            return Err(Error::Config("fan gear step out of range"));
        }
        if self.ringtone > RINGTONE_MAX {
            return Err(Error::Config("ringtone out of range"));
        }
        if self.volume > VOLUME_MAX {
            return Err(Error::Config("volume out of range"));
        }
        Ok(())
    }
}
