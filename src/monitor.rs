//! Temperature monitoring: reading, extremes, limit violations, fan and relay
//! demand.
//!
//! Runs on the main loop whenever the pacer has raised "conversion complete".
//! The bus transaction is timing-critical, so the read, the conversion
//! restart and a short guard wait run with interrupts masked. The ticks lost
//! meanwhile are credited back to whichever violation clock is running.
//!
//! | Condition              | Effect                                          |
//! |------------------------|-------------------------------------------------|
//! | reading > upper limit  | above-upper, fan on, gear from excess, +21 ticks |
//! | otherwise              | above-upper cleared, fan off, gear 0            |
//! | reading < lower limit  | below-lower, relay closed, +21 ticks            |
//! | otherwise              | below-lower cleared, relay open                 |

use core::fmt;

use embedded_hal::delay::DelayNs;
use log::{debug, warn};

use crate::app::ports::SensorPort;
use crate::config::{Settings, TimingConfig};
use crate::error::{Error, Result};
use crate::shared::SharedState;

// ---------------------------------------------------------------------------
// Temperature
// ---------------------------------------------------------------------------

/// Sensor temperature in 1/16 °C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Temperature(i16);

impl Temperature {
    /// Raw sensor units per degree.
    pub const UNITS_PER_DEGREE: i16 = 16;

    pub const fn from_raw(raw: i16) -> Self {
        Self(raw)
    }

    pub const fn from_degrees(degrees: i8) -> Self {
        Self(degrees as i16 * Self::UNITS_PER_DEGREE)
    }

    pub const fn raw(self) -> i16 {
        self.0
    }

    /// Tenths of a degree, rounded half away from zero.
    pub fn tenths(self) -> i32 {
        let scaled = i32::from(self.0) * 10;
        let half = i32::from(Self::UNITS_PER_DEGREE / 2);
        if scaled >= 0 {
            (scaled + half) / i32::from(Self::UNITS_PER_DEGREE)
        } else {
            (scaled - half) / i32::from(Self::UNITS_PER_DEGREE)
        }
    }
}

impl fmt::Display for Temperature {
    /// One fractional digit, honouring width (`{:5}` → ` 23.4`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tenths = self.tenths();
        let abs = tenths.unsigned_abs();
        let mut digits = heapless::String::<8>::new();
        fmt::Write::write_fmt(&mut digits, format_args!("{}.{}", abs / 10, abs % 10))?;
        f.pad_integral(tenths >= 0, "", &digits)
    }
}

// ---------------------------------------------------------------------------
// Extremes
// ---------------------------------------------------------------------------

/// Highest and lowest reading since power-on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extremes {
    pub highest: Temperature,
    pub lowest: Temperature,
}

impl Extremes {
    pub fn seeded(first: Temperature) -> Self {
        Self {
            highest: first,
            lowest: first,
        }
    }

    /// Widen to include `t`. Returns true if either bound moved.
    pub fn update(&mut self, t: Temperature) -> bool {
        let mut moved = false;
        if t > self.highest {
            self.highest = t;
            moved = true;
        }
        if t < self.lowest {
            self.lowest = t;
            moved = true;
        }
        moved
    }
}

// ---------------------------------------------------------------------------
// Gear law
// ---------------------------------------------------------------------------

/// Fan gear for a reading above the upper limit.
///
/// `ceil(excess / step) + 1`, computed in sensor units. A step of zero
/// selects the top gear.
pub fn fan_gear(reading: Temperature, upper_limit: i8, step: u8, top_gear: u8) -> u8 {
    let excess = i32::from(reading.raw()) - i32::from(Temperature::from_degrees(upper_limit).raw());
    if excess <= 0 {
        return 0;
    }
    if step == 0 {
        return top_gear;
    }
    let step_units = i32::from(step) * i32::from(Temperature::UNITS_PER_DEGREE);
    let gear = (excess + step_units - 1) / step_units + 1;
    u8::try_from(gear).unwrap_or(u8::MAX)
}

// ---------------------------------------------------------------------------
// Monitor
// ---------------------------------------------------------------------------

/// Outcome of one processed conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reading {
    pub temperature: Temperature,
    pub above_upper: bool,
    pub below_lower: bool,
    pub fan_gear: u8,
    /// `above_upper` differs from the previous reading.
    pub upper_changed: bool,
    /// `below_lower` differs from the previous reading.
    pub lower_changed: bool,
    /// The extremes moved.
    pub extremes_changed: bool,
}

/// Consumes finished conversions and maintains the derived state.
pub struct TemperatureMonitor {
    timing: TimingConfig,
    latest: Option<Temperature>,
    extremes: Option<Extremes>,
}

impl TemperatureMonitor {
    pub fn new(timing: TimingConfig) -> Self {
        Self {
            timing,
            latest: None,
            extremes: None,
        }
    }

    pub fn latest(&self) -> Option<Temperature> {
        self.latest
    }

    pub fn extremes(&self) -> Option<Extremes> {
        self.extremes
    }

    /// Boot read: start a conversion, wait it out, then process it.
    pub fn prime(
        &mut self,
        sensor: &mut impl SensorPort,
        delay: &mut impl DelayNs,
        shared: &SharedState,
        settings: &Settings,
    ) -> Result<Reading> {
        sensor.start_conversion()?;
        let res = usize::from(settings.resolution.min(crate::config::RESOLUTION_MAX));
        delay.delay_ms(u32::from(self.timing.conversion_ms[res]));
        self.read_and_apply(sensor, delay, shared, settings)
    }

    /// Main-loop step. Does nothing unless a conversion is complete.
    pub fn service(
        &mut self,
        sensor: &mut impl SensorPort,
        delay: &mut impl DelayNs,
        shared: &SharedState,
        settings: &Settings,
    ) -> Option<Reading> {
        if !shared.conversion_complete() {
            return None;
        }
        let outcome = self.read_and_apply(sensor, delay, shared, settings);
        shared.clear_conversion_complete();
        match outcome {
            Ok(reading) => Some(reading),
            Err(e) => {
                warn!("monitor: reading skipped: {}", e);
                None
            }
        }
    }

    fn read_and_apply(
        &mut self,
        sensor: &mut impl SensorPort,
        delay: &mut impl DelayNs,
        shared: &SharedState,
        settings: &Settings,
    ) -> Result<Reading> {
        let guard_us = self.timing.read_guard_us;
        let (raw, restarted) = critical_section::with(|_| {
            let raw = sensor.read_raw();
            let restarted = sensor.start_conversion();
            delay.delay_us(guard_us);
            (raw, restarted)
        });
        if let Err(e) = restarted {
            warn!("monitor: conversion restart failed: {}", e);
        }
        let temperature = Temperature::from_raw(raw.map_err(Error::from)?);

        let extremes_changed = match self.extremes.as_mut() {
            Some(ext) => ext.update(temperature),
            None => {
                self.extremes = Some(Extremes::seeded(temperature));
                true
            }
        };
        self.latest = Some(temperature);

        let above = temperature > Temperature::from_degrees(settings.upper_limit);
        let below = temperature < Temperature::from_degrees(settings.lower_limit);
        let gear = fan_gear(
            temperature,
            settings.upper_limit,
            settings.fan_gear_step,
            self.timing.duty_bands,
        );

        let was_above = shared.above_upper();
        let was_below = shared.below_lower();
        let compensation = self.timing.read_compensation_ticks;
        let tph = self.timing.ticks_per_hundredth;
        critical_section::with(|_| {
            shared.set_violations(above, below);
            shared.set_fan(above, gear);
            shared.set_relay_closed(below);
            if above {
                shared.upper_clock.advance_by(compensation, tph);
            }
            if below {
                shared.lower_clock.advance_by(compensation, tph);
            }
        });
        debug!("monitor: {} °C gear={} relay={}", temperature, gear, below);

        Ok(Reading {
            temperature,
            above_upper: above,
            below_lower: below,
            fan_gear: gear,
            upper_changed: above != was_above,
            lower_changed: below != was_below,
            extremes_changed,
        })
    }
}
