//! Elapsed-time clocks for the two limit violations.
//!
//! Each clock is a chain of small atomic counters:
//! `sub-tick → hundredths (0..100) → seconds (0..60) → minutes (saturating)`.
//! The tick handler is the only writer while the workflow runs; the monitor
//! adds its read compensation from inside a critical section, where the tick
//! handler cannot interleave.

use core::sync::atomic::{AtomicU8, AtomicU16, Ordering};

use crate::shared::SharedState;

/// A point-in-time copy of an [`ElapsedClock`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockReading {
    pub minutes: u16,
    pub seconds: u8,
    pub hundredths: u8,
}

impl ClockReading {
    /// Tenths of a second, as shown on the timers page.
    pub fn tenths(&self) -> u8 {
        self.hundredths / 10
    }

    pub fn is_zero(&self) -> bool {
        self.minutes == 0 && self.seconds == 0 && self.hundredths == 0
    }
}

/// Tick-driven elapsed-time counter.
pub struct ElapsedClock {
    sub_ticks: AtomicU8,
    hundredths: AtomicU8,
    seconds: AtomicU8,
    minutes: AtomicU16,
}

impl ElapsedClock {
    pub const fn new() -> Self {
        Self {
            sub_ticks: AtomicU8::new(0),
            hundredths: AtomicU8::new(0),
            seconds: AtomicU8::new(0),
            minutes: AtomicU16::new(0),
        }
    }

    /// Advance by one tick.
    pub fn advance(&self, ticks_per_hundredth: u8) {
        let sub = self.sub_ticks.load(Ordering::Relaxed) + 1;
        if sub < ticks_per_hundredth {
            self.sub_ticks.store(sub, Ordering::Relaxed);
            return;
        }
        self.sub_ticks.store(0, Ordering::Relaxed);

        let hundredths = self.hundredths.load(Ordering::Relaxed) + 1;
        if hundredths < 100 {
            self.hundredths.store(hundredths, Ordering::Relaxed);
            return;
        }
        self.hundredths.store(0, Ordering::Relaxed);

        let seconds = self.seconds.load(Ordering::Relaxed) + 1;
        if seconds < 60 {
            self.seconds.store(seconds, Ordering::Relaxed);
            return;
        }
        self.seconds.store(0, Ordering::Relaxed);

        let minutes = self.minutes.load(Ordering::Relaxed);
        self.minutes
            .store(minutes.saturating_add(1), Ordering::Relaxed);
    }

    /// Advance by `ticks` ticks.
    pub fn advance_by(&self, ticks: u8, ticks_per_hundredth: u8) {
        for _ in 0..ticks {
            self.advance(ticks_per_hundredth);
        }
    }

    pub fn reset(&self) {
        self.sub_ticks.store(0, Ordering::Relaxed);
        self.hundredths.store(0, Ordering::Relaxed);
        self.seconds.store(0, Ordering::Relaxed);
        self.minutes.store(0, Ordering::Relaxed);
    }

    /// True if no tick has been counted since the last reset.
    pub fn is_zero(&self) -> bool {
        self.sub_ticks.load(Ordering::Relaxed) == 0 && self.reading().is_zero()
    }

    /// Field-wise copy. Call inside a critical section for a consistent view.
    pub fn reading(&self) -> ClockReading {
        ClockReading {
            minutes: self.minutes.load(Ordering::Relaxed),
            seconds: self.seconds.load(Ordering::Relaxed),
            hundredths: self.hundredths.load(Ordering::Relaxed),
        }
    }
}

impl Default for ElapsedClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-tick step of the violation clocks.
///
/// Exactly one clock runs: the upper one while above the limit, otherwise the
/// lower one while below it. A clock whose violation is not active is held at
/// zero.
pub fn on_tick(shared: &SharedState, ticks_per_hundredth: u8) {
    let above = shared.above_upper();
    let below = shared.below_lower();

    if above {
        shared.upper_clock.advance(ticks_per_hundredth);
    } else if below {
        shared.lower_clock.advance(ticks_per_hundredth);
    }

    if !above {
        shared.upper_clock.reset();
    }
    if !below {
        shared.lower_clock.reset();
    }
}
