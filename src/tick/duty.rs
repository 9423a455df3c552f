//! Software PWM for the fan motor.
//!
//! ```text
//!   duty counter  0 ─────────────────────────────────────────── 3600
//!   band           │   0   │   1   │   2   │   3   │
//!   gear 1         │       │       │       │███████│   25 %
//!   gear 2         │       │       │███████│███████│   50 %
//!   gear 3         │       │███████│███████│███████│   75 %
//!   gear 4+        │███████│███████│███████│███████│  100 %
//! ```
//!
//! The output is high for as many trailing bands as the gear, so each carrier
//! period holds exactly `gear × band` high ticks. Gear 0 never drives the
//! motor; gears above the band count saturate.

use crate::config::TimingConfig;
use crate::shared::SharedState;

/// Motor level for a position within the carrier period.
pub fn level(count: u16, gear: u8, timing: &TimingConfig) -> bool {
    let bands = u16::from(gear.min(timing.duty_bands));
    if bands == 0 {
        return false;
    }
    let high_from = timing
        .duty_carrier_ticks
        .saturating_sub(bands.saturating_mul(timing.duty_band_ticks()));
    count >= high_from
}

/// Per-tick step of the duty modulator. Returns the motor level to drive.
pub fn on_tick(shared: &SharedState, timing: &TimingConfig) -> bool {
    if !shared.fan_enabled() {
        shared.set_motor_on(false);
        return false;
    }

    let mut count = shared.duty_count().wrapping_add(1);
    if count >= timing.duty_carrier_ticks {
        count = 0;
    }
    shared.set_duty_count(count);

    let on = level(count, shared.fan_gear(), timing);
    shared.set_motor_on(on);
    on
}
