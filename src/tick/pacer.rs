//! Sensor conversion pacing.
//!
//! The sensor needs a resolution-dependent time to finish a conversion. The
//! pacer counts ticks and raises "conversion complete" once the threshold for
//! the current resolution is reached. While a completion is pending the
//! counter is frozen, so a reading is never skipped and never raised twice.

use crate::config::TimingConfig;
use crate::shared::SharedState;

/// Per-tick step of the conversion pacer.
pub fn on_tick(shared: &SharedState, timing: &TimingConfig) {
    if shared.conversion_complete() {
        return;
    }

    let count = shared.conversion_count().saturating_add(1);
    if count >= timing.conversion_threshold(shared.resolution()) {
        shared.set_conversion_count(0);
        shared.raise_conversion_complete();
    } else {
        shared.set_conversion_count(count);
    }
}
