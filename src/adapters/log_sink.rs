//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured appliance events through
//! the `log` facade (UART on the target, stderr in the simulator).

use log::{error, info, warn};

use crate::app::events::ApplianceEvent;
use crate::app::ports::EventSink;
use crate::display::format::MaybeTemp;

/// Adapter that logs every [`ApplianceEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &ApplianceEvent) {
        match event {
            ApplianceEvent::Booted(first) => {
                info!("BOOT  | first reading {} \u{00b0}C", MaybeTemp(*first));
            }
            ApplianceEvent::ModeChanged(mode) => {
                info!("MODE  | {:?}", mode);
            }
            ApplianceEvent::PageChanged(page) => {
                info!("VIEW  | {:?}", page);
            }
            ApplianceEvent::ViolationStarted { limit, at } => {
                warn!("LIMIT | {:?} crossed at {} \u{00b0}C", limit, at);
            }
            ApplianceEvent::ViolationCleared(limit) => {
                info!("LIMIT | {:?} back in range", limit);
            }
            ApplianceEvent::SettingCommitted { option, value } => {
                info!("SET   | {:?} = {}", option, value);
            }
            ApplianceEvent::EditCancelled(option) => {
                info!("SET   | {:?} edit cancelled", option);
            }
            ApplianceEvent::SettingsPersisted => {
                info!("SET   | limits and resolution stored in sensor EEPROM");
            }
            ApplianceEvent::PersistFailed(e) => {
                warn!("SET   | persist failed: {}", e);
            }
            ApplianceEvent::Fault(e) => {
                error!("FAULT | {}", e);
            }
        }
    }
}
