//! Outbound application events.
//!
//! The [`Controller`](super::service::Controller) emits these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other side
//! decide what to do with them.

use crate::error::{Error, SensorError};
use crate::mode::DeviceMode;
use crate::monitor::Temperature;
use crate::settings::SettingsOption;
use crate::view::ViewPage;

/// Which limit a violation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Upper,
    Lower,
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplianceEvent {
    /// Boot finished; carries the first reading if the sensor answered.
    Booted(Option<Temperature>),

    /// The long-press toggle switched modes.
    ModeChanged(DeviceMode),

    /// A tier-1 key switched the view page.
    PageChanged(ViewPage),

    /// A reading crossed a limit.
    ViolationStarted { limit: Limit, at: Temperature },

    /// A reading came back inside a limit.
    ViolationCleared(Limit),

    /// An edit session confirmed a new value.
    SettingCommitted { option: SettingsOption, value: i16 },

    /// An edit session was cancelled.
    EditCancelled(SettingsOption),

    /// Limits and resolution were written to sensor EEPROM.
    SettingsPersisted,

    /// Writing the sensor EEPROM failed; in-memory settings are kept.
    PersistFailed(SensorError),

    /// The tick handler could not drive an output pin.
    Fault(Error),
}
