//! Main-loop controller: the hexagonal core.
//!
//! [`Controller`] owns the main-loop state machines and the adapters they
//! drive. Interrupt-side work (tick handler, mode toggle) talks to it only
//! through [`SharedState`].
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!  KeyBus     ──▶ │          Controller          │
//!                 │ Monitor · View · Settings    │ ──▶ TextScreen
//!  SharedState ◀─▶│ Page/Nav/Edit key decoders   │
//!                 └──────────────────────────────┘
//! ```
//!
//! Each [`poll`](Controller::poll) is one pass of the cooperative loop:
//!
//! | Mode     | Work per pass                                                   |
//! |----------|-----------------------------------------------------------------|
//! | Viewing  | consume a finished conversion, render the page, tier-1 keys     |
//! | Settings | redraw on entry, tier-2 keys, run the editor when asked         |
//!
//! Leaving Settings additionally persists limits and resolution to the
//! sensor and restarts conversion pacing before anything else runs.

use embedded_hal::delay::DelayNs;
use log::{error, info, warn};

use crate::config::{Settings, TimingConfig};
use crate::display::TextScreen;
use crate::error::Error;
use crate::input::{Debounce, NavAction, NavKeys, PageKeys};
use crate::mode::DeviceMode;
use crate::monitor::{Reading, TemperatureMonitor};
use crate::sensors::StoredConfig;
use crate::settings::{EditOutcome, Editor, SettingsOption, SettingsStateMachine};
use crate::shared::SharedState;
use crate::view::{ViewModel, ViewPage, ViewStateMachine};

use super::events::{ApplianceEvent, Limit};
use super::ports::{EventSink, KeyBus, SensorPort};

// ───────────────────────────────────────────────────────────────
// Controller
// ───────────────────────────────────────────────────────────────

pub struct Controller<'a, S, L, K, D> {
    shared: &'a SharedState,
    timing: TimingConfig,
    settings: Settings,

    sensor: S,
    screen: L,
    keys: K,
    delay: D,

    monitor: TemperatureMonitor,
    view: ViewStateMachine,
    settings_sm: SettingsStateMachine,
    editor: Editor,
    page_keys: PageKeys,
    nav_keys: NavKeys,

    mode: DeviceMode,
}

impl<'a, S, L, K, D> Controller<'a, S, L, K, D>
where
    S: SensorPort,
    L: TextScreen,
    K: KeyBus,
    D: DelayNs,
{
    /// Assemble the controller. Nothing touches hardware until [`boot`].
    ///
    /// [`boot`]: Self::boot
    pub fn new(
        shared: &'a SharedState,
        timing: TimingConfig,
        sensor: S,
        screen: L,
        keys: K,
        delay: D,
    ) -> Self {
        let debounce = Debounce::new(timing.debounce_ms);
        Self {
            shared,
            timing,
            settings: Settings::default(),
            sensor,
            screen,
            keys,
            delay,
            monitor: TemperatureMonitor::new(timing),
            view: ViewStateMachine::new(),
            settings_sm: SettingsStateMachine::new(),
            editor: Editor::new(&timing),
            page_keys: PageKeys::new(debounce),
            nav_keys: NavKeys::new(debounce),
            mode: DeviceMode::Viewing,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Power-on sequence: load stored settings, take a first reading, type
    /// out the main page, then start the tick-paced workflow.
    pub fn boot(&mut self, sink: &mut impl EventSink) {
        self.settings = self.load_settings();
        self.shared.set_resolution(self.settings.resolution);

        let first = match self.monitor.prime(
            &mut self.sensor,
            &mut self.delay,
            self.shared,
            &self.settings,
        ) {
            Ok(reading) => {
                self.emit_violations(&reading, sink);
                Some(reading.temperature)
            }
            Err(e) => {
                warn!("boot: first reading failed: {}", e);
                None
            }
        };

        let model = self.view_model();
        self.view
            .render_boot(&mut self.screen, &model, self.timing.typewriter_ms);

        self.restart_conversion();
        self.shared.set_workflow_running(true);

        sink.emit(&ApplianceEvent::Booted(first));
        info!(
            "boot: H={} L={} R={} step={}",
            self.settings.upper_limit,
            self.settings.lower_limit,
            self.settings.resolution,
            self.settings.fan_gear_step
        );
    }

    /// One pass of the main loop.
    pub fn poll(&mut self, sink: &mut impl EventSink) {
        let mode = self.shared.mode();
        if mode != self.mode {
            self.mode = mode;
            info!("mode: {:?}", mode);
            sink.emit(&ApplianceEvent::ModeChanged(mode));
        }

        if let Some(fault) = self.shared.take_actuator_fault() {
            let e = Error::from(fault);
            error!("tick: {}", e);
            sink.emit(&ApplianceEvent::Fault(e));
        }

        if self.shared.take_resume_pending() {
            self.resume(sink);
        }

        match mode {
            DeviceMode::Viewing => self.poll_viewing(sink),
            DeviceMode::Settings => self.poll_settings(sink),
        }
    }

    // ── Viewing ───────────────────────────────────────────────

    fn poll_viewing(&mut self, sink: &mut impl EventSink) {
        if let Some(reading) = self.monitor.service(
            &mut self.sensor,
            &mut self.delay,
            self.shared,
            &self.settings,
        ) {
            self.emit_violations(&reading, sink);
        }

        if self.shared.take_view_redraw() {
            self.view.invalidate();
        }
        let model = self.view_model();
        self.view.render(&mut self.screen, &model);

        if let Some(page) = self
            .page_keys
            .poll(&mut self.keys, &mut self.delay, self.view.page())
        {
            self.view.select(page);
            info!("view: {:?}", page);
            sink.emit(&ApplianceEvent::PageChanged(page));
        }
    }

    fn emit_violations(&self, reading: &Reading, sink: &mut impl EventSink) {
        let at = reading.temperature;
        if reading.upper_changed {
            sink.emit(&if reading.above_upper {
                ApplianceEvent::ViolationStarted {
                    limit: Limit::Upper,
                    at,
                }
            } else {
                ApplianceEvent::ViolationCleared(Limit::Upper)
            });
        }
        if reading.lower_changed {
            sink.emit(&if reading.below_lower {
                ApplianceEvent::ViolationStarted {
                    limit: Limit::Lower,
                    at,
                }
            } else {
                ApplianceEvent::ViolationCleared(Limit::Lower)
            });
        }
    }

    // ── Settings ──────────────────────────────────────────────

    fn poll_settings(&mut self, sink: &mut impl EventSink) {
        if self.shared.take_settings_redraw() {
            self.nav_keys.reset();
            self.settings_sm.show(&mut self.screen, &self.settings);
        }

        let Some(action) = self.nav_keys.poll(&mut self.keys, &mut self.delay) else {
            return;
        };
        match action {
            NavAction::Edit => {
                if let Some(option) = self.settings_sm.option() {
                    self.edit(option, sink);
                }
            }
            _ => {
                self.settings_sm
                    .navigate(&mut self.screen, &self.settings, action);
            }
        }
    }

    fn edit(&mut self, option: SettingsOption, sink: &mut impl EventSink) {
        let outcome = self.editor.run(
            option,
            &mut self.settings,
            &mut self.screen,
            &mut self.keys,
            &mut self.delay,
            self.shared,
        );
        self.nav_keys.reset();
        match outcome {
            EditOutcome::Committed(value) => {
                if option == SettingsOption::Resolution {
                    self.shared.set_resolution(self.settings.resolution);
                }
                info!("settings: {:?} = {}", option, value);
                sink.emit(&ApplianceEvent::SettingCommitted { option, value });
            }
            EditOutcome::Cancelled => sink.emit(&ApplianceEvent::EditCancelled(option)),
            EditOutcome::NotEditable => {}
        }
    }

    /// Back from Settings: store what the sensor keeps, restart pacing.
    fn resume(&mut self, sink: &mut impl EventSink) {
        let stored = StoredConfig::from_settings(&self.settings);
        let persisted = self
            .sensor
            .write_config(stored)
            .and_then(|()| self.sensor.persist());
        match persisted {
            Ok(()) => {
                info!(
                    "settings: persisted H={} L={} R={}",
                    stored.upper_limit, stored.lower_limit, stored.resolution
                );
                sink.emit(&ApplianceEvent::SettingsPersisted);
            }
            Err(e) => {
                error!("settings: persist failed: {}", e);
                sink.emit(&ApplianceEvent::PersistFailed(e));
            }
        }
        self.shared.set_resolution(self.settings.resolution);
        self.restart_conversion();
    }

    // ── Internal ──────────────────────────────────────────────

    fn load_settings(&mut self) -> Settings {
        let mut settings = Settings::default();
        match self.sensor.stored_config() {
            Ok(stored) => {
                stored.apply_to(&mut settings);
                if let Err(e) = settings.validate() {
                    warn!("boot: stored settings rejected ({}), using defaults", e);
                    settings = Settings::default();
                }
            }
            Err(e) => warn!("boot: stored settings unreadable ({}), using defaults", e),
        }
        settings
    }

    fn restart_conversion(&mut self) {
        if let Err(e) = self.sensor.start_conversion() {
            warn!("sensor: conversion start failed: {}", e);
        }
        self.shared.restart_conversion_pacing();
    }

    fn view_model(&self) -> ViewModel {
        let (upper_clock, lower_clock) = critical_section::with(|_| {
            (
                self.shared.upper_clock.reading(),
                self.shared.lower_clock.reading(),
            )
        });
        ViewModel {
            settings: self.settings,
            temperature: self.monitor.latest(),
            fan_gear: self.shared.fan_gear(),
            extremes: self.monitor.extremes(),
            above_upper: self.shared.above_upper(),
            below_lower: self.shared.below_lower(),
            upper_clock,
            lower_clock,
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn mode(&self) -> DeviceMode {
        self.mode
    }

    pub fn view_page(&self) -> ViewPage {
        self.view.page()
    }

    pub fn selected_option(&self) -> Option<SettingsOption> {
        self.settings_sm.option()
    }

    pub fn monitor(&self) -> &TemperatureMonitor {
        &self.monitor
    }

    pub fn screen(&self) -> &L {
        &self.screen
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    pub fn keys_mut(&mut self) -> &mut K {
        &mut self.keys
    }
}
