//! End-to-end tests for the Controller → monitor / view / settings pipeline.
//!
//! The mode toggle and the tick handler are driven by hand, the way their
//! interrupts would drive them, against the same `SharedState` the
//! controller polls.

use super::mock_hw::{
    K1, K2, K3, K4, MockDisplay, MockSensor, RELEASED, RecordingDelay, RecordingPin,
    RecordingSink, ScriptedKeys, TOGGLE,
};

use thermowatch::app::events::{ApplianceEvent, Limit};
use thermowatch::app::service::Controller;
use thermowatch::config::TimingConfig;
use thermowatch::display::Lcd;
use thermowatch::error::{ActuatorError, Error, SensorError};
use thermowatch::mode::{DeviceMode, ModeToggle};
use thermowatch::monitor::Temperature;
use thermowatch::settings::SettingsOption;
use thermowatch::shared::SharedState;
use thermowatch::tick::TickHandler;
use thermowatch::view::ViewPage;

type TestController<'a> =
    Controller<'a, MockSensor, Lcd<MockDisplay, RecordingDelay>, ScriptedKeys, RecordingDelay>;

fn make_controller(shared: &SharedState, sensor: MockSensor) -> TestController<'_> {
    let mut lcd = Lcd::new(MockDisplay::new(), RecordingDelay::default());
    lcd.init();
    Controller::new(
        shared,
        TimingConfig::default(),
        sensor,
        lcd,
        ScriptedKeys::new(),
        RecordingDelay::default(),
    )
}

fn screen(c: &TestController<'_>, row: usize) -> String {
    c.screen().port().row(row)
}

fn long_press(shared: &SharedState) -> Option<DeviceMode> {
    let toggle = ModeToggle::new(&TimingConfig::default());
    toggle.on_edge(
        &mut ScriptedKeys::idle_at(TOGGLE),
        &mut RecordingDelay::default(),
        shared,
    )
}

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn boot_renders_main_page_and_starts_workflow() {
    let shared = SharedState::new();
    let mut c = make_controller(&shared, MockSensor::at_celsius(22));
    let mut sink = RecordingSink::default();

    c.boot(&mut sink);

    assert_eq!(screen(&c, 0), "H: 30°C  L: 10°C");
    assert_eq!(screen(&c, 1), "T: 22.0°C  FAN:0");
    assert_eq!(
        sink.events,
        [ApplianceEvent::Booted(Some(Temperature::from_degrees(22)))]
    );
    assert!(shared.workflow_running());
    assert_eq!(shared.resolution(), 3);
    // boot conversion plus the restart after the read and after the splash
    assert_eq!(c.sensor().conversions, 3);
}

#[test]
fn boot_without_sensor_shows_placeholder() {
    let shared = SharedState::new();
    let mut sensor = MockSensor::at_celsius(22);
    sensor.fail_reads = true;
    let mut c = make_controller(&shared, sensor);
    let mut sink = RecordingSink::default();

    c.boot(&mut sink);

    assert_eq!(screen(&c, 1), "T: --.-°C  FAN:0");
    assert_eq!(sink.events, [ApplianceEvent::Booted(None)]);
    assert!(c.monitor().extremes().is_none());
}

// ── Limits, fan and relay ─────────────────────────────────────

#[test]
fn reading_above_upper_limit_runs_fan_and_clock() {
    let shared = SharedState::new();
    let mut c = make_controller(&shared, MockSensor::at_celsius(33));
    let mut sink = RecordingSink::default();
    c.boot(&mut sink);

    assert_eq!(
        sink.events[0],
        ApplianceEvent::ViolationStarted {
            limit: Limit::Upper,
            at: Temperature::from_degrees(33),
        }
    );
    // 3 °C over with one degree per gear: ceil(3 / 1) + 1
    assert!(shared.fan_enabled());
    assert_eq!(shared.fan_gear(), 4);
    assert!(!shared.relay_closed());
    assert_eq!(screen(&c, 1), "T: 33.0°C  FAN:4");

    let timing = TimingConfig::default();
    let mut ticks = TickHandler::new(
        &shared,
        timing,
        RecordingPin::default(),
        RecordingPin::default(),
    );
    for _ in 0..timing.duty_carrier_ticks {
        ticks.on_tick().unwrap();
    }
    // 21 compensation ticks from the boot read, plus one second of ticks
    let clock = shared.upper_clock.reading();
    assert_eq!((clock.minutes, clock.seconds, clock.hundredths), (0, 1, 0));
    assert!(shared.lower_clock.is_zero());
    assert!(shared.conversion_complete());
    let (motor, relay) = ticks.into_pins();
    // gear 4 of 4 bands: the motor line goes high once and stays there
    assert!(motor.high);
    assert_eq!(motor.rising_edges, 1);
    assert!(!relay.high);
    assert_eq!(relay.rising_edges, 0);

    c.keys_mut().tap(K3);
    c.poll(&mut sink);
    c.poll(&mut sink);
    assert_eq!(c.view_page(), ViewPage::ViolationTimers);
    c.poll(&mut sink);
    assert_eq!(screen(&c, 0), "H Time: 00m01.0s");
    assert_eq!(screen(&c, 1), "L Time: 00m00.0s");
    assert!(!shared.conversion_complete());
}

#[test]
fn reading_below_lower_limit_closes_relay() {
    let shared = SharedState::new();
    let mut c = make_controller(&shared, MockSensor::at_celsius(5));
    let mut sink = RecordingSink::default();
    c.boot(&mut sink);

    assert!(shared.relay_closed());
    assert!(!shared.fan_enabled());
    assert!(sink.events.contains(&ApplianceEvent::ViolationStarted {
        limit: Limit::Lower,
        at: Temperature::from_degrees(5),
    }));

    let mut ticks = TickHandler::new(
        &shared,
        TimingConfig::default(),
        RecordingPin::default(),
        RecordingPin::default(),
    );
    ticks.on_tick().unwrap();
    let (motor, relay) = ticks.into_pins();
    assert!(relay.high);
    assert_eq!(relay.rising_edges, 1);
    assert!(!motor.high);
    assert_eq!(motor.rising_edges, 0);
    assert!(shared.upper_clock.is_zero());
    assert!(!shared.lower_clock.is_zero());
}

#[test]
fn reading_back_in_range_clears_violation() {
    let shared = SharedState::new();
    let mut c = make_controller(&shared, MockSensor::at_celsius(35));
    let mut sink = RecordingSink::default();
    c.boot(&mut sink);
    assert!(shared.above_upper());

    c.sensor_mut().raw = 25 * 16;
    let mut ticks = TickHandler::new(
        &shared,
        TimingConfig::default(),
        RecordingPin::default(),
        RecordingPin::default(),
    );
    while !shared.conversion_complete() {
        ticks.on_tick().unwrap();
    }
    c.poll(&mut sink);

    assert_eq!(
        sink.events.last(),
        Some(&ApplianceEvent::ViolationCleared(Limit::Upper))
    );
    assert!(!shared.fan_enabled());
    assert_eq!(shared.fan_gear(), 0);
    let extremes = c.monitor().extremes().unwrap();
    assert_eq!(extremes.highest, Temperature::from_degrees(35));
    assert_eq!(extremes.lowest, Temperature::from_degrees(25));

    ticks.on_tick().unwrap();
    assert!(shared.upper_clock.is_zero());
}

// ── Pages ─────────────────────────────────────────────────────

#[test]
fn page_keys_switch_pages_on_release() {
    let shared = SharedState::new();
    let mut c = make_controller(&shared, MockSensor::at_celsius(22));
    let mut sink = RecordingSink::default();
    c.boot(&mut sink);
    let clears = c.screen().port().clears;

    c.keys_mut().tap(K2);
    c.poll(&mut sink);
    assert_eq!(c.view_page(), ViewPage::Main);
    c.poll(&mut sink);
    assert_eq!(c.view_page(), ViewPage::Extremes);
    c.poll(&mut sink);
    assert_eq!(screen(&c, 0), "Highest:  22.0°C");
    // one full redraw for the switch, partial refreshes after it
    assert_eq!(c.screen().port().clears, clears + 1);
    assert_eq!(screen(&c, 1), "Lowest:   22.0°C");

    c.keys_mut().tap(K4);
    for _ in 0..3 {
        c.poll(&mut sink);
    }
    assert_eq!(c.view_page(), ViewPage::SettingsSummary);
    assert_eq!(screen(&c, 1), "Volume: ####    ");

    assert_eq!(
        &sink.events[1..],
        [
            ApplianceEvent::PageChanged(ViewPage::Extremes),
            ApplianceEvent::PageChanged(ViewPage::SettingsSummary),
        ]
    );
}

// ── Settings round trip ───────────────────────────────────────

#[test]
fn settings_edit_is_persisted_on_leave() {
    let shared = SharedState::new();
    let mut c = make_controller(&shared, MockSensor::at_celsius(22));
    let mut sink = RecordingSink::default();
    c.boot(&mut sink);

    assert_eq!(long_press(&shared), Some(DeviceMode::Settings));
    assert!(!shared.workflow_running());
    assert!(!shared.fan_enabled());
    assert!(!shared.relay_closed());

    // K1 opens the editor, K2 bumps the value, K4 confirms
    c.keys_mut().tap(K1).tap(K2).tap(K4);
    c.poll(&mut sink);
    assert_eq!(c.mode(), DeviceMode::Settings);
    assert_eq!(c.selected_option(), Some(SettingsOption::UpperLimit));
    assert_eq!(screen(&c, 1), " L Limit:  10°C ");
    c.poll(&mut sink);
    assert!(c.keys_mut().is_drained());
    assert_eq!(c.settings().upper_limit, 31);
    assert_eq!(screen(&c, 0), ">H Limit:  31°C<");
    assert!(!shared.editing());
    // nothing is stored until Settings is left
    assert_eq!(c.sensor().persists, 0);

    assert_eq!(long_press(&shared), Some(DeviceMode::Viewing));
    assert!(shared.workflow_running());
    assert_eq!(shared.conversion_count(), 0);
    c.poll(&mut sink);

    assert_eq!(c.sensor().persists, 1);
    assert_eq!(c.sensor().eeprom.upper_limit, 31);
    assert_eq!(screen(&c, 0), "H: 31°C  L: 10°C");
    assert_eq!(
        &sink.events[1..],
        [
            ApplianceEvent::ModeChanged(DeviceMode::Settings),
            ApplianceEvent::SettingCommitted {
                option: SettingsOption::UpperLimit,
                value: 31,
            },
            ApplianceEvent::ModeChanged(DeviceMode::Viewing),
            ApplianceEvent::SettingsPersisted,
        ]
    );
}

#[test]
fn cancelled_edit_keeps_value() {
    let shared = SharedState::new();
    let mut c = make_controller(&shared, MockSensor::at_celsius(22));
    let mut sink = RecordingSink::default();
    c.boot(&mut sink);
    long_press(&shared);

    c.keys_mut().tap(K1).tap(K3).tap(K3).tap(K1);
    c.poll(&mut sink);
    c.poll(&mut sink);

    assert_eq!(c.settings().upper_limit, 30);
    assert_eq!(screen(&c, 0), ">H Limit:  30°C<");
    assert_eq!(
        sink.events.last(),
        Some(&ApplianceEvent::EditCancelled(SettingsOption::UpperLimit))
    );
}

#[test]
fn resolution_edit_changes_conversion_pacing() {
    let shared = SharedState::new();
    let mut c = make_controller(&shared, MockSensor::at_celsius(22));
    let mut sink = RecordingSink::default();
    c.boot(&mut sink);
    long_press(&shared);

    // two "next" steps reach the resolution option on the second screen
    c.keys_mut().tap(K2).tap(K2).tap(K1).tap(K3).tap(K4);
    for _ in 0..6 {
        c.poll(&mut sink);
    }
    assert_eq!(c.selected_option(), Some(SettingsOption::Resolution));
    assert_eq!(screen(&c, 0), ">TResolution: 2<");
    assert_eq!(shared.resolution(), 2);

    long_press(&shared);
    c.poll(&mut sink);
    assert_eq!(c.sensor().eeprom.resolution, 2);

    let timing = TimingConfig::default();
    let mut ticks = TickHandler::new(
        &shared,
        timing,
        RecordingPin::default(),
        RecordingPin::default(),
    );
    for _ in 1..timing.conversion_threshold(2) {
        ticks.on_tick().unwrap();
    }
    assert!(!shared.conversion_complete());
    ticks.on_tick().unwrap();
    assert!(shared.conversion_complete());
}

#[test]
fn persist_failure_keeps_settings_in_memory() {
    let shared = SharedState::new();
    let mut sensor = MockSensor::at_celsius(22);
    sensor.fail_persist = true;
    let mut c = make_controller(&shared, sensor);
    let mut sink = RecordingSink::default();
    c.boot(&mut sink);

    long_press(&shared);
    c.keys_mut().tap(K1).tap(K2).tap(K4);
    c.poll(&mut sink);
    c.poll(&mut sink);
    long_press(&shared);
    c.poll(&mut sink);

    assert_eq!(c.settings().upper_limit, 31);
    assert_eq!(c.sensor().eeprom.upper_limit, 30);
    assert!(sink
        .events
        .contains(&ApplianceEvent::PersistFailed(SensorError::PersistFailed)));
    assert!(shared.workflow_running());
}

#[test]
fn interrupted_page_key_hold_switches_nothing() {
    let shared = SharedState::new();
    let mut c = make_controller(&shared, MockSensor::at_celsius(22));
    let mut sink = RecordingSink::default();
    c.boot(&mut sink);

    // K2 held, then K1 (the page on screen) held, then release
    c.keys_mut().push(&[K2, K2, K1, K1]).push(&[RELEASED; 4]);
    for _ in 0..4 {
        c.poll(&mut sink);
    }
    assert_eq!(c.view_page(), ViewPage::Main);
    assert!(sink.events[1..].is_empty());
}

#[test]
fn tick_fault_is_reported_by_the_main_loop() {
    let shared = SharedState::new();
    let mut c = make_controller(&shared, MockSensor::at_celsius(5));
    let mut sink = RecordingSink::default();
    c.boot(&mut sink);

    let mut ticks = TickHandler::new(
        &shared,
        TimingConfig::default(),
        RecordingPin::default(),
        RecordingPin::failing(),
    );
    // what the tick interrupt does with a failed write
    if let Err(e) = ticks.on_tick() {
        shared.record_actuator_fault(e);
    }

    c.poll(&mut sink);
    assert_eq!(
        sink.events.last(),
        Some(&ApplianceEvent::Fault(Error::Actuator(
            ActuatorError::RelayWriteFailed
        )))
    );
    assert_eq!(shared.take_actuator_fault(), None);

    let reported = sink.events.len();
    c.poll(&mut sink);
    assert_eq!(sink.events.len(), reported);
}

#[test]
fn toggle_requires_the_full_long_press() {
    let shared = SharedState::new();
    let toggle = ModeToggle::new(&TimingConfig::default());
    let mut bus = ScriptedKeys::new();
    bus.push(&[TOGGLE; 19]);

    assert_eq!(
        toggle.on_edge(&mut bus, &mut RecordingDelay::default(), &shared),
        None
    );
    assert_eq!(shared.mode(), DeviceMode::Viewing);
    assert!(!shared.take_settings_redraw());
}
