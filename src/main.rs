//! ThermoWatch host simulator.
//!
//! Runs the firmware core against in-process device models:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  stdin thread ── key lines / temperature ──┐                 │
//! │                                            ▼                 │
//! │  SimTickSource ── tick_isr ──▶ TickHandler (motor, relay)    │
//! │  edge thread   ── ModeToggle::on_edge ──▶ SharedState        │
//! │                                            ▲                 │
//! │  main loop ── Controller::poll ─────────────┘                │
//! │              └─▶ SimDisplay ◀── screen thread ──▶ stdout     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands (one per line): `1`..`4` tap a key, `2+`/`3+` hold it for two
//! seconds, `m` long-press the mode line, `t <celsius>` set the sensor
//! temperature, `s` print pin states, `q` quit.

use std::cell::RefCell;
use std::io::BufRead;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use critical_section::Mutex;
use log::{info, warn};

use thermowatch::adapters::log_sink::LogEventSink;
use thermowatch::adapters::sim::{SimDisplay, SimKeyBus, SimPin, SimSensor, SimTickSource, StdDelay};
use thermowatch::app::service::Controller;
use thermowatch::config::TimingConfig;
use thermowatch::display::Lcd;
use thermowatch::mode::ModeToggle;
use thermowatch::shared::SharedState;
use thermowatch::tick::{TickHandler, TickSource};

// ── Interrupt-side statics ────────────────────────────────────

static SHARED: SharedState = SharedState::new();

static TICK: Mutex<RefCell<Option<TickHandler<'static, SimPin, SimPin>>>> =
    Mutex::new(RefCell::new(None));

fn tick_isr() {
    critical_section::with(|cs| {
        if let Some(handler) = TICK.borrow_ref_mut(cs).as_mut() {
            if let Err(e) = handler.on_tick() {
                SHARED.record_actuator_fault(e);
            }
        }
    });
}

// ── Key line masks (active low) ───────────────────────────────

const K1_LINE: u8 = 0x80;
const K2_LINE: u8 = 0x40;
const K3_LINE: u8 = 0x20;
const K4_LINE: u8 = 0x10;
const TOGGLE_LINE: u8 = 0x04;

const TAP: Duration = Duration::from_millis(100);
const HOLD: Duration = Duration::from_secs(2);
const LONG_PRESS: Duration = Duration::from_millis(1_200);
const LOOP_PERIOD: Duration = Duration::from_millis(5);
const SCREEN_PERIOD: Duration = Duration::from_millis(50);

enum Command {
    Quit,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init()
        .context("installing console logger")?;
    info!("thermowatch-sim starting");

    let timing = TimingConfig::default();

    let motor = SimPin::default();
    let relay = SimPin::default();
    let display = SimDisplay::new();
    let sensor = SimSensor::new(22.5);
    let keys = SimKeyBus::new();

    critical_section::with(|cs| {
        TICK.borrow(cs).replace(Some(TickHandler::new(
            &SHARED,
            timing,
            motor.clone(),
            relay.clone(),
        )));
    });
    let mut ticks = SimTickSource::new();
    ticks.register(timing.tick_period_ns, tick_isr);

    // ── Mode line edge interrupt ─────────────────────────────
    let (edge_tx, edge_rx) = mpsc::channel::<()>();
    {
        let mut bus = keys.clone();
        let toggle = ModeToggle::new(&timing);
        thread::Builder::new()
            .name("mode-edge".into())
            .spawn(move || {
                let mut delay = StdDelay;
                for () in edge_rx {
                    if let Some(mode) = toggle.on_edge(&mut bus, &mut delay, &SHARED) {
                        info!("edge: long press confirmed -> {:?}", mode);
                    }
                }
            })
            .context("spawning edge thread")?;
    }

    // ── Operator console ─────────────────────────────────────
    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
    {
        let keys = keys.clone();
        let sensor = sensor.clone();
        let (motor, relay) = (motor.clone(), relay.clone());
        thread::Builder::new()
            .name("stdin".into())
            .spawn(move || {
                for line in std::io::stdin().lock().lines() {
                    let Ok(line) = line else { break };
                    let mut words = line.split_whitespace();
                    match (words.next(), words.next()) {
                        (Some("q"), _) => break,
                        (Some("m"), _) => {
                            keys.press(TOGGLE_LINE);
                            if edge_tx.send(()).is_err() {
                                break;
                            }
                            thread::sleep(LONG_PRESS);
                            keys.release(TOGGLE_LINE);
                        }
                        (Some("t"), Some(value)) => match value.parse::<f32>() {
                            Ok(celsius) => sensor.set_celsius(celsius),
                            Err(_) => warn!("console: bad temperature {:?}", value),
                        },
                        (Some("s"), _) => info!(
                            "pins: motor={} relay={} fan_gear={}",
                            u8::from(motor.is_high()),
                            u8::from(relay.is_high()),
                            SHARED.fan_gear()
                        ),
                        (Some(key), _) => match key_line(key) {
                            Some((line, held)) => {
                                keys.press(line);
                                thread::sleep(if held { HOLD } else { TAP });
                                keys.release(line);
                            }
                            None => warn!("console: unknown command {:?}", key),
                        },
                        (None, _) => {}
                    }
                }
                let _ = cmd_tx.send(Command::Quit);
            })
            .context("spawning console thread")?;
    }

    // ── Screen mirror ────────────────────────────────────────
    // The editor blocks the main loop, so the frame is watched from here.
    {
        let display = display.clone();
        thread::Builder::new()
            .name("screen".into())
            .spawn(move || {
                let mut shown = String::new();
                loop {
                    let frame = display.render();
                    if frame != shown {
                        println!("┌────────────────┐");
                        for row in frame.lines() {
                            println!("│{}│", row);
                        }
                        println!("└────────────────┘");
                        shown = frame;
                    }
                    thread::sleep(SCREEN_PERIOD);
                }
            })
            .context("spawning screen thread")?;
    }

    // ── Main loop ────────────────────────────────────────────
    let mut lcd = Lcd::new(display, StdDelay);
    lcd.init();
    let mut controller = Controller::new(&SHARED, timing, sensor, lcd, keys, StdDelay);
    let mut sink = LogEventSink::new();
    controller.boot(&mut sink);

    loop {
        if let Ok(Command::Quit) = cmd_rx.try_recv() {
            break;
        }
        controller.poll(&mut sink);
        thread::sleep(LOOP_PERIOD);
    }

    info!(
        "thermowatch-sim stopping after {} ticks, {} sensor writes",
        ticks.elapsed_ticks(),
        controller.sensor().persist_count()
    );
    Ok(())
}

fn key_line(word: &str) -> Option<(u8, bool)> {
    match word {
        "1" => Some((K1_LINE, false)),
        "2" => Some((K2_LINE, false)),
        "3" => Some((K3_LINE, false)),
        "4" => Some((K4_LINE, false)),
        "2+" => Some((K2_LINE, true)),
        "3+" => Some((K3_LINE, true)),
        _ => None,
    }
}
