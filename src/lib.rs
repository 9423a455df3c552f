//! ThermoWatch firmware library.
//!
//! Standalone temperature monitor: one digital sensor, a 2x16 character
//! display, a four-key keypad plus a long-press mode line, a PWM fan motor
//! and an alarm relay. Everything hardware-facing sits behind the port
//! traits in [`app::ports`] and the `embedded-hal` pin and delay traits, so
//! the crate is `no_std` on the target and runs on the host under the
//! `sim` feature.

#![cfg_attr(not(any(test, feature = "sim")), no_std)]
#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod display;
pub mod error;
pub mod input;
pub mod mode;
pub mod monitor;
pub mod pins;
pub mod sensors;
pub mod settings;
pub mod shared;
pub mod tick;
pub mod view;
