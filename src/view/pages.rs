//! Page layouts.

use super::ViewModel;
use crate::display::TextScreen;
use crate::display::format::{ClockField, MaybeTemp, put_degrees, put_fmt};
use crate::pins::GLYPH_BLOCK;

// ── Main ──────────────────────────────────────────────────────
//  H: 30°C  L: 10°C
//  T: 23.4°C  FAN:0

pub(super) fn main_draw(scr: &mut dyn TextScreen, vm: &ViewModel) {
    scr.clear();
    put_fmt(scr, format_args!("H:{:3}", vm.settings.upper_limit));
    put_degrees(scr);
    put_fmt(scr, format_args!("  L:{:3}", vm.settings.lower_limit));
    put_degrees(scr);
    scr.set_cursor(1, 0);
    put_fmt(scr, format_args!("T:{:5}", MaybeTemp(vm.temperature)));
    put_degrees(scr);
    put_fmt(scr, format_args!("  FAN:{}", vm.fan_gear.min(9)));
}

pub(super) fn main_refresh(scr: &mut dyn TextScreen, vm: &ViewModel) {
    scr.set_cursor(1, 2);
    put_fmt(scr, format_args!("{:5}", MaybeTemp(vm.temperature)));
    scr.set_cursor(1, 15);
    put_fmt(scr, format_args!("{}", vm.fan_gear.min(9)));
}

// ── Extremes ──────────────────────────────────────────────────
//  Highest:  25.0°C
//  Lowest:   19.5°C

pub(super) fn extremes_draw(scr: &mut dyn TextScreen, vm: &ViewModel) {
    scr.clear();
    scr.put_str("Highest: ");
    put_fmt(scr, format_args!("{:5}", MaybeTemp(vm.extremes.map(|e| e.highest))));
    put_degrees(scr);
    scr.set_cursor(1, 0);
    scr.put_str("Lowest:  ");
    put_fmt(scr, format_args!("{:5}", MaybeTemp(vm.extremes.map(|e| e.lowest))));
    put_degrees(scr);
}

pub(super) fn extremes_refresh(scr: &mut dyn TextScreen, vm: &ViewModel) {
    scr.set_cursor(0, 9);
    put_fmt(scr, format_args!("{:5}", MaybeTemp(vm.extremes.map(|e| e.highest))));
    scr.set_cursor(1, 9);
    put_fmt(scr, format_args!("{:5}", MaybeTemp(vm.extremes.map(|e| e.lowest))));
}

// ── Violation timers ──────────────────────────────────────────
//  H Time: 00m12.3s
//  L Time: 00m00.0s

pub(super) fn timers_draw(scr: &mut dyn TextScreen, vm: &ViewModel) {
    scr.clear();
    put_fmt(scr, format_args!("H Time: {}", ClockField(vm.upper_clock)));
    scr.set_cursor(1, 0);
    put_fmt(scr, format_args!("L Time: {}", ClockField(vm.lower_clock)));
}

/// Only the running clock is rewritten; upper wins if both flags are set.
pub(super) fn timers_refresh(scr: &mut dyn TextScreen, vm: &ViewModel) {
    if vm.above_upper {
        scr.set_cursor(0, 8);
        put_fmt(scr, format_args!("{}", ClockField(vm.upper_clock)));
    } else if vm.below_lower {
        scr.set_cursor(1, 8);
        put_fmt(scr, format_args!("{}", ClockField(vm.lower_clock)));
    }
}

// ── Settings summary ──────────────────────────────────────────
//  R:3  FG:1  M:0
//  Volume: ████

pub(super) fn summary_draw(scr: &mut dyn TextScreen, vm: &ViewModel) {
    scr.clear();
    put_fmt(
        scr,
        format_args!(
            "R:{}  FG:{}  M:{}",
            vm.settings.resolution, vm.settings.fan_gear_step, vm.settings.ringtone
        ),
    );
    scr.set_cursor(1, 0);
    scr.put_str("Volume: ");
    for _ in 0..vm.settings.volume {
        scr.put_byte(GLYPH_BLOCK);
    }
}

pub(super) fn nothing(_: &mut dyn TextScreen, _: &ViewModel) {}
