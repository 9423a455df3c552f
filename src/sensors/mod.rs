//! One-wire temperature sensor register model.
//!
//! The sensor keeps the two alarm limits and the resolution in its own
//! EEPROM. This module owns the byte layout of that data and of the full
//! scratchpad; bus timing lives in whichever adapter implements
//! [`SensorPort`](crate::app::ports::SensorPort).
//!
//! | Byte | Content                     |
//! |------|-----------------------------|
//! | 0    | temperature LSB             |
//! | 1    | temperature MSB             |
//! | 2    | TH: upper limit (°C, i8)   |
//! | 3    | TL: lower limit (°C, i8)   |
//! | 4    | CONFIG `0 R1 R0 1 1 1 1 1`  |
//! | 5..7 | reserved                    |
//! | 8    | CRC-8 over bytes 0..8       |

use crate::config::{LIMIT_MAX, LIMIT_MIN, RESOLUTION_MAX, Settings};
use crate::error::SensorError;

/// Scratchpad length including the CRC byte.
pub const SCRATCHPAD_LEN: usize = 9;

const CONFIG_FILL: u8 = 0b0001_1111;
const CONFIG_RES_SHIFT: u8 = 5;

/// Limits and resolution as stored in the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredConfig {
    pub upper_limit: i8,
    pub lower_limit: i8,
    pub resolution: u8,
}

impl StoredConfig {
    pub fn from_settings(s: &Settings) -> Self {
        Self {
            upper_limit: s.upper_limit,
            lower_limit: s.lower_limit,
            resolution: s.resolution,
        }
    }

    /// Apply onto `settings`, leaving the fields the sensor does not hold.
    pub fn apply_to(&self, settings: &mut Settings) {
        settings.upper_limit = self.upper_limit;
        settings.lower_limit = self.lower_limit;
        settings.resolution = self.resolution;
    }

    /// `[TH, TL, CONFIG]` as written by the write-scratchpad command.
    pub fn encode(&self) -> [u8; 3] {
        [
            self.upper_limit as u8,
            self.lower_limit as u8,
            ((self.resolution.min(RESOLUTION_MAX)) << CONFIG_RES_SHIFT) | CONFIG_FILL,
        ]
    }

    pub fn decode(bytes: [u8; 3]) -> Result<Self, SensorError> {
        let [th, tl, config] = bytes;
        if config & 0x80 != 0 || config & CONFIG_FILL != CONFIG_FILL {
            return Err(SensorError::InvalidRegister);
        }
        let upper_limit = th as i8;
        let lower_limit = tl as i8;
        if !(LIMIT_MIN..=LIMIT_MAX).contains(&upper_limit)
            || !(LIMIT_MIN..=LIMIT_MAX).contains(&lower_limit)
        {
            return Err(SensorError::InvalidRegister);
        }
        Ok(Self {
            upper_limit,
            lower_limit,
            resolution: config >> CONFIG_RES_SHIFT,
        })
    }
}

/// Dallas/Maxim CRC-8 (polynomial x⁸ + x⁵ + x⁴ + 1, reflected).
pub fn crc8(bytes: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &byte in bytes {
        let mut b = byte;
        for _ in 0..8 {
            let mix = (crc ^ b) & 0x01;
            crc >>= 1;
            if mix != 0 {
                crc ^= 0x8C;
            }
            b >>= 1;
        }
    }
    crc
}

/// Decode a full scratchpad read: raw temperature (1/16 °C) and stored config.
pub fn decode_scratchpad(
    pad: &[u8; SCRATCHPAD_LEN],
) -> Result<(i16, StoredConfig), SensorError> {
    if crc8(&pad[..SCRATCHPAD_LEN - 1]) != pad[SCRATCHPAD_LEN - 1] {
        return Err(SensorError::CrcMismatch);
    }
    let config = StoredConfig::decode([pad[2], pad[3], pad[4]])?;
    let mut raw = i16::from_le_bytes([pad[0], pad[1]]);
    // Undefined low bits at reduced resolution.
    raw &= !((1i16 << (RESOLUTION_MAX - config.resolution)) - 1);
    Ok((raw, config))
}

/// Build a scratchpad image, CRC included.
pub fn encode_scratchpad(raw: i16, config: &StoredConfig) -> [u8; SCRATCHPAD_LEN] {
    let [t_lsb, t_msb] = raw.to_le_bytes();
    let [th, tl, cfg] = config.encode();
    let mut pad = [t_lsb, t_msb, th, tl, cfg, 0xFF, 0x0C, 0x10, 0];
    pad[SCRATCHPAD_LEN - 1] = crc8(&pad[..SCRATCHPAD_LEN - 1]);
    pad
}
