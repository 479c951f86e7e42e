// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-acremote project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration for the touch sensor

use serde::{Deserialize, Serialize};

/// Settings for the capacitive touch sensor: event device, poll cadence and
/// the two-point calibration mapping raw axis readings to screen pixels.
///
/// The calibration corners come from the display's
/// `xorg.conf.d/99-calibration.conf` values. A reversed axis is expressed by
/// an end value smaller than the origin value; a zero span on either axis is
/// rejected at startup.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct TouchConfig {
    /// Touch event device path
    pub device: String,
    /// Interval between input polls, milliseconds
    pub poll_interval_ms: u64,
    /// Raw sensor reading at the logical (0, 0) corner, x then y
    pub raw_origin: [i32; 2],
    /// Raw sensor reading at the logical (width, height) corner, x then y
    pub raw_end: [i32; 2],
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self {
            device: "/dev/input/event0".to_string(),
            poll_interval_ms: 100,
            // Waveshare 3.5" resistive panel, x axis reversed
            raw_origin: [3888, 208],
            raw_end: [48, 3888],
        }
    }
}
