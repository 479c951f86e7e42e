// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-acremote project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration for the framebuffer display

use serde::{Deserialize, Serialize};

/// Settings for the raw framebuffer the UI is drawn onto.
///
/// The GPIO LCD hats expose a secondary 16-bit framebuffer device, hence
/// the `/dev/fb1` default.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct DisplayConfig {
    /// Framebuffer device path
    pub framebuffer: String,
    /// Logical surface width in pixels
    pub width: u32,
    /// Logical surface height in pixels
    pub height: u32,
    /// Interval between on-screen temperature refreshes, seconds
    pub refresh_interval_secs: u64,
    /// Maximum random addition to the refresh interval, seconds
    pub refresh_jitter_secs: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            framebuffer: "/dev/fb1".to_string(),
            width: 480,
            height: 320,
            refresh_interval_secs: 60,
            refresh_jitter_secs: 10,
        }
    }
}
