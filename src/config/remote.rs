// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-acremote project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration for the remote panel session

use serde::{Deserialize, Serialize};

/// Settings for the web remote panel session: address, credentials,
/// temperature bounds and the keep-alive cadence.
///
/// The temperature bounds mirror the panel's own hidden configuration
/// fields. `target_temp` must satisfy `lower_temp <= target_temp < upper_temp`;
/// the panel rejects anything else.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct RemoteConfig {
    /// Host or IP of the web remote panel
    pub host: String,
    /// Login id posted on the landing form
    pub login_id: String,
    /// Login password posted on the landing form
    pub password: String,
    /// Initial target temperature in celsius
    pub target_temp: i32,
    /// Wind speed index (0 Auto / 1 Max / 2 Medium / 3 Low)
    pub wind_speed: u8,
    /// Wind angle index (0 Swing / 1 Horizontal / 2 Vertical)
    pub wind_angle: u8,
    /// Lowest temperature the unit accepts (inclusive for set, exclusive-by-one on decrement)
    pub lower_temp: i32,
    /// Highest temperature the unit accepts (exclusive)
    pub upper_temp: i32,
    /// Interval between state refreshes, seconds
    pub state_interval_secs: u64,
    /// Maximum random addition to the state refresh interval, seconds
    pub state_jitter_secs: u64,
    /// Interval between forced re-logins, seconds
    pub relogin_interval_secs: u64,
    /// Maximum random addition to the re-login interval, seconds
    pub relogin_jitter_secs: u64,
    /// Settle delay between a re-login and the command resend, seconds
    pub relogin_settle_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            host: "192.168.0.1".to_string(),
            login_id: String::new(),
            password: String::new(),
            target_temp: 26,
            wind_speed: 0,
            wind_angle: 0,
            lower_temp: 25,
            upper_temp: 29,
            state_interval_secs: 60,
            state_jitter_secs: 30,
            relogin_interval_secs: 1200,
            relogin_jitter_secs: 60,
            relogin_settle_secs: 5,
        }
    }
}
