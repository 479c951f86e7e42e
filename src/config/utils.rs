// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-acremote project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration utilities
//!
//! This module provides utility functions for working with configuration
//! settings, including validation and schema management.

use anyhow::{Context, Result};
use log::debug;

use super::Config;

/// Output the embedded JSON schema to the console.
///
/// This function is called when the `--show-config-schema` flag is provided
/// on the command line. It outputs the full JSON schema for the configuration
/// to stdout, formatted for readability.
///
/// # Example
///
/// ```bash
/// ./rust_acremote --show-config-schema > config_schema.json
/// ```
pub fn output_config_schema() -> Result<()> {
    // Load the schema from the embedded string
    let schema_str = include_str!("../../resources/config.schema.json");

    // Parse the schema to a JSON Value to pretty-format it
    let schema: serde_json::Value =
        serde_json::from_str(schema_str).context("Failed to parse JSON schema")?;

    let formatted_schema =
        serde_json::to_string_pretty(&schema).context("Failed to format JSON schema")?;

    println!("{}", formatted_schema);

    Ok(())
}

/// Check if a string is a plausible panel host
///
/// Validates that a string represents a valid IPv4 or IPv6 address, or a
/// non-empty hostname without URL syntax (the session builds the URL itself).
pub fn is_valid_host(host: &str) -> bool {
    if host.parse::<std::net::IpAddr>().is_ok() {
        return true;
    }

    !host.is_empty() && !host.contains('/') && !host.contains(' ')
}

/// Validates the configuration against additional rules that aren't covered by the JSON schema.
///
/// This function performs deeper validation checks that can't be easily
/// expressed in a JSON schema, such as cross-field relationships between the
/// temperature bounds and the calibration corners.
///
/// # Validation Rules
///
/// - **Panel host**: must be a usable host or IP address
/// - **Temperature bounds**: `lower_temp < upper_temp`, and the configured
///   target must satisfy `lower_temp <= target < upper_temp`
/// - **Calibration**: the raw span between origin and end must be non-zero
///   on both axes (a zero span would make the pixel divider degenerate)
/// - **Surface**: non-zero width and height
/// - **Scheduler**: queue size of at least 1
pub fn validate_specific_rules(config: &Config) -> Result<()> {
    debug!("Performing additional validation checks");

    if !is_valid_host(&config.remote.host) {
        anyhow::bail!("Invalid panel host: {:?}", config.remote.host);
    }

    let remote = &config.remote;
    if remote.lower_temp >= remote.upper_temp {
        anyhow::bail!(
            "Temperature bounds are inverted: lower {} >= upper {}",
            remote.lower_temp,
            remote.upper_temp
        );
    }
    if remote.target_temp < remote.lower_temp || remote.target_temp >= remote.upper_temp {
        anyhow::bail!(
            "Target temperature {} outside the unit's bounds {}..{}",
            remote.target_temp,
            remote.lower_temp,
            remote.upper_temp
        );
    }

    if config.remote.wind_speed > 3 {
        anyhow::bail!("Invalid wind speed index: {}", config.remote.wind_speed);
    }
    if config.remote.wind_angle > 2 {
        anyhow::bail!("Invalid wind angle index: {}", config.remote.wind_angle);
    }

    if config.display.width == 0 || config.display.height == 0 {
        anyhow::bail!(
            "Degenerate display surface: {}x{}",
            config.display.width,
            config.display.height
        );
    }

    let touch = &config.touch;
    if touch.raw_origin[0] == touch.raw_end[0] || touch.raw_origin[1] == touch.raw_end[1] {
        anyhow::bail!(
            "Touch calibration has a zero raw span: origin {:?}, end {:?}",
            touch.raw_origin,
            touch.raw_end
        );
    }

    if config.scheduler.queue_size == 0 {
        anyhow::bail!("Scheduler queue size must be at least 1");
    }

    Ok(())
}
