// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-acremote project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration management for the AC remote controller
//!
//! This module provides functionality for loading, validating, and applying
//! configuration settings for the controller. The configuration is backed by
//! a YAML file and validated against a JSON schema for robustness.
//!
//! ## Configuration Structure
//!
//! The application's configuration is organized as a nested structure with sections:
//! - `remote`: Panel address, credentials, temperature bounds, keep-alive cadence
//! - `display`: Framebuffer device, surface dimensions, refresh cadence
//! - `touch`: Touch event device, poll cadence, two-point calibration corners
//! - `scheduler`: Command executor queue size and pacing
//!
//! ## Usage
//!
//! ```no_run
//! use rust_acremote::config::Config;
//! use std::path::Path;
//!
//! // Load config from file, creates a default if not found
//! let mut config = Config::from_file(Path::new("config.yaml")).unwrap();
//!
//! // Apply command line overrides if needed
//! config.apply_args(
//!     Some("10.0.0.2".to_string()),   // Panel host
//!     Some("admin".to_string()),      // Login id
//!     Some("hunter2".to_string()),    // Password
//!     Some(26),                       // Target temperature
//!     None,                           // Wind speed
//!     None,                           // Wind angle
//!     None,                           // Framebuffer path
//!     None,                           // Touch device
//! );
//!
//! // Access configuration values
//! println!("Panel host: {}", config.remote.host);
//! ```

pub mod display;
pub mod remote;
pub mod scheduler;
pub mod touch;
pub mod utils;

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, error};
use serde::{Deserialize, Serialize};

// Re-export all types for public API
pub use display::DisplayConfig;
pub use remote::RemoteConfig;
pub use scheduler::SchedulerConfig;
pub use touch::TouchConfig;
pub use utils::{is_valid_host, output_config_schema};

/// Root configuration structure for the AC remote controller.
///
/// This structure serves as the main container for all configuration
/// sections of the application. It is deserialized from and serialized to
/// YAML using the serde framework, and validated against a JSON schema to
/// ensure all required fields are present and have valid values.
///
/// # Default Values
///
/// Each section uses default values when not explicitly specified in the
/// configuration file, allowing for minimal configuration when custom
/// settings are not required. Credentials have no usable default and are
/// normally supplied on the command line.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Settings for the remote panel session.
    ///
    /// These settings control where the panel lives, how to authenticate
    /// against it, the temperature bounds the unit enforces, and how often
    /// the session is refreshed and re-authenticated.
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Settings for the framebuffer display the UI is rendered onto.
    #[serde(default)]
    pub display: DisplayConfig,

    /// Settings for the touch sensor, including its calibration corners.
    #[serde(default)]
    pub touch: TouchConfig,

    /// Settings for the bounded command executor.
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

impl Config {
    /// Helper method to create a sample config file when validation fails
    fn create_sample_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        debug!("Creating sample configuration file at {:?}", path);
        let sample_path = path.with_extension("sample.yaml");

        // Create parent directories if they don't exist
        if let Some(parent) = sample_path.parent() {
            if !parent.exists() {
                debug!("Creating parent directory: {:?}", parent);
                fs::create_dir_all(parent).with_context(|| {
                    format!(
                        "Failed to create parent directory for sample config at {:?}",
                        parent
                    )
                })?;
            }
        }

        let sample_config = Self::default();
        sample_config
            .save_to_file(&sample_path)
            .with_context(|| format!("Failed to save sample config to {:?}", sample_path))?;

        error!(
            "Sample configuration file created at {:?}\nPlease edit and rename it",
            sample_path
        );
        Ok(())
    }

    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(
                "Configuration file not found at {:?}, creating default",
                path
            );
            let default_config = Self::default();
            default_config.save_to_file(path)?;
            return Ok(default_config);
        }

        debug!("Loading configuration from {:?}", path);
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file at {:?}", path))?;

        // First step: convert YAML to a generic Value
        let yaml_value: serde_yml::Value = serde_yml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML configuration from {:?}", path))?;

        // Convert to JSON Value for validation
        let json_value = serde_json::to_value(&yaml_value).with_context(|| {
            format!("Failed to convert YAML to JSON for validation: {:?}", path)
        })?;

        // Load and validate with the schema
        let schema_str = include_str!("../../resources/config.schema.json");
        let schema: serde_json::Value =
            serde_json::from_str(schema_str).context("Failed to parse JSON schema")?;

        // Create the validator
        let validator = jsonschema::draft202012::options()
            .should_validate_formats(true)
            .build(&schema)?;

        // Validate before deserializing to Config
        debug!("Validating {} configuration against schema", path.display());
        if let Err(error) = validator.validate(&json_value) {
            error!("Configuration validation error before deserialization");
            // We generate a config.sample.yaml file with the default values
            // for the user to edit
            Self::create_sample_config(path)?;
            anyhow::bail!("Configuration validation failed: {}", error);
        }

        // Now that YAML has been validated, deserialize to Config
        debug!("Schema validation passed, deserializing into Config structure");
        let config: Config = match serde_yml::from_str(&contents) {
            Ok(config) => config,
            Err(err) => {
                error!("Configuration deserialization error: {}", err);
                match Self::create_sample_config(path) {
                    Ok(_) => debug!("Successfully created sample config"),
                    Err(e) => error!("Failed to create sample config: {}", e),
                }
                return Err(anyhow::anyhow!(
                    "Failed to deserialize configuration from {}: {}",
                    path.display(),
                    err
                ));
            }
        };

        // Perform additional specific validations
        if let Err(err) = utils::validate_specific_rules(&config) {
            error!("Configuration specific validation error: {}", err);
            Self::create_sample_config(path)?;
            return Err(err);
        }

        Ok(config)
    }

    /// Save the configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml =
            serde_yml::to_string(self).context("Failed to serialize configuration to YAML")?;

        let mut file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create config file at {:?}", path.as_ref()))?;

        file.write_all(yaml.as_bytes())
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Apply command line arguments to override configuration values.
    ///
    /// Only values that are explicitly provided override the existing
    /// configuration.
    ///
    /// # Parameters
    ///
    /// * `host` - Panel host or IP address
    /// * `login_id` - Panel login id
    /// * `password` - Panel login password
    /// * `target_temp` - Initial target temperature in celsius
    /// * `wind_speed` - Wind speed index (0 Auto / 1 Max / 2 Medium / 3 Low)
    /// * `wind_angle` - Wind angle index (0 Swing / 1 Horizontal / 2 Vertical)
    /// * `framebuffer` - Framebuffer device path
    /// * `touch_device` - Touch event device path
    pub fn apply_args(
        &mut self,
        host: Option<String>,
        login_id: Option<String>,
        password: Option<String>,
        target_temp: Option<i32>,
        wind_speed: Option<u8>,
        wind_angle: Option<u8>,
        framebuffer: Option<String>,
        touch_device: Option<String>,
    ) {
        // Only override if command-line arguments are provided
        if let Some(host) = host {
            debug!("Overriding panel host from command line: {}", host);
            self.remote.host = host;
        }

        if let Some(login_id) = login_id {
            debug!("Overriding login id from command line: {}", login_id);
            self.remote.login_id = login_id;
        }

        if let Some(password) = password {
            debug!("Overriding password from command line");
            self.remote.password = password;
        }

        if let Some(temp) = target_temp {
            debug!("Overriding target temperature from command line: {}", temp);
            self.remote.target_temp = temp;
        }

        if let Some(speed) = wind_speed {
            debug!("Overriding wind speed from command line: {}", speed);
            self.remote.wind_speed = speed;
        }

        if let Some(angle) = wind_angle {
            debug!("Overriding wind angle from command line: {}", angle);
            self.remote.wind_angle = angle;
        }

        if let Some(fb) = framebuffer {
            debug!("Overriding framebuffer device from command line: {}", fb);
            self.display.framebuffer = fb;
        }

        if let Some(device) = touch_device {
            debug!("Overriding touch device from command line: {}", device);
            self.touch.device = device;
        }
    }
}
