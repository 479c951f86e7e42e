// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-acremote project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use anyhow::Result;
use rust_acremote::config::{utils, Config, RemoteConfig};
use tempfile::tempdir;

#[test]
fn test_config_load_and_save() -> Result<()> {
    // Create a temporary directory
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("config.yaml");

    // Create a custom config
    let config = Config {
        remote: RemoteConfig {
            host: "10.0.0.42".to_string(),
            login_id: "admin".to_string(),
            target_temp: 27,
            ..RemoteConfig::default()
        },
        ..Config::default()
    };

    // Save config to file
    config.save_to_file(&config_path)?;

    // Load config from file
    let loaded_config = Config::from_file(&config_path)?;

    // Verify loaded config matches original
    assert_eq!(loaded_config.remote.host, "10.0.0.42");
    assert_eq!(loaded_config.remote.login_id, "admin");
    assert_eq!(loaded_config.remote.target_temp, 27);
    assert_eq!(loaded_config.display.width, 480);
    assert_eq!(loaded_config.scheduler.queue_size, 4);

    // Test loading default config for non-existent file
    let non_existent_path = temp_dir.path().join("non_existent.yaml");
    let default_config = Config::from_file(&non_existent_path)?;

    // Verify default config was created
    assert!(non_existent_path.exists());
    assert_eq!(default_config.remote.lower_temp, 25);
    assert_eq!(default_config.remote.upper_temp, 29);
    assert_eq!(default_config.display.framebuffer, "/dev/fb1");

    Ok(())
}

#[test]
fn test_apply_args_overrides() {
    let mut config = Config::default();
    assert_eq!(config.remote.host, "192.168.0.1");
    assert_eq!(config.remote.target_temp, 26);

    config.apply_args(
        Some("10.1.1.1".to_string()),
        Some("user".to_string()),
        Some("secret".to_string()),
        Some(27),
        Some(1),
        Some(2),
        Some("/dev/fb0".to_string()),
        Some("/dev/input/event2".to_string()),
    );

    assert_eq!(config.remote.host, "10.1.1.1");
    assert_eq!(config.remote.login_id, "user");
    assert_eq!(config.remote.password, "secret");
    assert_eq!(config.remote.target_temp, 27);
    assert_eq!(config.remote.wind_speed, 1);
    assert_eq!(config.remote.wind_angle, 2);
    assert_eq!(config.display.framebuffer, "/dev/fb0");
    assert_eq!(config.touch.device, "/dev/input/event2");

    // None leaves values untouched
    config.apply_args(None, None, None, None, None, None, None, None);
    assert_eq!(config.remote.host, "10.1.1.1");
    assert_eq!(config.remote.target_temp, 27);
}

#[test]
fn test_specific_validation_rules() {
    // The default configuration is valid
    let config = Config::default();
    assert!(utils::validate_specific_rules(&config).is_ok());

    // Inverted temperature bounds
    let mut config = Config::default();
    config.remote.lower_temp = 30;
    assert!(utils::validate_specific_rules(&config).is_err());

    // Target outside the bounds
    let mut config = Config::default();
    config.remote.target_temp = 29;
    assert!(utils::validate_specific_rules(&config).is_err());

    // Degenerate calibration span
    let mut config = Config::default();
    config.touch.raw_end[0] = config.touch.raw_origin[0];
    assert!(utils::validate_specific_rules(&config).is_err());

    // Zero-capacity scheduler
    let mut config = Config::default();
    config.scheduler.queue_size = 0;
    assert!(utils::validate_specific_rules(&config).is_err());

    // Unusable host
    let mut config = Config::default();
    config.remote.host = "http://not a host".to_string();
    assert!(utils::validate_specific_rules(&config).is_err());
}

#[test]
fn test_invalid_config_produces_sample_file() -> Result<()> {
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("config.yaml");

    // Schema-valid YAML that fails the specific rules
    std::fs::write(
        &config_path,
        "remote:\n  target_temp: 40\n  upper_temp: 29\n  lower_temp: 25\n",
    )?;

    let result = Config::from_file(&config_path);
    assert!(result.is_err());

    // A sample file is generated next to the rejected one
    assert!(temp_dir.path().join("config.sample.yaml").exists());

    Ok(())
}

#[test]
fn test_schema_rejects_unknown_sections() -> Result<()> {
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("config.yaml");

    std::fs::write(&config_path, "telemetry:\n  enabled: true\n")?;

    assert!(Config::from_file(&config_path).is_err());

    Ok(())
}
