// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-acremote project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

// Main entry point for the AC web remote touchscreen controller

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use rust_acremote::config::{output_config_schema, utils, Config};
use rust_acremote::daemon::Daemon;
use rust_acremote::display::FramebufferDriver;
use rust_acremote::remote::PanelSession;
use rust_acremote::scheduler::BoundedExecutor;
use rust_acremote::touch::TouchScreen;
use rust_acremote::ui::ControlPanel;

/// Touchscreen remote for a legacy web-managed air conditioner
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Web remote controller IP or host
    ip: Option<String>,

    /// Login id
    #[arg(short, long)]
    id: Option<String>,

    /// Login password
    #[arg(short, long)]
    pwd: Option<String>,

    /// Target temperature in celsius (25 ~ 28)
    #[arg(short, long)]
    temp: Option<i32>,

    /// Target wind angle (0 Swing / 1 Horizontal / 2 Vertical)
    #[arg(short = 'a', long)]
    wind_angle: Option<u8>,

    /// Target wind speed (0 Auto / 1 Max / 2 Mid / 3 Low)
    #[arg(short = 's', long)]
    wind_speed: Option<u8>,

    /// Framebuffer device
    #[arg(short = 'b', long)]
    buffer: Option<String>,

    /// Touch event device
    #[arg(long)]
    touch_device: Option<String>,

    /// Configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the configuration JSON schema and exit
    #[arg(long)]
    show_config_schema: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.show_config_schema {
        return output_config_schema();
    }

    let mut config = Config::from_file(&args.config)?;
    config.apply_args(
        args.ip,
        args.id,
        args.pwd,
        args.temp,
        args.wind_speed,
        args.wind_angle,
        args.buffer,
        args.touch_device,
    );

    // The overrides may have changed bounds-sensitive values
    utils::validate_specific_rules(&config)?;

    info!("Note: the unit is stopped automatically when shutting down by SIGINT");

    let session = Arc::new(PanelSession::new(&config.remote)?);
    let executor = Arc::new(BoundedExecutor::new(
        config.scheduler.queue_size,
        Duration::from_millis(config.scheduler.execute_interval_ms),
    ));
    let touch = TouchScreen::open(&config.touch, &config.display)?;
    let fb = FramebufferDriver::new(&config.display);

    let panel = Arc::new(ControlPanel::new(
        &config,
        session.clone(),
        executor.clone(),
        touch,
        fb,
    ));

    // init app: splash, login, first draw
    panel
        .init()
        .await
        .context("Failed to initialize the control panel")?;

    let mut daemon = Daemon::new();
    daemon.launch(session, executor.clone(), panel.clone());
    info!("Startup complete");

    tokio::signal::ctrl_c().await?;
    info!("Shutting down!");

    // drain the command queue before cancelling the loops
    executor.stop();
    daemon.shutdown();
    panel.graceful_shutdown().await;

    daemon.join().await
}
