// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-acremote project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! # Daemon Module
//!
//! The daemon module provides functionality for running and managing the
//! controller's background loops: session keep-alives, command execution,
//! touch polling and the on-screen refresh.
//!
//! ## Components
//!
//! * **Launch Daemon**: Core implementation for starting, cancelling, and
//!   joining the background tasks
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use rust_acremote::config::Config;
//! use rust_acremote::daemon::Daemon;
//! use rust_acremote::display::FramebufferDriver;
//! use rust_acremote::remote::PanelSession;
//! use rust_acremote::scheduler::BoundedExecutor;
//! use rust_acremote::touch::TouchScreen;
//! use rust_acremote::ui::ControlPanel;
//!
//! async fn run() -> anyhow::Result<()> {
//!     let config = Config::from_file("config.yaml")?;
//!
//!     let session = Arc::new(PanelSession::new(&config.remote)?);
//!     let executor = Arc::new(BoundedExecutor::new(
//!         config.scheduler.queue_size,
//!         Duration::from_millis(config.scheduler.execute_interval_ms),
//!     ));
//!     let touch = TouchScreen::open(&config.touch, &config.display)?;
//!     let fb = FramebufferDriver::new(&config.display);
//!     let panel = Arc::new(ControlPanel::new(
//!         &config,
//!         session.clone(),
//!         executor.clone(),
//!         touch,
//!         fb,
//!     ));
//!
//!     // Create and launch daemon
//!     let mut daemon = Daemon::new();
//!     daemon.launch(session, executor.clone(), panel.clone());
//!
//!     // Wait for shutdown signal (e.g., Ctrl+C)
//!     tokio::signal::ctrl_c().await?;
//!
//!     // Clean shutdown
//!     executor.stop();
//!     daemon.shutdown();
//!     panel.graceful_shutdown().await;
//!     daemon.join().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod launch_daemon;

pub use launch_daemon::Daemon;
