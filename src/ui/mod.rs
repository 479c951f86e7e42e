// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-acremote project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Control panel application
//!
//! Bakes the on-screen layout, routes touch hits into session commands
//! through the bounded executor, and keeps the readouts fresh. All drawing
//! and flushing goes through one mutex, so the surface is never flushed
//! concurrently.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use log::{debug, info, warn};
use tokio::sync::Mutex;
use tokio::time::sleep;

use crate::config::Config;
use crate::display::{FramebufferDriver, Screen, UiAction, Widget};
use crate::remote::session::jitter_secs;
use crate::remote::{PanelSession, RemoteError};
use crate::scheduler::BoundedExecutor;
use crate::touch::TouchScreen;

const BACKGROUND: Rgb565 = Rgb565::new(3, 6, 3);
const BUSY: Rgb565 = Rgb565::YELLOW;
const POWER_ON_FILL: Rgb565 = Rgb565::GREEN;
const POWER_OFF_FILL: Rgb565 = Rgb565::new(12, 25, 12);
const ERROR_TEXT: Rgb565 = Rgb565::RED;

/// Granularity of the refresh loop's wait-until-due polling.
const REFRESH_POLL: Duration = Duration::from_secs(10);

/// How long the target readout stays red after a refused temperature step.
const FEEDBACK_HOLD: Duration = Duration::from_secs(1);

/// Drawing surface and its widget table, serialized behind one lock.
struct Surface {
    screen: Screen,
    fb: FramebufferDriver,
}

/// The touchscreen control panel application.
pub struct ControlPanel {
    session: Arc<PanelSession>,
    executor: Arc<BoundedExecutor>,
    surface: Mutex<Surface>,
    touch: Mutex<TouchScreen>,
    poll_interval: Duration,
    refresh_interval_secs: u64,
    refresh_jitter_secs: u64,
    last_update: Mutex<Instant>,
}

/// Build the fixed 480x320 layout.
fn bake_screen() -> Screen {
    let mut screen = Screen::new();

    screen.register(
        "temp-up",
        Widget::button(
            Point::new(10, 10),
            Point::new(70, 70),
            "+",
            Rgb565::RED,
            Rgb565::WHITE,
            UiAction::TempUp,
        ),
    );
    screen.register(
        "temp-down",
        Widget::button(
            Point::new(10, 80),
            Point::new(70, 140),
            "-",
            Rgb565::BLUE,
            Rgb565::WHITE,
            UiAction::TempDown,
        ),
    );
    screen.register(
        "power",
        Widget::button(
            Point::new(10, 250),
            Point::new(70, 310),
            "PWR",
            POWER_OFF_FILL,
            Rgb565::WHITE,
            UiAction::PowerToggle,
        ),
    );
    screen.register(
        "temp-target",
        Widget::label(
            Point::new(220, 10),
            Point::new(470, 70),
            "TGT --\u{b0}C",
            BACKGROUND,
            Rgb565::GREEN,
        ),
    );
    screen.register(
        "temp-current",
        Widget::label(
            Point::new(220, 80),
            Point::new(470, 140),
            "CUR --\u{b0}C",
            BACKGROUND,
            Rgb565::WHITE,
        ),
    );
    screen.register(
        "mode",
        Widget::label(
            Point::new(370, 260),
            Point::new(470, 310),
            "Off",
            BACKGROUND,
            Rgb565::WHITE,
        ),
    );

    screen
}

impl ControlPanel {
    pub fn new(
        cfg: &Config,
        session: Arc<PanelSession>,
        executor: Arc<BoundedExecutor>,
        touch: TouchScreen,
        fb: FramebufferDriver,
    ) -> Self {
        Self {
            session,
            executor,
            surface: Mutex::new(Surface {
                screen: bake_screen(),
                fb,
            }),
            touch: Mutex::new(touch),
            poll_interval: Duration::from_millis(cfg.touch.poll_interval_ms),
            refresh_interval_secs: cfg.display.refresh_interval_secs,
            refresh_jitter_secs: cfg.display.refresh_jitter_secs,
            last_update: Mutex::new(Instant::now()),
        }
    }

    /// Init jobs that require async: splash, login, first full draw.
    pub async fn init(&self) -> Result<()> {
        self.show_splash().await?;
        self.session.login().await?;
        self.sync_readouts().await;
        self.draw_ui().await?;

        *self.last_update.lock().await = Instant::now();
        Ok(())
    }

    /// Poll the touch sensor and dispatch hits into the executor.
    ///
    /// A failed read or a missed hit never aborts the loop; the submitted
    /// command is not awaited here.
    pub async fn poll_touch(self: Arc<Self>) -> Result<()> {
        debug!("Touch polling started");

        loop {
            sleep(self.poll_interval).await;

            let touch = self.touch.lock().await.receive_touch();
            let (x, y) = match touch {
                Ok(Some(coord)) => coord,
                Ok(None) => continue,
                Err(err) => {
                    warn!("Touch read failed: {}", err);
                    continue;
                }
            };

            let hit = self.surface.lock().await.screen.hit_test(Point::new(x, y));
            if let Some((name, action)) = hit {
                debug!("Element {} click at ({}, {})", name, x, y);

                let panel = Arc::clone(&self);
                self.executor
                    .submit(name, async move { panel.handle_action(action).await });
            }
        }
    }

    /// Keep the on-screen temperatures fresh.
    ///
    /// Waits until the configured interval has passed since the last
    /// successful update (commands and keep-alives also refresh state, so
    /// the pacing is measured, not scheduled), then refreshes and redraws.
    pub async fn update_temp_loop(self: Arc<Self>) -> Result<()> {
        debug!("Temp update started");

        loop {
            let target =
                Duration::from_secs(self.refresh_interval_secs + jitter_secs(self.refresh_jitter_secs));

            // sleep until the desired interval from last_update is reached
            loop {
                let elapsed = self.last_update.lock().await.elapsed();
                if elapsed >= target {
                    break;
                }
                sleep(REFRESH_POLL.min(target - elapsed)).await;
            }

            if let Err(err) = self.session.refresh().await {
                warn!("Screen refresh fetch failed: {}", err);
            }
            *self.last_update.lock().await = Instant::now();

            self.sync_readouts().await;
            if let Err(err) = self.draw_ui().await {
                warn!("Display flush failed: {}", err);
            }
        }
    }

    /// Run one button action with on-screen busy feedback.
    pub async fn handle_action(&self, action: UiAction) {
        let name = match action {
            UiAction::TempUp => "temp-up",
            UiAction::TempDown => "temp-down",
            UiAction::PowerToggle => "power",
        };

        let previous_fill = self.flash_widget(name, BUSY).await;

        let result = match action {
            UiAction::TempUp => self.session.temp_up().await,
            UiAction::TempDown => self.session.temp_down().await,
            UiAction::PowerToggle => {
                if self.session.is_powered().await {
                    self.session.power_off().await
                } else {
                    self.session.power_on().await
                }
            }
        };

        match result {
            Ok(()) => {}
            Err(RemoteError::TemperatureOutOfBounds { target, lower, upper }) => {
                debug!(
                    "Refused target {} (bounds {}..{})",
                    target, lower, upper
                );
                self.flash_bounds_feedback().await;
            }
            Err(err) => warn!("Command failed: {}", err),
        }

        if let Some(fill) = previous_fill {
            self.set_widget_fill(name, fill).await;
        }

        self.sync_readouts().await;
        if let Err(err) = self.draw_ui().await {
            warn!("Display flush failed: {}", err);
        }
    }

    /// Attempt a clean exit: power the unit off if it is running.
    pub async fn graceful_shutdown(&self) {
        if !self.session.is_powered().await {
            return;
        }

        info!("Powering the unit off before exit");
        if let Err(err) = self.session.power_off().await {
            warn!("Shutdown power-off failed: {}", err);
        }

        self.sync_readouts().await;
        if let Err(err) = self.draw_ui().await {
            warn!("Display flush failed: {}", err);
        }
    }

    /// Redraw every widget and flush the surface.
    async fn draw_ui(&self) -> Result<()> {
        let mut surface = self.surface.lock().await;
        let surface = &mut *surface;

        // Infallible on the in-memory surface
        let _ = surface.screen.draw_all(&mut surface.fb);
        surface.fb.flush().await?;
        Ok(())
    }

    async fn show_splash(&self) -> Result<()> {
        let mut surface = self.surface.lock().await;
        let surface = &mut *surface;

        surface.fb.blank();
        let splash = Widget::label(
            Point::new(140, 130),
            Point::new(340, 190),
            "AC remote",
            BACKGROUND,
            Rgb565::WHITE,
        );
        let _ = splash.draw(&mut surface.fb);

        surface.fb.flush().await?;
        Ok(())
    }

    /// Copy the session's view of the unit into the widget texts.
    async fn sync_readouts(&self) {
        let target = self.session.target_temp().await;
        let powered = self.session.is_powered().await;
        let observed = self.session.observed_state().await;

        let mut surface = self.surface.lock().await;

        if let Some(widget) = surface.screen.get_mut("temp-target") {
            widget.set_text(format!("TGT {}\u{b0}C", target));
        }

        if let Some(widget) = surface.screen.get_mut("temp-current") {
            match &observed {
                Some(state) => widget.set_text(format!("CUR {}\u{b0}C", state.current_temp)),
                None => widget.set_text("CUR --\u{b0}C"),
            }
        }

        if let Some(widget) = surface.screen.get_mut("mode") {
            match (&observed, powered) {
                (Some(state), true) => widget.set_text(state.operation_mode.as_str()),
                _ => widget.set_text("Off"),
            }
        }

        if let Some(widget) = surface.screen.get_mut("power") {
            widget.set_fill(if powered { POWER_ON_FILL } else { POWER_OFF_FILL });
        }
    }

    /// Recolor one widget and flush just that area's new look.
    /// Returns the previous fill so the caller can restore it.
    async fn flash_widget(&self, name: &str, fill: Rgb565) -> Option<Rgb565> {
        let mut surface = self.surface.lock().await;
        let surface = &mut *surface;

        let widget = surface.screen.get_mut(name)?;
        let previous = widget.fill();
        widget.set_fill(fill);
        let _ = widget.draw(&mut surface.fb);

        if let Err(err) = surface.fb.flush().await {
            warn!("Display flush failed: {}", err);
        }

        Some(previous)
    }

    async fn set_widget_fill(&self, name: &str, fill: Rgb565) {
        let mut surface = self.surface.lock().await;
        if let Some(widget) = surface.screen.get_mut(name) {
            widget.set_fill(fill);
        }
    }

    /// Turn the target readout red for a moment after a refused step.
    async fn flash_bounds_feedback(&self) {
        {
            let mut surface = self.surface.lock().await;
            let surface = &mut *surface;
            if let Some(widget) = surface.screen.get_mut("temp-target") {
                widget.set_text_color(ERROR_TEXT);
                let _ = widget.draw(&mut surface.fb);
            }
            if let Err(err) = surface.fb.flush().await {
                warn!("Display flush failed: {}", err);
            }
        }

        sleep(FEEDBACK_HOLD).await;

        let mut surface = self.surface.lock().await;
        if let Some(widget) = surface.screen.get_mut("temp-target") {
            widget.set_text_color(Rgb565::GREEN);
        }
    }
}
