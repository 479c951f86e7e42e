// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-acremote project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Display stack: framebuffer surface, widgets and the hit-test screen
//!
//! Rendering is deliberately simple — filled rectangles and centered
//! monospace text drawn onto an in-memory RGB565 surface, flushed wholesale
//! to the framebuffer device.

pub mod framebuffer;
pub mod widgets;

use embedded_graphics::prelude::*;

pub use framebuffer::FramebufferDriver;
pub use widgets::{Widget, WidgetKind};

/// Action bound to a button widget, routed through the executor on a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    TempUp,
    TempDown,
    PowerToggle,
}

/// Registration-ordered widget table.
///
/// Built once at UI construction time; widgets mutate (text, colors) but the
/// table itself never changes. Overlapping buttons are resolved by
/// declaration order, not by area or z-order.
#[derive(Default)]
pub struct Screen {
    widgets: Vec<(&'static str, Widget)>,
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a named widget. Registration order decides hit priority.
    pub fn register(&mut self, name: &'static str, widget: Widget) {
        self.widgets.push((name, widget));
    }

    pub fn get(&self, name: &str) -> Option<&Widget> {
        self.widgets
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, w)| w)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Widget> {
        self.widgets
            .iter_mut()
            .find(|(n, _)| *n == name)
            .map(|(_, w)| w)
    }

    /// First registered button whose inclusive rectangle contains the point.
    pub fn hit_test(&self, point: Point) -> Option<(&'static str, UiAction)> {
        for (name, widget) in &self.widgets {
            if let WidgetKind::Button { action } = widget.kind {
                if widget.contains(point) {
                    return Some((*name, action));
                }
            }
        }
        None
    }

    /// Draw every widget in registration order.
    pub fn draw_all<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = embedded_graphics::pixelcolor::Rgb565>,
    {
        for (_, widget) in &self.widgets {
            widget.draw(target)?;
        }
        Ok(())
    }
}
