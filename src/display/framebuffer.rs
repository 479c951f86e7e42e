// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-acremote project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Raw framebuffer driver
//!
//! Holds the whole surface as an RGB565 little-endian byte buffer and
//! flushes it to the framebuffer device in one write. Primarily intended for
//! GPIO LCD hats on boards where even a bare X server is too heavy.
//!
//! Test the device independently with:
//! `while true; do sudo cat /dev/urandom > /dev/fb1; sleep .01; done`

use std::convert::Infallible;
use std::io;

use embedded_graphics::pixelcolor::raw::ToBytes;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use log::debug;

use crate::config::DisplayConfig;

/// In-memory RGB565 surface bound to a framebuffer device path.
pub struct FramebufferDriver {
    path: String,
    width: u32,
    height: u32,
    buffer: Vec<u8>,
}

impl FramebufferDriver {
    /// Allocate a zeroed (black) surface for the configured device.
    pub fn new(cfg: &DisplayConfig) -> Self {
        debug!("Using framebuffer {}", cfg.framebuffer);

        Self {
            path: cfg.framebuffer.clone(),
            width: cfg.width,
            height: cfg.height,
            buffer: vec![0; (cfg.width * cfg.height) as usize * 2],
        }
    }

    /// Write the whole surface to the framebuffer device.
    pub async fn flush(&self) -> io::Result<()> {
        tokio::fs::write(&self.path, &self.buffer).await
    }

    /// Clear the surface to black.
    pub fn blank(&mut self) {
        self.buffer.fill(0);
    }

    /// Raw surface bytes, row-major RGB565 little-endian.
    pub fn data(&self) -> &[u8] {
        &self.buffer
    }
}

impl OriginDimensions for FramebufferDriver {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for FramebufferDriver {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0
                || point.y < 0
                || point.x as u32 >= self.width
                || point.y as u32 >= self.height
            {
                continue;
            }

            let index = ((point.y as u32 * self.width + point.x as u32) * 2) as usize;
            self.buffer[index..index + 2].copy_from_slice(&color.to_le_bytes());
        }

        Ok(())
    }
}
