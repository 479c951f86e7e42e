// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-acremote project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Non-blocking reader for the touch event device
//!
//! Reads raw `input_event` records straight from `/dev/input/eventN`. The
//! device is opened with `O_NONBLOCK`, so an empty read simply means "no
//! touch pending" and the poll loop moves on.
//!
//! A batch of records counts as one tap only when it carries both axis
//! positions and a touch release; a batch without the release (finger still
//! down, or a partial axis update) is ignored rather than dispatched on
//! incomplete coordinates. For long presses the kernel emits many axis
//! records; the last value per axis wins.

use std::fs::{File, OpenOptions};
use std::io::{self, Read};
use std::os::unix::fs::OpenOptionsExt;

use anyhow::{Context, Result};
use log::debug;

use crate::config::{DisplayConfig, TouchConfig};

use super::TouchCalibration;

/// Size of one `struct input_event` on 64-bit kernels: a 16-byte timestamp
/// followed by type, code and value.
const INPUT_EVENT_SIZE: usize = 24;

/// Largest batch read in one poll.
const READ_BATCH: usize = 64;

const EV_KEY: u16 = 0x01;
const EV_ABS: u16 = 0x03;
const ABS_X: u16 = 0x00;
const ABS_Y: u16 = 0x01;
const BTN_TOUCH: u16 = 0x14a;

/// One decoded kernel input record (timestamp dropped).
#[derive(Debug, Clone, Copy)]
struct RawEvent {
    kind: u16,
    code: u16,
    value: i32,
}

/// Polled touch sensor bound to its calibration.
pub struct TouchScreen {
    device: File,
    calibration: TouchCalibration,
}

impl TouchScreen {
    /// Open the configured event device and bake the calibration.
    pub fn open(touch: &TouchConfig, display: &DisplayConfig) -> Result<Self> {
        let calibration = TouchCalibration::new(
            (display.width, display.height),
            touch.raw_origin,
            touch.raw_end,
        )?;

        let device = OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(&touch.device)
            .with_context(|| format!("Failed to open touch device {}", touch.device))?;

        debug!("Touch device {} opened", touch.device);

        Ok(Self {
            device,
            calibration,
        })
    }

    /// Read the pending event batch and resolve it into one tap, if any.
    ///
    /// Returns logical pixel coordinates, or `None` when nothing is pending
    /// or the batch holds no complete press-and-release.
    pub fn receive_touch(&mut self) -> io::Result<Option<(i32, i32)>> {
        let mut buf = [0u8; INPUT_EVENT_SIZE * READ_BATCH];

        match self.device.read(&mut buf) {
            Ok(n) => {
                let events = parse_events(&buf[..n]);
                Ok(resolve_tap(&events).map(|(x, y)| self.calibration.convert(x, y)))
            }
            // nothing to read in the touch device
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// Decode whole `input_event` records from a raw read; a trailing partial
/// record is dropped.
fn parse_events(buf: &[u8]) -> Vec<RawEvent> {
    buf.chunks_exact(INPUT_EVENT_SIZE)
        .map(|chunk| RawEvent {
            kind: u16::from_ne_bytes([chunk[16], chunk[17]]),
            code: u16::from_ne_bytes([chunk[18], chunk[19]]),
            value: i32::from_ne_bytes([chunk[20], chunk[21], chunk[22], chunk[23]]),
        })
        .collect()
}

/// Resolve a record batch into a raw tap position.
///
/// Requires at least one `ABS_X`, one `ABS_Y` and a `BTN_TOUCH` release in
/// the same batch; a missing press record is tolerated.
fn resolve_tap(events: &[RawEvent]) -> Option<(i32, i32)> {
    let last_x = events
        .iter()
        .filter(|ev| ev.kind == EV_ABS && ev.code == ABS_X)
        .last()?;
    let last_y = events
        .iter()
        .filter(|ev| ev.kind == EV_ABS && ev.code == ABS_Y)
        .last()?;

    let released = events
        .iter()
        .any(|ev| ev.kind == EV_KEY && ev.code == BTN_TOUCH && ev.value == 0);

    released.then_some((last_x.value, last_y.value))
}
