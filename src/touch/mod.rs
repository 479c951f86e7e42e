// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-acremote project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Touch input: calibration and the raw event device
//!
//! The capacitive sensor reports raw axis values whose range and polarity do
//! not necessarily align with the display's pixel coordinate system. This
//! module maps raw samples into logical pixels via a two-point calibration
//! and resolves batches of raw input events into press-and-release taps.

pub mod calibration;
pub mod driver;

pub use calibration::TouchCalibration;
pub use driver::TouchScreen;
