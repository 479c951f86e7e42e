// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-acremote project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Raw-sensor to pixel coordinate calibration
//!
//! Built from two calibration points: the raw reading at the logical origin
//! and the raw reading at the logical far corner (the values found in
//! `xorg.conf.d/99-calibration.conf`). A reversed axis shows up as an end
//! value smaller than the origin value.

use anyhow::Result;

/// Precomputed affine conversion for one axis.
///
/// Runs on every touch sample, so the orientation branch is folded into the
/// constants at construction time: `logical = (gain * raw + offset) / divider`.
#[derive(Debug, Clone, Copy)]
struct AxisMap {
    gain: f64,
    offset: f64,
    divider: f64,
}

impl AxisMap {
    fn new(raw_origin: i32, raw_end: i32, logical_dim: u32) -> Result<Self> {
        let span = raw_end - raw_origin;
        if span == 0 {
            anyhow::bail!(
                "Zero raw span between calibration points {} and {}",
                raw_origin,
                raw_end
            );
        }

        let span_abs = span.abs() as f64;
        let divider = span_abs / logical_dim as f64;

        // reversed axis: (|span| - raw + end) / divider
        // direct axis:   (raw - origin) / divider
        let (gain, offset) = if span < 0 {
            (-1.0, span_abs + raw_end as f64)
        } else {
            (1.0, -(raw_origin as f64))
        };

        Ok(Self {
            gain,
            offset,
            divider,
        })
    }

    fn convert(&self, raw: i32) -> i32 {
        ((self.gain * raw as f64 + self.offset) / self.divider) as i32
    }
}

/// Two-axis raw-to-pixel conversion map.
#[derive(Debug, Clone, Copy)]
pub struct TouchCalibration {
    x: AxisMap,
    y: AxisMap,
}

impl TouchCalibration {
    /// Build the conversion from the logical surface dimensions and the two
    /// raw calibration corners. A zero raw span on either axis is a
    /// configuration error.
    pub fn new(
        logical_dim: (u32, u32),
        raw_origin: [i32; 2],
        raw_end: [i32; 2],
    ) -> Result<Self> {
        Ok(Self {
            x: AxisMap::new(raw_origin[0], raw_end[0], logical_dim.0)?,
            y: AxisMap::new(raw_origin[1], raw_end[1], logical_dim.1)?,
        })
    }

    /// Convert one raw sample into truncated logical pixel coordinates.
    pub fn convert(&self, raw_x: i32, raw_y: i32) -> (i32, i32) {
        (self.x.convert(raw_x), self.y.convert(raw_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_calibration_round_trips() {
        let cal = TouchCalibration::new((480, 320), [0, 0], [480, 320]).unwrap();

        assert_eq!(cal.convert(0, 0), (0, 0));
        assert_eq!(cal.convert(480, 320), (480, 320));
        assert_eq!(cal.convert(240, 160), (240, 160));
    }

    #[test]
    fn scaled_calibration_divides_down() {
        // raw range 4x the pixel range on both axes
        let cal = TouchCalibration::new((480, 320), [0, 0], [1920, 1280]).unwrap();

        assert_eq!(cal.convert(1920, 1280), (480, 320));
        assert_eq!(cal.convert(960, 640), (240, 160));
        // truncation, not rounding
        assert_eq!(cal.convert(7, 7), (1, 1));
    }

    #[test]
    fn reversed_axis_flips_orientation() {
        // y axis reversed: raw 320 at the top edge, raw 0 at the bottom
        let cal = TouchCalibration::new((480, 320), [0, 320], [480, 0]).unwrap();

        let (_, y_top) = cal.convert(0, 320);
        let (_, y_bottom) = cal.convert(0, 0);

        assert_eq!(y_top, 0);
        assert_eq!(y_bottom, 320);
    }

    #[test]
    fn reversed_sensor_range_matches_panel_defaults() {
        // Waveshare-style corners: x reversed, large raw range
        let cal = TouchCalibration::new((480, 320), [3888, 208], [48, 3888]).unwrap();

        let (left, _) = cal.convert(3888, 208);
        let (right, _) = cal.convert(48, 208);

        assert_eq!(left, 0);
        assert_eq!(right, 480);
    }

    #[test]
    fn zero_span_is_a_configuration_error() {
        assert!(TouchCalibration::new((480, 320), [100, 0], [100, 320]).is_err());
        assert!(TouchCalibration::new((480, 320), [0, 250], [480, 250]).is_err());
    }
}
