// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-acremote project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Remote panel session emulation
//!
//! The AC unit exposes no API, only a browser-oriented web control panel
//! built on hidden anti-forgery/view-state fields. This module emulates a
//! browser session against that panel: it logs in, carries the server-issued
//! hidden tokens forward from response to request, translates high-level
//! intents into form-equivalent command posts, and keeps the session alive
//! against the server's silent expiry.

pub mod page;
pub mod session;

use std::fmt;

use thiserror::Error;

pub use page::PanelPage;
pub use session::PanelSession;

/// Errors surfaced by the panel session.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The panel rejected the login post. Fatal to the caller; no retry is
    /// attempted internally.
    #[error("panel rejected the login")]
    Authentication(#[source] reqwest::Error),

    /// Local validation failure; no request was sent and the target
    /// temperature is unchanged.
    #[error("target temperature {target} outside the unit's bounds {lower}..{upper}")]
    TemperatureOutOfBounds { target: i32, lower: i32, upper: i32 },

    /// The panel rejected a command post, or the post never reached it.
    #[error("panel rejected the command")]
    CommandRejected(#[source] reqwest::Error),

    /// An expected element or attribute was missing from the panel page.
    #[error("panel page is missing element {0:?}")]
    PageLayout(String),

    /// Plain transport failure outside the login/command paths.
    #[error("transport error")]
    Transport(#[from] reqwest::Error),
}

/// Operation mode indicator decoded from the panel page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    Heating,
    Cooling,
    FanOnly,
}

impl OperationMode {
    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(Self::Heating),
            1 => Some(Self::Cooling),
            2 => Some(Self::FanOnly),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Heating => "Heating",
            Self::Cooling => "Cooling",
            Self::FanOnly => "Fan only",
        }
    }
}

impl fmt::Display for OperationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wind speed indicator decoded from the panel page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindSpeed {
    Auto,
    Max,
    Medium,
    Low,
}

impl WindSpeed {
    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(Self::Auto),
            1 => Some(Self::Max),
            2 => Some(Self::Medium),
            3 => Some(Self::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "Auto",
            Self::Max => "Max",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for WindSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wind direction indicator decoded from the panel page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindAngle {
    Swing,
    Horizontal,
    Vertical,
}

impl WindAngle {
    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(Self::Swing),
            1 => Some(Self::Horizontal),
            2 => Some(Self::Vertical),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Swing => "Swing",
            Self::Horizontal => "Horizontal",
            Self::Vertical => "Vertical",
        }
    }
}

impl fmt::Display for WindAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last known state of the unit, overwritten wholesale on every successful
/// page parse.
///
/// The page carries no explicit power indicator; `power` mirrors the last
/// commanded power state at the time of the parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelState {
    pub power: bool,
    pub operation_mode: OperationMode,
    pub current_temp: i32,
    pub target_temp: i32,
    pub wind_speed: WindSpeed,
    pub wind_angle: WindAngle,
}

/// Intent marker set immediately before a command post and cleared
/// unconditionally once the post completes.
///
/// The panel form disambiguates intent solely through the submit button's
/// click coordinates; each action maps to the coordinate pair the real
/// browser would have reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelAction {
    #[default]
    Idle,
    PowerOn,
    PowerOff,
    TempUp,
    TempDown,
}

impl PanelAction {
    /// Coordinate pair posted as `btnSubmit.x` / `btnSubmit.y`.
    pub fn submit_coords(self) -> (u16, u16) {
        match self {
            Self::PowerOn => (94, 40),
            Self::PowerOff => (108, 40),
            Self::TempDown => (95, 35),
            Self::TempUp => (41, 37),
            Self::Idle => (55, 16),
        }
    }
}
