// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-acremote project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Panel page extraction
//!
//! The panel is a classic view-state web form: every response carries three
//! hidden anti-forgery inputs that must be echoed verbatim on the next
//! request, and displays the unit's state through fixed `img` elements whose
//! resource paths embed a numeric index.
//!
//! Observed page layout:
//!
//! - `input#__VIEWSTATE`, `input#__VIEWSTATEGENERATOR`,
//!   `input#__EVENTVALIDATION` — opaque tokens, `value` attribute
//! - `img#Image_1` — `src` like `images/nn_1.gif`, operation mode index
//! - `img#Image_2` — `src` like `images/Tem_24.gif`, current temp in celsius
//! - `img#Image_3` — target temp, same encoding as `Image_2`
//! - `img#Image_4` — `src` like `images/mm_0.gif`, wind speed index
//! - `img#Image_5` — `src` like `images/kk_1.gif`, wind angle index

use std::collections::HashMap;

use scraper::{Html, Selector};

use super::{OperationMode, PanelState, RemoteError, WindAngle, WindSpeed};

/// Identifiers of the hidden anti-forgery inputs the panel expects back.
pub const HIDDEN_FIELD_IDS: [&str; 3] = ["__VIEWSTATE", "__VIEWSTATEGENERATOR", "__EVENTVALIDATION"];

/// One parsed panel response: the hidden tokens plus, when the page shows
/// the remote controller, the decoded unit state.
#[derive(Debug, Clone)]
pub struct PanelPage {
    pub hidden_fields: HashMap<String, String>,
}

impl PanelPage {
    /// Extract the hidden token inputs from a response body.
    ///
    /// Works on every panel page, including the login landing page, which
    /// carries the tokens but not the state indicators.
    pub fn parse(body: &str) -> Result<Self, RemoteError> {
        Ok(Self {
            hidden_fields: hidden_fields(body)?,
        })
    }
}

/// Extract the three hidden tokens from a response body.
pub fn hidden_fields(body: &str) -> Result<HashMap<String, String>, RemoteError> {
    let document = Html::parse_document(body);

    let mut fields = HashMap::with_capacity(HIDDEN_FIELD_IDS.len());
    for id in HIDDEN_FIELD_IDS {
        fields.insert(id.to_string(), attr_by_id(&document, "input", id, "value")?);
    }
    Ok(fields)
}

/// Decode the full unit state from a remote controller page.
///
/// This is the sole place observed state is computed from a response; the
/// server returns a full page each time, so the result always replaces the
/// previous state completely. `power` is left `false` for the session to
/// fill in (the page has no power indicator).
pub fn parse_state(body: &str) -> Result<PanelState, RemoteError> {
    let document = Html::parse_document(body);

    let mode_index = indicator_index(&document, "Image_1")?;
    let current_temp = indicator_index(&document, "Image_2")? as i32;
    let target_temp = indicator_index(&document, "Image_3")? as i32;
    let speed_index = indicator_index(&document, "Image_4")?;
    let angle_index = indicator_index(&document, "Image_5")?;

    Ok(PanelState {
        power: false,
        operation_mode: OperationMode::from_index(mode_index)
            .ok_or_else(|| RemoteError::PageLayout("Image_1".to_string()))?,
        current_temp,
        target_temp,
        wind_speed: WindSpeed::from_index(speed_index)
            .ok_or_else(|| RemoteError::PageLayout("Image_4".to_string()))?,
        wind_angle: WindAngle::from_index(angle_index)
            .ok_or_else(|| RemoteError::PageLayout("Image_5".to_string()))?,
    })
}

/// Decode the numeric index embedded in an indicator's image path.
fn indicator_index(document: &Html, id: &str) -> Result<u32, RemoteError> {
    let src = attr_by_id(document, "img", id, "src")?;
    digit_run(&src).ok_or_else(|| RemoteError::PageLayout(id.to_string()))
}

/// Find an element by id and return one of its attributes.
fn attr_by_id(document: &Html, tag: &str, id: &str, attr: &str) -> Result<String, RemoteError> {
    let selector = Selector::parse(&format!(r#"{tag}[id="{id}"]"#))
        .map_err(|_| RemoteError::PageLayout(id.to_string()))?;

    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr(attr))
        .map(str::to_string)
        .ok_or_else(|| RemoteError::PageLayout(id.to_string()))
}

/// First contiguous run of ASCII digits in a resource path.
fn digit_run(src: &str) -> Option<u32> {
    let digits: String = src
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    digits.parse().ok()
}
