// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-acremote project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Rectangle widgets with centered text
//!
//! Two kinds only: clickable buttons carrying a [`UiAction`] and static
//! labels. The kind is an explicit tag, dispatched by match rather than any
//! runtime capability probing.

use embedded_graphics::mono_font::iso_8859_1::FONT_10X20;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

use super::UiAction;

/// Widget kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    /// Clickable area bound to a UI action
    Button { action: UiAction },
    /// Static text box
    Label,
}

/// One rectangular UI element: filled area plus optional centered text.
pub struct Widget {
    top_left: Point,
    bottom_right: Point,
    pub kind: WidgetKind,
    text: String,
    fill: Rgb565,
    text_color: Rgb565,
}

impl Widget {
    pub fn button(
        top_left: Point,
        bottom_right: Point,
        text: impl Into<String>,
        fill: Rgb565,
        text_color: Rgb565,
        action: UiAction,
    ) -> Self {
        Self {
            top_left,
            bottom_right,
            kind: WidgetKind::Button { action },
            text: text.into(),
            fill,
            text_color,
        }
    }

    pub fn label(
        top_left: Point,
        bottom_right: Point,
        text: impl Into<String>,
        fill: Rgb565,
        text_color: Rgb565,
    ) -> Self {
        Self {
            top_left,
            bottom_right,
            kind: WidgetKind::Label,
            text: text.into(),
            fill,
            text_color,
        }
    }

    /// Inclusive containment check.
    pub fn contains(&self, point: Point) -> bool {
        self.top_left.x <= point.x
            && point.x <= self.bottom_right.x
            && self.top_left.y <= point.y
            && point.y <= self.bottom_right.y
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_fill(&mut self, fill: Rgb565) {
        self.fill = fill;
    }

    pub fn fill(&self) -> Rgb565 {
        self.fill
    }

    pub fn set_text_color(&mut self, color: Rgb565) {
        self.text_color = color;
    }

    pub fn text_color(&self) -> Rgb565 {
        self.text_color
    }

    /// Fill the rectangle, then center the text inside it.
    pub fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        Rectangle::with_corners(self.top_left, self.bottom_right)
            .into_styled(PrimitiveStyle::with_fill(self.fill))
            .draw(target)?;

        if !self.text.is_empty() {
            let center = Point::new(
                (self.top_left.x + self.bottom_right.x) / 2,
                (self.top_left.y + self.bottom_right.y) / 2,
            );

            let character_style = MonoTextStyle::new(&FONT_10X20, self.text_color);
            let text_style = TextStyleBuilder::new()
                .alignment(Alignment::Center)
                .baseline(Baseline::Middle)
                .build();

            Text::with_text_style(&self.text, center, character_style, text_style)
                .draw(target)?;
        }

        Ok(())
    }
}
