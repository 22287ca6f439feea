// Copyright 2025 the Troposphere Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout configuration and the tuning values derived from it.

use alloc::string::String;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Size, Vec2};

/// How glyphs are rotated when they are created.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TextAngle {
    /// Every glyph is horizontal.
    #[default]
    Horizontal,
    /// Mostly horizontal, with some glyphs turned a quarter turn either way.
    Tetris,
    /// Small, normally distributed tilts around horizontal.
    Jumble,
    /// Uniformly random tilts within ±30°.
    Shatter,
}

/// Immutable configuration for one word cloud layout.
///
/// Values are clamped rather than rejected; see [`Config::sanitized`].
/// [`CloudLayout`](crate::CloudLayout) sanitizes the configuration it is given.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Canvas width in pixels.
    ///
    /// [`CloudLayout`](crate::CloudLayout) replaces the canvas size with its
    /// surface's.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Only the heaviest `max_words` words are laid out.
    pub max_words: usize,
    /// Upper bound for each colour channel of the final glyph colours.
    pub text_brightness: u8,
    /// Multiplier from relative weight to font size.
    ///
    /// At most the longer canvas side.
    pub word_scale: f64,
    /// Font size floor added to every glyph. At most the longer canvas side.
    pub word_scale_offset: f64,
    /// Rotation mode for new glyphs.
    pub text_angle: TextAngle,
    /// How loosely the spiral search spreads words out, `1..=100`.
    pub spread: f64,
    /// Use the pixel strategy (tight packing around letter shapes) instead of
    /// bounding boxes.
    pub cuddle: bool,
    /// Diagnostic level, `0..=3`.
    ///
    /// Level 1 and above lay out solid blocks instead of text; level 3 also logs
    /// every spiral step.
    pub debug: u8,
    /// Font family handed to the rendering surface.
    pub font: String,
    /// Extra font size added around a glyph's collision mask in pixel mode, so
    /// that words keep some space between them. At most the longer canvas side.
    pub word_padding: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            max_words: 200,
            text_brightness: 150,
            word_scale: 100.0,
            word_scale_offset: 6.0,
            text_angle: TextAngle::Horizontal,
            spread: 25.0,
            cuddle: false,
            debug: 0,
            font: String::from("Delicious_500"),
            word_padding: 8.0,
        }
    }
}

fn finite_in(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback.clamp(min, max)
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is clamped to the u32 range first"
)]
fn pixel_extent(v: f64) -> u32 {
    if v.is_finite() {
        v.round().clamp(0.0, f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

impl Config {
    /// Largest debug level with distinct behavior.
    pub const MAX_DEBUG: u8 = 3;

    /// Clamp every option into its valid range.
    ///
    /// Sizes in font units are bounded by the longer canvas side. Non-finite
    /// values fall back to their defaults.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        self.width = self.width.max(1);
        self.height = self.height.max(1);
        self.max_words = self.max_words.max(1);
        let longest = f64::from(self.width.max(self.height));
        self.word_scale = finite_in(self.word_scale, 0.0, longest, defaults.word_scale);
        self.word_scale_offset = finite_in(
            self.word_scale_offset,
            0.0,
            longest,
            defaults.word_scale_offset,
        );
        self.spread = if self.spread.is_finite() {
            self.spread.clamp(1.0, 100.0)
        } else {
            defaults.spread
        };
        self.debug = self.debug.min(Self::MAX_DEBUG);
        self.word_padding = finite_in(self.word_padding, 0.0, longest, defaults.word_padding);
        self
    }

    /// The same configuration on a canvas of `size`, rounded to whole pixels.
    #[must_use]
    pub fn fitted_to(mut self, size: Size) -> Self {
        self.width = pixel_extent(size.width);
        self.height = pixel_extent(size.height);
        self
    }

    /// Canvas size as a [`Size`].
    pub fn canvas_size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Canvas centre.
    pub fn center(&self) -> Point {
        self.canvas_size().to_rect().center()
    }

    /// Distance the spiral cursor moves per collision.
    ///
    /// Pixel mode packs much tighter than box mode, so it takes larger steps.
    pub fn position_increment(&self) -> f64 {
        let factor = if self.cuddle { 4.0 } else { 1.0 };
        0.5 + factor * self.spread / 100.0
    }

    /// Radial growth of the spiral per turn.
    pub fn spiral_radius(&self) -> f64 {
        let factor = if self.cuddle { 10.0 } else { 1.0 };
        1.0 + factor * self.spread / 100.0
    }

    /// Standard deviation of the starting position jitter on each axis.
    ///
    /// Both axes scale with the canvas width.
    pub fn jitter_std_dev(&self) -> Vec2 {
        let width = f64::from(self.width);
        Vec2::new(width / 20.0, width / 30.0)
    }

    /// Whether glyphs are laid out as solid blocks instead of text.
    pub fn uses_blocks(&self) -> bool {
        self.debug >= 1
    }

    /// Whether every spiral step is logged.
    pub fn traces_steps(&self) -> bool {
        self.debug >= Self::MAX_DEBUG
    }
}
