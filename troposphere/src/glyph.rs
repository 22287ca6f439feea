// Copyright 2025 the Troposphere Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph descriptors: a word together with its size, rotation, colour and centre.

use alloc::sync::Arc;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect, Size};
use peniko::Color;
use rand::Rng;

use crate::color::ColorBias;
use crate::config::{Config, TextAngle};
use crate::jitter::{jitter, jitter_point};
use crate::surface::RenderingSurface;
use crate::word::Word;

/// Opacity glyphs are drawn with while the pixel strategy is still placing them.
pub const PLACEMENT_OPACITY: f32 = 0.5;

/// Opacity of debug blocks in box mode.
pub const BLOCK_OPACITY: f32 = 0.8;

/// What a glyph looks like on the surface.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum GlyphShape {
    /// The word's text, set in the configured font.
    #[default]
    Text,
    /// A solid square whose side is the glyph's font size.
    Block,
}

/// A word's rendered representation.
///
/// Positions are centre-anchored: [`position`](Self::position) is the middle of
/// the glyph, not a corner.
#[derive(Clone, Debug, PartialEq)]
pub struct Glyph {
    /// The word this glyph renders.
    pub word: Word,
    /// Centre of the glyph on the canvas.
    pub position: Point,
    /// Clockwise rotation in degrees.
    pub angle: f64,
    /// Font size (or block side length).
    pub font_size: f64,
    /// Unrotated extents as measured by the rendering surface.
    pub size: Size,
    /// Fill colour.
    pub color: Color,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
    /// Font family.
    pub font: Arc<str>,
    /// Text or block.
    pub shape: GlyphShape,
}

impl Glyph {
    /// Axis-aligned extents of the rotated glyph.
    pub fn extent(&self) -> Size {
        if self.angle == 0.0 {
            return self.size;
        }
        let (sin, cos) = self.angle.to_radians().sin_cos();
        let (sin, cos) = (sin.abs(), cos.abs());
        Size::new(
            self.size.width * cos + self.size.height * sin,
            self.size.width * sin + self.size.height * cos,
        )
    }

    /// Axis-aligned bounding box, centred on [`position`](Self::position).
    pub fn bounds(&self) -> Rect {
        Rect::from_center_size(self.position, self.extent())
    }

    /// Measure the unrotated extents of this glyph on `surface`.
    ///
    /// Blocks are squares of side [`font_size`](Self::font_size); text is measured
    /// by the surface.
    pub fn measure<S: RenderingSurface + ?Sized>(&self, surface: &mut S) -> Size {
        match self.shape {
            GlyphShape::Block => Size::new(self.font_size, self.font_size),
            GlyphShape::Text => surface.measure_text(&self.word.text, &self.font, self.font_size),
        }
    }

    /// A copy of this glyph grown by `padding` font-size units and re-measured.
    #[must_use]
    pub fn padded<S: RenderingSurface + ?Sized>(&self, padding: f64, surface: &mut S) -> Self {
        let mut padded = self.clone();
        padded.font_size += padding;
        padded.size = padded.measure(surface);
        padded
    }
}

/// Font size for a word of `weight` when the heaviest word weighs `highest`.
pub fn font_size(config: &Config, weight: u32, highest: u32) -> f64 {
    let ratio = if highest == 0 {
        0.0
    } else {
        f64::from(weight) / f64::from(highest)
    };
    (config.word_scale_offset + config.word_scale * ratio).floor()
}

/// Starting rotation for a new glyph.
pub fn initial_angle<R: Rng + ?Sized>(mode: TextAngle, rng: &mut R) -> f64 {
    match mode {
        TextAngle::Horizontal => 0.0,
        TextAngle::Tetris => (rng.r#gen::<f64>() * 1.2 + 0.9).floor() * 90.0 - 90.0,
        TextAngle::Jumble => jitter(rng, 0.0, 7.0),
        TextAngle::Shatter => rng.r#gen::<f64>() * 60.0 - 30.0,
    }
}

/// Build the unplaced glyph for every filtered word.
///
/// Each glyph starts at a jittered position around the canvas centre. Pixel mode
/// glyphs are black and half transparent until placement finishes; box mode
/// glyphs get their final colour right away.
pub(crate) fn build_glyphs<S, R>(
    words: &[Word],
    highest: u32,
    config: &Config,
    bias: &ColorBias,
    surface: &mut S,
    rng: &mut R,
) -> Vec<Glyph>
where
    S: RenderingSurface + ?Sized,
    R: Rng + ?Sized,
{
    let font: Arc<str> = Arc::from(config.font.as_str());
    let canvas = config.canvas_size();
    let center = config.center();
    let std_dev = config.jitter_std_dev();

    words
        .iter()
        .map(|word| {
            let (shape, font_size, angle, position) = if config.uses_blocks() {
                let side = config.word_scale * f64::from(word.weight) / 100.0;
                let low = (canvas.width / 4.0).floor();
                let high = (canvas.width * 3.0 / 4.0).floor();
                let x = low + (rng.r#gen::<f64>() * (high - low + 1.0)).floor();
                (GlyphShape::Block, side, 0.0, Point::new(x, center.y))
            } else {
                let angle = initial_angle(config.text_angle, rng);
                let position = jitter_point(rng, center, std_dev);
                let size = font_size(config, word.weight, highest);
                (GlyphShape::Text, size, angle, position)
            };

            let (color, opacity) = if config.cuddle {
                (Color::BLACK, PLACEMENT_OPACITY)
            } else if shape == GlyphShape::Block {
                (bias.color(rng), BLOCK_OPACITY)
            } else {
                (bias.color(rng), 1.0)
            };

            let mut glyph = Glyph {
                word: word.clone(),
                position,
                angle,
                font_size,
                size: Size::ZERO,
                color,
                opacity,
                font: font.clone(),
                shape,
            };
            glyph.size = glyph.measure(surface);
            glyph
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn glyph(size: Size, angle: f64) -> Glyph {
        Glyph {
            word: Word::new("w", 1),
            position: Point::new(100.0, 50.0),
            angle,
            font_size: 10.0,
            size,
            color: Color::BLACK,
            opacity: 1.0,
            font: Arc::from("f"),
            shape: GlyphShape::Text,
        }
    }

    #[test]
    fn bounds_are_centre_anchored() {
        let g = glyph(Size::new(40.0, 10.0), 0.0);
        assert_eq!(g.bounds(), Rect::new(80.0, 45.0, 120.0, 55.0));
    }

    #[test]
    fn quarter_turn_swaps_extents() {
        let g = glyph(Size::new(40.0, 10.0), 90.0);
        let e = g.extent();
        assert!((e.width - 10.0).abs() < 1e-9);
        assert!((e.height - 40.0).abs() < 1e-9);
    }

    #[test]
    fn tilted_extent_covers_the_rotated_rectangle() {
        let g = glyph(Size::new(40.0, 10.0), 30.0);
        let e = g.extent();
        assert!(e.width > 10.0 && e.width < 50.0);
        assert!(e.height > 10.0 && e.height < 50.0);
        assert!(e.width * e.height > 400.0);
    }

    #[test]
    fn font_size_floors_and_tolerates_all_zero_weights() {
        let c = Config::default();
        assert_eq!(font_size(&c, 13, 13), 106.0);
        assert_eq!(font_size(&c, 4, 13), 36.0);
        assert_eq!(font_size(&c, 0, 0), 6.0);
    }

    #[test]
    fn tetris_angles_are_quarter_turns() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut seen_zero = false;
        for _ in 0..500 {
            let a = initial_angle(TextAngle::Tetris, &mut rng);
            assert!([-90.0, 0.0, 90.0].contains(&a), "unexpected angle {a}");
            seen_zero |= a == 0.0;
        }
        assert!(seen_zero);
    }

    #[test]
    fn shatter_and_jumble_stay_bounded() {
        let mut rng = SmallRng::seed_from_u64(8);
        for _ in 0..500 {
            let s = initial_angle(TextAngle::Shatter, &mut rng);
            assert!((-30.0..30.0).contains(&s));
            let j = initial_angle(TextAngle::Jumble, &mut rng);
            assert!((-21.0..=21.0).contains(&j));
        }
        assert_eq!(initial_angle(TextAngle::Horizontal, &mut rng), 0.0);
    }
}
