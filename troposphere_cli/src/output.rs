// Copyright 2025 the Troposphere Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON shape of a finished layout.

use serde::Serialize;
use troposphere::{Config, Glyph, GlyphShape};

/// Everything a consumer needs to redraw the cloud.
#[derive(Debug, Serialize)]
pub(crate) struct LayoutReport<'a> {
    width: u32,
    height: u32,
    font: &'a str,
    seed: u64,
    warnings: usize,
    glyphs: Vec<GlyphRecord<'a>>,
}

/// One placed word.
#[derive(Debug, Serialize)]
struct GlyphRecord<'a> {
    word: &'a str,
    size: u32,
    /// Centre of the glyph.
    x: f64,
    y: f64,
    angle: f64,
    font_size: f64,
    width: f64,
    height: f64,
    color: String,
    opacity: f32,
    block: bool,
}

impl<'a> LayoutReport<'a> {
    pub(crate) fn new(config: &'a Config, seed: u64, glyphs: &'a [Glyph], warnings: usize) -> Self {
        Self {
            width: config.width,
            height: config.height,
            font: &config.font,
            seed,
            warnings,
            glyphs: glyphs.iter().map(GlyphRecord::from).collect(),
        }
    }
}

impl<'a> From<&'a Glyph> for GlyphRecord<'a> {
    fn from(glyph: &'a Glyph) -> Self {
        let rgba = glyph.color.to_rgba8();
        Self {
            word: &glyph.word.text,
            size: glyph.word.weight,
            x: glyph.position.x,
            y: glyph.position.y,
            angle: glyph.angle,
            font_size: glyph.font_size,
            width: glyph.size.width,
            height: glyph.size.height,
            color: format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b),
            opacity: glyph.opacity,
            block: glyph.shape == GlyphShape::Block,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Size};
    use peniko::Color;
    use std::sync::Arc;
    use troposphere::Word;

    #[test]
    fn glyphs_serialize_with_hex_colours() {
        let glyph = Glyph {
            word: Word::new("sky", 4),
            position: Point::new(10.0, 20.0),
            angle: 90.0,
            font_size: 30.0,
            size: Size::new(54.0, 30.0),
            color: Color::from_rgb8(0x12, 0xab, 0x03),
            opacity: 1.0,
            font: Arc::from("f"),
            shape: GlyphShape::Text,
        };
        let config = Config::default();
        let glyphs = [glyph];
        let report = LayoutReport::new(&config, 5, &glyphs, 0);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["width"], 800);
        assert_eq!(json["font"], "Delicious_500");
        assert_eq!(json["glyphs"][0]["word"], "sky");
        assert_eq!(json["glyphs"][0]["size"], 4);
        assert_eq!(json["glyphs"][0]["color"], "#12ab03");
        assert_eq!(json["glyphs"][0]["angle"], 90.0);
        assert_eq!(json["glyphs"][0]["block"], false);
    }
}
