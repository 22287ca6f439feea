// Copyright 2025 the Troposphere Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Binary-coverage glyph rasterization and straight-alpha compositing.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Point, Rect};
use troposphere::{Glyph, GlyphShape, PixelBuffer, PixelRegion};

use crate::metrics::{ADVANCE, ink_rect};

/// Composite `src` (straight RGB plus alpha) over `dst` (straight RGBA).
pub(crate) fn source_over(dst: [u8; 4], src: [u8; 3], alpha: u8) -> [u8; 4] {
    let sa = f64::from(alpha) / 255.0;
    let da = f64::from(dst[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return [0; 4];
    }
    let mix = |s: u8, d: u8| {
        to_byte((f64::from(s) * sa + f64::from(d) * da * (1.0 - sa)) / out_a)
    };
    [
        mix(src[0], dst[0]),
        mix(src[1], dst[1]),
        mix(src[2], dst[2]),
        to_byte(out_a * 255.0),
    ]
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is clamped to the byte range first"
)]
fn to_byte(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Pixel index range `[start, end)` covered by `[lo, hi)`, clipped to `0..len`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "values are clamped to the buffer extent first"
)]
fn span(lo: f64, hi: f64, len: u32) -> (u32, u32) {
    let len = f64::from(len);
    let start = lo.floor().clamp(0.0, len);
    let end = hi.ceil().clamp(0.0, len);
    (start as u32, end as u32)
}

/// Where a glyph puts ink, in its own unrotated coordinates.
///
/// The origin is the top-left of the glyph's unrotated box. Text keeps one
/// entry per character cell, `None` for blank characters.
enum Ink {
    Block(Rect),
    Text(Vec<Option<Rect>>),
}

impl Ink {
    fn of(glyph: &Glyph) -> Self {
        match glyph.shape {
            GlyphShape::Block => Self::Block(glyph.size.to_rect()),
            GlyphShape::Text => Self::Text(
                glyph
                    .word
                    .text
                    .chars()
                    .enumerate()
                    .map(|(i, c)| ink_rect(c, i, glyph.font_size))
                    .collect(),
            ),
        }
    }

    fn covers(&self, p: Point, font_size: f64) -> bool {
        match self {
            Self::Block(r) => contains(r, p),
            Self::Text(cells) => {
                let cell = (p.x / (ADVANCE * font_size)).floor();
                if cell.is_nan() || cell < 0.0 {
                    return false;
                }
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    reason = "cell is a non-negative whole number; huge values saturate"
                )]
                let cell = cell as usize;
                cells
                    .get(cell)
                    .copied()
                    .flatten()
                    .is_some_and(|r| contains(&r, p))
            }
        }
    }
}

/// Half-open containment, so abutting cells never share a pixel centre.
fn contains(r: &Rect, p: Point) -> bool {
    p.x >= r.x0 && p.x < r.x1 && p.y >= r.y0 && p.y < r.y1
}

/// Map from the glyph's unrotated box to canvas coordinates.
fn glyph_transform(glyph: &Glyph) -> Affine {
    Affine::translate(glyph.position.to_vec2())
        * Affine::rotate(glyph.angle.to_radians())
        * Affine::translate((-glyph.size.width / 2.0, -glyph.size.height / 2.0))
}

/// Draw `glyph` onto `target`, whose top-left sits at canvas `origin`.
///
/// A pixel is inked when its centre falls inside the glyph's ink. Inked pixels
/// are composited with the glyph's colour at the glyph's opacity.
pub(crate) fn draw_glyph(target: &mut PixelBuffer, origin: (i32, i32), glyph: &Glyph) {
    let rgba = glyph.color.to_rgba8();
    let alpha = to_byte(f64::from(rgba.a) * f64::from(glyph.opacity.clamp(0.0, 1.0)));
    if alpha == 0 {
        return;
    }

    let transform = glyph_transform(glyph);
    let inverse = transform.inverse();
    let ink = Ink::of(glyph);
    let bounds = glyph.bounds() - kurbo::Vec2::new(f64::from(origin.0), f64::from(origin.1));
    let (x0, x1) = span(bounds.x0, bounds.x1, target.width());
    let (y0, y1) = span(bounds.y0, bounds.y1, target.height());

    for y in y0..y1 {
        for x in x0..x1 {
            let centre = Point::new(
                f64::from(origin.0) + f64::from(x) + 0.5,
                f64::from(origin.1) + f64::from(y) + 0.5,
            );
            if !ink.covers(inverse * centre, glyph.font_size) {
                continue;
            }
            if let Some(dst) = target.pixel(x, y) {
                target.set_pixel(x, y, source_over(dst, [rgba.r, rgba.g, rgba.b], alpha));
            }
        }
    }
}

/// Copy `region` out of `src`; pixels outside `src` read as transparent.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "indices are clamped to the source bounds first"
)]
pub(crate) fn read_region(src: &PixelBuffer, region: PixelRegion) -> PixelBuffer {
    const CH: usize = PixelBuffer::CHANNELS;
    let mut out = PixelBuffer::transparent(region.width, region.height);
    let (left, top) = (i64::from(region.x), i64::from(region.y));
    let x0 = left.clamp(0, i64::from(src.width()));
    let x1 = (left + i64::from(region.width)).clamp(0, i64::from(src.width()));
    if x0 >= x1 {
        return out;
    }

    let stride = region.width as usize * CH;
    let skip = (x0 - left) as usize * CH;
    for row in 0..region.height {
        let sy = top + i64::from(row);
        if sy < 0 || sy >= i64::from(src.height()) {
            continue;
        }
        let from = &src.row(sy as u32)[x0 as usize * CH..x1 as usize * CH];
        let start = row as usize * stride + skip;
        out.data_mut()[start..start + from.len()].copy_from_slice(from);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::sync::Arc;
    use kurbo::Size;
    use peniko::Color;
    use troposphere::Word;

    fn block(x: f64, y: f64, side: f64, angle: f64) -> Glyph {
        Glyph {
            word: Word::new("b", 1),
            position: Point::new(x, y),
            angle,
            font_size: side,
            size: Size::new(side, side),
            color: Color::BLACK,
            opacity: 0.5,
            font: Arc::from("f"),
            shape: GlyphShape::Block,
        }
    }

    fn inked(buf: &PixelBuffer) -> usize {
        buf.data().chunks_exact(4).filter(|p| p[3] != 0).count()
    }

    #[test]
    fn half_black_over_white_is_mid_grey() {
        assert_eq!(
            source_over([255, 255, 255, 255], [0, 0, 0], 128),
            [127, 127, 127, 255]
        );
        assert_eq!(source_over([0, 0, 0, 0], [0, 0, 0], 128), [0, 0, 0, 128]);
        assert_eq!(source_over([0, 0, 0, 0], [9, 9, 9], 0), [0; 4]);
    }

    #[test]
    fn axis_aligned_block_fills_exactly_its_pixels() {
        let mut buf = PixelBuffer::transparent(20, 20);
        draw_glyph(&mut buf, (0, 0), &block(10.0, 10.0, 6.0, 0.0));
        assert_eq!(inked(&buf), 36);
        assert_eq!(buf.pixel(7, 7), Some([0, 0, 0, 128]));
        assert_eq!(buf.pixel(6, 7), Some([0; 4]));
        assert_eq!(buf.pixel(12, 12), Some([0, 0, 0, 128]));
        assert_eq!(buf.pixel(13, 12), Some([0; 4]));
    }

    #[test]
    fn rotation_keeps_ink_inside_the_rotated_bounds() {
        let glyph = block(20.0, 20.0, 10.0, 45.0);
        let mut buf = PixelBuffer::transparent(40, 40);
        draw_glyph(&mut buf, (0, 0), &glyph);
        let bounds = glyph.bounds();
        for y in 0..40 {
            for x in 0..40 {
                if buf.pixel(x, y).is_some_and(|p| p[3] != 0) {
                    assert!(bounds.contains(Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5)));
                }
            }
        }
        // The corners of the bounding box are outside a diamond.
        assert_eq!(buf.pixel(13, 13), Some([0; 4]));
        assert!(inked(&buf) > 80 && inked(&buf) < 120);
    }

    #[test]
    fn origin_offsets_the_target() {
        let mut buf = PixelBuffer::transparent(4, 4);
        draw_glyph(&mut buf, (8, 8), &block(10.0, 10.0, 2.0, 0.0));
        assert_eq!(inked(&buf), 4);
        assert_eq!(buf.pixel(1, 1), Some([0, 0, 0, 128]));
        assert_eq!(buf.pixel(2, 2), Some([0, 0, 0, 128]));
    }

    #[test]
    fn text_leaves_gaps_between_characters_and_for_spaces() {
        let size = 20.0;
        let glyph = Glyph {
            word: Word::new("l l", 1),
            size: Size::new(3.0 * ADVANCE * size, size),
            shape: GlyphShape::Text,
            font_size: size,
            ..block(30.0, 10.0, size, 0.0)
        };
        let mut buf = PixelBuffer::transparent(60, 20);
        draw_glyph(&mut buf, (0, 0), &glyph);
        let column_inked = |x: u32| (0..20).any(|y| buf.pixel(x, y).is_some_and(|p| p[3] != 0));
        // Box spans x 12..48; cells are 12 wide.
        assert!(column_inked(18));
        assert!(!column_inked(12));
        assert!(!column_inked(30));
        assert!(column_inked(42));
    }

    #[test]
    fn reading_past_the_edges_is_transparent() {
        let mut src = PixelBuffer::transparent(3, 3);
        src.set_pixel(0, 0, [1, 1, 1, 255]);
        src.set_pixel(2, 2, [2, 2, 2, 255]);
        let out = read_region(&src, PixelRegion::new(-1, -1, 3, 3));
        assert_eq!(out.pixel(1, 1), Some([1, 1, 1, 255]));
        assert_eq!(out.pixel(0, 0), Some([0; 4]));
        assert_eq!(out.pixel(2, 2), Some([0; 4]));

        let out = read_region(&src, PixelRegion::new(2, 2, 2, 2));
        assert_eq!(out.pixel(0, 0), Some([2, 2, 2, 255]));
        assert_eq!(out.pixel(1, 1), Some([0; 4]));

        let out = read_region(&src, PixelRegion::new(10, 0, 2, 2));
        assert_eq!(inked(&out), 0);
    }
}
