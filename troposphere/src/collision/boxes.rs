// Copyright 2025 the Troposphere Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounding box collisions.

use kurbo::Rect;

use crate::glyph::Glyph;

/// Whether two rectangles overlap. Touching edges count as overlapping.
///
/// Any comparison involving NaN fails to separate the rectangles, so NaN
/// coordinates always report an overlap.
pub fn rects_intersect(a: Rect, b: Rect) -> bool {
    // a is left of b
    if a.x1 < b.x0 {
        return false;
    }
    // a is right of b
    if a.x0 > b.x1 {
        return false;
    }
    // a is above b
    if a.y1 < b.y0 {
        return false;
    }
    // a is below b
    if a.y0 > b.y1 {
        return false;
    }
    true
}

/// Whether the centre-anchored bounding boxes of two glyphs overlap.
pub fn glyphs_intersect(a: &Glyph, b: &Glyph) -> bool {
    rects_intersect(a.bounds(), b.bounds())
}
