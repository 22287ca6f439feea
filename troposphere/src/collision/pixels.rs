// Copyright 2025 the Troposphere Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel collisions between a candidate's mask and the composed canvas.
//!
//! While the pixel strategy runs, placed glyphs are drawn black at half
//! opacity onto an opaque white canvas, and the candidate is drawn the same way
//! into a transparent scratch buffer. That gives three distinguishable kinds of
//! pixel:
//!
//! | source                 | typical RGBA           |
//! |------------------------|------------------------|
//! | canvas background      | `255, 255, 255, 255`   |
//! | canvas under a glyph   | `127, 127, 127, 255`   |
//! | off-canvas             | `0, 0, 0, 0`           |
//! | mask under the glyph   | `0, 0, 0, 128`         |
//! | mask elsewhere         | `0, 0, 0, 0`           |
//!
//! Some canvas implementations round the alpha of composited ink to 254, so
//! both 254 and 255 count as opaque.

use crate::surface::PixelBuffer;

/// Whether a composed-canvas pixel holds ink from an already placed glyph.
///
/// The pixel must be opaque (alpha 254 or 255) and not pure-white background.
pub fn is_occupied(rgba: [u8; 4]) -> bool {
    (rgba[3] == 255 || rgba[3] == 254) && rgba[0] != 255
}

/// Whether a mask pixel is covered by the candidate glyph.
///
/// Mask ink is black with non-zero alpha.
pub fn is_covered(rgba: [u8; 4]) -> bool {
    rgba[3] != 0 && rgba[0] == 0
}

/// Row indices `0..height`, starting in the middle and alternating outwards.
///
/// Collisions cluster around a glyph's vertical centre, so scanning from there
/// finds them sooner.
pub fn middle_out_rows(height: u32) -> impl Iterator<Item = u32> {
    let mid = height / 2;
    (0..height).map(move |q| {
        if q % 2 == 0 {
            mid + q / 2
        } else {
            mid - (q / 2 + 1)
        }
    })
}

/// Whether any pixel is both covered by `mask` and occupied on `canvas`.
///
/// Both buffers describe the same canvas region; only their common extent is
/// compared. Scanning stops at the first colliding pixel.
pub fn pixels_collide(canvas: &PixelBuffer, mask: &PixelBuffer) -> bool {
    let width = canvas.width().min(mask.width()) as usize;
    let height = canvas.height().min(mask.height());
    let bytes = width * PixelBuffer::CHANNELS;

    middle_out_rows(height).any(|y| {
        let canvas_row = &canvas.row(y)[..bytes];
        let mask_row = &mask.row(y)[..bytes];
        canvas_row
            .chunks_exact(PixelBuffer::CHANNELS)
            .zip(mask_row.chunks_exact(PixelBuffer::CHANNELS))
            .any(|(c, m)| {
                is_occupied([c[0], c[1], c[2], c[3]]) && is_covered([m[0], m[1], m[2], m[3]])
            })
    })
}
