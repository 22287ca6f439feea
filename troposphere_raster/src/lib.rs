// Copyright 2025 the Troposphere Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Troposphere Raster: an in-memory software [`RenderingSurface`].
//!
//! [`RasterSurface`] keeps an opaque white RGBA8 canvas and composites glyphs
//! onto it with straight-alpha source-over blending. Pixel read-backs follow 2D
//! canvas conventions: pixels outside the canvas read as transparent black and
//! the scratch buffer used for isolated renders starts out transparent.
//!
//! Text is measured and drawn with a deterministic monospaced block model (see
//! [`metrics`]): no fonts are loaded, and the configured font name is ignored.
//! That makes the surface suitable for headless layout, tests and benchmarks.
//!
//! ```rust
//! use rand::SeedableRng;
//! use rand::rngs::SmallRng;
//! use troposphere::{CloudLayout, Config, Word};
//! use troposphere_raster::RasterSurface;
//!
//! let surface = RasterSurface::new(400, 300).unwrap();
//! let config = Config { width: 400, height: 300, cuddle: true, ..Config::default() };
//! let mut cloud = CloudLayout::new(config, surface, SmallRng::seed_from_u64(1));
//! cloud.start(vec![Word::new("alpha", 3), Word::new("beta", 2), Word::new("gamma", 1)]);
//! cloud.run_to_completion();
//! assert_eq!(cloud.layout().len(), 3);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

use kurbo::Size;
use troposphere::{Glyph, GlyphId, PixelBuffer, PixelRegion, RenderingSurface};

pub mod metrics;
mod raster;

use raster::{draw_glyph, read_region};

/// Largest supported canvas side, in pixels.
pub const MAX_DIMENSION: u32 = 16_384;

/// Canvas background, opaque white.
const BACKGROUND: [u8; 4] = [255, 255, 255, 255];

/// Errors from creating a [`RasterSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RasterError {
    /// One of the canvas sides is zero.
    #[error("canvas must be at least 1x1 pixels, got {width}x{height}")]
    EmptyCanvas {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// One of the canvas sides exceeds [`MAX_DIMENSION`].
    #[error("canvas {width}x{height} exceeds the {max} pixel limit", max = MAX_DIMENSION)]
    TooLarge {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
}

/// A software rendering surface backed by RGBA8 buffers.
///
/// Glyph objects are kept in creation order and composited in that order.
/// Creating a glyph draws it onto the canvas right away; updating or removing
/// one marks the canvas stale, and it is recomposited on the next read-back or
/// [`flush`](RenderingSurface::flush).
///
/// Isolated renders draw straight into a scratch buffer the size of the
/// requested region, which is kept for reuse until
/// [`dispose_scratch`](RenderingSurface::dispose_scratch).
#[derive(Clone, Debug)]
pub struct RasterSurface {
    glyphs: Vec<Option<Glyph>>,
    canvas: PixelBuffer,
    scratch: Option<PixelBuffer>,
    stale: bool,
}

impl RasterSurface {
    /// Create a surface with a white `width` x `height` canvas.
    pub fn new(width: u32, height: u32) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::EmptyCanvas { width, height });
        }
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(RasterError::TooLarge { width, height });
        }
        let mut surface = Self {
            glyphs: Vec::new(),
            canvas: PixelBuffer::transparent(width, height),
            scratch: None,
            stale: false,
        };
        surface.clear();
        Ok(surface)
    }

    /// The composed canvas, recomposited first if needed.
    pub fn canvas(&mut self) -> &PixelBuffer {
        self.recomposite();
        &self.canvas
    }

    /// The glyph object behind `id`, if it still exists.
    pub fn glyph(&self, id: GlyphId) -> Option<&Glyph> {
        self.glyphs.get(id.0 as usize).and_then(Option::as_ref)
    }

    /// Number of live glyph objects.
    pub fn glyph_count(&self) -> usize {
        self.glyphs.iter().flatten().count()
    }

    /// Whether a scratch buffer is currently allocated.
    pub fn has_scratch(&self) -> bool {
        self.scratch.is_some()
    }

    fn fill_background(&mut self) {
        for px in self.canvas.data_mut().chunks_exact_mut(PixelBuffer::CHANNELS) {
            px.copy_from_slice(&BACKGROUND);
        }
    }

    fn recomposite(&mut self) {
        if !self.stale {
            return;
        }
        self.fill_background();
        for glyph in self.glyphs.iter().flatten() {
            draw_glyph(&mut self.canvas, (0, 0), glyph);
        }
        self.stale = false;
    }
}

impl RenderingSurface for RasterSurface {
    fn canvas_size(&self) -> Size {
        Size::new(
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        )
    }

    fn measure_text(&mut self, text: &str, _font: &str, font_size: f64) -> Size {
        metrics::measure(text, font_size)
    }

    fn clear(&mut self) {
        self.glyphs.clear();
        self.fill_background();
        self.stale = false;
    }

    fn create_glyph(&mut self, glyph: &Glyph) -> GlyphId {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "a cloud never holds anywhere near u32::MAX glyphs"
        )]
        let id = GlyphId(self.glyphs.len() as u32);
        self.glyphs.push(Some(glyph.clone()));
        if !self.stale {
            draw_glyph(&mut self.canvas, (0, 0), glyph);
        }
        id
    }

    fn update_glyph(&mut self, id: GlyphId, glyph: &Glyph) {
        if let Some(slot) = self.glyphs.get_mut(id.0 as usize).filter(|s| s.is_some()) {
            *slot = Some(glyph.clone());
            self.stale = true;
        }
    }

    fn remove_glyph(&mut self, id: GlyphId) {
        if let Some(slot) = self.glyphs.get_mut(id.0 as usize) {
            self.stale |= slot.take().is_some();
        }
    }

    fn read_pixels(&mut self, region: PixelRegion) -> PixelBuffer {
        self.recomposite();
        read_region(&self.canvas, region)
    }

    fn render_isolated(&mut self, glyph: &Glyph, region: PixelRegion) -> PixelBuffer {
        let fits = self
            .scratch
            .as_ref()
            .is_some_and(|s| s.width() == region.width && s.height() == region.height);
        if !fits {
            self.scratch = Some(PixelBuffer::transparent(region.width, region.height));
        }
        let scratch = self
            .scratch
            .get_or_insert_with(|| PixelBuffer::transparent(region.width, region.height));
        scratch.data_mut().fill(0);
        draw_glyph(scratch, (region.x, region.y), glyph);
        scratch.clone()
    }

    fn flush(&mut self) {
        self.recomposite();
    }

    fn dispose_scratch(&mut self) {
        self.scratch = None;
    }
}
