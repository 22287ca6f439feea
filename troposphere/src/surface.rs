// Copyright 2025 the Troposphere Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The rendering surface collaborator and the pixel buffers it hands back.

use alloc::vec;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Size};

use crate::glyph::Glyph;

/// Identifier for a glyph object living on a [`RenderingSurface`].
///
/// This is a small, opaque handle that is stable for the lifetime of the glyph
/// object, from [`RenderingSurface::create_glyph`] until
/// [`RenderingSurface::remove_glyph`] or [`RenderingSurface::clear`].
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GlyphId(pub u32);

/// An integer pixel rectangle, which may extend past the canvas.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PixelRegion {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelRegion {
    /// Create a region from its top-left corner and size.
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The whole-pixel region covering `size` centred on `center`.
    ///
    /// The extents are rounded up and the corner rounded down, matching how a
    /// centre-anchored glyph is cut out of a canvas.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "canvas coordinates are far inside the i32/u32 ranges; casts saturate otherwise"
    )]
    pub fn centered_on(center: Point, size: Size) -> Self {
        let width = size.width.max(0.0).ceil();
        let height = size.height.max(0.0).ceil();
        Self {
            x: (center.x - width / 2.0).floor() as i32,
            y: (center.y - height / 2.0).floor() as i32,
            width: width as u32,
            height: height as u32,
        }
    }

    /// The same-sized region with its top-left corner moved to `(x, y)`.
    #[must_use]
    pub const fn with_origin(self, x: i32, y: i32) -> Self {
        Self { x, y, ..self }
    }

    /// The region shrunk to at most `max_width` x `max_height`, keeping its
    /// centre.
    #[must_use]
    #[allow(
        clippy::cast_possible_wrap,
        reason = "the trimmed amount is at most half of a u32"
    )]
    pub const fn cropped(self, max_width: u32, max_height: u32) -> Self {
        let width = if self.width < max_width { self.width } else { max_width };
        let height = if self.height < max_height { self.height } else { max_height };
        Self {
            x: self.x.saturating_add(((self.width - width) / 2) as i32),
            y: self.y.saturating_add(((self.height - height) / 2) as i32),
            width,
            height,
        }
    }

    /// Whether the region contains no pixels.
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A straight-alpha RGBA8 pixel buffer, row major, no padding between rows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Bytes per pixel.
    pub const CHANNELS: usize = 4;

    /// A fully transparent buffer.
    ///
    /// # Panics
    ///
    /// Panics if the buffer cannot be allocated.
    pub fn transparent(width: u32, height: u32) -> Self {
        let len = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(Self::CHANNELS);
        Self {
            width,
            height,
            data: vec![0; len],
        }
    }

    /// Width in pixels.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw RGBA8 bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// The RGBA bytes of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y` is out of bounds.
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.width as usize * Self::CHANNELS;
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    /// The pixel at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * Self::CHANNELS;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Overwrite the pixel at `(x, y)`. Out of bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * Self::CHANNELS;
        self.data[i..i + Self::CHANNELS].copy_from_slice(&rgba);
    }
}

/// Everything the layout engine needs from a renderer.
///
/// Implementations own the glyph objects, the composed canvas and any scratch
/// buffers. The engine never touches pixels directly; it only asks for
/// measurements and read-backs.
///
/// Read-backs use the straight-alpha conventions of a 2D canvas: the composed
/// canvas is opaque with a white background, pixels outside the canvas read as
/// transparent black, and the scratch buffer starts out transparent.
pub trait RenderingSurface {
    /// Size of the canvas in pixels.
    fn canvas_size(&self) -> Size;

    /// Unrotated extents of `text` set in `font` at `font_size`.
    fn measure_text(&mut self, text: &str, font: &str, font_size: f64) -> Size;

    /// Remove all glyphs and reset the canvas to its background.
    fn clear(&mut self);

    /// Add a glyph object to the composition.
    fn create_glyph(&mut self, glyph: &Glyph) -> GlyphId;

    /// Replace an existing glyph object's position, colour, opacity, etc.
    fn update_glyph(&mut self, id: GlyphId, glyph: &Glyph);

    /// Remove a glyph object from the composition.
    fn remove_glyph(&mut self, id: GlyphId);

    /// Read back `region` of the composed canvas.
    fn read_pixels(&mut self, region: PixelRegion) -> PixelBuffer;

    /// Render `glyph` alone into the scratch buffer and read back `region` of it.
    fn render_isolated(&mut self, glyph: &Glyph, region: PixelRegion) -> PixelBuffer;

    /// Bring the composed canvas up to date with every glyph object.
    fn flush(&mut self);

    /// Release scratch buffers used for pixel testing.
    fn dispose_scratch(&mut self);
}

impl<S: RenderingSurface + ?Sized> RenderingSurface for &mut S {
    fn canvas_size(&self) -> Size {
        (**self).canvas_size()
    }

    fn measure_text(&mut self, text: &str, font: &str, font_size: f64) -> Size {
        (**self).measure_text(text, font, font_size)
    }

    fn clear(&mut self) {
        (**self).clear();
    }

    fn create_glyph(&mut self, glyph: &Glyph) -> GlyphId {
        (**self).create_glyph(glyph)
    }

    fn update_glyph(&mut self, id: GlyphId, glyph: &Glyph) {
        (**self).update_glyph(id, glyph);
    }

    fn remove_glyph(&mut self, id: GlyphId) {
        (**self).remove_glyph(id);
    }

    fn read_pixels(&mut self, region: PixelRegion) -> PixelBuffer {
        (**self).read_pixels(region)
    }

    fn render_isolated(&mut self, glyph: &Glyph, region: PixelRegion) -> PixelBuffer {
        (**self).render_isolated(glyph, region)
    }

    fn flush(&mut self) {
        (**self).flush();
    }

    fn dispose_scratch(&mut self) {
        (**self).dispose_scratch();
    }
}
