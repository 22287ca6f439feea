// Copyright 2025 the Troposphere Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spiral placement: move a glyph outward from where it starts until it no
//! longer collides.
//!
//! ## Usage
//!
//! 1) Create a [`Placer`] from the run's [`Config`].
//! 2) For each glyph, in order, call [`Placer::place_among`] (box strategy) with
//!    the glyphs placed so far, or [`Placer::place_on_surface`] (pixel strategy)
//!    with the surface they have been drawn onto.
//! 3) Inspect the returned [`Placement`] for guard trips.
//!
//! Glyphs placed earlier never move, so later glyphs work around them.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Point;
use tracing::{trace, warn};

use crate::collision::boxes::glyphs_intersect;
use crate::collision::pixels::pixels_collide;
use crate::config::Config;
use crate::glyph::Glyph;
use crate::spiral::{SpiralCursor, SpiralDirection};
use crate::surface::{PixelRegion, RenderingSurface};

/// Spiral advances allowed while resolving a single collision before moving on.
pub const ATTEMPT_GUARD: u32 = 1000;

/// Spiral advances after which box placement gives up on a glyph entirely.
pub const MAX_TOTAL_ADVANCES: u32 = 100_000;

/// Which safety limit stopped a placement early.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Guard {
    /// A single collision needed more than [`ATTEMPT_GUARD`] advances. Box
    /// placement keeps searching from where it stopped; pixel placement accepts
    /// the current position.
    Attempts,
    /// Box placement hit [`MAX_TOTAL_ADVANCES`] and kept the current position.
    Exhausted,
}

/// Outcome of placing one glyph.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Placement {
    /// Final centre of the glyph.
    pub position: Point,
    /// Total spiral advances taken.
    pub advances: u32,
    /// The most severe guard that tripped, if any.
    pub guard: Option<Guard>,
    /// Whether the final position satisfies the collision predicate.
    ///
    /// Box placement keeps searching after an attempt guard, so only
    /// [`Guard::Exhausted`] leaves it overlapping. Pixel placement stops at its
    /// attempt guard.
    pub collision_free: bool,
}

/// Moves glyphs along a spiral until they fit.
///
/// The spiral direction flips once per glyph, which breaks up the visible
/// banding a single rotation sense leaves across a whole cloud.
#[derive(Clone, Debug)]
pub struct Placer {
    radius: f64,
    increment: f64,
    direction: SpiralDirection,
    trace_steps: bool,
}

impl Placer {
    /// A placer with an explicit spiral radius and increment.
    pub fn new(radius: f64, increment: f64) -> Self {
        Self {
            radius,
            increment,
            direction: SpiralDirection::Forward,
            trace_steps: false,
        }
    }

    /// A placer tuned from the run's configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            trace_steps: config.traces_steps(),
            ..Self::new(config.spiral_radius(), config.position_increment())
        }
    }

    /// Direction the most recently started glyph searched in.
    pub fn direction(&self) -> SpiralDirection {
        self.direction
    }

    fn begin_glyph(&mut self) -> SpiralCursor {
        self.direction = self.direction.flipped();
        SpiralCursor::new(self.direction, self.radius, self.increment)
    }

    fn trace_step(&self, glyph: &Glyph, cursor: &SpiralCursor) {
        if self.trace_steps {
            trace!(
                word = %glyph.word.text,
                position = cursor.position(),
                x = glyph.position.x,
                y = glyph.position.y,
                "spiral step"
            );
        }
    }

    /// Box strategy: move `glyph` until its bounding box clears every glyph in
    /// `others`.
    ///
    /// Whenever the glyph moves, the scan over `others` restarts from the
    /// beginning, since the new position may collide with glyphs that already
    /// tested clean.
    pub fn place_among(&mut self, glyph: &mut Glyph, others: &[Glyph]) -> Placement {
        let origin = glyph.position;
        let mut cursor = self.begin_glyph();
        let mut advances = 0_u32;
        let mut guard = None;

        let mut rescan = true;
        'search: while rescan {
            rescan = false;
            for other in others {
                let mut attempts = 0_u32;
                while glyphs_intersect(glyph, other) {
                    if advances >= MAX_TOTAL_ADVANCES {
                        warn!(
                            word = %glyph.word.text,
                            advances,
                            radius = self.radius,
                            increment = self.increment,
                            "placement exhausted, glyph may overlap"
                        );
                        guard = Some(Guard::Exhausted);
                        break 'search;
                    }
                    glyph.position = origin + cursor.advance();
                    advances += 1;
                    rescan = true;
                    self.trace_step(glyph, &cursor);

                    attempts += 1;
                    if attempts >= ATTEMPT_GUARD {
                        warn!(
                            word = %glyph.word.text,
                            blocker = %other.word.text,
                            attempts,
                            radius = self.radius,
                            increment = self.increment,
                            "sanity break while resolving collision"
                        );
                        guard.get_or_insert(Guard::Attempts);
                        break;
                    }
                }
            }
        }

        Placement {
            position: glyph.position,
            advances,
            guard,
            collision_free: guard != Some(Guard::Exhausted),
        }
    }

    /// Pixel strategy: move `glyph` until its padded mask no longer overlaps ink
    /// already composed on `surface`.
    ///
    /// The mask is rendered once; each candidate position reads back the
    /// matching canvas region. Positions are kept on whole pixels so the two
    /// buffers stay aligned. The mask is cropped to three canvas sizes around
    /// the glyph, which still spans the whole canvas while the glyph's centre is
    /// on it.
    pub fn place_on_surface<S>(
        &mut self,
        glyph: &mut Glyph,
        surface: &mut S,
        padding: f64,
    ) -> Placement
    where
        S: RenderingSurface + ?Sized,
    {
        glyph.position = Point::new(glyph.position.x.floor(), glyph.position.y.floor());
        let origin = glyph.position;
        let mut cursor = self.begin_glyph();
        let mut advances = 0_u32;
        let mut guard = None;

        let padded = glyph.padded(padding, surface);
        let canvas = surface.canvas_size();
        let mut region = PixelRegion::centered_on(glyph.position, padded.extent())
            .cropped(mask_limit(canvas.width), mask_limit(canvas.height));
        if region.is_empty() {
            return Placement {
                position: glyph.position,
                advances,
                guard,
                collision_free: true,
            };
        }
        let mask = surface.render_isolated(&padded, region);
        let (left, top) = (
            f64::from(region.x) - glyph.position.x,
            f64::from(region.y) - glyph.position.y,
        );

        loop {
            let canvas = surface.read_pixels(region);
            if !pixels_collide(&canvas, &mask) {
                break;
            }
            if advances >= ATTEMPT_GUARD {
                warn!(
                    word = %glyph.word.text,
                    advances,
                    radius = self.radius,
                    increment = self.increment,
                    "sanity break, keeping an overlapping position"
                );
                guard = Some(Guard::Attempts);
                break;
            }
            let p = origin + cursor.advance();
            glyph.position = Point::new(p.x.floor(), p.y.floor());
            region = region.with_origin(
                pixel_coord(glyph.position.x + left),
                pixel_coord(glyph.position.y + top),
            );
            advances += 1;
            self.trace_step(glyph, &cursor);
        }

        Placement {
            position: glyph.position,
            advances,
            guard,
            collision_free: guard.is_none(),
        }
    }
}

/// Largest mask side for a canvas side of `side` pixels.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is clamped to the u32 range first"
)]
fn mask_limit(side: f64) -> u32 {
    let limit = (3.0 * side).ceil();
    if limit.is_nan() {
        0
    } else {
        limit.clamp(0.0, f64::from(u32::MAX)) as u32
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "value is already integral and saturates far outside any canvas"
)]
fn pixel_coord(v: f64) -> i32 {
    v as i32
}
