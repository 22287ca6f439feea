// Copyright 2025 the Troposphere Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Troposphere: incremental word cloud placement.
//!
//! Given weighted words, Troposphere sizes each one by weight, drops it near the
//! canvas centre and walks it outwards along an Archimedean spiral until it no
//! longer collides with anything placed before it. The result is a layout of
//! [`Glyph`]s: centre positions, rotations, sizes and colours.
//!
//! The pieces:
//!
//! - **Filtering** ([`filter_words`]): keep the heaviest words, heaviest first.
//! - **Spiral search** ([`spiral_point`], [`SpiralCursor`]): candidate offsets
//!   that grow linearly with the spiral position.
//! - **Collision** ([`collision`]): bounding box overlap, or opaque pixel
//!   overlap read back from a [`RenderingSurface`].
//! - **Placement** ([`Placer`]): the spiral loop with its safety guards.
//! - **Scheduling** ([`CloudLayout`]): a stage machine that does one bounded
//!   unit of work per [`step`](CloudLayout::step), reports weighted progress,
//!   and can be cancelled between steps.
//!
//! Rendering is delegated. The engine talks to a [`RenderingSurface`] for text
//! measurement, glyph objects and pixel read-backs; `troposphere_raster` provides
//! a software implementation.
//!
//! ## Quick Start
//!
//! ```rust
//! use troposphere::{Word, filter_words, spiral_point};
//!
//! let words = [
//!     Word::new("today", 7),
//!     Word::new("tonight", 4),
//!     Word::new("did", 7),
//!     Word::new("story", 1),
//! ];
//! let kept: Vec<_> = filter_words(&words, 2).into_iter().map(|w| w.text).collect();
//! assert_eq!(kept, ["today", "did"]);
//!
//! // A full turn out from the origin is `radius` away.
//! let p = spiral_point(core::f64::consts::TAU, 3.0);
//! assert!((p.hypot() - 3.0).abs() < 1e-9);
//! ```
//!
//! ## Features
//!
//! - `std` (default): use the standard library.
//! - `libm`: float maths for `no_std` targets.
//! - `serde`: `Serialize`/`Deserialize` for [`Word`], [`Config`] and [`TextAngle`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod collision;
mod color;
mod config;
mod glyph;
mod jitter;
mod layout;
mod placer;
mod progress;
mod spiral;
mod surface;
mod word;

pub use color::ColorBias;
pub use config::{Config, TextAngle};
pub use glyph::{BLOCK_OPACITY, Glyph, GlyphShape, PLACEMENT_OPACITY, font_size, initial_angle};
pub use jitter::{jitter, jitter_point, standard_normal};
pub use layout::{
    CancelToken, CloudEvent, CloudLayout, CloudState, PlacementWarning, Stage, Step,
};
pub use placer::{ATTEMPT_GUARD, Guard, MAX_TOTAL_ADVANCES, Placement, Placer};
pub use progress::{Progress, STAGE_WEIGHTS};
pub use spiral::{SpiralCursor, SpiralDirection, spiral_point};
pub use surface::{GlyphId, PixelBuffer, PixelRegion, RenderingSurface};
pub use word::{Word, filter_words, highest_weight};
