// Copyright 2025 the Troposphere Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collision predicates for the two placement strategies.
//!
//! - [`boxes`]: axis-aligned bounding box overlap between glyphs.
//! - [`pixels`]: opaque pixel overlap between a candidate's mask and the
//!   composed canvas.
//!
//! The two guarantee different things. Box placement keeps bounding boxes apart,
//! pixel placement only keeps inked pixels apart, so pixel layouts may have
//! overlapping boxes.

pub mod boxes;
pub mod pixels;

/// Which collision strategy placement uses.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Bounding boxes must not overlap.
    #[default]
    Box,
    /// Inked pixels must not overlap.
    Pixel,
}

impl Strategy {
    /// The strategy selected by the `cuddle` option.
    pub const fn from_cuddle(cuddle: bool) -> Self {
        if cuddle { Self::Pixel } else { Self::Box }
    }
}
