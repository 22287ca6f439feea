// Copyright 2025 the Troposphere Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spiral search: a single advancing scalar mapped to a growing, rotating offset.

use core::f64::consts::TAU;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Vec2;

/// Offset of the spiral at `position` for the given `radius` growth factor.
///
/// The distance from the origin is `position / 2π * radius` and the angle is
/// `position mod 2π`, so each step both rotates and moves outward. The angle is
/// measured from the positive y axis, turning towards positive x.
///
/// ```
/// use kurbo::Vec2;
/// use troposphere::spiral_point;
///
/// assert_eq!(spiral_point(0.0, 3.0), Vec2::ZERO);
/// let p = spiral_point(core::f64::consts::TAU, 1.0);
/// assert!((p.y - 1.0).abs() < 1e-9);
/// ```
pub fn spiral_point(position: f64, radius: f64) -> Vec2 {
    let mult = position / TAU * radius;
    let angle = position % TAU;
    let (sin, cos) = angle.sin_cos();
    Vec2::new(mult * sin, mult * cos)
}

/// Rotation sense of a spiral search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SpiralDirection {
    /// Positions advance by `+increment`.
    #[default]
    Forward,
    /// Positions advance by `-increment`.
    Reverse,
}

impl SpiralDirection {
    /// The opposite direction.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }

    /// `1.0` for [`Forward`](Self::Forward), `-1.0` for [`Reverse`](Self::Reverse).
    pub const fn sign(self) -> f64 {
        match self {
            Self::Forward => 1.0,
            Self::Reverse => -1.0,
        }
    }
}

/// Search state for placing one glyph.
///
/// The cursor's position only ever grows in magnitude; a fresh cursor is created
/// for each glyph and never rewound while that glyph is being placed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpiralCursor {
    position: f64,
    direction: SpiralDirection,
    radius: f64,
    increment: f64,
}

impl SpiralCursor {
    /// A cursor at the spiral origin.
    pub const fn new(direction: SpiralDirection, radius: f64, increment: f64) -> Self {
        Self {
            position: 0.0,
            direction,
            radius,
            increment,
        }
    }

    /// Current scalar position along the spiral.
    pub const fn position(&self) -> f64 {
        self.position
    }

    /// Direction this cursor advances in.
    pub const fn direction(&self) -> SpiralDirection {
        self.direction
    }

    /// Offset from the search origin at the current position.
    pub fn offset(&self) -> Vec2 {
        spiral_point(self.position, self.radius)
    }

    /// Step one increment along the spiral and return the new offset.
    pub fn advance(&mut self) -> Vec2 {
        self.position += self.direction.sign() * self.increment;
        self.offset()
    }
}
