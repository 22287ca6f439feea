// Copyright 2025 the Troposphere Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Approximately normal jitter for starting positions and angles.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Vec2};
use rand::Rng;

/// Sum of three uniform samples from `[-1, 1)`.
///
/// This is the Irwin–Hall approximation of a standard normal variable: it is
/// bell shaped around zero and can never leave `[-3, 3]`.
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    (0..3).map(|_| rng.r#gen::<f64>() * 2.0 - 1.0).sum()
}

/// A jittered value around `mean`, rounded to the nearest integer.
///
/// Results stay within `mean ± 3 * std_dev` (before rounding).
pub fn jitter<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    (standard_normal(rng) * std_dev + mean).round()
}

/// A jittered point around `center`, using independent per-axis deviations.
pub fn jitter_point<R: Rng + ?Sized>(rng: &mut R, center: Point, std_dev: Vec2) -> Point {
    let x = jitter(rng, center.x, std_dev.x);
    let y = jitter(rng, center.y, std_dev.y);
    Point::new(x, y)
}
