// Copyright 2025 the Troposphere Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-run colour bias for final glyph colours.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use peniko::Color;
use rand::Rng;

/// Per-channel lower bounds drawn once per layout run.
///
/// Every glyph colour channel is drawn from `[bias, brightness]`, so a run
/// drifts towards one hue while individual words still vary.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ColorBias {
    red: f64,
    green: f64,
    blue: f64,
    brightness: u8,
}

impl ColorBias {
    /// Draw a fresh bias for a run with the given brightness ceiling.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, brightness: u8) -> Self {
        let scale = f64::from(brightness);
        Self {
            red: rng.r#gen::<f64>() * scale,
            green: rng.r#gen::<f64>() * scale,
            blue: rng.r#gen::<f64>() * scale,
            brightness,
        }
    }

    /// Draw one opaque glyph colour.
    pub fn color<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
        let r = self.channel(rng, self.red);
        let g = self.channel(rng, self.green);
        let b = self.channel(rng, self.blue);
        Color::from_rgb8(r, g, b)
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "bias is drawn from [0, brightness) so it always fits in u8"
    )]
    fn channel<R: Rng + ?Sized>(&self, rng: &mut R, bias: f64) -> u8 {
        let max = self.brightness;
        let low = (bias.floor().max(0.0) as u8).min(max);
        rng.gen_range(low..=max)
    }
}
