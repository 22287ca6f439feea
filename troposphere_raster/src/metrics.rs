// Copyright 2025 the Troposphere Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A deterministic monospaced "block glyph" text model.
//!
//! Every character occupies one cell [`ADVANCE`] em wide and one em tall. Inside
//! its cell a character is inked as a single rectangle whose vertical span
//! depends on its [`InkClass`], which is enough to give words a recognizable
//! silhouette (ascenders, descenders, punctuation) without any font data.

use kurbo::{Rect, Size};

/// Horizontal advance of every character, in em.
pub const ADVANCE: f64 = 0.6;

/// Blank margin left and right of the ink inside each cell, in em.
pub const SIDE_BEARING: f64 = 0.08;

/// Vertical ink shape of a character.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InkClass {
    /// Whitespace and control characters: no ink.
    Blank,
    /// Capitals, digits and lowercase letters with ascenders.
    Tall,
    /// Lowercase letters that sit on the x-height.
    Short,
    /// Lowercase letters with descenders.
    Descending,
    /// Marks that sit on the baseline, such as `.` and `,`.
    Low,
    /// Any other mark.
    Mark,
}

impl InkClass {
    /// Classify `c`.
    pub fn of(c: char) -> Self {
        match c {
            c if c.is_whitespace() || c.is_control() => Self::Blank,
            'g' | 'j' | 'p' | 'q' | 'y' => Self::Descending,
            'b' | 'd' | 'f' | 'h' | 'i' | 'k' | 'l' | 't' => Self::Tall,
            c if c.is_lowercase() => Self::Short,
            c if c.is_alphanumeric() => Self::Tall,
            '.' | ',' | '_' => Self::Low,
            _ => Self::Mark,
        }
    }

    /// Top and bottom of the ink, in em from the top of the line.
    pub const fn span(self) -> Option<(f64, f64)> {
        match self {
            Self::Blank => None,
            Self::Tall => Some((0.15, 0.75)),
            Self::Short => Some((0.35, 0.75)),
            Self::Descending => Some((0.35, 0.95)),
            Self::Low => Some((0.6, 0.75)),
            Self::Mark => Some((0.15, 0.5)),
        }
    }
}

/// Unrotated extents of `text` at `font_size`.
pub fn measure(text: &str, font_size: f64) -> Size {
    #[allow(
        clippy::cast_precision_loss,
        reason = "character counts of words are tiny"
    )]
    let cells = text.chars().count() as f64;
    Size::new(ADVANCE * font_size * cells, font_size)
}

/// Ink rectangle of the character in cell `index`, relative to the top-left of
/// the text box.
pub fn ink_rect(c: char, index: usize, font_size: f64) -> Option<Rect> {
    let (top, bottom) = InkClass::of(c).span()?;
    #[allow(
        clippy::cast_precision_loss,
        reason = "character counts of words are tiny"
    )]
    let left = index as f64 * ADVANCE;
    Some(
        Rect::new(left + SIDE_BEARING, top, left + ADVANCE - SIDE_BEARING, bottom)
            .scale_from_origin(font_size),
    )
}
