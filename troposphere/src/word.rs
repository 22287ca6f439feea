// Copyright 2025 the Troposphere Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input words and the weight-ordered pre-filter.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Reverse;

/// A weighted word to be laid out.
///
/// With the `serde` feature this uses the `{ "word": ..., "size": ... }` field
/// names that word cloud front ends conventionally emit.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Word {
    /// Text of the word.
    #[cfg_attr(feature = "serde", serde(rename = "word"))]
    pub text: String,
    /// Relative weight; larger weights produce larger glyphs.
    #[cfg_attr(feature = "serde", serde(rename = "size"))]
    pub weight: u32,
}

impl Word {
    /// Create a word from its text and weight.
    pub fn new(text: impl Into<String>, weight: u32) -> Self {
        Self {
            text: text.into(),
            weight,
        }
    }
}

/// Keep at most `max_words` words, heaviest first.
///
/// Words are bucketed by weight and the buckets are emitted in descending
/// weight order. Inside a bucket, words keep their original relative order, so
/// the result is a stable sort by descending weight truncated to `max_words`.
///
/// ```
/// use troposphere::{Word, filter_words};
///
/// let words = [Word::new("did", 9), Word::new("today", 13), Word::new("story", 3)];
/// let kept = filter_words(&words, 2);
/// assert_eq!(kept, [Word::new("today", 13), Word::new("did", 9)]);
/// ```
pub fn filter_words(words: &[Word], max_words: usize) -> Vec<Word> {
    let mut buckets: BTreeMap<Reverse<u32>, Vec<&Word>> = BTreeMap::new();
    for word in words {
        buckets.entry(Reverse(word.weight)).or_default().push(word);
    }

    buckets
        .into_values()
        .flatten()
        .take(max_words)
        .cloned()
        .collect()
}

/// Heaviest weight in `words`, or `0` for an empty slice.
pub fn highest_weight(words: &[Word]) -> u32 {
    words.iter().map(|w| w.weight).max().unwrap_or(0)
}
