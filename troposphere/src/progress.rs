// Copyright 2025 the Troposphere Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Weighted, monotonic progress across the layout stages.

use crate::layout::Stage;

/// Relative cost of each weighted stage, in [`Stage`] order. Sums to 100.
pub const STAGE_WEIGHTS: [f64; 6] = [1.0, 1.0, 1.0, 95.0, 1.0, 1.0];

/// Tracks per-stage completion and reports overall progress in `[0, 100]`.
///
/// Reported values only ever increase: [`Progress::set`] returns a value only
/// when the weighted total exceeds the last one it returned.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Progress {
    sections: [f64; 6],
    reported: f64,
}

impl Progress {
    /// Record that `stage` is `percent` complete.
    ///
    /// Returns the new overall progress if it increased.
    pub fn set(&mut self, stage: Stage, percent: f64) -> Option<f64> {
        let index = stage.weight_index()?;
        self.sections[index] = percent.clamp(0.0, 100.0);
        let total: f64 = self
            .sections
            .iter()
            .zip(STAGE_WEIGHTS)
            .map(|(done, weight)| done * weight / 100.0)
            .sum();
        (total > self.reported).then(|| {
            self.reported = total;
            total
        })
    }

    /// The last reported overall progress.
    pub fn reported(&self) -> f64 {
        self.reported
    }
}
