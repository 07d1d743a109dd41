// ABOUTME: Summary statistics over a window of recovery scores
// ABOUTME: Average (one decimal), highest, lowest and count
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::round_one_decimal;

/// Aggregate of a non-empty set of scores
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreSummary {
    /// Mean, rounded to one decimal
    pub average: f64,
    /// Maximum
    pub highest: f64,
    /// Minimum
    pub lowest: f64,
    /// Number of scores
    pub count: usize,
}

/// Summarize scores, or `None` when there are none
#[must_use]
pub fn summarize_scores(scores: &[f64]) -> Option<ScoreSummary> {
    let finite: Vec<f64> = scores.iter().copied().filter(|s| s.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }

    let sum: f64 = finite.iter().sum();
    let highest = finite.iter().copied().fold(f64::MIN, f64::max);
    let lowest = finite.iter().copied().fold(f64::MAX, f64::min);

    Some(ScoreSummary {
        average: round_one_decimal(sum / finite.len() as f64),
        highest,
        lowest,
        count: finite.len(),
    })
}
