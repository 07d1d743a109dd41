// ABOUTME: Recovery scoring engine and training arithmetic for the Equilibria API
// ABOUTME: Pure, synchronous functions with no storage or HTTP dependencies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Equilibria Intelligence
//!
//! - **`recovery_score`**: maps subjective check-in values and wearable
//!   signals to a 1.0-10.0 score, with selectable algorithms
//! - **recommendation**: maps a score to a training intensity
//! - **`training_volume`**: session volume, one-rep-max estimates and load progression
//! - **statistics**: summaries over a window of scores

/// Training intensity recommendation from a recovery score
pub mod recommendation;
/// Recovery score algorithms
pub mod recovery_score;
/// Score window summaries
pub mod statistics;
/// Session volume and strength progression
pub mod training_volume;

pub use recommendation::recommend_intensity;
pub use recovery_score::{RecoveryInputs, RecoveryScoringAlgorithm, WearableSignals};
pub use statistics::{summarize_scores, ScoreSummary};
pub use training_volume::{
    best_lifts, estimate_one_rep_max, extract_performances, suggest_next_weight, total_volume,
    PerformanceEntry,
};

/// Round to one decimal place, halves away from zero
///
/// A base of 7.05 becomes 7.1. Decimal-aware half-to-even rounding (as in
/// Python's `round`) would produce 7.0 for the same input.
#[must_use]
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
