// ABOUTME: Maps a recovery score to a recommended training intensity
// ABOUTME: Heavy at 8.0 and above, Moderate from 5.0, otherwise Light/Rest
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use equilibria_core::constants::recovery::{HEAVY_THRESHOLD, MODERATE_THRESHOLD};
use equilibria_core::models::TrainingIntensity;

/// Training intensity for a recovery score
#[must_use]
pub fn recommend_intensity(recovery_score: f64) -> TrainingIntensity {
    if recovery_score >= HEAVY_THRESHOLD {
        TrainingIntensity::Heavy
    } else if recovery_score >= MODERATE_THRESHOLD {
        TrainingIntensity::Moderate
    } else {
        TrainingIntensity::LightRest
    }
}
