// ABOUTME: Recovery score algorithms combining subjective check-ins with wearable signals
// ABOUTME: Weighted (sleep factor, HRV and resting HR steps) and legacy placeholder formulas
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use equilibria_core::constants::recovery::{
    DEFAULT_SUBJECTIVE_VALUE, ENERGY_WEIGHT, INVERSION_BASE, LEGACY_ENERGY_WEIGHT,
    LEGACY_HRV_BONUS_CAP, LEGACY_HRV_DIVISOR, LEGACY_SLEEP_WEIGHT, LEGACY_SORENESS_WEIGHT,
    MAX_SCORE, MIN_SCORE, SLEEP_QUALITY_WEIGHT, SORENESS_WEIGHT, STRESS_WEIGHT,
};
use equilibria_core::errors::AppError;
use equilibria_core::models::RecoveryLogRequest;
use serde::{Deserialize, Serialize};

use crate::round_one_decimal;

/// Subjective check-in values on 1-10 scales
///
/// Absent values score as 5; values outside the scale are clamped.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RecoveryInputs {
    /// Higher is better
    pub sleep_quality: Option<f64>,
    /// Higher is worse
    pub soreness_level: Option<f64>,
    /// Higher is better
    pub energy_level: Option<f64>,
    /// Higher is worse
    pub stress_level: Option<f64>,
    /// Manually reported sleep, used when no wearable sleep duration exists
    pub sleep_hours: Option<f64>,
}

/// Objective signals from the most recent wearable reading
///
/// Non-finite values are treated as missing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WearableSignals {
    /// HRV RMSSD in milliseconds
    pub hrv_rmssd: Option<f64>,
    /// Resting heart rate in bpm
    pub resting_heart_rate: Option<f64>,
    /// Measured sleep in hours
    pub sleep_hours: Option<f64>,
}

impl From<&RecoveryLogRequest> for RecoveryInputs {
    fn from(request: &RecoveryLogRequest) -> Self {
        Self {
            sleep_quality: request.sleep_quality.map(|v| v as f64),
            soreness_level: request.soreness_level.map(|v| v as f64),
            energy_level: request.energy_level.map(|v| v as f64),
            stress_level: request.stress_level.map(|v| v as f64),
            sleep_hours: request.sleep_hours,
        }
    }
}

impl WearableSignals {
    fn hrv(&self) -> Option<f64> {
        self.hrv_rmssd.filter(|v| v.is_finite())
    }

    fn resting_hr(&self) -> Option<f64> {
        self.resting_heart_rate.filter(|v| v.is_finite())
    }

    fn sleep(&self) -> Option<f64> {
        self.sleep_hours.filter(|v| v.is_finite() && *v > 0.0)
    }
}

/// Recovery score algorithm selection
///
/// - `Weighted`: production formula. Weighted subjective base scaled by a
///   sleep-duration factor, then stepped HRV and resting-HR adjustments.
/// - `Legacy`: earlier placeholder. Sleep quality, soreness and energy only,
///   plus a capped linear HRV bonus.
///
/// Both clamp to `[1.0, 10.0]` and round to one decimal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryScoringAlgorithm {
    /// Weighted
    ///
    /// Formula: `base = 0.30xSQ + 0.25x(11-SOR) + 0.20xEN + 0.15x(11-ST)`,
    /// `score = base x sleep_factor + hrv_step + rhr_step`
    #[default]
    Weighted,

    /// Legacy
    ///
    /// Formula: `score = 0.4xSQ + 0.3x(11-SOR) + 0.3xEN + min(HRV/50, 2)`
    Legacy,
}

impl RecoveryScoringAlgorithm {
    /// Compute a recovery score in `[1.0, 10.0]`, rounded to one decimal
    #[must_use]
    pub fn score(&self, inputs: &RecoveryInputs, signals: &WearableSignals) -> f64 {
        let raw = match self {
            Self::Weighted => Self::calculate_weighted(inputs, signals),
            Self::Legacy => Self::calculate_legacy(inputs, signals),
        };
        round_one_decimal(raw.clamp(MIN_SCORE, MAX_SCORE))
    }

    fn calculate_weighted(inputs: &RecoveryInputs, signals: &WearableSignals) -> f64 {
        let sleep_quality = subjective(inputs.sleep_quality);
        let soreness = subjective(inputs.soreness_level);
        let energy = subjective(inputs.energy_level);
        let stress = subjective(inputs.stress_level);

        let base = SLEEP_QUALITY_WEIGHT * sleep_quality
            + SORENESS_WEIGHT * (INVERSION_BASE - soreness)
            + ENERGY_WEIGHT * energy
            + STRESS_WEIGHT * (INVERSION_BASE - stress);

        // Measured sleep wins over self-reported hours
        let sleep_hours = signals
            .sleep()
            .or_else(|| inputs.sleep_hours.filter(|v| v.is_finite()))
            .unwrap_or(0.0);

        let mut score = base * sleep_duration_factor(sleep_hours);
        if let Some(hrv) = signals.hrv() {
            score += hrv_adjustment(hrv);
        }
        if let Some(rhr) = signals.resting_hr() {
            score += resting_heart_rate_adjustment(rhr);
        }
        score
    }

    fn calculate_legacy(inputs: &RecoveryInputs, signals: &WearableSignals) -> f64 {
        let sleep_quality = subjective(inputs.sleep_quality);
        let soreness = subjective(inputs.soreness_level);
        let energy = subjective(inputs.energy_level);

        let mut score = LEGACY_SLEEP_WEIGHT * sleep_quality
            + LEGACY_SORENESS_WEIGHT * (INVERSION_BASE - soreness)
            + LEGACY_ENERGY_WEIGHT * energy;

        if let Some(hrv) = signals.hrv().filter(|v| *v > 0.0) {
            score += (hrv / LEGACY_HRV_DIVISOR).min(LEGACY_HRV_BONUS_CAP);
        }
        score
    }

    /// Configuration name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Weighted => "weighted",
            Self::Legacy => "legacy",
        }
    }

    /// Human-readable formula
    #[must_use]
    pub const fn formula(&self) -> &'static str {
        match self {
            Self::Weighted => {
                "(0.30xSQ + 0.25x(11-SOR) + 0.20xEN + 0.15x(11-ST)) x sleep_factor + hrv_step + rhr_step"
            }
            Self::Legacy => "0.4xSQ + 0.3x(11-SOR) + 0.3xEN + min(HRV/50, 2)",
        }
    }
}

impl Display for RecoveryScoringAlgorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name())
    }
}

impl FromStr for RecoveryScoringAlgorithm {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weighted" | "standard" => Ok(Self::Weighted),
            "legacy" | "placeholder" => Ok(Self::Legacy),
            other => Err(AppError::invalid_input(format!(
                "Unknown recovery scoring algorithm: '{other}'. Valid options: weighted, legacy"
            ))),
        }
    }
}

fn subjective(value: Option<f64>) -> f64 {
    value
        .filter(|v| v.is_finite())
        .unwrap_or(DEFAULT_SUBJECTIVE_VALUE)
        .clamp(MIN_SCORE, MAX_SCORE)
}

/// Multiplier applied to the subjective base for a night's sleep
///
/// Zero or unknown sleep is neutral.
#[must_use]
pub fn sleep_duration_factor(hours: f64) -> f64 {
    if hours <= 0.0 {
        1.0
    } else if hours < 5.0 {
        0.8
    } else if hours < 6.0 {
        0.9
    } else if hours <= 8.5 {
        1.0
    } else {
        1.05
    }
}

/// Additive HRV (RMSSD, ms) step
#[must_use]
pub fn hrv_adjustment(hrv_rmssd: f64) -> f64 {
    if hrv_rmssd >= 80.0 {
        0.7
    } else if hrv_rmssd >= 60.0 {
        0.4
    } else if hrv_rmssd >= 40.0 {
        0.2
    } else if hrv_rmssd >= 20.0 {
        0.0
    } else {
        -0.3
    }
}

/// Additive resting heart rate (bpm) step
#[must_use]
pub fn resting_heart_rate_adjustment(bpm: f64) -> f64 {
    if bpm <= 50.0 {
        0.3
    } else if bpm <= 60.0 {
        0.15
    } else if bpm <= 70.0 {
        0.0
    } else if bpm <= 80.0 {
        -0.2
    } else {
        -0.4
    }
}
