// ABOUTME: Daily recovery check-in models and the training intensity label
// ABOUTME: RecoveryLog row, RecoveryLogRequest payload with validation, and RecoveryStats summary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::limits::{MAX_SLEEP_HOURS, SUBJECTIVE_SCALE_MAX, SUBJECTIVE_SCALE_MIN};
use crate::errors::{AppError, AppResult};

/// Training intensity recommended for the day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrainingIntensity {
    /// Fully recovered
    #[serde(rename = "Heavy")]
    Heavy,
    /// Partially recovered
    #[serde(rename = "Moderate")]
    Moderate,
    /// Under-recovered
    #[serde(rename = "Light/Rest")]
    LightRest,
}

impl TrainingIntensity {
    /// Stored and serialized label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Heavy => "Heavy",
            Self::Moderate => "Moderate",
            Self::LightRest => "Light/Rest",
        }
    }
}

impl Display for TrainingIntensity {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrainingIntensity {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Heavy" => Ok(Self::Heavy),
            "Moderate" => Ok(Self::Moderate),
            "Light/Rest" => Ok(Self::LightRest),
            other => Err(AppError::invalid_input(format!(
                "Unknown training intensity: {other}"
            ))),
        }
    }
}

/// One daily check-in with its computed score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecoveryLog {
    /// Unique identifier
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    /// When the check-in was logged
    pub date: DateTime<Utc>,
    /// Manually reported sleep
    pub sleep_hours: Option<f64>,
    /// 1-10, higher is better
    pub sleep_quality: Option<i64>,
    /// 1-10, higher is worse
    pub soreness_level: Option<i64>,
    /// 1-10, higher is better
    pub energy_level: Option<i64>,
    /// 1-10, higher is worse
    pub stress_level: Option<i64>,
    /// Computed 1.0-10.0 score
    pub recovery_score: Option<f64>,
    /// Label derived from the score
    pub recommended_intensity: Option<TrainingIntensity>,
    /// Row creation time
    pub created_at: DateTime<Utc>,
}

/// Check-in payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecoveryLogRequest {
    /// Hours slept
    #[serde(default)]
    pub sleep_hours: Option<f64>,
    /// 1-10
    #[serde(default)]
    pub sleep_quality: Option<i64>,
    /// 1-10
    #[serde(default)]
    pub soreness_level: Option<i64>,
    /// 1-10
    #[serde(default)]
    pub energy_level: Option<i64>,
    /// 1-10
    #[serde(default)]
    pub stress_level: Option<i64>,
    /// HRV measured by the client when no wearable sync covers it
    #[serde(default)]
    pub hrv_rmssd: Option<f64>,
    /// Resting heart rate measured by the client
    #[serde(default)]
    pub resting_heart_rate: Option<f64>,
}

impl RecoveryLogRequest {
    /// Reject out-of-range subjective scores and impossible sleep durations
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` naming the first offending field
    pub fn validate(&self) -> AppResult<()> {
        let scales = [
            ("sleep_quality", self.sleep_quality),
            ("soreness_level", self.soreness_level),
            ("energy_level", self.energy_level),
            ("stress_level", self.stress_level),
        ];
        for (field, value) in scales {
            if let Some(value) = value {
                if !(SUBJECTIVE_SCALE_MIN..=SUBJECTIVE_SCALE_MAX).contains(&value) {
                    return Err(AppError::out_of_range(
                        field,
                        SUBJECTIVE_SCALE_MIN,
                        SUBJECTIVE_SCALE_MAX,
                    ));
                }
            }
        }

        if let Some(hours) = self.sleep_hours {
            if !hours.is_finite() || !(0.0..=MAX_SLEEP_HOURS).contains(&hours) {
                return Err(AppError::out_of_range("sleep_hours", 0, MAX_SLEEP_HOURS));
            }
        }

        Ok(())
    }
}

/// Summary over a look-back window
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecoveryStats {
    /// Mean score, one decimal; null without data
    pub average_score: Option<f64>,
    /// Best score in the window
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub highest_score: Option<f64>,
    /// Worst score in the window
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub lowest_score: Option<f64>,
    /// Number of scored logs
    pub total_logs: usize,
    /// Echo of the requested window
    pub days_requested: i64,
}
