// ABOUTME: Wearable biometric reading model and its sync payload
// ABOUTME: Rows are keyed by (user, source, measurement_date) and merged on re-sync
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::serde_helpers::deserialize_flexible_datetime;
use crate::errors::{AppError, AppResult};

/// One biometric reading from a device or health platform
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WearableData {
    /// Unique identifier
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    /// Origin tag, e.g. `apple_health`, `google_fit`, `polar_h10`
    pub source: String,
    /// Last time this row was written by a sync
    pub sync_timestamp: DateTime<Utc>,
    /// HRV root mean square of successive differences (ms)
    pub hrv_rmssd: Option<f64>,
    /// HRV standard deviation of NN intervals (ms)
    pub hrv_sdnn: Option<f64>,
    /// Resting heart rate (bpm)
    pub resting_heart_rate: Option<i64>,
    /// Average heart rate (bpm)
    pub avg_heart_rate: Option<i64>,
    /// Total sleep
    pub sleep_duration_minutes: Option<i64>,
    /// Deep sleep
    pub deep_sleep_minutes: Option<i64>,
    /// REM sleep
    pub rem_sleep_minutes: Option<i64>,
    /// Step count
    pub steps: Option<i64>,
    /// Active energy (kcal)
    pub active_calories: Option<i64>,
    /// Unprocessed payload as received
    pub raw_data: Option<serde_json::Value>,
    /// When the reading was taken
    pub measurement_date: DateTime<Utc>,
    /// Row creation time
    pub created_at: DateTime<Utc>,
}

impl WearableData {
    /// Sleep duration in hours, if any sleep was recorded
    #[must_use]
    pub fn sleep_hours(&self) -> Option<f64> {
        self.sleep_duration_minutes
            .filter(|minutes| *minutes > 0)
            .map(|minutes| minutes as f64 / 60.0)
    }
}

/// Sync payload for one reading
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WearableDataInput {
    /// Origin tag
    pub source: String,
    /// When the reading was taken
    #[serde(deserialize_with = "deserialize_flexible_datetime")]
    pub measurement_date: DateTime<Utc>,
    /// HRV RMSSD (ms)
    #[serde(default)]
    pub hrv_rmssd: Option<f64>,
    /// HRV SDNN (ms)
    #[serde(default)]
    pub hrv_sdnn: Option<f64>,
    /// Resting heart rate (bpm)
    #[serde(default)]
    pub resting_heart_rate: Option<i64>,
    /// Average heart rate (bpm)
    #[serde(default)]
    pub avg_heart_rate: Option<i64>,
    /// Total sleep
    #[serde(default)]
    pub sleep_duration_minutes: Option<i64>,
    /// Deep sleep
    #[serde(default)]
    pub deep_sleep_minutes: Option<i64>,
    /// REM sleep
    #[serde(default)]
    pub rem_sleep_minutes: Option<i64>,
    /// Step count
    #[serde(default)]
    pub steps: Option<i64>,
    /// Active energy (kcal)
    #[serde(default)]
    pub active_calories: Option<i64>,
    /// Unprocessed payload
    #[serde(default)]
    pub raw_data: Option<serde_json::Value>,
}

impl WearableDataInput {
    /// Reject blank sources and negative counters
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput`/`ValueOutOfRange` describing the offending field
    pub fn validate(&self) -> AppResult<()> {
        if self.source.trim().is_empty() {
            return Err(AppError::missing_field("source"));
        }

        let counters = [
            ("resting_heart_rate", self.resting_heart_rate),
            ("avg_heart_rate", self.avg_heart_rate),
            ("sleep_duration_minutes", self.sleep_duration_minutes),
            ("deep_sleep_minutes", self.deep_sleep_minutes),
            ("rem_sleep_minutes", self.rem_sleep_minutes),
            ("steps", self.steps),
            ("active_calories", self.active_calories),
        ];
        for (field, value) in counters {
            if value.is_some_and(|v| v < 0) {
                return Err(AppError::out_of_range(field, 0, i64::MAX));
            }
        }

        for (field, value) in [("hrv_rmssd", self.hrv_rmssd), ("hrv_sdnn", self.hrv_sdnn)] {
            if value.is_some_and(|v| !v.is_finite() || v < 0.0) {
                return Err(AppError::invalid_input(format!(
                    "{field} must be a non-negative number"
                )));
            }
        }

        Ok(())
    }
}
