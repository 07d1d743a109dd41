// ABOUTME: Workout plans, logged sessions and per-exercise performance records
// ABOUTME: Exercise lists are opaque JSON objects supplied by the client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Workout plan or reusable template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Workout {
    /// Unique identifier
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    /// Display name
    pub name: String,
    /// Free text
    pub description: Option<String>,
    /// e.g. "strength", "hypertrophy"
    pub workout_type: Option<String>,
    /// Templates are listed separately by the client
    pub is_template: bool,
    /// Planned exercises
    pub exercises: Vec<Value>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last update
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create or full-replace payload for a workout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutCreate {
    /// Display name
    pub name: String,
    /// Free text
    #[serde(default)]
    pub description: Option<String>,
    /// Category
    #[serde(default)]
    pub workout_type: Option<String>,
    /// Template flag
    #[serde(default)]
    pub is_template: bool,
    /// Planned exercises
    #[serde(default)]
    pub exercises: Vec<Value>,
}

impl WorkoutCreate {
    /// Require a non-blank name
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` when the name is blank
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::missing_field("name"));
        }
        Ok(())
    }
}

/// A completed training session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkoutSession {
    /// Unique identifier
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    /// Plan followed, if any; cleared when the plan is deleted
    pub workout_id: Option<Uuid>,
    /// When the session happened
    pub session_date: DateTime<Utc>,
    /// Length of the session
    pub duration_minutes: Option<i64>,
    /// What was actually done
    pub exercises_completed: Vec<Value>,
    /// Sum of weight x reps x sets, null when zero
    pub total_volume: Option<f64>,
    /// Free text
    pub notes: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Session log payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSessionCreate {
    /// Plan followed
    #[serde(default)]
    pub workout_id: Option<Uuid>,
    /// Length of the session
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    /// What was done
    #[serde(default)]
    pub exercises_completed: Vec<Value>,
    /// Free text
    #[serde(default)]
    pub notes: Option<String>,
}

impl WorkoutSessionCreate {
    /// Reject negative durations
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` for a negative `duration_minutes`
    pub fn validate(&self) -> AppResult<()> {
        if self.duration_minutes.is_some_and(|minutes| minutes < 0) {
            return Err(AppError::out_of_range("duration_minutes", 0, i64::MAX));
        }
        Ok(())
    }
}

/// One exercise as performed within a session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExercisePerformance {
    /// Unique identifier
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    /// Session it belongs to
    pub session_id: Uuid,
    /// Exercise name as entered
    pub exercise_name: String,
    /// Client-side catalogue id
    pub exercise_id: Option<String>,
    /// Working weight
    pub weight_kg: Option<f64>,
    /// Reps per set
    pub reps: i64,
    /// Number of sets
    pub sets: i64,
    /// Rate of perceived exertion, 1-10
    pub rpe: Option<i64>,
    /// Epley one-rep-max estimate
    pub estimated_1rm: Option<f64>,
    /// Load to try next time
    pub suggested_next_weight: Option<f64>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}
