// ABOUTME: Core data models for the Equilibria API
// ABOUTME: Users, recovery logs, wearable readings, workouts, sessions and exercise performances
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! Flat row types shared by the storage layer, the scoring engine and the
//! HTTP handlers. Identifiers are UUIDs and timestamps are UTC.

mod recovery;
mod serde_helpers;
mod user;
mod wearable;
mod workout;

pub use recovery::{RecoveryLog, RecoveryLogRequest, RecoveryStats, TrainingIntensity};
pub use serde_helpers::{deserialize_flexible_datetime, parse_flexible_datetime};
pub use user::{PasswordChange, User, UserProfileUpdate, UserResponse};
pub use wearable::{WearableData, WearableDataInput};
pub use workout::{
    ExercisePerformance, Workout, WorkoutCreate, WorkoutSession, WorkoutSessionCreate,
};
