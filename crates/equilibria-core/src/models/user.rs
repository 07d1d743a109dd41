// ABOUTME: User account model with profile fields and its public response shape
// ABOUTME: User, UserResponse, UserProfileUpdate, and PasswordChange definitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registered account
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,
    /// Login email, unique
    pub email: String,
    /// Login handle, unique
    pub username: String,
    /// bcrypt hash, never serialized
    pub password_hash: String,
    /// Cleared by account deletion; inactive users cannot use the API
    pub is_active: bool,
    /// Admin flag (no admin endpoints are exposed)
    pub is_admin: bool,
    /// Account creation time
    pub created_at: DateTime<Utc>,
    /// Last profile or password change
    pub updated_at: Option<DateTime<Utc>>,
    /// Height in centimetres
    pub height_cm: Option<f64>,
    /// Body weight in kilograms
    pub weight_kg: Option<f64>,
    /// Age in years
    pub age: Option<i64>,
    /// Free-form level such as "beginner"
    pub fitness_level: Option<String>,
}

impl User {
    /// Build a new active account with a fresh id
    #[must_use]
    pub fn new(email: String, username: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            username,
            password_hash,
            is_active: true,
            is_admin: false,
            created_at: Utc::now(),
            updated_at: None,
            height_cm: None,
            weight_kg: None,
            age: None,
            fitness_level: None,
        }
    }

    /// Apply the present fields of a profile update
    pub fn apply_profile_update(&mut self, update: &UserProfileUpdate) {
        if let Some(height_cm) = update.height_cm {
            self.height_cm = Some(height_cm);
        }
        if let Some(weight_kg) = update.weight_kg {
            self.weight_kg = Some(weight_kg);
        }
        if let Some(age) = update.age {
            self.age = Some(age);
        }
        if let Some(fitness_level) = &update.fitness_level {
            self.fitness_level = Some(fitness_level.clone());
        }
    }
}

/// Public view of a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserResponse {
    /// Unique identifier
    pub id: Uuid,
    /// Login email
    pub email: String,
    /// Login handle
    pub username: String,
    /// Whether the account is active
    pub is_active: bool,
    /// Account creation time
    pub created_at: DateTime<Utc>,
    /// Height in centimetres
    pub height_cm: Option<f64>,
    /// Body weight in kilograms
    pub weight_kg: Option<f64>,
    /// Age in years
    pub age: Option<i64>,
    /// Free-form fitness level
    pub fitness_level: Option<String>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            is_active: user.is_active,
            created_at: user.created_at,
            height_cm: user.height_cm,
            weight_kg: user.weight_kg,
            age: user.age,
            fitness_level: user.fitness_level.clone(),
        }
    }
}

/// Partial profile update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfileUpdate {
    /// New height
    #[serde(default)]
    pub height_cm: Option<f64>,
    /// New weight
    #[serde(default)]
    pub weight_kg: Option<f64>,
    /// New age
    #[serde(default)]
    pub age: Option<i64>,
    /// New fitness level
    #[serde(default)]
    pub fitness_level: Option<String>,
}

/// Password change request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordChange {
    /// Must match the stored hash
    pub current_password: String,
    /// Replacement password
    pub new_password: String,
}
