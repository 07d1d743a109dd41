// ABOUTME: Workout plan and workout session storage
// ABOUTME: Sessions are written together with their exercise performances in one transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{parse_json_array, parse_uuid, Database, DbResult};
use chrono::Utc;
use equilibria_core::models::{ExercisePerformance, Workout, WorkoutCreate, WorkoutSession};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

impl Database {
    pub(super) async fn migrate_workouts(&self) -> DbResult<()> {
        self.run_migration(
            r"
            CREATE TABLE IF NOT EXISTS workouts (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                description TEXT,
                workout_type TEXT,
                is_template BOOLEAN NOT NULL DEFAULT false,
                exercises TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL,
                updated_at TEXT
            )
            ",
        )
        .await?;

        self.run_migration(
            r"
            CREATE TABLE IF NOT EXISTS workout_sessions (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                workout_id TEXT REFERENCES workouts(id) ON DELETE SET NULL,
                session_date TEXT NOT NULL,
                duration_minutes INTEGER,
                exercises_completed TEXT NOT NULL DEFAULT '[]',
                total_volume REAL,
                notes TEXT,
                created_at TEXT NOT NULL
            )
            ",
        )
        .await?;

        self.run_migration(
            "CREATE INDEX IF NOT EXISTS idx_workouts_user ON workouts(user_id, created_at)",
        )
        .await?;
        self.run_migration(
            "CREATE INDEX IF NOT EXISTS idx_sessions_user_date ON workout_sessions(user_id, session_date)",
        )
        .await
    }

    /// Store a new workout plan
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the insert fails
    pub async fn create_workout(&self, workout: &Workout) -> DbResult<()> {
        sqlx::query(
            r"
            INSERT INTO workouts (id, user_id, name, description, workout_type, is_template,
                                  exercises, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(workout.id.to_string())
        .bind(workout.user_id.to_string())
        .bind(&workout.name)
        .bind(&workout.description)
        .bind(&workout.workout_type)
        .bind(workout.is_template)
        .bind(serde_json::to_string(&workout.exercises)?)
        .bind(workout.created_at)
        .bind(workout.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// The user's workouts, newest first, optionally templates only
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded
    pub async fn list_workouts(&self, user_id: Uuid, templates_only: bool) -> DbResult<Vec<Workout>> {
        let rows = sqlx::query(
            r"
            SELECT * FROM workouts
            WHERE user_id = $1 AND ($2 = 0 OR is_template = 1)
            ORDER BY created_at DESC
            ",
        )
        .bind(user_id.to_string())
        .bind(templates_only)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_workout).collect()
    }

    /// One of the user's workouts
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row cannot be decoded
    pub async fn get_workout(&self, user_id: Uuid, workout_id: Uuid) -> DbResult<Option<Workout>> {
        let row = sqlx::query("SELECT * FROM workouts WHERE id = $1 AND user_id = $2")
            .bind(workout_id.to_string())
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_workout).transpose()
    }

    /// Replace every editable field of a workout; `None` when it is not the user's
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the update fails
    pub async fn replace_workout(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
        update: &WorkoutCreate,
    ) -> DbResult<Option<Workout>> {
        let row = sqlx::query(
            r"
            UPDATE workouts
            SET name = $3, description = $4, workout_type = $5, is_template = $6,
                exercises = $7, updated_at = $8
            WHERE id = $1 AND user_id = $2
            RETURNING *
            ",
        )
        .bind(workout_id.to_string())
        .bind(user_id.to_string())
        .bind(update.name.trim())
        .bind(&update.description)
        .bind(&update.workout_type)
        .bind(update.is_template)
        .bind(serde_json::to_string(&update.exercises)?)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_workout).transpose()
    }

    /// Delete a workout, detaching the sessions that followed it
    ///
    /// Returns `false` when the workout is not the user's.
    ///
    /// # Errors
    ///
    /// Returns an error if either statement fails; nothing is changed then
    pub async fn delete_workout(&self, user_id: Uuid, workout_id: Uuid) -> DbResult<bool> {
        let mut tx = self.pool.begin().await?;

        let owned = sqlx::query("SELECT 1 FROM workouts WHERE id = $1 AND user_id = $2")
            .bind(workout_id.to_string())
            .bind(user_id.to_string())
            .fetch_optional(&mut *tx)
            .await?
            .is_some();
        if !owned {
            return Ok(false);
        }

        sqlx::query("UPDATE workout_sessions SET workout_id = NULL WHERE workout_id = $1")
            .bind(workout_id.to_string())
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM workouts WHERE id = $1 AND user_id = $2")
            .bind(workout_id.to_string())
            .bind(user_id.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Store a session and its exercise performances atomically
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails; the transaction is rolled back
    pub async fn create_workout_session(
        &self,
        session: &WorkoutSession,
        performances: &[ExercisePerformance],
    ) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            INSERT INTO workout_sessions (id, user_id, workout_id, session_date, duration_minutes,
                                          exercises_completed, total_volume, notes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(session.id.to_string())
        .bind(session.user_id.to_string())
        .bind(session.workout_id.map(|id| id.to_string()))
        .bind(session.session_date)
        .bind(session.duration_minutes)
        .bind(serde_json::to_string(&session.exercises_completed)?)
        .bind(session.total_volume)
        .bind(&session.notes)
        .bind(session.created_at)
        .execute(&mut *tx)
        .await?;

        for performance in performances {
            Self::insert_performance(&mut tx, performance).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// The user's most recent sessions
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded
    pub async fn list_workout_sessions(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> DbResult<Vec<WorkoutSession>> {
        let rows = sqlx::query(
            r"
            SELECT * FROM workout_sessions
            WHERE user_id = $1
            ORDER BY session_date DESC
            LIMIT $2
            ",
        )
        .bind(user_id.to_string())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_session).collect()
    }

    /// One of the user's sessions
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row cannot be decoded
    pub async fn get_workout_session(
        &self,
        user_id: Uuid,
        session_id: Uuid,
    ) -> DbResult<Option<WorkoutSession>> {
        let row = sqlx::query("SELECT * FROM workout_sessions WHERE id = $1 AND user_id = $2")
            .bind(session_id.to_string())
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_session).transpose()
    }

    fn row_to_workout(row: &SqliteRow) -> DbResult<Workout> {
        let id: String = row.get("id");
        let user_id: String = row.get("user_id");
        let exercises: Option<String> = row.get("exercises");

        Ok(Workout {
            id: parse_uuid("workouts", "id", &id)?,
            user_id: parse_uuid("workouts", "user_id", &user_id)?,
            name: row.get("name"),
            description: row.get("description"),
            workout_type: row.get("workout_type"),
            is_template: row.get("is_template"),
            exercises: parse_json_array("workouts", "exercises", exercises.as_deref())?,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    fn row_to_session(row: &SqliteRow) -> DbResult<WorkoutSession> {
        let id: String = row.get("id");
        let user_id: String = row.get("user_id");
        let workout_id: Option<String> = row.get("workout_id");
        let exercises: Option<String> = row.get("exercises_completed");

        Ok(WorkoutSession {
            id: parse_uuid("workout_sessions", "id", &id)?,
            user_id: parse_uuid("workout_sessions", "user_id", &user_id)?,
            workout_id: workout_id
                .as_deref()
                .map(|value| parse_uuid("workout_sessions", "workout_id", value))
                .transpose()?,
            session_date: row.get("session_date"),
            duration_minutes: row.get("duration_minutes"),
            exercises_completed: parse_json_array(
                "workout_sessions",
                "exercises_completed",
                exercises.as_deref(),
            )?,
            total_volume: row.get("total_volume"),
            notes: row.get("notes"),
            created_at: row.get("created_at"),
        })
    }
}
