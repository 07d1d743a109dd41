// ABOUTME: Recovery check-in storage
// ABOUTME: Inserts scored logs and reads history, latest entry and score windows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{parse_uuid, Database, DbResult};
use chrono::{DateTime, Utc};
use equilibria_core::errors::DatabaseError;
use equilibria_core::models::{RecoveryLog, TrainingIntensity};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

impl Database {
    pub(super) async fn migrate_recovery(&self) -> DbResult<()> {
        self.run_migration(
            r"
            CREATE TABLE IF NOT EXISTS recovery_logs (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                date TEXT NOT NULL,
                sleep_hours REAL,
                sleep_quality INTEGER,
                soreness_level INTEGER,
                energy_level INTEGER,
                stress_level INTEGER,
                recovery_score REAL,
                recommended_intensity TEXT,
                created_at TEXT NOT NULL
            )
            ",
        )
        .await?;

        self.run_migration(
            "CREATE INDEX IF NOT EXISTS idx_recovery_logs_user_date ON recovery_logs(user_id, date)",
        )
        .await
    }

    /// Store a scored check-in
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn create_recovery_log(&self, log: &RecoveryLog) -> DbResult<()> {
        sqlx::query(
            r"
            INSERT INTO recovery_logs (id, user_id, date, sleep_hours, sleep_quality,
                                       soreness_level, energy_level, stress_level,
                                       recovery_score, recommended_intensity, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(log.id.to_string())
        .bind(log.user_id.to_string())
        .bind(log.date)
        .bind(log.sleep_hours)
        .bind(log.sleep_quality)
        .bind(log.soreness_level)
        .bind(log.energy_level)
        .bind(log.stress_level)
        .bind(log.recovery_score)
        .bind(log.recommended_intensity.map(TrainingIntensity::as_str))
        .bind(log.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Logs dated at or after `since`, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded
    pub async fn get_recovery_history(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> DbResult<Vec<RecoveryLog>> {
        let rows = sqlx::query(
            r"
            SELECT * FROM recovery_logs
            WHERE user_id = $1 AND date >= $2
            ORDER BY date DESC
            ",
        )
        .bind(user_id.to_string())
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_recovery_log).collect()
    }

    /// Newest log, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row cannot be decoded
    pub async fn get_latest_recovery_log(&self, user_id: Uuid) -> DbResult<Option<RecoveryLog>> {
        let row = sqlx::query(
            "SELECT * FROM recovery_logs WHERE user_id = $1 ORDER BY date DESC LIMIT 1",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_recovery_log).transpose()
    }

    /// Non-null scores dated at or after `since`
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_recovery_scores(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> DbResult<Vec<f64>> {
        let scores = sqlx::query_scalar::<_, f64>(
            r"
            SELECT recovery_score FROM recovery_logs
            WHERE user_id = $1 AND date >= $2 AND recovery_score IS NOT NULL
            ",
        )
        .bind(user_id.to_string())
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(scores)
    }

    fn row_to_recovery_log(row: &SqliteRow) -> DbResult<RecoveryLog> {
        let id: String = row.get("id");
        let user_id: String = row.get("user_id");
        let intensity: Option<String> = row.get("recommended_intensity");

        let recommended_intensity = intensity
            .map(|label| {
                label.parse::<TrainingIntensity>().map_err(|_| DatabaseError::InvalidData {
                    table: "recovery_logs",
                    field: "recommended_intensity",
                    value: label,
                })
            })
            .transpose()?;

        Ok(RecoveryLog {
            id: parse_uuid("recovery_logs", "id", &id)?,
            user_id: parse_uuid("recovery_logs", "user_id", &user_id)?,
            date: row.get("date"),
            sleep_hours: row.get("sleep_hours"),
            sleep_quality: row.get("sleep_quality"),
            soreness_level: row.get("soreness_level"),
            energy_level: row.get("energy_level"),
            stress_level: row.get("stress_level"),
            recovery_score: row.get("recovery_score"),
            recommended_intensity,
            created_at: row.get("created_at"),
        })
    }
}
