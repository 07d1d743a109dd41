// ABOUTME: Wearable reading storage with upsert on (user, source, measurement_date)
// ABOUTME: Single and batch sync, history, latest reading and range deletion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{parse_uuid, Database, DbResult};
use chrono::{DateTime, Utc};
use equilibria_core::models::{WearableData, WearableDataInput};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use uuid::Uuid;

const UPSERT_WEARABLE: &str = r"
    INSERT INTO wearable_data (id, user_id, source, sync_timestamp, hrv_rmssd, hrv_sdnn,
                               resting_heart_rate, avg_heart_rate, sleep_duration_minutes,
                               deep_sleep_minutes, rem_sleep_minutes, steps, active_calories,
                               raw_data, measurement_date, created_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
    ON CONFLICT(user_id, source, measurement_date) DO UPDATE SET
        sync_timestamp = excluded.sync_timestamp,
        hrv_rmssd = COALESCE(excluded.hrv_rmssd, wearable_data.hrv_rmssd),
        hrv_sdnn = COALESCE(excluded.hrv_sdnn, wearable_data.hrv_sdnn),
        resting_heart_rate = COALESCE(excluded.resting_heart_rate, wearable_data.resting_heart_rate),
        avg_heart_rate = COALESCE(excluded.avg_heart_rate, wearable_data.avg_heart_rate),
        sleep_duration_minutes = COALESCE(excluded.sleep_duration_minutes, wearable_data.sleep_duration_minutes),
        deep_sleep_minutes = COALESCE(excluded.deep_sleep_minutes, wearable_data.deep_sleep_minutes),
        rem_sleep_minutes = COALESCE(excluded.rem_sleep_minutes, wearable_data.rem_sleep_minutes),
        steps = COALESCE(excluded.steps, wearable_data.steps),
        active_calories = COALESCE(excluded.active_calories, wearable_data.active_calories),
        raw_data = COALESCE(excluded.raw_data, wearable_data.raw_data)
    RETURNING *
";

impl Database {
    pub(super) async fn migrate_wearables(&self) -> DbResult<()> {
        self.run_migration(
            r"
            CREATE TABLE IF NOT EXISTS wearable_data (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                source TEXT NOT NULL,
                sync_timestamp TEXT NOT NULL,
                hrv_rmssd REAL,
                hrv_sdnn REAL,
                resting_heart_rate INTEGER,
                avg_heart_rate INTEGER,
                sleep_duration_minutes INTEGER,
                deep_sleep_minutes INTEGER,
                rem_sleep_minutes INTEGER,
                steps INTEGER,
                active_calories INTEGER,
                raw_data TEXT,
                measurement_date TEXT NOT NULL,
                created_at TEXT NOT NULL,
                UNIQUE(user_id, source, measurement_date)
            )
            ",
        )
        .await?;

        self.run_migration(
            "CREATE INDEX IF NOT EXISTS idx_wearable_user_measured ON wearable_data(user_id, measurement_date)",
        )
        .await
    }

    /// Insert a reading or merge it into the existing row for the same
    /// `(user, source, measurement_date)`
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails or the row cannot be decoded
    pub async fn upsert_wearable_data(
        &self,
        user_id: Uuid,
        input: &WearableDataInput,
    ) -> DbResult<WearableData> {
        let mut conn = self.pool.acquire().await?;
        Self::upsert_wearable_on(&mut conn, user_id, input, Utc::now()).await
    }

    /// Upsert every reading in one transaction; nothing is written if any fails
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails; the transaction is rolled back
    pub async fn upsert_wearable_batch(
        &self,
        user_id: Uuid,
        inputs: &[WearableDataInput],
    ) -> DbResult<Vec<WearableData>> {
        let mut tx = self.pool.begin().await?;
        let synced_at = Utc::now();

        let mut stored = Vec::with_capacity(inputs.len());
        for input in inputs {
            stored.push(Self::upsert_wearable_on(&mut tx, user_id, input, synced_at).await?);
        }

        tx.commit().await?;
        Ok(stored)
    }

    async fn upsert_wearable_on(
        conn: &mut SqliteConnection,
        user_id: Uuid,
        input: &WearableDataInput,
        synced_at: DateTime<Utc>,
    ) -> DbResult<WearableData> {
        let raw_data = input
            .raw_data
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let row = sqlx::query(UPSERT_WEARABLE)
            .bind(Uuid::new_v4().to_string())
            .bind(user_id.to_string())
            .bind(input.source.trim())
            .bind(synced_at)
            .bind(input.hrv_rmssd)
            .bind(input.hrv_sdnn)
            .bind(input.resting_heart_rate)
            .bind(input.avg_heart_rate)
            .bind(input.sleep_duration_minutes)
            .bind(input.deep_sleep_minutes)
            .bind(input.rem_sleep_minutes)
            .bind(input.steps)
            .bind(input.active_calories)
            .bind(raw_data)
            .bind(input.measurement_date)
            .bind(synced_at)
            .fetch_one(&mut *conn)
            .await?;

        Self::row_to_wearable(&row)
    }

    /// Readings measured at or after `since`, optionally for one source, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded
    pub async fn get_wearable_history(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
        source: Option<&str>,
    ) -> DbResult<Vec<WearableData>> {
        let rows = sqlx::query(
            r"
            SELECT * FROM wearable_data
            WHERE user_id = $1 AND measurement_date >= $2 AND ($3 IS NULL OR source = $3)
            ORDER BY measurement_date DESC
            ",
        )
        .bind(user_id.to_string())
        .bind(since)
        .bind(source)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_wearable).collect()
    }

    /// Newest reading, optionally for one source, optionally no older than `since`
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row cannot be decoded
    pub async fn get_latest_wearable_data(
        &self,
        user_id: Uuid,
        source: Option<&str>,
        since: Option<DateTime<Utc>>,
    ) -> DbResult<Option<WearableData>> {
        let row = sqlx::query(
            r"
            SELECT * FROM wearable_data
            WHERE user_id = $1
              AND ($2 IS NULL OR source = $2)
              AND ($3 IS NULL OR measurement_date >= $3)
            ORDER BY measurement_date DESC
            LIMIT 1
            ",
        )
        .bind(user_id.to_string())
        .bind(source)
        .bind(since)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_wearable).transpose()
    }

    /// Delete readings measured before `before` (all when `None`), optionally
    /// for one source; returns the number removed
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails
    pub async fn delete_wearable_data(
        &self,
        user_id: Uuid,
        before: Option<DateTime<Utc>>,
        source: Option<&str>,
    ) -> DbResult<u64> {
        let result = sqlx::query(
            r"
            DELETE FROM wearable_data
            WHERE user_id = $1
              AND ($2 IS NULL OR measurement_date < $2)
              AND ($3 IS NULL OR source = $3)
            ",
        )
        .bind(user_id.to_string())
        .bind(before)
        .bind(source)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    fn row_to_wearable(row: &SqliteRow) -> DbResult<WearableData> {
        let id: String = row.get("id");
        let user_id: String = row.get("user_id");
        let raw_data: Option<String> = row.get("raw_data");

        Ok(WearableData {
            id: parse_uuid("wearable_data", "id", &id)?,
            user_id: parse_uuid("wearable_data", "user_id", &user_id)?,
            source: row.get("source"),
            sync_timestamp: row.get("sync_timestamp"),
            hrv_rmssd: row.get("hrv_rmssd"),
            hrv_sdnn: row.get("hrv_sdnn"),
            resting_heart_rate: row.get("resting_heart_rate"),
            avg_heart_rate: row.get("avg_heart_rate"),
            sleep_duration_minutes: row.get("sleep_duration_minutes"),
            deep_sleep_minutes: row.get("deep_sleep_minutes"),
            rem_sleep_minutes: row.get("rem_sleep_minutes"),
            steps: row.get("steps"),
            active_calories: row.get("active_calories"),
            raw_data: raw_data.as_deref().map(serde_json::from_str).transpose()?,
            measurement_date: row.get("measurement_date"),
            created_at: row.get("created_at"),
        })
    }
}
