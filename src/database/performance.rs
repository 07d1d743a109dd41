// ABOUTME: Per-exercise performance records derived from logged sessions
// ABOUTME: Read by session and aggregated into best lifts

use super::{parse_uuid, Database, DbResult};
use equilibria_core::models::ExercisePerformance;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use uuid::Uuid;

impl Database {
    pub(super) async fn migrate_performance(&self) -> DbResult<()> {
        self.run_migration(
            r"
            CREATE TABLE IF NOT EXISTS exercise_performance (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                session_id TEXT NOT NULL REFERENCES workout_sessions(id) ON DELETE CASCADE,
                exercise_name TEXT NOT NULL,
                exercise_id TEXT,
                weight_kg REAL,
                reps INTEGER NOT NULL,
                sets INTEGER NOT NULL,
                rpe INTEGER,
                estimated_1rm REAL,
                suggested_next_weight REAL,
                created_at TEXT NOT NULL
            )
            ",
        )
        .await?;

        self.run_migration(
            "CREATE INDEX IF NOT EXISTS idx_performance_session ON exercise_performance(session_id)",
        )
        .await
    }

    pub(super) async fn insert_performance(
        conn: &mut SqliteConnection,
        performance: &ExercisePerformance,
    ) -> DbResult<()> {
        sqlx::query(
            r"
            INSERT INTO exercise_performance (id, user_id, session_id, exercise_name, exercise_id,
                                              weight_kg, reps, sets, rpe, estimated_1rm,
                                              suggested_next_weight, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ",
        )
        .bind(performance.id.to_string())
        .bind(performance.user_id.to_string())
        .bind(performance.session_id.to_string())
        .bind(&performance.exercise_name)
        .bind(&performance.exercise_id)
        .bind(performance.weight_kg)
        .bind(performance.reps)
        .bind(performance.sets)
        .bind(performance.rpe)
        .bind(performance.estimated_1rm)
        .bind(performance.suggested_next_weight)
        .bind(performance.created_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Performances recorded for one of the user's sessions, in entry order
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded
    pub async fn get_session_performances(
        &self,
        user_id: Uuid,
        session_id: Uuid,
    ) -> DbResult<Vec<ExercisePerformance>> {
        let rows = sqlx::query(
            r"
            SELECT * FROM exercise_performance
            WHERE session_id = $1 AND user_id = $2
            ORDER BY rowid
            ",
        )
        .bind(session_id.to_string())
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_performance).collect()
    }

    /// `(exercise_name, weight_kg)` for every performance the user recorded
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_performance_weights(
        &self,
        user_id: Uuid,
    ) -> DbResult<Vec<(String, Option<f64>)>> {
        let rows = sqlx::query_as::<_, (String, Option<f64>)>(
            "SELECT exercise_name, weight_kg FROM exercise_performance WHERE user_id = $1",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    fn row_to_performance(row: &SqliteRow) -> DbResult<ExercisePerformance> {
        let id: String = row.get("id");
        let user_id: String = row.get("user_id");
        let session_id: String = row.get("session_id");

        Ok(ExercisePerformance {
            id: parse_uuid("exercise_performance", "id", &id)?,
            user_id: parse_uuid("exercise_performance", "user_id", &user_id)?,
            session_id: parse_uuid("exercise_performance", "session_id", &session_id)?,
            exercise_name: row.get("exercise_name"),
            exercise_id: row.get("exercise_id"),
            weight_kg: row.get("weight_kg"),
            reps: row.get("reps"),
            sets: row.get("sets"),
            rpe: row.get("rpe"),
            estimated_1rm: row.get("estimated_1rm"),
            suggested_next_weight: row.get("suggested_next_weight"),
            created_at: row.get("created_at"),
        })
    }
}
