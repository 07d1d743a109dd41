// ABOUTME: User management database operations
// ABOUTME: Handles registration, lookup by id/email/username, profile edits and deactivation

use super::{parse_uuid, Database, DbResult};
use chrono::Utc;
use equilibria_core::models::User;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, email, username, password_hash, is_active, is_admin, \
     created_at, updated_at, height_cm, weight_kg, age, fitness_level";

impl Database {
    pub(super) async fn migrate_users(&self) -> DbResult<()> {
        self.run_migration(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                is_active BOOLEAN NOT NULL DEFAULT true,
                is_admin BOOLEAN NOT NULL DEFAULT false,
                created_at TEXT NOT NULL,
                updated_at TEXT,
                height_cm REAL,
                weight_kg REAL,
                age INTEGER,
                fitness_level TEXT
            )
            ",
        )
        .await
    }

    /// Insert a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails, including unique violations on
    /// email or username
    pub async fn create_user(&self, user: &User) -> DbResult<Uuid> {
        sqlx::query(
            r"
            INSERT INTO users (id, email, username, password_hash, is_active, is_admin,
                               created_at, updated_at, height_cm, weight_kg, age, fitness_level)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .bind(user.is_admin)
        .bind(user.created_at)
        .bind(user.updated_at)
        .bind(user.height_cm)
        .bind(user.weight_kg)
        .bind(user.age)
        .bind(&user.fitness_level)
        .execute(&self.pool)
        .await?;

        Ok(user.id)
    }

    /// Get a user by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_user(&self, user_id: Uuid) -> DbResult<Option<User>> {
        self.get_user_impl("id", &user_id.to_string()).await
    }

    /// Get a user by email
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_user_by_email(&self, email: &str) -> DbResult<Option<User>> {
        self.get_user_impl("email", email).await
    }

    /// Get a user by username
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_user_by_username(&self, username: &str) -> DbResult<Option<User>> {
        self.get_user_impl("username", username).await
    }

    /// Resolve a login identifier that may be either a username or an email
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_user_by_login(&self, identifier: &str) -> DbResult<Option<User>> {
        if let Some(user) = self.get_user_by_username(identifier).await? {
            return Ok(Some(user));
        }
        self.get_user_by_email(&identifier.to_lowercase()).await
    }

    async fn get_user_impl(&self, field: &str, value: &str) -> DbResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE {field} = $1");

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    /// Persist the profile fields of a user and stamp `updated_at`
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn update_user_profile(&self, user: &User) -> DbResult<User> {
        let row = sqlx::query(&format!(
            r"
            UPDATE users
            SET height_cm = $2, weight_kg = $3, age = $4, fitness_level = $5, updated_at = $6
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(user.id.to_string())
        .bind(user.height_cm)
        .bind(user.weight_kg)
        .bind(user.age)
        .bind(&user.fitness_level)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Self::row_to_user(&row)
    }

    /// Replace a user's password hash
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn update_password_hash(&self, user_id: Uuid, password_hash: &str) -> DbResult<()> {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = $3 WHERE id = $1")
            .bind(user_id.to_string())
            .bind(password_hash)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Soft-delete: clear the active flag, keep every owned row
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn deactivate_user(&self, user_id: Uuid) -> DbResult<bool> {
        let result =
            sqlx::query("UPDATE users SET is_active = false, updated_at = $2 WHERE id = $1")
                .bind(user_id.to_string())
                .bind(Utc::now())
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Convert a database row to a User
    fn row_to_user(row: &SqliteRow) -> DbResult<User> {
        let id: String = row.get("id");

        Ok(User {
            id: parse_uuid("users", "id", &id)?,
            email: row.get("email"),
            username: row.get("username"),
            password_hash: row.get("password_hash"),
            is_active: row.get("is_active"),
            is_admin: row.get("is_admin"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
            height_cm: row.get("height_cm"),
            weight_kg: row.get("weight_kg"),
            age: row.get("age"),
            fitness_level: row.get("fitness_level"),
        })
    }
}
