//! Repository for the `users` table.

use annotate_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::role::UserRole;
use crate::models::user::{AnnotatorWorkload, CreateUser, UpdateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, first_name, last_name, username, email, password_hash, \
                       role_id, is_active, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (first_name, last_name, username, email, password_hash, role_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.role_id)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by ID only if they hold the annotator role.
    pub async fn find_annotator(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1 AND role_id = $2");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(UserRole::Annotator.id())
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List users holding `role`, ordered by ID.
    pub async fn list_by_role(pool: &PgPool, role: UserRole) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE role_id = $1 ORDER BY id");
        sqlx::query_as::<_, User>(&query)
            .bind(role.id())
            .fetch_all(pool)
            .await
    }

    /// Resolve `ids` to annotator users. Non-annotators and unknown IDs are
    /// dropped; the result is ordered by ID, not by `ids`.
    pub async fn find_annotators_by_ids(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<User>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let query = format!(
            "SELECT {COLUMNS} FROM users WHERE id = ANY($1) AND role_id = $2 ORDER BY id"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(ids)
            .bind(UserRole::Annotator.id())
            .fetch_all(pool)
            .await
    }

    /// Update a user. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                username = COALESCE($4, username),
                email = COALESCE($5, email),
                is_active = COALESCE($6, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.username)
            .bind(&input.email)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Soft-deactivate a user by setting `is_active = false`.
    ///
    /// Returns `true` if the row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE users SET is_active = false WHERE id = $1 AND is_active = true")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Update a user's password hash. Returns `true` if the row was updated.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count active annotators, optionally only those created before `before`.
    pub async fn count_active_annotators(
        pool: &PgPool,
        before: Option<Timestamp>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users
             WHERE role_id = $1 AND is_active = true
               AND ($2::timestamptz IS NULL OR created_at < $2)",
        )
        .bind(UserRole::Annotator.id())
        .bind(before)
        .fetch_one(pool)
        .await
    }

    /// Annotators holding no task in `dataset_id`, each with their task count
    /// across all datasets.
    pub async fn list_available_for_dataset(
        pool: &PgPool,
        dataset_id: DbId,
    ) -> Result<Vec<AnnotatorWorkload>, sqlx::Error> {
        sqlx::query_as::<_, AnnotatorWorkload>(
            "SELECT u.id, u.first_name, u.last_name, u.username, u.email, u.is_active,
                    (SELECT COUNT(*) FROM tasks t WHERE t.user_id = u.id) AS task_count
             FROM users u
             WHERE u.role_id = $2
               AND NOT EXISTS (
                   SELECT 1 FROM tasks t WHERE t.user_id = u.id AND t.dataset_id = $1
               )
             ORDER BY u.id",
        )
        .bind(dataset_id)
        .bind(UserRole::Annotator.id())
        .fetch_all(pool)
        .await
    }

    /// Annotators holding at least one task in `dataset_id`, with their task
    /// count in that dataset.
    pub async fn list_assigned_to_dataset(
        pool: &PgPool,
        dataset_id: DbId,
    ) -> Result<Vec<AnnotatorWorkload>, sqlx::Error> {
        sqlx::query_as::<_, AnnotatorWorkload>(
            "SELECT u.id, u.first_name, u.last_name, u.username, u.email, u.is_active,
                    COUNT(t.id) AS task_count
             FROM users u
             JOIN tasks t ON t.user_id = u.id
             WHERE t.dataset_id = $1
             GROUP BY u.id
             ORDER BY u.id",
        )
        .bind(dataset_id)
        .fetch_all(pool)
        .await
    }
}
