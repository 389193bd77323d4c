//! User repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use tokengate_core::error::AppError;
use tokengate_core::result::AppResult;
use tokengate_core::types::pagination::{PageRequest, PageResponse};
use tokengate_entity::user::{CreateUser, UpdateUser, User};

use super::map_sqlx_error;

/// Columns of [`User`], with the token pair joined from `issued_tokens`.
const USER_SELECT: &str = "SELECT u.id, u.email, u.first_name, u.last_name, u.phone, \
     u.password_hash, u.user_type, t.token, t.refresh_token, u.created_at, u.updated_at \
     FROM users u LEFT JOIN issued_tokens t ON t.user_id = u.id";

/// Repository for user CRUD and the issued token bookkeeping.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!("{USER_SELECT} WHERE u.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to find user by id", e))
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!("{USER_SELECT} WHERE LOWER(u.email) = LOWER($1)"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to find user by email", e))
    }

    /// List all users with pagination, newest first.
    pub async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<User>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to count users", e))?;

        let users = sqlx::query_as::<_, User>(&format!(
            "{USER_SELECT} ORDER BY u.created_at DESC, u.id LIMIT $1 OFFSET $2"
        ))
        .bind(i64::try_from(page.limit()).unwrap_or(i64::MAX))
        .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to list users", e))?;

        Ok(PageResponse::new(
            users,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Insert a user together with its first token pair in one transaction.
    pub async fn create(
        &self,
        data: &CreateUser,
        token: &str,
        refresh_token: &str,
        issued_at: DateTime<Utc>,
    ) -> AppResult<User> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("Failed to begin transaction", e))?;

        sqlx::query(
            "INSERT INTO users \
             (id, email, first_name, last_name, phone, password_hash, user_type, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)",
        )
        .bind(data.id)
        .bind(&data.email)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.phone)
        .bind(&data.password_hash)
        .bind(data.user_type.as_str())
        .bind(issued_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_write_error("Failed to create user", e))?;

        sqlx::query(
            "INSERT INTO issued_tokens (user_id, token, refresh_token, updated_at) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(data.id)
        .bind(token)
        .bind(refresh_token)
        .bind(issued_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to record issued tokens", e))?;

        let user = sqlx::query_as::<_, User>(&format!("{USER_SELECT} WHERE u.id = $1"))
            .bind(data.id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to read back created user", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("Failed to commit user creation", e))?;

        Ok(user)
    }

    /// Record the latest token pair for a user, creating the row if absent.
    pub async fn upsert_tokens(
        &self,
        user_id: Uuid,
        token: &str,
        refresh_token: &str,
        issued_at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO issued_tokens (user_id, token, refresh_token, updated_at) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id) DO UPDATE \
             SET token = EXCLUDED.token, \
                 refresh_token = EXCLUDED.refresh_token, \
                 updated_at = EXCLUDED.updated_at",
        )
        .bind(user_id)
        .bind(token)
        .bind(refresh_token)
        .bind(issued_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to record issued tokens", e))?;
        Ok(())
    }

    /// Apply a partial profile update. Returns `None` if the user does not exist.
    pub async fn update(&self, id: Uuid, data: &UpdateUser) -> AppResult<Option<User>> {
        let updated = sqlx::query(
            "UPDATE users SET \
             first_name = COALESCE($2, first_name), \
             last_name = COALESCE($3, last_name), \
             email = COALESCE($4, email), \
             phone = COALESCE($5, phone), \
             password_hash = COALESCE($6, password_hash), \
             updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error("Failed to update user", e))?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    /// Delete a user and its token record. Returns `false` if nothing existed.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("Failed to begin transaction", e))?;

        sqlx::query("DELETE FROM issued_tokens WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to delete issued tokens", e))?;

        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to delete user", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("Failed to commit user deletion", e))?;

        Ok(deleted.rows_affected() > 0)
    }
}

/// Map unique violations on email/phone to conflicts.
fn map_write_error(context: &'static str, err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db_err) = err {
        match db_err.constraint() {
            Some("users_email_key") => return AppError::conflict("Email already exists"),
            Some("users_phone_key") => return AppError::conflict("Phone number already exists"),
            _ => {}
        }
    }
    map_sqlx_error(context, err)
}
