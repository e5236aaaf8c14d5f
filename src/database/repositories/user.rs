//! User repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::user::{CreateUserRequest, UpdateUserRequest, User};
use crate::utils::errors::TapCircleError;

const USER_COLUMNS: &str = "id, telegram_id, username, chat_id, wallet_address, start_param, \
     token_balance, active, premium, admin, location, nationality, age, gender, email, \
     skin, in_game_items, custom_logs, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, TapCircleError> {
        let sql = format!(
            r#"
            INSERT INTO users (telegram_id, username, chat_id, wallet_address, start_param,
                               premium, location, nationality, age, gender, email,
                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12)
            RETURNING {USER_COLUMNS}
            "#
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(request.telegram_id)
            .bind(request.username)
            .bind(request.chat_id)
            .bind(request.wallet_address)
            .bind(request.start_param)
            .bind(request.premium)
            .bind(request.location)
            .bind(request.nationality)
            .bind(request.age)
            .bind(request.gender)
            .bind(request.email)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(map_unique_violation)?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, TapCircleError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Find user by Telegram ID
    pub async fn find_by_telegram_id(
        &self,
        telegram_id: &str,
    ) -> Result<Option<User>, TapCircleError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE telegram_id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(telegram_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Find user by username
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, TapCircleError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Update user with a partial payload, refreshing updated_at
    pub async fn update(
        &self,
        id: i64,
        request: UpdateUserRequest,
    ) -> Result<User, TapCircleError> {
        let sql = format!(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                token_balance = COALESCE($3, token_balance),
                active = COALESCE($4, active),
                premium = COALESCE($5, premium),
                location = COALESCE($6, location),
                age = COALESCE($7, age),
                email = COALESCE($8, email),
                skin = COALESCE($9, skin),
                in_game_items = COALESCE($10, in_game_items),
                custom_logs = COALESCE($11, custom_logs),
                updated_at = $12
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(request.username)
            .bind(request.token_balance)
            .bind(request.active)
            .bind(request.premium)
            .bind(request.location)
            .bind(request.age)
            .bind(request.email)
            .bind(request.skin)
            .bind(request.in_game_items)
            .bind(request.custom_logs)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_unique_violation)?
            .ok_or(TapCircleError::UserNotFound { user_id: id })?;

        Ok(user)
    }

    /// Soft-deactivate or reactivate a user; users are never hard-deleted
    pub async fn set_active(&self, id: i64, active: bool) -> Result<User, TapCircleError> {
        let sql = format!(
            r#"
            UPDATE users
            SET active = $2, updated_at = $3
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(active)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(TapCircleError::UserNotFound { user_id: id })?;

        Ok(user)
    }

    /// Atomically adjust a user's token balance; the CHECK constraint keeps
    /// the balance non-negative under concurrent adjustments
    pub async fn adjust_token_balance(
        &self,
        id: i64,
        delta: i64,
    ) -> Result<User, TapCircleError> {
        let sql = format!(
            r#"
            UPDATE users
            SET token_balance = token_balance + $2, updated_at = $3
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(delta)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| match pg_error_code(&err) {
                Some(code) if code == "23514" => TapCircleError::InvalidInput(
                    "Token balance cannot go negative".to_string(),
                ),
                _ => TapCircleError::Database(err),
            })?
            .ok_or(TapCircleError::UserNotFound { user_id: id })?;

        Ok(user)
    }

    /// List users with pagination
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>, TapCircleError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        );
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    /// Count total users
    pub async fn count(&self) -> Result<i64, TapCircleError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Count active (non-deactivated) users
    pub async fn count_active(&self) -> Result<i64, TapCircleError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE active = true")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}

fn pg_error_code(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db) => db.code().map(|c| c.into_owned()),
        _ => None,
    }
}

fn map_unique_violation(err: sqlx::Error) -> TapCircleError {
    match pg_error_code(&err) {
        Some(code) if code == "23505" => TapCircleError::DuplicateUser,
        _ => TapCircleError::Database(err),
    }
}
