//! Friend repository implementation
//!
//! Every lifecycle mutation is a single guarded UPDATE: the row only changes
//! when its status still matches the expected pre-state, so two racing calls
//! on the same record cannot both commit. The loser gets a typed transition
//! error instead of silently overwriting.

use chrono::Utc;
use sqlx::PgPool;

use crate::models::friend::{CreateFriendRequest, Friend, FriendStatus};
use crate::utils::errors::TapCircleError;

const FRIEND_COLUMNS: &str = "id, status, has_claimed, sender_id, receiver_id, \
     sender_count, receiver_count, custom_logs, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct FriendRepository {
    pool: PgPool,
}

impl FriendRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new pending friend request
    ///
    /// The pair check and insert run in one transaction; the partial unique
    /// index on the unordered pair backs the check against concurrent creates.
    pub async fn create(&self, request: CreateFriendRequest) -> Result<Friend, TapCircleError> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<(i64,)> = sqlx::query_as(
            r#"
            SELECT id FROM friends
            WHERE status <> 'rejected'
              AND ((sender_id = $1 AND receiver_id = $2)
                OR (sender_id = $2 AND receiver_id = $1))
            "#,
        )
        .bind(request.sender_id)
        .bind(request.receiver_id)
        .fetch_optional(&mut *tx)
        .await?;

        if existing.is_some() {
            return Err(TapCircleError::DuplicateRelationship {
                sender_id: request.sender_id,
                receiver_id: request.receiver_id,
            });
        }

        let sql = format!(
            r#"
            INSERT INTO friends (status, has_claimed, sender_id, receiver_id,
                                 sender_count, receiver_count, custom_logs,
                                 created_at, updated_at)
            VALUES ('pending', false, $1, $2, 0, 0, $3, $4, $4)
            RETURNING {FRIEND_COLUMNS}
            "#
        );

        let friend = sqlx::query_as::<_, Friend>(&sql)
            .bind(request.sender_id)
            .bind(request.receiver_id)
            .bind(request.custom_logs)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await
            .map_err(|err| map_create_error(err, request.sender_id, request.receiver_id))?;

        tx.commit().await?;
        Ok(friend)
    }

    /// Find friend record by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Friend>, TapCircleError> {
        let sql = format!("SELECT {FRIEND_COLUMNS} FROM friends WHERE id = $1");
        let friend = sqlx::query_as::<_, Friend>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(friend)
    }

    /// Accept a pending request: pending -> active, crediting the referral
    /// to the sender
    pub async fn accept(&self, friend_id: i64) -> Result<Friend, TapCircleError> {
        let sql = format!(
            r#"
            UPDATE friends
            SET status = 'active',
                sender_count = sender_count + 1,
                updated_at = $2
            WHERE id = $1 AND status = 'pending'
            RETURNING {FRIEND_COLUMNS}
            "#
        );

        let updated = sqlx::query_as::<_, Friend>(&sql)
            .bind(friend_id)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| map_conflict(err, friend_id))?;

        match updated {
            Some(friend) => Ok(friend),
            None => Err(self.transition_failure(friend_id, FriendStatus::Active).await?),
        }
    }

    /// Reject a pending request: pending -> rejected
    ///
    /// The record is retained for audit and referral history.
    pub async fn reject(&self, friend_id: i64) -> Result<Friend, TapCircleError> {
        let sql = format!(
            r#"
            UPDATE friends
            SET status = 'rejected', updated_at = $2
            WHERE id = $1 AND status = 'pending'
            RETURNING {FRIEND_COLUMNS}
            "#
        );

        let updated = sqlx::query_as::<_, Friend>(&sql)
            .bind(friend_id)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| map_conflict(err, friend_id))?;

        match updated {
            Some(friend) => Ok(friend),
            None => Err(self
                .transition_failure(friend_id, FriendStatus::Rejected)
                .await?),
        }
    }

    /// Claim the referral reward on an active record, at most once
    pub async fn claim_reward(&self, friend_id: i64) -> Result<Friend, TapCircleError> {
        let sql = format!(
            r#"
            UPDATE friends
            SET has_claimed = true, updated_at = $2
            WHERE id = $1 AND status = 'active' AND has_claimed = false
            RETURNING {FRIEND_COLUMNS}
            "#
        );

        let updated = sqlx::query_as::<_, Friend>(&sql)
            .bind(friend_id)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| map_conflict(err, friend_id))?;

        match updated {
            Some(friend) => Ok(friend),
            None => match self.find_by_id(friend_id).await? {
                None => Err(TapCircleError::FriendNotFound { friend_id }),
                Some(_) => Err(TapCircleError::InvalidClaimState { friend_id }),
            },
        }
    }

    /// List friend records where the given user is the sender
    pub async fn list_by_sender(&self, user_id: i64) -> Result<Vec<Friend>, TapCircleError> {
        let sql = format!(
            "SELECT {FRIEND_COLUMNS} FROM friends WHERE sender_id = $1 ORDER BY created_at DESC"
        );
        let friends = sqlx::query_as::<_, Friend>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(friends)
    }

    /// List friend records where the given user is the receiver
    pub async fn list_by_receiver(&self, user_id: i64) -> Result<Vec<Friend>, TapCircleError> {
        let sql = format!(
            "SELECT {FRIEND_COLUMNS} FROM friends WHERE receiver_id = $1 ORDER BY created_at DESC"
        );
        let friends = sqlx::query_as::<_, Friend>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(friends)
    }

    /// Count total friend records
    pub async fn count(&self) -> Result<i64, TapCircleError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM friends")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Per-user referral aggregates across all users
    ///
    /// LEFT JOIN keeps users with no friend records in the result with a
    /// zero count. Ordering is count descending with user id as tie-break.
    pub async fn referral_aggregates(
        &self,
    ) -> Result<Vec<crate::models::ranking::ReferralAggregate>, TapCircleError> {
        let aggregates = sqlx::query_as::<_, crate::models::ranking::ReferralAggregate>(
            r#"
            SELECT u.id AS user_id,
                   u.telegram_id,
                   u.username,
                   COALESCE(SUM(f.sender_count), 0)::BIGINT AS sender_count
            FROM users u
            LEFT JOIN friends f ON f.sender_id = u.id
            GROUP BY u.id, u.telegram_id, u.username
            ORDER BY sender_count DESC, u.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(aggregates)
    }

    /// Build the error for a guarded update that matched no row
    async fn transition_failure(
        &self,
        friend_id: i64,
        target: FriendStatus,
    ) -> Result<TapCircleError, TapCircleError> {
        match self.find_by_id(friend_id).await? {
            None => Ok(TapCircleError::FriendNotFound { friend_id }),
            Some(friend) => Ok(TapCircleError::InvalidTransition {
                from: friend.status.to_string(),
                to: target.to_string(),
            }),
        }
    }
}

fn pg_error_code(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db) => db.code().map(|c| c.into_owned()),
        _ => None,
    }
}

fn map_create_error(err: sqlx::Error, sender_id: i64, receiver_id: i64) -> TapCircleError {
    let constraint = match &err {
        sqlx::Error::Database(db) => db.constraint().map(String::from),
        _ => None,
    };

    match pg_error_code(&err).as_deref() {
        // Lost the race against a concurrent create for the same pair
        Some("23505") => TapCircleError::DuplicateRelationship {
            sender_id,
            receiver_id,
        },
        Some("23503") => {
            let user_id = match constraint.as_deref() {
                Some("friends_receiver_id_fkey") => receiver_id,
                _ => sender_id,
            };
            TapCircleError::UserNotFound { user_id }
        }
        Some("23514") => TapCircleError::InvalidRelationship { user_id: sender_id },
        _ => TapCircleError::Database(err),
    }
}

/// Map Postgres serialization failures and deadlocks on guarded updates to a
/// typed optimistic-concurrency conflict
fn map_conflict(err: sqlx::Error, friend_id: i64) -> TapCircleError {
    match pg_error_code(&err).as_deref() {
        Some("40001") | Some("40P01") => TapCircleError::ConcurrentModification { friend_id },
        _ => TapCircleError::Database(err),
    }
}
