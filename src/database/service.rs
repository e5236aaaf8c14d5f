//! Database service layer
//!
//! This module provides a high-level interface to database operations

use crate::database::{DatabasePool, FriendRepository, UserRepository};
use crate::models::friend::{CreateFriendRequest, Friend};
use crate::models::user::{CreateUserRequest, User};
use crate::utils::errors::TapCircleError;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub users: UserRepository,
    pub friends: FriendRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            friends: FriendRepository::new(pool),
        }
    }

    /// Initialize a new user in the system, idempotent on telegram_id
    pub async fn initialize_user(
        &self,
        request: CreateUserRequest,
    ) -> Result<User, TapCircleError> {
        if let Some(existing_user) = self.users.find_by_telegram_id(&request.telegram_id).await? {
            return Ok(existing_user);
        }

        self.users.create(request).await
    }

    /// Send a friend request from one user to another
    pub async fn send_friend_request(
        &self,
        sender_id: i64,
        receiver_id: i64,
    ) -> Result<Friend, TapCircleError> {
        if sender_id == receiver_id {
            return Err(TapCircleError::InvalidRelationship { user_id: sender_id });
        }

        let request = CreateFriendRequest {
            sender_id,
            receiver_id,
            custom_logs: None,
        };

        self.friends.create(request).await
    }

    /// Get the friend records surrounding a user, in both directions
    pub async fn get_user_friend_records(
        &self,
        user_id: i64,
    ) -> Result<(Vec<Friend>, Vec<Friend>), TapCircleError> {
        let user = self.users.find_by_id(user_id).await?;
        if user.is_none() {
            return Err(TapCircleError::UserNotFound { user_id });
        }

        let sent = self.friends.list_by_sender(user_id).await?;
        let received = self.friends.list_by_receiver(user_id).await?;

        Ok((sent, received))
    }

    /// Get system statistics
    pub async fn get_system_stats(&self) -> Result<serde_json::Value, TapCircleError> {
        let total_users = self.users.count().await?;
        let active_users = self.users.count_active().await?;
        let total_friend_records = self.friends.count().await?;

        let stats = serde_json::json!({
            "total_users": total_users,
            "active_users": active_users,
            "total_friend_records": total_friend_records,
        });

        Ok(stats)
    }
}
