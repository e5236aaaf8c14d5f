//! User service implementation
//!
//! This service handles user registration on first telegram-authenticated
//! contact, profile management, token balance adjustments, and soft
//! deactivation. Users are never hard-deleted.

use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::database::repositories::UserRepository;
use crate::models::user::{CreateUserRequest, UpdateUserRequest, User, UserDetails};
use crate::utils::errors::{Result, TapCircleError};
use crate::utils::helpers;

/// User service for managing user operations
#[derive(Clone)]
pub struct UserService {
    user_repository: UserRepository,
}

impl UserService {
    /// Create a new UserService instance
    pub fn new(user_repository: UserRepository) -> Self {
        Self { user_repository }
    }

    /// Register a new user or get the existing one, idempotent on telegram_id
    pub async fn register_or_get_user(&self, request: CreateUserRequest) -> Result<User> {
        debug!(telegram_id = %request.telegram_id, "Attempting to register or get user");

        if let Some(existing_user) = self
            .user_repository
            .find_by_telegram_id(&request.telegram_id)
            .await?
        {
            info!(
                user_id = existing_user.id,
                telegram_id = %request.telegram_id,
                "User already exists, returning existing user"
            );
            return Ok(existing_user);
        }

        if let Some(ref email) = request.email {
            if !helpers::is_valid_email(email) {
                return Err(TapCircleError::InvalidInput(format!(
                    "Invalid email address: {}",
                    email
                )));
            }
        }

        let telegram_id = request.telegram_id.clone();
        let user = self.user_repository.create(request).await?;
        info!(user_id = user.id, telegram_id = %telegram_id, "New user registered successfully");

        Ok(user)
    }

    /// Get user by ID
    pub async fn get_user_by_id(&self, user_id: i64) -> Result<Option<User>> {
        debug!(user_id = user_id, "Getting user by ID");
        self.user_repository.find_by_id(user_id).await
    }

    /// Get user by Telegram ID
    pub async fn get_user_by_telegram_id(&self, telegram_id: &str) -> Result<Option<User>> {
        debug!(telegram_id = %telegram_id, "Getting user by Telegram ID");
        self.user_repository.find_by_telegram_id(telegram_id).await
    }

    /// Get the grouped profile shape consumed by the API layer
    pub async fn get_user_details(&self, user_id: i64) -> Result<UserDetails> {
        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(TapCircleError::UserNotFound { user_id })?;

        Ok(UserDetails::from(user))
    }

    /// Update user profile with a partial payload
    pub async fn update_profile(
        &self,
        user_id: i64,
        update_request: UpdateUserRequest,
    ) -> Result<User> {
        debug!(user_id = user_id, "Updating user profile");

        if let Some(balance) = update_request.token_balance {
            if balance < 0 {
                return Err(TapCircleError::InvalidInput(
                    "Token balance cannot be negative".to_string(),
                ));
            }
        }

        if let Some(ref email) = update_request.email {
            if !helpers::is_valid_email(email) {
                return Err(TapCircleError::InvalidInput(format!(
                    "Invalid email address: {}",
                    email
                )));
            }
        }

        let user = self.user_repository.update(user_id, update_request).await?;
        info!(user_id = user_id, "User profile updated successfully");

        Ok(user)
    }

    /// Adjust a user's token balance by a signed delta
    pub async fn adjust_token_balance(&self, user_id: i64, delta: i64) -> Result<User> {
        debug!(user_id = user_id, delta = delta, "Adjusting token balance");
        let user = self.user_repository.adjust_token_balance(user_id, delta).await?;
        info!(
            user_id = user_id,
            token_balance = user.token_balance,
            "Token balance adjusted"
        );

        Ok(user)
    }

    /// Soft-deactivate a user
    pub async fn deactivate_user(&self, user_id: i64) -> Result<User> {
        let user = self.user_repository.set_active(user_id, false).await?;
        warn!(user_id = user_id, "User deactivated");

        Ok(user)
    }

    /// Reactivate a previously deactivated user
    pub async fn reactivate_user(&self, user_id: i64) -> Result<User> {
        let user = self.user_repository.set_active(user_id, true).await?;
        info!(user_id = user_id, "User reactivated");

        Ok(user)
    }

    /// List users with page-based pagination
    pub async fn list_users(&self, page: usize, page_size: usize) -> Result<Vec<User>> {
        debug!(page = page, page_size = page_size, "Listing users");

        if page_size > 100 {
            return Err(TapCircleError::InvalidInput(
                "Page size cannot exceed 100".to_string(),
            ));
        }

        let offset = helpers::calculate_offset(page, page_size);
        self.user_repository
            .list(page_size as i64, offset as i64)
            .await
    }

    /// Get user statistics
    pub async fn get_user_statistics(&self) -> Result<HashMap<String, i64>> {
        debug!("Getting user statistics");

        let total_users = self.user_repository.count().await?;
        let active_users = self.user_repository.count_active().await?;

        let mut stats = HashMap::new();
        stats.insert("total_users".to_string(), total_users);
        stats.insert("active_users".to_string(), active_users);
        stats.insert("inactive_users".to_string(), total_users - active_users);

        Ok(stats)
    }
}
