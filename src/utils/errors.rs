//! Error handling for TapCircle
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for the TapCircle core
#[derive(Error, Debug)]
pub enum TapCircleError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: i64 },

    #[error("Friend record not found: {friend_id}")]
    FriendNotFound { friend_id: i64 },

    #[error("A user with the same telegram_id or username already exists")]
    DuplicateUser,

    #[error("User {user_id} cannot send a friend request to themselves")]
    InvalidRelationship { user_id: i64 },

    #[error("A non-terminal friend record already links users {sender_id} and {receiver_id}")]
    DuplicateRelationship { sender_id: i64, receiver_id: i64 },

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Reward on friend record {friend_id} cannot be claimed in its current state")]
    InvalidClaimState { friend_id: i64 },

    #[error("Friend record {friend_id} was modified concurrently")]
    ConcurrentModification { friend_id: i64 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for TapCircle operations
pub type Result<T> = std::result::Result<T, TapCircleError>;

impl TapCircleError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            TapCircleError::Database(_) => false,
            TapCircleError::Migration(_) => false,
            TapCircleError::Config(_) => false,
            TapCircleError::UserNotFound { .. } => false,
            TapCircleError::FriendNotFound { .. } => false,
            TapCircleError::DuplicateUser => false,
            TapCircleError::InvalidRelationship { .. } => false,
            TapCircleError::DuplicateRelationship { .. } => false,
            TapCircleError::InvalidTransition { .. } => false,
            TapCircleError::InvalidClaimState { .. } => false,
            // The caller may retry after re-reading the record
            TapCircleError::ConcurrentModification { .. } => true,
            TapCircleError::Serialization(_) => false,
            TapCircleError::Io(_) => true,
            TapCircleError::InvalidInput(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TapCircleError::Database(_) => ErrorSeverity::Critical,
            TapCircleError::Migration(_) => ErrorSeverity::Critical,
            TapCircleError::Config(_) => ErrorSeverity::Critical,
            TapCircleError::ConcurrentModification { .. } => ErrorSeverity::Warning,
            TapCircleError::InvalidInput(_) => ErrorSeverity::Info,
            TapCircleError::InvalidRelationship { .. } => ErrorSeverity::Info,
            TapCircleError::DuplicateRelationship { .. } => ErrorSeverity::Info,
            TapCircleError::InvalidTransition { .. } => ErrorSeverity::Info,
            TapCircleError::InvalidClaimState { .. } => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
