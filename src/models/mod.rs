//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod friend;
pub mod ranking;
pub mod user;

// Re-export commonly used models
pub use friend::{CreateFriendRequest, Friend, FriendStatus};
pub use ranking::{ReferralAggregate, ReferralRankingEntry, ReferralRankingResponse};
pub use user::{CreateUserRequest, UpdateUserRequest, User, UserDetails};
