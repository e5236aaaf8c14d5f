//! Services module
//!
//! This module contains business logic services

pub mod friend;
pub mod ranking;
pub mod user;

// Re-export commonly used services
pub use friend::FriendService;
pub use ranking::RankingService;
pub use user::UserService;

use crate::config::settings::Settings;
use crate::database::repositories::{FriendRepository, UserRepository};
use crate::database::DatabasePool;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub user_service: UserService,
    pub friend_service: FriendService,
    pub ranking_service: RankingService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(settings: Settings, pool: DatabasePool) -> Self {
        let user_repository = UserRepository::new(pool.clone());
        let friend_repository = FriendRepository::new(pool);

        let user_service = UserService::new(user_repository.clone());
        let friend_service = FriendService::new(friend_repository.clone());
        let ranking_service = RankingService::new(friend_repository, user_repository, settings);

        Self {
            user_service,
            friend_service,
            ranking_service,
        }
    }
}
