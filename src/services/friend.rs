//! Friend service implementation
//!
//! Business logic around the friend request lifecycle: sending, accepting,
//! rejecting, and claiming the referral reward. Notification of the other
//! party is delegated to an external collaborator and not handled here.

use tracing::{debug, info};

use crate::database::repositories::FriendRepository;
use crate::models::friend::{CreateFriendRequest, Friend};
use crate::utils::errors::{Result, TapCircleError};
use crate::utils::logging;

/// Friend service for managing the relationship lifecycle
#[derive(Clone)]
pub struct FriendService {
    friend_repository: FriendRepository,
}

impl FriendService {
    /// Create a new FriendService instance
    pub fn new(friend_repository: FriendRepository) -> Self {
        Self { friend_repository }
    }

    /// Send a friend request from sender to receiver
    pub async fn send_request(
        &self,
        sender_id: i64,
        receiver_id: i64,
        custom_logs: Option<serde_json::Value>,
    ) -> Result<Friend> {
        debug!(
            sender_id = sender_id,
            receiver_id = receiver_id,
            "Sending friend request"
        );

        if sender_id == receiver_id {
            return Err(TapCircleError::InvalidRelationship { user_id: sender_id });
        }

        let friend = self
            .friend_repository
            .create(CreateFriendRequest {
                sender_id,
                receiver_id,
                custom_logs,
            })
            .await?;

        logging::log_friend_event(friend.id, "request_sent", sender_id, receiver_id);
        Ok(friend)
    }

    /// Accept a pending friend request
    pub async fn accept(&self, friend_id: i64) -> Result<Friend> {
        debug!(friend_id = friend_id, "Accepting friend request");

        let friend = self.friend_repository.accept(friend_id).await.map_err(|err| {
            if let TapCircleError::InvalidTransition { ref from, ref to } = err {
                logging::log_transition_conflict(friend_id, from, to);
            }
            err
        })?;

        logging::log_friend_event(
            friend.id,
            "request_accepted",
            friend.sender_id,
            friend.receiver_id,
        );
        Ok(friend)
    }

    /// Reject a pending friend request
    pub async fn reject(&self, friend_id: i64) -> Result<Friend> {
        debug!(friend_id = friend_id, "Rejecting friend request");

        let friend = self.friend_repository.reject(friend_id).await.map_err(|err| {
            if let TapCircleError::InvalidTransition { ref from, ref to } = err {
                logging::log_transition_conflict(friend_id, from, to);
            }
            err
        })?;

        logging::log_friend_event(
            friend.id,
            "request_rejected",
            friend.sender_id,
            friend.receiver_id,
        );
        Ok(friend)
    }

    /// Claim the referral reward on an accepted relationship, at most once
    pub async fn claim_reward(&self, friend_id: i64) -> Result<Friend> {
        debug!(friend_id = friend_id, "Claiming referral reward");

        let friend = self.friend_repository.claim_reward(friend_id).await?;
        info!(
            friend_id = friend.id,
            sender_id = friend.sender_id,
            "Referral reward claimed"
        );

        Ok(friend)
    }

    /// Get a friend record by ID
    pub async fn get_friend(&self, friend_id: i64) -> Result<Friend> {
        self.friend_repository
            .find_by_id(friend_id)
            .await?
            .ok_or(TapCircleError::FriendNotFound { friend_id })
    }

    /// List requests the user has sent
    pub async fn list_sent(&self, user_id: i64) -> Result<Vec<Friend>> {
        self.friend_repository.list_by_sender(user_id).await
    }

    /// List requests the user has received
    pub async fn list_received(&self, user_id: i64) -> Result<Vec<Friend>> {
        self.friend_repository.list_by_receiver(user_id).await
    }
}
