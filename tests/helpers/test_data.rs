//! Test data builders
//!
//! Helper functions for seeding users and friend records in tests.

use fake::faker::address::en::{CountryCode, CityName};
use fake::Fake;
use sqlx::PgPool;

use tapcircle::models::friend::Friend;
use tapcircle::models::user::{CreateUserRequest, User};
use tapcircle::services::{FriendService, UserService};

/// Build a create request with a distinct telegram identity and username
pub fn create_user_request(seed: u32) -> CreateUserRequest {
    CreateUserRequest {
        telegram_id: format!("9000{}", seed),
        username: format!("player_{}", seed),
        chat_id: format!("9000{}", seed),
        wallet_address: None,
        start_param: None,
        premium: false,
        location: CityName().fake(),
        nationality: CountryCode().fake(),
        age: Some(20 + (seed % 30) as i32),
        gender: None,
        email: Some(format!("player{}@example.com", seed)),
    }
}

/// Seed a user through the service layer
pub async fn seed_user(pool: &PgPool, seed: u32) -> User {
    let service = UserService::new(tapcircle::database::UserRepository::new(pool.clone()));
    service
        .register_or_get_user(create_user_request(seed))
        .await
        .expect("failed to seed user")
}

/// Seed an accepted friend relationship from sender to receiver
pub async fn seed_accepted_friend(pool: &PgPool, sender_id: i64, receiver_id: i64) -> Friend {
    let service = FriendService::new(tapcircle::database::FriendRepository::new(pool.clone()));
    let pending = service
        .send_request(sender_id, receiver_id, None)
        .await
        .expect("failed to send friend request");

    service
        .accept(pending.id)
        .await
        .expect("failed to accept friend request")
}
