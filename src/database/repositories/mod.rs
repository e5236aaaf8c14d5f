//! Repository implementations for database operations

pub mod friend;
pub mod user;

pub use friend::FriendRepository;
pub use user::UserRepository;
