//! TapCircle core
//!
//! Persistence core for a Telegram-facing social/gaming backend: user
//! profiles, directed friend relationships with a request lifecycle,
//! referral counters, and a referral leaderboard. The HTTP layer consumes
//! these services and translates the typed errors into response codes.

pub mod config;
pub mod database;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{Result, TapCircleError};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use services::ServiceFactory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
