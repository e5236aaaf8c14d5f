//! User model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub telegram_id: String,
    pub username: String,
    pub chat_id: String,
    pub wallet_address: Option<String>,
    pub start_param: Option<String>,
    pub token_balance: i64,
    pub active: bool,
    pub premium: bool,
    pub admin: bool,
    pub location: String,
    pub nationality: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub email: Option<String>,
    pub skin: Vec<String>,
    pub in_game_items: Option<serde_json::Value>,
    pub custom_logs: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub telegram_id: String,
    pub username: String,
    pub chat_id: String,
    pub wallet_address: Option<String>,
    pub start_param: Option<String>,
    pub premium: bool,
    pub location: String,
    pub nationality: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub token_balance: Option<i64>,
    pub active: Option<bool>,
    pub premium: Option<bool>,
    pub location: Option<String>,
    pub age: Option<i32>,
    pub email: Option<String>,
    pub skin: Option<Vec<String>>,
    pub in_game_items: Option<serde_json::Value>,
    pub custom_logs: Option<serde_json::Value>,
}

/// Telegram-facing identity slice of a user profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserTelegramInfo {
    pub username: String,
    pub telegram_id: String,
    pub token_balance: i64,
    pub premium: bool,
    pub wallet_address: Option<String>,
    pub chat_id: String,
    pub start_param: Option<String>,
}

/// Personal information slice of a user profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPersonalInfo {
    pub location: String,
    pub nationality: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub email: Option<String>,
}

/// Application state slice of a user profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAppInfo {
    pub active: bool,
    pub admin: bool,
    pub skin: Vec<String>,
    pub in_game_items: Option<serde_json::Value>,
    pub custom_logs: Option<serde_json::Value>,
}

/// Grouped response shape consumed by the API layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDetails {
    pub id: i64,
    pub telegram_info: UserTelegramInfo,
    pub personal_info: UserPersonalInfo,
    pub app_info: UserAppInfo,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDetails {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            telegram_info: UserTelegramInfo {
                username: user.username,
                telegram_id: user.telegram_id,
                token_balance: user.token_balance,
                premium: user.premium,
                wallet_address: user.wallet_address,
                chat_id: user.chat_id,
                start_param: user.start_param,
            },
            personal_info: UserPersonalInfo {
                location: user.location,
                nationality: user.nationality,
                age: user.age,
                gender: user.gender,
                email: user.email,
            },
            app_info: UserAppInfo {
                active: user.active,
                admin: user.admin,
                skin: user.skin,
                in_game_items: user.in_game_items,
                custom_logs: user.custom_logs,
            },
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 1,
            telegram_id: "100200300".to_string(),
            username: "player_one".to_string(),
            chat_id: "100200300".to_string(),
            wallet_address: None,
            start_param: Some("ref_42".to_string()),
            token_balance: 250,
            active: true,
            premium: false,
            admin: false,
            location: "Lisbon".to_string(),
            nationality: "PT".to_string(),
            age: Some(27),
            gender: None,
            email: Some("player@example.com".to_string()),
            skin: vec!["default".to_string()],
            in_game_items: None,
            custom_logs: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_user_details_grouping() {
        let details = UserDetails::from(sample_user());
        assert_eq!(details.telegram_info.telegram_id, "100200300");
        assert_eq!(details.personal_info.location, "Lisbon");
        assert!(details.app_info.active);
        assert_eq!(details.app_info.skin, vec!["default".to_string()]);
    }
}
