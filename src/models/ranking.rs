//! Referral ranking shapes

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Per-user referral aggregate as read from the store, before ranks are
/// assigned. One row per user, including users with no friend records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ReferralAggregate {
    pub user_id: i64,
    pub telegram_id: String,
    pub username: String,
    pub sender_count: i64,
}

/// One leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralRankingEntry {
    pub rank: i64,
    pub sender_count: i64,
    pub user_id: i64,
    pub telegram_id: String,
    pub username: String,
}

/// Leaderboard slice plus the requesting user's own entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferralRankingResponse {
    pub top_10: Vec<ReferralRankingEntry>,
    pub sender_info: ReferralRankingEntry,
    pub sender_in_top_10: bool,
}
