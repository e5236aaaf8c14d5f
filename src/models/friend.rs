//! Friend relationship model
//!
//! A friend record is a directed edge from a sender to a receiver with a
//! three-state lifecycle and referral counters. Status is stored as text and
//! validated at the boundary rather than relying on a database enum type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef};
use sqlx::FromRow;
use std::str::FromStr;

use crate::utils::errors::TapCircleError;

/// Lifecycle status of a friend relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendStatus {
    Pending,
    Active,
    Rejected,
}

impl FriendStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FriendStatus::Pending => "pending",
            FriendStatus::Active => "active",
            FriendStatus::Rejected => "rejected",
        }
    }

    /// Active and rejected records never change status again
    pub fn is_terminal(&self) -> bool {
        matches!(self, FriendStatus::Active | FriendStatus::Rejected)
    }

    /// Valid transitions: pending -> active, pending -> rejected
    pub fn can_transition_to(&self, next: FriendStatus) -> bool {
        matches!(
            (self, next),
            (FriendStatus::Pending, FriendStatus::Active)
                | (FriendStatus::Pending, FriendStatus::Rejected)
        )
    }
}

impl std::fmt::Display for FriendStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FriendStatus {
    type Err = TapCircleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(FriendStatus::Pending),
            "active" => Ok(FriendStatus::Active),
            "rejected" => Ok(FriendStatus::Rejected),
            other => Err(TapCircleError::InvalidInput(format!(
                "Unknown friend status: {}",
                other
            ))),
        }
    }
}

impl sqlx::Type<sqlx::Postgres> for FriendStatus {
    fn type_info() -> PgTypeInfo {
        <&str as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <&str as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for FriendStatus {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for FriendStatus {
    fn decode(value: PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <&str as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
        Ok(raw.parse()?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Friend {
    pub id: i64,
    pub status: FriendStatus,
    pub has_claimed: bool,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub sender_count: i32,
    pub receiver_count: i32,
    pub custom_logs: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFriendRequest {
    pub sender_id: i64,
    pub receiver_id: i64,
    pub custom_logs: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            FriendStatus::Pending,
            FriendStatus::Active,
            FriendStatus::Rejected,
        ] {
            assert_eq!(status.as_str().parse::<FriendStatus>().unwrap(), status);
        }
        assert!("cancelled".parse::<FriendStatus>().is_err());
    }

    #[test]
    fn test_transition_table() {
        assert!(FriendStatus::Pending.can_transition_to(FriendStatus::Active));
        assert!(FriendStatus::Pending.can_transition_to(FriendStatus::Rejected));
        assert!(!FriendStatus::Active.can_transition_to(FriendStatus::Rejected));
        assert!(!FriendStatus::Rejected.can_transition_to(FriendStatus::Active));
        assert!(!FriendStatus::Pending.can_transition_to(FriendStatus::Pending));
    }

    #[test]
    fn test_terminal_states() {
        assert!(!FriendStatus::Pending.is_terminal());
        assert!(FriendStatus::Active.is_terminal());
        assert!(FriendStatus::Rejected.is_terminal());
    }
}
