//! Referral ranking service
//!
//! Aggregates referral counts per sender across all friend records and
//! produces a leaderboard slice plus the rank of one requested user, even
//! when that user is outside the slice.

use tracing::debug;

use crate::config::settings::Settings;
use crate::database::repositories::{FriendRepository, UserRepository};
use crate::models::ranking::{ReferralAggregate, ReferralRankingEntry, ReferralRankingResponse};
use crate::utils::errors::{Result, TapCircleError};
use crate::utils::logging;

/// Ranking service for the referral leaderboard
#[derive(Clone)]
pub struct RankingService {
    friend_repository: FriendRepository,
    user_repository: UserRepository,
    settings: Settings,
}

impl RankingService {
    /// Create a new RankingService instance
    pub fn new(
        friend_repository: FriendRepository,
        user_repository: UserRepository,
        settings: Settings,
    ) -> Self {
        Self {
            friend_repository,
            user_repository,
            settings,
        }
    }

    /// Compute the leaderboard slice and the requested user's own rank entry
    ///
    /// A user with no friend records still gets a rank entry with a zero
    /// count. Fails with UserNotFound when the user id has no user row.
    pub async fn top10_and_rank(&self, user_id: i64) -> Result<ReferralRankingResponse> {
        debug!(user_id = user_id, "Computing referral ranking");

        let (user, aggregates) = futures::try_join!(
            self.user_repository.find_by_id(user_id),
            self.friend_repository.referral_aggregates(),
        )?;

        if user.is_none() {
            return Err(TapCircleError::UserNotFound { user_id });
        }

        let entries = rank_aggregates(aggregates);
        let leaderboard_size = self.settings.referral.leaderboard_size;

        let sender_info = entries
            .iter()
            .find(|entry| entry.user_id == user_id)
            .cloned()
            .ok_or(TapCircleError::UserNotFound { user_id })?;

        let top_10: Vec<ReferralRankingEntry> =
            entries.into_iter().take(leaderboard_size).collect();
        let sender_in_top_10 = sender_info.rank <= leaderboard_size as i64;

        logging::log_ranking_query(user_id, sender_info.rank, sender_in_top_10);

        Ok(ReferralRankingResponse {
            top_10,
            sender_info,
            sender_in_top_10,
        })
    }
}

/// Assign 1-based ranks over unsorted per-user aggregates
///
/// Ordering is referral count descending with ascending user id as the
/// tie-break, which makes the result deterministic and independent of the
/// order in which the rows were scanned.
pub fn rank_aggregates(mut aggregates: Vec<ReferralAggregate>) -> Vec<ReferralRankingEntry> {
    aggregates.sort_by(|a, b| {
        b.sender_count
            .cmp(&a.sender_count)
            .then(a.user_id.cmp(&b.user_id))
    });

    aggregates
        .into_iter()
        .enumerate()
        .map(|(index, row)| ReferralRankingEntry {
            rank: index as i64 + 1,
            sender_count: row.sender_count,
            user_id: row.user_id,
            telegram_id: row.telegram_id,
            username: row.username,
        })
        .collect()
}
