//! Integration tests for the friend request lifecycle

mod helpers;

use assert_matches::assert_matches;
use serial_test::serial;

use helpers::database_helper::TestDatabase;
use helpers::test_data::{seed_accepted_friend, seed_user};
use tapcircle::models::friend::FriendStatus;
use tapcircle::services::ServiceFactory;
use tapcircle::{Settings, TapCircleError};

#[tokio::test]
#[serial]
async fn test_send_and_accept_flow() -> anyhow::Result<()> {
    let db = TestDatabase::new().await?;
    db.truncate_all().await?;
    let services = ServiceFactory::new(Settings::default(), db.pool.clone());

    let alice = seed_user(&db.pool, 1).await;
    let bob = seed_user(&db.pool, 2).await;

    let pending = services
        .friend_service
        .send_request(alice.id, bob.id, None)
        .await?;

    assert_eq!(pending.status, FriendStatus::Pending);
    assert_eq!(pending.sender_count, 0);
    assert_eq!(pending.receiver_count, 0);
    assert!(!pending.has_claimed);
    assert_eq!(pending.sender_id, alice.id);
    assert_eq!(pending.receiver_id, bob.id);

    let active = services.friend_service.accept(pending.id).await?;

    assert_eq!(active.status, FriendStatus::Active);
    assert_eq!(active.sender_count, 1);
    assert_eq!(active.receiver_count, 0);
    assert!(active.updated_at > active.created_at);

    Ok(())
}

#[tokio::test]
#[serial]
async fn test_self_request_is_rejected() -> anyhow::Result<()> {
    let db = TestDatabase::new().await?;
    db.truncate_all().await?;
    let services = ServiceFactory::new(Settings::default(), db.pool.clone());

    let alice = seed_user(&db.pool, 1).await;

    let result = services
        .friend_service
        .send_request(alice.id, alice.id, None)
        .await;

    assert_matches!(result, Err(TapCircleError::InvalidRelationship { user_id }) if user_id == alice.id);

    Ok(())
}

#[tokio::test]
#[serial]
async fn test_duplicate_non_terminal_pair_is_rejected() -> anyhow::Result<()> {
    let db = TestDatabase::new().await?;
    db.truncate_all().await?;
    let services = ServiceFactory::new(Settings::default(), db.pool.clone());

    let alice = seed_user(&db.pool, 1).await;
    let bob = seed_user(&db.pool, 2).await;

    services
        .friend_service
        .send_request(alice.id, bob.id, None)
        .await?;

    // Same direction
    let same = services
        .friend_service
        .send_request(alice.id, bob.id, None)
        .await;
    assert_matches!(same, Err(TapCircleError::DuplicateRelationship { .. }));

    // Reverse direction still links the same unordered pair
    let reverse = services
        .friend_service
        .send_request(bob.id, alice.id, None)
        .await;
    assert_matches!(reverse, Err(TapCircleError::DuplicateRelationship { .. }));

    Ok(())
}

#[tokio::test]
#[serial]
async fn test_pair_can_reconnect_after_rejection() -> anyhow::Result<()> {
    let db = TestDatabase::new().await?;
    db.truncate_all().await?;
    let services = ServiceFactory::new(Settings::default(), db.pool.clone());

    let alice = seed_user(&db.pool, 1).await;
    let bob = seed_user(&db.pool, 2).await;

    let first = services
        .friend_service
        .send_request(alice.id, bob.id, None)
        .await?;
    services.friend_service.reject(first.id).await?;

    // Rejected records are terminal but do not block a new request
    let second = services
        .friend_service
        .send_request(bob.id, alice.id, None)
        .await?;
    assert_eq!(second.status, FriendStatus::Pending);

    // The rejected record is retained for history
    let rejected = services.friend_service.get_friend(first.id).await?;
    assert_eq!(rejected.status, FriendStatus::Rejected);

    Ok(())
}

#[tokio::test]
#[serial]
async fn test_terminal_records_never_transition_again() -> anyhow::Result<()> {
    let db = TestDatabase::new().await?;
    db.truncate_all().await?;
    let services = ServiceFactory::new(Settings::default(), db.pool.clone());

    let alice = seed_user(&db.pool, 1).await;
    let bob = seed_user(&db.pool, 2).await;
    let carol = seed_user(&db.pool, 3).await;

    let active = seed_accepted_friend(&db.pool, alice.id, bob.id).await;

    let again = services.friend_service.accept(active.id).await;
    assert_matches!(again, Err(TapCircleError::InvalidTransition { ref from, ref to })
        if from == "active" && to == "active");

    let reject_active = services.friend_service.reject(active.id).await;
    assert_matches!(reject_active, Err(TapCircleError::InvalidTransition { ref from, ref to })
        if from == "active" && to == "rejected");

    let pending = services
        .friend_service
        .send_request(alice.id, carol.id, None)
        .await?;
    let rejected = services.friend_service.reject(pending.id).await?;
    assert_eq!(rejected.status, FriendStatus::Rejected);

    let accept_rejected = services.friend_service.accept(rejected.id).await;
    assert_matches!(accept_rejected, Err(TapCircleError::InvalidTransition { ref from, .. })
        if from == "rejected");

    Ok(())
}

#[tokio::test]
#[serial]
async fn test_claim_reward_happens_at_most_once() -> anyhow::Result<()> {
    let db = TestDatabase::new().await?;
    db.truncate_all().await?;
    let services = ServiceFactory::new(Settings::default(), db.pool.clone());

    let alice = seed_user(&db.pool, 1).await;
    let bob = seed_user(&db.pool, 2).await;
    let carol = seed_user(&db.pool, 3).await;

    let active = seed_accepted_friend(&db.pool, alice.id, bob.id).await;

    let claimed = services.friend_service.claim_reward(active.id).await?;
    assert!(claimed.has_claimed);
    assert_eq!(claimed.status, FriendStatus::Active);

    let second_claim = services.friend_service.claim_reward(active.id).await;
    assert_matches!(
        second_claim,
        Err(TapCircleError::InvalidClaimState { friend_id }) if friend_id == active.id
    );

    // Claiming on a pending record is out of order
    let pending = services
        .friend_service
        .send_request(alice.id, carol.id, None)
        .await?;
    let early_claim = services.friend_service.claim_reward(pending.id).await;
    assert_matches!(early_claim, Err(TapCircleError::InvalidClaimState { .. }));

    let missing = services.friend_service.claim_reward(999_999).await;
    assert_matches!(missing, Err(TapCircleError::FriendNotFound { .. }));

    Ok(())
}

#[tokio::test]
#[serial]
async fn test_unknown_friend_id_fails() -> anyhow::Result<()> {
    let db = TestDatabase::new().await?;
    db.truncate_all().await?;
    let services = ServiceFactory::new(Settings::default(), db.pool.clone());

    let accept = services.friend_service.accept(424_242).await;
    assert_matches!(accept, Err(TapCircleError::FriendNotFound { friend_id }) if friend_id == 424_242);

    let reject = services.friend_service.reject(424_242).await;
    assert_matches!(reject, Err(TapCircleError::FriendNotFound { .. }));

    Ok(())
}

#[tokio::test]
#[serial]
async fn test_concurrent_accepts_commit_exactly_once() -> anyhow::Result<()> {
    let db = TestDatabase::new().await?;
    db.truncate_all().await?;
    let services = ServiceFactory::new(Settings::default(), db.pool.clone());

    let alice = seed_user(&db.pool, 1).await;
    let bob = seed_user(&db.pool, 2).await;

    let pending = services
        .friend_service
        .send_request(alice.id, bob.id, None)
        .await?;

    let (first, second) = tokio::join!(
        services.friend_service.accept(pending.id),
        services.friend_service.accept(pending.id),
    );

    let successes = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one concurrent accept must commit");

    let loser = if first.is_ok() { second } else { first };
    assert_matches!(
        loser,
        Err(TapCircleError::InvalidTransition { .. })
            | Err(TapCircleError::ConcurrentModification { .. })
    );

    // The winner incremented the sender counter exactly once
    let settled = services.friend_service.get_friend(pending.id).await?;
    assert_eq!(settled.status, FriendStatus::Active);
    assert_eq!(settled.sender_count, 1);

    Ok(())
}

#[tokio::test]
#[serial]
async fn test_directional_listings() -> anyhow::Result<()> {
    let db = TestDatabase::new().await?;
    db.truncate_all().await?;
    let services = ServiceFactory::new(Settings::default(), db.pool.clone());

    let alice = seed_user(&db.pool, 1).await;
    let bob = seed_user(&db.pool, 2).await;
    let carol = seed_user(&db.pool, 3).await;

    services
        .friend_service
        .send_request(alice.id, bob.id, None)
        .await?;
    services
        .friend_service
        .send_request(carol.id, alice.id, None)
        .await?;

    let sent = services.friend_service.list_sent(alice.id).await?;
    let received = services.friend_service.list_received(alice.id).await?;

    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].receiver_id, bob.id);
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].sender_id, carol.id);

    Ok(())
}
