//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the TapCircle core.

use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "tapcircle.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(())
}

/// Log user actions with structured data
pub fn log_user_action(user_id: i64, action: &str, details: Option<&str>) {
    info!(
        user_id = user_id,
        action = action,
        details = details,
        "User action performed"
    );
}

/// Log friend lifecycle events
pub fn log_friend_event(friend_id: i64, event: &str, sender_id: i64, receiver_id: i64) {
    info!(
        friend_id = friend_id,
        event = event,
        sender_id = sender_id,
        receiver_id = receiver_id,
        "Friend lifecycle event"
    );
}

/// Log a rejected lifecycle transition, including lost-update races
pub fn log_transition_conflict(friend_id: i64, from: &str, to: &str) {
    warn!(
        friend_id = friend_id,
        from = from,
        to = to,
        "Friend status transition rejected"
    );
}

/// Log referral ranking queries
pub fn log_ranking_query(user_id: i64, rank: i64, in_top_10: bool) {
    debug!(
        user_id = user_id,
        rank = rank,
        in_top_10 = in_top_10,
        "Referral ranking computed"
    );
}

/// Log database operations
pub fn log_database_operation(operation: &str, table: &str, duration_ms: u64, success: bool) {
    if success {
        debug!(
            operation = operation,
            table = table,
            duration_ms = duration_ms,
            "Database operation completed"
        );
    } else {
        error!(
            operation = operation,
            table = table,
            duration_ms = duration_ms,
            "Database operation failed"
        );
    }
}
