//! ChoreWheel error taxonomy.

use thiserror::Error;

/// Result type used throughout ChoreWheel.
pub type Result<T> = std::result::Result<T, ChoreError>;

/// All errors the service can raise.
///
/// Dispatch failures never appear here on purpose: the notification
/// layer degrades silently and reports through logs only.
#[derive(Debug, Error)]
pub enum ChoreError {
    /// Unknown chore id on completion or lookup.
    #[error("Chore {0} not found")]
    NotFound(i64),

    /// Persistence unavailable or a query failed. Fatal to the operation
    /// in progress, never to the process.
    #[error("Store error: {0}")]
    Store(String),

    /// Invalid or unusable configuration value.
    #[error("Config error: {0}")]
    Config(String),

    /// Notification channel setup problem (bad SMTP relay, bad mailbox).
    #[error("Channel error: {0}")]
    Channel(String),
}
