//! Seams between the scheduler and the outside world.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::types::Participant;

/// Outbound notification capability.
///
/// Implementations must never fail loudly: channel errors are handled
/// (and logged) inside `notify`, so the scheduler tick stays clean.
#[async_trait]
pub trait Notify: Send + Sync {
    /// Tell `participant` that `chore_name` is due.
    async fn notify(&self, participant: &Participant, chore_name: &str, due_date: DateTime<Utc>);
}
