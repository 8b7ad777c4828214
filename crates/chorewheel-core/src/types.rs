//! Entity types and view models.
//!
//! View models serialize in camelCase to match the dashboard's wire
//! format. Timestamps are `chrono::DateTime<Utc>` in memory; the store
//! owns the string encoding.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A household member chores rotate between. Created at seed time,
/// immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// A recurring chore definition. `frequency_days` is always > 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chore {
    pub id: i64,
    pub name: String,
    pub frequency_days: i64,
}

/// Current assignment state for one chore (one-to-one, keyed by chore id).
///
/// `due_date` anchors "is this chore outstanding"; `last_notified_at` is
/// compared against it to decide whether a fresh reminder is owed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub chore_id: i64,
    pub assigned_to: i64,
    pub due_date: DateTime<Utc>,
    pub last_completed_at: Option<DateTime<Utc>>,
    pub last_notified_at: Option<DateTime<Utc>>,
}

/// Joined chore + assignment + participant row, annotated with urgency
/// flags computed at read time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoreView {
    pub id: i64,
    pub name: String,
    pub frequency_days: i64,
    pub assigned_to: Participant,
    pub due_date: DateTime<Utc>,
    pub last_completed_at: Option<DateTime<Utc>>,
    pub last_notified_at: Option<DateTime<Utc>>,
    pub is_overdue: bool,
    pub is_due_soon: bool,
}

/// Outcome of completing a chore: who had it, who has it now, and when
/// it comes due again.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResult {
    pub id: i64,
    pub name: String,
    pub frequency_days: i64,
    pub previous_assignee: i64,
    pub assigned_to: i64,
    pub due_date: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

/// Where an assignment sits in its notification cycle. Derived from the
/// two timestamps on every read; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    /// Due date is still in the future.
    NotDue,
    /// Due now, and no reminder has gone out for this cycle yet.
    DueUnnotified,
    /// Due now, reminder already sent for this cycle.
    DueNotified,
}

/// Derive the notification-cycle state of an assignment.
///
/// A reminder stamped before the current due date does not count: once
/// `CompleteChore` advances `due_date` past `last_notified_at`, the
/// cycle re-arms without any explicit reset step.
pub fn cycle_state(
    due_date: DateTime<Utc>,
    last_notified_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> CycleState {
    if due_date > now {
        return CycleState::NotDue;
    }
    match last_notified_at {
        Some(notified) if notified >= due_date => CycleState::DueNotified,
        _ => CycleState::DueUnnotified,
    }
}

/// Window ahead of the due date in which a chore counts as "due soon".
pub const DUE_SOON_WINDOW_HOURS: i64 = 4;

/// `true` iff the chore is past due at `now`.
pub fn is_overdue(due_date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    due_date < now
}

/// `true` iff the chore comes due within the next four hours.
pub fn is_due_soon(due_date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    due_date <= now + Duration::hours(DUE_SOON_WINDOW_HOURS)
}
