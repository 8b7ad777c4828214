//! # ChoreWheel Scheduler
//!
//! One long-lived background task that scans for due, not-yet-notified
//! assignments on a fixed interval and drives the dispatcher.
//!
//! Dedup works by comparing `last_notified_at` against `due_date` rather
//! than a boolean flag: a reminder stamped before the current due date
//! never suppresses a fresh cycle, so `CompleteChore` advancing the due
//! date is the only re-arm step needed.
//!
//! Errors inside a tick are trapped at the tick boundary; the next tick
//! always runs on schedule. On shutdown the task is simply abandoned
//! (worst case one reminder slips to the next process start).

use std::sync::Arc;

use chrono::{DateTime, Utc};

use chorewheel_core::error::Result;
use chorewheel_core::traits::Notify;
use chorewheel_core::types::{CycleState, cycle_state};
use chorewheel_db::ChoreStore;

/// Default scan interval in seconds.
pub const DEFAULT_INTERVAL_SECS: u64 = 60;

/// Periodic due-chore notifier.
pub struct NotificationScheduler {
    store: Arc<ChoreStore>,
    notifier: Arc<dyn Notify>,
    interval_secs: u64,
}

impl NotificationScheduler {
    pub fn new(store: Arc<ChoreStore>, notifier: Arc<dyn Notify>, interval_secs: u64) -> Self {
        Self { store, notifier, interval_secs }
    }

    /// One scan: fetch everything due at `now`, skip assignments already
    /// notified this cycle, notify and stamp the rest. Returns how many
    /// reminders went out.
    pub async fn tick(&self, now: DateTime<Utc>) -> Result<usize> {
        let due = self.store.fetch_due(now)?;
        let mut notified = 0;

        for assignment in due {
            let Some(due_date) = assignment.due_date else {
                tracing::warn!(
                    "⚠️ Skipping chore {} with unparseable due date",
                    assignment.chore_id
                );
                continue;
            };

            if cycle_state(due_date, assignment.last_notified_at, now) == CycleState::DueNotified {
                continue;
            }

            tracing::info!(
                "🔔 Chore '{}' due for {}",
                assignment.chore_name,
                assignment.participant.name
            );
            self.notifier
                .notify(&assignment.participant, &assignment.chore_name, due_date)
                .await;
            self.store.mark_notified(assignment.chore_id, now)?;
            notified += 1;
        }

        Ok(notified)
    }

    /// Run forever on the configured interval. Tick errors are logged
    /// and never terminate the loop.
    pub async fn run(self) {
        tracing::info!("⏰ Notification scheduler started (check every {}s)", self.interval_secs);
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(self.interval_secs));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            if let Err(e) = self.tick(Utc::now()).await {
                tracing::warn!("⚠️ Scheduler tick failed: {e}");
            }
        }
    }

    /// Spawn the loop as a detached background task.
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chorewheel_core::config::{ChoreSeed, ParticipantSeed, SeedConfig};
    use chorewheel_core::types::Participant;
    use chrono::{Duration, TimeZone};
    use std::sync::Mutex;

    /// Captures notify calls instead of sending anything.
    struct MockNotifier {
        calls: Mutex<Vec<(i64, String)>>,
    }

    impl MockNotifier {
        fn new() -> Arc<Self> {
            Arc::new(Self { calls: Mutex::new(Vec::new()) })
        }

        fn calls(&self) -> Vec<(i64, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notify for MockNotifier {
        async fn notify(&self, participant: &Participant, chore_name: &str, _due: DateTime<Utc>) {
            self.calls
                .lock()
                .unwrap()
                .push((participant.id, chore_name.to_string()));
        }
    }

    fn seed() -> SeedConfig {
        SeedConfig {
            participants: vec![
                ParticipantSeed {
                    name: "Alex".into(),
                    email: Some("alex@example.com".into()),
                    phone: None,
                },
                ParticipantSeed { name: "Sam".into(), email: None, phone: None },
            ],
            chores: vec![ChoreSeed { name: "Dishes".into(), frequency_days: 1 }],
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 27, 12, 0, 0).unwrap()
    }

    fn scheduler_with_mock() -> (NotificationScheduler, Arc<ChoreStore>, Arc<MockNotifier>) {
        let store = Arc::new(ChoreStore::open_in_memory().unwrap());
        store.seed(&seed(), t0()).unwrap();
        let notifier = MockNotifier::new();
        let scheduler =
            NotificationScheduler::new(store.clone(), notifier.clone(), DEFAULT_INTERVAL_SECS);
        (scheduler, store, notifier)
    }

    #[tokio::test]
    async fn test_due_chore_notified_exactly_once() {
        let (scheduler, store, notifier) = scheduler_with_mock();

        // First tick: Dishes is due, assigned to Alex (id 1)
        assert_eq!(scheduler.tick(t0()).await.unwrap(), 1);
        assert_eq!(notifier.calls(), vec![(1, "Dishes".to_string())]);

        let assignment = store.get_assignment(1).unwrap().unwrap();
        assert_eq!(assignment.last_notified_at, Some(t0()));

        // Second tick in the same cycle: nothing new
        assert_eq!(scheduler.tick(t0() + Duration::seconds(60)).await.unwrap(), 0);
        assert_eq!(notifier.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_completion_rearms_notification() {
        let (scheduler, store, notifier) = scheduler_with_mock();

        scheduler.tick(t0()).await.unwrap();
        assert_eq!(notifier.calls().len(), 1);

        // Alex completes Dishes; it hands off to Sam, due a day later
        store.complete_chore(1, t0() + Duration::minutes(5)).unwrap();

        // Still within the old cycle window: nothing due
        assert_eq!(scheduler.tick(t0() + Duration::hours(1)).await.unwrap(), 0);

        // Next day: due again, notified again, now to Sam (id 2)
        let next_day = t0() + Duration::days(1) + Duration::minutes(10);
        assert_eq!(scheduler.tick(next_day).await.unwrap(), 1);
        assert_eq!(notifier.calls()[1], (2, "Dishes".to_string()));
    }

    #[tokio::test]
    async fn test_not_due_chore_is_left_alone() {
        let (scheduler, store, notifier) = scheduler_with_mock();
        store.complete_chore(1, t0()).unwrap(); // due moves to t0 + 1d

        assert_eq!(scheduler.tick(t0() + Duration::hours(23)).await.unwrap(), 0);
        assert!(notifier.calls().is_empty());
        let assignment = store.get_assignment(1).unwrap().unwrap();
        assert_eq!(assignment.last_notified_at, None);
    }

    #[tokio::test]
    async fn test_stale_marker_does_not_suppress_new_cycle() {
        let (scheduler, store, notifier) = scheduler_with_mock();

        scheduler.tick(t0()).await.unwrap();
        store.complete_chore(1, t0() + Duration::minutes(1)).unwrap();

        // last_notified_at was cleared by completion; even if it had
        // survived, it would predate the new due date and not count.
        let next_day = t0() + Duration::days(1) + Duration::minutes(2);
        assert_eq!(scheduler.tick(next_day).await.unwrap(), 1);
        assert_eq!(notifier.calls().len(), 2);
    }
}
