//! Rotation engine: who takes the chore next, and when it comes due.
//!
//! Pure functions, no I/O. The store calls these inside its completion
//! transaction; tests call them directly.

use chrono::{DateTime, Duration, Utc};

/// Pick the next responsible participant.
///
/// Strict two-way alternation: with two participants the other one is
/// returned. With fewer than two the current assignee keeps the chore
/// (no-op rotation).
pub fn next_assignee(current: i64, participant_ids: &[i64]) -> i64 {
    if participant_ids.len() < 2 {
        return current;
    }
    if current == participant_ids[0] {
        participant_ids[1]
    } else {
        participant_ids[0]
    }
}

/// Next due date: `now + frequency_days` calendar days, in UTC.
/// Not truncated to midnight.
pub fn next_due(now: DateTime<Utc>, frequency_days: i64) -> DateTime<Utc> {
    now + Duration::days(frequency_days)
}

/// Full handoff computation for a completion event.
pub fn compute_handoff(
    current: i64,
    participant_ids: &[i64],
    frequency_days: i64,
    now: DateTime<Utc>,
) -> (i64, DateTime<Utc>) {
    (
        next_assignee(current, participant_ids),
        next_due(now, frequency_days),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_alternates_between_two() {
        let ids = [1, 2];
        assert_eq!(next_assignee(1, &ids), 2);
        assert_eq!(next_assignee(2, &ids), 1);
    }

    #[test]
    fn test_repeated_handoffs_never_repeat_assignee() {
        let ids = [7, 11];
        let mut current = 7;
        let mut previous = None;
        for _ in 0..10 {
            let next = next_assignee(current, &ids);
            assert_ne!(next, current);
            if let Some(prev) = previous {
                // Strict alternation: always back to the one before
                assert_eq!(next, prev);
            }
            previous = Some(current);
            current = next;
        }
    }

    #[test]
    fn test_single_participant_is_noop() {
        assert_eq!(next_assignee(3, &[3]), 3);
        assert_eq!(next_assignee(3, &[]), 3);
    }

    #[test]
    fn test_next_due_adds_whole_days() {
        let now = Utc.with_ymd_and_hms(2026, 8, 27, 15, 30, 0).unwrap();
        let due = next_due(now, 3);
        assert_eq!(due - now, Duration::days(3));
        // Calendar arithmetic keeps the time of day
        assert_eq!(due, Utc.with_ymd_and_hms(2026, 8, 30, 15, 30, 0).unwrap());
    }

    #[test]
    fn test_compute_handoff() {
        let now = Utc.with_ymd_and_hms(2026, 8, 27, 8, 0, 0).unwrap();
        let (next, due) = compute_handoff(1, &[1, 2], 1, now);
        assert_eq!(next, 2);
        assert_eq!(due, now + Duration::days(1));
    }
}
