//! SQLite store for ChoreWheel.
//!
//! Three tables: participants, chores, assignments (keyed by chore id).
//! All mutations run in their own transaction behind a `Mutex<Connection>`,
//! so a completion racing a scheduler tick never interleaves partial
//! writes, and a read-modify-write completion cannot lose an update.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings (microsecond
//! precision, `Z` suffix) so the SQL `due_date <= ?` comparison orders
//! chronologically.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};

use chorewheel_core::config::SeedConfig;
use chorewheel_core::error::{ChoreError, Result};
use chorewheel_core::types::{
    Assignment, ChoreView, CompletionResult, Participant, is_due_soon, is_overdue,
};
use chorewheel_core::rotation;

/// A due assignment joined with its chore and participant, as consumed
/// by the notification scheduler. `due_date` is `None` when the stored
/// value failed to parse; the scheduler skips such rows.
#[derive(Debug, Clone)]
pub struct DueAssignment {
    pub chore_id: i64,
    pub chore_name: String,
    pub due_date: Option<DateTime<Utc>>,
    pub last_notified_at: Option<DateTime<Utc>>,
    pub participant: Participant,
}

/// ChoreWheel persistent store.
pub struct ChoreStore {
    conn: Mutex<Connection>,
}

fn fmt_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_ts(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn store_err(e: impl std::fmt::Display) -> ChoreError {
    ChoreError::Store(e.to_string())
}

impl ChoreStore {
    /// Open or create the store at `path` and run migrations.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(store_err)?;
        }
        let conn = Connection::open(path).map_err(store_err)?;
        // WAL for concurrent reads while the scheduler writes
        conn.execute_batch("PRAGMA journal_mode=WAL;").ok();
        let store = Self { conn: Mutex::new(conn) };
        store.migrate()?;
        Ok(store)
    }

    /// In-memory store, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(store_err)?;
        let store = Self { conn: Mutex::new(conn) };
        store.migrate()?;
        Ok(store)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| store_err(format!("Lock: {e}")))
    }

    fn migrate(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS participants (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT,
                phone TEXT
            );

            CREATE TABLE IF NOT EXISTS chores (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                frequency_days INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS assignments (
                chore_id INTEGER PRIMARY KEY,
                assigned_to INTEGER NOT NULL,
                due_date TEXT NOT NULL,
                last_completed_at TEXT,
                last_notified_at TEXT,
                FOREIGN KEY(chore_id) REFERENCES chores(id),
                FOREIGN KEY(assigned_to) REFERENCES participants(id)
            );",
        )
        .map_err(store_err)?;
        Ok(())
    }

    /// Seed participants, chores, and assignments when missing.
    ///
    /// Participants and chores insert only into empty tables; each chore
    /// without an assignment gets one, assigned round-robin over the
    /// participants in chore-creation order, due at `now`. Idempotent.
    pub fn seed(&self, seed: &SeedConfig, now: DateTime<Utc>) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(store_err)?;

        let participant_count: i64 = tx
            .query_row("SELECT COUNT(*) FROM participants", [], |r| r.get(0))
            .map_err(store_err)?;
        if participant_count == 0 {
            for p in &seed.participants {
                tx.execute(
                    "INSERT INTO participants (name, email, phone) VALUES (?1, ?2, ?3)",
                    params![p.name, p.email, p.phone],
                )
                .map_err(store_err)?;
            }
            tracing::info!("🌱 Seeded {} participants", seed.participants.len());
        }

        let chore_count: i64 = tx
            .query_row("SELECT COUNT(*) FROM chores", [], |r| r.get(0))
            .map_err(store_err)?;
        if chore_count == 0 {
            for c in &seed.chores {
                tx.execute(
                    "INSERT INTO chores (name, frequency_days) VALUES (?1, ?2)",
                    params![c.name, c.frequency_days],
                )
                .map_err(store_err)?;
            }
            tracing::info!("🌱 Seeded {} chores", seed.chores.len());
        }

        let participant_ids: Vec<i64> = {
            let mut stmt = tx
                .prepare("SELECT id FROM participants ORDER BY id")
                .map_err(store_err)?;
            let rows = stmt
                .query_map([], |r| r.get(0))
                .map_err(store_err)?
                .collect::<std::result::Result<_, _>>()
                .map_err(store_err)?;
            rows
        };

        let chore_ids: Vec<i64> = {
            let mut stmt = tx
                .prepare("SELECT id FROM chores ORDER BY id")
                .map_err(store_err)?;
            let rows = stmt
                .query_map([], |r| r.get(0))
                .map_err(store_err)?
                .collect::<std::result::Result<_, _>>()
                .map_err(store_err)?;
            rows
        };

        if !participant_ids.is_empty() {
            let now_ts = fmt_ts(now);
            for (index, chore_id) in chore_ids.iter().enumerate() {
                let exists: Option<i64> = tx
                    .query_row(
                        "SELECT 1 FROM assignments WHERE chore_id = ?1",
                        params![chore_id],
                        |r| r.get(0),
                    )
                    .optional()
                    .map_err(store_err)?;
                if exists.is_none() {
                    let assigned_to = participant_ids[index % participant_ids.len()];
                    tx.execute(
                        "INSERT INTO assignments (chore_id, assigned_to, due_date) \
                         VALUES (?1, ?2, ?3)",
                        params![chore_id, assigned_to, now_ts],
                    )
                    .map_err(store_err)?;
                }
            }
        }

        tx.commit().map_err(store_err)
    }

    /// Joined view of every chore with its assignment and assignee,
    /// ordered by chore id, with urgency flags computed at `now`.
    pub fn list_chores(&self, now: DateTime<Utc>) -> Result<Vec<ChoreView>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT c.id, c.name, c.frequency_days,
                        a.due_date, a.last_completed_at, a.last_notified_at,
                        p.id, p.name, p.email, p.phone
                 FROM chores c
                 JOIN assignments a ON a.chore_id = c.id
                 JOIN participants p ON p.id = a.assigned_to
                 ORDER BY c.id",
            )
            .map_err(store_err)?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, Option<String>>(5)?,
                    Participant {
                        id: row.get(6)?,
                        name: row.get(7)?,
                        email: row.get(8)?,
                        phone: row.get(9)?,
                    },
                ))
            })
            .map_err(store_err)?;

        let mut chores = Vec::new();
        for row in rows {
            let (id, name, frequency_days, due_raw, completed_raw, notified_raw, participant) =
                row.map_err(store_err)?;
            let due_date = parse_ts(&due_raw)
                .ok_or_else(|| store_err(format!("Unparseable due_date for chore {id}")))?;
            chores.push(ChoreView {
                id,
                name,
                frequency_days,
                assigned_to: participant,
                due_date,
                last_completed_at: completed_raw.as_deref().and_then(parse_ts),
                last_notified_at: notified_raw.as_deref().and_then(parse_ts),
                is_overdue: is_overdue(due_date, now),
                is_due_soon: is_due_soon(due_date, now),
            });
        }
        Ok(chores)
    }

    /// Current assignment for a chore, or `None` for an unknown id.
    pub fn get_assignment(&self, chore_id: i64) -> Result<Option<Assignment>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT chore_id, assigned_to, due_date, last_completed_at, last_notified_at
                 FROM assignments WHERE chore_id = ?1",
                params![chore_id],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, Option<String>>(3)?,
                        row.get::<_, Option<String>>(4)?,
                    ))
                },
            )
            .optional()
            .map_err(store_err)?;

        match row {
            None => Ok(None),
            Some((chore_id, assigned_to, due_raw, completed_raw, notified_raw)) => {
                let due_date = parse_ts(&due_raw).ok_or_else(|| {
                    store_err(format!("Unparseable due_date for chore {chore_id}"))
                })?;
                Ok(Some(Assignment {
                    chore_id,
                    assigned_to,
                    due_date,
                    last_completed_at: completed_raw.as_deref().and_then(parse_ts),
                    last_notified_at: notified_raw.as_deref().and_then(parse_ts),
                }))
            }
        }
    }

    /// Complete a chore: hand it to the other participant, push the due
    /// date out by the chore's frequency, stamp the completion, and
    /// clear the notified marker so the next cycle re-arms.
    ///
    /// The read-rotate-write runs in one transaction. Returns `None`
    /// for an unknown chore id (nothing is written in that case).
    pub fn complete_chore(
        &self,
        chore_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<CompletionResult>> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(store_err)?;

        let row = tx
            .query_row(
                "SELECT c.id, c.name, c.frequency_days, a.assigned_to
                 FROM chores c
                 JOIN assignments a ON a.chore_id = c.id
                 WHERE c.id = ?1",
                params![chore_id],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                },
            )
            .optional()
            .map_err(store_err)?;

        let Some((id, name, frequency_days, current)) = row else {
            return Ok(None);
        };

        let participant_ids: Vec<i64> = {
            let mut stmt = tx
                .prepare("SELECT id FROM participants ORDER BY id")
                .map_err(store_err)?;
            let rows = stmt
                .query_map([], |r| r.get(0))
                .map_err(store_err)?
                .collect::<std::result::Result<_, _>>()
                .map_err(store_err)?;
            rows
        };

        let (next, new_due) = rotation::compute_handoff(current, &participant_ids, frequency_days, now);

        tx.execute(
            "UPDATE assignments
             SET assigned_to = ?1, due_date = ?2, last_completed_at = ?3, last_notified_at = NULL
             WHERE chore_id = ?4",
            params![next, fmt_ts(new_due), fmt_ts(now), chore_id],
        )
        .map_err(store_err)?;

        tx.commit().map_err(store_err)?;

        tracing::info!("✅ Chore '{name}' completed, handed off {current} → {next}");
        Ok(Some(CompletionResult {
            id,
            name,
            frequency_days,
            previous_assignee: current,
            assigned_to: next,
            due_date: new_due,
            completed_at: now,
        }))
    }

    /// All assignments with `due_date <= now`, joined with chore and
    /// assignee, for the scheduler's scan.
    pub fn fetch_due(&self, now: DateTime<Utc>) -> Result<Vec<DueAssignment>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT c.id, c.name, a.due_date, a.last_notified_at,
                        p.id, p.name, p.email, p.phone
                 FROM assignments a
                 JOIN chores c ON c.id = a.chore_id
                 JOIN participants p ON p.id = a.assigned_to
                 WHERE a.due_date <= ?1
                 ORDER BY c.id",
            )
            .map_err(store_err)?;

        let rows = stmt
            .query_map(params![fmt_ts(now)], |row| {
                Ok(DueAssignment {
                    chore_id: row.get(0)?,
                    chore_name: row.get(1)?,
                    due_date: row
                        .get::<_, String>(2)
                        .map(|s| parse_ts(&s))?,
                    last_notified_at: row
                        .get::<_, Option<String>>(3)?
                        .as_deref()
                        .and_then(parse_ts),
                    participant: Participant {
                        id: row.get(4)?,
                        name: row.get(5)?,
                        email: row.get(6)?,
                        phone: row.get(7)?,
                    },
                })
            })
            .map_err(store_err)?;

        rows.collect::<std::result::Result<_, _>>().map_err(store_err)
    }

    /// Stamp the notified marker for a chore. Idempotent; a second call
    /// with the same timestamp is a no-op in effect.
    pub fn mark_notified(&self, chore_id: i64, timestamp: DateTime<Utc>) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "UPDATE assignments SET last_notified_at = ?1 WHERE chore_id = ?2",
            params![fmt_ts(timestamp), chore_id],
        )
        .map_err(store_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chorewheel_core::config::{ChoreSeed, ParticipantSeed, SeedConfig};
    use chrono::{Duration, TimeZone};

    fn test_seed() -> SeedConfig {
        SeedConfig {
            participants: vec![
                ParticipantSeed {
                    name: "Alex".into(),
                    email: Some("alex@example.com".into()),
                    phone: None,
                },
                ParticipantSeed {
                    name: "Sam".into(),
                    email: None,
                    phone: Some("+15550001111".into()),
                },
            ],
            chores: vec![
                ChoreSeed { name: "Dishes".into(), frequency_days: 1 },
                ChoreSeed { name: "Trash & Recycling".into(), frequency_days: 3 },
                ChoreSeed { name: "Room Tidy".into(), frequency_days: 3 },
            ],
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 27, 12, 0, 0).unwrap()
    }

    fn seeded_store() -> ChoreStore {
        let store = ChoreStore::open_in_memory().unwrap();
        store.seed(&test_seed(), t0()).unwrap();
        store
    }

    #[test]
    fn test_seed_round_robins_assignments() {
        let store = seeded_store();
        let chores = store.list_chores(t0()).unwrap();
        assert_eq!(chores.len(), 3);
        // Chore-creation order alternates between the two participants
        assert_eq!(chores[0].assigned_to.name, "Alex");
        assert_eq!(chores[1].assigned_to.name, "Sam");
        assert_eq!(chores[2].assigned_to.name, "Alex");
        assert!(chores.iter().all(|c| c.due_date == t0()));
    }

    #[test]
    fn test_seed_is_idempotent() {
        let store = seeded_store();
        store.seed(&test_seed(), t0() + Duration::hours(1)).unwrap();
        let chores = store.list_chores(t0()).unwrap();
        assert_eq!(chores.len(), 3);
        // Existing assignments untouched by the second seed
        assert!(chores.iter().all(|c| c.due_date == t0()));
    }

    #[test]
    fn test_complete_hands_off_and_rearms() {
        let store = seeded_store();
        store.mark_notified(1, t0()).unwrap();

        let result = store.complete_chore(1, t0()).unwrap().unwrap();
        assert_eq!(result.name, "Dishes");
        assert_eq!(result.previous_assignee, 1);
        assert_eq!(result.assigned_to, 2);
        assert_eq!(result.due_date, t0() + Duration::days(1));
        assert_eq!(result.completed_at, t0());

        let assignment = store.get_assignment(1).unwrap().unwrap();
        assert_eq!(assignment.assigned_to, 2);
        assert_eq!(assignment.due_date, t0() + Duration::days(1));
        assert_eq!(assignment.last_completed_at, Some(t0()));
        assert_eq!(assignment.last_notified_at, None);
    }

    #[test]
    fn test_repeated_completion_alternates() {
        let store = seeded_store();
        let mut seen = Vec::new();
        let mut now = t0();
        for _ in 0..6 {
            let result = store.complete_chore(1, now).unwrap().unwrap();
            seen.push(result.assigned_to);
            now += Duration::hours(1);
        }
        assert_eq!(seen, vec![2, 1, 2, 1, 2, 1]);
    }

    #[test]
    fn test_complete_unknown_chore_writes_nothing() {
        let store = seeded_store();
        let before = store.list_chores(t0()).unwrap();
        assert!(store.complete_chore(9999, t0()).unwrap().is_none());
        let after = store.list_chores(t0()).unwrap();
        assert_eq!(before.len(), after.len());
        for (b, a) in before.iter().zip(after.iter()) {
            assert_eq!(b.due_date, a.due_date);
            assert_eq!(b.assigned_to.id, a.assigned_to.id);
            assert_eq!(b.last_completed_at, a.last_completed_at);
        }
    }

    #[test]
    fn test_fetch_due_filters_on_due_date() {
        let store = seeded_store();
        // Seeded chores are all due at t0
        assert_eq!(store.fetch_due(t0()).unwrap().len(), 3);

        // Completing Dishes pushes it a day out
        store.complete_chore(1, t0()).unwrap();
        let due = store.fetch_due(t0()).unwrap();
        assert_eq!(due.len(), 2);
        assert!(due.iter().all(|d| d.chore_id != 1));

        // A day later it is due again
        assert_eq!(store.fetch_due(t0() + Duration::days(1)).unwrap().len(), 3);
    }

    #[test]
    fn test_mark_notified_visible_in_fetch_due() {
        let store = seeded_store();
        store.mark_notified(1, t0()).unwrap();
        store.mark_notified(1, t0()).unwrap(); // idempotent

        let due = store.fetch_due(t0()).unwrap();
        let dishes = due.iter().find(|d| d.chore_id == 1).unwrap();
        assert_eq!(dishes.last_notified_at, Some(t0()));
    }

    #[test]
    fn test_urgency_flags() {
        let store = seeded_store();
        // Complete at t0 - 2d with frequency 1 → due at t0 - 1d: overdue
        store.complete_chore(1, t0() - Duration::days(2)).unwrap();
        // Complete at t0 - 3d + 2h with frequency 3 → due at t0 + 2h: due soon
        store.complete_chore(2, t0() - Duration::days(3) + Duration::hours(2)).unwrap();
        // Complete at t0 with frequency 3 → due at t0 + 3d: neither
        store.complete_chore(3, t0()).unwrap();

        let chores = store.list_chores(t0()).unwrap();
        assert!(chores[0].is_overdue && chores[0].is_due_soon);
        assert!(!chores[1].is_overdue && chores[1].is_due_soon);
        assert!(!chores[2].is_overdue && !chores[2].is_due_soon);
    }

    #[test]
    fn test_timestamp_format_is_sortable() {
        // Fixed-width micros keep lexicographic order == chronological order
        let a = fmt_ts(t0());
        let b = fmt_ts(t0() + Duration::microseconds(1));
        let c = fmt_ts(t0() + Duration::seconds(1));
        assert!(a < b && b < c);
        assert_eq!(parse_ts(&a), Some(t0()));
    }
}
