//! SQLite-backed task and completion storage.
//!
//! Provides persistent storage for:
//! - Tasks, soft-deleted by clearing `is_active`
//! - One completion row per (date, task)

use std::path::Path;

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{data_dir, HistoryStore};
use crate::date::date_key;
use crate::error::{Result, StorageError};
use crate::history::CompletionEvent;
use crate::task::{parse_hhmm, Task};

/// SQLite store for tasks and completion history.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the database at `~/.config/consistency-tracker/history.db`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_default() -> Result<Self> {
        Self::open(&data_dir()?.join("history.db"))
    }

    /// Open (creating if needed) the database at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        tracing::info!(path = %path.display(), "opened history store");
        Ok(store)
    }

    /// Open an in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS tasks (
                id             TEXT PRIMARY KEY,
                name           TEXT NOT NULL,
                priority       TEXT NOT NULL DEFAULT 'Medium',
                has_timer      INTEGER NOT NULL DEFAULT 0,
                scheduled_time TEXT,
                is_active      INTEGER NOT NULL DEFAULT 1,
                created_at     TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS history (
                date          TEXT NOT NULL,
                task_id       TEXT NOT NULL,
                is_completed  INTEGER NOT NULL DEFAULT 0,
                timer_seconds INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (date, task_id)
            );

            CREATE INDEX IF NOT EXISTS idx_history_task_id ON history(task_id);",
        )
    }

    fn task_from_row(row: &Row<'_>) -> Result<Task, rusqlite::Error> {
        let priority: String = row.get(2)?;
        let scheduled: Option<String> = row.get(4)?;
        Ok(Task {
            id: row.get(0)?,
            name: row.get(1)?,
            priority: priority.parse().unwrap_or_default(),
            has_timer: row.get(3)?,
            scheduled_time: scheduled.as_deref().and_then(|s| parse_hhmm(s).ok()),
            active: row.get(5)?,
        })
    }

    /// Insert a new task.
    ///
    /// # Errors
    /// Returns an error if a task with the same id exists or the insert fails.
    pub fn add_task(&self, task: &Task) -> Result<()> {
        self.conn.execute(
            "INSERT INTO tasks (id, name, priority, has_timer, scheduled_time, is_active, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                task.id,
                task.name,
                task.priority.as_str(),
                task.has_timer,
                task.scheduled_hhmm(),
                task.active,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Look up one task by id.
    pub fn get_task(&self, id: &str) -> Result<Option<Task>> {
        let task = self
            .conn
            .query_row(
                "SELECT id, name, priority, has_timer, scheduled_time, is_active
                 FROM tasks WHERE id = ?1",
                params![id],
                Self::task_from_row,
            )
            .optional()?;
        Ok(task)
    }

    /// Soft delete: the task stays referenced by history but is no longer
    /// active.
    ///
    /// # Errors
    /// Returns [`StorageError::TaskNotFound`] if no task has this id.
    pub fn deactivate_task(&self, id: &str) -> Result<()> {
        let changed = self
            .conn
            .execute("UPDATE tasks SET is_active = 0 WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(StorageError::TaskNotFound(id.to_string()).into());
        }
        Ok(())
    }

    /// Record the day's assignment: an incomplete row for every task in
    /// `task_ids` that has no row for `date` yet. Existing rows are kept.
    /// Returns the number of rows created.
    pub fn init_day<'a, I>(&self, date: NaiveDate, task_ids: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let key = date_key(date);
        let mut stmt = self
            .conn
            .prepare("INSERT OR IGNORE INTO history (date, task_id) VALUES (?1, ?2)")?;
        let mut created = 0;
        for id in task_ids {
            created += stmt.execute(params![key, id])?;
        }
        Ok(created)
    }
}

impl HistoryStore for SqliteStore {
    fn list_tasks(&self) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, priority, has_timer, scheduled_time, is_active
             FROM tasks ORDER BY created_at ASC, rowid ASC",
        )?;
        let tasks = stmt
            .query_map([], Self::task_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    fn list_completion_events(&self) -> Result<Vec<CompletionEvent>> {
        let mut stmt = self.conn.prepare(
            "SELECT date, task_id, is_completed, timer_seconds
             FROM history ORDER BY date ASC, rowid ASC",
        )?;
        let events = stmt
            .query_map([], |row| {
                Ok(CompletionEvent {
                    date: row.get(0)?,
                    task_id: row.get(1)?,
                    completed: row.get(2)?,
                    timer_seconds: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(events)
    }

    fn upsert_completion_event(
        &self,
        date: NaiveDate,
        task_id: &str,
        completed: bool,
        timer_seconds: u64,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO history (date, task_id, is_completed, timer_seconds)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (date, task_id)
             DO UPDATE SET is_completed = excluded.is_completed,
                           timer_seconds = excluded.timer_seconds",
            params![date_key(date), task_id, completed, timer_seconds.min(i64::MAX as u64) as i64],
        )?;
        Ok(())
    }
}
