//! Persistence collaborator.
//!
//! The metrics engine never touches storage; callers read tasks and
//! completion rows through [`HistoryStore`] and hand them to the
//! [`HistoryAggregator`](crate::history::HistoryAggregator).

mod sqlite;

pub use sqlite::SqliteStore;

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::error::Result;
use crate::history::CompletionEvent;
use crate::task::Task;

/// Source of tasks and completion rows.
pub trait HistoryStore {
    /// All tasks, soft-deleted ones included.
    fn list_tasks(&self) -> Result<Vec<Task>>;

    /// Every completion row across all dates.
    fn list_completion_events(&self) -> Result<Vec<CompletionEvent>>;

    /// Insert or fully replace the row for (`date`, `task_id`).
    fn upsert_completion_event(
        &self,
        date: NaiveDate,
        task_id: &str,
        completed: bool,
        timer_seconds: u64,
    ) -> Result<()>;
}

/// Returns `~/.config/consistency-tracker[-dev]/` based on CONSISTENCY_ENV.
///
/// Set CONSISTENCY_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("CONSISTENCY_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("consistency-tracker-dev")
    } else {
        base_dir.join("consistency-tracker")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
