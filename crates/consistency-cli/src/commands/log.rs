//! Completion logging for today's tasks.

use clap::Subcommand;
use consistency_core::{HistoryStore, StorageError};
use serde_json::json;

use crate::context::{Context, GlobalArgs};

#[derive(Subcommand)]
pub enum LogAction {
    /// Mark a task completed
    Done {
        /// Task ID
        task_id: String,
    },
    /// Mark a task not completed
    Undo {
        /// Task ID
        task_id: String,
    },
    /// Record the timer total for a task, in seconds
    Timer {
        /// Task ID
        task_id: String,
        /// Elapsed seconds
        seconds: u64,
    },
}

pub fn run(action: LogAction, global: &GlobalArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = Context::open(global)?;

    let task_id = match &action {
        LogAction::Done { task_id } | LogAction::Undo { task_id } | LogAction::Timer { task_id, .. } => {
            task_id.clone()
        }
    };

    // only tasks on today's checklist can be logged
    let (completed, seconds) = match ctx.today_record() {
        Some(record) if record.is_assigned(&task_id) => (
            record.is_completed(&task_id),
            record.timers().get(&task_id).copied().unwrap_or(0),
        ),
        _ => return Err(StorageError::TaskNotFound(task_id).into()),
    };

    let (completed, seconds) = match action {
        LogAction::Done { .. } => (true, seconds),
        LogAction::Undo { .. } => (false, seconds),
        LogAction::Timer { seconds, .. } => (completed, seconds),
    };
    ctx.store
        .upsert_completion_event(ctx.today, &task_id, completed, seconds)?;
    tracing::info!(date = %ctx.today, %task_id, completed, seconds, "logged");

    ctx.reload()?;
    let completion = ctx.history.daily_completion(ctx.today);
    let out = json!({
        "completion": completion,
        "record": ctx.today_record(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
