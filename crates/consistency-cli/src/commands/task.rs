//! Task management commands for CLI.

use clap::Subcommand;
use consistency_core::task::{format_elapsed, order_for_day, parse_hhmm};
use consistency_core::{Priority, Task};
use serde::Serialize;

use crate::context::{Context, GlobalArgs};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new daily task
    Add {
        /// Task name
        name: String,
        /// Priority: high, medium or low
        #[arg(long, default_value = "medium")]
        priority: String,
        /// Track time spent with a timer
        #[arg(long)]
        timer: bool,
        /// Scheduled reminder time (HH:MM)
        #[arg(long)]
        at: Option<String>,
    },
    /// List tasks
    List {
        /// Include deleted tasks
        #[arg(long)]
        all: bool,
    },
    /// Today's tasks, incomplete first
    Today,
    /// Delete a task (its history is kept)
    Delete {
        /// Task ID
        id: String,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TodayEntry<'a> {
    #[serde(flatten)]
    task: &'a Task,
    completed: bool,
    timer_seconds: u64,
    elapsed: String,
}

pub fn run(action: TaskAction, global: &GlobalArgs) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::open(global)?;

    match action {
        TaskAction::Add {
            name,
            priority,
            timer,
            at,
        } => {
            let priority: Priority = priority.parse()?;
            let scheduled = at.as_deref().map(parse_hhmm).transpose()?;
            let task = Task::new(&name, priority, timer, scheduled)?;
            ctx.store.add_task(&task)?;
            // a new task joins today's assignment immediately
            ctx.store.init_day(ctx.today, [&task.id])?;
            tracing::info!(id = %task.id, "task created");
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::List { all } => {
            let tasks: Vec<_> = ctx.tasks.iter().filter(|t| all || t.active).collect();
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        TaskAction::Today => {
            let entries: Vec<TodayEntry<'_>> = match ctx.today_record() {
                Some(record) => order_for_day(&ctx.tasks, record)
                    .into_iter()
                    .map(|task| {
                        let seconds = record.timers().get(&task.id).copied().unwrap_or(0);
                        TodayEntry {
                            task,
                            completed: record.is_completed(&task.id),
                            timer_seconds: seconds,
                            elapsed: format_elapsed(seconds),
                        }
                    })
                    .collect(),
                None => Vec::new(),
            };
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        TaskAction::Delete { id } => {
            ctx.store.deactivate_task(&id)?;
            tracing::info!(%id, "task deleted");
            println!("Task deleted: {id}");
        }
    }
    Ok(())
}
