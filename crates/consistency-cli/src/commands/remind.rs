//! Reminders for tasks scheduled at a wall-clock time.

use std::thread;
use std::time::Duration;

use chrono::{Local, NaiveTime};
use clap::Args;
use consistency_core::task::parse_hhmm;
use consistency_core::{ReminderLedger, Task};
use serde::Serialize;

use crate::context::{Context, GlobalArgs};

const WATCH_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Args)]
pub struct RemindArgs {
    /// Check a specific time (HH:MM) instead of now
    #[arg(long)]
    at: Option<String>,
    /// Keep running and print each reminder once as it comes due
    #[arg(long, conflicts_with = "at")]
    watch: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Reminder<'a> {
    key: String,
    task_id: &'a str,
    name: &'a str,
    at: String,
}

fn reminders<'a>(ctx: &Context, due: &[&'a Task], at: NaiveTime) -> Vec<Reminder<'a>> {
    due.iter()
        .map(|task| Reminder {
            key: ReminderLedger::key(&task.id, ctx.today, at),
            task_id: &task.id,
            name: &task.name,
            at: at.format("%H:%M").to_string(),
        })
        .collect()
}

pub fn run(args: RemindArgs, global: &GlobalArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = Context::open(global)?;
    let mut ledger = ReminderLedger::new();

    if !args.watch {
        let at = match args.at.as_deref() {
            Some(raw) => parse_hhmm(raw)?,
            None => Local::now().time(),
        };
        let due = ledger.take_due(&ctx.tasks, ctx.today_record(), at);
        let out = reminders(&ctx, &due, at);
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    tracing::info!(interval_secs = WATCH_INTERVAL.as_secs(), "watching for reminders");
    loop {
        if global.today.is_none() && ctx.today != Local::now().date_naive() {
            // the day rolled over; pick up the new date
            ctx = Context::open(global)?;
        } else {
            ctx.reload()?;
        }

        let at = Local::now().time();
        let due = ledger.take_due(&ctx.tasks, ctx.today_record(), at);
        for reminder in reminders(&ctx, &due, at) {
            println!("{}", serde_json::to_string(&reminder)?);
        }
        thread::sleep(WATCH_INTERVAL);
    }
}
