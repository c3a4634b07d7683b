//! Scheduled-task reminder selection.
//!
//! Decides which tasks are due for a reminder at a given minute. Showing
//! the notification is left to the caller.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveTime, Timelike};

use crate::history::DayRecord;
use crate::task::Task;

/// Tasks due for a reminder at `at`.
///
/// A task is due when it is active, scheduled for the same hour and
/// minute, assigned on `record`'s day and not yet completed. No record
/// means nothing is due.
pub fn due_reminders<'a>(tasks: &'a [Task], record: Option<&DayRecord>, at: NaiveTime) -> Vec<&'a Task> {
    let Some(record) = record else {
        return Vec::new();
    };

    tasks
        .iter()
        .filter(|t| t.active)
        .filter(|t| {
            t.scheduled_time
                .is_some_and(|s| s.hour() == at.hour() && s.minute() == at.minute())
        })
        .filter(|t| record.is_assigned(&t.id) && !record.is_completed(&t.id))
        .collect()
}

/// Remembers which reminders have already gone out.
///
/// Keys are `{task_id}-{date}-{HH:MM}`, so a task is reminded at most once
/// per scheduled minute per day.
#[derive(Debug, Clone, Default)]
pub struct ReminderLedger {
    sent: HashSet<String>,
}

impl ReminderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(task_id: &str, date: NaiveDate, at: NaiveTime) -> String {
        format!("{task_id}-{}-{}", date.format("%Y-%m-%d"), at.format("%H:%M"))
    }

    /// Due tasks not reminded yet; they are recorded as sent.
    pub fn take_due<'a>(
        &mut self,
        tasks: &'a [Task],
        record: Option<&DayRecord>,
        at: NaiveTime,
    ) -> Vec<&'a Task> {
        let date = match record {
            Some(r) => r.date(),
            None => return Vec::new(),
        };
        due_reminders(tasks, record, at)
            .into_iter()
            .filter(|t| self.sent.insert(Self::key(&t.id, date, at)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.is_empty()
    }
}
