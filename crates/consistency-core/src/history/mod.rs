//! Per-day completion history.
//!
//! Raw [`CompletionEvent`] rows are folded by the [`HistoryAggregator`]
//! into a [`History`]: one [`DayRecord`] per calendar date.

mod aggregator;

pub use aggregator::HistoryAggregator;

use std::collections::{btree_map, BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A raw completion row as produced by the store.
///
/// One logical row exists per (date, task); a later row for the same pair
/// replaces the earlier one in full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionEvent {
    /// Raw date or timestamp, normalized during aggregation.
    pub date: String,
    pub task_id: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub timer_seconds: i64,
}

impl CompletionEvent {
    pub fn new(date: impl Into<String>, task_id: impl Into<String>, completed: bool, timer_seconds: i64) -> Self {
        Self {
            date: date.into(),
            task_id: task_id.into(),
            completed,
            timer_seconds,
        }
    }
}

/// Which tasks were assigned and completed on one date.
///
/// `completed` is always a subset of `assigned`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayRecord {
    date: NaiveDate,
    assigned: BTreeSet<String>,
    completed: BTreeSet<String>,
    timers: BTreeMap<String, u64>,
}

impl DayRecord {
    /// Create an empty record.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            assigned: BTreeSet::new(),
            completed: BTreeSet::new(),
            timers: BTreeMap::new(),
        }
    }

    /// A record with every id in `task_ids` assigned and nothing completed.
    pub fn with_assigned<'a, I>(date: NaiveDate, task_ids: I) -> Self
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut record = Self::new(date);
        record.assigned.extend(task_ids.into_iter().cloned());
        record
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn assigned(&self) -> &BTreeSet<String> {
        &self.assigned
    }

    pub fn completed(&self) -> &BTreeSet<String> {
        &self.completed
    }

    pub fn timers(&self) -> &BTreeMap<String, u64> {
        &self.timers
    }

    pub fn is_assigned(&self, task_id: &str) -> bool {
        self.assigned.contains(task_id)
    }

    pub fn is_completed(&self, task_id: &str) -> bool {
        self.completed.contains(task_id)
    }

    pub fn has_assignments(&self) -> bool {
        !self.assigned.is_empty()
    }

    pub fn has_completions(&self) -> bool {
        !self.completed.is_empty()
    }

    /// Add a task to the day's assignment.
    pub fn assign(&mut self, task_id: &str) {
        self.assigned.insert(task_id.to_string());
    }

    /// Mark an assigned task completed. Returns `false` if it is not
    /// assigned, in which case nothing changes.
    pub fn complete(&mut self, task_id: &str) -> bool {
        if !self.assigned.contains(task_id) {
            return false;
        }
        self.completed.insert(task_id.to_string());
        true
    }

    /// Record elapsed timer seconds. Zero clears the entry.
    pub fn set_timer(&mut self, task_id: &str, seconds: u64) {
        if seconds > 0 {
            self.timers.insert(task_id.to_string(), seconds);
        } else {
            self.timers.remove(task_id);
        }
    }

    /// Completion percentage in `[0, 100]`, half-up rounded.
    /// An empty assignment yields 0.
    pub fn completion(&self) -> u8 {
        let assigned = self.assigned.len();
        if assigned == 0 {
            return 0;
        }
        let completed = self.completed.len().min(assigned);
        // round(100 * c / a) with halves rounded up, in integers
        ((200 * completed + assigned) / (2 * assigned)) as u8
    }
}

/// Date-keyed collection of day records.
///
/// Lookups return `None` for dates with no record; there is no implicit
/// empty default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct History {
    days: BTreeMap<NaiveDate, DayRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DayRecord> {
        self.days.get(&date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.days.contains_key(&date)
    }

    /// Insert a record under its own date, replacing any existing one.
    pub fn insert(&mut self, record: DayRecord) -> Option<DayRecord> {
        self.days.insert(record.date, record)
    }

    /// The record for `date`, creating an empty one if absent.
    pub fn entry(&mut self, date: NaiveDate) -> &mut DayRecord {
        self.days.entry(date).or_insert_with(|| DayRecord::new(date))
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Records in ascending date order.
    pub fn iter(&self) -> btree_map::Values<'_, NaiveDate, DayRecord> {
        self.days.values()
    }

    /// Records from the most recent date backward.
    pub fn iter_desc(&self) -> impl Iterator<Item = &DayRecord> {
        self.days.values().rev()
    }

    /// Completion percentage for `date`; 0 when absent or unassigned.
    pub fn daily_completion(&self, date: NaiveDate) -> u8 {
        self.get(date).map(DayRecord::completion).unwrap_or(0)
    }
}

impl FromIterator<DayRecord> for History {
    fn from_iter<T: IntoIterator<Item = DayRecord>>(iter: T) -> Self {
        let mut history = History::new();
        for record in iter {
            history.insert(record);
        }
        history
    }
}
