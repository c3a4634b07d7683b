//! Folding raw completion rows into per-date records.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{FixedOffset, NaiveDate, Offset, Utc};

use super::{CompletionEvent, DayRecord, History};
use crate::date::normalize_date;

/// Builds a [`History`] from raw completion rows.
///
/// The aggregator only holds the time zone offset used to normalize raw
/// timestamps into local calendar dates; it keeps no state between calls.
#[derive(Debug, Clone, Copy)]
pub struct HistoryAggregator {
    offset: FixedOffset,
}

impl Default for HistoryAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryAggregator {
    /// Aggregator that normalizes timestamps in UTC.
    pub fn new() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    /// Aggregator for a specific local offset.
    pub fn with_offset(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Build the date → record mapping.
    ///
    /// - rows are grouped by normalized local date; rows whose date cannot
    ///   be parsed are skipped
    /// - for a given (date, task) the last row in `events` wins outright
    /// - only tasks in `active_ids` are assigned; completion and timers are
    ///   taken from the winning row of an assigned task
    /// - every parsed date gets a record, even if none of its rows count
    ///
    /// `today` is not consulted here; see [`HistoryAggregator::ensure_today`].
    pub fn aggregate(
        &self,
        events: &[CompletionEvent],
        active_ids: &BTreeSet<String>,
        today: NaiveDate,
    ) -> History {
        let mut winners: BTreeMap<NaiveDate, BTreeMap<&str, &CompletionEvent>> = BTreeMap::new();
        let mut skipped = 0usize;

        for event in events {
            let Some(date) = normalize_date(&event.date, self.offset) else {
                tracing::debug!(raw = %event.date, task_id = %event.task_id, "skipping row with malformed date");
                skipped += 1;
                continue;
            };
            winners
                .entry(date)
                .or_default()
                .insert(event.task_id.as_str(), event);
        }

        let mut history = History::new();
        for (date, rows) in winners {
            let record = history.entry(date);
            for (task_id, event) in rows {
                if !active_ids.contains(task_id) {
                    tracing::trace!(%date, task_id, "row references inactive or unknown task");
                    continue;
                }
                record.assign(task_id);
                if event.completed {
                    record.complete(task_id);
                }
                record.set_timer(task_id, event.timer_seconds.max(0) as u64);
            }
        }

        tracing::debug!(
            rows = events.len(),
            skipped,
            days = history.len(),
            %today,
            "aggregated completion history"
        );
        history
    }

    /// Make sure `today` has a record.
    ///
    /// When absent, inserts one with every active task assigned and nothing
    /// completed. Returns `true` if a record was created. An existing record
    /// is left untouched.
    pub fn ensure_today(
        &self,
        history: &mut History,
        active_ids: &BTreeSet<String>,
        today: NaiveDate,
    ) -> bool {
        if history.contains(today) {
            return false;
        }
        history.insert(DayRecord::with_assigned(today, active_ids));
        true
    }
}
