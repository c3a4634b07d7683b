//! Short fixed-window series for the progress charts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::metrics::rounded_mean;
use crate::date::days_back;
use crate::history::{DayRecord, History};

/// Chart window sizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_recent_days")]
    pub recent_days: u32,
    #[serde(default = "default_recent_weeks")]
    pub recent_weeks: u32,
}

fn default_recent_days() -> u32 {
    4
}
fn default_recent_weeks() -> u32 {
    4
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            recent_days: default_recent_days(),
            recent_weeks: default_recent_weeks(),
        }
    }
}

/// One bar of the daily chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPoint {
    pub date: NaiveDate,
    /// Axis label, `MM-DD`
    pub label: String,
    pub completion: u8,
}

/// One point of the weekly chart: a trailing 7-day window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekBucket {
    /// `W1` for the oldest window up to `Wn` for the most recent
    pub label: String,
    /// First (oldest) day of the window
    pub start: NaiveDate,
    /// Last (newest) day of the window
    pub end: NaiveDate,
    pub average: u8,
    /// Days inside the window that had assignments
    pub days_with_data: u32,
}

/// Derives chart series from a [`History`].
#[derive(Debug, Clone, Default)]
pub struct ChartBucketer;

impl ChartBucketer {
    pub fn new() -> Self {
        Self
    }

    /// Completion for the `n` calendar days ending at `today`, oldest first.
    /// Dates without a record are reported as 0.
    pub fn last_n_days(&self, history: &History, today: NaiveDate, n: u32) -> Vec<DayPoint> {
        (0..n)
            .rev()
            .map(|i| {
                let date = days_back(today, i as i64);
                DayPoint {
                    date,
                    label: date.format("%m-%d").to_string(),
                    completion: history.daily_completion(date),
                }
            })
            .collect()
    }

    /// `n` trailing 7-day windows, oldest window first.
    ///
    /// Window `w` (0 = most recent) spans `today - 7w` back to
    /// `today - 7w - 6`. Its value is the mean daily completion of the days
    /// in it that have assignments, or 0 when there are none.
    pub fn last_n_weeks(&self, history: &History, today: NaiveDate, n: u32) -> Vec<WeekBucket> {
        (0..n)
            .rev()
            .map(|w| {
                let end = days_back(today, 7 * w as i64);
                let start = days_back(end, 6);
                let values: Vec<u8> = (0..7)
                    .filter_map(|d| {
                        history
                            .get(days_back(end, d))
                            .filter(|r| r.has_assignments())
                            .map(DayRecord::completion)
                    })
                    .collect();

                WeekBucket {
                    label: format!("W{}", n - w),
                    start,
                    end,
                    average: rounded_mean(values.iter().copied()),
                    days_with_data: values.len() as u32,
                }
            })
            .collect()
    }
}
