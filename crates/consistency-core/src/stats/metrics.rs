//! Completion metrics: daily percentage, rolling average, streak and the
//! consistency score.
//!
//! Every function takes the history snapshot and the reference `today`
//! explicitly. Nothing reads the system clock.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date::days_back;
use crate::history::{DayRecord, History};

/// Tunables for the metrics engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Upper bound on the number of days any backward walk visits
    #[serde(default = "default_walk_limit")]
    pub walk_limit: u32,
    /// Calendar days covered by the rolling average
    #[serde(default = "default_rolling_window_days")]
    pub rolling_window_days: u32,
    /// Number of active days sampled by the consistency score
    #[serde(default = "default_score_sample_days")]
    pub score_sample_days: usize,
}

fn default_walk_limit() -> u32 {
    365
}
fn default_rolling_window_days() -> u32 {
    7
}
fn default_score_sample_days() -> usize {
    7
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            walk_limit: default_walk_limit(),
            rolling_window_days: default_rolling_window_days(),
            score_sample_days: default_score_sample_days(),
        }
    }
}

/// Headline numbers for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub date: NaiveDate,
    /// Today's completion percentage
    pub today: u8,
    pub rolling_average: u8,
    pub rolling_window_days: u32,
    /// Consecutive days with at least one completion
    pub streak: u32,
    pub consistency_score: u8,
}

/// Computes completion metrics over a [`History`].
#[derive(Debug, Clone, Default)]
pub struct MetricsEngine {
    config: MetricsConfig,
}

impl MetricsEngine {
    /// Create an engine with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    pub fn with_config(config: MetricsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }

    /// Completion percentage of a single date, 0 when absent or unassigned.
    pub fn daily_completion(&self, history: &History, date: NaiveDate) -> u8 {
        history.daily_completion(date)
    }

    /// Mean daily completion over `window_days` calendar days ending at
    /// `today`.
    ///
    /// Only dates that have a record with at least one assigned task take
    /// part; absent dates are skipped rather than counted as 0%. The window
    /// is clamped to the configured walk limit. Returns 0 when no date
    /// qualifies.
    pub fn rolling_average(&self, history: &History, today: NaiveDate, window_days: u32) -> u8 {
        let window = window_days.min(self.config.walk_limit);
        let values = (0..window).filter_map(|i| {
            history
                .get(days_back(today, i as i64))
                .filter(|r| r.has_assignments())
                .map(DayRecord::completion)
        });
        rounded_mean(values)
    }

    /// Number of consecutive days with at least one completion, walking
    /// back from `today`.
    ///
    /// An empty `today` does not break the streak since the day is still in
    /// progress. Any earlier day without completions, or without a record,
    /// ends the walk. At most `walk_limit` days are visited.
    pub fn current_streak(&self, history: &History, today: NaiveDate) -> u32 {
        let mut streak = 0;
        for i in 0..self.config.walk_limit {
            let date = days_back(today, i as i64);
            let active = history.get(date).is_some_and(DayRecord::has_completions);

            if active {
                streak += 1;
            } else if date != today {
                return streak;
            }
        }
        tracing::debug!(limit = self.config.walk_limit, streak, "streak walk reached its bound");
        streak
    }

    /// Mean completion of the most recent active days.
    ///
    /// Dates are visited newest first and the first `score_sample_days`
    /// that have assignments and a completion above 0% are averaged. Days
    /// with nothing done are skipped, not averaged in as 0, so the sampled
    /// dates need not be consecutive. Every date in the history is a
    /// candidate, including ones after `today`. Returns 0 when no date
    /// qualifies.
    pub fn consistency_score(&self, history: &History, _today: NaiveDate) -> u8 {
        let sample = history
            .iter_desc()
            .filter(|r| r.has_assignments())
            .map(DayRecord::completion)
            .filter(|&c| c > 0)
            .take(self.config.score_sample_days);
        rounded_mean(sample)
    }

    /// All headline metrics for `today`.
    pub fn summary(&self, history: &History, today: NaiveDate) -> StatsSummary {
        StatsSummary {
            date: today,
            today: self.daily_completion(history, today),
            rolling_average: self.rolling_average(history, today, self.config.rolling_window_days),
            rolling_window_days: self.config.rolling_window_days,
            streak: self.current_streak(history, today),
            consistency_score: self.consistency_score(history, today),
        }
    }
}

/// Arithmetic mean of percentages, half-up rounded; 0 for no values.
pub(crate) fn rounded_mean<I>(values: I) -> u8
where
    I: IntoIterator<Item = u8>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0u64, 0u64), |(sum, count), v| (sum + v as u64, count + 1));
    if count == 0 {
        return 0;
    }
    ((2 * sum + count) / (2 * count)) as u8
}
