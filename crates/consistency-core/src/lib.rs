//! # Consistency Tracker Core Library
//!
//! Business logic for a daily habit tracker. A flat list of per-day,
//! per-task completion rows is folded into a date-keyed history, and
//! progress metrics are derived from it: daily completion, rolling
//! averages, the current streak, a headline consistency score, chart
//! series and a month heat-map.
//!
//! ## Architecture
//!
//! - **History**: [`HistoryAggregator`] builds a [`History`] of
//!   [`DayRecord`]s from raw [`CompletionEvent`]s and the active task set
//! - **Stats**: [`MetricsEngine`], [`ChartBucketer`] and [`CalendarView`]
//!   are pure functions of a history snapshot and an explicit `today`
//! - **Storage**: SQLite-backed [`HistoryStore`] and TOML [`Config`]
//!
//! The engine never reads the system clock or touches storage; callers
//! pass everything in.

pub mod config;
pub mod date;
pub mod error;
pub mod history;
pub mod reminders;
pub mod stats;
pub mod storage;
pub mod task;

pub use config::Config;
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use history::{CompletionEvent, DayRecord, History, HistoryAggregator};
pub use reminders::{due_reminders, ReminderLedger};
pub use stats::{
    CalendarCell, CalendarView, ChartBucketer, ChartConfig, DayPoint, HeatLevel, MetricsConfig,
    MetricsEngine, MonthGrid, StatsSummary, WeekBucket,
};
pub use storage::{HistoryStore, SqliteStore};
pub use task::{Priority, Task};
