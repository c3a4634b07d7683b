//! Statistics module for Consistency Tracker
//!
//! Derived views over the per-day completion history: headline metrics
//! (daily completion, rolling average, streak, consistency score), short
//! chart series and the month calendar heat-map.

mod calendar;
mod charts;
mod metrics;

pub use calendar::{CalendarCell, CalendarView, HeatLevel, MonthGrid};

pub use charts::{ChartBucketer, ChartConfig, DayPoint, WeekBucket};

pub use metrics::{MetricsConfig, MetricsEngine, StatsSummary};
