pub mod calendar;
pub mod chart;
pub mod config;
pub mod log;
pub mod remind;
pub mod stats;
pub mod task;
