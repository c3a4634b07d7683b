//! Statistics commands for CLI.

use clap::Subcommand;
use consistency_core::date::parse_day;
use serde_json::json;

use crate::context::{Context, GlobalArgs};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's completion, rolling average, streak and consistency score
    Summary,
    /// Consecutive days with at least one completion
    Streak,
    /// Mean completion over the most recent active days
    Score,
    /// Mean completion over a calendar window ending today
    Rolling {
        /// Window length in days (default: metrics.rolling_window_days)
        #[arg(long)]
        days: Option<u32>,
    },
    /// Completion percentage for one day
    Day {
        /// Date as YYYY-MM-DD (default: today)
        date: Option<String>,
    },
}

pub fn run(action: StatsAction, global: &GlobalArgs) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::open(global)?;
    let engine = ctx.metrics();

    let out = match action {
        StatsAction::Summary => serde_json::to_value(engine.summary(&ctx.history, ctx.today))?,
        StatsAction::Streak => json!({
            "date": ctx.today,
            "streak": engine.current_streak(&ctx.history, ctx.today),
        }),
        StatsAction::Score => json!({
            "date": ctx.today,
            "consistencyScore": engine.consistency_score(&ctx.history, ctx.today),
        }),
        StatsAction::Rolling { days } => {
            let days = days.unwrap_or(engine.config().rolling_window_days);
            json!({
                "date": ctx.today,
                "days": days,
                "rollingAverage": engine.rolling_average(&ctx.history, ctx.today, days),
            })
        }
        StatsAction::Day { date } => {
            let date = match date {
                Some(raw) => parse_day(&raw)?,
                None => ctx.today,
            };
            json!({
                "date": date,
                "completion": engine.daily_completion(&ctx.history, date),
            })
        }
    };
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
