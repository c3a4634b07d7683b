use clap::Subcommand;
use consistency_core::ChartBucketer;

use crate::context::{Context, GlobalArgs};

#[derive(Subcommand)]
pub enum ChartAction {
    /// Daily completion for the last N days, oldest first
    Days {
        /// Number of days (default: charts.recent_days)
        #[arg(long)]
        n: Option<u32>,
    },
    /// Weekly averages for the last N weeks, oldest first
    Weeks {
        /// Number of weeks (default: charts.recent_weeks)
        #[arg(long)]
        n: Option<u32>,
    },
}

pub fn run(action: ChartAction, global: &GlobalArgs) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::open(global)?;
    let bucketer = ChartBucketer::new();

    let json = match action {
        ChartAction::Days { n } => {
            let n = n.unwrap_or(ctx.config.charts.recent_days);
            serde_json::to_string_pretty(&bucketer.last_n_days(&ctx.history, ctx.today, n))?
        }
        ChartAction::Weeks { n } => {
            let n = n.unwrap_or(ctx.config.charts.recent_weeks);
            serde_json::to_string_pretty(&bucketer.last_n_weeks(&ctx.history, ctx.today, n))?
        }
    };
    println!("{json}");
    Ok(())
}
