use chrono::{Datelike, Month};
use clap::Args;
use consistency_core::{CalendarView, ValidationError};

use crate::context::{Context, GlobalArgs};

#[derive(Args)]
pub struct CalendarArgs {
    /// Year (default: the current year)
    #[arg(long)]
    year: Option<i32>,
    /// Month 1-12 (default: the current month)
    #[arg(long)]
    month: Option<u32>,
    /// Print a text grid instead of JSON
    #[arg(long)]
    ascii: bool,
}

fn parse_month(month: u32) -> Result<Month, ValidationError> {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .ok_or(ValidationError::InvalidMonth(month))
}

pub fn run(args: CalendarArgs, global: &GlobalArgs) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::open(global)?;
    let year = args.year.unwrap_or(ctx.today.year());
    let month = parse_month(args.month.unwrap_or(ctx.today.month()))?;

    let grid = CalendarView::new().month_grid(&ctx.history, year, month);
    if args.ascii {
        print!("{}", grid.render_ascii());
    } else {
        println!("{}", serde_json::to_string_pretty(&grid)?);
    }
    Ok(())
}
