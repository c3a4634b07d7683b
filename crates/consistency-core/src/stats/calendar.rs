//! Month calendar heat-map.
//!
//! One cell per day of the month. A day with no assigned tasks is "no
//! data" (`score: None`), which stays distinct from a recorded 0%.

use chrono::{Datelike, Month, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::date::{days_in_month, first_weekday_offset};
use crate::history::History;

/// Colour band of a calendar cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatLevel {
    NoData,
    /// Tasks were assigned but none completed
    Missed,
    /// 1-49%
    Low,
    /// 50-99%
    Good,
    Perfect,
}

impl HeatLevel {
    pub fn from_score(score: Option<u8>) -> Self {
        match score {
            None => HeatLevel::NoData,
            Some(0) => HeatLevel::Missed,
            Some(s) if s < 50 => HeatLevel::Low,
            Some(s) if s < 100 => HeatLevel::Good,
            Some(_) => HeatLevel::Perfect,
        }
    }

    /// Single character for terminal rendering.
    pub fn glyph(&self) -> char {
        match self {
            HeatLevel::NoData => '·',
            HeatLevel::Missed => '░',
            HeatLevel::Low => '▒',
            HeatLevel::Good => '▓',
            HeatLevel::Perfect => '█',
        }
    }
}

/// A single day of the month grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarCell {
    pub date: NaiveDate,
    /// Day of month, 1-based
    pub day: u32,
    /// Completion percentage, `None` when the day has no assigned tasks
    pub score: Option<u8>,
    pub level: HeatLevel,
}

/// All days of one month in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    /// Blank cells before the 1st in a Sunday-first week layout
    pub leading_blanks: u32,
    pub cells: Vec<CalendarCell>,
}

impl MonthGrid {
    /// Cells with recorded data.
    pub fn recorded_days(&self) -> usize {
        self.cells.iter().filter(|c| c.score.is_some()).count()
    }

    /// Render as a Sunday-first block of glyphs, one week per line.
    pub fn render_ascii(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("{:04}-{:02}\n", self.year, self.month));
        output.push_str("S M T W T F S\n");

        let mut column = 0;
        for _ in 0..self.leading_blanks {
            output.push_str("  ");
            column += 1;
        }
        for cell in &self.cells {
            output.push(cell.level.glyph());
            column += 1;
            if column % 7 == 0 {
                output.push('\n');
            } else {
                output.push(' ');
            }
        }
        if column % 7 != 0 {
            output.push('\n');
        }
        output
    }
}

/// Builds month grids from a [`History`].
#[derive(Debug, Clone, Default)]
pub struct CalendarView;

impl CalendarView {
    pub fn new() -> Self {
        Self
    }

    /// Grid for `month` of `year`.
    ///
    /// A year outside the supported calendar range yields an empty grid.
    pub fn month_grid(&self, history: &History, year: i32, month: Month) -> MonthGrid {
        let month_number = month.number_from_month();
        let days = days_in_month(year, month_number).unwrap_or(0);

        let cells = (1..=days)
            .filter_map(|day| NaiveDate::from_ymd_opt(year, month_number, day))
            .map(|date| {
                let score = history
                    .get(date)
                    .filter(|r| r.has_assignments())
                    .map(|r| r.completion());
                CalendarCell {
                    date,
                    day: date.day(),
                    score,
                    level: HeatLevel::from_score(score),
                }
            })
            .collect();

        MonthGrid {
            year,
            month: month_number,
            leading_blanks: first_weekday_offset(year, month_number).unwrap_or(0),
            cells,
        }
    }
}
