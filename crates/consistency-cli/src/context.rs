//! Per-invocation state shared by the commands.

use std::path::PathBuf;

use chrono::{Local, NaiveDate, Offset};
use consistency_core::date::parse_day;
use consistency_core::task::active_task_ids;
use consistency_core::{
    Config, DayRecord, History, HistoryAggregator, HistoryStore, MetricsEngine, SqliteStore, Task,
};

/// Flags accepted by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct GlobalArgs {
    pub db: Option<PathBuf>,
    pub today: Option<String>,
}

/// Loaded config, open store and the aggregated history as of `today`.
pub struct Context {
    pub config: Config,
    pub store: SqliteStore,
    pub today: NaiveDate,
    pub tasks: Vec<Task>,
    pub history: History,
    aggregator: HistoryAggregator,
}

impl Context {
    pub fn open(args: &GlobalArgs) -> Result<Self, Box<dyn std::error::Error>> {
        let config = Config::load()?;
        let store = match &args.db {
            Some(path) => SqliteStore::open(path)?,
            None => SqliteStore::open_default()?,
        };

        let now = Local::now();
        let today = match &args.today {
            Some(raw) => parse_day(raw)?,
            None => now.date_naive(),
        };
        let aggregator = HistoryAggregator::with_offset(config.offset_or(now.offset().fix()));

        let mut ctx = Self {
            config,
            store,
            today,
            tasks: Vec::new(),
            history: History::new(),
            aggregator,
        };
        ctx.reload()?;
        Ok(ctx)
    }

    /// Re-read tasks and rows. A day seen for the first time gets its
    /// assignment recorded in the store.
    pub fn reload(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.tasks = self.store.list_tasks()?;
        let active = active_task_ids(&self.tasks);

        let events = self.store.list_completion_events()?;
        self.history = self.aggregator.aggregate(&events, &active, self.today);
        if self
            .aggregator
            .ensure_today(&mut self.history, &active, self.today)
        {
            let created = self.store.init_day(self.today, &active)?;
            tracing::debug!(date = %self.today, created, "initialized day");
        }
        Ok(())
    }

    pub fn metrics(&self) -> MetricsEngine {
        MetricsEngine::with_config(self.config.metrics.clone())
    }

    pub fn today_record(&self) -> Option<&DayRecord> {
        self.history.get(self.today)
    }
}
