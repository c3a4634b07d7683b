use std::path::PathBuf;

use clap::{Parser, Subcommand};
use consistency_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;
mod context;

use context::GlobalArgs;

#[derive(Parser)]
#[command(name = "consistency-cli", version, about = "Daily habit consistency tracker")]
struct Cli {
    /// History database path (default: ~/.config/consistency-tracker/history.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Reference day as YYYY-MM-DD (default: the local date)
    #[arg(long, global = true)]
    today: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Record completions and timer time for today
    Log {
        #[command(subcommand)]
        action: commands::log::LogAction,
    },
    /// Completion statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Chart series for recent days and weeks
    Chart {
        #[command(subcommand)]
        action: commands::chart::ChartAction,
    },
    /// Month heat-map
    Calendar(commands::calendar::CalendarArgs),
    /// Reminders for scheduled tasks
    Remind(commands::remind::RemindArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Config::load_or_default().logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let global = GlobalArgs {
        db: cli.db,
        today: cli.today,
    };
    let result = match cli.command {
        Commands::Task { action } => commands::task::run(action, &global),
        Commands::Log { action } => commands::log::run(action, &global),
        Commands::Stats { action } => commands::stats::run(action, &global),
        Commands::Chart { action } => commands::chart::run(action, &global),
        Commands::Calendar(args) => commands::calendar::run(args, &global),
        Commands::Remind(args) => commands::remind::run(args, &global),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
