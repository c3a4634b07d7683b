//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a scratch HOME and database and
//! verify the JSON it prints.

use std::path::Path;
use std::process::Command;

use consistency_core::{HistoryStore, Priority, SqliteStore, Task};
use serde_json::Value;

const TODAY: &str = "2026-03-11";

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let db = home.join("history.db");
    let output = Command::new(env!("CARGO_BIN_EXE_consistency-cli"))
        .env("HOME", home)
        .env_remove("RUST_LOG")
        .env_remove("CONSISTENCY_ENV")
        .arg("--db")
        .arg(&db)
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(home: &Path, args: &[&str]) -> Value {
    let (stdout, stderr, code) = run_cli(home, args);
    assert_eq!(code, 0, "command {args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("stdout is not JSON")
}

fn add_task(home: &Path, name: &str, extra: &[&str]) -> String {
    let mut args = vec!["--today", TODAY, "task", "add", name];
    args.extend_from_slice(extra);
    let task = run_json(home, &args);
    task["id"].as_str().unwrap().to_string()
}

#[test]
fn test_task_add_and_list() {
    let home = tempfile::tempdir().unwrap();
    let id = add_task(home.path(), "Read", &["--priority", "high"]);

    let tasks = run_json(home.path(), &["task", "list"]);
    let tasks = tasks.as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"], id.as_str());
    assert_eq!(tasks[0]["priority"], "High");
}

#[test]
fn test_task_add_rejects_bad_input() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["task", "add", "Read", "--priority", "urgent"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));

    let (_, _, code) = run_cli(home.path(), &["task", "add", "Read", "--at", "25:00"]);
    assert_eq!(code, 1);

    let (_, _, code) = run_cli(home.path(), &["task", "add", "   "]);
    assert_eq!(code, 1);
}

#[test]
fn test_log_done_updates_summary() {
    let home = tempfile::tempdir().unwrap();
    let a = add_task(home.path(), "Read", &[]);
    let _b = add_task(home.path(), "Run", &[]);

    let logged = run_json(home.path(), &["--today", TODAY, "log", "done", &a]);
    assert_eq!(logged["completion"], 50);

    let summary = run_json(home.path(), &["--today", TODAY, "stats", "summary"]);
    assert_eq!(summary["today"], 50);
    assert_eq!(summary["streak"], 1);
    assert_eq!(summary["consistency_score"], 50);

    let logged = run_json(home.path(), &["--today", TODAY, "log", "undo", &a]);
    assert_eq!(logged["completion"], 0);
}

#[test]
fn test_streak_across_days() {
    let home = tempfile::tempdir().unwrap();
    let a = add_task(home.path(), "Read", &[]);

    run_json(home.path(), &["--today", "2026-03-09", "log", "done", &a]);
    run_json(home.path(), &["--today", "2026-03-10", "log", "done", &a]);

    // today is initialized but nothing is done yet
    let streak = run_json(home.path(), &["--today", TODAY, "stats", "streak"]);
    assert_eq!(streak["streak"], 2);

    let rolling = run_json(home.path(), &["--today", TODAY, "stats", "rolling", "--days", "3"]);
    assert_eq!(rolling["rollingAverage"], 67);
}

#[test]
fn test_read_commands_keep_recorded_day() {
    let home = tempfile::tempdir().unwrap();
    let a = add_task(home.path(), "Read", &[]);

    // a task stored without today's assignment
    let late = Task::new("Run", Priority::Low, false, None).unwrap();
    SqliteStore::open(&home.path().join("history.db"))
        .unwrap()
        .add_task(&late)
        .unwrap();

    run_json(home.path(), &["--today", TODAY, "stats", "summary"]);
    run_json(home.path(), &["--today", TODAY, "chart", "days"]);

    let store = SqliteStore::open(&home.path().join("history.db")).unwrap();
    let rows: Vec<_> = store
        .list_completion_events()
        .unwrap()
        .into_iter()
        .filter(|e| e.date == TODAY)
        .map(|e| e.task_id)
        .collect();
    assert_eq!(rows, vec![a]);

    // a day without a record is initialized for every active task
    run_json(home.path(), &["--today", "2026-03-12", "stats", "summary"]);
    let store = SqliteStore::open(&home.path().join("history.db")).unwrap();
    let created = store
        .list_completion_events()
        .unwrap()
        .into_iter()
        .filter(|e| e.date == "2026-03-12")
        .count();
    assert_eq!(created, 2);
}

#[test]
fn test_log_unknown_task_fails() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["--today", TODAY, "log", "done", "nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("nope"));
}

#[test]
fn test_deleted_task_leaves_today() {
    let home = tempfile::tempdir().unwrap();
    let a = add_task(home.path(), "Read", &[]);
    let b = add_task(home.path(), "Run", &[]);
    run_json(home.path(), &["--today", TODAY, "log", "done", &a]);

    let (_, _, code) = run_cli(home.path(), &["task", "delete", &b]);
    assert_eq!(code, 0);

    let today = run_json(home.path(), &["--today", TODAY, "task", "today"]);
    let entries = today.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["id"], a.as_str());

    let day = run_json(home.path(), &["--today", TODAY, "stats", "day"]);
    assert_eq!(day["completion"], 100);
}

#[test]
fn test_timer_is_recorded() {
    let home = tempfile::tempdir().unwrap();
    let a = add_task(home.path(), "Practice", &["--timer"]);

    let logged = run_json(home.path(), &["--today", TODAY, "log", "timer", &a, "125"]);
    assert_eq!(logged["record"]["timers"][&a], 125);

    let today = run_json(home.path(), &["--today", TODAY, "task", "today"]);
    assert_eq!(today[0]["timerSeconds"], 125);
    assert_eq!(today[0]["elapsed"], "2:05");
    assert_eq!(today[0]["completed"], false);
}

#[test]
fn test_chart_days_oldest_first() {
    let home = tempfile::tempdir().unwrap();
    let a = add_task(home.path(), "Read", &[]);
    run_json(home.path(), &["--today", TODAY, "log", "done", &a]);

    let points = run_json(home.path(), &["--today", TODAY, "chart", "days"]);
    let points = points.as_array().unwrap();
    assert_eq!(points.len(), 4);
    assert_eq!(points[3]["date"], TODAY);
    assert_eq!(points[3]["completion"], 100);

    let weeks = run_json(home.path(), &["--today", TODAY, "chart", "weeks", "--n", "2"]);
    assert_eq!(weeks.as_array().unwrap().len(), 2);
}

#[test]
fn test_calendar_month() {
    let home = tempfile::tempdir().unwrap();
    add_task(home.path(), "Read", &[]);

    let grid = run_json(
        home.path(),
        &["--today", TODAY, "calendar", "--year", "2026", "--month", "2"],
    );
    assert_eq!(grid["cells"].as_array().unwrap().len(), 28);
    // 2026-02-01 is a Sunday
    assert_eq!(grid["leading_blanks"], 0);

    let (_, _, code) = run_cli(home.path(), &["calendar", "--month", "13"]);
    assert_eq!(code, 1);
}

#[test]
fn test_remind_at_scheduled_time() {
    let home = tempfile::tempdir().unwrap();
    let a = add_task(home.path(), "Stretch", &["--at", "07:30"]);
    add_task(home.path(), "Read", &[]);

    let due = run_json(home.path(), &["--today", TODAY, "remind", "--at", "07:30"]);
    let due = due.as_array().unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0]["taskId"], a.as_str());
    assert_eq!(due[0]["key"], format!("{a}-{TODAY}-07:30"));

    let due = run_json(home.path(), &["--today", TODAY, "remind", "--at", "07:31"]);
    assert!(due.as_array().unwrap().is_empty());

    run_json(home.path(), &["--today", TODAY, "log", "done", &a]);
    let due = run_json(home.path(), &["--today", TODAY, "remind", "--at", "07:30"]);
    assert!(due.as_array().unwrap().is_empty());
}

#[test]
fn test_config_set_get_reset() {
    let home = tempfile::tempdir().unwrap();

    let (stdout, _, code) = run_cli(home.path(), &["config", "get", "charts.recent_days"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "4");

    let (_, _, code) = run_cli(home.path(), &["config", "set", "charts.recent_days", "6"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(home.path(), &["config", "get", "charts.recent_days"]);
    assert_eq!(stdout.trim(), "6");

    let (_, _, code) = run_cli(home.path(), &["config", "set", "metrics.walk_limit", "0"]);
    assert_eq!(code, 1);
    let (_, _, code) = run_cli(home.path(), &["config", "get", "no.such.key"]);
    assert_eq!(code, 1);

    let (_, _, code) = run_cli(home.path(), &["config", "reset"]);
    assert_eq!(code, 0);
    let config = run_json(home.path(), &["config", "list"]);
    assert_eq!(config["charts"]["recent_days"], 4);
}
