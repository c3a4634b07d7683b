//! Habit task model.
//!
//! Tasks are recurring daily items. They are never physically removed
//! once history references them; deleting a task flips `active` to false.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::history::DayRecord;

/// Task priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Sort weight, higher first.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(ValidationError::InvalidPriority(s.to_string())),
        }
    }
}

/// A recurring daily task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub has_timer: bool,
    /// Reminder time of day, minute precision, serialized as `HH:MM`.
    #[serde(default, with = "hhmm")]
    pub scheduled_time: Option<NaiveTime>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Task {
    /// Create a new active task with a generated id.
    ///
    /// # Errors
    /// Returns [`ValidationError::EmptyName`] if `name` is blank.
    pub fn new(
        name: &str,
        priority: Priority,
        has_timer: bool,
        scheduled_time: Option<NaiveTime>,
    ) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            priority,
            has_timer,
            scheduled_time,
            active: true,
        })
    }

    /// `HH:MM` form of the scheduled time, if any.
    pub fn scheduled_hhmm(&self) -> Option<String> {
        self.scheduled_time.map(|t| t.format("%H:%M").to_string())
    }
}

/// Parse an `HH:MM` time of day.
pub fn parse_hhmm(raw: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|_| ValidationError::InvalidTime(raw.to_string()))
}

/// Ids of all tasks that are not soft-deleted.
pub fn active_task_ids(tasks: &[Task]) -> BTreeSet<String> {
    tasks
        .iter()
        .filter(|t| t.active)
        .map(|t| t.id.clone())
        .collect()
}

/// The day's checklist in display order.
///
/// Only assigned tasks that are known are kept. Incomplete tasks come
/// before completed ones, then higher priority first; ties keep the
/// order of `tasks`.
pub fn order_for_day<'a>(tasks: &'a [Task], record: &DayRecord) -> Vec<&'a Task> {
    let mut day: Vec<&Task> = tasks
        .iter()
        .filter(|t| record.is_assigned(&t.id))
        .collect();

    day.sort_by(|a, b| {
        let a_done = record.is_completed(&a.id);
        let b_done = record.is_completed(&b.id);
        a_done
            .cmp(&b_done)
            .then_with(|| b.priority.rank().cmp(&a.priority.rank()))
    });
    day
}

/// Format elapsed timer seconds as `M:SS`, or `H:MM:SS` from one hour up.
pub fn format_elapsed(total_seconds: u64) -> String {
    let h = total_seconds / 3600;
    let m = (total_seconds % 3600) / 60;
    let s = total_seconds % 60;
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(t) => s.serialize_str(&t.format("%H:%M").to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => super::parse_hhmm(s)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn task(id: &str, priority: Priority) -> Task {
        Task {
            id: id.to_string(),
            name: format!("Task {id}"),
            priority,
            has_timer: false,
            scheduled_time: None,
            active: true,
        }
    }

    #[test]
    fn test_priority_parse() {
        assert_eq!("high".parse::<Priority>(), Ok(Priority::High));
        assert_eq!(" Low ".parse::<Priority>(), Ok(Priority::Low));
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_new_task_rejects_blank_name() {
        assert_eq!(
            Task::new("   ", Priority::High, false, None),
            Err(ValidationError::EmptyName)
        );
        let t = Task::new(" Read ", Priority::Low, true, None).unwrap();
        assert_eq!(t.name, "Read");
        assert!(t.active);
        assert!(!t.id.is_empty());
    }

    #[test]
    fn test_active_task_ids_skips_deleted() {
        let mut gone = task("b", Priority::Low);
        gone.active = false;
        let ids = active_task_ids(&[task("a", Priority::High), gone]);
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec!["a".to_string()]);
    }

    #[test]
    fn test_order_for_day() {
        let tasks = vec![
            task("low", Priority::Low),
            task("high", Priority::High),
            task("med", Priority::Medium),
            task("done-high", Priority::High),
            task("unassigned", Priority::High),
        ];
        let mut record = DayRecord::new(NaiveDate::from_ymd_opt(2026, 2, 17).unwrap());
        for id in ["low", "high", "med", "done-high"] {
            record.assign(id);
        }
        record.complete("done-high");

        let ids: Vec<_> = order_for_day(&tasks, &record)
            .into_iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["high", "med", "low", "done-high"]);
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "0:00");
        assert_eq!(format_elapsed(75), "1:15");
        assert_eq!(format_elapsed(3600), "1:00:00");
        assert_eq!(format_elapsed(3725), "1:02:05");
    }

    #[test]
    fn test_scheduled_time_serde() {
        let mut t = task("a", Priority::High);
        t.scheduled_time = Some(parse_hhmm("07:30").unwrap());
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["scheduledTime"], "07:30");

        let back: Task = serde_json::from_value(json).unwrap();
        assert_eq!(back, t);

        let bare: Task = serde_json::from_str(r#"{"id":"x","name":"Walk"}"#).unwrap();
        assert_eq!(bare.scheduled_time, None);
        assert!(bare.active);
        assert_eq!(bare.priority, Priority::Medium);
    }

    #[test]
    fn test_parse_hhmm_rejects_garbage() {
        assert!(parse_hhmm("25:00").is_err());
        assert!(parse_hhmm("7pm").is_err());
    }
}
