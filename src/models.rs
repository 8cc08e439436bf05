use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BoardError;
use crate::schedule::day_key;

/// How often a recurring task comes around. Fixed when the task is created.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Monthly => "Monthly",
        };
        f.write_str(s)
    }
}

impl FromStr for Frequency {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            _ => Err(BoardError::UnknownFrequency(s.to_string())),
        }
    }
}

/// When a recurring task is due, already normalized to integer sets.
///
/// Weekday numbers run 0-6 starting on Sunday, dates run 1-31.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schedule {
    Daily { days: BTreeSet<u8> },
    /// `None` only comes from legacy records without a day; it never matches.
    Weekly { day: Option<u8> },
    Monthly { dates: BTreeSet<u8> },
}

impl Schedule {
    pub fn frequency(&self) -> Frequency {
        match self {
            Schedule::Daily { .. } => Frequency::Daily,
            Schedule::Weekly { .. } => Frequency::Weekly,
            Schedule::Monthly { .. } => Frequency::Monthly,
        }
    }

    /// A daily schedule covering the whole week, used for chores.
    pub fn every_day() -> Self {
        Schedule::Daily { days: (0..=6).collect() }
    }
}

/// A task that keeps coming back on a schedule.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(from = "StoredRecurringTask", into = "StoredRecurringTask")]
pub struct RecurringTask {
    pub id: u64,
    pub text: String,
    pub schedule: Schedule,
    /// Paused tasks are never due but stay in the list.
    pub paused: bool,
    /// Created by chore rotation; a person has at most one.
    pub is_chore: bool,
    /// Timestamp when the task was created (RFC 3339).
    pub created_at: String,
}

impl RecurringTask {
    pub fn frequency(&self) -> Frequency {
        self.schedule.frequency()
    }
}

/// On-disk layout of a recurring task. Schedule fields have been written both
/// as arrays and as comma separated strings, so they are read loosely here and
/// normalized once when converting into [`RecurringTask`].
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRecurringTask {
    id: u64,
    text: String,
    frequency: Frequency,
    #[serde(default)]
    schedule_days: ScheduleField,
    #[serde(default)]
    schedule_day: ScheduleField,
    #[serde(default)]
    schedule_dates: ScheduleField,
    #[serde(default)]
    paused: bool,
    #[serde(default)]
    is_chore: bool,
    #[serde(default)]
    created_at: String,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(untagged)]
enum ScheduleField {
    List(Vec<Value>),
    Number(i64),
    Text(String),
    #[default]
    Missing,
}

impl ScheduleField {
    fn values(&self) -> Vec<i64> {
        match self {
            ScheduleField::List(items) => items
                .iter()
                .filter_map(|v| match v {
                    Value::Number(n) => n.as_i64(),
                    Value::String(s) => s.trim().parse().ok(),
                    _ => None,
                })
                .collect(),
            ScheduleField::Number(n) => vec![*n],
            ScheduleField::Text(s) => s
                .split(',')
                .filter_map(|part| part.trim().parse().ok())
                .collect(),
            ScheduleField::Missing => Vec::new(),
        }
    }

    fn in_range(&self, lo: i64, hi: i64) -> BTreeSet<u8> {
        self.values()
            .into_iter()
            .filter(|v| (lo..=hi).contains(v))
            .map(|v| v as u8)
            .collect()
    }

    fn from_set(set: &BTreeSet<u8>) -> Self {
        ScheduleField::List(set.iter().map(|v| Value::from(*v)).collect())
    }
}

impl From<StoredRecurringTask> for RecurringTask {
    fn from(raw: StoredRecurringTask) -> Self {
        let schedule = match raw.frequency {
            Frequency::Daily => Schedule::Daily { days: raw.schedule_days.in_range(0, 6) },
            Frequency::Weekly => Schedule::Weekly {
                day: raw.schedule_day.in_range(0, 6).into_iter().next(),
            },
            Frequency::Monthly => Schedule::Monthly { dates: raw.schedule_dates.in_range(1, 31) },
        };
        RecurringTask {
            id: raw.id,
            text: raw.text,
            schedule,
            paused: raw.paused,
            is_chore: raw.is_chore,
            created_at: raw.created_at,
        }
    }
}

impl From<RecurringTask> for StoredRecurringTask {
    fn from(task: RecurringTask) -> Self {
        let empty = BTreeSet::new();
        let (days, day, dates) = match &task.schedule {
            Schedule::Daily { days } => (days, None, &empty),
            Schedule::Weekly { day } => (&empty, *day, &empty),
            Schedule::Monthly { dates } => (&empty, None, dates),
        };
        StoredRecurringTask {
            id: task.id,
            text: task.text,
            frequency: task.schedule.frequency(),
            schedule_days: ScheduleField::from_set(days),
            schedule_day: day.map_or(ScheduleField::Missing, |d| ScheduleField::Number(d as i64)),
            schedule_dates: ScheduleField::from_set(dates),
            paused: task.paused,
            is_chore: task.is_chore,
            created_at: task.created_at,
        }
    }
}

/// A one-off personal task. Completing it deletes it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub created_at: String,
}

/// A named date a person is counting down to.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImportantDate {
    pub id: u64,
    pub name: String,
    pub date: NaiveDate,
    /// Snapshot taken when the date was added; views recompute it.
    #[serde(default)]
    pub days_until: i64,
}

/// Recurring task ids done on `date`. Only meaningful while `date` is today.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompletedToday {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub task_ids: Vec<u64>,
}

impl CompletedToday {
    /// The recorded ids if the record belongs to `today`, otherwise nothing.
    pub fn ids_for(self, today: NaiveDate) -> BTreeSet<u64> {
        if self.date.as_deref() == Some(day_key(today).as_str()) {
            self.task_ids.into_iter().collect()
        } else {
            BTreeSet::new()
        }
    }
}

/// Media time grants used in the week starting on `week_start`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaTimeUsage {
    #[serde(default)]
    pub week_start: Option<String>,
    #[serde(default)]
    pub count: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Urgent,
    #[default]
    Normal,
}

/// An entry on the shared shopping list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingItem {
    pub id: u64,
    pub category: String,
    pub text: String,
    #[serde(default)]
    pub urgency: Urgency,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub created_at: String,
}

/// An entry on the shared household task list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdItem {
    pub id: u64,
    pub category: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub created_at: String,
}

/// A heading the shared lists are grouped under.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    pub emoji: String,
}

impl Category {
    pub fn new(name: &str, emoji: &str) -> Self {
        Category { name: name.to_string(), emoji: emoji.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_string_schedule_is_normalized() {
        let json = r#"{"id":1,"text":"Feed cat","frequency":"daily","scheduleDays":"1, 3,5","scheduleDay":null,"scheduleDates":[]}"#;
        let task: RecurringTask = serde_json::from_str(json).unwrap();
        assert_eq!(task.schedule, Schedule::Daily { days: [1, 3, 5].into_iter().collect() });
        assert!(!task.paused);
        assert!(!task.is_chore);
    }

    #[test]
    fn out_of_range_entries_are_dropped() {
        let json = r#"{"id":2,"text":"Bills","frequency":"monthly","scheduleDates":[0,15,"31",32,"x"]}"#;
        let task: RecurringTask = serde_json::from_str(json).unwrap();
        assert_eq!(task.schedule, Schedule::Monthly { dates: [15, 31].into_iter().collect() });
    }

    #[test]
    fn weekly_day_accepts_numeric_string() {
        let json = r#"{"id":3,"text":"Bins","frequency":"weekly","scheduleDay":"2"}"#;
        let task: RecurringTask = serde_json::from_str(json).unwrap();
        assert_eq!(task.schedule, Schedule::Weekly { day: Some(2) });
    }

    #[test]
    fn written_in_stored_layout() {
        let task = RecurringTask {
            id: 7,
            text: "Dishes".into(),
            schedule: Schedule::every_day(),
            paused: false,
            is_chore: true,
            created_at: String::new(),
        };
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["frequency"], "daily");
        assert_eq!(value["scheduleDays"], serde_json::json!([0, 1, 2, 3, 4, 5, 6]));
        assert!(value["scheduleDay"].is_null());
        assert_eq!(value["isChore"], true);
    }
}
