//! A single person's board: recurring tasks, one-off tasks, important dates,
//! chore rotation and the weekly media time quota.
//!
//! A [`MemberBoard`] is loaded for one calendar day. Per-day and per-week
//! records whose marker does not match that day are treated as empty when
//! loading and overwritten on the next save.

use std::collections::BTreeSet;

use chrono::{NaiveDate, Utc};

use crate::chores::{self, Chore};
use crate::config::HouseholdConfig;
use crate::error::{BoardError, Result};
use crate::models::{CompletedToday, ImportantDate, MediaTimeUsage, RecurringTask, Schedule, Task};
use crate::schedule::{day_key, due_on, is_due, week_start};
use crate::storage::{keys, load_json, load_json_list, save_json, Store};

/// Result of asking for media time.
#[derive(Debug, Clone, PartialEq)]
pub enum QuotaOutcome {
    /// All grants for this week are used up.
    Exhausted { cap: u32 },
    /// Some recurring tasks due today are still open.
    ChoresIncomplete { remaining: Vec<RecurringTask> },
    /// Granted; `count` grants used this week including this one.
    Granted { minutes: u32, count: u32, cap: u32 },
}

/// Picks an id from the current time, moved past `existing` so it stays unique.
pub(crate) fn fresh_id(existing: impl Iterator<Item = u64>) -> u64 {
    let now = Utc::now().timestamp_millis().max(0) as u64;
    match existing.max() {
        Some(max) if max >= now => max + 1,
        _ => now,
    }
}

/// Days from `today` until `date`; negative once it has passed.
pub fn days_until(date: NaiveDate, today: NaiveDate) -> i64 {
    (date - today).num_days()
}

/// Short countdown text for an important date.
pub fn countdown_label(days: i64) -> String {
    match days {
        0 => "Today!".to_string(),
        1 => "Tomorrow".to_string(),
        d if d > 0 => format!("In {} days", d),
        d => format!("{} days ago", d.abs()),
    }
}

pub struct MemberBoard<S: Store> {
    store: S,
    person: String,
    today: NaiveDate,
    reward_minutes: u32,
    weekly_cap: u32,
    chore_partner: Option<String>,
    tasks: Vec<Task>,
    recurring: Vec<RecurringTask>,
    dates: Vec<ImportantDate>,
    completed_today: BTreeSet<u64>,
    current_chore: Option<String>,
    media_usage: MediaTimeUsage,
}

impl<S: Store> MemberBoard<S> {
    /// Loads `person`'s records as of `today`.
    pub fn load(store: S, config: &HouseholdConfig, person: &str, today: NaiveDate) -> Self {
        let tasks: Vec<Task> = load_json_list(&store, &keys::tasks(person));
        let recurring: Vec<RecurringTask> = load_json_list(&store, &keys::recurring(person));
        let dates: Vec<ImportantDate> = load_json_list(&store, &keys::dates(person));
        let current_chore: Option<String> = load_json(&store, &keys::chore(person));

        let completed: CompletedToday = load_json(&store, &keys::completed_today(person));
        let completed_today = completed.ids_for(today);

        let this_week = day_key(week_start(today));
        let usage: MediaTimeUsage = load_json(&store, &keys::media_time_usage(person));
        let media_usage = if usage.week_start.as_deref() == Some(this_week.as_str()) {
            usage
        } else {
            MediaTimeUsage { week_start: Some(this_week), count: 0 }
        };

        MemberBoard {
            store,
            person: person.to_string(),
            today,
            reward_minutes: config.reward_minutes_for(person),
            weekly_cap: config.weekly_media_cap,
            chore_partner: config.chore_partner(person).map(str::to_string),
            tasks,
            recurring,
            dates,
            completed_today,
            current_chore,
            media_usage,
        }
    }

    pub fn person(&self) -> &str {
        &self.person
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Writes every record of this person back to the store.
    pub fn save(&mut self) -> Result<()> {
        let person = self.person.clone();
        save_json(&mut self.store, &keys::tasks(&person), &self.tasks)?;
        save_json(&mut self.store, &keys::recurring(&person), &self.recurring)?;
        save_json(&mut self.store, &keys::dates(&person), &self.dates)?;
        let completed = CompletedToday {
            date: Some(day_key(self.today)),
            task_ids: self.completed_today.iter().copied().collect(),
        };
        save_json(&mut self.store, &keys::completed_today(&person), &completed)?;
        if let Some(chore) = &self.current_chore {
            save_json(&mut self.store, &keys::chore(&person), chore)?;
        }
        save_json(&mut self.store, &keys::media_time_usage(&person), &self.media_usage)?;
        Ok(())
    }

    // ---- recurring tasks ----

    pub fn list_recurring(&self) -> &[RecurringTask] {
        &self.recurring
    }

    pub fn add_recurring(&mut self, text: &str, schedule: Schedule) -> Result<u64> {
        let text = text.trim();
        if text.is_empty() {
            return Err(BoardError::EmptyText);
        }
        let id = fresh_id(self.recurring.iter().map(|t| t.id));
        self.recurring.push(RecurringTask {
            id,
            text: text.to_string(),
            schedule,
            paused: false,
            is_chore: false,
            created_at: Utc::now().to_rfc3339(),
        });
        self.save()?;
        tracing::debug!(person = %self.person, id, "recurring task added");
        Ok(id)
    }

    pub fn delete_recurring(&mut self, id: u64) -> Result<()> {
        let len_before = self.recurring.len();
        self.recurring.retain(|t| t.id != id);
        if self.recurring.len() == len_before {
            return Err(BoardError::NotFound { kind: "recurring task", id });
        }
        self.completed_today.remove(&id);
        self.save()?;
        tracing::debug!(person = %self.person, id, "recurring task deleted");
        Ok(())
    }

    pub fn pause(&mut self, id: u64) -> Result<()> {
        self.set_paused(id, true)
    }

    pub fn resume(&mut self, id: u64) -> Result<()> {
        self.set_paused(id, false)
    }

    fn set_paused(&mut self, id: u64, paused: bool) -> Result<()> {
        let task = self
            .recurring
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(BoardError::NotFound { kind: "recurring task", id })?;
        if task.paused == paused {
            return Ok(());
        }
        task.paused = paused;
        self.save()?;
        tracing::debug!(person = %self.person, id, paused, "recurring task pause state changed");
        Ok(())
    }

    /// Recurring tasks still open on the board's day.
    pub fn due_today(&self) -> Vec<&RecurringTask> {
        due_on(&self.recurring, &self.completed_today, self.today)
    }

    /// Recurring tasks due on `date`. Same-day completions only count when
    /// `date` is the board's day.
    pub fn due_on(&self, date: NaiveDate) -> Vec<&RecurringTask> {
        if date == self.today {
            self.due_today()
        } else {
            self.recurring.iter().filter(|t| is_due(t, date)).collect()
        }
    }

    pub fn completed_today(&self) -> &BTreeSet<u64> {
        &self.completed_today
    }

    /// Marks a recurring task done for today. The task itself is kept.
    pub fn complete_today(&mut self, id: u64) -> Result<()> {
        if !self.recurring.iter().any(|t| t.id == id) {
            return Err(BoardError::NotFound { kind: "recurring task", id });
        }
        if self.completed_today.insert(id) {
            self.save()?;
            tracing::debug!(person = %self.person, id, "recurring task done for today");
        }
        Ok(())
    }

    // ---- media time ----

    pub fn media_usage(&self) -> &MediaTimeUsage {
        &self.media_usage
    }

    pub fn weekly_cap(&self) -> u32 {
        self.weekly_cap
    }

    /// Grants media time when the weekly cap allows it and nothing due today
    /// is left open. Refusals leave all state untouched.
    pub fn check_quota(&mut self) -> Result<QuotaOutcome> {
        if self.media_usage.count >= self.weekly_cap {
            tracing::debug!(person = %self.person, count = self.media_usage.count, "media time exhausted");
            return Ok(QuotaOutcome::Exhausted { cap: self.weekly_cap });
        }

        let remaining: Vec<RecurringTask> = self.due_today().into_iter().cloned().collect();
        if !remaining.is_empty() {
            tracing::debug!(person = %self.person, open = remaining.len(), "media time refused, chores open");
            return Ok(QuotaOutcome::ChoresIncomplete { remaining });
        }

        self.media_usage.count += 1;
        self.save()?;
        tracing::debug!(person = %self.person, count = self.media_usage.count, "media time granted");
        Ok(QuotaOutcome::Granted {
            minutes: self.reward_minutes,
            count: self.media_usage.count,
            cap: self.weekly_cap,
        })
    }

    // ---- chores ----

    pub fn current_chore(&self) -> Option<&str> {
        self.current_chore.as_deref()
    }

    /// The chore that would follow `current` in the rotation.
    pub fn next_chore(&self, current: Option<&str>) -> Chore {
        chores::next_chore(current)
    }

    /// Replaces this person's chore task with a fresh every-day task for
    /// `chore`. The linked partner's current chore is set to the same chore.
    pub fn assign_chore(&mut self, chore: Chore) -> Result<u64> {
        self.recurring.retain(|t| !t.is_chore);
        let id = fresh_id(self.recurring.iter().map(|t| t.id));
        self.recurring.push(RecurringTask {
            id,
            text: chore.name().to_string(),
            schedule: Schedule::every_day(),
            paused: false,
            is_chore: true,
            created_at: Utc::now().to_rfc3339(),
        });
        self.current_chore = Some(chore.name().to_string());

        if let Some(partner) = self.chore_partner.clone() {
            save_json(&mut self.store, &keys::chore(&partner), chore.name())?;
            tracing::debug!(person = %self.person, partner = %partner, chore = %chore, "chore mirrored to partner");
        }

        self.save()?;
        tracing::debug!(person = %self.person, chore = %chore, id, "chore assigned");
        Ok(id)
    }

    // ---- one-off tasks ----

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn add_task(&mut self, text: &str) -> Result<u64> {
        if text.trim().is_empty() {
            return Err(BoardError::EmptyText);
        }
        let id = fresh_id(self.tasks.iter().map(|t| t.id));
        self.tasks.push(Task {
            id,
            text: text.to_string(),
            completed: false,
            created_at: Utc::now().to_rfc3339(),
        });
        self.save()?;
        tracing::debug!(person = %self.person, id, "task added");
        Ok(id)
    }

    /// Completing a one-off task removes it.
    pub fn complete_task(&mut self, id: u64) -> Result<()> {
        let len_before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == len_before {
            return Err(BoardError::NotFound { kind: "task", id });
        }
        self.save()?;
        tracing::debug!(person = %self.person, id, "task completed");
        Ok(())
    }

    // ---- important dates ----

    pub fn important_dates(&self) -> &[ImportantDate] {
        &self.dates
    }

    /// Adds a date and keeps the list in date order.
    pub fn add_important_date(&mut self, name: &str, date: NaiveDate) -> Result<u64> {
        if name.trim().is_empty() {
            return Err(BoardError::EmptyText);
        }
        let id = fresh_id(self.dates.iter().map(|d| d.id));
        self.dates.push(ImportantDate {
            id,
            name: name.to_string(),
            date,
            days_until: days_until(date, self.today),
        });
        self.dates.sort_by_key(|d| d.date);
        self.save()?;
        tracing::debug!(person = %self.person, id, %date, "important date added");
        Ok(id)
    }

    pub fn delete_important_date(&mut self, id: u64) -> Result<()> {
        let len_before = self.dates.len();
        self.dates.retain(|d| d.id != id);
        if self.dates.len() == len_before {
            return Err(BoardError::NotFound { kind: "date", id });
        }
        self.save()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_stay_unique() {
        let far_future = u64::MAX / 2;
        assert_eq!(fresh_id([far_future].into_iter()), far_future + 1);
        let a = fresh_id(std::iter::empty());
        assert!(fresh_id([a].into_iter()) > a);
    }

    #[test]
    fn countdown_labels() {
        assert_eq!(countdown_label(0), "Today!");
        assert_eq!(countdown_label(1), "Tomorrow");
        assert_eq!(countdown_label(12), "In 12 days");
        assert_eq!(countdown_label(-3), "3 days ago");
    }
}
