//! Household overview counts, as shown on the home screen badges.

use chrono::NaiveDate;

use crate::config::HouseholdConfig;
use crate::models::{CompletedToday, HouseholdItem, RecurringTask, ShoppingItem, Task, Urgency};
use crate::schedule::due_on;
use crate::storage::{keys, load_json, load_json_list, Store};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberCounts {
    pub name: String,
    /// One-off tasks on the member's list.
    pub tasks: usize,
    /// Recurring tasks due today and not yet done.
    pub due_today: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HouseholdSummary {
    pub members: Vec<MemberCounts>,
    pub shopping_urgent: usize,
    pub shopping_normal: usize,
    pub household_tasks: usize,
}

/// Counts for every configured member plus the shared lists. Read-only.
pub fn household_summary<S: Store + ?Sized>(
    store: &S,
    config: &HouseholdConfig,
    today: NaiveDate,
) -> HouseholdSummary {
    let members = config
        .members
        .iter()
        .map(|name| {
            let tasks: Vec<Task> = load_json_list(store, &keys::tasks(name));
            let recurring: Vec<RecurringTask> = load_json_list(store, &keys::recurring(name));
            let completed: CompletedToday = load_json(store, &keys::completed_today(name));
            let done = completed.ids_for(today);
            MemberCounts {
                name: name.clone(),
                tasks: tasks.len(),
                due_today: due_on(&recurring, &done, today).len(),
            }
        })
        .collect();

    let shopping: Vec<ShoppingItem> = load_json_list(store, keys::SHOPPING_LIST);
    let household: Vec<HouseholdItem> = load_json_list(store, keys::TASKS_LIST);

    HouseholdSummary {
        members,
        shopping_urgent: shopping.iter().filter(|i| i.urgency == Urgency::Urgent).count(),
        shopping_normal: shopping.iter().filter(|i| i.urgency == Urgency::Normal).count(),
        household_tasks: household.len(),
    }
}
