use chrono::NaiveDate;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::board::{countdown_label, days_until, MemberBoard, QuotaOutcome};
use crate::chores::Chore;
use crate::config::HouseholdConfig;
use crate::error::{BoardError, Result};
use crate::lists::{HouseholdList, ShoppingList};
use crate::models::{Frequency, Urgency};
use crate::schedule::{describe, parse_schedule};
use crate::storage::Store;
use crate::summary::household_summary;

/// Who is acting, on which day, and whether to print anything.
pub struct CommandContext {
    pub config: HouseholdConfig,
    pub member: String,
    pub today: NaiveDate,
    pub silent: bool,
}

impl CommandContext {
    fn board<'s, S: Store>(&self, store: &'s mut S) -> MemberBoard<&'s mut S> {
        MemberBoard::load(store, &self.config, &self.member, self.today)
    }

    fn say(&self, msg: impl AsRef<str>) {
        if !self.silent {
            println!("{}", msg.as_ref());
        }
    }

    /// Prints `ok` on success, the error as a notice otherwise.
    fn report<T>(&self, result: Result<T>, ok: impl FnOnce(T) -> String) {
        match result {
            Ok(v) => self.say(ok(v)),
            Err(e) => {
                if !self.silent {
                    eprintln!("{}", e);
                }
            }
        }
    }

    fn require_chores(&self) -> Result<()> {
        if self.config.has_chores(&self.member) {
            Ok(())
        } else {
            Err(BoardError::NotEnabled { person: self.member.clone(), feature: "chore rotation" })
        }
    }

    fn require_media_time(&self) -> Result<()> {
        if self.config.has_media_time(&self.member) {
            Ok(())
        } else {
            Err(BoardError::NotEnabled { person: self.member.clone(), feature: "media time" })
        }
    }
}

fn header(names: &[&str]) -> Vec<Cell> {
    names.iter().map(|n| Cell::new(n).add_attribute(Attribute::Bold)).collect()
}

fn new_table(names: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header(names));
    table
}

/// Adds a recurring task. `schedule` is read according to `frequency`.
pub fn cmd_recurring_add<S: Store>(store: &mut S, ctx: &CommandContext, text: &str, frequency: &str, schedule: &str) {
    let result = frequency
        .parse::<Frequency>()
        .and_then(|f| parse_schedule(f, schedule))
        .and_then(|s| ctx.board(store).add_recurring(text, s));
    ctx.report(result, |id| format!("Recurring task added (id = {})", id));
}

/// Lists every recurring task, paused ones included.
pub fn cmd_recurring_list<S: Store>(store: &mut S, ctx: &CommandContext) {
    let board = ctx.board(store);
    if board.list_recurring().is_empty() {
        ctx.say("No recurring tasks.");
        return;
    }
    let due: Vec<u64> = board.due_today().iter().map(|t| t.id).collect();

    let mut table = new_table(&["ID", "Task", "Frequency", "Schedule", "Status", "Today"]);
    for t in board.list_recurring() {
        let today = if board.completed_today().contains(&t.id) {
            Cell::new("Done").fg(Color::Green)
        } else if due.contains(&t.id) {
            Cell::new("Due").fg(Color::Yellow)
        } else {
            Cell::new("-")
        };
        let status = if t.paused {
            Cell::new("Paused").fg(Color::Grey)
        } else if t.is_chore {
            Cell::new("Chore").fg(Color::Cyan)
        } else {
            Cell::new("Active")
        };
        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(&t.text),
            Cell::new(t.frequency()),
            Cell::new(describe(&t.schedule)),
            status,
            today,
        ]);
    }
    ctx.say(format!("{table}"));
}

pub fn cmd_recurring_remove<S: Store>(store: &mut S, ctx: &CommandContext, id: u64) {
    let result = ctx.board(store).delete_recurring(id);
    ctx.report(result, |_| format!("Recurring task {} removed.", id));
}

pub fn cmd_pause<S: Store>(store: &mut S, ctx: &CommandContext, id: u64) {
    let result = ctx.board(store).pause(id);
    ctx.report(result, |_| format!("Recurring task {} paused.", id));
}

pub fn cmd_resume<S: Store>(store: &mut S, ctx: &CommandContext, id: u64) {
    let result = ctx.board(store).resume(id);
    ctx.report(result, |_| format!("Recurring task {} resumed.", id));
}

/// Shows the recurring tasks still open today.
pub fn cmd_today<S: Store>(store: &mut S, ctx: &CommandContext) {
    let board = ctx.board(store);
    let due = board.due_today();
    if due.is_empty() {
        ctx.say("No tasks due today");
        return;
    }
    let mut table = new_table(&["ID", "Task", "Schedule", "Frequency"]);
    for t in due {
        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(&t.text),
            Cell::new(describe(&t.schedule)),
            Cell::new(t.frequency()),
        ]);
    }
    ctx.say(format!("{table}"));
}

/// Marks a recurring task done for today.
pub fn cmd_done<S: Store>(store: &mut S, ctx: &CommandContext, id: u64) {
    let result = ctx.board(store).complete_today(id);
    ctx.report(result, |_| format!("Recurring task {} done for today.", id));
}

pub fn cmd_task_add<S: Store>(store: &mut S, ctx: &CommandContext, text: &str) {
    let result = ctx.board(store).add_task(text);
    ctx.report(result, |id| format!("Task added (id = {})", id));
}

pub fn cmd_task_list<S: Store>(store: &mut S, ctx: &CommandContext) {
    let board = ctx.board(store);
    if board.tasks().is_empty() {
        ctx.say("No tasks yet.");
        return;
    }
    let mut table = new_table(&["ID", "Task"]);
    for t in board.tasks() {
        table.add_row(vec![Cell::new(t.id), Cell::new(&t.text)]);
    }
    ctx.say(format!("{table}"));
}

/// Completes a one-off task, which removes it.
pub fn cmd_task_complete<S: Store>(store: &mut S, ctx: &CommandContext, id: u64) {
    let result = ctx.board(store).complete_task(id);
    ctx.report(result, |_| format!("Task {} completed.", id));
}

pub fn cmd_date_add<S: Store>(store: &mut S, ctx: &CommandContext, name: &str, date: &str) {
    let result = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| BoardError::InvalidDate(date.to_string()))
        .and_then(|d| ctx.board(store).add_important_date(name, d));
    ctx.report(result, |id| format!("Date added (id = {})", id));
}

pub fn cmd_date_list<S: Store>(store: &mut S, ctx: &CommandContext) {
    let board = ctx.board(store);
    if board.important_dates().is_empty() {
        ctx.say("No important dates yet.");
        return;
    }
    let mut table = new_table(&["ID", "Event", "Date", "When"]);
    for d in board.important_dates() {
        let days = days_until(d.date, ctx.today);
        let color = match days {
            0 => Color::Green,
            1..=7 => Color::Yellow,
            d if d < 0 => Color::Grey,
            _ => Color::Reset,
        };
        table.add_row(vec![
            Cell::new(d.id),
            Cell::new(&d.name),
            Cell::new(d.date.format("%b %-d, %Y")),
            Cell::new(countdown_label(days)).fg(color),
        ]);
    }
    ctx.say(format!("{table}"));
}

pub fn cmd_date_remove<S: Store>(store: &mut S, ctx: &CommandContext, id: u64) {
    let result = ctx.board(store).delete_important_date(id);
    ctx.report(result, |_| format!("Date {} removed.", id));
}

pub fn cmd_chore_show<S: Store>(store: &mut S, ctx: &CommandContext) {
    if let Err(e) = ctx.require_chores() {
        ctx.report::<()>(Err(e), |_| String::new());
        return;
    }
    let board = ctx.board(store);
    match board.current_chore() {
        Some(name) => {
            let icon = name.parse::<Chore>().map(|c| c.icon()).unwrap_or("");
            ctx.say(format!("Current chore: {} {}", icon, name));
            ctx.say(format!("Next in rotation: {}", board.next_chore(Some(name))));
        }
        None => ctx.say("No chore assigned yet."),
    }
}

/// Assigns `chore`, or the next one in the rotation when none is given.
pub fn cmd_chore_assign<S: Store>(store: &mut S, ctx: &CommandContext, chore: Option<String>) {
    let result = ctx.require_chores().and_then(|_| {
        let mut board = ctx.board(store);
        let chore = match chore {
            Some(name) => name.parse::<Chore>()?,
            None => board.next_chore(board.current_chore()),
        };
        board.assign_chore(chore).map(|_| chore)
    });
    ctx.report(result, |chore| format!("{} {} chore assigned for all days!", chore.icon(), chore));
}

/// Claims media time if today's chores are done and the week allows it.
pub fn cmd_media<S: Store>(store: &mut S, ctx: &CommandContext) {
    let result = ctx.require_media_time().and_then(|_| ctx.board(store).check_quota());
    ctx.report(result, |outcome| match outcome {
        QuotaOutcome::Exhausted { .. } => "Media time used up this week!".to_string(),
        QuotaOutcome::ChoresIncomplete { remaining } => {
            let names: Vec<&str> = remaining.iter().map(|t| t.text.as_str()).collect();
            format!("Do your chores first! Still open: {}", names.join(", "))
        }
        QuotaOutcome::Granted { minutes, count, cap } => format!(
            "You can now do {} minutes of media! ({}/{} times used this week)",
            minutes, count, cap
        ),
    });
}

pub fn cmd_shopping_add<S: Store>(store: &mut S, ctx: &CommandContext, category: &str, text: &str, urgent: bool) {
    let urgency = if urgent { Urgency::Urgent } else { Urgency::Normal };
    let result = ShoppingList::load(store).and_then(|mut list| list.add(category, text, urgency));
    ctx.report(result, |id| format!("Item added (id = {})", id));
}

pub fn cmd_shopping_list<S: Store>(store: &mut S, ctx: &CommandContext) {
    let list = match ShoppingList::load(store) {
        Ok(list) => list,
        Err(e) => return ctx.report::<()>(Err(e), |_| String::new()),
    };
    let mut table = new_table(&["ID", "Category", "Item", "Urgency"]);
    for cat in list.categories() {
        for item in list.in_category(&cat.name) {
            let urgency = match item.urgency {
                Urgency::Urgent => Cell::new("Urgent").fg(Color::Red),
                Urgency::Normal => Cell::new("Normal").fg(Color::Green),
            };
            table.add_row(vec![
                Cell::new(item.id),
                Cell::new(format!("{} {}", cat.emoji, cat.name)),
                Cell::new(&item.text),
                urgency,
            ]);
        }
    }
    // Items filed under a category that is not configured.
    for item in list.items() {
        if !list.categories().iter().any(|c| c.name == item.category) {
            table.add_row(vec![
                Cell::new(item.id),
                Cell::new(&item.category),
                Cell::new(&item.text),
                Cell::new(format!("{:?}", item.urgency)),
            ]);
        }
    }
    if list.is_empty() {
        ctx.say("No items yet");
    } else {
        ctx.say(format!("{table}"));
    }
}

pub fn cmd_shopping_remove<S: Store>(store: &mut S, ctx: &CommandContext, id: u64) {
    let result = ShoppingList::load(store).and_then(|mut list| list.delete(id));
    ctx.report(result, |_| format!("Item {} removed.", id));
}

pub fn cmd_shopping_complete<S: Store>(store: &mut S, ctx: &CommandContext, id: u64) {
    let result = ShoppingList::load(store).and_then(|mut list| list.complete(id));
    ctx.report(result, |_| format!("Item {} checked off.", id));
}

pub fn cmd_household_add<S: Store>(store: &mut S, ctx: &CommandContext, category: &str, text: &str) {
    let result = HouseholdList::load(store).and_then(|mut list| list.add(category, text));
    ctx.report(result, |id| format!("Task added (id = {})", id));
}

pub fn cmd_household_list<S: Store>(store: &mut S, ctx: &CommandContext) {
    let list = match HouseholdList::load(store) {
        Ok(list) => list,
        Err(e) => return ctx.report::<()>(Err(e), |_| String::new()),
    };
    if list.is_empty() {
        ctx.say("No tasks yet");
        return;
    }
    let mut table = new_table(&["ID", "Category", "Task"]);
    for item in list.items() {
        let category = list
            .categories()
            .iter()
            .find(|c| c.name == item.category)
            .map(|c| format!("{} {}", c.emoji, c.name))
            .unwrap_or_else(|| item.category.clone());
        table.add_row(vec![Cell::new(item.id), Cell::new(category), Cell::new(&item.text)]);
    }
    ctx.say(format!("{table}"));
}

pub fn cmd_household_remove<S: Store>(store: &mut S, ctx: &CommandContext, id: u64) {
    let result = HouseholdList::load(store).and_then(|mut list| list.delete(id));
    ctx.report(result, |_| format!("Task {} removed.", id));
}

pub fn cmd_household_complete<S: Store>(store: &mut S, ctx: &CommandContext, id: u64) {
    let result = HouseholdList::load(store).and_then(|mut list| list.complete(id));
    ctx.report(result, |_| format!("Task {} completed.", id));
}

/// Badge counts for the whole household.
pub fn cmd_summary<S: Store>(store: &S, ctx: &CommandContext) {
    let summary = household_summary(store, &ctx.config, ctx.today);
    let mut table = new_table(&["Member", "Tasks", "Due today"]);
    for m in &summary.members {
        let due = if m.due_today > 0 {
            Cell::new(m.due_today).fg(Color::Yellow)
        } else {
            Cell::new(m.due_today)
        };
        table.add_row(vec![Cell::new(&m.name), Cell::new(m.tasks), due]);
    }
    ctx.say(format!("{table}"));
    ctx.say(format!(
        "Shopping: {} urgent, {} normal | Household tasks: {}",
        summary.shopping_urgent, summary.shopping_normal, summary.household_tasks
    ));
}
