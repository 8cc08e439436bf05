use std::collections::BTreeSet;

use chrono::NaiveDate;
use homeboard::board::{MemberBoard, QuotaOutcome};
use homeboard::chores::Chore;
use homeboard::config::HouseholdConfig;
use homeboard::error::BoardError;
use homeboard::lists::ShoppingList;
use homeboard::models::{CompletedToday, MediaTimeUsage, Schedule, Urgency};
use homeboard::schedule::{day_key, week_start};
use homeboard::storage::{keys, load_json, save_json, MemoryStore, Store};
use homeboard::summary::household_summary;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn daily(days: &[u8]) -> Schedule {
    Schedule::Daily { days: days.iter().copied().collect::<BTreeSet<u8>>() }
}

fn monthly(dates: &[u8]) -> Schedule {
    Schedule::Monthly { dates: dates.iter().copied().collect::<BTreeSet<u8>>() }
}

fn sunday() -> NaiveDate {
    date(2026, 10, 18)
}

fn due_ids(store: &mut MemoryStore, config: &HouseholdConfig, person: &str, on: NaiveDate) -> Vec<u64> {
    let board = MemberBoard::load(store, config, person, on);
    board.due_today().iter().map(|t| t.id).collect()
}

#[test]
fn test_daily_task_due_on_selected_weekdays() {
    let config = HouseholdConfig::default();
    let mut store = MemoryStore::new();
    let id = MemberBoard::load(&mut store, &config, "Aiden", sunday())
        .add_recurring("Feed the cat", daily(&[1, 3, 5]))
        .unwrap();

    for offset in 0..7 {
        let day = sunday() + chrono::Duration::days(offset);
        let due = due_ids(&mut store, &config, "Aiden", day);
        let expected = matches!(offset, 1 | 3 | 5);
        assert_eq!(due.contains(&id), expected, "{}", day);
    }
}

#[test]
fn test_weekly_task_due_on_its_day_only() {
    let config = HouseholdConfig::default();
    let mut store = MemoryStore::new();
    let id = MemberBoard::load(&mut store, &config, "Liah", sunday())
        .add_recurring("Take out bins", Schedule::Weekly { day: Some(2) })
        .unwrap();

    assert_eq!(due_ids(&mut store, &config, "Liah", date(2026, 10, 20)), vec![id]);
    assert!(due_ids(&mut store, &config, "Liah", date(2026, 10, 21)).is_empty());
    assert_eq!(due_ids(&mut store, &config, "Liah", date(2026, 10, 27)), vec![id]);
}

#[test]
fn test_monthly_31st_skips_short_months() {
    let config = HouseholdConfig::default();
    let mut store = MemoryStore::new();
    let id = MemberBoard::load(&mut store, &config, "Toby", sunday())
        .add_recurring("Pay allowance", monthly(&[31]))
        .unwrap();

    assert_eq!(due_ids(&mut store, &config, "Toby", date(2026, 1, 31)), vec![id]);
    assert!(due_ids(&mut store, &config, "Toby", date(2026, 2, 28)).is_empty());
    assert!(due_ids(&mut store, &config, "Toby", date(2026, 3, 1)).is_empty());
}

#[test]
fn test_paused_task_is_never_due() {
    let config = HouseholdConfig::default();
    let mut store = MemoryStore::new();
    let mut board = MemberBoard::load(&mut store, &config, "Aiden", sunday());
    let id = board.add_recurring("Water plants", Schedule::every_day()).unwrap();
    board.pause(id).unwrap();
    board.pause(id).unwrap();

    for offset in 0..7 {
        let day = sunday() + chrono::Duration::days(offset);
        assert!(board.due_on(day).is_empty());
    }
    assert_eq!(board.list_recurring().len(), 1);

    board.resume(id).unwrap();
    assert_eq!(board.due_today().len(), 1);
}

#[test]
fn test_complete_today_is_idempotent() {
    let config = HouseholdConfig::default();
    let mut store = MemoryStore::new();
    let mut board = MemberBoard::load(&mut store, &config, "Aiden", sunday());
    let id = board.add_recurring("Make bed", Schedule::every_day()).unwrap();

    board.complete_today(id).unwrap();
    board.complete_today(id).unwrap();
    assert_eq!(board.completed_today().len(), 1);
    assert!(board.due_today().is_empty());
    assert_eq!(board.list_recurring().len(), 1);

    let stored: CompletedToday = load_json(&store, &keys::completed_today("Aiden"));
    assert_eq!(stored.task_ids, vec![id]);
    assert_eq!(stored.date.as_deref(), Some("Sun Oct 18 2026"));
}

#[test]
fn test_completion_record_resets_on_a_new_day() {
    let config = HouseholdConfig::default();
    let mut store = MemoryStore::new();
    let mut board = MemberBoard::load(&mut store, &config, "Liah", sunday());
    let id = board.add_recurring("Make bed", Schedule::every_day()).unwrap();
    board.complete_today(id).unwrap();

    let monday = date(2026, 10, 19);
    let board = MemberBoard::load(&mut store, &config, "Liah", monday);
    assert!(board.completed_today().is_empty());
    assert_eq!(board.due_today().len(), 1);

    // Loading alone leaves Sunday's record in place.
    let stored: CompletedToday = load_json(&store, &keys::completed_today("Liah"));
    assert_eq!(stored.date.as_deref(), Some("Sun Oct 18 2026"));
    assert_eq!(stored.task_ids, vec![id]);

    let mut board = MemberBoard::load(&mut store, &config, "Liah", monday);
    board.add_task("Pack gym bag").unwrap();
    let stored: CompletedToday = load_json(&store, &keys::completed_today("Liah"));
    assert_eq!(stored.date.as_deref(), Some("Mon Oct 19 2026"));
    assert!(stored.task_ids.is_empty());
}

#[test]
fn test_unknown_ids_are_not_found() {
    let config = HouseholdConfig::default();
    let mut store = MemoryStore::new();
    let mut board = MemberBoard::load(&mut store, &config, "Aiden", sunday());

    assert!(matches!(board.complete_today(42), Err(BoardError::NotFound { id: 42, .. })));
    assert!(matches!(board.pause(42), Err(BoardError::NotFound { .. })));
    assert!(matches!(board.delete_recurring(42), Err(BoardError::NotFound { .. })));
    assert!(board.completed_today().is_empty());
    assert_eq!(store.get(&keys::completed_today("Aiden")), None);
}

#[test]
fn test_quota_refuses_when_cap_reached() {
    let config = HouseholdConfig::default();
    let mut store = MemoryStore::new();
    let usage = MediaTimeUsage { week_start: Some(day_key(week_start(sunday()))), count: 3 };
    save_json(&mut store, &keys::media_time_usage("Aiden"), &usage).unwrap();

    let mut board = MemberBoard::load(&mut store, &config, "Aiden", sunday());
    assert_eq!(board.check_quota().unwrap(), QuotaOutcome::Exhausted { cap: 3 });
    assert_eq!(board.media_usage().count, 3);
}

#[test]
fn test_quota_grants_with_nothing_due() {
    let config = HouseholdConfig::default();
    let mut store = MemoryStore::new();

    let mut board = MemberBoard::load(&mut store, &config, "Aiden", sunday());
    assert_eq!(
        board.check_quota().unwrap(),
        QuotaOutcome::Granted { minutes: 30, count: 1, cap: 3 }
    );

    let mut board = MemberBoard::load(&mut store, &config, "Llewyn", sunday());
    assert_eq!(
        board.check_quota().unwrap(),
        QuotaOutcome::Granted { minutes: 15, count: 1, cap: 3 }
    );
}

#[test]
fn test_quota_waits_for_chores_then_grants() {
    let config = HouseholdConfig::default();
    let mut store = MemoryStore::new();
    let mut board = MemberBoard::load(&mut store, &config, "Aiden", sunday());
    let id = board.assign_chore(Chore::Dishes).unwrap();

    match board.check_quota().unwrap() {
        QuotaOutcome::ChoresIncomplete { remaining } => {
            assert_eq!(remaining.len(), 1);
            assert_eq!(remaining[0].id, id);
        }
        other => panic!("expected refusal, got {:?}", other),
    }
    assert_eq!(board.media_usage().count, 0);

    board.complete_today(id).unwrap();
    assert_eq!(
        board.check_quota().unwrap(),
        QuotaOutcome::Granted { minutes: 30, count: 1, cap: 3 }
    );
}

#[test]
fn test_quota_count_resets_each_week() {
    let config = HouseholdConfig::default();
    let mut store = MemoryStore::new();
    let saturday = date(2026, 10, 24);
    let mut board = MemberBoard::load(&mut store, &config, "Liah", saturday);
    for _ in 0..3 {
        board.check_quota().unwrap();
    }
    assert_eq!(board.check_quota().unwrap(), QuotaOutcome::Exhausted { cap: 3 });

    let next_sunday = date(2026, 10, 25);
    let mut board = MemberBoard::load(&mut store, &config, "Liah", next_sunday);
    assert_eq!(board.media_usage().count, 0);
    assert!(matches!(board.check_quota().unwrap(), QuotaOutcome::Granted { count: 1, .. }));

    let stored: MediaTimeUsage = load_json(&store, &keys::media_time_usage("Liah"));
    assert_eq!(stored.week_start.as_deref(), Some("Sun Oct 25 2026"));
}

#[test]
fn test_assign_chore_replaces_previous_chore_task() {
    let config = HouseholdConfig::default();
    let mut store = MemoryStore::new();
    let mut board = MemberBoard::load(&mut store, &config, "Aiden", sunday());
    board.add_recurring("Homework", Schedule::every_day()).unwrap();

    let first = board.next_chore(board.current_chore());
    assert_eq!(first, Chore::Dishes);
    board.assign_chore(first).unwrap();
    let second = board.next_chore(board.current_chore());
    assert_eq!(second, Chore::Trash);
    board.assign_chore(second).unwrap();

    let chores: Vec<_> = board.list_recurring().iter().filter(|t| t.is_chore).collect();
    assert_eq!(chores.len(), 1);
    assert_eq!(chores[0].text, "Trash");
    assert_eq!(chores[0].schedule, Schedule::every_day());
    assert_eq!(board.list_recurring().len(), 2);
    assert_eq!(board.current_chore(), Some("Trash"));
}

#[test]
fn test_assign_chore_mirrors_name_to_partner() {
    let config = HouseholdConfig::default();
    let mut store = MemoryStore::new();
    MemberBoard::load(&mut store, &config, "Elaine", sunday())
        .assign_chore(Chore::Bathroom)
        .unwrap();

    let partner = MemberBoard::load(&mut store, &config, "Llewyn", sunday());
    assert_eq!(partner.current_chore(), Some("Bathroom"));
    assert!(partner.list_recurring().is_empty());
    assert_eq!(partner.next_chore(partner.current_chore()), Chore::Dishes);

    MemberBoard::load(&mut store, &config, "Aiden", sunday())
        .assign_chore(Chore::Trash)
        .unwrap();
    let elaine: Option<String> = load_json(&store, &keys::chore("Elaine"));
    assert_eq!(elaine.as_deref(), Some("Bathroom"));
}

#[test]
fn test_legacy_string_schedule_is_due() {
    let config = HouseholdConfig::default();
    let mut store = MemoryStore::new();
    let raw = r#"[{"id": 7, "text": "Practice piano", "frequency": "daily", "scheduleDays": "1,3"}]"#;
    store.set(&keys::recurring("Liah"), raw).unwrap();

    assert_eq!(due_ids(&mut store, &config, "Liah", date(2026, 10, 19)), vec![7]);
    assert!(due_ids(&mut store, &config, "Liah", date(2026, 10, 20)).is_empty());
}

#[test]
fn test_unreadable_entry_does_not_hide_the_rest() {
    let config = HouseholdConfig::default();
    let mut store = MemoryStore::new();
    let raw = r#"[
        {"id": 1, "text": "Yearly thing", "frequency": "yearly"},
        {"id": 2, "text": "Make bed", "frequency": "daily", "scheduleDays": [0, 1, 2, 3, 4, 5, 6]}
    ]"#;
    store.set(&keys::recurring("Aiden"), raw).unwrap();

    let board = MemberBoard::load(&mut store, &config, "Aiden", sunday());
    assert_eq!(board.list_recurring().len(), 1);
    assert_eq!(board.due_today()[0].id, 2);
}

#[test]
fn test_important_dates_are_kept_in_order() {
    let config = HouseholdConfig::default();
    let mut store = MemoryStore::new();
    let mut board = MemberBoard::load(&mut store, &config, "Sharmila", sunday());
    board.add_important_date("Anniversary", date(2026, 12, 2)).unwrap();
    board.add_important_date("Dentist", date(2026, 10, 19)).unwrap();
    assert!(matches!(board.add_important_date("  ", date(2026, 11, 1)), Err(BoardError::EmptyText)));

    let names: Vec<&str> = board.important_dates().iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Dentist", "Anniversary"]);
    assert_eq!(board.important_dates()[0].days_until, 1);
}

#[test]
fn test_household_summary_counts() {
    let config = HouseholdConfig::default();
    let mut store = MemoryStore::new();

    let mut aiden = MemberBoard::load(&mut store, &config, "Aiden", sunday());
    aiden.add_recurring("Make bed", Schedule::every_day()).unwrap();
    aiden.add_recurring("Bins", Schedule::Weekly { day: Some(2) }).unwrap();
    aiden.add_task("Return library book").unwrap();

    let mut liah = MemberBoard::load(&mut store, &config, "Liah", sunday());
    let done = liah.add_recurring("Make bed", Schedule::every_day()).unwrap();
    liah.complete_today(done).unwrap();

    let mut shopping = ShoppingList::load(&mut store).unwrap();
    shopping.add("DM", "Toothpaste", Urgency::Urgent).unwrap();
    shopping.add("Books", "Atlas", Urgency::Normal).unwrap();
    shopping.add("Online", "Cables", Urgency::Normal).unwrap();

    let summary = household_summary(&store, &config, sunday());
    assert_eq!(summary.members.len(), 6);
    let aiden = summary.members.iter().find(|m| m.name == "Aiden").unwrap();
    assert_eq!((aiden.tasks, aiden.due_today), (1, 1));
    let liah = summary.members.iter().find(|m| m.name == "Liah").unwrap();
    assert_eq!((liah.tasks, liah.due_today), (0, 0));
    assert_eq!((summary.shopping_urgent, summary.shopping_normal), (1, 2));
    assert_eq!(summary.household_tasks, 0);
}
