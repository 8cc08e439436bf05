use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate};

use crate::error::{BoardError, Result};
use crate::models::{Frequency, RecurringTask, Schedule};

const SHORT_DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const DAY_NAMES: [&str; 7] = [
    "Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday",
];

/// Layout used for stored day markers, e.g. `Sun Oct 18 2026`.
const DAY_KEY_FORMAT: &str = "%a %b %d %Y";

/// Weekday number of `date`, Sunday = 0.
pub fn weekday_number(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// The Sunday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(weekday_number(date) as i64)
}

/// String stored alongside per-day and per-week records.
pub fn day_key(date: NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

/// Whether `task` falls on `date`, ignoring same-day completion.
///
/// Paused tasks never match. Monthly dates a month does not have (the 31st in
/// February) are skipped for that month.
pub fn is_due(task: &RecurringTask, date: NaiveDate) -> bool {
    if task.paused {
        return false;
    }
    match &task.schedule {
        Schedule::Daily { days } => days.contains(&weekday_number(date)),
        Schedule::Weekly { day } => *day == Some(weekday_number(date)),
        Schedule::Monthly { dates } => dates.contains(&(date.day() as u8)),
    }
}

/// Tasks due on `date` that have not been completed yet.
pub fn due_on<'a>(
    tasks: &'a [RecurringTask],
    completed: &BTreeSet<u64>,
    date: NaiveDate,
) -> Vec<&'a RecurringTask> {
    tasks
        .iter()
        .filter(|t| is_due(t, date) && !completed.contains(&t.id))
        .collect()
}

/// Human readable schedule, e.g. `Mon, Wed, Fri`, `Tuesday` or `1, 15`.
pub fn describe(schedule: &Schedule) -> String {
    match schedule {
        Schedule::Daily { days } => days
            .iter()
            .map(|d| SHORT_DAY_NAMES.get(*d as usize).copied().unwrap_or("?"))
            .collect::<Vec<_>>()
            .join(", "),
        Schedule::Weekly { day } => match day {
            Some(d) => DAY_NAMES.get(*d as usize).copied().unwrap_or("?").to_string(),
            None => "-".to_string(),
        },
        Schedule::Monthly { dates } => dates
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// Builds a schedule from user input.
///
/// Days accept numbers (`1,3,5`) or names (`mon,wed`). Monthly dates outside
/// 1-31 are dropped; the input is rejected if nothing valid remains.
pub fn parse_schedule(frequency: Frequency, input: &str) -> Result<Schedule> {
    match frequency {
        Frequency::Daily => {
            let days = parse_weekdays(input)?;
            if days.is_empty() {
                return Err(BoardError::NoWeekdays);
            }
            Ok(Schedule::Daily { days })
        }
        Frequency::Weekly => {
            let days = parse_weekdays(input)?;
            match days.len() {
                0 => Err(BoardError::NoWeekdays),
                1 => Ok(Schedule::Weekly { day: days.into_iter().next() }),
                _ => Err(BoardError::SingleWeekday(input.trim().to_string())),
            }
        }
        Frequency::Monthly => {
            if input.trim().is_empty() {
                return Err(BoardError::NoMonthlyDates);
            }
            let dates: BTreeSet<u8> = input
                .split(',')
                .filter_map(|d| d.trim().parse::<u8>().ok())
                .filter(|d| (1..=31).contains(d))
                .collect();
            if dates.is_empty() {
                return Err(BoardError::InvalidMonthlyDates);
            }
            Ok(Schedule::Monthly { dates })
        }
    }
}

fn parse_weekdays(input: &str) -> Result<BTreeSet<u8>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(parse_weekday)
        .collect()
}

fn parse_weekday(part: &str) -> Result<u8> {
    if let Ok(n) = part.parse::<u8>() {
        if n <= 6 {
            return Ok(n);
        }
        return Err(BoardError::InvalidWeekday(part.to_string()));
    }
    let lower = part.to_lowercase();
    DAY_NAMES
        .iter()
        .position(|name| lower.len() >= 3 && name.to_lowercase().starts_with(&lower))
        .map(|i| i as u8)
        .ok_or_else(|| BoardError::InvalidWeekday(part.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn weekday_numbers_start_on_sunday() {
        assert_eq!(weekday_number(date(2026, 10, 18)), 0);
        assert_eq!(weekday_number(date(2026, 10, 24)), 6);
    }

    #[test]
    fn week_starts_on_most_recent_sunday() {
        assert_eq!(week_start(date(2026, 10, 18)), date(2026, 10, 18));
        assert_eq!(week_start(date(2026, 10, 21)), date(2026, 10, 18));
        // Crosses a month boundary.
        assert_eq!(week_start(date(2026, 11, 3)), date(2026, 11, 1));
        assert_eq!(week_start(date(2026, 10, 31)), date(2026, 10, 25));
    }

    #[test]
    fn day_key_matches_stored_layout() {
        assert_eq!(day_key(date(2026, 10, 18)), "Sun Oct 18 2026");
        assert_eq!(day_key(date(2026, 3, 5)), "Thu Mar 05 2026");
    }

    #[test]
    fn parses_weekday_names_and_numbers() {
        let s = parse_schedule(Frequency::Daily, "mon, 3,Friday").unwrap();
        assert_eq!(s, Schedule::Daily { days: [1, 3, 5].into_iter().collect() });
        assert!(matches!(
            parse_schedule(Frequency::Daily, "7"),
            Err(BoardError::InvalidWeekday(_))
        ));
        assert!(matches!(parse_schedule(Frequency::Daily, " "), Err(BoardError::NoWeekdays)));
    }

    #[test]
    fn weekly_takes_exactly_one_day() {
        assert_eq!(
            parse_schedule(Frequency::Weekly, "Wed").unwrap(),
            Schedule::Weekly { day: Some(3) }
        );
        assert!(matches!(
            parse_schedule(Frequency::Weekly, "wed,mon"),
            Err(BoardError::SingleWeekday(_))
        ));
        assert!(matches!(parse_schedule(Frequency::Weekly, ""), Err(BoardError::NoWeekdays)));
    }

    #[test]
    fn monthly_input_drops_invalid_dates() {
        let s = parse_schedule(Frequency::Monthly, "0, 15, 31, 40, abc").unwrap();
        assert_eq!(s, Schedule::Monthly { dates: [15, 31].into_iter().collect() });
        assert!(matches!(
            parse_schedule(Frequency::Monthly, "0,32"),
            Err(BoardError::InvalidMonthlyDates)
        ));
        assert!(matches!(parse_schedule(Frequency::Monthly, ""), Err(BoardError::NoMonthlyDates)));
    }

    #[test]
    fn describes_schedules() {
        assert_eq!(describe(&Schedule::Daily { days: [1, 3, 5].into_iter().collect() }), "Mon, Wed, Fri");
        assert_eq!(describe(&Schedule::Weekly { day: Some(2) }), "Tuesday");
        assert_eq!(describe(&Schedule::Monthly { dates: [1, 15].into_iter().collect() }), "1, 15");
    }

    #[test]
    fn describe_tolerates_out_of_range_days() {
        assert_eq!(describe(&Schedule::Daily { days: [1, 9].into_iter().collect() }), "Mon, ?");
        assert_eq!(describe(&Schedule::Weekly { day: Some(12) }), "?");
        assert_eq!(describe(&Schedule::Weekly { day: None }), "-");
    }
}
