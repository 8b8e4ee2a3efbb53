//! Day keys: calendar dates normalised to `yyyy-mm-dd`.
//!
//! Day keys identify cooking assignments and bucket tasks by due day. Task
//! due dates arrive as nanosecond timestamps and are mapped onto the local
//! calendar day they fall on.

use chrono::{Local, LocalResult, NaiveDate, TimeZone};
use shared::{Task, TaskDayGroup};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::HouseholdError;

const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Key used for tasks without a due date
pub const NO_DUE_DATE_KEY: &str = "no-due-date";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Strict parse: exactly ten characters of `yyyy-mm-dd` naming a real date
    pub fn parse(text: &str) -> Option<Self> {
        let bytes = text.as_bytes();
        if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return None;
        }
        let digits_ok = bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
        if !digits_ok {
            return None;
        }
        NaiveDate::parse_from_str(text, DAY_KEY_FORMAT).ok().map(Self)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DAY_KEY_FORMAT))
    }
}

impl FromStr for DayKey {
    type Err = HouseholdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DayKey::parse(s).ok_or_else(|| HouseholdError::InvalidDayKey(s.to_string()))
    }
}

/// Local calendar date of a nanosecond timestamp
pub fn timestamp_to_date(nanos: i64) -> NaiveDate {
    Local.timestamp_nanos(nanos).date_naive()
}

/// Day key of a task's due date, if it has one
pub fn due_day_key(due_date: Option<i64>) -> Option<DayKey> {
    due_date.map(|nanos| DayKey::from_date(timestamp_to_date(nanos)))
}

/// Nanosecond timestamp for local noon on `date`.
///
/// Noon keeps the timestamp on the same local day even across DST shifts.
pub fn date_to_timestamp(date: NaiveDate) -> Option<i64> {
    let noon = date.and_hms_opt(12, 0, 0)?;
    let local = match Local.from_local_datetime(&noon) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => return None,
    };
    local.timestamp_nanos_opt()
}

/// Display form used for day group headings, e.g. `Monday, March 4, 2024`
pub fn display_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// Group tasks by local due day in ascending order, with a trailing
/// "No due date" group for undated tasks. Input order is kept within a group.
pub fn group_tasks_by_day(tasks: &[Task]) -> Vec<TaskDayGroup> {
    let mut by_day: BTreeMap<DayKey, Vec<Task>> = BTreeMap::new();
    let mut undated = Vec::new();

    for task in tasks {
        match due_day_key(task.due_date) {
            Some(key) => by_day.entry(key).or_default().push(task.clone()),
            None => undated.push(task.clone()),
        }
    }

    let mut groups: Vec<TaskDayGroup> = by_day
        .into_iter()
        .map(|(key, tasks)| TaskDayGroup {
            day_key: key.to_string(),
            display_date: display_date(key.date()),
            tasks,
        })
        .collect();

    if !undated.is_empty() {
        groups.push(TaskDayGroup {
            day_key: NO_DUE_DATE_KEY.to_string(),
            display_date: "No due date".to_string(),
            tasks: undated,
        });
    }

    groups
}
