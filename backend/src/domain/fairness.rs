//! Cooking fairness statistics.
//!
//! Counts how often each person cooked within a window so the household can
//! see who is carrying the dinner rota. All windows are whole calendar days
//! and inclusive at both ends.

use chrono::{Datelike, Duration, Months, NaiveDate};
use log::debug;
use shared::{CookCount, CookingAssignment, FairnessRange, FairnessStats, PersonProfile};

use crate::domain::day_key::DayKey;
use crate::domain::labels::{cooking_assignment_color, cooking_assignment_label};

/// Resolved date bounds for a [`FairnessRange`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FairnessWindow {
    /// None means unbounded (all time)
    pub start: Option<NaiveDate>,
    pub end: NaiveDate,
    pub period_label: String,
}

impl FairnessWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        match self.start {
            Some(start) => start <= date && date <= self.end,
            None => date <= self.end,
        }
    }
}

fn short_date(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

fn bounded(title: &str, start: NaiveDate, end: NaiveDate) -> FairnessWindow {
    FairnessWindow {
        start: Some(start),
        end,
        period_label: format!("{} ({} – {})", title, short_date(start), short_date(end)),
    }
}

pub fn fairness_window(range: FairnessRange, today: NaiveDate) -> FairnessWindow {
    match range {
        FairnessRange::Week => {
            let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
            bounded("This Week", monday, monday + Duration::days(6))
        }
        FairnessRange::Month => {
            let first = today.with_day(1).unwrap_or(today);
            let last = first
                .checked_add_months(Months::new(1))
                .and_then(|next| next.pred_opt())
                .unwrap_or(today);
            bounded("This Month", first, last)
        }
        FairnessRange::Last4Weeks => bounded("Last 4 Weeks", today - Duration::days(27), today),
        FairnessRange::Last30Days => bounded("Last 30 Days", today - Duration::days(29), today),
        FairnessRange::AllTime => FairnessWindow {
            start: None,
            end: today,
            period_label: "All Time".to_string(),
        },
    }
}

/// Count cooking assignments per person within `range`, relative to `today`.
///
/// Assignments with neither a cook nor a cook name are skipped, as are day
/// keys that do not parse. Ties for most and least cooked go to the label
/// encountered first.
pub fn compute_fairness(
    assignments: &[CookingAssignment],
    profiles: &[PersonProfile],
    range: FairnessRange,
    today: NaiveDate,
) -> FairnessStats {
    let window = fairness_window(range, today);
    let mut counts: Vec<CookCount> = Vec::new();

    for assignment in assignments {
        let has_cook_name = assignment
            .cook_name
            .as_deref()
            .is_some_and(|name| !name.is_empty());
        if assignment.cook.is_none() && !has_cook_name {
            continue;
        }

        let Some(day) = DayKey::parse(&assignment.day) else {
            debug!("Skipping cooking assignment with malformed day '{}'", assignment.day);
            continue;
        };
        if !window.contains(day.date()) {
            continue;
        }

        let Some(label) = cooking_assignment_label(assignment, profiles) else {
            continue;
        };

        match counts.iter_mut().find(|entry| entry.label == label) {
            Some(entry) => entry.count += 1,
            None => counts.push(CookCount {
                color: cooking_assignment_color(assignment, profiles),
                label,
                count: 1,
            }),
        }
    }

    let mut most_cooked: Option<&CookCount> = None;
    let mut least_cooked: Option<&CookCount> = None;
    for entry in &counts {
        if most_cooked.map_or(true, |best| entry.count > best.count) {
            most_cooked = Some(entry);
        }
        if least_cooked.map_or(true, |best| entry.count < best.count) {
            least_cooked = Some(entry);
        }
    }
    let most_cooked = most_cooked.cloned();
    let least_cooked = least_cooked.cloned();

    FairnessStats {
        is_empty: counts.is_empty(),
        counts,
        most_cooked,
        least_cooked,
        period_label: window.period_label,
        start_date: window.start,
        end_date: window.end,
    }
}
