//! Recurring chore scheduling.
//!
//! Decides whether a chore lands on a calendar date and arranges chores for
//! display. Weekdays follow the `0 = Sunday .. 6 = Saturday` convention.

use chrono::{Datelike, NaiveDate};
use shared::{GroupedChores, RecurringChore, Timeline};

/// Fortnightly chores fall on even weeks counted from Monday 2024-01-01,
/// stored as days from the common era
const FORTNIGHT_ANCHOR_DAYS_FROM_CE: i32 = 738_886;

const WEEKDAY_LABELS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Weekday number of a date, Sunday = 0
pub fn weekday_of(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

pub fn weekday_label(weekday: u8) -> &'static str {
    WEEKDAY_LABELS
        .get(weekday as usize)
        .copied()
        .unwrap_or("Unknown")
}

pub fn timeline_label(timeline: Timeline) -> &'static str {
    timeline.label()
}

/// Whole weeks between the fortnight anchor and `date`, rounded down
fn weeks_since_anchor(date: NaiveDate) -> i32 {
    (date.num_days_from_ce() - FORTNIGHT_ANCHOR_DAYS_FROM_CE).div_euclid(7)
}

/// Does `chore` occur on `date`?
pub fn occurs_on(chore: &RecurringChore, date: NaiveDate) -> bool {
    if chore.paused {
        return false;
    }

    if chore.timeline == Timeline::Daily {
        return true;
    }

    // Every remaining timeline is gated on the weekday first.
    if weekday_of(date) != chore.weekday {
        return false;
    }

    match chore.timeline {
        Timeline::Daily | Timeline::Weekly => true,
        Timeline::Fortnightly => weeks_since_anchor(date).rem_euclid(2) == 0,
        // First occurrence of the weekday in the month. Only sound because
        // the weekday gate above has already matched.
        Timeline::Monthly => date.day() <= 7,
    }
}

/// Chores occurring on `date`, in input order
pub fn occurrences_on(chores: &[RecurringChore], date: NaiveDate) -> Vec<&RecurringChore> {
    chores.iter().filter(|chore| occurs_on(chore, date)).collect()
}

/// Group chores by weekday, starting at `today`'s weekday and wrapping
/// through the following six days. Empty groups are left out.
pub fn group_by_weekday(chores: &[RecurringChore], today: NaiveDate) -> Vec<GroupedChores> {
    let start = weekday_of(today);

    (0..7u8)
        .map(|offset| (start + offset) % 7)
        .filter_map(|weekday| {
            let matching: Vec<RecurringChore> = chores
                .iter()
                .filter(|chore| chore.weekday == weekday)
                .cloned()
                .collect();
            if matching.is_empty() {
                None
            } else {
                Some(GroupedChores {
                    weekday,
                    weekday_label: weekday_label(weekday).to_string(),
                    chores: matching,
                })
            }
        })
        .collect()
}

/// The `limit` chores whose weekday comes soonest, counting today as zero
/// days away. Ties keep input order.
pub fn upcoming_chores(
    chores: &[RecurringChore],
    today: NaiveDate,
    limit: usize,
) -> Vec<RecurringChore> {
    let today_weekday = weekday_of(today) as i32;
    let mut sorted: Vec<RecurringChore> = chores.to_vec();
    sorted.sort_by_key(|chore| (chore.weekday as i32 - today_weekday).rem_euclid(7));
    sorted.truncate(limit);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Principal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn chore(id: u64, weekday: u8, timeline: Timeline) -> RecurringChore {
        RecurringChore {
            id,
            name: format!("chore {}", id),
            description: String::new(),
            weekday,
            timeline,
            assigned_to: None,
            created_by: Principal::new("aaaaa-aa"),
            paused: false,
        }
    }

    fn days(start: NaiveDate, count: i64) -> impl Iterator<Item = NaiveDate> {
        (0..count).map(move |offset| start + chrono::Duration::days(offset))
    }

    #[test]
    fn test_anchor_is_monday_first_of_january_2024() {
        let anchor = NaiveDate::from_num_days_from_ce_opt(FORTNIGHT_ANCHOR_DAYS_FROM_CE).unwrap();
        assert_eq!(anchor, date(2024, 1, 1));
        assert_eq!(weekday_of(anchor), 1);
        assert_eq!(weeks_since_anchor(anchor), 0);
    }

    #[test]
    fn test_paused_chores_never_occur() {
        for timeline in Timeline::ALL {
            let mut paused = chore(1, 1, timeline);
            paused.paused = true;
            for day in days(date(2023, 12, 1), 120) {
                assert!(!occurs_on(&paused, day), "{:?} on {}", timeline, day);
            }
        }
    }

    #[test]
    fn test_daily_ignores_weekday() {
        // Weekday 9 is out of range yet daily chores still show every day.
        for weekday in [0, 3, 9] {
            let daily = chore(1, weekday, Timeline::Daily);
            assert!(days(date(2024, 2, 1), 30).all(|day| occurs_on(&daily, day)));
        }
    }

    #[test]
    fn test_weekly_matches_weekday_only() {
        let wednesday = chore(1, 3, Timeline::Weekly);
        for day in days(date(2024, 5, 1), 60) {
            assert_eq!(occurs_on(&wednesday, day), weekday_of(day) == 3);
        }
    }

    #[test]
    fn test_fortnightly_reference_weeks() {
        let monday = chore(1, 1, Timeline::Fortnightly);
        assert!(occurs_on(&monday, date(2024, 1, 1)));
        assert!(!occurs_on(&monday, date(2024, 1, 8)));
        assert!(occurs_on(&monday, date(2024, 1, 15)));
        assert!(!occurs_on(&monday, date(2024, 1, 2)));
    }

    #[test]
    fn test_fortnightly_alternates_before_and_after_anchor() {
        let sunday = chore(1, 0, Timeline::Fortnightly);
        let sundays: Vec<NaiveDate> = days(date(2023, 10, 1), 200)
            .filter(|day| weekday_of(*day) == 0)
            .collect();

        let pattern: Vec<bool> = sundays.iter().map(|day| occurs_on(&sunday, *day)).collect();
        for pair in pattern.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
        // 2023-12-31 is one day before the anchor, so week -1.
        assert!(!occurs_on(&sunday, date(2023, 12, 31)));
        assert!(occurs_on(&sunday, date(2024, 1, 7)));
    }

    #[test]
    fn test_monthly_first_week_only() {
        let monday = chore(1, 1, Timeline::Monthly);
        assert!(occurs_on(&monday, date(2024, 4, 1)));
        assert!(!occurs_on(&monday, date(2024, 4, 8)));
        assert!(occurs_on(&monday, date(2024, 7, 1)));
        assert!(occurs_on(&monday, date(2024, 3, 4)));
        // Day 2 but a Tuesday: the weekday gate rejects it.
        assert!(!occurs_on(&monday, date(2024, 4, 2)));

        for day in days(date(2024, 1, 1), 366) {
            if occurs_on(&monday, day) {
                assert!(day.day() <= 7 && weekday_of(day) == 1);
            }
        }
    }

    #[test]
    fn test_occurrences_on_keeps_input_order() {
        let chores = vec![
            chore(1, 1, Timeline::Weekly),
            chore(2, 2, Timeline::Weekly),
            chore(3, 0, Timeline::Daily),
            chore(4, 1, Timeline::Monthly),
        ];
        let ids: Vec<u64> = occurrences_on(&chores, date(2024, 1, 1))
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![1, 3, 4]);
    }

    #[test]
    fn test_group_by_weekday_starts_today_and_skips_empty() {
        let chores = vec![
            chore(1, 1, Timeline::Weekly),
            chore(2, 5, Timeline::Weekly),
            chore(3, 1, Timeline::Monthly),
            chore(4, 0, Timeline::Fortnightly),
        ];
        // 2024-03-08 is a Friday.
        let groups = group_by_weekday(&chores, date(2024, 3, 8));

        let order: Vec<u8> = groups.iter().map(|g| g.weekday).collect();
        assert_eq!(order, vec![5, 0, 1]);
        assert_eq!(groups[0].weekday_label, "Friday");
        assert!(groups.iter().all(|g| !g.chores.is_empty()));
        assert_eq!(
            groups[2].chores.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![1, 3]
        );
    }

    #[test]
    fn test_group_then_flatten_keeps_every_valid_chore_once() {
        let chores = vec![
            chore(1, 6, Timeline::Weekly),
            chore(2, 2, Timeline::Weekly),
            chore(3, 6, Timeline::Daily),
            chore(4, 11, Timeline::Weekly),
        ];
        let mut flattened: Vec<u64> = group_by_weekday(&chores, date(2024, 3, 5))
            .into_iter()
            .flat_map(|g| g.chores.into_iter().map(|c| c.id))
            .collect();
        flattened.sort();
        assert_eq!(flattened, vec![1, 2, 3]);
    }

    #[test]
    fn test_upcoming_chores_sorted_by_days_until() {
        let chores = vec![
            chore(1, 1, Timeline::Weekly),
            chore(2, 4, Timeline::Weekly),
            chore(3, 3, Timeline::Weekly),
            chore(4, 2, Timeline::Weekly),
        ];
        // Wednesday.
        let upcoming = upcoming_chores(&chores, date(2024, 3, 6), 3);
        let ids: Vec<u64> = upcoming.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_labels() {
        assert_eq!(weekday_label(0), "Sunday");
        assert_eq!(weekday_label(6), "Saturday");
        assert_eq!(weekday_label(7), "Unknown");
        assert_eq!(timeline_label(Timeline::Fortnightly), "Fortnightly");
    }
}
