//! Calendar projection: what is happening on a day, a week or a month.
//!
//! Nothing here is stored. Every view is assembled from tasks, recurring
//! chores and the dinner rota at the time it is asked for.

use anyhow::{anyhow, Result};
use chrono::{Datelike, Duration, NaiveDate};
use log::debug;
use shared::{
    CookingAssignment, DayPlan, MonthOverview, MonthOverviewDay, PersonProfile, RecurringChore,
    Task, TodayFocus,
};
use std::collections::HashSet;

use crate::domain::day_key::{self, DayKey};
use crate::domain::labels;
use crate::domain::recurrence;
use crate::storage::{ChoreStorage, Connection, CookingStorage, ProfileStorage, TaskStorage};

#[derive(Clone)]
pub struct CalendarService<C: Connection> {
    task_repository: C::TaskRepository,
    chore_repository: C::ChoreRepository,
    cooking_repository: C::CookingRepository,
    profile_repository: C::ProfileRepository,
}

/// Everything the projections read, loaded once per call
struct HouseholdView {
    tasks: Vec<Task>,
    chores: Vec<RecurringChore>,
    assignments: Vec<CookingAssignment>,
    profiles: Vec<PersonProfile>,
}

impl HouseholdView {
    fn tasks_due_on(&self, date: NaiveDate) -> Vec<Task> {
        let key = Some(DayKey::from_date(date));
        self.tasks
            .iter()
            .filter(|task| day_key::due_day_key(task.due_date) == key)
            .cloned()
            .collect()
    }

    fn assignment_on(&self, date: NaiveDate) -> Option<&CookingAssignment> {
        let key = DayKey::from_date(date).to_string();
        self.assignments.iter().find(|a| a.day == key)
    }

    fn day_plan(&self, date: NaiveDate) -> DayPlan {
        let assignment = self.assignment_on(date).cloned();
        let cook = assignment
            .as_ref()
            .map(|a| labels::cooking_assignment_display(Some(a), &self.profiles));
        DayPlan {
            date,
            day_key: DayKey::from_date(date).to_string(),
            tasks: self.tasks_due_on(date),
            chores: recurrence::occurrences_on(&self.chores, date)
                .into_iter()
                .cloned()
                .collect(),
            cooking_assignment: assignment,
            cook,
        }
    }
}

/// Sunday on or before `date`, if that is still a representable date
fn start_of_week(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_signed(Duration::days(recurrence::weekday_of(date) as i64))
}

impl<C: Connection> CalendarService<C> {
    pub fn new(connection: &C) -> Self {
        Self {
            task_repository: connection.create_task_repository(),
            chore_repository: connection.create_chore_repository(),
            cooking_repository: connection.create_cooking_repository(),
            profile_repository: connection.create_profile_repository(),
        }
    }

    fn load_view(&self) -> Result<HouseholdView> {
        Ok(HouseholdView {
            tasks: self.task_repository.list_tasks()?,
            chores: self.chore_repository.list_chores()?,
            assignments: self.cooking_repository.list_cooking_assignments()?,
            profiles: self.profile_repository.list_profiles()?,
        })
    }

    pub fn day_plan(&self, date: NaiveDate) -> Result<DayPlan> {
        Ok(self.load_view()?.day_plan(date))
    }

    /// Seven day plans, Sunday to Saturday, for the week containing `anchor`
    pub fn week_plan(&self, anchor: NaiveDate) -> Result<Vec<DayPlan>> {
        let sunday = start_of_week(anchor)
            .ok_or_else(|| anyhow!("Week of {} is out of range", anchor))?;
        let view = self.load_view()?;
        debug!("🗓️ Building week plan from {}", sunday);
        (0..7)
            .map(|offset| {
                sunday
                    .checked_add_signed(Duration::days(offset))
                    .map(|date| view.day_plan(date))
                    .ok_or_else(|| anyhow!("Week of {} is out of range", anchor))
            })
            .collect()
    }

    /// Whole Sunday-to-Saturday weeks covering `month` of `year`
    pub fn month_overview(&self, year: i32, month: u32, today: NaiveDate) -> Result<MonthOverview> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| anyhow!("Invalid month: {}-{}", year, month))?;
        let last = first
            .checked_add_months(chrono::Months::new(1))
            .and_then(|next| next.pred_opt())
            .ok_or_else(|| anyhow!("Month out of range: {}-{}", year, month))?;

        let view = self.load_view()?;
        let task_days: HashSet<DayKey> = view
            .tasks
            .iter()
            .filter_map(|task| day_key::due_day_key(task.due_date))
            .collect();

        let out_of_range = || anyhow!("Month out of range: {}-{}", year, month);
        let grid_start = start_of_week(first).ok_or_else(out_of_range)?;
        let grid_end = last
            .checked_add_signed(Duration::days(6 - recurrence::weekday_of(last) as i64))
            .ok_or_else(out_of_range)?;

        let mut days = Vec::new();
        let mut next = Some(grid_start);
        while let Some(date) = next.filter(|date| *date <= grid_end) {
            days.push(MonthOverviewDay {
                date,
                in_month: date.month() == month && date.year() == year,
                is_today: date == today,
                has_tasks: task_days.contains(&DayKey::from_date(date)),
                has_cooking: view.assignment_on(date).is_some(),
                has_chores: view.chores.iter().any(|c| recurrence::occurs_on(c, date)),
            });
            next = date.succ_opt();
        }

        Ok(MonthOverview { year, month, days })
    }

    /// Tasks due today and the label of today's cook
    pub fn today_focus(&self, today: NaiveDate) -> Result<TodayFocus> {
        let view = self.load_view()?;
        let cook_label = view
            .assignment_on(today)
            .and_then(|a| labels::cooking_assignment_label(a, &view.profiles))
            .unwrap_or_else(|| labels::NO_COOK_LABEL.to_string());

        Ok(TodayFocus {
            day_key: DayKey::from_date(today).to_string(),
            tasks: view.tasks_due_on(today),
            cook_label,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryConnection;
    use shared::{Principal, Timeline};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn alex() -> Principal {
        Principal::new("2vxsx-fae")
    }

    fn setup_test() -> (MemoryConnection, CalendarService<MemoryConnection>) {
        let connection = MemoryConnection::new();
        let tasks = connection.create_task_repository();
        tasks
            .store_task(&Task {
                id: 1,
                name: "Dentist".to_string(),
                description: String::new(),
                due_date: day_key::date_to_timestamp(date(2024, 3, 5)),
                assigned_to: None,
                completed: false,
                created_by: alex(),
                recurring_chore_id: None,
            })
            .unwrap();
        connection
            .create_chore_repository()
            .store_chore(&RecurringChore {
                id: 1,
                name: "Clean windows".to_string(),
                description: String::new(),
                weekday: 1,
                timeline: Timeline::Monthly,
                assigned_to: None,
                created_by: alex(),
                paused: false,
            })
            .unwrap();
        connection
            .create_cooking_repository()
            .upsert_cooking_assignment(&CookingAssignment {
                day: "2024-03-05".to_string(),
                cook: None,
                cook_name: Some("Jordan".to_string()),
                meal: Some("Chicken Stir-fry".to_string()),
                assigned_by: alex(),
            })
            .unwrap();
        let service = CalendarService::new(&connection);
        (connection, service)
    }

    #[test]
    fn test_day_plan() {
        let (_, service) = setup_test();

        let tuesday = service.day_plan(date(2024, 3, 5)).unwrap();
        assert_eq!(tuesday.day_key, "2024-03-05");
        assert_eq!(tuesday.tasks.len(), 1);
        assert!(tuesday.chores.is_empty());
        assert_eq!(tuesday.cook.map(|c| c.label), Some("Jordan".to_string()));

        let monday = service.day_plan(date(2024, 3, 4)).unwrap();
        assert_eq!(monday.chores.len(), 1);
        assert!(monday.cooking_assignment.is_none());
        assert!(monday.cook.is_none());
    }

    #[test]
    fn test_week_plan_runs_sunday_to_saturday() {
        let (_, service) = setup_test();
        let week = service.week_plan(date(2024, 3, 6)).unwrap();
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].date, date(2024, 3, 3));
        assert_eq!(week[6].date, date(2024, 3, 9));
        assert_eq!(week[2].tasks.len(), 1);
    }

    #[test]
    fn test_month_overview_grid() {
        let (_, service) = setup_test();
        let overview = service.month_overview(2024, 3, date(2024, 3, 5)).unwrap();

        // March 2024 starts on a Friday and ends on a Sunday
        assert_eq!(overview.days.first().unwrap().date, date(2024, 2, 25));
        assert_eq!(overview.days.last().unwrap().date, date(2024, 4, 6));
        assert_eq!(overview.days.len() % 7, 0);

        let find = |d: NaiveDate| overview.days.iter().find(|day| day.date == d).unwrap();
        let fifth = find(date(2024, 3, 5));
        assert!(fifth.has_tasks && fifth.has_cooking && fifth.is_today && fifth.in_month);
        assert!(find(date(2024, 3, 4)).has_chores);
        assert!(!find(date(2024, 3, 11)).has_chores);
        assert!(!find(date(2024, 2, 26)).in_month);

        assert!(service.month_overview(2024, 13, date(2024, 3, 5)).is_err());
    }

    #[test]
    fn test_month_overview_at_calendar_limits_is_an_error() {
        let (_, service) = setup_test();
        let today = date(2024, 3, 5);
        assert!(service.month_overview(-262143, 1, today).is_err());
        assert!(service.month_overview(262143, 12, today).is_err());
        assert!(service.month_overview(i32::MAX, 1, today).is_err());
        assert!(service.week_plan(NaiveDate::MIN).is_err());
    }

    #[test]
    fn test_today_focus() {
        let (_, service) = setup_test();
        let focus = service.today_focus(date(2024, 3, 5)).unwrap();
        assert_eq!(focus.tasks.len(), 1);
        assert_eq!(focus.cook_label, "Jordan");

        let quiet = service.today_focus(date(2024, 3, 6)).unwrap();
        assert!(quiet.tasks.is_empty());
        assert_eq!(quiet.cook_label, "No cook assigned");
    }
}
