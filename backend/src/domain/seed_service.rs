//! Demo household data for trying the app out.

use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate};
use log::info;
use shared::{
    AddTaskRequest, CookingDayRequest, CreateRecurringChoreRequest, PersonProfile, Principal,
    Timeline,
};

use crate::domain::chore_service::ChoreService;
use crate::domain::commands::SeedResult;
use crate::domain::cooking_service::CookingService;
use crate::domain::day_key::{self, DayKey};
use crate::domain::profile_service::ProfileService;
use crate::domain::task_service::TaskService;
use crate::storage::Connection;

const DEMO_DISPLAY_NAME: &str = "Demo User";
const DEMO_COLOR: &str = "#FF6B35";
const COOK_NAMES: [&str; 5] = ["Alex", "Jordan", "Sam", "Taylor", "Casey"];
const MEALS: [&str; 7] = [
    "Spaghetti Bolognese",
    "Chicken Stir-fry",
    "Homemade Pizza",
    "Taco Tuesday",
    "Fish and Chips",
    "Vegetable Curry",
    "Sunday Roast",
];

/// Sample task: name, description, days from today (None = undated), assigned to caller
const SAMPLE_TASKS: [(&str, &str, Option<i64>, bool); 5] = [
    ("Take out the trash", "Remember to separate recyclables", Some(0), true),
    ("Water the plants", "All indoor and outdoor plants", Some(1), true),
    ("Grocery shopping", "Check the shopping list on the fridge", Some(3), false),
    ("Clean the bathroom", "Deep clean including tiles and mirrors", Some(5), true),
    ("Organize garage", "Sort and label storage boxes", None, false),
];

/// Sample chore: name, description, weekday, timeline, assigned to caller
const SAMPLE_CHORES: [(&str, &str, u8, Timeline, bool); 5] = [
    ("Feed the pets", "Morning and evening", 0, Timeline::Daily, true),
    ("Mow the lawn", "Front and back yard", 6, Timeline::Weekly, true),
    ("Laundry day", "Wash, dry, and fold", 3, Timeline::Weekly, false),
    ("Change bed sheets", "All bedrooms", 0, Timeline::Fortnightly, true),
    ("Clean windows", "Inside and outside", 1, Timeline::Monthly, false),
];

#[derive(Clone)]
pub struct SeedService<C: Connection> {
    task_service: TaskService<C>,
    chore_service: ChoreService<C>,
    cooking_service: CookingService<C>,
    profile_service: ProfileService<C>,
}

/// Monday the rota starts on. On a Sunday that is the coming Monday.
fn rota_monday(today: NaiveDate) -> NaiveDate {
    match today.weekday().num_days_from_sunday() {
        0 => today + Duration::days(1),
        n => today - Duration::days(n as i64 - 1),
    }
}

impl<C: Connection> SeedService<C> {
    pub fn new(connection: &C) -> Self {
        Self {
            task_service: TaskService::new(connection),
            chore_service: ChoreService::new(connection),
            cooking_service: CookingService::new(connection),
            profile_service: ProfileService::new(connection),
        }
    }

    /// Fill the household with a demo profile, tasks, chores and a week of dinners.
    ///
    /// An existing profile for `caller` is kept. Rota days that are already
    /// taken are left alone.
    pub fn populate_sample_data(&self, caller: &Principal, today: NaiveDate) -> Result<SeedResult> {
        info!("🌱 Populating sample data for {}", caller);
        let mut result = SeedResult::default();

        if self.profile_service.get_profile(caller)?.is_none() {
            self.profile_service.upsert_profile(PersonProfile {
                principal: caller.clone(),
                display_name: DEMO_DISPLAY_NAME.to_string(),
                color: DEMO_COLOR.to_string(),
            })?;
            result.profile_created = true;
        }

        let assignee = |mine: bool| if mine { Some(caller.clone()) } else { None };
        let due = |offset: Option<i64>| {
            offset.and_then(|days| day_key::date_to_timestamp(today + Duration::days(days)))
        };

        for (name, description, offset, mine) in SAMPLE_TASKS {
            let task = self.task_service.add_task(
                caller,
                AddTaskRequest {
                    name: name.to_string(),
                    description: description.to_string(),
                    due_date: due(offset),
                    assigned_to: assignee(mine),
                },
            )?;
            result.task_ids.push(task.id);
        }

        let done = self.task_service.add_task(
            caller,
            AddTaskRequest {
                name: "Vacuum living room".to_string(),
                description: "Already done!".to_string(),
                due_date: due(Some(-1)),
                assigned_to: Some(caller.clone()),
            },
        )?;
        self.task_service.toggle_task_completion(caller, done.id)?;
        result.task_ids.push(done.id);

        for (name, description, weekday, timeline, mine) in SAMPLE_CHORES {
            let chore = self.chore_service.create_recurring_chore(
                caller,
                CreateRecurringChoreRequest {
                    name: name.to_string(),
                    description: description.to_string(),
                    weekday,
                    timeline,
                    assigned_to: assignee(mine),
                },
            )?;
            result.chore_ids.push(chore.id);
        }

        let monday = rota_monday(today);
        for (i, meal) in MEALS.iter().enumerate() {
            let date = monday + Duration::days(i as i64);
            if self.cooking_service.get_cooking_assignment(date)?.is_some() {
                info!("Cooking day {} already assigned, leaving it", date);
                continue;
            }
            let assignment = self.cooking_service.assign_cooking_day(
                caller,
                CookingDayRequest {
                    day: DayKey::from_date(date).to_string(),
                    cook: None,
                    cook_name: Some(COOK_NAMES[i % COOK_NAMES.len()].to_string()),
                    meal: Some(meal.to_string()),
                },
            )?;
            result.cooking_days.push(assignment.day);
        }

        info!(
            "Sample data ready: {} tasks, {} chores, {} cooking days",
            result.task_ids.len(),
            result.chore_ids.len(),
            result.cooking_days.len()
        );
        Ok(result)
    }
}
