//! # Domain Module
//!
//! Business logic for the household planner: tasks, recurring chores, the
//! dinner rota, person profiles and the calendar views built from them.
//!
//! ## Module Organization
//!
//! - **recurrence**: whether a recurring chore lands on a given date
//! - **fairness**: who has cooked how often within a time window
//! - **labels**: display names and colours for people and rota entries
//! - **day_key**: `yyyy-mm-dd` keys and task grouping by due day
//! - **\*_service**: CRUD operations with ownership and validation rules
//! - **calendar**: day, week and month projections
//!
//! ## Business Rules
//!
//! - Tasks, chores and rota days may only be edited by whoever created them
//! - Any household member may mark a task done or not done
//! - Chore weekdays run 0 (Sunday) to 6 (Saturday)
//! - A chore assignee must have a person profile
//! - Paused chores never occur

pub mod calendar;
pub mod chore_service;
pub mod commands;
pub mod cooking_service;
pub mod day_key;
pub mod errors;
pub mod fairness;
pub mod labels;
pub mod profile_service;
pub mod recurrence;
pub mod seed_service;
pub mod task_service;

pub use calendar::CalendarService;
pub use chore_service::ChoreService;
pub use cooking_service::CookingService;
pub use errors::HouseholdError;
pub use profile_service::ProfileService;
pub use seed_service::SeedService;
pub use task_service::TaskService;
