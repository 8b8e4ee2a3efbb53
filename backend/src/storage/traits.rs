//! # Storage Traits
//!
//! The household data service exposes CRUD-style operations on tasks,
//! recurring chores, cooking assignments and person profiles. These traits
//! describe that interface so the domain layer never depends on a concrete
//! store.
//!
//! All operations are synchronous; ownership and validation rules live in
//! the domain services, not here.

use anyhow::Result;
use shared::{CookingAssignment, PersonProfile, Principal, RecurringChore, Task};

/// Trait defining the interface for task storage operations
pub trait TaskStorage: Send + Sync {
    /// Reserve the next task id
    fn next_task_id(&self) -> Result<u64>;

    /// Store a new task
    fn store_task(&self, task: &Task) -> Result<()>;

    /// Retrieve a specific task by ID
    fn get_task(&self, id: u64) -> Result<Option<Task>>;

    /// List all tasks ordered by id
    fn list_tasks(&self) -> Result<Vec<Task>>;

    /// Replace an existing task
    fn update_task(&self, task: &Task) -> Result<()>;

    /// Returns true if the task was found and deleted
    fn delete_task(&self, id: u64) -> Result<bool>;
}

/// Trait defining the interface for recurring chore storage operations
pub trait ChoreStorage: Send + Sync {
    fn next_chore_id(&self) -> Result<u64>;

    fn store_chore(&self, chore: &RecurringChore) -> Result<()>;

    fn get_chore(&self, id: u64) -> Result<Option<RecurringChore>>;

    /// List all chores ordered by id
    fn list_chores(&self) -> Result<Vec<RecurringChore>>;

    fn update_chore(&self, chore: &RecurringChore) -> Result<()>;

    fn delete_chore(&self, id: u64) -> Result<bool>;
}

/// Trait defining the interface for dinner rota storage operations.
///
/// Assignments are keyed by day key; storing one for a day that already has
/// an assignment replaces it.
pub trait CookingStorage: Send + Sync {
    fn get_cooking_assignment(&self, day: &str) -> Result<Option<CookingAssignment>>;

    /// List all assignments ordered by day
    fn list_cooking_assignments(&self) -> Result<Vec<CookingAssignment>>;

    fn upsert_cooking_assignment(&self, assignment: &CookingAssignment) -> Result<()>;
}

/// Trait defining the interface for person profile storage operations
pub trait ProfileStorage: Send + Sync {
    fn get_profile(&self, principal: &Principal) -> Result<Option<PersonProfile>>;

    fn list_profiles(&self) -> Result<Vec<PersonProfile>>;

    /// Insert or replace the profile for `profile.principal`
    fn upsert_profile(&self, profile: &PersonProfile) -> Result<()>;

    fn delete_profile(&self, principal: &Principal) -> Result<bool>;
}

/// Trait defining the interface for storage connections
///
/// A connection hands out one repository per record type. Services only see
/// the repository traits, so any backing store can be swapped in.
pub trait Connection: Send + Sync + Clone {
    type TaskRepository: TaskStorage + Clone;
    type ChoreRepository: ChoreStorage + Clone;
    type CookingRepository: CookingStorage + Clone;
    type ProfileRepository: ProfileStorage + Clone;

    fn create_task_repository(&self) -> Self::TaskRepository;

    fn create_chore_repository(&self) -> Self::ChoreRepository;

    fn create_cooking_repository(&self) -> Self::CookingRepository;

    fn create_profile_repository(&self) -> Self::ProfileRepository;
}
