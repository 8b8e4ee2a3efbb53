//! In-memory household store.
//!
//! Holds every table behind one `RwLock` shared by all repositories created
//! from the same [`MemoryConnection`]. Snapshots convert the tables to and
//! from the YAML file format.

use anyhow::{anyhow, Result};
use log::debug;
use shared::{CookingAssignment, PersonProfile, Principal, RecurringChore, Task};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::snapshot::Snapshot;
use super::traits::{ChoreStorage, Connection, CookingStorage, ProfileStorage, TaskStorage};

#[derive(Debug, Default)]
struct HouseholdTables {
    next_task_id: u64,
    next_chore_id: u64,
    tasks: BTreeMap<u64, Task>,
    chores: BTreeMap<u64, RecurringChore>,
    cooking: BTreeMap<String, CookingAssignment>,
    profiles: Vec<PersonProfile>,
}

type SharedTables = Arc<RwLock<HouseholdTables>>;

fn read(tables: &SharedTables) -> Result<RwLockReadGuard<'_, HouseholdTables>> {
    tables
        .read()
        .map_err(|_| anyhow!("Household store lock poisoned"))
}

fn write(tables: &SharedTables) -> Result<RwLockWriteGuard<'_, HouseholdTables>> {
    tables
        .write()
        .map_err(|_| anyhow!("Household store lock poisoned"))
}

/// Connection to an in-memory household store
#[derive(Debug, Clone)]
pub struct MemoryConnection {
    tables: SharedTables,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self::from_snapshot(Snapshot::default())
    }

    /// Build a store from a snapshot. Id counters never go below one past
    /// the highest id already present.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let max_task_id = snapshot.tasks.iter().map(|t| t.id).max().unwrap_or(0);
        let max_chore_id = snapshot.recurring_chores.iter().map(|c| c.id).max().unwrap_or(0);

        let tables = HouseholdTables {
            next_task_id: snapshot.next_task_id.max(max_task_id + 1),
            next_chore_id: snapshot.next_chore_id.max(max_chore_id + 1),
            tasks: snapshot.tasks.into_iter().map(|t| (t.id, t)).collect(),
            chores: snapshot
                .recurring_chores
                .into_iter()
                .map(|c| (c.id, c))
                .collect(),
            cooking: snapshot
                .cooking_assignments
                .into_iter()
                .map(|a| (a.day.clone(), a))
                .collect(),
            profiles: snapshot.profiles,
        };
        debug!(
            "Memory store ready: {} tasks, {} chores, {} cooking days, {} profiles",
            tables.tasks.len(),
            tables.chores.len(),
            tables.cooking.len(),
            tables.profiles.len()
        );

        Self {
            tables: Arc::new(RwLock::new(tables)),
        }
    }

    pub fn to_snapshot(&self) -> Result<Snapshot> {
        let tables = read(&self.tables)?;
        Ok(Snapshot {
            next_task_id: tables.next_task_id,
            next_chore_id: tables.next_chore_id,
            tasks: tables.tasks.values().cloned().collect(),
            recurring_chores: tables.chores.values().cloned().collect(),
            cooking_assignments: tables.cooking.values().cloned().collect(),
            profiles: tables.profiles.clone(),
            ..Snapshot::default()
        })
    }
}

impl Default for MemoryConnection {
    fn default() -> Self {
        Self::new()
    }
}

impl Connection for MemoryConnection {
    type TaskRepository = MemoryTaskRepository;
    type ChoreRepository = MemoryChoreRepository;
    type CookingRepository = MemoryCookingRepository;
    type ProfileRepository = MemoryProfileRepository;

    fn create_task_repository(&self) -> Self::TaskRepository {
        MemoryTaskRepository {
            tables: self.tables.clone(),
        }
    }

    fn create_chore_repository(&self) -> Self::ChoreRepository {
        MemoryChoreRepository {
            tables: self.tables.clone(),
        }
    }

    fn create_cooking_repository(&self) -> Self::CookingRepository {
        MemoryCookingRepository {
            tables: self.tables.clone(),
        }
    }

    fn create_profile_repository(&self) -> Self::ProfileRepository {
        MemoryProfileRepository {
            tables: self.tables.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MemoryTaskRepository {
    tables: SharedTables,
}

impl TaskStorage for MemoryTaskRepository {
    fn next_task_id(&self) -> Result<u64> {
        let mut tables = write(&self.tables)?;
        let id = tables.next_task_id;
        tables.next_task_id += 1;
        Ok(id)
    }

    fn store_task(&self, task: &Task) -> Result<()> {
        let mut tables = write(&self.tables)?;
        if tables.tasks.contains_key(&task.id) {
            return Err(anyhow!("Task {} already exists", task.id));
        }
        tables.tasks.insert(task.id, task.clone());
        Ok(())
    }

    fn get_task(&self, id: u64) -> Result<Option<Task>> {
        Ok(read(&self.tables)?.tasks.get(&id).cloned())
    }

    fn list_tasks(&self) -> Result<Vec<Task>> {
        Ok(read(&self.tables)?.tasks.values().cloned().collect())
    }

    fn update_task(&self, task: &Task) -> Result<()> {
        let mut tables = write(&self.tables)?;
        match tables.tasks.get_mut(&task.id) {
            Some(existing) => {
                *existing = task.clone();
                Ok(())
            }
            None => Err(anyhow!("Task {} does not exist", task.id)),
        }
    }

    fn delete_task(&self, id: u64) -> Result<bool> {
        Ok(write(&self.tables)?.tasks.remove(&id).is_some())
    }
}

#[derive(Debug, Clone)]
pub struct MemoryChoreRepository {
    tables: SharedTables,
}

impl ChoreStorage for MemoryChoreRepository {
    fn next_chore_id(&self) -> Result<u64> {
        let mut tables = write(&self.tables)?;
        let id = tables.next_chore_id;
        tables.next_chore_id += 1;
        Ok(id)
    }

    fn store_chore(&self, chore: &RecurringChore) -> Result<()> {
        let mut tables = write(&self.tables)?;
        if tables.chores.contains_key(&chore.id) {
            return Err(anyhow!("Recurring chore {} already exists", chore.id));
        }
        tables.chores.insert(chore.id, chore.clone());
        Ok(())
    }

    fn get_chore(&self, id: u64) -> Result<Option<RecurringChore>> {
        Ok(read(&self.tables)?.chores.get(&id).cloned())
    }

    fn list_chores(&self) -> Result<Vec<RecurringChore>> {
        Ok(read(&self.tables)?.chores.values().cloned().collect())
    }

    fn update_chore(&self, chore: &RecurringChore) -> Result<()> {
        let mut tables = write(&self.tables)?;
        match tables.chores.get_mut(&chore.id) {
            Some(existing) => {
                *existing = chore.clone();
                Ok(())
            }
            None => Err(anyhow!("Recurring chore {} does not exist", chore.id)),
        }
    }

    fn delete_chore(&self, id: u64) -> Result<bool> {
        Ok(write(&self.tables)?.chores.remove(&id).is_some())
    }
}

#[derive(Debug, Clone)]
pub struct MemoryCookingRepository {
    tables: SharedTables,
}

impl CookingStorage for MemoryCookingRepository {
    fn get_cooking_assignment(&self, day: &str) -> Result<Option<CookingAssignment>> {
        Ok(read(&self.tables)?.cooking.get(day).cloned())
    }

    fn list_cooking_assignments(&self) -> Result<Vec<CookingAssignment>> {
        Ok(read(&self.tables)?.cooking.values().cloned().collect())
    }

    fn upsert_cooking_assignment(&self, assignment: &CookingAssignment) -> Result<()> {
        write(&self.tables)?
            .cooking
            .insert(assignment.day.clone(), assignment.clone());
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct MemoryProfileRepository {
    tables: SharedTables,
}

impl ProfileStorage for MemoryProfileRepository {
    fn get_profile(&self, principal: &Principal) -> Result<Option<PersonProfile>> {
        Ok(read(&self.tables)?
            .profiles
            .iter()
            .find(|p| &p.principal == principal)
            .cloned())
    }

    fn list_profiles(&self) -> Result<Vec<PersonProfile>> {
        Ok(read(&self.tables)?.profiles.clone())
    }

    fn upsert_profile(&self, profile: &PersonProfile) -> Result<()> {
        let mut tables = write(&self.tables)?;
        match tables
            .profiles
            .iter()
            .position(|p| p.principal == profile.principal)
        {
            Some(index) => tables.profiles[index] = profile.clone(),
            None => tables.profiles.push(profile.clone()),
        }
        Ok(())
    }

    fn delete_profile(&self, principal: &Principal) -> Result<bool> {
        let mut tables = write(&self.tables)?;
        let before = tables.profiles.len();
        tables.profiles.retain(|p| &p.principal != principal);
        Ok(tables.profiles.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Timeline;

    fn task(id: u64) -> Task {
        Task {
            id,
            name: format!("task {}", id),
            description: String::new(),
            due_date: None,
            assigned_to: None,
            completed: false,
            created_by: Principal::new("2vxsx-fae"),
            recurring_chore_id: None,
        }
    }

    #[test]
    fn test_ids_are_sequential_and_shared_between_repositories() {
        let conn = MemoryConnection::new();
        let first = conn.create_task_repository();
        let second = conn.create_task_repository();
        assert_eq!(first.next_task_id().unwrap(), 1);
        assert_eq!(second.next_task_id().unwrap(), 2);
    }

    #[test]
    fn test_task_crud() {
        let repo = MemoryConnection::new().create_task_repository();
        repo.store_task(&task(1)).unwrap();
        assert!(repo.store_task(&task(1)).is_err());

        let mut stored = repo.get_task(1).unwrap().unwrap();
        stored.completed = true;
        repo.update_task(&stored).unwrap();
        assert!(repo.get_task(1).unwrap().unwrap().completed);

        assert!(repo.update_task(&task(9)).is_err());
        assert!(repo.delete_task(1).unwrap());
        assert!(!repo.delete_task(1).unwrap());
        assert!(repo.list_tasks().unwrap().is_empty());
    }

    #[test]
    fn test_cooking_upsert_replaces_same_day() {
        let repo = MemoryConnection::new().create_cooking_repository();
        let mut assignment = CookingAssignment {
            day: "2024-03-04".to_string(),
            cook: None,
            cook_name: Some("Alex".to_string()),
            meal: None,
            assigned_by: Principal::new("2vxsx-fae"),
        };
        repo.upsert_cooking_assignment(&assignment).unwrap();
        assignment.cook_name = Some("Sam".to_string());
        repo.upsert_cooking_assignment(&assignment).unwrap();

        let all = repo.list_cooking_assignments().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].cook_name.as_deref(), Some("Sam"));
    }

    #[test]
    fn test_profile_upsert_and_delete() {
        let repo = MemoryConnection::new().create_profile_repository();
        let principal = Principal::new("2vxsx-fae");
        let mut profile = PersonProfile {
            principal: principal.clone(),
            display_name: "Demo".to_string(),
            color: "#000000".to_string(),
        };
        repo.upsert_profile(&profile).unwrap();
        profile.display_name = "Casey".to_string();
        repo.upsert_profile(&profile).unwrap();

        assert_eq!(repo.list_profiles().unwrap().len(), 1);
        assert_eq!(repo.get_profile(&principal).unwrap().unwrap().display_name, "Casey");
        assert!(repo.delete_profile(&principal).unwrap());
        assert!(repo.get_profile(&principal).unwrap().is_none());
    }

    #[test]
    fn test_snapshot_round_trip_preserves_counters() {
        let snapshot = Snapshot {
            next_task_id: 1,
            tasks: vec![task(4)],
            recurring_chores: vec![RecurringChore {
                id: 2,
                name: "Bins".to_string(),
                description: String::new(),
                weekday: 1,
                timeline: Timeline::Weekly,
                assigned_to: None,
                created_by: Principal::new("2vxsx-fae"),
                paused: false,
            }],
            ..Snapshot::default()
        };
        let conn = MemoryConnection::from_snapshot(snapshot);
        assert_eq!(conn.create_task_repository().next_task_id().unwrap(), 5);
        assert_eq!(conn.create_chore_repository().next_chore_id().unwrap(), 3);

        let exported = conn.to_snapshot().unwrap();
        assert_eq!(exported.next_task_id, 6);
        assert_eq!(exported.tasks.len(), 1);
        assert_eq!(exported.recurring_chores.len(), 1);
    }
}
