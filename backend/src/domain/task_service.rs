use anyhow::Result;
use chrono::NaiveDate;
use log::{info, warn};
use shared::{AddTaskRequest, Principal, RecurringChore, Task, TaskDayGroup, UpdateTaskRequest};

use crate::domain::commands::{ClearCompletedResult, DeleteResult};
use crate::domain::day_key::{self, DayKey};
use crate::domain::errors::{GuardedAction, HouseholdError};
use crate::storage::{Connection, TaskStorage};

/// Service for managing the shared task list
#[derive(Clone)]
pub struct TaskService<C: Connection> {
    task_repository: C::TaskRepository,
}

impl<C: Connection> TaskService<C> {
    pub fn new(connection: &C) -> Self {
        Self {
            task_repository: connection.create_task_repository(),
        }
    }

    /// Only the creator of a task may edit or delete it
    pub fn can_edit_task(task: &Task, caller: &Principal) -> bool {
        &task.created_by == caller
    }

    fn ensure_can_edit(task: &Task, caller: &Principal, action: GuardedAction) -> Result<()> {
        if !Self::can_edit_task(task, caller) {
            warn!("{} may not {:?} task {} created by {}", caller, action, task.id, task.created_by);
            return Err(HouseholdError::Unauthorized {
                action,
                subject: format!("task {}", task.id),
            }
            .into());
        }
        Ok(())
    }

    fn clean_name(name: &str) -> Result<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(HouseholdError::EmptyName.into());
        }
        Ok(trimmed.to_string())
    }

    pub fn add_task(&self, caller: &Principal, request: AddTaskRequest) -> Result<Task> {
        info!("Adding task '{}' for {}", request.name, caller);

        let name = Self::clean_name(&request.name)?;
        let task = Task {
            id: self.task_repository.next_task_id()?,
            name,
            description: request.description.trim().to_string(),
            due_date: request.due_date,
            assigned_to: request.assigned_to,
            completed: false,
            created_by: caller.clone(),
            recurring_chore_id: None,
        };
        self.task_repository.store_task(&task)?;

        info!("Created task {} '{}'", task.id, task.name);
        Ok(task)
    }

    /// Turn one occurrence of a recurring chore into a concrete task due on `date`
    pub fn add_task_from_chore(
        &self,
        caller: &Principal,
        chore: &RecurringChore,
        date: NaiveDate,
    ) -> Result<Task> {
        info!("Creating task from recurring chore {} for {}", chore.id, date);

        let task = Task {
            id: self.task_repository.next_task_id()?,
            name: chore.name.clone(),
            description: chore.description.clone(),
            due_date: day_key::date_to_timestamp(date),
            assigned_to: chore.assigned_to.clone(),
            completed: false,
            created_by: caller.clone(),
            recurring_chore_id: Some(chore.id),
        };
        self.task_repository.store_task(&task)?;
        Ok(task)
    }

    pub fn get_task(&self, id: u64) -> Result<Task> {
        self.task_repository
            .get_task(id)?
            .ok_or_else(|| HouseholdError::TaskNotFound(id).into())
    }

    pub fn update_task(&self, caller: &Principal, request: UpdateTaskRequest) -> Result<Task> {
        info!("Updating task {}", request.id);

        let mut task = self.get_task(request.id)?;
        Self::ensure_can_edit(&task, caller, GuardedAction::Update)?;

        task.name = Self::clean_name(&request.name)?;
        task.description = request.description.trim().to_string();
        task.due_date = request.due_date;
        task.assigned_to = request.assigned_to;
        self.task_repository.update_task(&task)?;

        info!("Updated task {} '{}'", task.id, task.name);
        Ok(task)
    }

    pub fn delete_task(&self, caller: &Principal, id: u64) -> Result<DeleteResult> {
        info!("Deleting task {}", id);

        let task = self.get_task(id)?;
        Self::ensure_can_edit(&task, caller, GuardedAction::Delete)?;
        self.task_repository.delete_task(id)?;

        Ok(DeleteResult {
            success_message: format!("Task '{}' deleted successfully", task.name),
        })
    }

    /// Any household member may tick a task off or reopen it
    pub fn toggle_task_completion(&self, caller: &Principal, id: u64) -> Result<Task> {
        let mut task = self.get_task(id)?;
        task.completed = !task.completed;
        self.task_repository.update_task(&task)?;

        info!(
            "{} marked task {} as {}",
            caller,
            id,
            if task.completed { "done" } else { "pending" }
        );
        Ok(task)
    }

    /// Remove the caller's completed tasks. Other members' tasks are untouched.
    pub fn clear_completed_tasks(&self, caller: &Principal) -> Result<ClearCompletedResult> {
        info!("Clearing completed tasks created by {}", caller);

        let mut cleared_ids = Vec::new();
        for task in self.task_repository.list_tasks()? {
            if task.completed && Self::can_edit_task(&task, caller) {
                self.task_repository.delete_task(task.id)?;
                cleared_ids.push(task.id);
            }
        }

        info!("Cleared {} completed tasks", cleared_ids.len());
        Ok(ClearCompletedResult {
            success_message: format!("Cleared {} completed tasks", cleared_ids.len()),
            cleared_ids,
        })
    }

    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        self.task_repository.list_tasks()
    }

    pub fn pending_tasks(&self) -> Result<Vec<Task>> {
        Ok(self.list_tasks()?.into_iter().filter(|t| !t.completed).collect())
    }

    pub fn completed_tasks(&self) -> Result<Vec<Task>> {
        Ok(self.list_tasks()?.into_iter().filter(|t| t.completed).collect())
    }

    pub fn tasks_by_assignee(&self, assignee: &Principal) -> Result<Vec<Task>> {
        Ok(self
            .list_tasks()?
            .into_iter()
            .filter(|t| t.assigned_to.as_ref() == Some(assignee))
            .collect())
    }

    /// Tasks whose due date falls on the local calendar day `date`
    pub fn tasks_due_on(&self, date: NaiveDate) -> Result<Vec<Task>> {
        let key = DayKey::from_date(date);
        Ok(self
            .list_tasks()?
            .into_iter()
            .filter(|t| day_key::due_day_key(t.due_date) == Some(key))
            .collect())
    }

    /// Ascending by due date; undated tasks last, ties by id
    pub fn tasks_sorted_by_due_date(&self) -> Result<Vec<Task>> {
        let mut tasks = self.list_tasks()?;
        tasks.sort_by_key(|t| (t.due_date.is_none(), t.due_date, t.id));
        Ok(tasks)
    }

    pub fn tasks_grouped_by_day(&self) -> Result<Vec<TaskDayGroup>> {
        Ok(day_key::group_tasks_by_day(&self.list_tasks()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryConnection;
    use shared::Timeline;

    fn setup_test() -> TaskService<MemoryConnection> {
        TaskService::new(&MemoryConnection::new())
    }

    fn alex() -> Principal {
        Principal::new("2vxsx-fae")
    }

    fn sam() -> Principal {
        Principal::new("rrkah-fqaaa-aaaaa-aaaaq-cai")
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn add(service: &TaskService<MemoryConnection>, who: &Principal, name: &str, due: Option<NaiveDate>) -> Task {
        service
            .add_task(
                who,
                AddTaskRequest {
                    name: name.to_string(),
                    description: String::new(),
                    due_date: due.and_then(day_key::date_to_timestamp),
                    assigned_to: None,
                },
            )
            .expect("Failed to add task")
    }

    #[test]
    fn test_add_task_trims_and_records_creator() {
        let service = setup_test();
        let task = service
            .add_task(
                &alex(),
                AddTaskRequest {
                    name: "  Take out the trash ".to_string(),
                    description: " recyclables too ".to_string(),
                    due_date: None,
                    assigned_to: Some(sam()),
                },
            )
            .unwrap();

        assert_eq!(task.id, 1);
        assert_eq!(task.name, "Take out the trash");
        assert_eq!(task.description, "recyclables too");
        assert_eq!(task.created_by, alex());
        assert_eq!(task.assigned_to, Some(sam()));
        assert!(!task.completed);
    }

    #[test]
    fn test_add_task_rejects_blank_name() {
        let service = setup_test();
        let result = service.add_task(
            &alex(),
            AddTaskRequest {
                name: "   ".to_string(),
                description: String::new(),
                due_date: None,
                assigned_to: None,
            },
        );
        assert!(result.unwrap_err().to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_only_creator_can_update_or_delete() {
        let service = setup_test();
        let task = add(&service, &alex(), "Vacuum", None);

        let update = UpdateTaskRequest {
            id: task.id,
            name: "Vacuum upstairs".to_string(),
            description: String::new(),
            due_date: None,
            assigned_to: None,
        };
        let err = service.update_task(&sam(), update.clone()).unwrap_err();
        assert!(err.to_string().contains("Cannot update"));
        let err = service.delete_task(&sam(), task.id).unwrap_err();
        assert!(err.to_string().contains("Cannot delete"));

        let updated = service.update_task(&alex(), update).unwrap();
        assert_eq!(updated.name, "Vacuum upstairs");
        service.delete_task(&alex(), task.id).unwrap();
        assert!(service.list_tasks().unwrap().is_empty());
    }

    #[test]
    fn test_missing_task_is_not_found() {
        let service = setup_test();
        let err = service.toggle_task_completion(&alex(), 42).unwrap_err();
        assert_eq!(
            err.downcast_ref::<HouseholdError>(),
            Some(&HouseholdError::TaskNotFound(42))
        );
    }

    #[test]
    fn test_anyone_can_toggle_completion() {
        let service = setup_test();
        let task = add(&service, &alex(), "Dishes", None);

        assert!(service.toggle_task_completion(&sam(), task.id).unwrap().completed);
        assert_eq!(service.completed_tasks().unwrap().len(), 1);
        assert!(service.pending_tasks().unwrap().is_empty());

        assert!(!service.toggle_task_completion(&alex(), task.id).unwrap().completed);
        assert_eq!(service.pending_tasks().unwrap().len(), 1);
    }

    #[test]
    fn test_clear_completed_only_removes_callers_tasks() {
        let service = setup_test();
        let mine = add(&service, &alex(), "Mine", None);
        let theirs = add(&service, &sam(), "Theirs", None);
        let open = add(&service, &alex(), "Open", None);
        service.toggle_task_completion(&alex(), mine.id).unwrap();
        service.toggle_task_completion(&alex(), theirs.id).unwrap();

        let result = service.clear_completed_tasks(&alex()).unwrap();
        assert_eq!(result.cleared_ids, vec![mine.id]);

        let remaining: Vec<u64> = service.list_tasks().unwrap().iter().map(|t| t.id).collect();
        assert_eq!(remaining, vec![theirs.id, open.id]);
    }

    #[test]
    fn test_due_date_queries() {
        let service = setup_test();
        let later = add(&service, &alex(), "Later", Some(date(2024, 3, 9)));
        let undated = add(&service, &alex(), "Someday", None);
        let soon = add(&service, &alex(), "Soon", Some(date(2024, 3, 4)));
        let also_soon = add(&service, &sam(), "Also soon", Some(date(2024, 3, 4)));

        let due: Vec<u64> = service
            .tasks_due_on(date(2024, 3, 4))
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(due, vec![soon.id, also_soon.id]);

        let sorted: Vec<u64> = service
            .tasks_sorted_by_due_date()
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(sorted, vec![soon.id, also_soon.id, later.id, undated.id]);

        let groups = service.tasks_grouped_by_day().unwrap();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].tasks.len(), 2);
    }

    #[test]
    fn test_tasks_by_assignee() {
        let service = setup_test();
        service
            .add_task(
                &alex(),
                AddTaskRequest {
                    name: "Walk the dog".to_string(),
                    description: String::new(),
                    due_date: None,
                    assigned_to: Some(sam()),
                },
            )
            .unwrap();
        add(&service, &alex(), "Unassigned", None);

        assert_eq!(service.tasks_by_assignee(&sam()).unwrap().len(), 1);
        assert!(service.tasks_by_assignee(&alex()).unwrap().is_empty());
    }

    #[test]
    fn test_add_task_from_chore_links_back() {
        let service = setup_test();
        let chore = RecurringChore {
            id: 7,
            name: "Mow the lawn".to_string(),
            description: "Front and back".to_string(),
            weekday: 6,
            timeline: Timeline::Weekly,
            assigned_to: Some(sam()),
            created_by: alex(),
            paused: false,
        };
        let task = service
            .add_task_from_chore(&alex(), &chore, date(2024, 3, 9))
            .unwrap();

        assert_eq!(task.recurring_chore_id, Some(7));
        assert_eq!(task.assigned_to, Some(sam()));
        assert_eq!(service.tasks_due_on(date(2024, 3, 9)).unwrap().len(), 1);
    }
}
