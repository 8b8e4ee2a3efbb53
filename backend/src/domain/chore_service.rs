//! Recurring chore management.
//!
//! Chores are created by one household member and may only be changed,
//! paused or deleted by that member. An assignee, when given, must already
//! have a person profile.

use anyhow::Result;
use chrono::NaiveDate;
use log::{debug, info, warn};
use shared::{
    CreateRecurringChoreRequest, GroupedChores, PauseResumeChoreRequest, Principal, RecurringChore,
    UpdateRecurringChoreRequest,
};

use crate::domain::errors::{GuardedAction, HouseholdError};
use crate::domain::recurrence;
use crate::storage::{ChoreStorage, Connection, ProfileStorage};

#[derive(Clone)]
pub struct ChoreService<C: Connection> {
    chore_repository: C::ChoreRepository,
    profile_repository: C::ProfileRepository,
}

impl<C: Connection> ChoreService<C> {
    pub fn new(connection: &C) -> Self {
        Self {
            chore_repository: connection.create_chore_repository(),
            profile_repository: connection.create_profile_repository(),
        }
    }

    pub fn can_edit_chore(chore: &RecurringChore, caller: &Principal) -> bool {
        &chore.created_by == caller
    }

    fn ensure_can_edit(
        chore: &RecurringChore,
        caller: &Principal,
        action: GuardedAction,
    ) -> Result<()> {
        if !Self::can_edit_chore(chore, caller) {
            warn!(
                "{} may not {:?} recurring chore {} created by {}",
                caller, action, chore.id, chore.created_by
            );
            return Err(HouseholdError::Unauthorized {
                action,
                subject: format!("recurring chore {}", chore.id),
            }
            .into());
        }
        Ok(())
    }

    /// Validate the editable fields and return the trimmed name
    fn validate_chore(
        &self,
        name: &str,
        weekday: u8,
        assigned_to: Option<&Principal>,
    ) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(HouseholdError::EmptyName.into());
        }
        if weekday > 6 {
            return Err(HouseholdError::InvalidWeekday(weekday).into());
        }
        if let Some(assignee) = assigned_to {
            if self.profile_repository.get_profile(assignee)?.is_none() {
                return Err(HouseholdError::UnknownProfile(assignee.clone()).into());
            }
        }
        Ok(name.to_string())
    }

    pub fn create_recurring_chore(
        &self,
        caller: &Principal,
        request: CreateRecurringChoreRequest,
    ) -> Result<RecurringChore> {
        info!(
            "Creating {} chore '{}' on {}",
            request.timeline,
            request.name,
            recurrence::weekday_label(request.weekday)
        );

        let name = self.validate_chore(&request.name, request.weekday, request.assigned_to.as_ref())?;
        let chore = RecurringChore {
            id: self.chore_repository.next_chore_id()?,
            name,
            description: request.description.trim().to_string(),
            weekday: request.weekday,
            timeline: request.timeline,
            assigned_to: request.assigned_to,
            created_by: caller.clone(),
            paused: false,
        };
        self.chore_repository.store_chore(&chore)?;

        info!("Created recurring chore {} '{}'", chore.id, chore.name);
        Ok(chore)
    }

    pub fn get_chore(&self, id: u64) -> Result<RecurringChore> {
        self.chore_repository
            .get_chore(id)?
            .ok_or_else(|| HouseholdError::ChoreNotFound(id).into())
    }

    /// Replace the editable fields. The paused flag is left as it was.
    pub fn update_recurring_chore(
        &self,
        caller: &Principal,
        request: UpdateRecurringChoreRequest,
    ) -> Result<RecurringChore> {
        info!("Updating recurring chore {}", request.id);

        let mut chore = self.get_chore(request.id)?;
        Self::ensure_can_edit(&chore, caller, GuardedAction::Update)?;

        chore.name = self.validate_chore(&request.name, request.weekday, request.assigned_to.as_ref())?;
        chore.description = request.description.trim().to_string();
        chore.weekday = request.weekday;
        chore.timeline = request.timeline;
        chore.assigned_to = request.assigned_to;
        self.chore_repository.update_chore(&chore)?;

        Ok(chore)
    }

    pub fn delete_recurring_chore(&self, caller: &Principal, id: u64) -> Result<RecurringChore> {
        info!("Deleting recurring chore {}", id);

        let chore = self.get_chore(id)?;
        Self::ensure_can_edit(&chore, caller, GuardedAction::Delete)?;
        self.chore_repository.delete_chore(id)?;

        Ok(chore)
    }

    pub fn pause_resume_recurring_chore(
        &self,
        caller: &Principal,
        request: PauseResumeChoreRequest,
    ) -> Result<RecurringChore> {
        let mut chore = self.get_chore(request.id)?;
        Self::ensure_can_edit(&chore, caller, GuardedAction::Pause)?;

        if chore.paused == request.pause {
            debug!("Recurring chore {} already has paused = {}", chore.id, chore.paused);
            return Ok(chore);
        }

        chore.paused = request.pause;
        self.chore_repository.update_chore(&chore)?;
        info!(
            "{} recurring chore {} '{}'",
            if chore.paused { "Paused" } else { "Resumed" },
            chore.id,
            chore.name
        );
        Ok(chore)
    }

    pub fn list_chores(&self) -> Result<Vec<RecurringChore>> {
        self.chore_repository.list_chores()
    }

    pub fn active_chores(&self) -> Result<Vec<RecurringChore>> {
        Ok(self.list_chores()?.into_iter().filter(|c| !c.paused).collect())
    }

    /// Chores that occur on `date` according to their timeline
    pub fn chores_for_date(&self, date: NaiveDate) -> Result<Vec<RecurringChore>> {
        let chores = self.list_chores()?;
        Ok(recurrence::occurrences_on(&chores, date)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn grouped_by_weekday(&self, today: NaiveDate) -> Result<Vec<GroupedChores>> {
        Ok(recurrence::group_by_weekday(&self.list_chores()?, today))
    }

    /// Soonest active chores by weekday distance from `today`
    pub fn upcoming_chores(&self, today: NaiveDate, limit: usize) -> Result<Vec<RecurringChore>> {
        Ok(recurrence::upcoming_chores(&self.active_chores()?, today, limit))
    }
}
