//! Domain failures raised by the household services.

use shared::Principal;

/// Which mutation an ownership check guarded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardedAction {
    Update,
    Delete,
    Pause,
}

impl GuardedAction {
    fn verb(&self) -> &'static str {
        match self {
            GuardedAction::Update => "update",
            GuardedAction::Delete => "delete",
            GuardedAction::Pause => "pause or resume",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HouseholdError {
    #[error("Task not found: {0}")]
    TaskNotFound(u64),
    #[error("Recurring chore not found: {0}")]
    ChoreNotFound(u64),
    #[error("Profile not found: {0}")]
    ProfileNotFound(Principal),
    #[error("Cannot {} {subject}: only its creator may do that", .action.verb())]
    Unauthorized {
        action: GuardedAction,
        subject: String,
    },
    #[error("Invalid weekday: {0}. Must be 0-6 (Sunday-Saturday)")]
    InvalidWeekday(u8),
    #[error("Person profile does not exist for {0}")]
    UnknownProfile(Principal),
    #[error("Invalid day key: {0}. Expected yyyy-mm-dd")]
    InvalidDayKey(String),
    #[error("Name cannot be empty")]
    EmptyName,
    #[error("Cooking day {0} is already assigned")]
    AssignmentExists(String),
    #[error("No cooking assignment exists for {0}")]
    AssignmentMissing(String),
}

impl HouseholdError {
    /// Sentence suitable for showing to a household member
    pub fn user_message(&self) -> String {
        match self {
            HouseholdError::TaskNotFound(_) => {
                "Task not found. It may have been deleted.".to_string()
            }
            HouseholdError::ChoreNotFound(_) => {
                "Recurring chore not found. It may have been deleted.".to_string()
            }
            HouseholdError::ProfileNotFound(_) => {
                "Profile not found. It may have been deleted.".to_string()
            }
            HouseholdError::Unauthorized { .. } => {
                "You can only modify items you created".to_string()
            }
            HouseholdError::InvalidWeekday(_) => {
                "Invalid weekday selected. Please choose a day between Sunday and Saturday."
                    .to_string()
            }
            HouseholdError::UnknownProfile(_) => {
                "The assigned person does not have a profile. Please create a profile first or leave unassigned."
                    .to_string()
            }
            HouseholdError::InvalidDayKey(key) => {
                format!("'{}' is not a valid date. Use the format yyyy-mm-dd.", key)
            }
            HouseholdError::EmptyName => "Please enter a name.".to_string(),
            HouseholdError::AssignmentExists(day) => {
                format!("Someone is already cooking on {}. Edit that assignment instead.", day)
            }
            HouseholdError::AssignmentMissing(day) => {
                format!("Nobody is assigned to cook on {} yet.", day)
            }
        }
    }

    /// Best user message for an arbitrary service error
    pub fn describe(error: &anyhow::Error) -> String {
        match error.downcast_ref::<HouseholdError>() {
            Some(household_error) => household_error.user_message(),
            None => format!("{:#}", error),
        }
    }
}
