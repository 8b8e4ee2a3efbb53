//! Dinner rota: who cooks on which day, and how fairly the cooking is shared.

use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate};
use log::{info, warn};
use shared::{CookingAssignment, CookingDayRequest, FairnessRange, FairnessStats, Principal, RotaSlot};

use crate::domain::day_key::DayKey;
use crate::domain::errors::{GuardedAction, HouseholdError};
use crate::domain::fairness;
use crate::domain::labels;
use crate::storage::{Connection, CookingStorage, ProfileStorage};

#[derive(Clone)]
pub struct CookingService<C: Connection> {
    cooking_repository: C::CookingRepository,
    profile_repository: C::ProfileRepository,
}

/// Blank free-text fields are stored as absent
fn non_blank(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

impl<C: Connection> CookingService<C> {
    pub fn new(connection: &C) -> Self {
        Self {
            cooking_repository: connection.create_cooking_repository(),
            profile_repository: connection.create_profile_repository(),
        }
    }

    /// Unassigned days are open to anyone; otherwise only whoever assigned it
    pub fn can_edit_assignment(assignment: Option<&CookingAssignment>, caller: &Principal) -> bool {
        assignment.map_or(true, |a| &a.assigned_by == caller)
    }

    fn parse_day(day: &str) -> Result<DayKey> {
        Ok(day.trim().parse::<DayKey>()?)
    }

    /// Assign a cook to a day that has no assignment yet
    pub fn assign_cooking_day(
        &self,
        caller: &Principal,
        request: CookingDayRequest,
    ) -> Result<CookingAssignment> {
        let day = Self::parse_day(&request.day)?.to_string();
        info!("Assigning cooking day {} for {}", day, caller);

        if self.cooking_repository.get_cooking_assignment(&day)?.is_some() {
            return Err(HouseholdError::AssignmentExists(day).into());
        }

        let assignment = CookingAssignment {
            day,
            cook: request.cook,
            cook_name: non_blank(request.cook_name),
            meal: non_blank(request.meal),
            assigned_by: caller.clone(),
        };
        self.cooking_repository.upsert_cooking_assignment(&assignment)?;
        Ok(assignment)
    }

    /// Change an existing assignment. Only whoever assigned the day may edit it.
    pub fn update_cooking_day(
        &self,
        caller: &Principal,
        request: CookingDayRequest,
    ) -> Result<CookingAssignment> {
        let day = Self::parse_day(&request.day)?.to_string();
        info!("Updating cooking day {}", day);

        let existing = self
            .cooking_repository
            .get_cooking_assignment(&day)?
            .ok_or_else(|| HouseholdError::AssignmentMissing(day.clone()))?;
        if !Self::can_edit_assignment(Some(&existing), caller) {
            warn!("{} may not edit cooking day {} assigned by {}", caller, day, existing.assigned_by);
            return Err(HouseholdError::Unauthorized {
                action: GuardedAction::Update,
                subject: format!("cooking day {}", day),
            }
            .into());
        }

        let assignment = CookingAssignment {
            day,
            cook: request.cook,
            cook_name: non_blank(request.cook_name),
            meal: non_blank(request.meal),
            assigned_by: existing.assigned_by,
        };
        self.cooking_repository.upsert_cooking_assignment(&assignment)?;
        Ok(assignment)
    }

    /// Assign the day if it is free, otherwise update it
    pub fn set_cooking_day(
        &self,
        caller: &Principal,
        request: CookingDayRequest,
    ) -> Result<CookingAssignment> {
        let day = Self::parse_day(&request.day)?.to_string();
        if self.cooking_repository.get_cooking_assignment(&day)?.is_some() {
            self.update_cooking_day(caller, request)
        } else {
            self.assign_cooking_day(caller, request)
        }
    }

    pub fn get_cooking_assignment(&self, date: NaiveDate) -> Result<Option<CookingAssignment>> {
        self.cooking_repository
            .get_cooking_assignment(&DayKey::from_date(date).to_string())
    }

    pub fn list_cooking_assignments(&self) -> Result<Vec<CookingAssignment>> {
        self.cooking_repository.list_cooking_assignments()
    }

    /// Monday-to-Sunday rota for the week containing `today`
    pub fn week_rota(&self, today: NaiveDate) -> Result<Vec<RotaSlot>> {
        let profiles = self.profile_repository.list_profiles()?;
        let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);

        (0..7)
            .map(|offset| -> Result<RotaSlot> {
                let date = monday + Duration::days(offset);
                let day_key = DayKey::from_date(date).to_string();
                let assignment = self.cooking_repository.get_cooking_assignment(&day_key)?;
                let cook = labels::cooking_assignment_display(assignment.as_ref(), &profiles);
                Ok(RotaSlot {
                    date,
                    day_key,
                    assignment,
                    cook,
                })
            })
            .collect()
    }

    pub fn fairness(&self, range: FairnessRange, today: NaiveDate) -> Result<FairnessStats> {
        let assignments = self.cooking_repository.list_cooking_assignments()?;
        let profiles = self.profile_repository.list_profiles()?;
        let stats = fairness::compute_fairness(&assignments, &profiles, range, today);
        info!(
            "Fairness for {}: {} cooks over {} assignments",
            stats.period_label,
            stats.counts.len(),
            assignments.len()
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryConnection;
    use shared::PersonProfile;

    fn setup_test() -> (MemoryConnection, CookingService<MemoryConnection>) {
        let connection = MemoryConnection::new();
        let service = CookingService::new(&connection);
        (connection, service)
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

    fn named(day: &str, name: &str) -> CookingDayRequest {
        CookingDayRequest {
            day: day.to_string(),
            cook: None,
            cook_name: Some(name.to_string()),
            meal: None,
        }
    }

    #[test]
    fn test_assign_cooking_day() {
        let (_, service) = setup_test();
        let assignment = service
            .assign_cooking_day(
                &alex(),
                CookingDayRequest {
                    day: "2024-03-04".to_string(),
                    cook: Some(sam()),
                    cook_name: Some("   ".to_string()),
                    meal: Some(" Lasagne ".to_string()),
                },
            )
            .unwrap();

        assert_eq!(assignment.assigned_by, alex());
        assert_eq!(assignment.cook_name, None);
        assert_eq!(assignment.meal.as_deref(), Some("Lasagne"));
        assert_eq!(
            service.get_cooking_assignment(date(2024, 3, 4)).unwrap(),
            Some(assignment)
        );
    }

    #[test]
    fn test_assign_rejects_taken_day_and_bad_key() {
        let (_, service) = setup_test();
        service.assign_cooking_day(&alex(), named("2024-03-04", "Alex")).unwrap();

        let err = service
            .assign_cooking_day(&sam(), named("2024-03-04", "Sam"))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HouseholdError>(),
            Some(HouseholdError::AssignmentExists(_))
        ));

        let err = service
            .assign_cooking_day(&sam(), named("2024-3-4", "Sam"))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HouseholdError>(),
            Some(HouseholdError::InvalidDayKey(_))
        ));
    }

    #[test]
    fn test_update_requires_original_assigner() {
        let (_, service) = setup_test();
        let err = service
            .update_cooking_day(&alex(), named("2024-03-05", "Alex"))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HouseholdError>(),
            Some(HouseholdError::AssignmentMissing(_))
        ));

        service.assign_cooking_day(&alex(), named("2024-03-05", "Alex")).unwrap();
        assert!(service
            .update_cooking_day(&sam(), named("2024-03-05", "Sam"))
            .is_err());

        let updated = service
            .update_cooking_day(&alex(), named("2024-03-05", "Jordan"))
            .unwrap();
        assert_eq!(updated.cook_name.as_deref(), Some("Jordan"));
        assert_eq!(updated.assigned_by, alex());
    }

    #[test]
    fn test_can_edit_assignment() {
        let assignment = CookingAssignment {
            day: "2024-03-05".to_string(),
            cook: None,
            cook_name: Some("Alex".to_string()),
            meal: None,
            assigned_by: alex(),
        };
        assert!(CookingService::<MemoryConnection>::can_edit_assignment(None, &sam()));
        assert!(CookingService::<MemoryConnection>::can_edit_assignment(Some(&assignment), &alex()));
        assert!(!CookingService::<MemoryConnection>::can_edit_assignment(Some(&assignment), &sam()));
    }

    #[test]
    fn test_set_cooking_day_assigns_then_updates() {
        let (_, service) = setup_test();
        service.set_cooking_day(&alex(), named("2024-03-06", "Alex")).unwrap();
        service.set_cooking_day(&alex(), named("2024-03-06", "Casey")).unwrap();

        let all = service.list_cooking_assignments().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].cook_name.as_deref(), Some("Casey"));
    }

    #[test]
    fn test_week_rota_runs_monday_to_sunday() {
        let (connection, service) = setup_test();
        connection
            .create_profile_repository()
            .upsert_profile(&PersonProfile {
                principal: sam(),
                display_name: "Sam".to_string(),
                color: "#00AA88".to_string(),
            })
            .unwrap();
        service
            .assign_cooking_day(
                &alex(),
                CookingDayRequest {
                    day: "2024-03-06".to_string(),
                    cook: Some(sam()),
                    cook_name: None,
                    meal: Some("Curry".to_string()),
                },
            )
            .unwrap();

        // Thursday
        let rota = service.week_rota(date(2024, 3, 7)).unwrap();
        assert_eq!(rota.len(), 7);
        assert_eq!(rota[0].day_key, "2024-03-04");
        assert_eq!(rota[6].day_key, "2024-03-10");
        assert_eq!(rota[2].cook.label, "Sam");
        assert_eq!(rota[2].cook.color.as_deref(), Some("#00AA88"));
        assert!(rota[0].assignment.is_none());
        assert_eq!(rota[0].cook.label, "");
    }

    #[test]
    fn test_fairness_counts_recent_cooks() {
        let (_, service) = setup_test();
        service.assign_cooking_day(&alex(), named("2024-03-01", "Alex")).unwrap();
        service.assign_cooking_day(&alex(), named("2024-03-02", "Alex")).unwrap();
        service.assign_cooking_day(&alex(), named("2024-03-03", "Sam")).unwrap();

        let stats = service
            .fairness(FairnessRange::Last4Weeks, date(2024, 3, 10))
            .unwrap();
        assert_eq!(stats.count_for("Alex"), Some(2));
        assert_eq!(stats.count_for("Sam"), Some(1));
        assert_eq!(stats.most_cooked.map(|c| c.label), Some("Alex".to_string()));
        assert_eq!(stats.least_cooked.map(|c| c.label), Some("Sam".to_string()));
    }
}
