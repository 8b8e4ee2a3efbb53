use anyhow::Result;
use log::info;
use shared::{PersonDisplay, PersonProfile, Principal};

use crate::domain::errors::HouseholdError;
use crate::domain::labels;
use crate::storage::{Connection, ProfileStorage};

/// Service for managing person profiles (display name and colour per principal)
#[derive(Clone)]
pub struct ProfileService<C: Connection> {
    profile_repository: C::ProfileRepository,
}

impl<C: Connection> ProfileService<C> {
    pub fn new(connection: &C) -> Self {
        Self {
            profile_repository: connection.create_profile_repository(),
        }
    }

    /// Colours are `#RRGGBB` hex strings
    fn validate_color(color: &str) -> Result<()> {
        let valid = color.len() == 7
            && color.starts_with('#')
            && color[1..].chars().all(|c| c.is_ascii_hexdigit());
        if !valid {
            return Err(anyhow::anyhow!(
                "Invalid colour '{}'. Use a hex colour like #FF6B35",
                color
            ));
        }
        Ok(())
    }

    pub fn upsert_profile(&self, profile: PersonProfile) -> Result<PersonProfile> {
        let display_name = profile.display_name.trim().to_string();
        if display_name.is_empty() {
            return Err(HouseholdError::EmptyName.into());
        }
        let color = profile.color.trim().to_uppercase();
        Self::validate_color(&color)?;

        let profile = PersonProfile {
            principal: profile.principal,
            display_name,
            color,
        };
        self.profile_repository.upsert_profile(&profile)?;
        info!("Saved profile '{}' for {}", profile.display_name, profile.principal);
        Ok(profile)
    }

    pub fn get_profile(&self, principal: &Principal) -> Result<Option<PersonProfile>> {
        self.profile_repository.get_profile(principal)
    }

    pub fn list_profiles(&self) -> Result<Vec<PersonProfile>> {
        self.profile_repository.list_profiles()
    }

    pub fn delete_profile(&self, principal: &Principal) -> Result<()> {
        info!("Deleting profile for {}", principal);
        if !self.profile_repository.delete_profile(principal)? {
            return Err(HouseholdError::ProfileNotFound(principal.clone()).into());
        }
        Ok(())
    }

    pub fn resolve_person_display(&self, principal: Option<&Principal>) -> Result<PersonDisplay> {
        let profiles = self.list_profiles()?;
        Ok(labels::resolve_person_display(principal, &profiles))
    }
}
