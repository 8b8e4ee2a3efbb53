//! Display labels and colours for people and dinner rota entries.

use shared::{CookingAssignment, PersonDisplay, PersonProfile, Principal};

pub const NO_COOK_LABEL: &str = "No cook assigned";

pub fn find_profile<'a>(
    principal: &Principal,
    profiles: &'a [PersonProfile],
) -> Option<&'a PersonProfile> {
    profiles.iter().find(|profile| &profile.principal == principal)
}

/// Profile display name and colour, falling back to the shortened principal
pub fn resolve_person_display(
    principal: Option<&Principal>,
    profiles: &[PersonProfile],
) -> PersonDisplay {
    let Some(principal) = principal else {
        return PersonDisplay::default();
    };

    match find_profile(principal, profiles) {
        Some(profile) => PersonDisplay {
            label: profile.display_name.clone(),
            color: Some(profile.color.clone()),
        },
        None => PersonDisplay {
            label: principal.short(),
            color: None,
        },
    }
}

/// Label for a cooking assignment.
///
/// Precedence: matching profile name, then the free-text cook name, then the
/// shortened cook principal. Returns `None` when none of those is available.
pub fn cooking_assignment_label(
    assignment: &CookingAssignment,
    profiles: &[PersonProfile],
) -> Option<String> {
    if let Some(profile) = assignment
        .cook
        .as_ref()
        .and_then(|cook| find_profile(cook, profiles))
    {
        return Some(profile.display_name.clone());
    }

    if let Some(name) = assignment.cook_name.as_deref().filter(|name| !name.is_empty()) {
        return Some(name.to_string());
    }

    assignment.cook.as_ref().map(Principal::short)
}

/// Profile colour of the assigned cook, if the cook has a profile
pub fn cooking_assignment_color(
    assignment: &CookingAssignment,
    profiles: &[PersonProfile],
) -> Option<String> {
    assignment
        .cook
        .as_ref()
        .and_then(|cook| find_profile(cook, profiles))
        .map(|profile| profile.color.clone())
}

pub fn cooking_assignment_display(
    assignment: Option<&CookingAssignment>,
    profiles: &[PersonProfile],
) -> PersonDisplay {
    match assignment {
        Some(assignment) => PersonDisplay {
            label: cooking_assignment_label(assignment, profiles).unwrap_or_default(),
            color: cooking_assignment_color(assignment, profiles),
        },
        None => PersonDisplay::default(),
    }
}
