use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identity of a household member as issued by the identity provider.
///
/// Principals are compared structurally; the textual form is never
/// interpreted beyond the optional format check in [`Principal::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrincipalError {
    #[error("Invalid Principal ID format: {0}")]
    InvalidFormat(String),
}

impl Principal {
    /// Wrap an identity string without validating it
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Parse user-entered principal text.
    ///
    /// Blank input is valid and means "nobody". Non-blank input must be
    /// dash-separated groups of lowercase base32 characters where every
    /// group but the last is exactly five characters long.
    pub fn parse(text: &str) -> Result<Option<Self>, PrincipalError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let groups: Vec<&str> = trimmed.split('-').collect();
        let last = groups.len() - 1;
        for (index, group) in groups.iter().enumerate() {
            let valid_chars = group
                .chars()
                .all(|c| c.is_ascii_lowercase() || ('2'..='7').contains(&c));
            let valid_len = if index == last {
                (1..=5).contains(&group.len())
            } else {
                group.len() == 5
            };
            if !valid_chars || !valid_len {
                return Err(PrincipalError::InvalidFormat(trimmed.to_string()));
            }
        }

        Ok(Some(Self(trimmed.to_string())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened display form: first five characters, `...`, last three
    pub fn short(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        let head: String = chars.iter().take(5).collect();
        let tail: String = chars[chars.len().saturating_sub(3)..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Repeat cadence of a recurring chore.
///
/// Deserialisation is lenient: records written before the field existed, a
/// null value, or an unrecognised name all decode to [`Timeline::Weekly`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>")]
pub enum Timeline {
    #[serde(rename = "daily")]
    Daily,
    #[default]
    #[serde(rename = "weeklies")]
    Weekly,
    #[serde(rename = "fortnightly")]
    Fortnightly,
    #[serde(rename = "monthly")]
    Monthly,
}

impl Timeline {
    pub const ALL: [Timeline; 4] = [
        Timeline::Daily,
        Timeline::Weekly,
        Timeline::Fortnightly,
        Timeline::Monthly,
    ];

    /// Decode a wire name, falling back to weekly for anything unknown
    pub fn from_wire(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "daily" => Timeline::Daily,
            "weekly" | "weeklies" => Timeline::Weekly,
            "fortnightly" => Timeline::Fortnightly,
            "monthly" => Timeline::Monthly,
            other => {
                log::warn!("Unknown timeline '{}', treating as weekly", other);
                Timeline::Weekly
            }
        }
    }

    pub fn wire_name(&self) -> &'static str {
        match self {
            Timeline::Daily => "daily",
            Timeline::Weekly => "weeklies",
            Timeline::Fortnightly => "fortnightly",
            Timeline::Monthly => "monthly",
        }
    }

    /// User-facing label
    pub fn label(&self) -> &'static str {
        match self {
            Timeline::Daily => "Daily",
            Timeline::Weekly => "Weekly",
            Timeline::Fortnightly => "Fortnightly",
            Timeline::Monthly => "Monthly",
        }
    }
}

impl From<Option<String>> for Timeline {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(name) => Timeline::from_wire(&name),
            None => Timeline::Weekly,
        }
    }
}

/// Strict parse for user input. Unknown names are rejected rather than
/// falling back to weekly.
impl std::str::FromStr for Timeline {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Timeline::Daily),
            "weekly" | "weeklies" => Ok(Timeline::Weekly),
            "fortnightly" => Ok(Timeline::Fortnightly),
            "monthly" => Ok(Timeline::Monthly),
            _ => Err(format!(
                "Invalid timeline: {} (expected daily, weekly, fortnightly or monthly)",
                s
            )),
        }
    }
}

impl fmt::Display for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A household task. `due_date` is nanoseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub due_date: Option<i64>,
    #[serde(default)]
    pub assigned_to: Option<Principal>,
    pub completed: bool,
    pub created_by: Principal,
    #[serde(default)]
    pub recurring_chore_id: Option<u64>,
}

/// A chore that repeats on a weekday (0 = Sunday .. 6 = Saturday)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringChore {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub weekday: u8,
    #[serde(default)]
    pub timeline: Timeline,
    #[serde(default)]
    pub assigned_to: Option<Principal>,
    pub created_by: Principal,
    #[serde(default)]
    pub paused: bool,
}

/// Who cooks dinner on a given day. `day` is a `yyyy-mm-dd` day key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CookingAssignment {
    pub day: String,
    #[serde(default)]
    pub cook: Option<Principal>,
    #[serde(default)]
    pub cook_name: Option<String>,
    #[serde(default)]
    pub meal: Option<String>,
    pub assigned_by: Principal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonProfile {
    pub principal: Principal,
    pub display_name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddTaskRequest {
    pub name: String,
    pub description: String,
    pub due_date: Option<i64>,
    pub assigned_to: Option<Principal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub due_date: Option<i64>,
    pub assigned_to: Option<Principal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRecurringChoreRequest {
    pub name: String,
    pub description: String,
    pub weekday: u8,
    pub timeline: Timeline,
    pub assigned_to: Option<Principal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRecurringChoreRequest {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub weekday: u8,
    pub timeline: Timeline,
    pub assigned_to: Option<Principal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauseResumeChoreRequest {
    pub id: u64,
    pub pause: bool,
}

/// Request body shared by the assign and update dinner rota operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CookingDayRequest {
    pub day: String,
    pub cook: Option<Principal>,
    pub cook_name: Option<String>,
    pub meal: Option<String>,
}

/// Time window used for cooking fairness statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FairnessRange {
    Week,
    Month,
    #[default]
    Last4Weeks,
    Last30Days,
    AllTime,
}

impl FairnessRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            FairnessRange::Week => "week",
            FairnessRange::Month => "month",
            FairnessRange::Last4Weeks => "last4weeks",
            FairnessRange::Last30Days => "last30days",
            FairnessRange::AllTime => "alltime",
        }
    }
}

impl std::str::FromStr for FairnessRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "week" => Ok(FairnessRange::Week),
            "month" => Ok(FairnessRange::Month),
            "last4weeks" => Ok(FairnessRange::Last4Weeks),
            "last30days" => Ok(FairnessRange::Last30Days),
            "alltime" => Ok(FairnessRange::AllTime),
            _ => Err(format!(
                "Invalid fairness range: {} (expected week, month, last4weeks, last30days or alltime)",
                s
            )),
        }
    }
}

/// How often one label (person) cooked within a fairness window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookCount {
    pub label: String,
    pub count: u32,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairnessStats {
    /// Per-label counts in the order each label was first encountered
    pub counts: Vec<CookCount>,
    pub most_cooked: Option<CookCount>,
    pub least_cooked: Option<CookCount>,
    pub is_empty: bool,
    pub period_label: String,
    /// None for the all-time window
    pub start_date: Option<NaiveDate>,
    pub end_date: NaiveDate,
}

impl FairnessStats {
    pub fn count_for(&self, label: &str) -> Option<u32> {
        self.counts.iter().find(|c| c.label == label).map(|c| c.count)
    }

    pub fn color_for(&self, label: &str) -> Option<&str> {
        self.counts
            .iter()
            .find(|c| c.label == label)
            .and_then(|c| c.color.as_deref())
    }
}

/// Recurring chores sharing a weekday, for the chore list display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedChores {
    pub weekday: u8,
    pub weekday_label: String,
    pub chores: Vec<RecurringChore>,
}

/// Tasks sharing a due day. Undated tasks use the `no-due-date` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDayGroup {
    pub day_key: String,
    pub display_date: String,
    pub tasks: Vec<Task>,
}

/// Resolved label and colour for a person
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersonDisplay {
    pub label: String,
    pub color: Option<String>,
}

/// Everything scheduled on one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub date: NaiveDate,
    pub day_key: String,
    pub tasks: Vec<Task>,
    pub chores: Vec<RecurringChore>,
    pub cooking_assignment: Option<CookingAssignment>,
    pub cook: Option<PersonDisplay>,
}

/// One day of the Monday-to-Sunday dinner rota
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotaSlot {
    pub date: NaiveDate,
    pub day_key: String,
    pub assignment: Option<CookingAssignment>,
    pub cook: PersonDisplay,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthOverviewDay {
    pub date: NaiveDate,
    pub in_month: bool,
    pub is_today: bool,
    pub has_tasks: bool,
    pub has_cooking: bool,
    pub has_chores: bool,
}

/// Sunday-aligned grid of whole weeks covering a month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthOverview {
    pub year: i32,
    pub month: u32,
    pub days: Vec<MonthOverviewDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodayFocus {
    pub day_key: String,
    pub tasks: Vec<Task>,
    pub cook_label: String,
}
