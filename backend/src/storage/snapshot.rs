//! # Household Snapshot
//!
//! A single YAML document holding every record of the household. The CLI
//! loads it into a [`MemoryConnection`](super::MemoryConnection) at start-up
//! and writes it back after a mutation.
//!
//! ## YAML Format
//!
//! ```yaml
//! data_format_version: "1.0"
//! saved_at: "2024-03-04T19:30:00Z"
//! next_task_id: 3
//! next_chore_id: 1
//! tasks: [...]
//! recurring_chores: [...]
//! cooking_assignments: [...]
//! profiles: [...]
//! ```

use anyhow::{Context, Result};
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use shared::{CookingAssignment, PersonProfile, RecurringChore, Task};
use std::fs;
use std::path::Path;

pub const DATA_FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub data_format_version: String,
    #[serde(default)]
    pub saved_at: Option<String>,
    #[serde(default)]
    pub next_task_id: u64,
    #[serde(default)]
    pub next_chore_id: u64,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub recurring_chores: Vec<RecurringChore>,
    #[serde(default)]
    pub cooking_assignments: Vec<CookingAssignment>,
    #[serde(default)]
    pub profiles: Vec<PersonProfile>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            data_format_version: DATA_FORMAT_VERSION.to_string(),
            saved_at: None,
            next_task_id: 1,
            next_chore_id: 1,
            tasks: Vec::new(),
            recurring_chores: Vec::new(),
            cooking_assignments: Vec::new(),
            profiles: Vec::new(),
        }
    }
}

impl Snapshot {
    /// Load a snapshot, returning an empty household if the file is missing
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No snapshot at {:?}, starting with an empty household", path);
            return Ok(Self::default());
        }

        let yaml_content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {:?}", path))?;
        let snapshot: Snapshot = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("Failed to parse snapshot {:?}", path))?;
        debug!(
            "Loaded snapshot from {:?}: {} tasks, {} chores, {} cooking days, {} profiles",
            path,
            snapshot.tasks.len(),
            snapshot.recurring_chores.len(),
            snapshot.cooking_assignments.len(),
            snapshot.profiles.len()
        );
        Ok(snapshot)
    }

    /// Write the snapshot atomically: temp file first, then rename
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {:?}", parent))?;
                info!("Created data directory: {:?}", parent);
            }
        }

        let mut stamped = self.clone();
        stamped.saved_at = Some(Utc::now().to_rfc3339());
        let yaml_content = serde_yaml::to_string(&stamped)?;

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, yaml_content)
            .with_context(|| format!("Failed to write {:?}", temp_path))?;
        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to move snapshot into place at {:?}", path))?;

        debug!("Saved snapshot to {:?}", path);
        Ok(())
    }
}
