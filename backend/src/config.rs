//! # Household Config
//!
//! A small YAML file describing where household data lives and a few
//! display defaults. Missing files are created with defaults on first load.
//!
//! ## YAML Format
//!
//! ```yaml
//! data_file: "household.yaml"
//! default_fairness_range: "last4weeks"
//! upcoming_chore_limit: 5
//! data_format_version: "1.0"
//! ```
//!
//! A relative `data_file` is resolved against the config file's directory.

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use shared::FairnessRange;
use std::fs;
use std::path::{Path, PathBuf};

use crate::storage::snapshot::DATA_FORMAT_VERSION;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdConfig {
    /// Snapshot file holding every household record
    pub data_file: PathBuf,
    #[serde(default)]
    pub default_fairness_range: FairnessRange,
    #[serde(default = "default_upcoming_chore_limit")]
    pub upcoming_chore_limit: usize,
    pub data_format_version: String,
}

fn default_upcoming_chore_limit() -> usize {
    5
}

impl Default for HouseholdConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("household.yaml"),
            default_fairness_range: FairnessRange::default(),
            upcoming_chore_limit: default_upcoming_chore_limit(),
            data_format_version: DATA_FORMAT_VERSION.to_string(),
        }
    }
}

impl HouseholdConfig {
    /// Load the config at `path`, writing a default one if it does not exist
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let yaml_content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: HouseholdConfig = serde_yaml::from_str(&yaml_content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            debug!("Loaded household config from {:?}", path);
            Ok(config)
        } else {
            let config = HouseholdConfig::default();
            config.save(path)?;
            info!("Created default household config at {:?}", path);
            Ok(config)
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
                info!("Created config directory: {:?}", parent);
            }
        }

        let yaml_content = serde_yaml::to_string(self)?;
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, yaml_content)?;
        fs::rename(&temp_path, path)?;

        debug!("Saved household config to {:?}", path);
        Ok(())
    }

    /// Data file path, resolving a relative path against `config_path`'s directory
    pub fn data_path(&self, config_path: &Path) -> PathBuf {
        if self.data_file.is_absolute() {
            return self.data_file.clone();
        }
        match config_path.parent() {
            Some(dir) => dir.join(&self.data_file),
            None => self.data_file.clone(),
        }
    }
}
