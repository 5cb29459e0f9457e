//! Optional `config.json` in the data directory.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StmError};
use crate::projection::Filter;
use crate::store::persistence::DEFAULT_STORAGE_KEY;

pub const CONFIG_FILE: &str = "config.json";

/// Which calendar decides what "today" is for the today filter and overdue marks.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Calendar {
    #[default]
    Utc,
    Local,
}

impl Calendar {
    pub fn today(self) -> NaiveDate {
        match self {
            Self::Utc => Utc::now().date_naive(),
            Self::Local => Local::now().date_naive(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage_key: String,
    pub calendar: Calendar,
    pub default_filter: Filter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            calendar: Calendar::default(),
            default_filter: Filter::default(),
        }
    }
}

impl Config {
    /// Defaults when the file is absent; malformed files are an error.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)?;
        let config: Self = serde_json::from_str(&data)
            .map_err(|e| StmError::InvalidConfig(path.display().to_string(), e.to_string()))?;
        config.validate(&path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let key = self.storage_key.as_str();
        let usable = !key.trim().is_empty()
            && !key.starts_with('.')
            && !key.contains(['/', '\\']);
        if !usable {
            return Err(StmError::InvalidConfig(
                path.display().to_string(),
                format!("storage_key '{key}' must be a plain file name"),
            ));
        }
        Ok(())
    }
}

/// Explicit directory if given, else the platform data directory.
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }
    ProjectDirs::from("", "", "stm")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(StmError::NoDataDir)
}
