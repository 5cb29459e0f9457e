use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::config::Config;
use crate::error::{Result, StmError};
use crate::projection::{self, Entry, Filter};
use crate::store::persistence::Persistence;
use crate::store::slot::FileSlot;
use crate::store::tasks::TaskStore;
use crate::task_id::TaskId;

/// Config plus the hydrated store for one data directory.
pub struct Workspace {
    pub config: Config,
    pub store: TaskStore<FileSlot>,
    data_dir: PathBuf,
}

impl Workspace {
    /// Load config, then hydrate (and migrate) the stored task collection.
    pub fn open(data_dir: &Path) -> Result<Self> {
        let config = Config::load(data_dir)?;
        let persistence = Persistence::new(FileSlot::new(data_dir), config.storage_key.clone());
        let store = TaskStore::open(persistence);
        Ok(Self {
            config,
            store,
            data_dir: data_dir.to_path_buf(),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn today(&self) -> NaiveDate {
        self.config.calendar.today()
    }

    pub fn view(&self, filter: Filter) -> Vec<Entry<'_>> {
        projection::project(self.store.list(), filter, self.today())
    }

    /// Resolve a user-supplied id against the live collection.
    ///
    /// Exact match first, then a unique prefix. Input matching nothing is
    /// passed through untouched so the store can treat it as a no-op.
    pub fn resolve_task_id(&self, input: &str) -> Result<TaskId> {
        let existing: Vec<TaskId> = self.store.list().iter().map(|t| t.id.clone()).collect();
        resolve_task_id_input(input, &existing)
    }
}

pub fn resolve_task_id_input(input: &str, existing_ids: &[TaskId]) -> Result<TaskId> {
    let requested: TaskId = input
        .parse()
        .map_err(|e: crate::task_id::TaskIdParseError| {
            StmError::InvalidTaskId(input.to_string(), e.to_string())
        })?;

    if existing_ids.contains(&requested) {
        return Ok(requested);
    }

    let mut matches: Vec<TaskId> = existing_ids
        .iter()
        .filter(|id| id.as_str().starts_with(requested.as_str()))
        .cloned()
        .collect();
    matches.sort();
    matches.dedup();

    match matches.len() {
        0 => Ok(requested),
        1 => Ok(matches.remove(0)),
        _ => Err(StmError::TaskIdAmbiguous(
            requested.into_string(),
            format_task_id_matches(&matches),
        )),
    }
}

fn format_task_id_matches(ids: &[TaskId]) -> String {
    ids.iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
