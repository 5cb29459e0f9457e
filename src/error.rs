use thiserror::Error;

#[derive(Debug, Error)]
pub enum StmError {
    #[error("locked by another process: {0}")]
    Locked(String),

    #[error("invalid task id '{0}': {1}")]
    InvalidTaskId(String, String),

    #[error("task id '{0}' is ambiguous; matches: {1}")]
    TaskIdAmbiguous(String, String),

    #[error("invalid due date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("invalid config at {0}: {1}")]
    InvalidConfig(String, String),

    #[error("could not determine a data directory (pass --dir or set STM_DIR)")]
    NoDataDir,

    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StmError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Locked(_) => "locked",
            Self::InvalidTaskId(_, _) => "invalid_task_id",
            Self::TaskIdAmbiguous(_, _) => "task_id_ambiguous",
            Self::InvalidDate(_) => "invalid_date",
            Self::InvalidConfig(_, _) => "invalid_config",
            Self::NoDataDir => "no_data_dir",
            Self::StorageUnavailable(_) => "storage_unavailable",
            Self::Io(_) => "io_error",
            Self::Json(_) => "json_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, StmError>;
