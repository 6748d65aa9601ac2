use thiserror::Error;

use crate::model::TaskId;

pub type Result<T, E = TaskError> = std::result::Result<T, E>;

/// Transition the task state machine refused to make.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InvalidState {
    #[error("task is already running")]
    AlreadyRunning,
    #[error("task is not running")]
    NotRunning,
    #[error("stop time is earlier than the start of the running span")]
    StopBeforeStart,
    #[error("a span before the last one is still running")]
    EarlierSpanRunning,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotFound {
    #[error("task {0} not found")]
    Task(TaskId),
    #[error("tag {0:?} not found")]
    Tag(String),
    #[error("size {0:?} not found")]
    Size(String),
}

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("task {id}: {source}")]
    InvalidState {
        id: TaskId,
        #[source]
        source: InvalidState,
    },
    #[error("no tasks to compute statistics for")]
    NoData,
    #[error(transparent)]
    NotFound(#[from] NotFound),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl TaskError {
    pub fn invalid_state(id: TaskId, source: InvalidState) -> Self {
        Self::InvalidState { id, source }
    }
}

impl From<std::io::Error> for TaskError {
    fn from(value: std::io::Error) -> Self {
        Self::Storage(value.into())
    }
}

impl From<serde_json::Error> for TaskError {
    fn from(value: serde_json::Error) -> Self {
        Self::Storage(value.into())
    }
}
