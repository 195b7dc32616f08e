use thiserror::Error;

use crate::domain::TaskId;

/// Errors raised by the persistence collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the visualization collaborator.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("format error: {0}")]
    Fmt(#[from] std::fmt::Error),
}

#[derive(Debug, Error)]
pub enum LoomError {
    #[error("task {0} is already on the board")]
    DuplicateTask(TaskId),

    #[error("store: {0}")]
    Store(#[from] StoreError),

    #[error("render: {0}")]
    Render(#[from] RenderError),
}
