use std::path::PathBuf;
use thiserror::Error;

/// Error types for the Studymap core
#[derive(Error, Debug)]
pub enum CoreError {
    /// A time scale, column count or other argument is out of range
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Un-hiding a project would exceed the visible-project cap
    #[error("Only {limit} projects can be visible at a time; hide another project first")]
    LimitExceeded { limit: usize },

    /// No project holds the rank a move needs to swap with
    #[error("No project holds order {wanted_order} next to project '{project_id}'")]
    AdjacentNotFound { project_id: String, wanted_order: i64 },

    /// A colour string is not of the form `#RRGGBB`
    #[error("Invalid colour '{value}': expected #RRGGBB")]
    InvalidColor { value: String },

    /// Error when a requested project was not found
    #[error("Project '{project_id}' not found")]
    ProjectNotFound { project_id: String },

    /// Error when a requested task was not found
    #[error("Task '{task_id}' not found")]
    TaskNotFound { task_id: String },

    /// Error when a requested event was not found
    #[error("Event '{event_id}' not found")]
    EventNotFound { event_id: String },

    /// A task may only reference an event of its own project
    #[error("Event '{event_id}' does not belong to project '{project_id}'")]
    EventProjectMismatch {
        event_id: String,
        project_id: String,
    },

    /// Error creating the directory that holds the data file
    #[error("Failed to create data directory at {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The data file location cannot be used
    #[error("Invalid data path {path}: {reason}")]
    InvalidPath { path: PathBuf, reason: String },

    /// Error reading or writing the data file
    #[error("Failed to access data file at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error encoding or decoding the data file
    #[error("Malformed data file: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Shorthand for an `InvalidArgument` error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        CoreError::InvalidArgument {
            message: message.into(),
        }
    }
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;
