//! Error types for the task manager library.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Comprehensive error type for all task manager operations.
#[derive(Error, Debug)]
pub enum WaypointError {
    /// Task not found for the given ID
    #[error("Task with ID {id} not found")]
    TaskNotFound { id: String },
    /// A batch names the same task more than once
    #[error("Duplicate task name '{name}' in batch; every task name must be unique")]
    DuplicateTaskName { name: String },
    /// An update touched fields that are frozen once a task is completed
    #[error("Task {id} is completed; only summary and related files may change (attempted: {})", fields.join(", "))]
    CompletedTaskImmutable { id: String, fields: Vec<String> },
    /// Deleting a completed task is refused
    #[error("Task {id} is completed and cannot be deleted")]
    CompletedTaskDeletion { id: String },
    /// Other tasks still depend on the task being deleted
    #[error("Task {id} cannot be deleted because the following tasks depend on it: {}", dependents.join(", "))]
    DeletionBlocked { id: String, dependents: Vec<String> },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating file system errors bound to a path.
pub struct FileSystemErrorBuilder {
    path: PathBuf,
}

impl FileSystemErrorBuilder {
    /// Create a new file system error builder for a path.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: std::io::Error) -> WaypointError {
        WaypointError::FileSystem {
            path: self.path,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> WaypointError {
        WaypointError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl WaypointError {
    /// Creates a builder for file system errors.
    pub fn file_system(path: impl AsRef<Path>) -> FileSystemErrorBuilder {
        FileSystemErrorBuilder::new(path)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Whether the error is a rule of the task model being enforced rather
    /// than an I/O or configuration failure.
    ///
    /// Front ends render policy violations as ordinary failed operations.
    pub fn is_policy_violation(&self) -> bool {
        matches!(
            self,
            Self::DuplicateTaskName { .. }
                | Self::CompletedTaskImmutable { .. }
                | Self::CompletedTaskDeletion { .. }
                | Self::DeletionBlocked { .. }
                | Self::InvalidInput { .. }
        )
    }
}

/// Extension trait for Result to provide concise error mapping with
/// anyhow-style context.
pub trait ResultExt<T, E> {
    /// Add context to any error type, converting to WaypointError.
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

/// Specialized extension trait for file-system Results.
pub trait FileSystemResultExt<T> {
    /// Map I/O errors to a file system error carrying the path.
    fn fs_context(self, path: &Path) -> Result<T>;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| WaypointError::Configuration {
            message: format!("{}: {}", context, e),
        })
    }
}

impl<T> FileSystemResultExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, path: &Path) -> Result<T> {
        self.map_err(|e| WaypointError::file_system(path).with_source(e))
    }
}

/// Result type alias for task manager operations
pub type Result<T> = std::result::Result<T, WaypointError>;
