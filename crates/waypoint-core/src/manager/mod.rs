//! High-level task manager API.
//!
//! [`TaskManager`] binds the pure engine to a data directory. Every public
//! operation loads the task document, computes, and rewrites it, all on
//! `tokio::task::spawn_blocking` so async callers never block on file I/O.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │    Handlers     │    │   Operations    │    │   Task Store    │
//! │ (handlers,      │───▶│ (task_ops,      │───▶│   (via store/)  │
//! │  query_ops)     │    │  batch_ops)     │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//!   Lifecycle flows        Read-modify-write       JSON document
//! ```
//!
//! ## Submodules
//!
//! - [`builder`]: Factory for [`TaskManager`] instances
//! - [`task_ops`]: Single-task create, read, update and delete
//! - [`batch_ops`]: Batch merge and clearing
//! - [`query_ops`]: Search and detail lookups, including archives
//! - [`handlers`]: Execute and verify flows returning display wrappers
//!
//! # Concurrency
//!
//! There is no lock around the read-modify-write window. Two mutating calls
//! running at the same time, in this process or another one, can each load
//! the same document and the later save silently discards the earlier
//! change. Callers that need ordering serialize their calls (the MCP server
//! holds the manager behind a mutex).
//!
//! # Examples
//!
//! ```rust
//! use waypoint_core::{params::TaskDefinition, TaskManagerBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dir = tempfile::TempDir::new()?;
//! let manager = TaskManagerBuilder::new()
//!     .with_data_dir(Some(dir.path()))
//!     .build()
//!     .await?;
//!
//! let task = manager
//!     .create_task(&TaskDefinition::new("Add schema", "Create the tables"))
//!     .await?;
//! println!("{}", task);
//! # Ok(())
//! # }
//! ```

use std::{path::Path, sync::Arc};

use tokio::task;

use crate::{
    error::{Result, WaypointError},
    search::ArchiveSearch,
    store::TaskStore,
};

pub mod batch_ops;
pub mod builder;
pub mod handlers;
pub mod query_ops;
pub mod task_ops;

#[cfg(test)]
mod tests;

pub use builder::TaskManagerBuilder;

/// Main interface for managing tasks in one data directory.
pub struct TaskManager {
    pub(crate) store: TaskStore,
    pub(crate) search: Arc<dyn ArchiveSearch>,
}

impl TaskManager {
    pub(crate) fn new(store: TaskStore, search: Arc<dyn ArchiveSearch>) -> Self {
        Self { store, search }
    }

    /// Directory holding `tasks.json` and the archive snapshots.
    pub fn data_dir(&self) -> &Path {
        self.store.data_dir()
    }

    /// Runs `op` against a fresh store handle on the blocking pool.
    pub(crate) async fn with_store<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(TaskStore) -> Result<T> + Send + 'static,
    {
        let store = self.store.clone();
        task::spawn_blocking(move || op(store))
            .await
            .map_err(|e| WaypointError::Configuration {
                message: format!("Task join error: {e}"),
            })?
    }
}
