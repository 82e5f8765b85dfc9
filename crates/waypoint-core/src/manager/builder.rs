//! Builder for creating and configuring TaskManager instances.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use log::info;

use super::TaskManager;
use crate::{
    error::Result,
    search::{ArchiveSearch, SubstringSearch},
    store::{DataDirResolver, TaskStore},
};

/// Builder for creating and configuring TaskManager instances.
#[derive(Clone)]
pub struct TaskManagerBuilder {
    data_dir: Option<PathBuf>,
    workspace_root: Option<PathBuf>,
    search: Arc<dyn ArchiveSearch>,
}

impl TaskManagerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            data_dir: None,
            workspace_root: None,
            search: Arc::new(SubstringSearch),
        }
    }

    /// Sets the data directory explicitly.
    ///
    /// If neither this nor a workspace root is given, the directory defaults
    /// to `$XDG_DATA_HOME/waypoint` (`~/.local/share/waypoint`). A relative
    /// path is resolved against the workspace root; see [`DataDirResolver`].
    pub fn with_data_dir<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.data_dir = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Sets the workspace root used to place or name the data directory.
    pub fn with_workspace_root<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.workspace_root = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Replaces the archive scan backend.
    pub fn with_archive_search(mut self, search: Arc<dyn ArchiveSearch>) -> Self {
        self.search = search;
        self
    }

    /// Builds the configured manager, creating the data directory and an
    /// empty task document when missing.
    ///
    /// # Errors
    ///
    /// Returns `WaypointError::XdgDirectory` if the default location cannot be
    /// determined and `WaypointError::FileSystem` if the directory cannot be
    /// created.
    pub async fn build(self) -> Result<TaskManager> {
        let data_dir = DataDirResolver::new()
            .with_data_dir(self.data_dir.as_deref())
            .with_workspace_root(self.workspace_root.as_deref())
            .resolve()?;

        let manager = TaskManager::new(TaskStore::new(&data_dir), self.search);
        manager.with_store(|store| store.ensure_initialized()).await?;
        info!("Task data directory: {}", data_dir.display());

        Ok(manager)
    }
}

impl Default for TaskManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
