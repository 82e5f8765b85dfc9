//! Data directory resolution.
//!
//! The data directory is decided once, at startup, from explicit
//! configuration and handed to the task manager as a plain path:
//!
//! | `DATA_DIR`  | workspace root | resolved directory                  |
//! |-------------|----------------|-------------------------------------|
//! | absolute    | set            | `DATA_DIR/<root basename>`          |
//! | absolute    | unset          | `DATA_DIR`                          |
//! | relative    | set            | `<root>/DATA_DIR`                   |
//! | relative    | unset          | `$XDG_DATA_HOME/DATA_DIR`           |
//! | unset       | set            | `<root>/data`                       |
//! | unset       | unset          | `$XDG_DATA_HOME/waypoint`           |

use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Result, WaypointError};

/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Resolves the data directory from `DATA_DIR` and an optional workspace root.
#[derive(Debug, Clone, Default)]
pub struct DataDirResolver {
    data_dir: Option<PathBuf>,
    workspace_root: Option<PathBuf>,
}

impl DataDirResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the data directory from the `DATA_DIR` environment variable.
    pub fn from_env() -> Self {
        let data_dir = std::env::var_os(DATA_DIR_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        Self {
            data_dir,
            workspace_root: None,
        }
    }

    /// Overrides the configured data directory when `path` is given.
    pub fn with_data_dir<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.data_dir = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Sets the workspace root when `path` is given.
    pub fn with_workspace_root<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.workspace_root = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Applies the resolution table above.
    pub fn resolve(&self) -> Result<PathBuf> {
        let root = self.workspace_root.as_deref();
        let resolved = match (self.data_dir.as_deref(), root) {
            (Some(dir), Some(root)) if dir.is_absolute() => match root.file_name() {
                Some(name) => dir.join(name),
                None => dir.to_path_buf(),
            },
            (Some(dir), None) if dir.is_absolute() => dir.to_path_buf(),
            (Some(dir), Some(root)) => root.join(dir),
            (Some(dir), None) => xdg_data_dir(dir)?,
            (None, Some(root)) => root.join("data"),
            (None, None) => xdg_data_dir(Path::new("waypoint"))?,
        };
        debug!("Resolved data directory: {}", resolved.display());
        Ok(resolved)
    }
}

/// `$XDG_DATA_HOME/<relative>`, created on the way.
fn xdg_data_dir(relative: &Path) -> Result<PathBuf> {
    let file = xdg::BaseDirectories::new()
        .place_data_file(relative.join(super::TASKS_FILE))
        .map_err(|e| WaypointError::XdgDirectory(e.to_string()))?;
    file.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| WaypointError::XdgDirectory(format!("No parent for {}", file.display())))
}
