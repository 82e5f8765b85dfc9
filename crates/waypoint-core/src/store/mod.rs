//! JSON document storage for tasks.
//!
//! The whole collection lives in one document, `<data>/tasks.json`, shaped as
//! `{ "tasks": [...] }`. Every mutation rewrites the document wholesale through
//! a sibling temp file that is renamed over the target, so readers never see a
//! half-written file. There is no locking: two processes writing at once can
//! lose each other's updates.
//!
//! Completed tasks can be copied into timestamped snapshots under
//! `<data>/memory/` (see [`archive`]).

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    error::{FileSystemResultExt, Result},
    models::Task,
};

pub mod archive;
pub mod paths;

pub use paths::DataDirResolver;

/// File name of the active task document inside the data directory.
pub const TASKS_FILE: &str = "tasks.json";

/// On-disk shape shared by the active document and archive snapshots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskDocument {
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl TaskDocument {
    /// Parses a document, applying the lenient per-field rules of [`Task`].
    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Handle on a data directory.
#[derive(Debug, Clone)]
pub struct TaskStore {
    data_dir: PathBuf,
}

impl TaskStore {
    /// Creates a store rooted at `data_dir`. Nothing touches the disk until
    /// the first load or save.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the active task document.
    pub fn tasks_path(&self) -> PathBuf {
        self.data_dir.join(TASKS_FILE)
    }

    /// Creates the data directory and an empty document if either is missing.
    pub fn ensure_initialized(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir).fs_context(&self.data_dir)?;

        let path = self.tasks_path();
        if !path.exists() {
            debug!("Initializing empty task document at {}", path.display());
            write_document(&path, &TaskDocument::default())?;
        }
        Ok(())
    }

    /// Loads every active task.
    pub fn load_all(&self) -> Result<Vec<Task>> {
        self.ensure_initialized()?;

        let path = self.tasks_path();
        let text = fs::read_to_string(&path).fs_context(&path)?;
        let document = TaskDocument::parse(&text)?;
        debug!("Loaded {} tasks from {}", document.tasks.len(), path.display());
        Ok(document.tasks)
    }

    /// Replaces the active document with `tasks`.
    pub fn save_all(&self, tasks: &[Task]) -> Result<()> {
        fs::create_dir_all(&self.data_dir).fs_context(&self.data_dir)?;

        let path = self.tasks_path();
        write_document(
            &path,
            &TaskDocument {
                tasks: tasks.to_vec(),
            },
        )?;
        debug!("Saved {} tasks to {}", tasks.len(), path.display());
        Ok(())
    }
}

/// Serializes `document` to a temp file beside `path`, then renames it over
/// `path`.
fn write_document(path: &Path, document: &TaskDocument) -> Result<()> {
    let json = serde_json::to_string_pretty(document)?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, json).fs_context(&tmp)?;
    fs::rename(&tmp, path).fs_context(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use tempfile::TempDir;

    use super::*;
    use crate::models::{TaskDependency, TaskStatus};

    #[test]
    fn test_first_load_creates_empty_document() {
        let temp_dir = TempDir::new().unwrap();
        let store = TaskStore::new(temp_dir.path().join("nested").join("data"));

        let tasks = store.load_all().unwrap();
        assert!(tasks.is_empty());

        let text = fs::read_to_string(store.tasks_path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value, serde_json::json!({ "tasks": [] }));
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = TaskStore::new(temp_dir.path());

        store
            .save_all(&[Task::new("A", "first", Timestamp::now())])
            .unwrap();

        let names: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec![TASKS_FILE.to_string()]);
    }

    #[test]
    fn test_persisted_fields_are_camel_case() {
        let temp_dir = TempDir::new().unwrap();
        let store = TaskStore::new(temp_dir.path());

        let mut task = Task::new("A", "first", Timestamp::now());
        task.implementation_guide = Some("guide".to_string());
        task.dependencies.push(TaskDependency::new("other"));
        store.save_all(&[task]).unwrap();

        let text = fs::read_to_string(store.tasks_path()).unwrap();
        assert!(text.contains("\"implementationGuide\""));
        assert!(text.contains("\"createdAt\""));
        assert!(text.contains("\"taskId\""));
        assert!(!text.contains("\"completedAt\""));
    }

    #[test]
    fn test_lenient_timestamps_on_read() {
        let temp_dir = TempDir::new().unwrap();
        let store = TaskStore::new(temp_dir.path());
        fs::write(
            store.tasks_path(),
            r#"{ "tasks": [
                {
                    "id": "t1",
                    "name": "A",
                    "description": "d",
                    "status": "completed",
                    "createdAt": "not a date",
                    "completedAt": "also not a date"
                },
                {
                    "id": "t2",
                    "name": "B",
                    "description": "d",
                    "createdAt": "2024-03-01T10:00:00Z",
                    "updatedAt": 1709287200000
                }
            ] }"#,
        )
        .unwrap();

        let before = Timestamp::now();
        let tasks = store.load_all().unwrap();
        assert_eq!(tasks.len(), 2);

        assert_eq!(tasks[0].status, TaskStatus::Completed);
        assert!(tasks[0].created_at >= before);
        assert!(tasks[0].updated_at >= before);
        assert_eq!(tasks[0].completed_at, None);
        assert!(tasks[0].dependencies.is_empty());
        assert!(tasks[0].related_files.is_empty());

        let expected: Timestamp = "2024-03-01T10:00:00Z".parse().unwrap();
        assert_eq!(tasks[1].created_at, expected);
        assert_eq!(tasks[1].updated_at, expected);
        assert_eq!(tasks[1].status, TaskStatus::Pending);
    }

    #[test]
    fn test_malformed_document_is_a_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = TaskStore::new(temp_dir.path());
        fs::write(store.tasks_path(), "{ not json").unwrap();

        assert!(matches!(
            store.load_all(),
            Err(crate::WaypointError::Serialization { .. })
        ));
    }
}
