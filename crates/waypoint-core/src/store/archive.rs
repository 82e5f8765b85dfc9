//! Archive snapshots of completed tasks.
//!
//! Snapshots are written to `<data>/memory/tasks_memory_<stamp>.json` where the
//! stamp is the UTC time formatted as `YYYY-MM-DDTHH-MM-SS`. A second snapshot
//! within the same second gets a `-1`, `-2`, ... suffix after the stamp, and
//! listing orders by stamp then suffix.

use std::{
    fs,
    path::{Path, PathBuf},
};

use jiff::Timestamp;
use log::debug;

use super::{write_document, TaskDocument};
use crate::{
    error::{FileSystemResultExt, Result},
    models::Task,
};

/// Directory, relative to the data directory, holding archive snapshots.
pub const ARCHIVE_DIR: &str = "memory";

const ARCHIVE_PREFIX: &str = "tasks_memory_";
const ARCHIVE_SUFFIX: &str = ".json";

/// File name of a snapshot taken at `at`.
pub fn archive_file_name(at: Timestamp) -> String {
    format!(
        "{ARCHIVE_PREFIX}{}{ARCHIVE_SUFFIX}",
        at.strftime("%Y-%m-%dT%H-%M-%S")
    )
}

/// File name of the `seq`-th snapshot taken within the second of `at`.
fn sequenced_file_name(at: Timestamp, seq: u32) -> String {
    if seq == 0 {
        return archive_file_name(at);
    }
    format!(
        "{ARCHIVE_PREFIX}{}-{seq}{ARCHIVE_SUFFIX}",
        at.strftime("%Y-%m-%dT%H-%M-%S")
    )
}

fn is_archive_file_name(name: &str) -> bool {
    name.starts_with(ARCHIVE_PREFIX) && name.ends_with(ARCHIVE_SUFFIX)
}

/// Chronological sort key of a snapshot name: the stamp, then the suffix.
fn archive_sort_key(name: &str) -> (&str, u32) {
    let stem = name
        .strip_prefix(ARCHIVE_PREFIX)
        .and_then(|rest| rest.strip_suffix(ARCHIVE_SUFFIX))
        .unwrap_or(name);
    match stem.rsplit_once('-') {
        Some((stamp, seq)) if stamp.len() == STAMP_LEN => (stamp, seq.parse().unwrap_or(0)),
        _ => (stem, 0),
    }
}

/// Length of a `YYYY-MM-DDTHH-MM-SS` stamp.
const STAMP_LEN: usize = 19;

impl super::TaskStore {
    pub fn archive_dir(&self) -> PathBuf {
        self.data_dir.join(ARCHIVE_DIR)
    }

    /// Writes `tasks` to a new snapshot stamped with the current time and
    /// returns its path.
    pub fn write_archive(&self, tasks: &[Task]) -> Result<PathBuf> {
        self.write_archive_at(tasks, Timestamp::now())
    }

    pub(crate) fn write_archive_at(&self, tasks: &[Task], at: Timestamp) -> Result<PathBuf> {
        let dir = self.archive_dir();
        fs::create_dir_all(&dir).fs_context(&dir)?;

        let mut seq = 0;
        let mut path = dir.join(archive_file_name(at));
        while path.exists() {
            seq += 1;
            path = dir.join(sequenced_file_name(at, seq));
        }
        write_document(
            &path,
            &TaskDocument {
                tasks: tasks.to_vec(),
            },
        )?;
        debug!("Archived {} tasks to {}", tasks.len(), path.display());
        Ok(path)
    }

    /// Snapshot paths, newest first. A missing archive directory yields an
    /// empty list.
    pub fn list_archives(&self) -> Result<Vec<PathBuf>> {
        let dir = self.archive_dir();
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&dir).fs_context(&dir)? {
            let entry = entry.fs_context(&dir)?;
            if let Some(name) = entry.file_name().to_str() {
                if is_archive_file_name(name) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort_unstable_by(|a, b| archive_sort_key(b).cmp(&archive_sort_key(a)));

        Ok(names.into_iter().map(|name| dir.join(name)).collect())
    }

    /// Raw text of one snapshot.
    pub fn read_archive_text(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).fs_context(path)
    }

    /// Parses one snapshot with the same lenient rules as the active document.
    pub fn load_archive(&self, path: &Path) -> Result<Vec<Task>> {
        let text = self.read_archive_text(path)?;
        Ok(TaskDocument::parse(&text)?.tasks)
    }
}
