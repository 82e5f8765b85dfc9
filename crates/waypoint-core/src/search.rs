//! Task search across the active store and archive snapshots.
//!
//! Archived snapshots are first narrowed by a cheap scan of their raw text
//! (the [`ArchiveSearch`] backend), then parsed and filtered task by task.
//! Active tasks always win over archived copies with the same id.

use std::{cmp::Ordering, collections::HashSet, path::PathBuf};

use log::{debug, warn};
use serde::Serialize;

use crate::{error::Result, models::Task, params::QueryTasks, store::TaskStore};

/// Maximum number of archive snapshots read by one search.
pub const MAX_ARCHIVES_SCANNED: usize = 10;

/// Narrows archive snapshots down to the ones worth parsing.
pub trait ArchiveSearch: Send + Sync {
    /// Snapshots, newest first, whose content may match `needle`. An empty
    /// needle matches every snapshot. At most `limit` paths are returned.
    fn candidates(&self, store: &TaskStore, needle: &str, limit: usize) -> Result<Vec<PathBuf>>;
}

/// Case-insensitive substring scan over each snapshot's raw text.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringSearch;

impl ArchiveSearch for SubstringSearch {
    fn candidates(&self, store: &TaskStore, needle: &str, limit: usize) -> Result<Vec<PathBuf>> {
        let needle = needle.to_lowercase();
        let mut matched = Vec::new();

        for path in store.list_archives()? {
            if matched.len() >= limit {
                break;
            }
            let text = match store.read_archive_text(&path) {
                Ok(text) => text,
                Err(e) => {
                    warn!("Skipping unreadable archive: {e}");
                    continue;
                }
            };
            if needle.is_empty() || text.to_lowercase().contains(&needle) {
                matched.push(path);
            }
        }
        Ok(matched)
    }
}

/// How a query selects tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskQuery {
    /// Exact task id
    Id(String),
    /// Every keyword must appear in one of the searchable fields
    Keywords(Vec<String>),
}

impl TaskQuery {
    pub fn new(query: &str, is_id: bool) -> Self {
        if is_id {
            TaskQuery::Id(query.trim().to_string())
        } else {
            TaskQuery::Keywords(
                query
                    .split_whitespace()
                    .map(str::to_lowercase)
                    .collect(),
            )
        }
    }

    /// Text used to pre-select archive snapshots.
    fn needle(&self) -> &str {
        match self {
            TaskQuery::Id(id) => id,
            TaskQuery::Keywords(keywords) => keywords.first().map_or("", String::as_str),
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            TaskQuery::Id(id) => task.id == *id,
            TaskQuery::Keywords(keywords) => {
                let fields: Vec<String> = [
                    Some(task.name.as_str()),
                    Some(task.description.as_str()),
                    task.notes.as_deref(),
                    task.implementation_guide.as_deref(),
                    task.summary.as_deref(),
                ]
                .into_iter()
                .flatten()
                .map(str::to_lowercase)
                .collect();

                keywords
                    .iter()
                    .all(|keyword| fields.iter().any(|field| field.contains(keyword.as_str())))
            }
        }
    }
}

/// One page of search results.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub tasks: Vec<Task>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_results: usize,
    pub has_more: bool,
}

/// Runs a search over the store's active tasks and archives.
pub fn search_tasks(
    store: &TaskStore,
    backend: &dyn ArchiveSearch,
    params: &QueryTasks,
) -> Result<SearchPage> {
    params.validate()?;
    let query = TaskQuery::new(&params.query, params.is_id);

    let mut results: Vec<Task> = store
        .load_all()?
        .into_iter()
        .filter(|task| query.matches(task))
        .collect();
    let mut seen: HashSet<String> = results.iter().map(|task| task.id.clone()).collect();

    for path in backend.candidates(store, query.needle(), MAX_ARCHIVES_SCANNED)? {
        let archived = match store.load_archive(&path) {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!("Skipping malformed archive {}: {e}", path.display());
                continue;
            }
        };
        for task in archived {
            if query.matches(&task) && seen.insert(task.id.clone()) {
                results.push(task);
            }
        }
    }

    results.sort_by(newest_first);
    debug!("Search '{}' matched {} tasks", params.query, results.len());

    Ok(paginate(results, params.page, params.page_size))
}

/// Completed tasks first, most recently completed first; then the rest by
/// most recent update. A completed task without a completion time sorts
/// after the dated ones.
fn newest_first(a: &Task, b: &Task) -> Ordering {
    b.is_completed()
        .cmp(&a.is_completed())
        .then_with(|| b.completed_at.cmp(&a.completed_at))
        .then_with(|| b.updated_at.cmp(&a.updated_at))
}

fn paginate(results: Vec<Task>, page: usize, page_size: usize) -> SearchPage {
    let page_size = page_size.max(1);
    let total_results = results.len();
    let total_pages = total_results.div_ceil(page_size).max(1);
    let current_page = page.clamp(1, total_pages);

    let tasks = results
        .into_iter()
        .skip((current_page - 1) * page_size)
        .take(page_size)
        .collect();

    SearchPage {
        tasks,
        current_page,
        total_pages,
        total_results,
        has_more: current_page < total_pages,
    }
}
