//! Result wrapper types for displaying operation outcomes.
//!
//! Create, update and delete results wrap the affected task. Lifecycle flows
//! (split, clear, execute, verify) have their own outcome types whose
//! variants cover every non-error result a caller can get back.

use std::{fmt, path::PathBuf};

use serde::Serialize;

use crate::{
    engine::MergePolicy,
    models::{ComplexityAssessment, Task},
    params::VerifyTask,
    search::SearchPage,
};

/// Wrapper type for displaying the result of create operations.
///
/// # Examples
///
/// ```rust
/// use jiff::Timestamp;
/// use waypoint_core::{display::CreateResult, models::Task};
///
/// let task = Task::new("Add schema", "Create the tables", Timestamp::now());
/// let output = format!("{}", CreateResult::new(task.clone()));
/// assert!(output.contains(&format!("Created task with ID: {}", task.id)));
/// ```
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    /// Create a new CreateResult wrapper.
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<Task> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created task with ID: {}", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying the result of update operations, with the
/// list of changes made.
pub struct UpdateResult<T> {
    pub resource: T,
    pub changes: Vec<String>,
}

impl<T> UpdateResult<T> {
    /// Create a new UpdateResult wrapper with no recorded changes.
    pub fn new(resource: T) -> Self {
        Self {
            resource,
            changes: Vec::new(),
        }
    }

    /// Create an UpdateResult with a list of changes made.
    pub fn with_changes(resource: T, changes: Vec<String>) -> Self {
        Self { resource, changes }
    }

    /// Whether the update changed anything.
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty()
    }
}

impl fmt::Display for UpdateResult<Task> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.changes.is_empty() {
            writeln!(
                f,
                "No content updates were provided for task with ID: {}",
                self.resource.id
            )?;
        } else {
            writeln!(f, "Updated task with ID: {}", self.resource.id)?;
            writeln!(f)?;
            writeln!(f, "Changes made:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
        }

        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying the result of delete operations.
pub struct DeleteResult<T> {
    pub resource: T,
}

impl<T> DeleteResult<T> {
    /// Create a new DeleteResult wrapper.
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for DeleteResult<Task> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Deleted task \"{}\" (ID: {})",
            self.resource.name, self.resource.id
        )
    }
}

/// Outcome of clearing the store.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearResult {
    /// Number of tasks removed from the active store
    pub deleted: usize,
    /// Number of completed tasks copied to the snapshot
    pub archived: usize,
    /// Snapshot written, if there was anything to clear
    pub archive: Option<PathBuf>,
}

impl fmt::Display for ClearResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.archive {
            Some(path) if self.deleted > 0 => writeln!(
                f,
                "Cleared {} tasks; {} completed tasks were archived to `{}`",
                self.deleted,
                self.archived,
                path.display()
            ),
            _ => writeln!(f, "No tasks to clear."),
        }
    }
}

/// Outcome of merging a batch of task definitions.
#[derive(Debug, Clone)]
pub struct SplitResult {
    pub policy: MergePolicy,
    /// Tasks created or updated, in batch order
    pub touched: Vec<Task>,
    /// The whole collection after the merge
    pub all_tasks: Vec<Task>,
    /// Present when the batch started by clearing the store
    pub cleared: Option<ClearResult>,
}

impl fmt::Display for SplitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.touched.len();
        match self.policy {
            MergePolicy::Append => writeln!(f, "Added {count} new tasks.")?,
            MergePolicy::Overwrite => writeln!(
                f,
                "Removed unfinished tasks and created {count} new tasks."
            )?,
            MergePolicy::Selective => writeln!(f, "Updated or created {count} tasks.")?,
            MergePolicy::ClearAllTasks => {
                if let Some(cleared) = &self.cleared {
                    write!(f, "{cleared}")?;
                }
                writeln!(f, "Created {count} new tasks.")?;
            }
        }
        writeln!(f)?;

        for task in &self.touched {
            task.fmt_compact(f)?;
            if !task.dependencies.is_empty() {
                let names: Vec<String> = task
                    .dependencies
                    .iter()
                    .map(|dep| {
                        self.all_tasks
                            .iter()
                            .find(|other| other.id == dep.task_id)
                            .map_or_else(|| format!("`{}`", dep.task_id), |other| format!("\"{}\"", other.name))
                    })
                    .collect();
                writeln!(f, "Depends on: {}", names.join(", "))?;
                writeln!(f)?;
            }
        }

        writeln!(f, "Total tasks in store: {}", self.all_tasks.len())
    }
}

/// What a started task brings along.
#[derive(Debug, Clone)]
pub struct ExecutionBrief {
    pub task: Task,
    pub complexity: ComplexityAssessment,
    /// Existing dependency tasks, in dependency order
    pub dependencies: Vec<Task>,
}

/// Outcome of asking to start a task.
#[derive(Debug, Clone)]
pub enum ExecuteOutcome {
    NotFound(String),
    AlreadyCompleted(Task),
    Blocked { task: Task, blocked_by: Vec<String> },
    AlreadyInProgress(Task),
    Started(ExecutionBrief),
}

impl ExecuteOutcome {
    pub fn is_started(&self) -> bool {
        matches!(self, ExecuteOutcome::Started(_))
    }
}

impl fmt::Display for ExecuteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecuteOutcome::NotFound(id) => {
                writeln!(f, "Task with ID `{id}` not found. Check that the ID is correct.")
            }
            ExecuteOutcome::AlreadyCompleted(task) => writeln!(
                f,
                "Task \"{}\" (ID: `{}`) is already completed. To run it again, delete it and create it anew.",
                task.name, task.id
            ),
            ExecuteOutcome::Blocked { task, blocked_by } => {
                let ids: Vec<String> = blocked_by.iter().map(|id| format!("`{id}`")).collect();
                writeln!(
                    f,
                    "Task \"{}\" (ID: `{}`) cannot start yet. It is blocked by unfinished dependencies: {}",
                    task.name,
                    task.id,
                    ids.join(", ")
                )
            }
            ExecuteOutcome::AlreadyInProgress(task) => writeln!(
                f,
                "Task \"{}\" (ID: `{}`) is already in progress.",
                task.name, task.id
            ),
            ExecuteOutcome::Started(brief) => {
                writeln!(f, "# Executing task")?;
                writeln!(f)?;
                write!(f, "{}", brief.task)?;
                write!(f, "{}", brief.complexity)?;

                if !brief.dependencies.is_empty() {
                    writeln!(f, "### Completed Dependencies")?;
                    writeln!(f)?;
                    for dep in &brief.dependencies {
                        let summary = dep.summary.as_deref().unwrap_or("no completion summary");
                        writeln!(f, "- **{}** (`{}`): {summary}", dep.name, dep.id)?;
                    }
                    writeln!(f)?;
                }

                writeln!(
                    f,
                    "When the work is done, verify the task with a score and a summary; a score of {} or more completes it.",
                    VerifyTask::PASSING_SCORE
                )
            }
        }
    }
}

/// Outcome of verifying a task.
#[derive(Debug, Clone)]
pub enum VerifyOutcome {
    NotFound(String),
    NotInProgress(Task),
    NotPassed { task: Task, score: u8, feedback: String },
    Completed { task: Task, score: u8 },
}

impl VerifyOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, VerifyOutcome::Completed { .. })
    }
}

impl fmt::Display for VerifyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyOutcome::NotFound(id) => {
                writeln!(f, "Task with ID `{id}` not found. Check that the ID is correct.")
            }
            VerifyOutcome::NotInProgress(task) => writeln!(
                f,
                "Task \"{}\" (ID: `{}`) is {}; only tasks in progress can be verified. Execute it first.",
                task.name, task.id, task.status
            ),
            VerifyOutcome::NotPassed {
                task,
                score,
                feedback,
            } => {
                writeln!(
                    f,
                    "Task \"{}\" (ID: `{}`) scored {score}, below {}. It stays in progress.",
                    task.name,
                    task.id,
                    VerifyTask::PASSING_SCORE
                )?;
                writeln!(f)?;
                writeln!(f, "### Issues to fix")?;
                writeln!(f)?;
                writeln!(f, "{feedback}")
            }
            VerifyOutcome::Completed { task, score } => {
                writeln!(
                    f,
                    "Task \"{}\" (ID: `{}`) passed verification with score {score} and is now completed.",
                    task.name, task.id
                )?;
                writeln!(f)?;
                write!(f, "{task}")
            }
        }
    }
}

/// A task together with its complexity assessment.
pub struct ComplexityReport {
    pub task: Task,
    pub assessment: ComplexityAssessment,
}

impl fmt::Display for ComplexityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} (ID: `{}`)", self.task.name, self.task.id)?;
        writeln!(f)?;
        write!(f, "{}", self.assessment)
    }
}

impl fmt::Display for SearchPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tasks.is_empty() {
            return writeln!(f, "No matching tasks found.");
        }

        writeln!(
            f,
            "Found {} tasks (page {} of {}).",
            self.total_results, self.current_page, self.total_pages
        )?;
        writeln!(f)?;
        for task in &self.tasks {
            task.fmt_compact(f)?;
            if let Some(summary) = &task.summary {
                writeln!(f, "Summary: {summary}")?;
                writeln!(f)?;
            }
        }
        if self.has_more {
            writeln!(
                f,
                "More results are available on page {}.",
                self.current_page + 1
            )?;
        }
        Ok(())
    }
}
