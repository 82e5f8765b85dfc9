//! Executability and deletion checks over dependency links.
//!
//! Cycles are not detected. Tasks on a cycle block each other and never
//! become executable.

use std::fmt;

use serde::Serialize;

use crate::models::Task;

/// Answer to "can this task start now?".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionCheck {
    pub can_execute: bool,
    /// Dependency ids that are missing or not completed yet
    pub blocked_by: Vec<String>,
}

impl ExecutionCheck {
    fn refused() -> Self {
        Self::default()
    }
}

/// A task that references another one through its dependencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependent {
    pub id: String,
    pub name: String,
}

impl fmt::Display for Dependent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" (ID: {})", self.name, self.id)
    }
}

/// Answer to "can this task be deleted?".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionCheck {
    Allowed,
    NotFound,
    Completed,
    HasDependents(Vec<Dependent>),
}

impl DeletionCheck {
    pub fn is_allowed(&self) -> bool {
        matches!(self, DeletionCheck::Allowed)
    }
}

/// Whether the task `id` can start: it exists, is not completed, and every
/// dependency exists and is completed.
pub fn can_execute(tasks: &[Task], id: &str) -> ExecutionCheck {
    let Some(task) = tasks.iter().find(|task| task.id == id) else {
        return ExecutionCheck::refused();
    };
    if task.is_completed() {
        return ExecutionCheck::refused();
    }

    let blocked_by: Vec<String> = task
        .dependencies
        .iter()
        .filter(|dep| {
            !tasks
                .iter()
                .any(|other| other.id == dep.task_id && other.is_completed())
        })
        .map(|dep| dep.task_id.clone())
        .collect();

    ExecutionCheck {
        can_execute: blocked_by.is_empty(),
        blocked_by,
    }
}

/// Whether the task `id` can be deleted: it exists, is not completed, and no
/// other task depends on it.
pub fn can_delete(tasks: &[Task], id: &str) -> DeletionCheck {
    let Some(task) = tasks.iter().find(|task| task.id == id) else {
        return DeletionCheck::NotFound;
    };
    if task.is_completed() {
        return DeletionCheck::Completed;
    }

    let dependents: Vec<Dependent> = tasks
        .iter()
        .filter(|other| other.id != id && other.depends_on(id))
        .map(|other| Dependent {
            id: other.id.clone(),
            name: other.name.clone(),
        })
        .collect();

    if dependents.is_empty() {
        DeletionCheck::Allowed
    } else {
        DeletionCheck::HasDependents(dependents)
    }
}

/// Tasks that `task` depends on, in dependency order, skipping missing ones.
pub fn dependency_tasks<'a>(tasks: &'a [Task], task: &Task) -> Vec<&'a Task> {
    task.dependencies
        .iter()
        .filter_map(|dep| tasks.iter().find(|other| other.id == dep.task_id))
        .collect()
}
