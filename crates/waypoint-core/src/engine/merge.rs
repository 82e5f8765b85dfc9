//! Batch merge of task definitions into an existing collection.

use std::collections::HashSet;

use jiff::Timestamp;
use log::debug;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::DependencyResolver;
use crate::{
    error::{Result, WaypointError},
    models::Task,
    params::TaskDefinition,
};

/// How a batch is reconciled with the tasks already in the store.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub enum MergePolicy {
    /// Keep every existing task and add the batch as new tasks
    #[default]
    Append,
    /// Keep only completed tasks and add the batch as new tasks
    Overwrite,
    /// Update unfinished tasks whose name matches, add the rest, keep
    /// everything not named in the batch
    Selective,
    /// Archive completed tasks, empty the store, then append the batch
    ClearAllTasks,
}

impl MergePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MergePolicy::Append => "append",
            MergePolicy::Overwrite => "overwrite",
            MergePolicy::Selective => "selective",
            MergePolicy::ClearAllTasks => "clearAllTasks",
        }
    }
}

impl std::str::FromStr for MergePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "append" => Ok(MergePolicy::Append),
            "overwrite" => Ok(MergePolicy::Overwrite),
            "selective" => Ok(MergePolicy::Selective),
            "clearalltasks" | "clear-all-tasks" | "clear_all_tasks" | "clear" => {
                Ok(MergePolicy::ClearAllTasks)
            }
            _ => Err(format!("Invalid update mode: {s}")),
        }
    }
}

/// Result of merging a batch.
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    /// Existing tasks carried over unchanged, in their original order
    pub retained: Vec<Task>,
    /// Tasks created or updated by the batch, in batch order
    pub touched: Vec<Task>,
}

impl MergeOutcome {
    /// The next persisted collection: retained tasks followed by touched ones.
    pub fn collection(&self) -> Vec<Task> {
        self.retained
            .iter()
            .chain(self.touched.iter())
            .cloned()
            .collect()
    }
}

/// Rejects a batch that names the same task twice.
pub fn check_unique_names(definitions: &[TaskDefinition]) -> Result<()> {
    let mut seen = HashSet::new();
    for definition in definitions {
        if !seen.insert(definition.name.as_str()) {
            return Err(WaypointError::DuplicateTaskName {
                name: definition.name.clone(),
            });
        }
    }
    Ok(())
}

/// Computes the next collection from `existing`, a batch and a policy.
///
/// `ClearAllTasks` retains nothing here; archiving the completed tasks
/// beforehand is up to the caller. Dependency references in the batch are
/// resolved only after every entry has been placed, so an entry may name a
/// task that appears later in the same batch.
///
/// # Errors
///
/// Returns `WaypointError::DuplicateTaskName` or `WaypointError::InvalidInput`
/// before any merging takes place.
pub fn merge_batch(
    existing: Vec<Task>,
    definitions: &[TaskDefinition],
    policy: MergePolicy,
    analysis_result: Option<&str>,
    now: Timestamp,
) -> Result<MergeOutcome> {
    check_unique_names(definitions)?;
    for definition in definitions {
        definition.validate()?;
    }

    let mut resolver = DependencyResolver::new();

    if policy == MergePolicy::Selective {
        for task in &existing {
            resolver.insert_name(&task.name, &task.id);
        }
    }

    let mut retained: Vec<Task> = match policy {
        MergePolicy::Append | MergePolicy::Selective => existing,
        MergePolicy::Overwrite => existing.into_iter().filter(Task::is_completed).collect(),
        MergePolicy::ClearAllTasks => Vec::new(),
    };
    for task in &retained {
        resolver.insert_name(&task.name, &task.id);
    }

    let mut touched: Vec<Task> = Vec::with_capacity(definitions.len());
    // Index into `touched` for each definition; `None` when it was skipped.
    let mut slots: Vec<Option<usize>> = Vec::with_capacity(definitions.len());

    for definition in definitions {
        let matched = if policy == MergePolicy::Selective {
            resolver
                .resolve_name(&definition.name)
                .and_then(|id| retained.iter().position(|task| task.id == id))
        } else {
            None
        };

        match matched {
            Some(position) if retained[position].is_completed() => {
                debug!(
                    "Skipping '{}': matching task {} is already completed",
                    definition.name, retained[position].id
                );
                slots.push(None);
            }
            Some(position) => {
                let mut task = retained.remove(position);
                debug!("Updating task {} ('{}') in place", task.id, task.name);
                apply_definition(&mut task, definition, analysis_result, now);
                slots.push(Some(touched.len()));
                touched.push(task);
            }
            None => {
                let mut task = Task::new(&definition.name, &definition.description, now);
                apply_definition(&mut task, definition, analysis_result, now);
                debug!("Creating task {} ('{}')", task.id, task.name);
                resolver.insert_name(&task.name, &task.id);
                slots.push(Some(touched.len()));
                touched.push(task);
            }
        }
    }

    for task in retained.iter().chain(touched.iter()) {
        resolver.insert_known(&task.id);
    }

    for (definition, slot) in definitions.iter().zip(&slots) {
        let Some(index) = *slot else { continue };
        if definition.dependencies.is_empty() {
            continue;
        }
        let resolved = resolver.resolve_all(&definition.dependencies);
        if resolved.len() < definition.dependencies.len() {
            debug!(
                "Dropped {} unresolved dependencies of '{}'",
                definition.dependencies.len() - resolved.len(),
                definition.name
            );
        }
        touched[index].dependencies = resolved;
    }

    Ok(MergeOutcome { retained, touched })
}

/// Copies the content of `definition` into `task`.
///
/// Optional text fields are replaced even when the definition leaves them
/// empty; related files only when the definition supplies them.
fn apply_definition(
    task: &mut Task,
    definition: &TaskDefinition,
    analysis_result: Option<&str>,
    now: Timestamp,
) {
    task.name = definition.name.clone();
    task.description = definition.description.clone();
    task.notes = definition.notes.clone();
    task.implementation_guide = definition.implementation_guide.clone();
    task.verification_criteria = definition.verification_criteria.clone();
    task.analysis_result = analysis_result.map(str::to_string);
    if let Some(files) = &definition.related_files {
        task.related_files = files.clone();
    }
    task.updated_at = now;
}
