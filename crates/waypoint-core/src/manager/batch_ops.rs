//! Batch merge, clearing and content updates for the TaskManager.

use jiff::Timestamp;
use log::info;

use super::{task_ops::apply_update, TaskManager};
use crate::{
    display::{ClearResult, SplitResult, UpdateResult},
    engine::{self, DependencyResolver, MergePolicy},
    error::{Result, WaypointError},
    models::{Task, UpdateTaskRequest},
    params::{ClearAllTasks, SplitTasks, TaskDefinition, UpdateTask},
    store::TaskStore,
};

impl TaskManager {
    /// Merges a batch of definitions into the store under `params.update_mode`.
    ///
    /// Duplicate names reject the whole batch before anything is written. With
    /// `ClearAllTasks` the completed tasks are archived and the store emptied
    /// first, then the batch is appended.
    pub async fn split_tasks(&self, params: &SplitTasks) -> Result<SplitResult> {
        engine::merge::check_unique_names(&params.tasks)?;
        for definition in &params.tasks {
            definition.validate()?;
        }
        let params = params.clone();

        self.with_store(move |store| {
            let (existing, cleared) = if params.update_mode == MergePolicy::ClearAllTasks {
                (Vec::new(), Some(clear_store(&store)?))
            } else {
                (store.load_all()?, None)
            };

            let outcome = engine::merge_batch(
                existing,
                &params.tasks,
                params.update_mode,
                params.global_analysis_result.as_deref(),
                Timestamp::now(),
            )?;

            let all_tasks = outcome.collection();
            store.save_all(&all_tasks)?;
            info!(
                "Merged {} tasks with policy {}",
                outcome.touched.len(),
                params.update_mode.as_str()
            );

            Ok(SplitResult {
                policy: params.update_mode,
                touched: outcome.touched,
                all_tasks,
                cleared,
            })
        })
        .await
    }

    /// Merges `definitions` and returns only the created or updated tasks.
    pub async fn batch_merge(
        &self,
        definitions: Vec<TaskDefinition>,
        policy: MergePolicy,
        analysis_result: Option<String>,
    ) -> Result<Vec<Task>> {
        let params = SplitTasks {
            update_mode: policy,
            tasks: definitions,
            global_analysis_result: analysis_result,
        };
        Ok(self.split_tasks(&params).await?.touched)
    }

    /// Archives completed tasks to a snapshot and empties the store.
    ///
    /// # Errors
    ///
    /// Returns `WaypointError::InvalidInput` unless `params.confirm` is set.
    pub async fn clear_all(&self, params: &ClearAllTasks) -> Result<ClearResult> {
        if !params.confirm {
            return Err(WaypointError::invalid_input("confirm")
                .with_reason("Clearing all tasks must be confirmed explicitly"));
        }
        self.with_store(|store| clear_store(&store)).await
    }

    /// Updates the editable content of an unfinished task.
    ///
    /// Returns `None` when the task does not exist. An update naming no field
    /// succeeds with no changes on an unfinished task. Dependency references resolve against the
    /// existing tasks by id or name; unresolved ones are dropped.
    ///
    /// # Errors
    ///
    /// Returns `WaypointError::CompletedTaskImmutable` for completed tasks,
    /// even when the update is empty.
    pub async fn update_task_content(&self, params: &UpdateTask) -> Result<Option<UpdateResult<Task>>> {
        let mut request = UpdateTaskRequest::try_from(params.clone())?;
        let id = params.id.clone();

        self.with_store(move |store| {
            let tasks = store.load_all()?;
            let Some(task) = tasks.iter().find(|task| task.id == id) else {
                return Ok(None);
            };

            if task.is_completed() {
                return Err(WaypointError::CompletedTaskImmutable {
                    id,
                    fields: request.touched_fields().into_iter().map(str::to_string).collect(),
                });
            }
            if request.is_empty() {
                return Ok(Some(UpdateResult::new(task.clone())));
            }

            if let Some(references) = request.dependencies.take() {
                let resolver = DependencyResolver::from_tasks(tasks.iter().filter(|t| t.id != id));
                request.dependencies = Some(
                    resolver
                        .resolve_all(&references)
                        .into_iter()
                        .map(|dep| dep.task_id)
                        .collect(),
                );
            }

            let changes = request
                .touched_fields()
                .into_iter()
                .map(|field| format!("Updated {field}"))
                .collect();
            Ok(apply_update(&store, &id, request)?
                .map(|task| UpdateResult::with_changes(task, changes)))
        })
        .await
    }
}

/// Archives completed tasks and empties the active document.
fn clear_store(store: &TaskStore) -> Result<ClearResult> {
    let tasks = store.load_all()?;
    if tasks.is_empty() {
        return Ok(ClearResult::default());
    }

    let completed: Vec<Task> = tasks.iter().filter(|task| task.is_completed()).cloned().collect();
    let archive = store.write_archive(&completed)?;
    store.save_all(&[])?;
    info!(
        "Cleared {} tasks, archived {} completed to {}",
        tasks.len(),
        completed.len(),
        archive.display()
    );

    Ok(ClearResult {
        deleted: tasks.len(),
        archived: completed.len(),
        archive: Some(archive),
    })
}
