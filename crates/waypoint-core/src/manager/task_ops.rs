//! Single-task operations for the TaskManager.

use jiff::Timestamp;
use log::{debug, info};

use super::TaskManager;
use crate::{
    display::Tasks,
    engine::{self, DeletionCheck, DependencyResolver, ExecutionCheck},
    error::{Result, WaypointError},
    models::{ComplexityAssessment, RelatedFile, Task, TaskFilter, UpdateTaskRequest},
    params::{Id, ListTasks, SetTaskStatus, TaskDefinition},
    store::TaskStore,
};

impl TaskManager {
    /// Creates one pending task. Dependency references resolve against the
    /// existing tasks by id or name; unresolved ones are dropped.
    pub async fn create_task(&self, params: &TaskDefinition) -> Result<Task> {
        params.validate()?;
        let params = params.clone();

        self.with_store(move |store| {
            let mut tasks = store.load_all()?;
            let resolver = DependencyResolver::from_tasks(&tasks);

            let now = Timestamp::now();
            let mut task = Task::new(params.name, params.description, now);
            task.notes = params.notes;
            task.implementation_guide = params.implementation_guide;
            task.verification_criteria = params.verification_criteria;
            task.related_files = params.related_files.unwrap_or_default();
            task.dependencies = resolver.resolve_all(&params.dependencies);

            tasks.push(task.clone());
            store.save_all(&tasks)?;
            info!("Created task {} ('{}')", task.id, task.name);
            Ok(task)
        })
        .await
    }

    /// Retrieves a task by its ID.
    pub async fn get_task_by_id(&self, params: &Id) -> Result<Option<Task>> {
        let id = params.id.clone();
        self.with_store(move |store| Ok(store.load_all()?.into_iter().find(|task| task.id == id)))
            .await
    }

    /// Every active task, in stored order.
    pub async fn get_all_tasks(&self) -> Result<Vec<Task>> {
        self.with_store(|store| store.load_all()).await
    }

    /// Lists tasks, optionally restricted to one status.
    pub async fn list_tasks(&self, params: &ListTasks) -> Result<Tasks> {
        let filter = TaskFilter::from(params);
        let tasks = self.get_all_tasks().await?;
        Ok(Tasks(tasks.into_iter().filter(|task| filter.matches(task)).collect()))
    }

    /// Applies a partial update.
    ///
    /// Returns `None` when the task does not exist. A completed task accepts
    /// only `summary` and `relatedFiles`; anything else is refused with
    /// `WaypointError::CompletedTaskImmutable`.
    pub async fn update_task(&self, id: &str, request: UpdateTaskRequest) -> Result<Option<Task>> {
        let id = id.to_string();
        self.with_store(move |store| apply_update(&store, &id, request)).await
    }

    /// Sets the status of a task, stamping `completedAt` on completion.
    pub async fn update_task_status(&self, params: &SetTaskStatus) -> Result<Option<Task>> {
        self.update_task(&params.id, UpdateTaskRequest::status(params.status))
            .await
    }

    /// Records the completion summary of a task.
    pub async fn update_task_summary(&self, id: &str, summary: &str) -> Result<Option<Task>> {
        let request = UpdateTaskRequest {
            summary: Some(summary.to_string()),
            ..Default::default()
        };
        self.update_task(id, request).await
    }

    /// Replaces the related files of a task. Allowed on completed tasks.
    pub async fn update_task_related_files(
        &self,
        id: &str,
        related_files: Vec<RelatedFile>,
    ) -> Result<Option<Task>> {
        for file in &related_files {
            file.validate()?;
        }
        let request = UpdateTaskRequest {
            related_files: Some(related_files),
            ..Default::default()
        };
        self.update_task(id, request).await
    }

    /// Deletes a task.
    ///
    /// Returns `None` when the task does not exist.
    ///
    /// # Errors
    ///
    /// * `WaypointError::CompletedTaskDeletion` - the task is completed
    /// * `WaypointError::DeletionBlocked` - other tasks depend on it
    pub async fn delete_task(&self, params: &Id) -> Result<Option<Task>> {
        let id = params.id.clone();

        self.with_store(move |store| {
            let mut tasks = store.load_all()?;
            match engine::can_delete(&tasks, &id) {
                DeletionCheck::NotFound => return Ok(None),
                DeletionCheck::Completed => return Err(WaypointError::CompletedTaskDeletion { id }),
                DeletionCheck::HasDependents(dependents) => {
                    return Err(WaypointError::DeletionBlocked {
                        id,
                        dependents: dependents.iter().map(ToString::to_string).collect(),
                    });
                }
                DeletionCheck::Allowed => {}
            }

            let Some(position) = tasks.iter().position(|task| task.id == id) else {
                return Ok(None);
            };
            let removed = tasks.remove(position);
            store.save_all(&tasks)?;
            info!("Deleted task {} ('{}')", removed.id, removed.name);
            Ok(Some(removed))
        })
        .await
    }

    /// Whether the task can start now, with its blocking dependencies.
    pub async fn can_execute(&self, params: &Id) -> Result<ExecutionCheck> {
        let id = params.id.clone();
        self.with_store(move |store| Ok(engine::can_execute(&store.load_all()?, &id)))
            .await
    }

    /// Whether the task can be deleted, naming the tasks that depend on it.
    pub async fn can_delete(&self, params: &Id) -> Result<DeletionCheck> {
        let id = params.id.clone();
        self.with_store(move |store| Ok(engine::can_delete(&store.load_all()?, &id)))
            .await
    }

    /// Complexity assessment of a task, or `None` when it does not exist.
    pub async fn assess_complexity(&self, params: &Id) -> Result<Option<ComplexityAssessment>> {
        Ok(self.get_task_by_id(params).await?.as_ref().map(engine::assess))
    }
}

/// Loads, updates one task in place and saves. Shared by every partial update.
pub(crate) fn apply_update(
    store: &TaskStore,
    id: &str,
    request: UpdateTaskRequest,
) -> Result<Option<Task>> {
    let mut tasks = store.load_all()?;
    let Some(task) = tasks.iter_mut().find(|task| task.id == id) else {
        return Ok(None);
    };

    if task.is_completed() {
        let restricted = request.restricted_fields();
        if !restricted.is_empty() {
            return Err(WaypointError::CompletedTaskImmutable {
                id: id.to_string(),
                fields: restricted.into_iter().map(str::to_string).collect(),
            });
        }
    }

    debug!("Updating task {id}: {:?}", request.touched_fields());
    request.apply(task, Timestamp::now());
    let updated = task.clone();
    store.save_all(&tasks)?;
    Ok(Some(updated))
}
