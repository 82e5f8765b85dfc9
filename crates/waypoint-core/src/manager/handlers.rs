//! Lifecycle handlers that return formatted wrapper types for the TaskManager.

use jiff::Timestamp;
use log::info;

use super::TaskManager;
use crate::{
    display::{ExecuteOutcome, ExecutionBrief, VerifyOutcome},
    engine,
    error::Result,
    models::{TaskStatus, UpdateTaskRequest},
    params::{Id, VerifyTask},
};

impl TaskManager {
    /// Handle starting work on a task.
    ///
    /// A runnable task moves to `in_progress` and comes back with its
    /// complexity assessment and the tasks it depends on. Missing, completed,
    /// blocked and already running tasks are reported without changes.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use waypoint_core::{params::Id, TaskManagerBuilder};
    /// # async {
    /// let manager = TaskManagerBuilder::new().build().await?;
    /// let outcome = manager
    ///     .execute_task(&Id { id: "0b3c4e5f-1a2b-4c3d-8e9f-0a1b2c3d4e5f".to_string() })
    ///     .await?;
    /// println!("{outcome}");
    /// # Result::<(), waypoint_core::WaypointError>::Ok(())
    /// # };
    /// ```
    pub async fn execute_task(&self, params: &Id) -> Result<ExecuteOutcome> {
        let id = params.id.clone();

        self.with_store(move |store| {
            let mut tasks = store.load_all()?;
            let Some(position) = tasks.iter().position(|task| task.id == id) else {
                return Ok(ExecuteOutcome::NotFound(id));
            };

            let task = &tasks[position];
            if task.is_completed() {
                return Ok(ExecuteOutcome::AlreadyCompleted(task.clone()));
            }

            let check = engine::can_execute(&tasks, &id);
            if !check.can_execute {
                return Ok(ExecuteOutcome::Blocked {
                    task: task.clone(),
                    blocked_by: check.blocked_by,
                });
            }

            if task.status == TaskStatus::InProgress {
                return Ok(ExecuteOutcome::AlreadyInProgress(task.clone()));
            }

            UpdateTaskRequest::status(TaskStatus::InProgress)
                .apply(&mut tasks[position], Timestamp::now());
            store.save_all(&tasks)?;

            let task = tasks[position].clone();
            info!("Started task {} ('{}')", task.id, task.name);
            let dependencies = engine::dependency_tasks(&tasks, &task)
                .into_iter()
                .cloned()
                .collect();

            Ok(ExecuteOutcome::Started(ExecutionBrief {
                complexity: engine::assess(&task),
                task,
                dependencies,
            }))
        })
        .await
    }

    /// Handle scoring a task in progress.
    ///
    /// A score of 80 or more completes the task and stores the summary. A
    /// lower score leaves the task untouched and hands the summary back as
    /// feedback.
    pub async fn verify_task(&self, params: &VerifyTask) -> Result<VerifyOutcome> {
        params.validate()?;

        let Some(task) = self.get_task_by_id(&Id { id: params.id.clone() }).await? else {
            return Ok(VerifyOutcome::NotFound(params.id.clone()));
        };
        if task.status != TaskStatus::InProgress {
            return Ok(VerifyOutcome::NotInProgress(task));
        }

        if !params.passed() {
            return Ok(VerifyOutcome::NotPassed {
                task,
                score: params.score,
                feedback: params.summary.clone(),
            });
        }

        let request = UpdateTaskRequest {
            summary: Some(params.summary.clone()),
            ..UpdateTaskRequest::status(TaskStatus::Completed)
        };
        match self.update_task(&params.id, request).await? {
            Some(task) => {
                info!("Completed task {} ('{}')", task.id, task.name);
                Ok(VerifyOutcome::Completed {
                    task,
                    score: params.score,
                })
            }
            None => Ok(VerifyOutcome::NotFound(params.id.clone())),
        }
    }
}
