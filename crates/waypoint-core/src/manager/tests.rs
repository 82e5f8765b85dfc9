//! Tests for the manager module.

use tempfile::TempDir;

use super::*;
use crate::{
    display::{ExecuteOutcome, VerifyOutcome},
    engine::{DeletionCheck, MergePolicy},
    models::TaskStatus,
    params::{
        ClearAllTasks, Id, ListTasks, QueryTasks, SetTaskStatus, SplitTasks, TaskDefinition,
        UpdateTask, VerifyTask,
    },
};

/// Helper function to create a test manager
async fn create_test_manager() -> (TempDir, TaskManager) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let manager = TaskManagerBuilder::new()
        .with_data_dir(Some(temp_dir.path()))
        .build()
        .await
        .expect("Failed to create manager");
    (temp_dir, manager)
}

fn definition(name: &str, deps: &[&str]) -> TaskDefinition {
    let mut def = TaskDefinition::new(name, format!("{name} description"));
    def.dependencies = deps.iter().map(|dep| dep.to_string()).collect();
    def
}

fn split(policy: MergePolicy, tasks: Vec<TaskDefinition>) -> SplitTasks {
    SplitTasks {
        update_mode: policy,
        tasks,
        global_analysis_result: None,
    }
}

fn id(value: &str) -> Id {
    Id {
        id: value.to_string(),
    }
}

async fn complete(manager: &TaskManager, task_id: &str) {
    manager
        .execute_task(&id(task_id))
        .await
        .expect("Failed to execute task");
    let outcome = manager
        .verify_task(&VerifyTask {
            id: task_id.to_string(),
            score: 90,
            summary: "Done".to_string(),
        })
        .await
        .expect("Failed to verify task");
    assert!(outcome.is_completed());
}

#[tokio::test]
async fn test_build_creates_empty_document() {
    let (temp_dir, manager) = create_test_manager().await;

    assert!(temp_dir.path().join("tasks.json").exists());
    assert_eq!(manager.data_dir(), temp_dir.path());
    assert!(manager.get_all_tasks().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_builder_places_data_under_workspace_root() {
    let temp_dir = TempDir::new().unwrap();
    let manager = TaskManagerBuilder::new()
        .with_workspace_root(Some(temp_dir.path()))
        .build()
        .await
        .unwrap();

    assert_eq!(manager.data_dir(), temp_dir.path().join("data"));
    assert!(temp_dir.path().join("data/tasks.json").exists());
}

#[tokio::test]
async fn test_create_task_resolves_names_of_existing_tasks() {
    let (_temp_dir, manager) = create_test_manager().await;

    let base = manager.create_task(&definition("Base", &[])).await.unwrap();
    let child = manager
        .create_task(&definition("Child", &["Base", "Missing"]))
        .await
        .unwrap();

    assert_eq!(child.dependencies.len(), 1);
    assert_eq!(child.dependencies[0].task_id, base.id);
    assert_eq!(child.status, TaskStatus::Pending);
}

#[tokio::test]
async fn test_create_task_rejects_empty_name() {
    let (_temp_dir, manager) = create_test_manager().await;

    let result = manager.create_task(&definition("  ", &[])).await;
    assert!(matches!(result, Err(WaypointError::InvalidInput { .. })));
}

#[tokio::test]
async fn test_split_tasks_append_then_list_by_status() {
    let (_temp_dir, manager) = create_test_manager().await;

    let result = manager
        .split_tasks(&split(
            MergePolicy::Append,
            vec![definition("A", &[]), definition("B", &["A"])],
        ))
        .await
        .unwrap();
    assert_eq!(result.touched.len(), 2);
    assert_eq!(result.all_tasks.len(), 2);
    assert_eq!(result.touched[1].dependencies[0].task_id, result.touched[0].id);

    manager
        .update_task_status(&SetTaskStatus {
            id: result.touched[0].id.clone(),
            status: TaskStatus::InProgress,
        })
        .await
        .unwrap();

    let pending = manager
        .list_tasks(&ListTasks {
            status: Some(TaskStatus::Pending),
        })
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].name, "B");
}

#[tokio::test]
async fn test_split_tasks_duplicate_names_write_nothing() {
    let (_temp_dir, manager) = create_test_manager().await;

    let result = manager
        .split_tasks(&split(
            MergePolicy::Append,
            vec![definition("A", &[]), definition("A", &[])],
        ))
        .await;

    assert!(matches!(result, Err(WaypointError::DuplicateTaskName { .. })));
    assert!(manager.get_all_tasks().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_split_tasks_clear_all_archives_completed() {
    let (temp_dir, manager) = create_test_manager().await;

    let first = manager
        .split_tasks(&split(
            MergePolicy::Append,
            vec![definition("Old done", &[]), definition("Old open", &[])],
        ))
        .await
        .unwrap();
    complete(&manager, &first.touched[0].id).await;

    let result = manager
        .split_tasks(&split(MergePolicy::ClearAllTasks, vec![definition("Fresh", &[])]))
        .await
        .unwrap();

    let cleared = result.cleared.expect("store was cleared");
    assert_eq!(cleared.deleted, 2);
    assert_eq!(cleared.archived, 1);
    assert!(temp_dir.path().join("memory").is_dir());

    let tasks = manager.get_all_tasks().await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].name, "Fresh");
}

#[tokio::test]
async fn test_execute_and_verify_lifecycle() {
    let (_temp_dir, manager) = create_test_manager().await;

    let result = manager
        .split_tasks(&split(
            MergePolicy::Append,
            vec![definition("A", &[]), definition("B", &["A"])],
        ))
        .await
        .unwrap();
    let a = result.touched[0].id.clone();
    let b = result.touched[1].id.clone();

    let outcome = manager.execute_task(&id(&b)).await.unwrap();
    match outcome {
        ExecuteOutcome::Blocked { blocked_by, .. } => assert_eq!(blocked_by, vec![a.clone()]),
        other => panic!("expected blocked, got {other:?}"),
    }

    let outcome = manager.execute_task(&id(&a)).await.unwrap();
    assert!(outcome.is_started());
    let outcome = manager.execute_task(&id(&a)).await.unwrap();
    assert!(matches!(outcome, ExecuteOutcome::AlreadyInProgress(_)));

    let outcome = manager
        .verify_task(&VerifyTask {
            id: a.clone(),
            score: 79,
            summary: "Tests missing".to_string(),
        })
        .await
        .unwrap();
    assert!(matches!(outcome, VerifyOutcome::NotPassed { score: 79, .. }));
    let task = manager.get_task_by_id(&id(&a)).await.unwrap().unwrap();
    assert_eq!(task.status, TaskStatus::InProgress);
    assert!(task.summary.is_none());

    let outcome = manager
        .verify_task(&VerifyTask {
            id: a.clone(),
            score: 80,
            summary: "All good".to_string(),
        })
        .await
        .unwrap();
    assert!(outcome.is_completed());
    let task = manager.get_task_by_id(&id(&a)).await.unwrap().unwrap();
    assert_eq!(task.status, TaskStatus::Completed);
    assert_eq!(task.summary.as_deref(), Some("All good"));
    assert!(task.completed_at.is_some());

    match manager.execute_task(&id(&b)).await.unwrap() {
        ExecuteOutcome::Started(brief) => {
            assert_eq!(brief.dependencies.len(), 1);
            assert_eq!(brief.dependencies[0].id, a);
        }
        other => panic!("expected started, got {other:?}"),
    }

    let outcome = manager.execute_task(&id(&a)).await.unwrap();
    assert!(matches!(outcome, ExecuteOutcome::AlreadyCompleted(_)));
}

#[tokio::test]
async fn test_verify_requires_in_progress() {
    let (_temp_dir, manager) = create_test_manager().await;
    let task = manager.create_task(&definition("A", &[])).await.unwrap();

    let outcome = manager
        .verify_task(&VerifyTask {
            id: task.id.clone(),
            score: 100,
            summary: "Done".to_string(),
        })
        .await
        .unwrap();
    assert!(matches!(outcome, VerifyOutcome::NotInProgress(_)));

    let outcome = manager
        .verify_task(&VerifyTask {
            id: "missing".to_string(),
            score: 100,
            summary: "Done".to_string(),
        })
        .await
        .unwrap();
    assert!(matches!(outcome, VerifyOutcome::NotFound(_)));
}

#[tokio::test]
async fn test_delete_refuses_completed_and_depended_on() {
    let (_temp_dir, manager) = create_test_manager().await;

    let result = manager
        .split_tasks(&split(
            MergePolicy::Append,
            vec![definition("A", &[]), definition("B", &["A"])],
        ))
        .await
        .unwrap();
    let a = result.touched[0].id.clone();
    let b = result.touched[1].id.clone();

    let blocked = manager.delete_task(&id(&a)).await;
    match blocked {
        Err(WaypointError::DeletionBlocked { dependents, .. }) => {
            assert_eq!(dependents, vec![format!("\"B\" (ID: {b})")]);
        }
        other => panic!("expected deletion blocked, got {other:?}"),
    }

    let removed = manager.delete_task(&id(&b)).await.unwrap().unwrap();
    assert_eq!(removed.id, b);
    assert!(manager.can_delete(&id(&a)).await.unwrap().is_allowed());

    complete(&manager, &a).await;
    let result = manager.delete_task(&id(&a)).await;
    assert!(matches!(result, Err(WaypointError::CompletedTaskDeletion { .. })));
    assert!(matches!(
        manager.can_delete(&id(&a)).await.unwrap(),
        DeletionCheck::Completed
    ));

    assert!(manager.delete_task(&id("missing")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_completed_task_accepts_only_summary_and_files() {
    let (_temp_dir, manager) = create_test_manager().await;
    let task = manager.create_task(&definition("A", &[])).await.unwrap();
    complete(&manager, &task.id).await;

    let result = manager
        .update_task_content(&UpdateTask {
            id: task.id.clone(),
            notes: Some("late note".to_string()),
            ..Default::default()
        })
        .await;
    assert!(matches!(result, Err(WaypointError::CompletedTaskImmutable { .. })));

    let empty = manager
        .update_task_content(&UpdateTask {
            id: task.id.clone(),
            ..Default::default()
        })
        .await;
    assert!(matches!(empty, Err(WaypointError::CompletedTaskImmutable { .. })));

    let updated = manager
        .update_task_summary(&task.id, "Rewritten summary")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.summary.as_deref(), Some("Rewritten summary"));
    assert_eq!(updated.status, TaskStatus::Completed);

    let reopened = manager
        .update_task_status(&SetTaskStatus {
            id: task.id.clone(),
            status: TaskStatus::Pending,
        })
        .await;
    assert!(matches!(reopened, Err(WaypointError::CompletedTaskImmutable { .. })));
}

#[tokio::test]
async fn test_update_task_content_reports_changes() {
    let (_temp_dir, manager) = create_test_manager().await;
    let base = manager.create_task(&definition("Base", &[])).await.unwrap();
    let task = manager.create_task(&definition("Child", &[])).await.unwrap();

    let result = manager
        .update_task_content(&UpdateTask {
            id: task.id.clone(),
            description: Some("New description".to_string()),
            dependencies: Some(vec!["Base".to_string(), task.id.clone()]),
            ..Default::default()
        })
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        result.changes,
        vec!["Updated description".to_string(), "Updated dependencies".to_string()]
    );
    assert_eq!(result.resource.description, "New description");
    assert_eq!(result.resource.dependencies.len(), 1);
    assert_eq!(result.resource.dependencies[0].task_id, base.id);

    let noop = manager
        .update_task_content(&UpdateTask {
            id: task.id.clone(),
            ..Default::default()
        })
        .await
        .unwrap()
        .unwrap();
    assert!(noop.is_noop());

    let missing = manager
        .update_task_content(&UpdateTask {
            id: "missing".to_string(),
            notes: Some("x".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_clear_all_requires_confirmation() {
    let (_temp_dir, manager) = create_test_manager().await;
    manager.create_task(&definition("A", &[])).await.unwrap();

    let refused = manager.clear_all(&ClearAllTasks { confirm: false }).await;
    assert!(matches!(refused, Err(WaypointError::InvalidInput { .. })));
    assert_eq!(manager.get_all_tasks().await.unwrap().len(), 1);

    let cleared = manager.clear_all(&ClearAllTasks { confirm: true }).await.unwrap();
    assert_eq!(cleared.deleted, 1);
    assert_eq!(cleared.archived, 0);
    assert!(cleared.archive.is_some());

    let again = manager.clear_all(&ClearAllTasks { confirm: true }).await.unwrap();
    assert_eq!(again.deleted, 0);
    assert!(again.archive.is_none());
}

#[tokio::test]
async fn test_query_and_detail_reach_archived_tasks() {
    let (_temp_dir, manager) = create_test_manager().await;

    let task = manager
        .create_task(&definition("Deploy pipeline", &[]))
        .await
        .unwrap();
    complete(&manager, &task.id).await;
    manager.clear_all(&ClearAllTasks { confirm: true }).await.unwrap();
    assert!(manager.get_task_by_id(&id(&task.id)).await.unwrap().is_none());

    let page = manager
        .query_tasks(&QueryTasks {
            query: "deploy".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.total_results, 1);
    assert_eq!(page.tasks[0].id, task.id);

    let detail = manager.get_task_detail(&id(&task.id)).await.unwrap().unwrap();
    assert_eq!(detail.status, TaskStatus::Completed);
    assert_eq!(detail.summary.as_deref(), Some("Done"));
}

#[tokio::test]
async fn test_back_to_back_clears_keep_every_archive() {
    let (_temp_dir, manager) = create_test_manager().await;

    let first = manager.create_task(&definition("First", &[])).await.unwrap();
    complete(&manager, &first.id).await;
    manager.clear_all(&ClearAllTasks { confirm: true }).await.unwrap();

    let second = manager.create_task(&definition("Second", &[])).await.unwrap();
    complete(&manager, &second.id).await;
    manager.clear_all(&ClearAllTasks { confirm: true }).await.unwrap();

    let archives = manager
        .with_store(|store| store.list_archives())
        .await
        .unwrap();
    assert_eq!(archives.len(), 2);

    let first_detail = manager.get_task_detail(&id(&first.id)).await.unwrap();
    assert_eq!(first_detail.map(|task| task.name).as_deref(), Some("First"));
    let second_detail = manager.get_task_detail(&id(&second.id)).await.unwrap();
    assert_eq!(second_detail.map(|task| task.name).as_deref(), Some("Second"));
}

#[tokio::test]
async fn test_assess_complexity() {
    let (_temp_dir, manager) = create_test_manager().await;
    let task = manager.create_task(&definition("A", &[])).await.unwrap();

    let assessment = manager.assess_complexity(&id(&task.id)).await.unwrap().unwrap();
    assert_eq!(assessment.metrics.dependencies_count, 0);
    assert!(manager.assess_complexity(&id("missing")).await.unwrap().is_none());
}
