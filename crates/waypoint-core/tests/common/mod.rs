use waypoint_core::{
    params::{SplitTasks, TaskDefinition},
    MergePolicy, TaskManager, TaskManagerBuilder,
};
use tempfile::TempDir;

/// Helper function to create a test manager over a fresh data directory
pub async fn create_test_manager() -> (TempDir, TaskManager) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let manager = open_manager(&temp_dir).await;
    (temp_dir, manager)
}

/// Opens another manager over an existing data directory
pub async fn open_manager(temp_dir: &TempDir) -> TaskManager {
    TaskManagerBuilder::new()
        .with_data_dir(Some(temp_dir.path()))
        .build()
        .await
        .expect("Failed to create manager")
}

pub fn definition(name: &str, deps: &[&str]) -> TaskDefinition {
    let mut def = TaskDefinition::new(name, format!("{name} description"));
    def.dependencies = deps.iter().map(|dep| dep.to_string()).collect();
    def
}

pub fn batch(policy: MergePolicy, tasks: Vec<TaskDefinition>) -> SplitTasks {
    SplitTasks {
        update_mode: policy,
        tasks,
        global_analysis_result: None,
    }
}
