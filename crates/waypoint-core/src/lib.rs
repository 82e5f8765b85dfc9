//! Core library for Waypoint, a task tracker for LLM coding agents.
//!
//! Agents split a piece of work into named tasks with dependencies, execute
//! them one at a time, verify them with a score, and search finished work
//! later. This crate holds everything except the interfaces:
//!
//! - [`store`]: the `tasks.json` document, archive snapshots and data
//!   directory resolution
//! - [`engine`]: batch merge policies, dependency resolution, the dependency
//!   graph checks and complexity assessment, all pure functions over tasks
//! - [`search`]: keyword and id search over active tasks and archives
//! - [`manager`]: the async [`TaskManager`] API that ties them together
//! - [`display`]: markdown formatting shared by the CLI and the MCP server
//!
//! # Quick Start
//!
//! ```rust
//! use waypoint_core::{
//!     engine::MergePolicy,
//!     params::{Id, SplitTasks, TaskDefinition},
//!     TaskManagerBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dir = tempfile::TempDir::new()?;
//! let manager = TaskManagerBuilder::new()
//!     .with_data_dir(Some(dir.path()))
//!     .build()
//!     .await?;
//!
//! let mut api = TaskDefinition::new("Build API", "Expose the endpoints");
//! api.dependencies = vec!["Add schema".to_string()];
//! let split = SplitTasks {
//!     update_mode: MergePolicy::Append,
//!     tasks: vec![TaskDefinition::new("Add schema", "Create the tables"), api],
//!     global_analysis_result: None,
//! };
//! let result = manager.split_tasks(&split).await?;
//! println!("{result}");
//!
//! let schema_id = result.touched[0].id.clone();
//! println!("{}", manager.execute_task(&Id { id: schema_id }).await?);
//! # Ok(())
//! # }
//! ```

pub mod display;
pub mod engine;
pub mod error;
pub mod manager;
pub mod models;
pub mod params;
pub mod search;
pub mod store;

// Re-export commonly used types
pub use display::{
    ClearResult, CreateResult, DeleteResult, ExecuteOutcome, OperationStatus, SplitResult, Tasks,
    UpdateResult, VerifyOutcome,
};
pub use engine::MergePolicy;
pub use error::{Result, WaypointError};
pub use manager::{TaskManager, TaskManagerBuilder};
pub use models::{
    ComplexityAssessment, ComplexityLevel, RelatedFile, RelatedFileType, Task, TaskDependency,
    TaskFilter, TaskStatus, UpdateTaskRequest,
};
pub use params::{
    ClearAllTasks, Id, ListTasks, QueryTasks, SetTaskStatus, SplitTasks, TaskDefinition,
    UpdateTask, VerifyTask,
};
pub use search::{ArchiveSearch, SearchPage, SubstringSearch};
pub use store::{DataDirResolver, TaskStore};
