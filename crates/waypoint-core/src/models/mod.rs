//! Data models for tasks.
//!
//! This module holds the persisted task record and the value types built
//! around it. Display implementations live in [`crate::display::models`] so
//! the data structures stay free of presentation logic.
//!
//! Every persisted type serializes with camelCase field names, matching the
//! on-disk `tasks.json` document:
//!
//! ```json
//! {
//!   "tasks": [
//!     {
//!       "id": "0b3c4e5f-1a2b-4c3d-8e9f-0a1b2c3d4e5f",
//!       "name": "Add schema",
//!       "description": "Create the initial tables",
//!       "status": "pending",
//!       "dependencies": [{ "taskId": "..." }],
//!       "createdAt": "2024-01-01T00:00:00Z",
//!       "updatedAt": "2024-01-01T00:00:00Z"
//!     }
//!   ]
//! }
//! ```
//!
//! # Examples
//!
//! ```rust
//! use jiff::Timestamp;
//! use waypoint_core::models::{Task, TaskStatus};
//!
//! let task = Task::new("Add schema", "Create the initial tables", Timestamp::now());
//! assert_eq!(task.status, TaskStatus::Pending);
//! assert!(task.dependencies.is_empty());
//! println!("{}", task); // Markdown with header, status and timestamps
//! ```

pub mod complexity;
pub mod filters;
pub mod requests;
pub mod status;
pub mod summary;
pub mod task;


pub use complexity::{ComplexityAssessment, ComplexityLevel, ComplexityMetrics};
pub use filters::TaskFilter;
pub use requests::UpdateTaskRequest;
pub use status::TaskStatus;
pub use summary::StatusSummary;
pub use task::{RelatedFile, RelatedFileType, Task, TaskDependency};
