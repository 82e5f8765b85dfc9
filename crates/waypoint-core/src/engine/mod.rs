//! Pure task-set computations.
//!
//! Nothing in this module touches the disk. Each function takes the current
//! task collection by value or reference and returns what the next state or
//! the answer should be; [`crate::manager`] handles loading and saving around
//! it.
//!
//! - [`resolver`]: turns dependency references (UUID or task name) into links
//! - [`merge`]: reconciles a batch of definitions with the existing tasks
//! - [`graph`]: executability and deletion checks over dependency links
//! - [`complexity`]: threshold-based complexity scoring

pub mod complexity;
pub mod graph;
pub mod merge;
pub mod resolver;

pub use complexity::assess;
pub use graph::{can_delete, can_execute, dependency_tasks, DeletionCheck, Dependent, ExecutionCheck};
pub use merge::{merge_batch, MergeOutcome, MergePolicy};
pub use resolver::{is_task_id, DependencyResolver};
