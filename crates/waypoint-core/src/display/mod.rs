//! Display formatting for tasks and operation results.
//!
//! Domain models implement [`std::fmt::Display`] directly and produce
//! markdown. Collections and operation outcomes get wrapper types, so the
//! CLI renderer and the MCP server print the same text.
//!
//! - [`collections`]: collection wrappers ([`Tasks`])
//! - [`results`]: operation outcomes (create, update, delete, split, clear,
//!   execute, verify)
//! - [`status`]: one-line success/failure messages
//! - [`datetime`]: timestamp formatting
//! - [`models`]: Display implementations for domain models
//!
//! ```rust
//! use jiff::Timestamp;
//! use waypoint_core::{
//!     display::{OperationStatus, UpdateResult},
//!     models::Task,
//! };
//!
//! let task = Task::new("Add login form", "Render the form", Timestamp::now());
//! let changes = vec!["Updated notes".to_string()];
//! let output = format!("{}", UpdateResult::with_changes(task, changes));
//! assert!(output.contains("Changes made:"));
//!
//! let refused = OperationStatus::failure("Task has dependents".to_string());
//! assert!(format!("{refused}").starts_with("Error:"));
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::Tasks;
pub use datetime::LocalDateTime;
pub use results::{
    ClearResult, ComplexityReport, CreateResult, DeleteResult, ExecuteOutcome, ExecutionBrief,
    SplitResult, UpdateResult, VerifyOutcome,
};
pub use status::OperationStatus;
