//! Filter types for querying tasks.

use super::{Task, TaskStatus};

/// Filter options for listing tasks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    /// Only tasks in this status; `None` lists everything
    pub status: Option<TaskStatus>,
}

impl TaskFilter {
    /// Filter matching a single status.
    pub fn with_status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.status.map_or(true, |status| task.status == status)
    }
}

impl From<&crate::params::ListTasks> for TaskFilter {
    /// Convert ListTasks parameters to a TaskFilter.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use waypoint_core::{
    ///     models::{TaskFilter, TaskStatus},
    ///     params::ListTasks,
    /// };
    ///
    /// let params = ListTasks { status: None };
    /// let filter: TaskFilter = (&params).into();
    /// assert_eq!(filter.status, None);
    ///
    /// let params = ListTasks {
    ///     status: Some(TaskStatus::Completed),
    /// };
    /// let filter: TaskFilter = (&params).into();
    /// assert_eq!(filter.status, Some(TaskStatus::Completed));
    /// ```
    fn from(params: &crate::params::ListTasks) -> Self {
        Self {
            status: params.status,
        }
    }
}
