//! Status counts over a task collection.

use serde::{Deserialize, Serialize};

use super::{Task, TaskStatus};

/// How many tasks sit in each status.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub blocked: usize,
}

impl StatusSummary {
    pub fn count(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Pending => self.pending,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Completed => self.completed,
            TaskStatus::Blocked => self.blocked,
        }
    }
}

impl<'a> FromIterator<&'a Task> for StatusSummary {
    fn from_iter<I: IntoIterator<Item = &'a Task>>(iter: I) -> Self {
        let mut summary = Self::default();
        for task in iter {
            summary.total += 1;
            match task.status {
                TaskStatus::Pending => summary.pending += 1,
                TaskStatus::InProgress => summary.in_progress += 1,
                TaskStatus::Completed => summary.completed += 1,
                TaskStatus::Blocked => summary.blocked += 1,
            }
        }
        summary
    }
}
