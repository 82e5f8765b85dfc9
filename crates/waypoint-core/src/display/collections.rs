//! Collection wrapper types for displaying groups of tasks.

use std::{fmt, ops::Index};

use crate::models::{StatusSummary, Task, TaskStatus};

/// Newtype wrapper for displaying a list of tasks grouped by status.
///
/// # Examples
///
/// ```rust
/// use jiff::Timestamp;
/// use waypoint_core::{display::Tasks, models::Task};
///
/// let tasks = Tasks(vec![Task::new("Add schema", "Create tables", Timestamp::now())]);
/// let output = format!("{}", tasks);
/// assert!(output.contains("## ○ Pending (1)"));
/// assert!(output.contains("Add schema"));
/// ```
pub struct Tasks(pub Vec<Task>);

impl Tasks {
    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of tasks in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get a reference to the task at the given index.
    pub fn get(&self, index: usize) -> Option<&Task> {
        self.0.get(index)
    }

    /// Get an iterator over the tasks.
    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.0.iter()
    }

    /// Per-status counts.
    pub fn summary(&self) -> StatusSummary {
        self.0.iter().collect()
    }
}

impl Index<usize> for Tasks {
    type Output = Task;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IntoIterator for Tasks {
    type Item = Task;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Tasks {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Tasks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No tasks found.");
        }

        let summary = self.summary();
        for status in TaskStatus::ALL {
            let count = summary.count(status);
            if count == 0 {
                continue;
            }
            writeln!(f, "## {} ({count})", status.with_icon())?;
            writeln!(f)?;
            for task in self.0.iter().filter(|task| task.status == status) {
                task.fmt_compact(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;

    fn task(name: &str, status: TaskStatus) -> Task {
        let mut task = Task::new(name, format!("{name} description"), Timestamp::now());
        task.status = status;
        task
    }

    #[test]
    fn test_tasks_display_empty() {
        assert_eq!(format!("{}", Tasks(vec![])), "No tasks found.\n");
    }

    #[test]
    fn test_tasks_grouped_in_lifecycle_order() {
        let tasks = Tasks(vec![
            task("Done one", TaskStatus::Completed),
            task("Todo one", TaskStatus::Pending),
            task("Todo two", TaskStatus::Pending),
        ]);
        let output = format!("{}", tasks);

        let pending = output.find("## ○ Pending (2)").unwrap();
        let completed = output.find("## ✓ Completed (1)").unwrap();
        assert!(pending < completed);
        assert!(!output.contains("In Progress"));
        assert!(output.contains("### Todo two (○ Pending)"));
    }

    #[test]
    fn test_compact_entry_truncates_long_description() {
        let mut long = task("Long", TaskStatus::Pending);
        long.description = "x".repeat(300);
        let output = format!("{}", Tasks(vec![long]));
        assert!(output.contains(&format!("{}...", "x".repeat(120))));
        assert!(!output.contains(&"x".repeat(121)));
    }
}
