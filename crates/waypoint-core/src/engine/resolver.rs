//! Dependency reference resolution.

use std::{
    collections::{HashMap, HashSet},
    sync::LazyLock,
};

use regex::Regex;

use crate::models::{Task, TaskDependency};

static TASK_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("task id pattern is a valid regex")
});

/// Whether `reference` has the textual shape of a task UUID.
///
/// # Examples
///
/// ```rust
/// use waypoint_core::engine::is_task_id;
///
/// assert!(is_task_id("0B3C4E5F-1A2B-4C3D-8E9F-0A1B2C3D4E5F"));
/// assert!(!is_task_id("Add schema"));
/// ```
pub fn is_task_id(reference: &str) -> bool {
    TASK_ID_PATTERN.is_match(reference)
}

/// Maps dependency references onto task ids.
///
/// A reference shaped like a UUID must name a known id; anything else is
/// looked up as a task name. References that match neither are dropped.
#[derive(Debug, Clone, Default)]
pub struct DependencyResolver {
    name_to_id: HashMap<String, String>,
    known_ids: HashSet<String>,
}

impl DependencyResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver over an existing collection, every task both named and known.
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut resolver = Self::new();
        for task in tasks {
            resolver.register(task);
        }
        resolver
    }

    /// Maps `name` to `id`; a later mapping for the same name wins.
    pub fn insert_name(&mut self, name: impl Into<String>, id: impl Into<String>) {
        self.name_to_id.insert(name.into(), id.into());
    }

    /// Marks `id` as a valid target for UUID references.
    pub fn insert_known(&mut self, id: impl Into<String>) {
        self.known_ids.insert(id.into());
    }

    /// Names the task and marks its id as known.
    pub fn register(&mut self, task: &Task) {
        self.insert_name(&task.name, &task.id);
        self.insert_known(&task.id);
    }

    /// Id currently mapped to `name`.
    pub fn resolve_name(&self, name: &str) -> Option<&str> {
        self.name_to_id.get(name).map(String::as_str)
    }

    /// Resolves one reference, or `None` when it cannot be resolved.
    pub fn resolve(&self, reference: &str) -> Option<TaskDependency> {
        if is_task_id(reference) {
            self.known_ids
                .contains(reference)
                .then(|| TaskDependency::new(reference))
        } else {
            self.name_to_id.get(reference).map(TaskDependency::new)
        }
    }

    /// Resolves every reference in order, dropping the unresolved ones.
    /// Duplicates are kept.
    pub fn resolve_all<S: AsRef<str>>(&self, references: &[S]) -> Vec<TaskDependency> {
        references
            .iter()
            .filter_map(|reference| self.resolve(reference.as_ref()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNOWN: &str = "0b3c4e5f-1a2b-4c3d-8e9f-0a1b2c3d4e5f";
    const UNKNOWN: &str = "ffffffff-1a2b-4c3d-8e9f-0a1b2c3d4e5f";

    fn resolver() -> DependencyResolver {
        let mut resolver = DependencyResolver::new();
        resolver.insert_name("Schema", KNOWN);
        resolver.insert_known(KNOWN);
        resolver
    }

    #[test]
    fn test_uuid_reference_must_be_known() {
        let resolver = resolver();
        assert_eq!(resolver.resolve(KNOWN), Some(TaskDependency::new(KNOWN)));
        assert_eq!(resolver.resolve(UNKNOWN), None);
    }

    #[test]
    fn test_name_reference_uses_map() {
        let resolver = resolver();
        assert_eq!(resolver.resolve("Schema"), Some(TaskDependency::new(KNOWN)));
        assert_eq!(resolver.resolve("schema"), None);
        assert_eq!(resolver.resolve("Nope"), None);
    }

    #[test]
    fn test_later_name_mapping_wins() {
        let mut resolver = resolver();
        resolver.insert_name("Schema", UNKNOWN);
        assert_eq!(resolver.resolve("Schema"), Some(TaskDependency::new(UNKNOWN)));
    }

    #[test]
    fn test_resolve_all_drops_unresolved_and_keeps_duplicates() {
        let resolver = resolver();
        let deps = resolver.resolve_all(&["Schema", "Missing", KNOWN]);
        assert_eq!(
            deps,
            vec![TaskDependency::new(KNOWN), TaskDependency::new(KNOWN)]
        );
    }

    #[test]
    fn test_uuid_shape_is_case_insensitive() {
        assert!(is_task_id(&KNOWN.to_uppercase()));
        assert!(!is_task_id("0b3c4e5f1a2b4c3d8e9f0a1b2c3d4e5f"));
        assert!(!is_task_id(&format!("{KNOWN}0")));
    }
}
