//! Parameter structures for Waypoint operations
//!
//! Shared parameter structures used by every front end (CLI, MCP). They carry
//! only serde derives, plus JSON schema derives behind the `schema` feature,
//! so the core stays independent of any interface framework.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │   MCP Params    │    │  Core Params    │
//! │  (clap derives) │───▶│ (serde derives) │───▶│ (minimal deps)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! Interface layers wrap these structures (`#[serde(transparent)]` on the MCP
//! side, `From<Args>` conversions on the CLI side) and hand them to
//! [`crate::TaskManager`]. Field names serialize in camelCase so MCP clients
//! see `updateMode`, `globalAnalysisResult`, `pageSize` and so on.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    engine::MergePolicy,
    models::{RelatedFile, TaskStatus},
    WaypointError,
};

/// Generic parameters for operations requiring just a task ID.
///
/// Used for get_task_detail, execute_task, delete_task and assess_complexity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Id {
    /// The UUID of the task to operate on
    pub id: String,
}

/// Longest accepted task name, in characters.
pub const MAX_NAME_LENGTH: usize = 100;

/// Definition of a single task, as submitted to `split_tasks` or `create_task`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct TaskDefinition {
    /// Short task name, unique within one batch
    pub name: String,
    /// Detailed description including implementation points
    pub description: String,
    /// Supplementary notes or special handling requirements
    #[serde(default)]
    pub notes: Option<String>,
    /// Prerequisites, each given as a task UUID or a task name
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Files touched or consulted by the task
    #[serde(default)]
    pub related_files: Option<Vec<RelatedFile>>,
    /// Concrete implementation guide
    #[serde(default)]
    pub implementation_guide: Option<String>,
    /// Verification criteria and acceptance checks
    #[serde(default)]
    pub verification_criteria: Option<String>,
}

impl TaskDefinition {
    /// Minimal definition with a name and a description.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    /// Rejects empty names and malformed related-file ranges.
    pub fn validate(&self) -> crate::Result<()> {
        if self.name.trim().is_empty() {
            return Err(WaypointError::invalid_input("name").with_reason("Task name must not be empty"));
        }
        if self.name.chars().count() > MAX_NAME_LENGTH {
            return Err(WaypointError::invalid_input("name").with_reason(format!(
                "Task name '{}' is longer than {MAX_NAME_LENGTH} characters",
                self.name
            )));
        }
        for file in self.related_files.iter().flatten() {
            file.validate()?;
        }
        Ok(())
    }
}

/// Parameters for submitting a batch of task definitions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct SplitTasks {
    /// How the batch is reconciled with the existing tasks
    pub update_mode: MergePolicy,
    /// The task definitions, in order
    pub tasks: Vec<TaskDefinition>,
    /// Overall goal of the batch, stamped on every created or updated task
    #[serde(default)]
    pub global_analysis_result: Option<String>,
}

/// Parameters for listing tasks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ListTasks {
    /// Only list tasks in this status; omit to list all
    #[serde(default)]
    pub status: Option<TaskStatus>,
}

/// Parameters for updating the content of a task.
///
/// Omitted fields are left untouched. Completed tasks refuse content updates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    /// UUID of the task to update
    pub id: String,
    /// New task name
    #[serde(default)]
    pub name: Option<String>,
    /// New description
    #[serde(default)]
    pub description: Option<String>,
    /// New notes
    #[serde(default)]
    pub notes: Option<String>,
    /// New dependency list (task UUIDs)
    #[serde(default)]
    pub dependencies: Option<Vec<String>>,
    /// New related-file list
    #[serde(default)]
    pub related_files: Option<Vec<RelatedFile>>,
    /// New implementation guide
    #[serde(default)]
    pub implementation_guide: Option<String>,
    /// New verification criteria
    #[serde(default)]
    pub verification_criteria: Option<String>,
}

/// Parameters for setting the status of a task directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct SetTaskStatus {
    /// UUID of the task
    pub id: String,
    /// New status
    pub status: TaskStatus,
}

/// Parameters for verifying a task in progress.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct VerifyTask {
    /// UUID of the task to verify
    pub id: String,
    /// Score from 0 to 100; 80 or more completes the task
    pub score: u8,
    /// Completion summary when passing, or what needs fixing otherwise
    pub summary: String,
}

impl VerifyTask {
    /// Minimum score that completes a task.
    pub const PASSING_SCORE: u8 = 80;

    /// Validate the score range and the presence of a summary.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use waypoint_core::params::VerifyTask;
    ///
    /// let params = VerifyTask {
    ///     id: "some-id".to_string(),
    ///     score: 85,
    ///     summary: "All endpoints respond".to_string(),
    /// };
    /// assert!(params.validate().is_ok());
    ///
    /// let params = VerifyTask {
    ///     score: 101,
    ///     ..params
    /// };
    /// assert!(params.validate().is_err());
    /// ```
    pub fn validate(&self) -> crate::Result<()> {
        if self.score > 100 {
            return Err(WaypointError::invalid_input("score")
                .with_reason(format!("Score must be between 0 and 100, got {}", self.score)));
        }
        if self.summary.trim().is_empty() {
            return Err(WaypointError::invalid_input("summary")
                .with_reason("A summary or list of issues to fix is required"));
        }
        Ok(())
    }

    pub fn passed(&self) -> bool {
        self.score >= Self::PASSING_SCORE
    }
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    5
}

/// Parameters for searching tasks across the active store and archives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct QueryTasks {
    /// Keywords separated by whitespace, or a task UUID when `isId` is set
    pub query: String,
    /// Treat the query as an exact task UUID
    #[serde(default)]
    pub is_id: bool,
    /// Page number, starting at 1
    #[serde(default = "default_page")]
    pub page: usize,
    /// Results per page, 1 to 20
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for QueryTasks {
    fn default() -> Self {
        Self {
            query: String::new(),
            is_id: false,
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl QueryTasks {
    /// Largest accepted page size.
    pub const MAX_PAGE_SIZE: usize = 20;

    pub fn validate(&self) -> crate::Result<()> {
        if !(1..=Self::MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(WaypointError::invalid_input("pageSize").with_reason(format!(
                "Page size must be between 1 and {}, got {}",
                Self::MAX_PAGE_SIZE,
                self.page_size
            )));
        }
        Ok(())
    }
}

/// Parameters for clearing every task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ClearAllTasks {
    /// Must be true; guards against accidental wipes
    #[serde(default)]
    pub confirm: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_tasks_deserializes_camel_case() {
        let json = r#"{
            "updateMode": "selective",
            "tasks": [
                { "name": "A", "description": "first", "dependencies": ["B"] },
                { "name": "B", "description": "second", "implementationGuide": "do it" }
            ],
            "globalAnalysisResult": "ship it"
        }"#;

        let params: SplitTasks = serde_json::from_str(json).unwrap();
        assert_eq!(params.update_mode, MergePolicy::Selective);
        assert_eq!(params.tasks.len(), 2);
        assert_eq!(params.tasks[0].dependencies, vec!["B".to_string()]);
        assert_eq!(params.tasks[1].implementation_guide.as_deref(), Some("do it"));
        assert_eq!(params.global_analysis_result.as_deref(), Some("ship it"));
    }

    #[test]
    fn test_split_tasks_accepts_clear_all_tasks_mode() {
        let json = r#"{ "updateMode": "clearAllTasks", "tasks": [] }"#;
        let params: SplitTasks = serde_json::from_str(json).unwrap();
        assert_eq!(params.update_mode, MergePolicy::ClearAllTasks);
    }

    #[test]
    fn test_task_definition_rejects_blank_name() {
        let definition = TaskDefinition::new("   ", "nothing");
        assert!(matches!(
            definition.validate(),
            Err(WaypointError::InvalidInput { ref field, .. }) if field == "name"
        ));
    }

    #[test]
    fn test_query_defaults() {
        let params: QueryTasks = serde_json::from_str(r#"{ "query": "login" }"#).unwrap();
        assert_eq!(params.page, 1);
        assert_eq!(params.page_size, 5);
        assert!(!params.is_id);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_query_rejects_oversized_page() {
        let params = QueryTasks {
            query: "x".to_string(),
            page_size: 21,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_verify_requires_summary() {
        let params = VerifyTask {
            id: "x".to_string(),
            score: 90,
            summary: " ".to_string(),
        };
        match params.validate().unwrap_err() {
            WaypointError::InvalidInput { field, .. } => assert_eq!(field, "summary"),
            other => panic!("Expected InvalidInput error, got {other:?}"),
        }
    }

    #[test]
    fn test_verify_passing_threshold() {
        let mut params = VerifyTask {
            id: "x".to_string(),
            score: 79,
            summary: "close".to_string(),
        };
        assert!(!params.passed());
        params.score = 80;
        assert!(params.passed());
    }
}
