//! Task model definition and related functionality.

use jiff::Timestamp;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::TaskStatus;

/// Represents a single tracked task.
///
/// Field names serialize in camelCase so the persisted document reads
/// `createdAt`, `relatedFiles`, `implementationGuide` and so on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier for the task (UUID v4)
    pub id: String,

    /// Short label, unique within one batch
    pub name: String,

    /// Detailed description including implementation points
    #[serde(default)]
    pub description: String,

    /// Supplementary notes or special handling requirements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Current status of the task
    #[serde(default)]
    pub status: TaskStatus,

    /// Tasks that must be completed before this one
    #[serde(default)]
    pub dependencies: Vec<TaskDependency>,

    /// Timestamp when the task was created (UTC)
    #[serde(default = "Timestamp::now", deserialize_with = "lenient::timestamp")]
    pub created_at: Timestamp,

    /// Timestamp when the task was last modified (UTC)
    #[serde(default = "Timestamp::now", deserialize_with = "lenient::timestamp")]
    pub updated_at: Timestamp,

    /// Timestamp when the task was completed (UTC)
    #[serde(
        default,
        deserialize_with = "lenient::optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_at: Option<Timestamp>,

    /// Completion summary, recorded when the task is verified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Files touched or consulted by the task
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_files: Vec<RelatedFile>,

    /// Shared analysis result stamped by the batch that produced the task
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_result: Option<String>,

    /// Concrete implementation guide for the task
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation_guide: Option<String>,

    /// Verification criteria and acceptance checks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_criteria: Option<String>,
}

impl Task {
    /// Creates a new pending task with a fresh UUID v4 identifier.
    pub fn new(name: impl Into<String>, description: impl Into<String>, now: Timestamp) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            description: description.into(),
            notes: None,
            status: TaskStatus::Pending,
            dependencies: Vec::new(),
            created_at: now,
            updated_at: now,
            completed_at: None,
            summary: None,
            related_files: Vec::new(),
            analysis_result: None,
            implementation_guide: None,
            verification_criteria: None,
        }
    }

    /// Whether the task has reached the completed status.
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Whether this task lists `task_id` among its dependencies.
    pub fn depends_on(&self, task_id: &str) -> bool {
        self.dependencies.iter().any(|dep| dep.task_id == task_id)
    }
}

/// A link to a prerequisite task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct TaskDependency {
    /// Identifier of the task that must complete first
    pub task_id: String,
}

impl TaskDependency {
    pub fn new(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
        }
    }
}

/// Relationship between a file and a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelatedFileType {
    /// File the task needs to modify
    ToModify,
    /// Reference material for the task
    Reference,
    /// File the task will create
    Create,
    /// Component or library the task depends on
    Dependency,
    /// Anything else
    Other,
}

impl RelatedFileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelatedFileType::ToModify => "TO_MODIFY",
            RelatedFileType::Reference => "REFERENCE",
            RelatedFileType::Create => "CREATE",
            RelatedFileType::Dependency => "DEPENDENCY",
            RelatedFileType::Other => "OTHER",
        }
    }
}

/// A file associated with a task, optionally narrowed to a line range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct RelatedFile {
    /// Path relative to the project root, or absolute
    pub path: String,
    /// How the file relates to the task
    #[serde(rename = "type")]
    pub file_type: RelatedFileType,
    /// What the file is for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// First line of the relevant block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_start: Option<u32>,
    /// Last line of the relevant block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_end: Option<u32>,
}

impl RelatedFile {
    /// Checks that a line range, if any, is complete and ordered.
    pub fn validate(&self) -> crate::Result<()> {
        match (self.line_start, self.line_end) {
            (None, None) => Ok(()),
            (Some(start), Some(end)) if start <= end => Ok(()),
            (Some(_), Some(_)) => Err(crate::WaypointError::invalid_input("relatedFiles")
                .with_reason(format!(
                    "'{}': lineStart must not be greater than lineEnd",
                    self.path
                ))),
            _ => Err(crate::WaypointError::invalid_input("relatedFiles").with_reason(
                format!(
                    "'{}': lineStart and lineEnd must be set together",
                    self.path
                ),
            )),
        }
    }
}

/// Timestamp parsing that never fails the whole document.
///
/// Missing or unparseable creation/update stamps become "now"; an unparseable
/// completion stamp is dropped.
mod lenient {
    use jiff::Timestamp;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub(super) fn timestamp<'de, D>(deserializer: D) -> Result<Timestamp, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(raw.as_ref().and_then(parse).unwrap_or_else(Timestamp::now))
    }

    pub(super) fn optional_timestamp<'de, D>(
        deserializer: D,
    ) -> Result<Option<Timestamp>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(raw.as_ref().and_then(parse))
    }

    fn parse(value: &Value) -> Option<Timestamp> {
        match value {
            Value::String(s) => s.parse::<Timestamp>().ok(),
            // Epoch milliseconds
            Value::Number(n) => n.as_i64().and_then(|ms| Timestamp::from_millisecond(ms).ok()),
            _ => None,
        }
    }
}
