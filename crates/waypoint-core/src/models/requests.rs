//! Request types for updating models.

use jiff::Timestamp;

use super::{RelatedFile, Task, TaskDependency, TaskStatus};

/// Partial update of a task; `None` leaves a field untouched.
#[derive(Debug, Default, Clone)]
pub struct UpdateTaskRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub status: Option<TaskStatus>,
    pub dependencies: Option<Vec<String>>,
    pub related_files: Option<Vec<RelatedFile>>,
    pub implementation_guide: Option<String>,
    pub verification_criteria: Option<String>,
    pub summary: Option<String>,
    pub completed_at: Option<Timestamp>,
}

/// Fields that stay writable after a task is completed.
const WRITABLE_WHEN_COMPLETED: [&str; 2] = ["summary", "relatedFiles"];

impl UpdateTaskRequest {
    /// Request that only changes the status, stamping `completedAt` when the
    /// new status is `Completed`.
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            completed_at: (status == TaskStatus::Completed).then(Timestamp::now),
            ..Default::default()
        }
    }

    /// Names (as persisted) of every field this request would write.
    pub fn touched_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name.is_some() {
            fields.push("name");
        }
        if self.description.is_some() {
            fields.push("description");
        }
        if self.notes.is_some() {
            fields.push("notes");
        }
        if self.status.is_some() {
            fields.push("status");
        }
        if self.dependencies.is_some() {
            fields.push("dependencies");
        }
        if self.related_files.is_some() {
            fields.push("relatedFiles");
        }
        if self.implementation_guide.is_some() {
            fields.push("implementationGuide");
        }
        if self.verification_criteria.is_some() {
            fields.push("verificationCriteria");
        }
        if self.summary.is_some() {
            fields.push("summary");
        }
        if self.completed_at.is_some() {
            fields.push("completedAt");
        }
        fields
    }

    /// Fields that may not be written once the task is completed.
    pub fn restricted_fields(&self) -> Vec<&'static str> {
        self.touched_fields()
            .into_iter()
            .filter(|field| !WRITABLE_WHEN_COMPLETED.contains(field))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.touched_fields().is_empty()
    }

    /// Write the requested fields into `task` and refresh `updatedAt`.
    ///
    /// Callers enforce the completed-task restriction before applying.
    pub fn apply(self, task: &mut Task, now: Timestamp) {
        if let Some(name) = self.name {
            task.name = name;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(notes) = self.notes {
            task.notes = Some(notes);
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(dependencies) = self.dependencies {
            task.dependencies = dependencies.into_iter().map(TaskDependency::new).collect();
        }
        if let Some(related_files) = self.related_files {
            task.related_files = related_files;
        }
        if let Some(guide) = self.implementation_guide {
            task.implementation_guide = Some(guide);
        }
        if let Some(criteria) = self.verification_criteria {
            task.verification_criteria = Some(criteria);
        }
        if let Some(summary) = self.summary {
            task.summary = Some(summary);
        }
        if let Some(completed_at) = self.completed_at {
            task.completed_at = Some(completed_at);
        }
        task.updated_at = now;
    }
}

impl TryFrom<crate::params::UpdateTask> for UpdateTaskRequest {
    type Error = crate::WaypointError;

    /// Convert UpdateTask parameters into a validated request.
    ///
    /// A new name follows the same rules as on creation. Related-file line
    /// ranges must be complete and ordered.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use waypoint_core::{models::UpdateTaskRequest, params::UpdateTask};
    ///
    /// let params = UpdateTask {
    ///     id: "0b3c4e5f-1a2b-4c3d-8e9f-0a1b2c3d4e5f".to_string(),
    ///     notes: Some("Watch the migration order".to_string()),
    ///     ..Default::default()
    /// };
    ///
    /// let request: UpdateTaskRequest = params.try_into()?;
    /// assert_eq!(request.touched_fields(), vec!["notes"]);
    /// # Ok::<(), waypoint_core::WaypointError>(())
    /// ```
    fn try_from(params: crate::params::UpdateTask) -> Result<Self, Self::Error> {
        if let Some(name) = &params.name {
            crate::params::TaskDefinition::new(name.clone(), "").validate()?;
        }
        if let Some(files) = &params.related_files {
            for file in files {
                file.validate()?;
            }
        }

        Ok(Self {
            name: params.name,
            description: params.description,
            notes: params.notes,
            dependencies: params.dependencies,
            related_files: params.related_files,
            implementation_guide: params.implementation_guide,
            verification_criteria: params.verification_criteria,
            ..Default::default()
        })
    }
}
