//! Display implementations for domain models.
//!
//! Models render as markdown. [`Task`] has a full form, used when a task is
//! shown on its own, and a compact form used inside lists.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::{
    engine::MergePolicy,
    models::{
        ComplexityAssessment, ComplexityLevel, RelatedFile, RelatedFileType, Task, TaskStatus,
    },
};

/// Longest description shown in compact listings, in characters.
const COMPACT_DESCRIPTION_CHARS: usize = 120;

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for ComplexityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for RelatedFileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for RelatedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` ({})", self.path, self.file_type)?;
        if let (Some(start), Some(end)) = (self.line_start, self.line_end) {
            write!(f, " lines {start}-{end}")?;
        }
        if let Some(desc) = &self.description {
            write!(f, ": {desc}")?;
        }
        Ok(())
    }
}

fn section(f: &mut fmt::Formatter<'_>, title: &str, body: Option<&str>) -> fmt::Result {
    if let Some(body) = body.filter(|body| !body.trim().is_empty()) {
        writeln!(f, "### {title}")?;
        writeln!(f)?;
        writeln!(f, "{body}")?;
        writeln!(f)?;
    }
    Ok(())
}

impl Task {
    /// One entry of a task list: header, id, and a shortened description.
    pub(crate) fn fmt_compact(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### {} ({})", self.name, self.status.with_icon())?;
        writeln!(f)?;
        writeln!(f, "- ID: `{}`", self.id)?;
        if !self.dependencies.is_empty() {
            writeln!(f, "- Dependencies: {}", self.dependencies.len())?;
        }
        if let Some(completed_at) = &self.completed_at {
            writeln!(f, "- Completed: {}", LocalDateTime(completed_at))?;
        }

        let mut description: String = self.description.chars().take(COMPACT_DESCRIPTION_CHARS).collect();
        if description.len() < self.description.len() {
            description.push_str("...");
        }
        if !description.is_empty() {
            writeln!(f)?;
            writeln!(f, "{description}")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} ({})", self.name, self.status.with_icon())?;
        writeln!(f)?;

        writeln!(f, "- ID: `{}`", self.id)?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;
        if let Some(completed_at) = &self.completed_at {
            writeln!(f, "- Completed: {}", LocalDateTime(completed_at))?;
        }
        if !self.dependencies.is_empty() {
            let ids: Vec<String> = self
                .dependencies
                .iter()
                .map(|dep| format!("`{}`", dep.task_id))
                .collect();
            writeln!(f, "- Dependencies: {}", ids.join(", "))?;
        }
        writeln!(f)?;

        if !self.description.is_empty() {
            writeln!(f, "{}", self.description)?;
            writeln!(f)?;
        }

        section(f, "Notes", self.notes.as_deref())?;
        section(f, "Implementation Guide", self.implementation_guide.as_deref())?;
        section(f, "Verification Criteria", self.verification_criteria.as_deref())?;
        section(f, "Analysis", self.analysis_result.as_deref())?;
        section(f, "Summary", self.summary.as_deref())?;

        if !self.related_files.is_empty() {
            writeln!(f, "### Related Files")?;
            writeln!(f)?;
            for file in &self.related_files {
                writeln!(f, "- {file}")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl fmt::Display for ComplexityAssessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### Complexity: {}", self.level)?;
        writeln!(f)?;
        writeln!(f, "- Description length: {} characters", self.metrics.description_length)?;
        writeln!(f, "- Dependencies: {}", self.metrics.dependencies_count)?;
        if self.metrics.has_notes {
            writeln!(f, "- Notes length: {} characters", self.metrics.notes_length)?;
        }
        if !self.recommendations.is_empty() {
            writeln!(f)?;
            writeln!(f, "Recommendations:")?;
            for item in &self.recommendations {
                writeln!(f, "- {item}")?;
            }
        }
        writeln!(f)
    }
}
