//! Complexity assessment types.

use serde::{Deserialize, Serialize};

/// Complexity bucket for a single metric or for a task overall.
///
/// Variants are ordered by severity so the overall level is simply the
/// maximum across metrics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl ComplexityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplexityLevel::Low => "Low complexity",
            ComplexityLevel::Medium => "Medium complexity",
            ComplexityLevel::High => "High complexity",
            ComplexityLevel::VeryHigh => "Extremely complex",
        }
    }
}

/// Raw measurements taken from a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityMetrics {
    /// Description length in characters
    pub description_length: usize,
    /// Number of dependency links
    pub dependencies_count: usize,
    /// Notes length in characters (0 without notes)
    pub notes_length: usize,
    /// Whether the task carries notes at all
    pub has_notes: bool,
}

/// Result of assessing one task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityAssessment {
    pub level: ComplexityLevel,
    pub metrics: ComplexityMetrics,
    pub recommendations: Vec<String>,
}
