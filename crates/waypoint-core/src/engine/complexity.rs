//! Threshold-based complexity scoring.

use crate::models::{ComplexityAssessment, ComplexityLevel, ComplexityMetrics, Task};

/// Lower bounds, inclusive, for the medium, high and very-high buckets.
#[derive(Debug, Clone, Copy)]
struct Thresholds {
    medium: usize,
    high: usize,
    very_high: usize,
}

impl Thresholds {
    fn level(&self, value: usize) -> ComplexityLevel {
        if value >= self.very_high {
            ComplexityLevel::VeryHigh
        } else if value >= self.high {
            ComplexityLevel::High
        } else if value >= self.medium {
            ComplexityLevel::Medium
        } else {
            ComplexityLevel::Low
        }
    }
}

const DESCRIPTION_LENGTH: Thresholds = Thresholds {
    medium: 500,
    high: 1000,
    very_high: 2000,
};

const DEPENDENCIES_COUNT: Thresholds = Thresholds {
    medium: 2,
    high: 5,
    very_high: 10,
};

const NOTES_LENGTH: Thresholds = Thresholds {
    medium: 200,
    high: 500,
    very_high: 1000,
};

/// Text length in UTF-16 code units, the unit the thresholds are tuned for.
/// Characters outside the Basic Multilingual Plane, such as emoji, count twice.
fn text_length(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Scores a task. The overall level is the highest level reached by any
/// metric.
pub fn assess(task: &Task) -> ComplexityAssessment {
    let metrics = ComplexityMetrics {
        description_length: text_length(&task.description),
        dependencies_count: task.dependencies.len(),
        notes_length: task.notes.as_deref().map_or(0, text_length),
        has_notes: task.notes.as_deref().is_some_and(|notes| !notes.is_empty()),
    };

    let level = DESCRIPTION_LENGTH
        .level(metrics.description_length)
        .max(DEPENDENCIES_COUNT.level(metrics.dependencies_count))
        .max(NOTES_LENGTH.level(metrics.notes_length));

    ComplexityAssessment {
        level,
        metrics,
        recommendations: recommendations(level, &metrics),
    }
}

fn recommendations(level: ComplexityLevel, metrics: &ComplexityMetrics) -> Vec<String> {
    let mut items: Vec<&str> = Vec::new();
    match level {
        ComplexityLevel::Low => {
            items.push("The task is fairly simple and can be executed directly");
            items.push("Set clear completion criteria so acceptance has a firm basis");
        }
        ComplexityLevel::Medium => {
            items.push("The task has some complexity; plan the execution steps in detail");
            items.push("Work in phases and check progress regularly to confirm the implementation is complete");
            if metrics.dependencies_count > 0 {
                items.push("Check the completion status and output quality of every dependency");
            }
        }
        ComplexityLevel::High => {
            items.push("The task is complex; analyse and plan thoroughly before starting");
            items.push("Consider splitting the task into smaller subtasks that can run independently");
            items.push("Set milestones and checkpoints to track progress and quality");
            if metrics.dependencies_count > DEPENDENCIES_COUNT.medium {
                items.push("There are many dependencies; draw a dependency diagram to confirm the execution order");
            }
        }
        ComplexityLevel::VeryHigh => {
            items.push("⚠️ The task is extremely complex; split it into several independent tasks");
            items.push("Define the scope and interface of every subtask before execution");
            items.push("Assess risks, identify likely obstacles and prepare responses");
            items.push("Write concrete test and verification criteria for every subtask");
            if metrics.description_length >= DESCRIPTION_LENGTH.very_high {
                items.push("The description is very long; extract the key points into a structured checklist");
            }
            if metrics.dependencies_count >= DEPENDENCIES_COUNT.high {
                items.push("There are too many dependencies; re-evaluate the task boundaries");
            }
        }
    }
    items.into_iter().map(str::to_string).collect()
}
