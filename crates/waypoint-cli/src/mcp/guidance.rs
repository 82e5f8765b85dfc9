//! Guidance tools for the MCP server
//!
//! These tools change no task. Each one turns its arguments into a block of
//! instructions for the agent: how to plan, analyze, reflect, research, keep
//! project rules, or structure a chain of thoughts. Every text goes through
//! [`load_prompt`] under the tool's name, so `MCP_PROMPT_PLAN_TASK` replaces
//! the planning text and `MCP_PROMPT_PLAN_TASK_APPEND` extends it.

use std::{env, fmt::Write, path::Path};

use schemars::JsonSchema;
use serde::Deserialize;
use waypoint_core::Task;

use super::prompts::load_prompt;

/// File the project rules are kept in, relative to the project root.
pub const RULES_FILE: &str = "waypoint-rules.md";

const MAX_COMPLETED_SHOWN: usize = 10;

/// Parameters for `plan_task`.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanTask {
    /// Complete description of the problem: objectives, background and expected results (at least 10 characters)
    pub description: String,
    /// Technical requirements, business constraints or quality standards
    #[serde(default)]
    pub requirements: Option<String>,
    /// Include the existing tasks so the plan continues or adjusts them
    #[serde(default)]
    pub existing_tasks_reference: bool,
}

/// Parameters for `analyze_task`.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeTask {
    /// Task summary covering objectives, scope and key technical challenges (at least 10 characters)
    pub summary: String,
    /// Preliminary solution: approach, architecture and strategy, in pseudocode where code is needed (at least 50 characters)
    pub initial_concept: String,
    /// Result of the previous analysis round, when analyzing again
    #[serde(default)]
    pub previous_analysis: Option<String>,
}

/// Parameters for `reflect_task`.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReflectTask {
    /// Task summary, consistent with the analysis phase (at least 10 characters)
    pub summary: String,
    /// Complete technical analysis with dependencies and implementation steps (at least 100 characters)
    pub analysis: String,
}

/// Parameters for `research_mode`.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResearchMode {
    /// Programming topic to research (at least 5 characters)
    pub topic: String,
    /// Summary of the research so far; empty on the first call
    #[serde(default)]
    pub previous_state: String,
    /// What the agent is doing right now, such as searching or reading code
    pub current_state: String,
    /// Planned next steps, kept up to date to stay on topic
    pub next_steps: String,
}

/// Parameters for `process_thought`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ProcessThought {
    /// Content of this thought
    pub thought: String,
    /// Position of this thought, starting at 1
    pub thought_number: u32,
    /// Expected number of thoughts; may grow as thinking goes on
    pub total_thoughts: u32,
    /// Whether another thought is needed
    pub next_thought_needed: bool,
    /// Stage, e.g. Problem Definition, Information Gathering, Research, Analysis, Synthesis, Conclusion, Critical Questioning or Planning
    pub stage: String,
    /// Free-form tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Axioms this thought relies on
    #[serde(default)]
    pub axioms_used: Vec<String>,
    /// Assumptions this thought challenges
    #[serde(default)]
    pub assumptions_challenged: Vec<String>,
}

/// Rejects `value` when it is shorter than `min` characters.
fn require_length(field: &str, value: &str, min: usize) -> Result<(), String> {
    if value.trim().chars().count() < min {
        return Err(format!("'{field}' must be at least {min} characters long"));
    }
    Ok(())
}

/// `text` cut to `max` characters, with an ellipsis when shortened.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max).collect();
    cut.push_str("...");
    cut
}

/// Whether planning should route through `process_thought`. Set
/// `ENABLE_THOUGHT_CHAIN=false` to plan directly.
fn thought_chain_enabled() -> bool {
    env::var("ENABLE_THOUGHT_CHAIN").map_or(true, |value| value != "false")
}

fn existing_tasks_section(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return String::new();
    }
    let (completed, unfinished): (Vec<&Task>, Vec<&Task>) =
        tasks.iter().partition(|task| task.is_completed());

    let mut out = String::from("## Existing Tasks\n\n### Completed\n\n");
    if completed.is_empty() {
        out.push_str("No completed tasks.\n");
    }
    for (index, task) in completed.iter().take(MAX_COMPLETED_SHOWN).enumerate() {
        let _ = writeln!(out, "{}. **{}** (ID: `{}`)", index + 1, task.name, task.id);
        let _ = writeln!(out, "   - Description: {}", truncate(&task.description, 100));
        if let Some(done) = task.completed_at {
            let _ = writeln!(out, "   - Completed at: {done}");
        }
    }
    if completed.len() > MAX_COMPLETED_SHOWN {
        let _ = writeln!(
            out,
            "\n*(showing {MAX_COMPLETED_SHOWN} of {} completed tasks)*",
            completed.len()
        );
    }

    out.push_str("\n### Unfinished\n\n");
    if unfinished.is_empty() {
        out.push_str("No unfinished tasks.\n");
    }
    for (index, task) in unfinished.iter().enumerate() {
        let _ = writeln!(out, "{}. **{}** (ID: `{}`)", index + 1, task.name, task.id);
        let _ = writeln!(out, "   - Description: {}", truncate(&task.description, 150));
        let _ = writeln!(out, "   - Status: {}", task.status);
        if !task.dependencies.is_empty() {
            let ids: Vec<String> = task
                .dependencies
                .iter()
                .map(|dep| format!("`{}`", dep.task_id))
                .collect();
            let _ = writeln!(out, "   - Dependencies: {}", ids.join(", "));
        }
    }
    out.push_str(
        "\nCompleted tasks stay as they are. Adjust unfinished tasks with `split_tasks` in \
         `selective` mode, or replace them in `overwrite` mode.\n\n",
    );
    out
}

/// Planning guidance. `tasks` is the current task list when the caller asked
/// for it to be referenced.
pub fn plan_task(params: &PlanTask, tasks: &[Task], memory_dir: &Path) -> Result<String, String> {
    require_length("description", &params.description, 10)?;

    let requirements = params
        .requirements
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or("No requirements");
    let next = if thought_chain_enabled() {
        "Think the problem through with `process_thought`, one thought per call, before \
         committing to a plan. When the thinking is complete, call `analyze_task`."
    } else {
        "When the problem is understood, call `analyze_task` with a summary and an initial \
         concept."
    };

    let text = format!(
        r#"# Task Planning

## Description
{description}

## Requirements
{requirements}

{existing}## Before Planning
1. Read `{RULES_FILE}` if it exists and follow the project's conventions.
2. Look at the code the task touches: files, modules and the patterns already in use.
3. Search earlier work with `query_task`. Archived snapshots live in `{memory}`.
4. Do not guess. State what is unknown and find out.

## Next Step
{next}"#,
        description = params.description,
        existing = existing_tasks_section(tasks),
        memory = memory_dir.display(),
    );
    Ok(load_prompt(&text, "plan_task"))
}

/// Analysis guidance for an initial concept.
pub fn analyze_task(params: &AnalyzeTask) -> Result<String, String> {
    require_length("summary", &params.summary, 10)?;
    require_length("initialConcept", &params.initial_concept, 50)?;

    let previous = params
        .previous_analysis
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .map(|value| format!("## Previous Analysis\n{value}\n\n"))
        .unwrap_or_default();

    let text = format!(
        r#"# Task Analysis

## Summary
{summary}

## Initial Concept
{concept}

{previous}## Check the Concept
1. **Technical feasibility**: does the approach fit the existing architecture and libraries?
2. **Reuse**: which existing code, types or utilities can be used instead of writing new ones?
3. **Risks**: edge cases, performance limits, compatibility and security concerns.
4. **Interfaces**: which modules, signatures and data formats change?

Use pseudocode for key logic; do not write complete code yet.

## Next Step
Call `reflect_task` with the summary and the full analysis."#,
        summary = params.summary,
        concept = params.initial_concept,
    );
    Ok(load_prompt(&text, "analyze_task"))
}

/// Review guidance for a completed analysis.
pub fn reflect_task(params: &ReflectTask) -> Result<String, String> {
    require_length("summary", &params.summary, 10)?;
    require_length("analysis", &params.analysis, 100)?;

    let text = format!(
        r#"# Reflection

## Summary
{summary}

## Analysis
{analysis}

## Review
1. **Requirements**: does the analysis cover every requirement and constraint?
2. **Simplicity**: is there a smaller design with the same result?
3. **Consistency**: does it follow the project's conventions and `{RULES_FILE}`?
4. **Failure modes**: what breaks, and how is it detected and handled?
5. **Verification**: how will each part be checked?

## Next Step
If the analysis needs work, call `analyze_task` again with `previousAnalysis`.
Otherwise split the work with `split_tasks`: small tasks that can each be
verified on their own, with dependencies only where one task needs another's
output, and an implementation guide and verification criteria on each."#,
        summary = params.summary,
        analysis = params.analysis,
    );
    Ok(load_prompt(&text, "reflect_task"))
}

/// Research guidance carrying the research state between calls.
pub fn research_mode(params: &ResearchMode, memory_dir: &Path) -> Result<String, String> {
    require_length("topic", &params.topic, 5)?;

    let previous = if params.previous_state.trim().is_empty() {
        "This is the first research call."
    } else {
        params.previous_state.as_str()
    };

    let text = format!(
        r#"# Research Mode

## Topic
{topic}

## Research So Far
{previous}

## Current Work
{current}

## Next Steps
{next}

## How to Research
1. Search the web and the codebase for the topic; prefer primary sources and the code itself.
2. Check earlier work with `query_task`. Archived snapshots live in `{memory}`.
3. Stay on the topic. If the direction must change, say so in `nextSteps`.
4. After each step call `research_mode` again: merge what was learned into
   `previousState` and update `currentState` and `nextSteps`.
5. When the research is complete, plan the work with `plan_task`."#,
        topic = params.topic,
        current = params.current_state,
        next = params.next_steps,
        memory = memory_dir.display(),
    );
    Ok(load_prompt(&text, "research_mode"))
}

/// Guidance for creating or updating the project rules file.
pub fn init_project_rules() -> String {
    let text = format!(
        r#"# Project Rules

Create or update `{RULES_FILE}` at the project root. The file is read by agents
before they plan, so it holds project-specific rules, not general advice.

## What to Record
1. **Structure**: main directories and modules, and which code belongs where.
2. **Conventions**: naming, error handling, logging and test layout as the code actually does them.
3. **Coupled files**: files that must change together, e.g. "when adding a CLI flag, also update the README".
4. **Workflow**: how to build, run and test; what must pass before a change is done.
5. **Prohibitions**: things agents must not do in this project.

## How to Write It
- Use imperative statements an agent can follow directly.
- Give concrete examples from the code, with file paths.
- Leave out anything an agent would do correctly without being told.
- When updating, keep rules that still hold and remove ones that no longer match the code."#
    );
    load_prompt(&text, "init_project_rules")
}

/// Formats one thought of a thought chain.
pub fn process_thought(params: &ProcessThought) -> Result<String, String> {
    require_length("thought", &params.thought, 1)?;
    require_length("stage", &params.stage, 1)?;
    if params.thought_number == 0 || params.total_thoughts == 0 {
        return Err("'thought_number' and 'total_thoughts' must be positive".to_string());
    }
    let total = params.total_thoughts.max(params.thought_number);

    let mut text = format!(
        "## Thought {}/{total} - {}\n\n{}\n",
        params.thought_number, params.stage, params.thought
    );
    for (label, items) in [
        ("Tags", &params.tags),
        ("Axioms used", &params.axioms_used),
        ("Assumptions challenged", &params.assumptions_challenged),
    ] {
        if !items.is_empty() {
            let _ = write!(text, "\n**{label}:** {}\n", items.join(", "));
        }
    }

    text.push('\n');
    if params.next_thought_needed {
        text.push_str(
            "Continue with the next thought through `process_thought`. Question your \
             assumptions and revise earlier thoughts if they turn out wrong.",
        );
    } else {
        text.push_str(
            "The thought chain is complete. Continue with `analyze_task`, or with \
             `split_tasks` if the analysis is already done.",
        );
    }
    Ok(load_prompt(&text, "process_thought"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn thought(number: u32, total: u32, next: bool) -> ProcessThought {
        ProcessThought {
            thought: "The merge must run before the write".to_string(),
            thought_number: number,
            total_thoughts: total,
            next_thought_needed: next,
            stage: "Analysis".to_string(),
            tags: vec!["storage".to_string()],
            axioms_used: Vec::new(),
            assumptions_challenged: Vec::new(),
        }
    }

    #[test]
    fn test_plan_task_lists_existing_tasks() {
        let done: Task = serde_json::from_value(json!({
            "id": "0b5cbb0e-4a4c-4b8e-9b8e-1d2f3a4b5c6d",
            "name": "Add schema",
            "description": "Create the tables",
            "status": "completed",
            "completedAt": "2025-01-01T10:00:00Z"
        }))
        .unwrap();
        let open: Task = serde_json::from_value(json!({
            "id": "7f1e2d3c-5b6a-4c7d-8e9f-0a1b2c3d4e5f",
            "name": "Build API",
            "description": "x".repeat(200),
            "dependencies": [{"taskId": "0b5cbb0e-4a4c-4b8e-9b8e-1d2f3a4b5c6d"}]
        }))
        .unwrap();

        let params = PlanTask {
            description: "Add a login flow to the web app".to_string(),
            requirements: None,
            existing_tasks_reference: true,
        };
        let text = plan_task(&params, &[done, open], Path::new("/data/memory")).unwrap();

        assert!(text.contains("No requirements"));
        assert!(text.contains("**Add schema**"));
        assert!(text.contains("**Build API**"));
        assert!(text.contains(&format!("{}...", "x".repeat(150))));
        assert!(text.contains("   - Completed at: 2025-01-01T10:00:00Z"));
        assert!(text.contains("   - Dependencies: `0b5cbb0e-4a4c-4b8e-9b8e-1d2f3a4b5c6d`"));
        assert!(text.contains("/data/memory"));
    }

    #[test]
    fn test_plan_task_without_reference_has_no_task_section() {
        let params = PlanTask {
            description: "Add a login flow to the web app".to_string(),
            requirements: Some("No new dependencies".to_string()),
            existing_tasks_reference: false,
        };
        let text = plan_task(&params, &[], Path::new("memory")).unwrap();
        assert!(!text.contains("## Existing Tasks"));
        assert!(text.contains("No new dependencies"));
    }

    #[test]
    fn test_minimum_lengths() {
        let short = PlanTask {
            description: "short".to_string(),
            requirements: None,
            existing_tasks_reference: false,
        };
        assert!(plan_task(&short, &[], Path::new("memory")).is_err());

        let analysis = AnalyzeTask {
            summary: "Add login flow".to_string(),
            initial_concept: "Too short".to_string(),
            previous_analysis: None,
        };
        assert!(analyze_task(&analysis).is_err());

        let reflection = ReflectTask {
            summary: "Add login flow".to_string(),
            analysis: "a".repeat(99),
        };
        assert!(reflect_task(&reflection).is_err());
    }

    #[test]
    fn test_analyze_task_includes_previous_round() {
        let params = AnalyzeTask {
            summary: "Add login flow".to_string(),
            initial_concept: "Session cookie issued by a new handler, checked by a middleware layer".to_string(),
            previous_analysis: Some("Round one: tokens".to_string()),
        };
        let text = analyze_task(&params).unwrap();
        assert!(text.contains("## Previous Analysis\nRound one: tokens"));
        assert!(text.contains("`reflect_task`"));
    }

    #[test]
    fn test_research_mode_first_call() {
        let params = ResearchMode {
            topic: "tokio cancellation".to_string(),
            previous_state: String::new(),
            current_state: "Reading the select! docs".to_string(),
            next_steps: "Check drop behavior".to_string(),
        };
        let text = research_mode(&params, Path::new("memory")).unwrap();
        assert!(text.contains("This is the first research call."));
        assert!(text.contains("Check drop behavior"));
    }

    #[test]
    fn test_process_thought_extends_total() {
        let text = process_thought(&thought(4, 3, true)).unwrap();
        assert!(text.starts_with("## Thought 4/4 - Analysis"));
        assert!(text.contains("**Tags:** storage"));
        assert!(!text.contains("Axioms used"));
        assert!(text.contains("next thought"));

        let last = process_thought(&thought(2, 2, false)).unwrap();
        assert!(last.contains("The thought chain is complete."));
        assert!(process_thought(&thought(0, 2, false)).is_err());
    }

    #[test]
    fn test_init_project_rules_names_file() {
        assert!(init_project_rules().contains(RULES_FILE));
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("ééé", 2), "éé...");
        assert_eq!(truncate("abc", 3), "abc");
    }
}
