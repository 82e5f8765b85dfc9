//! Prompt templates for the MCP server
//!
//! Each template can be replaced with `MCP_PROMPT_<NAME>` or extended with
//! `MCP_PROMPT_<NAME>_APPEND`, where `<NAME>` is the prompt name in upper
//! case. Literal `\n`, `\t` and `\r` sequences in those variables are expanded.
//! Placeholders of the form `{argument}` are filled when the prompt is fetched.

use std::env;

use serde_json::{Map, Value};

/// Argument definition for a prompt template
#[derive(Debug, Clone)]
pub struct PromptTemplateArg {
    pub name: String,
    pub description: String,
    pub required: bool,
}

/// Definition of a prompt template
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub name: String,
    pub description: String,
    pub template: String,
    pub arguments: Vec<PromptTemplateArg>,
}

impl PromptTemplate {
    /// Substitutes the arguments into the template.
    ///
    /// Missing optional arguments become empty text.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first required argument that is missing
    /// or not a string.
    pub fn fill(&self, args: Option<&Map<String, Value>>) -> Result<String, String> {
        let mut text = self.template.clone();

        for arg in &self.arguments {
            let value = match args.and_then(|args| args.get(&arg.name)) {
                Some(Value::String(value)) => value.as_str(),
                _ if !arg.required => "",
                Some(_) => return Err(format!("Argument '{}' must be a string", arg.name)),
                None => return Err(format!("Required argument '{}' is missing", arg.name)),
            };
            text = text.replace(&format!("{{{}}}", arg.name), value);
        }

        Ok(text)
    }
}

/// Expands the escape sequences allowed in prompt environment variables.
fn unescape(input: &str) -> String {
    input
        .replace("\\n", "\n")
        .replace("\\t", "\t")
        .replace("\\r", "\r")
}

/// Applies a replacement or an addition to `base`. A replacement wins.
fn customize(base: &str, replacement: Option<String>, addition: Option<String>) -> String {
    if let Some(replacement) = replacement.filter(|value| !value.is_empty()) {
        return unescape(&replacement);
    }
    match addition.filter(|value| !value.is_empty()) {
        Some(addition) => format!("{base}\n\n{}", unescape(&addition)),
        None => base.to_string(),
    }
}

/// `base` after the environment overrides for prompt `name`.
pub fn load_prompt(base: &str, name: &str) -> String {
    let key = name.to_uppercase();
    customize(
        base,
        env::var(format!("MCP_PROMPT_{key}")).ok(),
        env::var(format!("MCP_PROMPT_{key}_APPEND")).ok(),
    )
}

const PLAN_TEMPLATE: &str = r#"You are planning work for an agent that tracks tasks with Waypoint.

# Goal
{goal}

# Requirements
{requirements}

# Before You Plan
1. Call `list_tasks` to see what already exists, and `query_task` to look for
   related finished work in earlier sessions.
2. Read the code the goal touches. Note the files involved and the patterns
   the project already follows.

# Split the Work
Call `split_tasks` once with the whole batch.

- `updateMode`: `append` to add to the existing list, `selective` to revise
  tasks by name, `overwrite` to replace unfinished tasks, `clearAllTasks` to
  start over (completed tasks are archived first).
- `globalAnalysisResult`: one paragraph stating the overall goal.
- `tasks`: each entry has a unique `name`, a `description`, optional `notes`,
  `implementationGuide`, `verificationCriteria`, `relatedFiles`, and
  `dependencies` given as task names or UUIDs.

Good tasks are small enough to finish and verify in one sitting, name their
files, and say how to check the result. Use dependencies only where one task
really needs another one's output."#;

const EXECUTE_TEMPLATE: &str = r#"You are executing tasks tracked by Waypoint.

# Task
{task_id}

If no task id is given above, call `list_tasks` with status `pending` and
pick the first task whose dependencies are all completed.

# Steps
1. Call `execute_task` with the id. It marks the task in progress and returns
   its description, guide, complexity assessment and the summaries of the
   tasks it depends on. If it reports blockers, execute those first.
2. Do the work described. Stay within the task's scope and follow its
   implementation guide.
3. Check the result against the verification criteria.
4. Call `verify_task` with a score from 0 to 100 and a summary. A score of 80
   or more completes the task and records the summary; a lower score keeps it
   in progress and the summary should list what still needs fixing.

Repeat until no runnable task is left, then report what was done."#;

/// Get predefined prompt templates, with environment overrides applied
pub fn get_prompt_templates() -> Vec<PromptTemplate> {
    vec![
        PromptTemplate {
            name: "plan".to_string(),
            description: "Break a goal into Waypoint tasks with dependencies".to_string(),
            template: load_prompt(PLAN_TEMPLATE, "plan"),
            arguments: vec![
                PromptTemplateArg {
                    name: "goal".to_string(),
                    description: "The goal or outcome to plan for".to_string(),
                    required: true,
                },
                PromptTemplateArg {
                    name: "requirements".to_string(),
                    description: "Constraints or technical requirements".to_string(),
                    required: false,
                },
            ],
        },
        PromptTemplate {
            name: "execute".to_string(),
            description: "Execute and verify Waypoint tasks one at a time".to_string(),
            template: load_prompt(EXECUTE_TEMPLATE, "execute"),
            arguments: vec![PromptTemplateArg {
                name: "task_id".to_string(),
                description: "UUID of the task to execute (if not provided, the next runnable task is picked)".to_string(),
                required: false,
            }],
        },
    ]
}
