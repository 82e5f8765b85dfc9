//! Command execution for the CLI.
//!
//! [`Cli`] runs one parsed command against a [`TaskManager`] and renders the
//! core display types. Refusals (unknown ids, policy violations such as
//! deleting a task others depend on) are printed as an `Error:` status line
//! and reported as an unsuccessful run; I/O and parse failures propagate.

use std::{fmt::Write, fs, io};

use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use waypoint_core::{
    display::{ComplexityReport, CreateResult, DeleteResult},
    engine::DeletionCheck,
    params::{Id, ListTasks, SetTaskStatus, SplitTasks, TaskDefinition, UpdateTask},
    OperationStatus, TaskManager, WaypointError,
};

use crate::{
    args::{ClearArgs, SplitArgs, TaskCommands},
    renderer::TerminalRenderer,
};

/// Contents of a batch file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BatchFile {
    Definitions(Vec<TaskDefinition>),
    Document {
        tasks: Vec<TaskDefinition>,
        #[serde(default, rename = "globalAnalysisResult")]
        global_analysis_result: Option<String>,
    },
}

/// Reads a batch from `file`, or from standard input when `file` is `-`.
fn read_batch(file: &str) -> Result<(Vec<TaskDefinition>, Option<String>)> {
    let text = if file == "-" {
        io::read_to_string(io::stdin()).context("Failed to read batch from standard input")?
    } else {
        fs::read_to_string(file).with_context(|| format!("Failed to read batch file {file}"))?
    };

    let batch: BatchFile =
        serde_json::from_str(&text).with_context(|| format!("Invalid batch in {file}"))?;
    Ok(match batch {
        BatchFile::Definitions(tasks) => (tasks, None),
        BatchFile::Document {
            tasks,
            global_analysis_result,
        } => (tasks, global_analysis_result),
    })
}

/// Separates refusals, which are shown to the user, from real failures.
fn refusal<T>(result: waypoint_core::Result<T>) -> Result<std::result::Result<T, WaypointError>> {
    match result {
        Ok(value) => Ok(Ok(value)),
        Err(e) if e.is_policy_violation() => Ok(Err(e)),
        Err(e) => Err(e.into()),
    }
}

pub struct Cli {
    manager: TaskManager,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(manager: TaskManager, renderer: TerminalRenderer) -> Self {
        Self { manager, renderer }
    }

    /// Runs a `task` subcommand. Returns whether the command succeeded.
    pub async fn handle_task_command(&self, command: TaskCommands) -> Result<bool> {
        match command {
            TaskCommands::Add(args) => {
                match refusal(self.manager.create_task(&args.into()).await)? {
                    Ok(task) => self.show(&CreateResult::new(task)),
                    Err(e) => self.refuse_with(&e),
                }
            }
            TaskCommands::List(args) => self.list_tasks(&args.into()).await,
            TaskCommands::Show(args) => {
                let id = Id::from(args);
                match self.manager.get_task_by_id(&id).await? {
                    Some(task) => self.show(&task),
                    None => self.not_found(&id.id),
                }
            }
            TaskCommands::Update(args) => {
                let params = UpdateTask::from(args);
                match refusal(self.manager.update_task_content(&params).await)? {
                    Ok(Some(result)) => self.show(&result),
                    Ok(None) => self.not_found(&params.id),
                    Err(e) => self.refuse_with(&e),
                }
            }
            TaskCommands::Status(args) => {
                let params = SetTaskStatus::from(args);
                match refusal(self.manager.update_task_status(&params).await)? {
                    Ok(Some(task)) => self.show(&task),
                    Ok(None) => self.not_found(&params.id),
                    Err(e) => self.refuse_with(&e),
                }
            }
            TaskCommands::Delete(args) => {
                let id = Id::from(args);
                match refusal(self.manager.delete_task(&id).await)? {
                    Ok(Some(task)) => self.show(&DeleteResult::new(task)),
                    Ok(None) => self.not_found(&id.id),
                    Err(e) => self.refuse_with(&e),
                }
            }
            TaskCommands::Execute(args) => {
                let outcome = self.manager.execute_task(&args.into()).await?;
                self.renderer.render(&outcome)?;
                Ok(outcome.is_started())
            }
            TaskCommands::Verify(args) => {
                match refusal(self.manager.verify_task(&args.into()).await)? {
                    Ok(outcome) => {
                        self.renderer.render(&outcome)?;
                        Ok(outcome.is_completed())
                    }
                    Err(e) => self.refuse_with(&e),
                }
            }
            TaskCommands::Check(args) => self.check(&args.into()).await,
            TaskCommands::Complexity(args) => {
                let id = Id::from(args);
                match self.manager.get_task_by_id(&id).await? {
                    Some(task) => {
                        let assessment = waypoint_core::engine::assess(&task);
                        self.show(&ComplexityReport { task, assessment })
                    }
                    None => self.not_found(&id.id),
                }
            }
            TaskCommands::Query(args) => {
                match refusal(self.manager.query_tasks(&args.into()).await)? {
                    Ok(page) => self.show(&page),
                    Err(e) => self.refuse_with(&e),
                }
            }
            TaskCommands::Detail(args) => {
                let id = Id::from(args);
                match self.manager.get_task_detail(&id).await? {
                    Some(task) => self.show(&task),
                    None => self.not_found(&id.id),
                }
            }
        }
    }

    pub async fn list_tasks(&self, params: &ListTasks) -> Result<bool> {
        let tasks = self.manager.list_tasks(params).await?;
        self.show(&tasks)
    }

    /// Merges a batch file into the task list.
    pub async fn split(&self, args: SplitArgs) -> Result<bool> {
        let (tasks, analysis) = read_batch(&args.file)?;
        debug!("Read {} task definitions from {}", tasks.len(), args.file);

        let params = SplitTasks {
            update_mode: args.mode.into(),
            tasks,
            global_analysis_result: args.analysis.or(analysis),
        };
        match refusal(self.manager.split_tasks(&params).await)? {
            Ok(result) => self.show(&result),
            Err(e) => self.refuse_with(&e),
        }
    }

    pub async fn clear(&self, args: ClearArgs) -> Result<bool> {
        match refusal(self.manager.clear_all(&args.into()).await)? {
            Ok(result) => self.show(&result),
            Err(e) => self.refuse_with(&e),
        }
    }

    async fn check(&self, id: &Id) -> Result<bool> {
        let Some(task) = self.manager.get_task_by_id(id).await? else {
            return self.not_found(&id.id);
        };
        let execution = self.manager.can_execute(id).await?;
        let deletion = self.manager.can_delete(id).await?;

        let mut out = String::new();
        writeln!(out, "## {} (ID: `{}`)", task.name, task.id)?;
        writeln!(out)?;
        if execution.can_execute {
            writeln!(out, "- Executable: yes")?;
        } else {
            let ids: Vec<String> = execution.blocked_by.iter().map(|id| format!("`{id}`")).collect();
            writeln!(out, "- Executable: no, blocked by {}", ids.join(", "))?;
        }
        match deletion {
            DeletionCheck::Allowed => writeln!(out, "- Deletable: yes")?,
            DeletionCheck::Completed => writeln!(out, "- Deletable: no, the task is completed")?,
            DeletionCheck::HasDependents(dependents) => {
                let names: Vec<String> = dependents.iter().map(ToString::to_string).collect();
                writeln!(out, "- Deletable: no, required by {}", names.join(", "))?;
            }
            DeletionCheck::NotFound => return self.not_found(&id.id),
        }

        self.renderer.render_markdown(&out)?;
        Ok(true)
    }

    fn show(&self, value: &impl std::fmt::Display) -> Result<bool> {
        self.renderer.render(value)?;
        Ok(true)
    }

    fn not_found(&self, id: &str) -> Result<bool> {
        self.renderer
            .status(&OperationStatus::failure(format!("Task with ID {id} not found")))?;
        Ok(false)
    }

    fn refuse_with(&self, error: &WaypointError) -> Result<bool> {
        self.renderer.status(&OperationStatus::from_error(error))?;
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_file_shapes() {
        let batch: BatchFile =
            serde_json::from_str(r#"[{"name": "A", "description": "a"}]"#).unwrap();
        assert!(matches!(batch, BatchFile::Definitions(ref tasks) if tasks.len() == 1));

        let batch: BatchFile = serde_json::from_str(
            r#"{"tasks": [{"name": "A", "description": "a"}], "globalAnalysisResult": "goal"}"#,
        )
        .unwrap();
        match batch {
            BatchFile::Document {
                tasks,
                global_analysis_result,
            } => {
                assert_eq!(tasks.len(), 1);
                assert_eq!(global_analysis_result.as_deref(), Some("goal"));
            }
            BatchFile::Definitions(_) => panic!("expected document"),
        }
    }
}
