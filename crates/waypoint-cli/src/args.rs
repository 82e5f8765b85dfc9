//! Command-line argument definitions using clap.
//!
//! Argument structures carry the clap derives and convert into the core
//! parameter types with `From`, so `waypoint-core` stays free of CLI concerns:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → TaskManager
//! ```

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use waypoint_core::{
    params::{
        ClearAllTasks, Id, ListTasks, QueryTasks, SetTaskStatus, TaskDefinition, UpdateTask,
        VerifyTask,
    },
    MergePolicy, TaskStatus,
};

/// Task tracking for LLM coding agents
///
/// Waypoint keeps a list of tasks with dependencies in a JSON document.
/// Agents split work into tasks, execute and verify them one by one, and
/// search finished work later. `wp serve` exposes the same operations as an
/// MCP server.
#[derive(Parser)]
#[command(version, about, name = "wp")]
pub struct Args {
    /// Directory holding tasks.json and the archive snapshots. Falls back to
    /// $DATA_DIR, then to <workspace-root>/data or $XDG_DATA_HOME/waypoint
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Project root used to place or name the data directory
    #[arg(long, global = true)]
    pub workspace_root: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the Waypoint CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Manage individual tasks
    #[command(alias = "t")]
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Merge a batch of task definitions from a JSON file
    Split(SplitArgs),
    /// Archive completed tasks and empty the task list
    Clear(ClearArgs),
    /// Start the MCP server on stdio
    Serve,
}

/// Task status as accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Pending,
    #[value(alias = "in_progress")]
    InProgress,
    #[value(alias = "done")]
    Completed,
    Blocked,
}

impl From<StatusArg> for TaskStatus {
    fn from(val: StatusArg) -> Self {
        match val {
            StatusArg::Pending => TaskStatus::Pending,
            StatusArg::InProgress => TaskStatus::InProgress,
            StatusArg::Completed => TaskStatus::Completed,
            StatusArg::Blocked => TaskStatus::Blocked,
        }
    }
}

/// Merge policy as accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Keep every existing task and add the batch
    Append,
    /// Drop unfinished tasks, keep completed ones, add the batch
    Overwrite,
    /// Update tasks with matching names, add the rest
    Selective,
    /// Archive completed tasks, empty the list, add the batch
    #[value(alias = "clearAllTasks")]
    ClearAllTasks,
}

impl From<ModeArg> for MergePolicy {
    fn from(val: ModeArg) -> Self {
        match val {
            ModeArg::Append => MergePolicy::Append,
            ModeArg::Overwrite => MergePolicy::Overwrite,
            ModeArg::Selective => MergePolicy::Selective,
            ModeArg::ClearAllTasks => MergePolicy::ClearAllTasks,
        }
    }
}

/// A task identified by its UUID
#[derive(ClapArgs)]
pub struct TaskIdArgs {
    #[arg(help = "UUID of the task")]
    pub id: String,
}

impl From<TaskIdArgs> for Id {
    fn from(val: TaskIdArgs) -> Self {
        Id { id: val.id }
    }
}

/// Create a single task
#[derive(ClapArgs)]
pub struct AddTaskArgs {
    /// Short task name
    pub name: String,
    #[arg(short, long, default_value = "", help = "What the task does and how")]
    pub description: String,
    #[arg(short, long, help = "Supplementary notes")]
    pub notes: Option<String>,
    #[arg(
        long,
        value_delimiter = ',',
        help = "Prerequisite tasks as comma-separated UUIDs or names"
    )]
    pub deps: Vec<String>,
    #[arg(long, help = "Implementation guide")]
    pub guide: Option<String>,
    #[arg(long, help = "Verification criteria")]
    pub criteria: Option<String>,
}

impl From<AddTaskArgs> for TaskDefinition {
    fn from(val: AddTaskArgs) -> Self {
        TaskDefinition {
            notes: val.notes,
            dependencies: val.deps,
            implementation_guide: val.guide,
            verification_criteria: val.criteria,
            ..TaskDefinition::new(val.name, val.description)
        }
    }
}

/// List tasks, grouped by status
#[derive(ClapArgs)]
pub struct ListTasksArgs {
    #[arg(short, long, value_enum, help = "Only list tasks in this status")]
    pub status: Option<StatusArg>,
}

impl From<ListTasksArgs> for ListTasks {
    fn from(val: ListTasksArgs) -> Self {
        ListTasks {
            status: val.status.map(Into::into),
        }
    }
}

/// Update the content of an unfinished task
#[derive(ClapArgs)]
pub struct UpdateTaskArgs {
    #[arg(help = "UUID of the task to update")]
    pub id: String,
    #[arg(long, help = "New task name")]
    pub name: Option<String>,
    #[arg(short, long, help = "New description")]
    pub description: Option<String>,
    #[arg(short, long, help = "New notes")]
    pub notes: Option<String>,
    #[arg(
        long,
        value_delimiter = ',',
        help = "New prerequisites as comma-separated UUIDs or names"
    )]
    pub deps: Option<Vec<String>>,
    #[arg(long, help = "New implementation guide")]
    pub guide: Option<String>,
    #[arg(long, help = "New verification criteria")]
    pub criteria: Option<String>,
}

impl From<UpdateTaskArgs> for UpdateTask {
    fn from(val: UpdateTaskArgs) -> Self {
        UpdateTask {
            id: val.id,
            name: val.name,
            description: val.description,
            notes: val.notes,
            dependencies: val.deps,
            related_files: None,
            implementation_guide: val.guide,
            verification_criteria: val.criteria,
        }
    }
}

/// Set the status of a task directly
#[derive(ClapArgs)]
pub struct SetStatusArgs {
    #[arg(help = "UUID of the task")]
    pub id: String,
    #[arg(value_enum, help = "New status")]
    pub status: StatusArg,
}

impl From<SetStatusArgs> for SetTaskStatus {
    fn from(val: SetStatusArgs) -> Self {
        SetTaskStatus {
            id: val.id,
            status: val.status.into(),
        }
    }
}

/// Score a task in progress; 80 or more completes it
#[derive(ClapArgs)]
pub struct VerifyArgs {
    #[arg(help = "UUID of the task to verify")]
    pub id: String,
    #[arg(long, help = "Score from 0 to 100")]
    pub score: u8,
    #[arg(long, help = "Completion summary, or the issues to fix")]
    pub summary: String,
}

impl From<VerifyArgs> for VerifyTask {
    fn from(val: VerifyArgs) -> Self {
        VerifyTask {
            id: val.id,
            score: val.score,
            summary: val.summary,
        }
    }
}

/// Search active and archived tasks
#[derive(ClapArgs)]
pub struct QueryArgs {
    #[arg(help = "Keywords, or a task UUID with --id")]
    pub query: String,
    #[arg(long, help = "Treat the query as an exact task UUID")]
    pub id: bool,
    #[arg(long, default_value_t = 1, help = "Page number, starting at 1")]
    pub page: usize,
    #[arg(long, default_value_t = 5, help = "Results per page, 1 to 20")]
    pub page_size: usize,
}

impl From<QueryArgs> for QueryTasks {
    fn from(val: QueryArgs) -> Self {
        QueryTasks {
            query: val.query,
            is_id: val.id,
            page: val.page,
            page_size: val.page_size,
        }
    }
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Create a single task
    #[command(alias = "a")]
    Add(AddTaskArgs),
    /// List tasks, grouped by status
    #[command(aliases = ["l", "ls"])]
    List(ListTasksArgs),
    /// Show one active task
    #[command(alias = "s")]
    Show(TaskIdArgs),
    /// Update the content of an unfinished task
    #[command(alias = "u")]
    Update(UpdateTaskArgs),
    /// Set the status of a task directly
    Status(SetStatusArgs),
    /// Delete an unfinished task nothing depends on
    #[command(aliases = ["d", "rm"])]
    Delete(TaskIdArgs),
    /// Start a task whose dependencies are completed
    #[command(alias = "x")]
    Execute(TaskIdArgs),
    /// Score a task in progress; 80 or more completes it
    Verify(VerifyArgs),
    /// Report whether a task can be executed and deleted
    Check(TaskIdArgs),
    /// Assess the complexity of a task
    Complexity(TaskIdArgs),
    /// Search active and archived tasks
    #[command(alias = "q")]
    Query(QueryArgs),
    /// Show a task from the active list or the archives
    Detail(TaskIdArgs),
}

/// Merge a batch of task definitions
///
/// The file holds either a JSON array of task definitions or an object
/// `{"tasks": [...], "globalAnalysisResult": "..."}`.
#[derive(ClapArgs)]
pub struct SplitArgs {
    #[arg(help = "Path of the JSON batch, or - to read standard input")]
    pub file: String,
    #[arg(short, long, value_enum, default_value_t = ModeArg::Append)]
    pub mode: ModeArg,
    #[arg(long, help = "Overall goal, stamped on every created or updated task")]
    pub analysis: Option<String>,
}

/// Archive completed tasks and empty the task list
#[derive(ClapArgs)]
pub struct ClearArgs {
    #[arg(long, help = "Confirm that every task should be removed")]
    pub confirm: bool,
}

impl From<ClearArgs> for ClearAllTasks {
    fn from(val: ClearArgs) -> Self {
        ClearAllTasks {
            confirm: val.confirm,
        }
    }
}
