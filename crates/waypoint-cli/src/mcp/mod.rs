//! MCP server implementation for Waypoint
//!
//! Exposes the task manager to MCP clients over stdio. Tool calls are
//! serialized behind one mutex, so a single server never interleaves two
//! read-modify-write cycles on the task document.

use std::{future::Future, sync::Arc};

use anyhow::Result;
use log::{debug, error, info};
use rmcp::{
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::{
        GetPromptRequestParam, GetPromptResult, Implementation, ListPromptsResult,
        PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    tool, tool_handler, tool_router, ErrorData as McpError, RoleServer, ServerHandler,
};
use tokio::{
    signal::unix::{signal, SignalKind},
    sync::Mutex,
};
use waypoint_core::TaskManager;

pub mod errors;
pub mod guidance;
pub mod handlers;
pub mod prompts;

pub use handlers::{
    ClearAllTasks, Id, ListTasks, McpResult, QueryTasks, SplitTasks, UpdateTask, VerifyTask,
};

/// MCP server for Waypoint
#[derive(Clone)]
pub struct WaypointMcpServer {
    manager: Arc<Mutex<TaskManager>>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl WaypointMcpServer {
    pub fn new(manager: TaskManager) -> Self {
        Self {
            manager: Arc::new(Mutex::new(manager)),
            tool_router: Self::tool_router(),
        }
    }

    fn handlers(&self) -> handlers::McpHandlers {
        handlers::McpHandlers::new(self.manager.clone())
    }

    #[tool(
        name = "split_tasks",
        description = "Submit a batch of task definitions. updateMode decides how the batch meets the existing list: 'append' keeps everything and adds the batch; 'overwrite' drops unfinished tasks, keeps completed ones and adds the batch; 'selective' updates tasks whose name matches and adds the rest; 'clearAllTasks' archives completed tasks, empties the list and adds the batch. Names must be unique within the batch. Dependencies may name tasks in the batch or give existing task UUIDs; unresolvable ones are dropped. globalAnalysisResult is stored on every created or updated task."
    )]
    async fn split_tasks(&self, params: Parameters<SplitTasks>) -> McpResult {
        self.handlers().split_tasks(params).await
    }

    #[tool(
        name = "list_tasks",
        description = "List tasks grouped by status, with a count per status. Pass status ('pending', 'in_progress', 'completed', 'blocked') to list only one group."
    )]
    async fn list_tasks(&self, params: Parameters<ListTasks>) -> McpResult {
        self.handlers().list_tasks(params).await
    }

    #[tool(
        name = "execute_task",
        description = "Start working on a task. If every dependency is completed the task moves to 'in_progress' and the full task comes back with its complexity assessment and the summaries of its dependencies. Otherwise the unfinished dependencies are listed. Completed and already running tasks are reported unchanged."
    )]
    async fn execute_task(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().execute_task(params).await
    }

    #[tool(
        name = "verify_task",
        description = "Score a task that is in progress, from 0 to 100. A score of 80 or more completes the task and stores summary as its completion summary. A lower score keeps the task in progress; use summary to list what still needs fixing."
    )]
    async fn verify_task(&self, params: Parameters<VerifyTask>) -> McpResult {
        self.handlers().verify_task(params).await
    }

    #[tool(
        name = "delete_task",
        description = "Delete an unfinished task. Completed tasks cannot be deleted, and neither can tasks that other tasks depend on; the dependents are named in the answer."
    )]
    async fn delete_task(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().delete_task(params).await
    }

    #[tool(
        name = "clear_all_tasks",
        description = "Remove every task. Requires confirm: true. Completed tasks are first written to a timestamped archive snapshot, which query_task and get_task_detail still search."
    )]
    async fn clear_all_tasks(&self, params: Parameters<ClearAllTasks>) -> McpResult {
        self.handlers().clear_all_tasks(params).await
    }

    #[tool(
        name = "update_task",
        description = "Update the content of an unfinished task: name, description, notes, dependencies, relatedFiles, implementationGuide or verificationCriteria. Omitted fields stay as they are. Completed tasks cannot be edited."
    )]
    async fn update_task(&self, params: Parameters<UpdateTask>) -> McpResult {
        self.handlers().update_task(params).await
    }

    #[tool(
        name = "query_task",
        description = "Search active tasks and archived snapshots. The query is whitespace-separated keywords that must all appear in the name, description, notes, implementation guide or summary, or a task UUID when isId is true. Results are paged (page, pageSize up to 20), completed tasks first, most recent first."
    )]
    async fn query_task(&self, params: Parameters<QueryTasks>) -> McpResult {
        self.handlers().query_task(params).await
    }

    #[tool(
        name = "get_task_detail",
        description = "Show the complete record of one task by UUID, looking in the active list first and then in the archive snapshots."
    )]
    async fn get_task_detail(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().get_task_detail(params).await
    }

    #[tool(
        name = "assess_complexity",
        description = "Assess how complex a task is from the length of its description and notes and its number of dependencies, with recommendations for handling it."
    )]
    async fn assess_complexity(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().assess_complexity(params).await
    }

    #[tool(
        name = "plan_task",
        description = "Get planning guidance for a new piece of work. Give a detailed description (at least 10 characters) and optional requirements. Set existingTasksReference to include the current task list so the plan can continue or adjust it. Changes no task."
    )]
    async fn plan_task(&self, params: Parameters<guidance::PlanTask>) -> McpResult {
        self.handlers().plan_task(params).await
    }

    #[tool(
        name = "analyze_task",
        description = "Get guidance for checking an initial solution concept (at least 50 characters) against the codebase: feasibility, reuse, risks and interfaces. Pass previousAnalysis when analyzing again. Changes no task."
    )]
    async fn analyze_task(&self, params: Parameters<guidance::AnalyzeTask>) -> McpResult {
        self.handlers().analyze_task(params).await
    }

    #[tool(
        name = "reflect_task",
        description = "Get guidance for reviewing a complete technical analysis (at least 100 characters) before splitting it into tasks. Changes no task."
    )]
    async fn reflect_task(&self, params: Parameters<guidance::ReflectTask>) -> McpResult {
        self.handlers().reflect_task(params).await
    }

    #[tool(
        name = "research_mode",
        description = "Carry a research session across calls. Give the topic, the state so far (previousState), the current work (currentState) and the next steps; the answer restates them with research guidance. Changes no task."
    )]
    async fn research_mode(&self, params: Parameters<guidance::ResearchMode>) -> McpResult {
        self.handlers().research_mode(params).await
    }

    #[tool(
        name = "process_thought",
        description = "Record one step of a structured chain of thoughts: the thought, its number, the expected total, its stage and whether another thought follows. The total grows when the number exceeds it. Changes no task."
    )]
    async fn process_thought(&self, params: Parameters<guidance::ProcessThought>) -> McpResult {
        self.handlers().process_thought(params).await
    }

    #[tool(
        name = "init_project_rules",
        description = "Get guidance for creating or updating the project rules file (waypoint-rules.md) that agents read before planning. Changes no task."
    )]
    async fn init_project_rules(&self) -> McpResult {
        self.handlers().init_project_rules().await
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for WaypointMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .build(),
            server_info: Implementation {
                name: "waypoint".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Implementation::from_build_env()
            },
            instructions: Some(r#"Waypoint tracks the tasks of a coding agent: split a goal into tasks with dependencies, execute them one at a time, verify each with a score, and search finished work later.

## Workflow
1. `split_tasks` with the whole plan. Dependencies may name other tasks in the same batch.
2. `list_tasks` to see what is pending.
3. `execute_task` on a task whose dependencies are completed. It returns the task, a complexity assessment and the summaries of its dependencies.
4. Do the work, then `verify_task` with a score. 80 or more completes the task.
5. `query_task` and `get_task_detail` find earlier work, including tasks archived by `clear_all_tasks`.

## Rules
- Completed tasks cannot be edited or deleted.
- A task other tasks depend on cannot be deleted.
- Task names must be unique within one batch.

## Guidance tools
`plan_task`, `analyze_task`, `reflect_task`, `research_mode`, `process_thought` and `init_project_rules` return instructions and change no task.

## Prompts
- `plan`: guidance for splitting a goal into tasks
- `execute`: guidance for executing and verifying tasks"#.to_string()),
        }
    }

    async fn list_prompts(
        &self,
        request: Option<PaginatedRequestParam>,
        context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        self.handlers().list_prompts(request, context).await
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        self.handlers().get_prompt(request, context).await
    }
}

/// Run the MCP server with stdio transport
pub async fn run_stdio_server(server: WaypointMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("Starting Waypoint MCP server on stdio");
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use waypoint_core::TaskManagerBuilder;

    use super::*;

    #[tokio::test]
    async fn test_server_registers_every_tool() {
        let temp_dir = TempDir::new().unwrap();
        let manager = TaskManagerBuilder::new()
            .with_data_dir(Some(temp_dir.path()))
            .build()
            .await
            .unwrap();
        let server = WaypointMcpServer::new(manager);

        let mut names: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "analyze_task",
                "assess_complexity",
                "clear_all_tasks",
                "delete_task",
                "execute_task",
                "get_task_detail",
                "init_project_rules",
                "list_tasks",
                "plan_task",
                "process_thought",
                "query_task",
                "reflect_task",
                "research_mode",
                "split_tasks",
                "update_task",
                "verify_task",
            ]
        );
        assert_eq!(server.get_info().server_info.name, "waypoint");
    }
}
