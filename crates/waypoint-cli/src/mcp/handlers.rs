//! MCP tool handlers implementation

use std::sync::Arc;

use log::debug;
use rmcp::{
    handler::server::tool::Parameters,
    model::{
        CallToolResult, GetPromptRequestParam, GetPromptResult, ListPromptsResult,
        PaginatedRequestParam, Prompt, PromptArgument, PromptMessage, PromptMessageContent,
        PromptMessageRole,
    },
    service::RequestContext,
    ErrorData, ErrorData as McpError, RoleServer,
};
use schemars::JsonSchema;
use serde::Deserialize;
use tokio::sync::Mutex;
use waypoint_core::{
    display::{ComplexityReport, DeleteResult},
    params as core,
    store::archive::ARCHIVE_DIR,
    TaskManager,
};

use super::{
    errors::{not_found, refuse_or_fail, text, to_mcp_error},
    guidance,
    prompts::get_prompt_templates,
};

// Core parameter types are wrapped in a transparent serde container so the
// MCP layer can name them in tool signatures while the core keeps only its
// optional schema derive.

/// Generic MCP wrapper for core parameter types
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct McpParams<T>(T)
where
    T: JsonSchema;

impl<T> JsonSchema for McpParams<T>
where
    T: JsonSchema,
{
    fn schema_name() -> std::borrow::Cow<'static, str> {
        T::schema_name()
    }

    fn json_schema(g: &mut schemars::SchemaGenerator) -> schemars::Schema {
        T::json_schema(g)
    }
}

impl<T> AsRef<T> for McpParams<T>
where
    T: JsonSchema,
{
    fn as_ref(&self) -> &T {
        &self.0
    }
}

// Type aliases for cleaner usage in function signatures
pub type Id = McpParams<core::Id>;
pub type SplitTasks = McpParams<core::SplitTasks>;
pub type ListTasks = McpParams<core::ListTasks>;
pub type VerifyTask = McpParams<core::VerifyTask>;
pub type ClearAllTasks = McpParams<core::ClearAllTasks>;
pub type UpdateTask = McpParams<core::UpdateTask>;
pub type QueryTasks = McpParams<core::QueryTasks>;

pub type McpResult = Result<CallToolResult, ErrorData>;

/// Turns rendered guidance into a tool result; rejected arguments become
/// invalid-params errors.
fn guidance_result(rendered: Result<String, String>) -> McpResult {
    rendered
        .map(text)
        .map_err(|message| McpError::invalid_params(message, None))
}

/// Handler implementations for the MCP server
pub struct McpHandlers {
    manager: Arc<Mutex<TaskManager>>,
}

impl McpHandlers {
    pub fn new(manager: Arc<Mutex<TaskManager>>) -> Self {
        Self { manager }
    }

    pub async fn split_tasks(&self, Parameters(params): Parameters<SplitTasks>) -> McpResult {
        debug!("split_tasks: {:?}", params);

        match self.manager.lock().await.split_tasks(params.as_ref()).await {
            Ok(result) => Ok(text(result)),
            Err(e) => refuse_or_fail("Failed to split tasks", e),
        }
    }

    pub async fn list_tasks(&self, Parameters(params): Parameters<ListTasks>) -> McpResult {
        debug!("list_tasks: {:?}", params);

        let tasks = self
            .manager
            .lock()
            .await
            .list_tasks(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to list tasks", &e))?;

        let summary = tasks.summary();
        let mut output = format!(
            "# Task List\n\n{} tasks: {} pending, {} in progress, {} completed, {} blocked\n\n",
            summary.total, summary.pending, summary.in_progress, summary.completed, summary.blocked
        );
        output.push_str(&tasks.to_string());
        Ok(text(output))
    }

    pub async fn execute_task(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("execute_task: {:?}", params);

        let outcome = self
            .manager
            .lock()
            .await
            .execute_task(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to execute task", &e))?;
        Ok(text(outcome))
    }

    pub async fn verify_task(&self, Parameters(params): Parameters<VerifyTask>) -> McpResult {
        debug!("verify_task: {:?}", params);

        match self.manager.lock().await.verify_task(params.as_ref()).await {
            Ok(outcome) => Ok(text(outcome)),
            Err(e) => refuse_or_fail("Failed to verify task", e),
        }
    }

    pub async fn delete_task(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("delete_task: {:?}", params);

        let id = params.as_ref();
        match self.manager.lock().await.delete_task(id).await {
            Ok(Some(task)) => Ok(text(DeleteResult::new(task))),
            Ok(None) => Ok(not_found(&id.id)),
            Err(e) => refuse_or_fail("Failed to delete task", e),
        }
    }

    pub async fn clear_all_tasks(
        &self,
        Parameters(params): Parameters<ClearAllTasks>,
    ) -> McpResult {
        debug!("clear_all_tasks: {:?}", params);

        match self.manager.lock().await.clear_all(params.as_ref()).await {
            Ok(result) => Ok(text(result)),
            Err(e) => refuse_or_fail("Failed to clear tasks", e),
        }
    }

    pub async fn update_task(&self, Parameters(params): Parameters<UpdateTask>) -> McpResult {
        debug!("update_task: {:?}", params);

        let inner = params.as_ref();
        match self.manager.lock().await.update_task_content(inner).await {
            Ok(Some(result)) => Ok(text(result)),
            Ok(None) => Ok(not_found(&inner.id)),
            Err(e) => refuse_or_fail("Failed to update task", e),
        }
    }

    pub async fn query_task(&self, Parameters(params): Parameters<QueryTasks>) -> McpResult {
        debug!("query_task: {:?}", params);

        match self.manager.lock().await.query_tasks(params.as_ref()).await {
            Ok(page) => Ok(text(page)),
            Err(e) => refuse_or_fail("Failed to search tasks", e),
        }
    }

    pub async fn get_task_detail(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("get_task_detail: {:?}", params);

        let id = params.as_ref();
        let task = self
            .manager
            .lock()
            .await
            .get_task_detail(id)
            .await
            .map_err(|e| to_mcp_error("Failed to get task detail", &e))?;

        Ok(task.map_or_else(|| not_found(&id.id), text))
    }

    pub async fn assess_complexity(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("assess_complexity: {:?}", params);

        let id = params.as_ref();
        let manager = self.manager.lock().await;
        let Some(task) = manager
            .get_task_by_id(id)
            .await
            .map_err(|e| to_mcp_error("Failed to load task", &e))?
        else {
            return Ok(not_found(&id.id));
        };
        let Some(assessment) = manager
            .assess_complexity(id)
            .await
            .map_err(|e| to_mcp_error("Failed to assess complexity", &e))?
        else {
            return Ok(not_found(&id.id));
        };

        Ok(text(ComplexityReport { task, assessment }))
    }

    pub async fn plan_task(&self, Parameters(params): Parameters<guidance::PlanTask>) -> McpResult {
        debug!("plan_task: {:?}", params);

        let manager = self.manager.lock().await;
        let tasks = if params.existing_tasks_reference {
            manager
                .get_all_tasks()
                .await
                .map_err(|e| to_mcp_error("Failed to load tasks", &e))?
        } else {
            Vec::new()
        };
        let memory_dir = manager.data_dir().join(ARCHIVE_DIR);

        guidance_result(guidance::plan_task(&params, &tasks, &memory_dir))
    }

    pub async fn analyze_task(
        &self,
        Parameters(params): Parameters<guidance::AnalyzeTask>,
    ) -> McpResult {
        debug!("analyze_task: {:?}", params);
        guidance_result(guidance::analyze_task(&params))
    }

    pub async fn reflect_task(
        &self,
        Parameters(params): Parameters<guidance::ReflectTask>,
    ) -> McpResult {
        debug!("reflect_task: {:?}", params);
        guidance_result(guidance::reflect_task(&params))
    }

    pub async fn research_mode(
        &self,
        Parameters(params): Parameters<guidance::ResearchMode>,
    ) -> McpResult {
        debug!("research_mode: {:?}", params);

        let memory_dir = self.manager.lock().await.data_dir().join(ARCHIVE_DIR);
        guidance_result(guidance::research_mode(&params, &memory_dir))
    }

    pub async fn process_thought(
        &self,
        Parameters(params): Parameters<guidance::ProcessThought>,
    ) -> McpResult {
        debug!("process_thought: {:?}", params);
        guidance_result(guidance::process_thought(&params))
    }

    pub async fn init_project_rules(&self) -> McpResult {
        debug!("init_project_rules");
        Ok(text(guidance::init_project_rules()))
    }

    /// List all available prompts
    pub async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        debug!("list_prompts");

        let prompts = get_prompt_templates()
            .iter()
            .map(|template| {
                Prompt::new(
                    &template.name,
                    Some(&template.description),
                    Some(
                        template
                            .arguments
                            .iter()
                            .map(|arg| PromptArgument {
                                name: arg.name.clone(),
                                description: Some(arg.description.clone()),
                                required: Some(arg.required),
                            })
                            .collect(),
                    ),
                )
            })
            .collect();

        Ok(ListPromptsResult {
            next_cursor: None,
            prompts,
        })
    }

    /// Get a specific prompt by name and apply arguments
    pub async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        debug!("get_prompt: {}", request.name);

        let templates = get_prompt_templates();
        let template = templates
            .iter()
            .find(|t| t.name == request.name)
            .ok_or_else(|| McpError::invalid_params("Prompt not found", None))?;

        let prompt_text = template
            .fill(request.arguments.as_ref())
            .map_err(|message| McpError::invalid_params(message, None))?;

        Ok(GetPromptResult {
            description: Some(template.description.clone()),
            messages: vec![PromptMessage {
                role: PromptMessageRole::User,
                content: PromptMessageContent::text(prompt_text),
            }],
        })
    }
}
