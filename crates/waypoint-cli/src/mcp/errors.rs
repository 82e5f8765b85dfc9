//! Error handling utilities for the MCP server

use rmcp::{
    model::{CallToolResult, Content},
    ErrorData,
};
use waypoint_core::{OperationStatus, WaypointError};

use super::handlers::McpResult;

/// Converts a manager failure into an MCP internal error.
pub fn to_mcp_error(message: &str, error: &WaypointError) -> ErrorData {
    ErrorData::internal_error(format!("{message}: {error}"), None)
}

/// Answers policy violations with an `Error:` status text; anything else is a
/// failed call.
pub fn refuse_or_fail(message: &str, error: WaypointError) -> McpResult {
    if error.is_policy_violation() {
        Ok(text(OperationStatus::from_error(&error)))
    } else {
        Err(to_mcp_error(message, &error))
    }
}

/// Status text for an id that matches no task.
pub fn not_found(id: &str) -> CallToolResult {
    text(OperationStatus::failure(format!("Task with ID {id} not found")))
}

/// Successful tool result carrying `value` rendered as markdown.
pub fn text(value: impl ToString) -> CallToolResult {
    CallToolResult::success(vec![Content::text(value.to_string())])
}
