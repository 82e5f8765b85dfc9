//! Waypoint CLI Application
//!
//! Command-line interface and MCP server for the waypoint task tracker.

mod args;
mod cli;
mod mcp;
mod renderer;

use std::process::ExitCode;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use mcp::{run_stdio_server, WaypointMcpServer};
use renderer::TerminalRenderer;
use waypoint_core::{params::ListTasks, DataDirResolver, TaskManagerBuilder};
use Commands::*;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    env_logger::init();

    let Args {
        data_dir,
        workspace_root,
        no_color,
        command,
    } = Args::parse();

    let data_dir = DataDirResolver::from_env()
        .with_data_dir(data_dir)
        .with_workspace_root(workspace_root)
        .resolve()
        .context("Failed to determine the data directory")?;
    let data_dir = std::path::absolute(&data_dir)
        .with_context(|| format!("Invalid data directory {}", data_dir.display()))?;

    let manager = TaskManagerBuilder::new()
        .with_data_dir(Some(data_dir))
        .build()
        .await
        .context("Failed to initialize task manager")?;

    let renderer = TerminalRenderer::new(!no_color);

    info!("Waypoint started");

    let succeeded = match command {
        Some(Task { command }) => {
            Cli::new(manager, renderer)
                .handle_task_command(command)
                .await?
        }
        Some(Split(args)) => Cli::new(manager, renderer).split(args).await?,
        Some(Clear(args)) => Cli::new(manager, renderer).clear(args).await?,
        Some(Serve) => {
            info!("Starting Waypoint MCP server");
            run_stdio_server(WaypointMcpServer::new(manager))
                .await
                .context("MCP server failed")?;
            true
        }
        None => {
            Cli::new(manager, renderer)
                .list_tasks(&ListTasks::default())
                .await?
        }
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
