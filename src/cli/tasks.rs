use affine_core_types::Task;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use super::output::{print_json, OutputFormat};
use crate::config::AppConfig;

#[derive(Args, Clone)]
pub struct TasksArgs {
    /// Read this tasks file instead of the configured one
    #[arg(long, value_name = "FILE")]
    pub tasks_file: Option<PathBuf>,

    /// Show only this task
    #[arg(long)]
    pub task_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct TaskSummary<'a> {
    id: &'a str,
    web_project_id: &'a str,
    url: &'a str,
    prompt: &'a str,
    tests: usize,
}

impl<'a> From<&'a Task> for TaskSummary<'a> {
    fn from(task: &'a Task) -> Self {
        Self {
            id: &task.id,
            web_project_id: &task.web_project_id,
            url: &task.url,
            prompt: &task.prompt,
            tests: task.tests.len(),
        }
    }
}

pub async fn cmd_tasks(args: TasksArgs, config: &AppConfig, output: OutputFormat) -> Result<()> {
    let mut env_config = config.env.clone();
    if let Some(path) = args.tasks_file {
        env_config.tasks_file = path;
    }

    let task_id = args.task_id.clone();
    let catalog = env_config.task_catalog();
    let tasks = tokio::task::spawn_blocking(move || catalog.select(task_id.as_deref()))
        .await
        .map_err(|err| anyhow!("catalogue worker failed: {err}"))?
        .context("failed to load tasks")?;

    let summaries: Vec<TaskSummary<'_>> = tasks.iter().map(TaskSummary::from).collect();
    match output {
        OutputFormat::Json => print_json(&summaries)?,
        OutputFormat::Human => {
            println!("{} task(s) in {}", summaries.len(), env_config.tasks_file.display());
            for task in &summaries {
                println!(
                    "  {:<40} project={} tests={} url={}",
                    task.id, task.web_project_id, task.tests, task.url
                );
            }
        }
    }
    Ok(())
}
