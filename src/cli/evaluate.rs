use affine_core_types::EvaluateResponse;
use agent_core::{evaluate_tasks, resolve_act_endpoint, HttpAgentConnector};
use anyhow::{anyhow, bail, Context, Result};
use clap::Args;
use stateful_evaluator::PageEvaluatorFactory;
use tracing::info;

use super::output::{print_json, OutputFormat};
use crate::config::AppConfig;

#[derive(Args, Clone)]
pub struct EvaluateArgs {
    /// Agent action endpoint, e.g. http://localhost:9000/act
    #[arg(long)]
    pub base_url: String,

    /// Evaluate only this task
    #[arg(long)]
    pub task_id: Option<String>,

    /// Step ceiling (default: config `env.default_max_steps`)
    #[arg(long)]
    pub max_steps: Option<u32>,

    /// Display name of the agent
    #[arg(long, default_value = "cli")]
    pub model: String,
}

pub async fn cmd_evaluate(args: EvaluateArgs, config: &AppConfig, output: OutputFormat) -> Result<()> {
    if args.max_steps == Some(0) {
        bail!("--max-steps must be a positive integer");
    }
    let endpoint = resolve_act_endpoint(&args.base_url).context("invalid --base-url")?;
    let env_config = config.env.clone();
    let options = env_config.loop_options(args.max_steps);
    info!(model = %args.model, endpoint = %endpoint, max_steps = options.max_steps, "Evaluating agent");

    let task_id = args.task_id.clone();
    let response = tokio::task::spawn_blocking(move || -> Result<EvaluateResponse> {
        let tasks = env_config
            .task_catalog()
            .select(task_id.as_deref())
            .context("failed to load tasks")?;
        let connector = HttpAgentConnector::new(env_config.agent_timeout());
        let evaluator = PageEvaluatorFactory::new(env_config.evaluator.page_config());
        let response = evaluate_tasks(&tasks, &connector, &endpoint, &evaluator, &options)?;
        Ok(response)
    })
    .await
    .map_err(|err| anyhow!("evaluation worker failed: {err}"))??;

    match output {
        OutputFormat::Json => print_json(&response)?,
        OutputFormat::Human => print_summary(&response),
    }
    Ok(())
}

fn print_summary(response: &EvaluateResponse) {
    println!("Environment: {}", response.environment);
    for detail in &response.details {
        println!(
            "  {:<40} score={:.2} success={} tests={}/{} steps={}",
            detail.task_id,
            detail.score,
            detail.success,
            detail.tests_passed,
            detail.total_tests,
            detail.steps
        );
    }
    println!(
        "Evaluated {} task(s): total_score={:.2} success_rate={:.2}",
        response.evaluated, response.total_score, response.success_rate
    );
}
