use anyhow::Result;
use clap::Args;
use fixed_agents::router;
use tracing::info;

use super::serve::serve_router;
use crate::config::AppConfig;

#[derive(Args, Clone)]
pub struct AgentArgs {
    /// Interface to bind (default: config `agent.host`)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (default: config `agent.port`)
    #[arg(long)]
    pub port: Option<u16>,

    /// Policy: direct, link-scan or idle
    #[arg(long)]
    pub policy: Option<String>,

    /// Page the direct policy navigates to
    #[arg(long)]
    pub target_url: Option<String>,

    /// Answer with `navigate_url` instead of an `actions` list
    #[arg(long)]
    pub legacy_shape: bool,

    /// Href regex followed by the link-scan policy
    #[arg(long)]
    pub link_pattern: Option<String>,

    /// Steps without a matching link before the link-scan policy gives up
    #[arg(long)]
    pub max_idle_steps: Option<u32>,
}

pub async fn cmd_agent(args: AgentArgs, config: &AppConfig) -> Result<()> {
    let mut settings = config.agent.clone();
    if let Some(host) = args.host {
        settings.host = host;
    }
    if let Some(port) = args.port {
        settings.port = port;
    }
    if let Some(policy) = args.policy {
        settings.policy = policy;
    }
    if let Some(target_url) = args.target_url {
        settings.target_url = target_url;
    }
    if args.legacy_shape {
        settings.legacy_shape = true;
    }
    if let Some(pattern) = args.link_pattern {
        settings.link_pattern = pattern;
    }
    if let Some(max_idle_steps) = args.max_idle_steps {
        settings.max_idle_steps = max_idle_steps;
    }

    let addr = settings.socket_addr()?;
    let policy = settings.build_policy()?;
    info!(policy = policy.name(), "Fixed agent configured");
    serve_router(router(policy), addr, "fixed agent").await
}
