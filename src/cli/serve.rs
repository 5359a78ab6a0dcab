use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::Router;
use clap::Args;
use env_server::{router, EnvState};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use crate::config::AppConfig;

#[derive(Args, Clone)]
pub struct ServeArgs {
    /// Interface to bind (default: config `server.host`)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (default: config `server.port`)
    #[arg(long)]
    pub port: Option<u16>,

    /// Step ceiling for requests without `max_steps`
    #[arg(long)]
    pub max_steps: Option<u32>,

    /// Canonical tasks file
    #[arg(long, value_name = "FILE")]
    pub tasks_file: Option<PathBuf>,

    /// Concurrent evaluations allowed
    #[arg(long)]
    pub workers: Option<usize>,
}

pub async fn cmd_serve(args: ServeArgs, config: &AppConfig) -> Result<()> {
    let mut server = config.server.clone();
    if let Some(host) = args.host {
        server.host = host;
    }
    if let Some(port) = args.port {
        server.port = port;
    }
    let addr = server.socket_addr()?;

    let mut env_config = config.env.clone();
    if let Some(max_steps) = args.max_steps {
        if max_steps == 0 {
            warn!("--max-steps 0 ignored; keeping {}", env_config.default_max_steps);
        } else {
            env_config.default_max_steps = max_steps;
        }
    }
    if let Some(tasks_file) = args.tasks_file {
        env_config.tasks_file = tasks_file;
    }
    if let Some(workers) = args.workers {
        env_config.worker_limit = workers;
    }

    info!(
        max_steps = env_config.default_max_steps,
        workers = env_config.worker_limit,
        tasks_file = %env_config.tasks_file.display(),
        "Evaluation service configured"
    );
    let state = EnvState::new(env_config);
    serve_router(router(state), addr, "evaluation service").await
}

/// Bind `addr` and serve until ctrl-c.
pub(crate) async fn serve_router(app: Router, addr: SocketAddr, label: &str) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {} on {}", label, addr))?;
    let local = listener.local_addr().unwrap_or(addr);
    info!("{} listening on http://{}", label, local);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .with_context(|| format!("{} stopped unexpectedly", label))?;
    info!("{} shut down", label);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        warn!(?err, "failed to listen for ctrl-c; serving until killed");
        std::future::pending::<()>().await;
    }
}
