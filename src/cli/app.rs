use anyhow::Result;
use clap::Parser;
use tracing::{debug, error, info};

use super::context::CliContext;
use super::dispatch::dispatch;
use super::env::CliArgs;
use super::runtime::{
    apply_runtime_overrides, init_logging, load_config, load_local_env_overrides, LoadedConfig,
};

pub async fn run() -> Result<()> {
    load_local_env_overrides();
    let cli = CliArgs::parse();

    init_logging(&cli.log_level, cli.debug)?;

    info!(
        git = env!("GIT_HASH"),
        built = env!("BUILD_DATE"),
        "Starting Autoppia Affine v{}",
        env!("CARGO_PKG_VERSION")
    );

    let LoadedConfig { mut config, path } = load_config(cli.config.as_ref()).await?;
    apply_runtime_overrides(&mut config);
    let cli_context = CliContext::new(config, path);
    debug!(config = %cli_context.config_path().display(), "configuration ready");

    match dispatch(&cli, &cli_context).await {
        Ok(()) => {
            info!("Command completed successfully");
            Ok(())
        }
        Err(err) => {
            error!("Command failed: {:#}", err);
            Err(err)
        }
    }
}
