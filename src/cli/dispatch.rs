use super::agent::cmd_agent;
use super::env::CliArgs;
use super::evaluate::cmd_evaluate;
use super::serve::cmd_serve;
use super::tasks::cmd_tasks;
use crate::cli::commands::Commands;
use crate::cli::context::CliContext;
use anyhow::Result;

pub async fn dispatch(cli: &CliArgs, ctx: &CliContext) -> Result<()> {
    match cli.command.clone() {
        Commands::Serve(args) => cmd_serve(args, ctx.config()).await,
        Commands::Agent(args) => cmd_agent(args, ctx.config()).await,
        Commands::Evaluate(args) => cmd_evaluate(args, ctx.config(), cli.output).await,
        Commands::Tasks(args) => cmd_tasks(args, ctx.config(), cli.output).await,
    }
}
