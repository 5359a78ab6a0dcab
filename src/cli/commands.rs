use clap::Subcommand;

use super::agent::AgentArgs;
use super::evaluate::EvaluateArgs;
use super::serve::ServeArgs;
use super::tasks::TasksArgs;

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Run the evaluation service (`/evaluate`, `/health`)
    Serve(ServeArgs),

    /// Run a fixed-policy agent answering `/act`
    Agent(AgentArgs),

    /// Evaluate an agent once and print the result
    Evaluate(EvaluateArgs),

    /// List the tasks in the catalogue
    Tasks(TasksArgs),
}
