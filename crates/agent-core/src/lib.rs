//! Agent side of the evaluation environment.
//!
//! `client` talks to the remote agent over HTTP, `evaluation` drives a task
//! through an evaluator session one agent step at a time.

pub mod client;
pub mod errors;
pub mod evaluation;

pub use client::{
    parse_reply, resolve_act_endpoint, ActRequest, AgentClient, AgentConnector, AgentReply,
    HttpAgentConnector, RemoteAgentClient, DEFAULT_AGENT_TIMEOUT,
};
pub use errors::{AgentError, LoopError};
pub use evaluation::{evaluate_tasks, run_task, LoopOptions, DEFAULT_MAX_STEPS, DEFAULT_WEB_AGENT_ID};
