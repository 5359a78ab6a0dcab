use stateful_evaluator::EvaluatorError;
use thiserror::Error;

/// Errors talking to a remote agent.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The agent base URL is not an absolute http(s) URL.
    #[error("invalid agent endpoint '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("agent request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("agent returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed agent response: {0}")]
    MalformedBody(String),
}

impl AgentError {
    pub fn invalid_endpoint(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedBody(message.into())
    }
}

/// Errors that stop an evaluation before it produces a result.
#[derive(Debug, Error)]
pub enum LoopError {
    #[error("max_steps must be a positive integer, got {0}")]
    InvalidMaxSteps(i64),

    #[error(transparent)]
    Evaluator(#[from] EvaluatorError),

    /// Only raised while building the agent client, never for a single step.
    #[error(transparent)]
    Agent(#[from] AgentError),
}
