use agent_core::{AgentError, LoopError};
use task_catalog::CatalogError;
use thiserror::Error;

/// Failures of one `/evaluate` request.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Loop(#[from] LoopError),

    /// The blocking job panicked or the worker pool shut down.
    #[error("evaluation worker failed: {0}")]
    Worker(String),
}

impl EnvError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }
}

impl From<AgentError> for EnvError {
    fn from(value: AgentError) -> Self {
        match value {
            AgentError::InvalidEndpoint { .. } => Self::InvalidRequest(value.to_string()),
            other => Self::Loop(LoopError::Agent(other)),
        }
    }
}
