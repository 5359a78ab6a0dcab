//! Client side of the `/act` protocol.

mod http;
mod reply;
mod request;

pub use http::{resolve_act_endpoint, HttpAgentConnector, RemoteAgentClient, DEFAULT_AGENT_TIMEOUT};
pub use reply::{parse_reply, AgentReply};
pub use request::ActRequest;

use url::Url;

use crate::errors::AgentError;

/// One round trip to the agent per step.
pub trait AgentClient: Send {
    fn act(&self, request: &ActRequest) -> Result<AgentReply, AgentError>;
}

/// Creates an [`AgentClient`] for an agent endpoint.
pub trait AgentConnector: Send + Sync {
    fn connect(&self, endpoint: &Url) -> Result<Box<dyn AgentClient>, AgentError>;
}
