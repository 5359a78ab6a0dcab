use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::reply::{parse_reply, AgentReply};
use super::request::ActRequest;
use super::{AgentClient, AgentConnector};
use crate::errors::AgentError;

/// Per-call timeout for agent requests.
pub const DEFAULT_AGENT_TIMEOUT: Duration = Duration::from_secs(60);

const MAX_ERROR_BODY: usize = 512;

/// Canonical action endpoint for an agent base URL.
///
/// `base_url` is expected to be the full endpoint (`http://host:9000/act`);
/// a bare host (empty path or `/`) gets `/act` appended.
pub fn resolve_act_endpoint(base_url: &str) -> Result<Url, AgentError> {
    let trimmed = base_url.trim();
    let mut url =
        Url::parse(trimmed).map_err(|err| AgentError::invalid_endpoint(trimmed, err.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(AgentError::invalid_endpoint(
            trimmed,
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if url.host_str().map(str::is_empty).unwrap_or(true) {
        return Err(AgentError::invalid_endpoint(trimmed, "missing host"));
    }

    if url.path().is_empty() || url.path() == "/" {
        url.set_path("/act");
    }
    Ok(url)
}

/// Blocking JSON client for one agent endpoint.
///
/// Must be built and dropped outside an async runtime context.
#[derive(Debug, Clone)]
pub struct RemoteAgentClient {
    client: Client,
    endpoint: Url,
}

impl RemoteAgentClient {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, AgentError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl AgentClient for RemoteAgentClient {
    fn act(&self, request: &ActRequest) -> Result<AgentReply, AgentError> {
        debug!(endpoint = %self.endpoint, step = request.step_index, "calling agent");
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|idx| body.is_char_boundary(*idx))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            return Err(AgentError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response
            .json()
            .map_err(|err| AgentError::malformed(err.to_string()))?;
        parse_reply(&body)
    }
}

/// Connector used by the service: one [`RemoteAgentClient`] per evaluation.
#[derive(Debug, Clone)]
pub struct HttpAgentConnector {
    timeout: Duration,
}

impl HttpAgentConnector {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for HttpAgentConnector {
    fn default() -> Self {
        Self::new(DEFAULT_AGENT_TIMEOUT)
    }
}

impl AgentConnector for HttpAgentConnector {
    fn connect(&self, endpoint: &Url) -> Result<Box<dyn AgentClient>, AgentError> {
        Ok(Box::new(RemoteAgentClient::new(endpoint.clone(), self.timeout)?))
    }
}
