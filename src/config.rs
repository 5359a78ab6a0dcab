//! Application configuration loaded from YAML.
//!
//! One file configures both services: the `env` section is the evaluation
//! service, `server` is where it listens and `agent` describes the
//! fixed-policy agent started by `affine-env agent`.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use env_server::EnvConfig;
use fixed_agents::{
    ActPolicy, DirectNavigatePolicy, IdlePolicy, LinkScanPolicy, PolicyKind, DEFAULT_LINK_PATTERN,
    DEFAULT_TARGET_URL,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub env: EnvConfig,
    pub server: ServerSettings,
    pub agent: AgentSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        bind_addr(&self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    pub host: String,
    pub port: u16,
    /// `direct`, `link-scan` or `idle`.
    pub policy: String,
    pub target_url: String,
    /// Answer the direct policy in the `{navigate_url, done}` shape.
    pub legacy_shape: bool,
    pub link_pattern: String,
    pub max_idle_steps: u32,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9000,
            policy: "direct".to_string(),
            target_url: DEFAULT_TARGET_URL.to_string(),
            legacy_shape: false,
            link_pattern: DEFAULT_LINK_PATTERN.to_string(),
            max_idle_steps: 5,
        }
    }
}

impl AgentSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        bind_addr(&self.host, self.port)
    }

    pub fn policy_kind(&self) -> Result<PolicyKind> {
        self.policy
            .parse::<PolicyKind>()
            .with_context(|| format!("invalid agent policy in config: {}", self.policy))
    }

    /// Build the configured policy.
    pub fn build_policy(&self) -> Result<Arc<dyn ActPolicy>> {
        let policy: Arc<dyn ActPolicy> = match self.policy_kind()? {
            PolicyKind::Direct => Arc::new(
                DirectNavigatePolicy::new(self.target_url.clone()).legacy_shape(self.legacy_shape),
            ),
            PolicyKind::LinkScan => Arc::new(
                LinkScanPolicy::new(&self.link_pattern, self.max_idle_steps)
                    .context("failed to build link-scan policy")?,
            ),
            PolicyKind::Idle => Arc::new(IdlePolicy),
        };
        Ok(policy)
    }
}

fn bind_addr(host: &str, port: u16) -> Result<SocketAddr> {
    format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address {host}:{port}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_gives_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.agent.port, 9000);
        assert_eq!(config.env.default_max_steps, 30);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let yaml = r#"
env:
  default_max_steps: 8
  tasks_file: /srv/tasks.json
server:
  port: 8002
agent:
  policy: idle
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.env.default_max_steps, 8);
        assert_eq!(config.env.tasks_file.to_str(), Some("/srv/tasks.json"));
        assert_eq!(config.env.web_agent_id, "1");
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.socket_addr().unwrap().port(), 8002);
        assert_eq!(config.agent.policy_kind().unwrap(), PolicyKind::Idle);
        assert_eq!(config.agent.build_policy().unwrap().name(), "idle");
    }

    #[test]
    fn bad_policy_settings_are_errors() {
        let unknown = AgentSettings {
            policy: "oracle".into(),
            ..AgentSettings::default()
        };
        assert!(unknown.build_policy().is_err());

        let bad_pattern = AgentSettings {
            policy: "link-scan".into(),
            link_pattern: "(".into(),
            ..AgentSettings::default()
        };
        assert!(bad_pattern.build_policy().is_err());
    }

    #[test]
    fn invalid_host_is_rejected() {
        let server = ServerSettings {
            host: "not a host".into(),
            port: 1,
        };
        assert!(server.socket_addr().is_err());
    }
}
