use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body received on `/act`. Accepts every field any environment version sends.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StepRequest {
    pub task_id: String,
    pub step_index: u32,
    pub snapshot_html: Option<String>,
    pub current_url: Option<String>,
    pub url: Option<String>,
    pub prompt: Option<String>,
    pub web_project_id: Option<Value>,
    pub history: Option<Vec<Value>>,
}

impl StepRequest {
    pub fn html(&self) -> &str {
        self.snapshot_html.as_deref().unwrap_or("")
    }

    /// `current_url`, else `url`.
    pub fn page_url(&self) -> Option<&str> {
        self.current_url
            .as_deref()
            .or(self.url.as_deref())
            .filter(|url| !url.is_empty())
    }
}

/// Body returned from `/act`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigate_url: Option<String>,
    #[serde(default)]
    pub actions: Vec<Value>,
    #[serde(default)]
    pub done: bool,
}

impl ActResponse {
    pub fn act(action: Value, done: bool) -> Self {
        Self {
            actions: vec![action],
            done,
            ..Self::default()
        }
    }

    pub fn finished() -> Self {
        Self {
            done: true,
            ..Self::default()
        }
    }

    pub fn idle() -> Self {
        Self::default()
    }
}
