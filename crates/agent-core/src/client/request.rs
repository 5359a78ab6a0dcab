use action_primitives::BrowserAction;
use affine_core_types::{Snapshot, Task};
use serde::{Deserialize, Serialize};

/// Body POSTed to the agent each step.
///
/// Carries the union of the field sets agents in the wild expect: `url`
/// and `current_url` hold the same value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActRequest {
    pub task_id: String,
    pub prompt: String,
    pub url: String,
    pub current_url: String,
    pub snapshot_html: String,
    pub step_index: u32,
    pub web_project_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<BrowserAction>>,
}

impl ActRequest {
    pub fn for_step(task: &Task, snapshot: &Snapshot, step_index: u32) -> Self {
        let current_url = snapshot.url_or(&task.url).to_string();
        Self {
            task_id: task.id.clone(),
            prompt: task.prompt.clone(),
            url: current_url.clone(),
            current_url,
            snapshot_html: snapshot.html_or_empty().to_string(),
            step_index,
            web_project_id: task.web_project_id.clone(),
            history: None,
        }
    }

    pub fn with_history(mut self, history: &[BrowserAction]) -> Self {
        self.history = Some(history.to_vec());
        self
    }
}
