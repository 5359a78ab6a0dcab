//! Options for one evaluation run.

use serde::{Deserialize, Serialize};

use crate::errors::LoopError;

/// Step ceiling when neither the request nor the environment sets one.
pub const DEFAULT_MAX_STEPS: u32 = 30;

/// Agent id handed to evaluators when configuration names none.
pub const DEFAULT_WEB_AGENT_ID: &str = "1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopOptions {
    /// Maximum agent steps per task. Must be positive.
    /// Default: 30
    pub max_steps: u32,

    /// Identifier the evaluator uses to correlate backend telemetry.
    /// Default: "1"
    pub web_agent_id: String,

    /// Whether the agent's own `done` flag ends the task.
    /// Default: true
    pub honor_agent_done: bool,

    /// Whether each request carries the actions applied so far.
    /// Default: false
    pub include_history: bool,
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            web_agent_id: DEFAULT_WEB_AGENT_ID.to_string(),
            honor_agent_done: true,
            include_history: false,
        }
    }
}

impl LoopOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set max steps.
    pub fn max_steps(mut self, steps: u32) -> Self {
        self.max_steps = steps;
        self
    }

    /// Builder: set the web agent id.
    pub fn web_agent_id(mut self, id: impl Into<String>) -> Self {
        self.web_agent_id = id.into();
        self
    }

    /// Builder: honor or ignore the agent's `done` flag.
    pub fn honor_agent_done(mut self, enabled: bool) -> Self {
        self.honor_agent_done = enabled;
        self
    }

    /// Builder: send action history with each request.
    pub fn include_history(mut self, enabled: bool) -> Self {
        self.include_history = enabled;
        self
    }

    pub fn validate(&self) -> Result<(), LoopError> {
        if self.max_steps == 0 {
            return Err(LoopError::InvalidMaxSteps(0));
        }
        Ok(())
    }
}
