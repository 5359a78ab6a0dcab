//! Bounded step loop that scores one agent against catalogue tasks.

mod config;
mod controller;

pub use config::{LoopOptions, DEFAULT_MAX_STEPS, DEFAULT_WEB_AGENT_ID};
pub use controller::{evaluate_tasks, run_task};
