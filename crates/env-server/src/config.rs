//! Service configuration.
//!
//! Values come from the `env` section of the YAML config file, then the
//! process environment overrides them once at startup. Nothing here is
//! read again while requests are being served.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use agent_core::{LoopOptions, DEFAULT_MAX_STEPS, DEFAULT_WEB_AGENT_ID};
use serde::{Deserialize, Serialize};
use stateful_evaluator::PageEvaluatorConfig;
use task_catalog::{default_resolvers, TaskCatalog, DEFAULT_CANONICAL_PATH, IWA_ROOT_ENV};
use tracing::warn;

/// Positive integer overriding the default step ceiling.
pub const MAX_STEPS_ENV: &str = "AUTOPPIA_AFFINE_MAX_STEPS";

/// Path overriding the canonical tasks file.
pub const TASKS_FILE_ENV: &str = "AUTOPPIA_AFFINE_TASKS_FILE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    /// Step ceiling used when a request carries no `max_steps`.
    pub default_max_steps: u32,
    pub web_agent_id: String,
    pub honor_agent_done: bool,
    pub include_history: bool,
    /// Concurrent evaluations allowed on the blocking pool.
    pub worker_limit: usize,
    pub agent_timeout_secs: u64,
    /// Canonical tasks file.
    pub tasks_file: PathBuf,
    /// Root used for the sibling/nested evaluator checkout fallbacks.
    pub repo_root: PathBuf,
    /// Installed evaluator package root.
    pub iwa_root: Option<PathBuf>,
    /// Extra fallback task files, tried after the built-in ones.
    pub fallback_task_files: Vec<PathBuf>,
    pub evaluator: EvaluatorSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorSettings {
    pub request_timeout_secs: u64,
    pub max_wait_secs: f64,
}

impl Default for EvaluatorSettings {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            max_wait_secs: 5.0,
        }
    }
}

impl EvaluatorSettings {
    pub fn page_config(&self) -> PageEvaluatorConfig {
        PageEvaluatorConfig {
            request_timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
            max_wait: Duration::try_from_secs_f64(self.max_wait_secs).unwrap_or(Duration::ZERO),
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            default_max_steps: DEFAULT_MAX_STEPS,
            web_agent_id: DEFAULT_WEB_AGENT_ID.to_string(),
            honor_agent_done: true,
            include_history: false,
            worker_limit: 4,
            agent_timeout_secs: 60,
            tasks_file: PathBuf::from(DEFAULT_CANONICAL_PATH),
            repo_root: PathBuf::from("."),
            iwa_root: None,
            fallback_task_files: Vec::new(),
            evaluator: EvaluatorSettings::default(),
        }
    }
}

impl EnvConfig {
    /// Apply the process environment on top of `self`.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| env::var(key).ok())
    }

    /// Apply overrides read through `lookup`.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(MAX_STEPS_ENV) {
            self.default_max_steps = resolve_default_max_steps(Some(&raw), self.default_max_steps);
        }
        if let Some(path) = lookup(TASKS_FILE_ENV).filter(|value| !value.trim().is_empty()) {
            self.tasks_file = PathBuf::from(path.trim());
        }
        if let Some(root) = lookup(IWA_ROOT_ENV).filter(|value| !value.trim().is_empty()) {
            self.iwa_root = Some(PathBuf::from(root.trim()));
        }
        self
    }

    /// Loop options for a request, `max_steps` already validated.
    pub fn loop_options(&self, max_steps: Option<u32>) -> LoopOptions {
        LoopOptions::new()
            .max_steps(max_steps.unwrap_or(self.default_max_steps))
            .web_agent_id(self.web_agent_id.clone())
            .honor_agent_done(self.honor_agent_done)
            .include_history(self.include_history)
    }

    /// Catalogue over `tasks_file` with the standard fallback chain.
    pub fn task_catalog(&self) -> TaskCatalog {
        TaskCatalog::new(self.tasks_file.clone()).with_resolvers(default_resolvers(
            &self.repo_root,
            self.iwa_root.clone(),
            &self.fallback_task_files,
        ))
    }

    pub fn agent_timeout(&self) -> Duration {
        Duration::from_secs(self.agent_timeout_secs.max(1))
    }
}

/// Step ceiling from a raw environment value.
///
/// Missing, unparseable or non-positive values fall back to `default`.
pub fn resolve_default_max_steps(raw: Option<&str>, default: u32) -> u32 {
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return default;
    };
    match raw.parse::<i64>() {
        Ok(value) if value > 0 => u32::try_from(value).unwrap_or(u32::MAX),
        Ok(value) => {
            warn!(env = MAX_STEPS_ENV, value, default, "non-positive max steps ignored");
            default
        }
        Err(err) => {
            warn!(env = MAX_STEPS_ENV, raw, error = %err, default, "invalid max steps ignored");
            default
        }
    }
}
