//! Shared records for the Affine evaluation environment.
//!
//! Tasks come out of the catalogue, snapshots and scores come out of the
//! evaluator, and the detail/response records are what the service returns.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Name reported in every [`EvaluateResponse`].
pub const ENVIRONMENT_NAME: &str = "autoppia_affine_env";

/// A web-automation goal with its success tests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub is_web_real: bool,
    #[serde(deserialize_with = "string_or_number")]
    pub web_project_id: String,
    pub url: String,
    pub prompt: String,
    /// Success-test descriptors. Opaque here; only the evaluator interprets them.
    #[serde(default)]
    pub tests: Vec<Value>,
    #[serde(default = "empty_object")]
    pub relevant_data: Value,
}

impl Task {
    pub fn new(
        id: impl Into<String>,
        web_project_id: impl Into<String>,
        url: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            is_web_real: false,
            web_project_id: web_project_id.into(),
            url: url.into(),
            prompt: prompt.into(),
            tests: Vec::new(),
            relevant_data: empty_object(),
        }
    }

    pub fn with_tests(mut self, tests: Vec<Value>) -> Self {
        self.tests = tests;
        self
    }
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(value) => Ok(value),
        Value::Number(value) => Ok(value.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, found {}",
            other
        ))),
    }
}

/// Page state after a reset or step.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub html: Option<String>,
    pub url: Option<String>,
}

impl Snapshot {
    pub fn new(html: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            html: Some(html.into()),
            url: Some(url.into()),
        }
    }

    /// HTML to show the agent; empty when the page produced nothing.
    pub fn html_or_empty(&self) -> &str {
        self.html.as_deref().unwrap_or("")
    }

    /// Current URL, falling back to `fallback` when the snapshot has none.
    pub fn url_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.url.as_deref() {
            Some(url) if !url.is_empty() => url,
            _ => fallback,
        }
    }
}

/// Accumulated outcome of one task's evaluation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreDetails {
    pub raw_score: f64,
    pub success: bool,
    pub tests_passed: u32,
    pub total_tests: u32,
}

/// Per-task output of the evaluation loop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskEvaluationDetail {
    pub task_id: String,
    pub project_id: String,
    pub score: f64,
    pub raw_score: f64,
    pub success: bool,
    pub tests_passed: u32,
    pub total_tests: u32,
    pub steps: u32,
}

impl TaskEvaluationDetail {
    pub fn from_score(task: &Task, score: &ScoreDetails, steps: u32) -> Self {
        Self {
            task_id: task.id.clone(),
            project_id: task.web_project_id.clone(),
            score: score.raw_score,
            raw_score: score.raw_score,
            success: score.success,
            tests_passed: score.tests_passed,
            total_tests: score.total_tests,
            steps,
        }
    }
}

/// Aggregate over every task evaluated for one request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluateResponse {
    pub environment: String,
    /// Sum of per-task scores, not a mean.
    pub total_score: f64,
    pub success_rate: f64,
    pub evaluated: usize,
    pub details: Vec<TaskEvaluationDetail>,
}

impl EvaluateResponse {
    pub fn from_details(details: Vec<TaskEvaluationDetail>) -> Self {
        let total_score = details.iter().map(|detail| detail.score).sum();
        let successes = details.iter().filter(|detail| detail.success).count();
        let success_rate = if details.is_empty() {
            0.0
        } else {
            successes as f64 / details.len() as f64
        };

        Self {
            environment: ENVIRONMENT_NAME.to_string(),
            total_score,
            success_rate,
            evaluated: details.len(),
            details,
        }
    }
}
