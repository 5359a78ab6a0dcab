use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use action_primitives::BrowserAction;
use affine_core_types::{ScoreDetails, Snapshot, Task};
use agent_core::{ActRequest, AgentClient, AgentConnector, AgentError, AgentReply};
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use env_server::{router, EnvConfig, EnvState};
use serde_json::{json, Value};
use stateful_evaluator::{EvaluatorFactory, EvaluatorResult, StatefulEvaluator, StepOutcome};
use tempfile::TempDir;
use tower::ServiceExt;
use url::Url;

const TARGET: &str = "http://84.247.180.192:8001/books/book-original-002?seed=36";

/// Agent that navigates to [`TARGET`] on step 0 and then declares done.
struct DirectAgent;

impl AgentClient for DirectAgent {
    fn act(&self, request: &ActRequest) -> Result<AgentReply, AgentError> {
        Ok(AgentReply {
            actions: if request.step_index == 0 {
                vec![BrowserAction::navigate(TARGET)]
            } else {
                vec![]
            },
            done: true,
        })
    }
}

/// Agent that never proposes anything.
struct SilentAgent;

impl AgentClient for SilentAgent {
    fn act(&self, _request: &ActRequest) -> Result<AgentReply, AgentError> {
        Ok(AgentReply::empty())
    }
}

struct CountingConnector {
    silent: bool,
    connects: AtomicUsize,
}

impl CountingConnector {
    fn new(silent: bool) -> Arc<Self> {
        Arc::new(Self {
            silent,
            connects: AtomicUsize::new(0),
        })
    }

    fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

impl AgentConnector for CountingConnector {
    fn connect(&self, _endpoint: &Url) -> Result<Box<dyn AgentClient>, AgentError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.silent {
            Ok(Box::new(SilentAgent))
        } else {
            Ok(Box::new(DirectAgent))
        }
    }
}

/// Evaluator succeeding once the URL equals the first CheckUrlTest.
struct UrlEvaluator {
    target: Option<String>,
    current: String,
}

impl UrlEvaluator {
    fn outcome(&self) -> StepOutcome {
        let success = self.target.as_deref() == Some(self.current.as_str());
        StepOutcome {
            snapshot: Snapshot::new("<html></html>", self.current.clone()),
            score: ScoreDetails {
                raw_score: if success { 1.0 } else { 0.0 },
                success,
                tests_passed: u32::from(success),
                total_tests: 1,
            },
        }
    }
}

impl StatefulEvaluator for UrlEvaluator {
    fn reset(&mut self) -> EvaluatorResult<StepOutcome> {
        Ok(self.outcome())
    }

    fn step(&mut self, action: Option<&BrowserAction>) -> EvaluatorResult<StepOutcome> {
        if let Some(BrowserAction::Navigate { url }) = action {
            self.current = url.clone();
        }
        Ok(self.outcome())
    }

    fn close(&mut self) {}
}

struct UrlEvaluatorFactory;

impl EvaluatorFactory for UrlEvaluatorFactory {
    fn create(&self, task: &Task, _web_agent_id: &str) -> EvaluatorResult<Box<dyn StatefulEvaluator>> {
        Ok(Box::new(UrlEvaluator {
            target: task
                .tests
                .first()
                .and_then(|test| test["url"].as_str())
                .map(str::to_string),
            current: task.url.clone(),
        }))
    }
}

fn write_catalogue(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("data/tasks/autoppia_books_tasks.json");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        &path,
        json!({
            "tasks": [
                {
                    "id": "autobooks-demo-task-1",
                    "is_web_real": true,
                    "web_project_id": "autobooks",
                    "url": "http://84.247.180.192:8001/",
                    "prompt": "Open the detail page of the second original book.",
                    "tests": [{"type": "CheckUrlTest", "url": TARGET}]
                },
                {
                    "id": "autobooks-demo-task-2-invalid",
                    "is_web_real": true,
                    "web_project_id": "autobooks",
                    "url": "http://84.247.180.192:8001/",
                    "prompt": "Open a page that does not exist.",
                    "tests": [{"type": "CheckUrlTest", "url": "http://84.247.180.192:8001/books/missing"}]
                }
            ]
        })
        .to_string(),
    )
    .unwrap();
    path
}

fn app(dir: &TempDir, connector: Arc<CountingConnector>, config: EnvConfig) -> Router {
    let tasks_file = write_catalogue(dir);
    let config = EnvConfig {
        tasks_file,
        repo_root: dir.path().to_path_buf(),
        ..config
    };
    let state = EnvState::new(config)
        .with_connector(connector)
        .with_evaluator(Arc::new(UrlEvaluatorFactory));
    router(state)
}

async fn post_evaluate(app: Router, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/evaluate")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_is_ok() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, CountingConnector::new(false), EnvConfig::default());
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn evaluates_every_task_in_order() {
    let dir = TempDir::new().unwrap();
    let connector = CountingConnector::new(false);
    let app = app(&dir, connector.clone(), EnvConfig::default());

    let (status, body) = post_evaluate(
        app,
        json!({"model": "fixed", "base_url": "http://localhost:9000/act", "max_steps": 5}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["environment"], "autoppia_affine_env");
    assert_eq!(body["evaluated"], 2);
    assert_eq!(body["total_score"], 1.0);
    assert_eq!(body["success_rate"], 0.5);
    assert_eq!(body["details"][0]["task_id"], "autobooks-demo-task-1");
    assert_eq!(body["details"][0]["score"], 1.0);
    assert_eq!(body["details"][0]["success"], true);
    assert_eq!(body["details"][0]["steps"], 1);
    assert_eq!(body["details"][1]["task_id"], "autobooks-demo-task-2-invalid");
    assert_eq!(body["details"][1]["score"], 0.0);
    assert_eq!(connector.connects(), 1);
}

#[tokio::test]
async fn task_filter_selects_one() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, CountingConnector::new(false), EnvConfig::default());

    let (status, body) = post_evaluate(
        app,
        json!({"model": "fixed", "base_url": "http://localhost:9000", "task_id": "autobooks-demo-task-2-invalid"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["evaluated"], 1);
    assert_eq!(body["details"][0]["success"], false);
}

#[tokio::test]
async fn default_step_ceiling_comes_from_config() {
    let dir = TempDir::new().unwrap();
    let config = EnvConfig {
        default_max_steps: 3,
        ..EnvConfig::default()
    };
    let app = app(&dir, CountingConnector::new(true), config);

    let (status, body) = post_evaluate(
        app,
        json!({"model": "silent", "base_url": "http://localhost:9000/act", "task_id": "autobooks-demo-task-1"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["details"][0]["steps"], 3);
    assert_eq!(body["details"][0]["success"], false);
}

#[tokio::test]
async fn non_positive_max_steps_is_rejected_before_the_loop() {
    for max_steps in [0, -4] {
        let dir = TempDir::new().unwrap();
        let connector = CountingConnector::new(false);
        let app = app(&dir, connector.clone(), EnvConfig::default());

        let (status, body) = post_evaluate(
            app,
            json!({"model": "fixed", "base_url": "http://localhost:9000/act", "max_steps": max_steps}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "invalid_argument");
        assert_eq!(connector.connects(), 0);
    }
}

#[tokio::test]
async fn invalid_base_url_is_rejected() {
    let dir = TempDir::new().unwrap();
    let connector = CountingConnector::new(false);
    let app = app(&dir, connector.clone(), EnvConfig::default());

    let (status, body) = post_evaluate(app, json!({"model": "fixed", "base_url": "localhost"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].as_str().unwrap().contains("localhost"));
    assert_eq!(connector.connects(), 0);
}

#[tokio::test]
async fn malformed_body_uses_error_shape() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, CountingConnector::new(false), EnvConfig::default());

    let (status, body) = post_evaluate(app, json!({"model": "no-url"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_argument");
}

#[tokio::test]
async fn model_is_required() {
    let dir = TempDir::new().unwrap();
    let connector = CountingConnector::new(false);
    let app = app(&dir, connector.clone(), EnvConfig::default());

    let (status, body) = post_evaluate(app, json!({"base_url": "http://localhost:9000/act"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_argument");
    assert!(body["error"]["message"].as_str().unwrap().contains("model"));
    assert_eq!(connector.connects(), 0);
}

#[tokio::test]
async fn unknown_task_is_404_and_skips_the_loop() {
    let dir = TempDir::new().unwrap();
    let connector = CountingConnector::new(false);
    let app = app(&dir, connector.clone(), EnvConfig::default());

    let (status, body) = post_evaluate(
        app,
        json!({"model": "fixed", "base_url": "http://localhost:9000/act", "task_id": "nope"}),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
    assert_eq!(connector.connects(), 0);
}

#[tokio::test]
async fn missing_catalogue_is_500() {
    let dir = TempDir::new().unwrap();
    let config = EnvConfig {
        tasks_file: dir.path().join("absent/tasks.json"),
        repo_root: dir.path().join("repo"),
        ..EnvConfig::default()
    };
    let state = EnvState::new(config)
        .with_connector(CountingConnector::new(false))
        .with_evaluator(Arc::new(UrlEvaluatorFactory));

    let (status, body) = post_evaluate(
        router(state),
        json!({"model": "fixed", "base_url": "http://localhost:9000/act"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "catalog_error");
}

#[tokio::test]
async fn failed_fallback_copy_is_500() {
    let dir = TempDir::new().unwrap();
    let fallback = write_catalogue(&dir);
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();
    let config = EnvConfig {
        tasks_file: blocker.join("tasks.json"),
        repo_root: dir.path().join("repo"),
        fallback_task_files: vec![fallback],
        ..EnvConfig::default()
    };
    let connector = CountingConnector::new(false);
    let state = EnvState::new(config)
        .with_connector(connector.clone())
        .with_evaluator(Arc::new(UrlEvaluatorFactory));

    let (status, body) = post_evaluate(
        router(state),
        json!({"model": "fixed", "base_url": "http://localhost:9000/act"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "catalog_error");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .starts_with("failed to copy tasks file"));
    assert_eq!(connector.connects(), 0);
}
