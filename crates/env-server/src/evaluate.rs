use affine_core_types::EvaluateResponse;
use agent_core::{evaluate_tasks, resolve_act_endpoint};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, Span};
use uuid::Uuid;

use crate::errors::EnvError;
use crate::http::HttpError;
use crate::state::EnvState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateRequest {
    /// Display name of the agent under evaluation.
    pub model: String,
    /// Agent action endpoint, e.g. `http://host:9000/act`.
    pub base_url: String,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub max_steps: Option<i64>,
}

impl EvaluateRequest {
    /// Per-request step ceiling; non-positive values are rejected.
    fn validated_max_steps(&self) -> Result<Option<u32>, EnvError> {
        match self.max_steps {
            None => Ok(None),
            Some(steps) if steps <= 0 => Err(EnvError::invalid_request(format!(
                "max_steps must be a positive integer, got {steps}"
            ))),
            Some(steps) => u32::try_from(steps)
                .map(Some)
                .map_err(|_| EnvError::invalid_request(format!("max_steps too large: {steps}"))),
        }
    }
}

#[instrument(
    skip_all,
    fields(evaluation_id = %Uuid::new_v4(), model = tracing::field::Empty, task_id = tracing::field::Empty)
)]
pub(crate) async fn evaluate_handler(
    State(state): State<EnvState>,
    payload: Result<Json<EvaluateRequest>, JsonRejection>,
) -> Result<Json<EvaluateResponse>, HttpError> {
    let Json(request) = payload.map_err(|rejection| HttpError::invalid_argument(rejection.body_text()))?;
    let span = Span::current();
    span.record("model", request.model.as_str());
    if let Some(task_id) = request.task_id.as_deref() {
        span.record("task_id", task_id);
    }

    let max_steps = request.validated_max_steps()?;
    let endpoint = resolve_act_endpoint(&request.base_url).map_err(EnvError::from)?;
    let options = state.config.loop_options(max_steps);
    info!(endpoint = %endpoint, max_steps = options.max_steps, "evaluation requested");

    let permit = state
        .workers
        .clone()
        .acquire_owned()
        .await
        .map_err(|err| EnvError::Worker(err.to_string()))?;

    let task_id = request.task_id.clone();
    let job = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        span.in_scope(|| -> Result<EvaluateResponse, EnvError> {
            let tasks = state.catalog.select(task_id.as_deref())?;
            let response = evaluate_tasks(
                &tasks,
                state.connector.as_ref(),
                &endpoint,
                state.evaluator.as_ref(),
                &options,
            )?;
            Ok(response)
        })
    });

    let response = job
        .await
        .map_err(|err| EnvError::Worker(err.to_string()))??;
    Ok(Json(response))
}
