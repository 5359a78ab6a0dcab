use std::sync::Arc;

use axum::extract::State;
use axum::http::Method;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, instrument};

use crate::policy::ActPolicy;
use crate::protocol::{ActResponse, StepRequest};

type SharedPolicy = Arc<dyn ActPolicy>;

/// `/act` and `/health` routes answering with `policy`.
pub fn router(policy: SharedPolicy) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/act", post(act_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers(Any),
        )
        .with_state(policy)
}

async fn health_handler() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

#[instrument(skip_all, fields(policy = policy.name(), task_id = %request.task_id, step = request.step_index))]
async fn act_handler(
    State(policy): State<SharedPolicy>,
    Json(request): Json<StepRequest>,
) -> Json<ActResponse> {
    let response = policy.decide(&request);
    debug!(actions = response.actions.len(), done = response.done, "policy decided");
    Json(response)
}
