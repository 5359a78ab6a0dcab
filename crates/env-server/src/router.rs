use axum::http::Method;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};

use crate::evaluate::evaluate_handler;
use crate::state::EnvState;

pub fn router(state: EnvState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/evaluate", post(evaluate_handler))
        .layer(cors_layer())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

async fn health_handler() -> Json<Value> {
    Json(json!({"status": "ok"}))
}
