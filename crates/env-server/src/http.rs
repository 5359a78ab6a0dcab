use agent_core::{AgentError, LoopError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use task_catalog::CatalogError;
use tracing::error;

use crate::errors::EnvError;

/// Error body shared by every route: `{"error": {"code", "message"}}`.
#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl HttpError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_argument", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    pub fn internal(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, code, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }
}

impl From<EnvError> for HttpError {
    fn from(value: EnvError) -> Self {
        let message = value.to_string();
        match value {
            EnvError::InvalidRequest(_) => HttpError::invalid_argument(message),
            EnvError::Catalog(CatalogError::TaskNotFound(_)) => HttpError::not_found(message),
            EnvError::Catalog(_) => HttpError::internal("catalog_error", message),
            EnvError::Loop(LoopError::InvalidMaxSteps(_)) => HttpError::invalid_argument(message),
            EnvError::Loop(LoopError::Agent(AgentError::InvalidEndpoint { .. })) => {
                HttpError::invalid_argument(message)
            }
            EnvError::Loop(LoopError::Agent(_)) => HttpError::internal("agent_error", message),
            EnvError::Loop(LoopError::Evaluator(_)) => HttpError::internal("evaluator_error", message),
            EnvError::Worker(_) => HttpError::internal("internal", message),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(code = self.code, message = %self.message, "evaluation request failed");
        }
        let body = Json(json!({
            "error": {
                "code": self.code,
                "message": self.message,
            }
        }));
        (self.status, body).into_response()
    }
}
