//! Evaluation service: `POST /evaluate` runs the step loop against a remote
//! agent, `GET /health` reports liveness.

pub mod config;
pub mod errors;
mod evaluate;
pub mod http;
mod router;
mod state;

pub use config::{resolve_default_max_steps, EnvConfig, EvaluatorSettings, MAX_STEPS_ENV, TASKS_FILE_ENV};
pub use errors::EnvError;
pub use evaluate::EvaluateRequest;
pub use http::HttpError;
pub use router::router;
pub use state::EnvState;
