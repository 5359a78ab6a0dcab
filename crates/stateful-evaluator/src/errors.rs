use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvaluatorError {
    /// The task URL cannot seed a session.
    #[error("invalid task url '{url}': {source}")]
    InvalidTaskUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("task url '{url}' must use http or https, got '{scheme}'")]
    UnsupportedScheme { url: String, scheme: String },

    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("evaluator session already closed")]
    Closed,

    #[error("evaluator failure: {0}")]
    Other(String),
}

pub type EvaluatorResult<T> = Result<T, EvaluatorError>;
