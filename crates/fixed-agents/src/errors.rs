use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("invalid link pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("unknown policy '{0}' (expected direct, link-scan or idle)")]
    UnknownPolicy(String),
}
