use std::path::PathBuf;

use thiserror::Error;

/// Errors emitted while resolving or loading the task catalogue.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Neither the canonical file nor any fallback candidate exists.
    #[error(
        "could not locate tasks file at {} or in any fallback location ({})",
        .canonical.display(),
        .searched.join(", ")
    )]
    NotFound {
        canonical: PathBuf,
        searched: Vec<String>,
    },

    /// A fallback was found but could not be copied into place.
    #[error("failed to copy tasks file from {} to {}: {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read tasks file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse tasks file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The file parsed but holds zero tasks.
    #[error("no tasks found in {}", .0.display())]
    Empty(PathBuf),

    /// A task-id filter matched nothing.
    #[error("task not found: {0}")]
    TaskNotFound(String),
}

impl CatalogError {
    /// Whether the error is about the requested task rather than the catalogue itself.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::TaskNotFound(_))
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
