use std::path::{Component, Path, PathBuf};

/// File name of the Autobooks task catalogue.
pub const TASKS_FILE_NAME: &str = "autoppia_books_tasks.json";

/// Canonical location, relative to the working directory.
pub const DEFAULT_CANONICAL_PATH: &str = "data/tasks/autoppia_books_tasks.json";

/// Where the evaluator repository caches benchmark tasks, relative to its root.
pub const IWA_TASKS_SUBDIR: &str = "data/outputs/benchmark/cache/tasks";

/// Environment variable naming the installed evaluator package root.
pub const IWA_ROOT_ENV: &str = "AUTOPPIA_IWA_ROOT";

/// One candidate location for the task file when the canonical copy is missing.
pub trait TaskFileResolver: Send + Sync {
    /// Human-readable name used in logs and in the not-found error.
    fn label(&self) -> String;

    /// Candidate path, or `None` when this resolver does not apply.
    fn candidate(&self) -> Option<PathBuf>;
}

/// A fixed candidate path.
#[derive(Debug, Clone)]
pub struct StaticPath {
    label: String,
    path: PathBuf,
}

impl StaticPath {
    pub fn new(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
        }
    }

    /// Catalogue inside an evaluator repository rooted at `root`.
    pub fn iwa_repo(label: impl Into<String>, root: &Path) -> Self {
        Self::new(label, root.join(IWA_TASKS_SUBDIR).join(TASKS_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TaskFileResolver for StaticPath {
    fn label(&self) -> String {
        format!("{} ({})", self.label, self.path.display())
    }

    fn candidate(&self) -> Option<PathBuf> {
        Some(self.path.clone())
    }
}

/// Search order used by the service:
/// 1. the installed evaluator package (`iwa_root`, usually from [`IWA_ROOT_ENV`]);
/// 2. a sibling `autoppia_iwa` checkout next to `repo_root`;
/// 3. an `autoppia_iwa` checkout nested inside `repo_root`;
/// 4. any `extra` paths from configuration.
pub fn default_resolvers(
    repo_root: &Path,
    iwa_root: Option<PathBuf>,
    extra: &[PathBuf],
) -> Vec<Box<dyn TaskFileResolver>> {
    let mut resolvers: Vec<Box<dyn TaskFileResolver>> = Vec::new();

    if let Some(root) = iwa_root {
        resolvers.push(Box::new(StaticPath::iwa_repo("installed autoppia_iwa", &root)));
    }

    resolvers.push(Box::new(StaticPath::iwa_repo(
        "sibling autoppia_iwa",
        &sibling_root(repo_root),
    )));
    resolvers.push(Box::new(StaticPath::iwa_repo(
        "nested autoppia_iwa",
        &repo_root.join("autoppia_iwa"),
    )));

    for (idx, path) in extra.iter().enumerate() {
        resolvers.push(Box::new(StaticPath::new(
            format!("configured fallback #{}", idx + 1),
            path.clone(),
        )));
    }

    resolvers
}

/// `autoppia_iwa` next to `repo_root`. Only a trailing normal component can
/// be stripped lexically; `.`, `..` and empty roots step up with `..`.
fn sibling_root(repo_root: &Path) -> PathBuf {
    match (repo_root.components().next_back(), repo_root.parent()) {
        (Some(Component::Normal(_)), Some(parent)) => parent.join("autoppia_iwa"),
        _ => repo_root.join("..").join("autoppia_iwa"),
    }
}
