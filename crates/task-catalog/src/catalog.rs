use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use affine_core_types::Task;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::errors::{CatalogError, CatalogResult};
use crate::resolver::TaskFileResolver;

/// On-disk layout of the catalogue file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskFile {
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// Loader for the canonical task file with ordered fallbacks.
pub struct TaskCatalog {
    canonical: PathBuf,
    resolvers: Vec<Box<dyn TaskFileResolver>>,
}

impl TaskCatalog {
    pub fn new(canonical: impl Into<PathBuf>) -> Self {
        Self {
            canonical: canonical.into(),
            resolvers: Vec::new(),
        }
    }

    pub fn with_resolver(mut self, resolver: impl TaskFileResolver + 'static) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }

    pub fn with_resolvers(mut self, resolvers: Vec<Box<dyn TaskFileResolver>>) -> Self {
        self.resolvers.extend(resolvers);
        self
    }

    pub fn canonical_path(&self) -> &Path {
        &self.canonical
    }

    /// Path of a readable catalogue, copying the first fallback hit into the
    /// canonical location when the canonical file is missing.
    pub fn resolve_path(&self) -> CatalogResult<PathBuf> {
        if self.canonical.exists() {
            return Ok(self.canonical.clone());
        }

        let mut searched = Vec::new();
        for resolver in &self.resolvers {
            let Some(candidate) = resolver.candidate() else {
                continue;
            };
            if !candidate.exists() {
                debug!(resolver = %resolver.label(), "tasks file candidate missing");
                searched.push(resolver.label());
                continue;
            }

            self.install_copy(&candidate)?;
            info!(
                from = %candidate.display(),
                to = %self.canonical.display(),
                "copied tasks file into canonical location"
            );
            return Ok(self.canonical.clone());
        }

        Err(CatalogError::NotFound {
            canonical: self.canonical.clone(),
            searched,
        })
    }

    /// Stage the copy next to the canonical file and rename it into place, so
    /// concurrent loaders see either no file or the complete one.
    fn install_copy(&self, source: &Path) -> CatalogResult<()> {
        let copy_err = |err: io::Error| CatalogError::Copy {
            from: source.to_path_buf(),
            to: self.canonical.clone(),
            source: err,
        };
        let parent = match self.canonical.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(copy_err)?;

        let mut staged = NamedTempFile::new_in(parent).map_err(copy_err)?;
        let mut reader = fs::File::open(source).map_err(copy_err)?;
        io::copy(&mut reader, staged.as_file_mut()).map_err(copy_err)?;
        let permissions = reader.metadata().map_err(copy_err)?.permissions();
        fs::set_permissions(staged.path(), permissions).map_err(copy_err)?;
        staged
            .persist(&self.canonical)
            .map_err(|err| copy_err(err.error))?;
        Ok(())
    }

    /// Every task in the catalogue, in file order.
    pub fn load_all(&self) -> CatalogResult<Vec<Task>> {
        let path = self.resolve_path()?;
        let raw = fs::read_to_string(&path).map_err(|source| CatalogError::Read {
            path: path.clone(),
            source,
        })?;
        let file: TaskFile = serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
            path: path.clone(),
            source,
        })?;

        if file.tasks.is_empty() {
            return Err(CatalogError::Empty(path));
        }

        let mut seen = HashSet::new();
        for task in &file.tasks {
            if !seen.insert(task.id.as_str()) {
                warn!(task_id = %task.id, path = %path.display(), "duplicate task id in catalogue");
            }
        }

        debug!(count = file.tasks.len(), path = %path.display(), "loaded task catalogue");
        Ok(file.tasks)
    }

    /// All tasks, or only those whose id equals `task_id`.
    pub fn select(&self, task_id: Option<&str>) -> CatalogResult<Vec<Task>> {
        let tasks = self.load_all()?;
        let Some(task_id) = task_id else {
            return Ok(tasks);
        };

        let selected: Vec<Task> = tasks.into_iter().filter(|task| task.id == task_id).collect();
        if selected.is_empty() {
            return Err(CatalogError::TaskNotFound(task_id.to_string()));
        }
        Ok(selected)
    }

    /// First task in the catalogue.
    pub fn load_first(&self) -> CatalogResult<Task> {
        let path = self.canonical.clone();
        self.load_all()?
            .into_iter()
            .next()
            .ok_or(CatalogError::Empty(path))
    }
}

impl std::fmt::Debug for TaskCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskCatalog")
            .field("canonical", &self.canonical)
            .field(
                "resolvers",
                &self.resolvers.iter().map(|r| r.label()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
