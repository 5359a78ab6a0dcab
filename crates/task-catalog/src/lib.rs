//! Task catalogue for the Affine environment.
//!
//! Tasks live in one canonical JSON file. When that file is missing, an
//! explicit ordered list of [`TaskFileResolver`]s is searched and the first
//! hit is copied into the canonical location before loading.

mod catalog;
pub mod errors;
mod resolver;

pub use catalog::{TaskCatalog, TaskFile};
pub use errors::{CatalogError, CatalogResult};
pub use resolver::{
    default_resolvers, StaticPath, TaskFileResolver, DEFAULT_CANONICAL_PATH, IWA_ROOT_ENV,
    IWA_TASKS_SUBDIR, TASKS_FILE_NAME,
};
