//! CLI command implementations.

pub mod check;
pub mod run;
pub mod trash;

use crate::models::config::Config;
use crate::services::local::LocalStorage;
use crate::Result;
use std::path::Path;

/// Open the local storage for a root directory, honouring the configured
/// trash directory.
pub(crate) fn open_storage(root: &Path, config: &Config) -> Result<LocalStorage> {
    match config.storage.trash_dir {
        Some(ref trash_dir) => LocalStorage::with_trash_dir(root, trash_dir),
        None => LocalStorage::new(root),
    }
}
