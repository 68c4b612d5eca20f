//! Storage accessor.
//!
//! All paths are `/`-separated storage paths. Implementations normalize them,
//! so `"a/b"`, `"/a/b"` and `"/a//b/"` address the same node; `""` is the root.

use crate::models::node::{NodeKind, TrashEntry};
use crate::models::rollback::TimeInterval;
use crate::utils::path::path_components;
use crate::Result;

/// File system operations the actions rely on.
pub trait Storage: Send + Sync {
    /// Kind of the node at `path`, `None` when absent.
    fn node(&self, path: &str) -> Result<Option<NodeKind>>;

    /// Names of the children of a folder.
    fn list(&self, path: &str) -> Result<Vec<String>>;

    /// Create a folder. The parent must exist.
    fn create_folder(&self, path: &str) -> Result<()>;

    /// Create a file. The parent must exist.
    fn create_file(&self, path: &str, contents: &[u8]) -> Result<()>;

    /// Create every folder along `components`, starting at the root.
    fn ensure_folder_chain(&self, components: &[&str]) -> Result<()>;

    /// Move a node. The target must not exist, its parent must.
    fn rename(&self, from: &str, to: &str) -> Result<()>;

    /// Delete a node, keeping it in the trash.
    fn delete(&self, path: &str) -> Result<()>;

    /// Restore the newest trash entry for `path` deleted within `interval`.
    fn restore(&self, path: &str, interval: &TimeInterval) -> Result<()>;

    /// Current trash entries.
    fn trash(&self) -> Result<Vec<TrashEntry>>;

    /// Create a folder and all missing ancestors.
    fn ensure_folder(&self, path: &str) -> Result<()> {
        self.ensure_folder_chain(&path_components(path))
    }

    fn exists(&self, path: &str) -> Result<bool> {
        Ok(self.node(path)?.is_some())
    }
}

/// Pick the newest trash entry matching a path and interval.
pub fn select_trash_entry<'a>(
    entries: &'a [TrashEntry],
    path: &str,
    interval: &TimeInterval,
) -> Option<&'a TrashEntry> {
    entries
        .iter()
        .filter(|e| e.original_path == path && interval.contains_secs(e.deleted_at))
        .max_by_key(|e| e.deleted_at)
}
