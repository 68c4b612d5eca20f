//! Local directory storage.
//!
//! Storage paths are resolved below a root directory. Deleted nodes are moved
//! into a trash directory together with a JSON sidecar describing them, which
//! is what `restore` searches.

use super::clock::{Clock, SystemClock};
use super::storage::{select_trash_entry, Storage};
use crate::models::node::{NodeKind, TrashEntry};
use crate::models::rollback::TimeInterval;
use crate::utils::fs::{move_path, remove_path};
use crate::utils::path::{canonical_path, parent_path, path_components};
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;
use walkdir::WalkDir;

/// Name of the default trash directory below the root.
pub const DEFAULT_TRASH_DIR: &str = ".trash";

/// `Storage` backed by a directory on the host file system.
pub struct LocalStorage {
    root: PathBuf,
    trash_dir: PathBuf,
    clock: Arc<dyn Clock>,
}

impl LocalStorage {
    /// Create a storage rooted at `root` with the trash in `<root>/.trash`.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let trash_dir = root.join(DEFAULT_TRASH_DIR);
        Self::with_trash_dir(root, trash_dir)
    }

    /// Create a storage with an explicit trash directory.
    pub fn with_trash_dir(root: impl Into<PathBuf>, trash_dir: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(Error::not_found(root.display().to_string()));
        }
        let trash_dir = trash_dir.into();
        if root.starts_with(&trash_dir) {
            return Err(Error::InvalidArgument(format!(
                "Trash directory {} contains the storage root",
                trash_dir.display()
            )));
        }
        fs::create_dir_all(&trash_dir)?;

        Ok(Self {
            root,
            trash_dir,
            clock: Arc::new(SystemClock),
        })
    }

    /// Stamp deletions with the given clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn trash_dir(&self) -> &Path {
        &self.trash_dir
    }

    /// Host path of a storage path.
    ///
    /// `.` and `..` components are rejected so a path never leaves the root,
    /// and the trash directory is not addressable as a node.
    pub fn host_path(&self, path: &str) -> Result<PathBuf> {
        let mut host = self.root.clone();
        for component in path_components(path) {
            if component == "." || component == ".." {
                return Err(Error::InvalidArgument(format!(
                    "Relative component in storage path {}",
                    path
                )));
            }
            host.push(component);
        }

        if host.starts_with(&self.trash_dir) {
            return Err(Error::InvalidArgument(format!(
                "{} is inside the trash directory",
                path
            )));
        }
        Ok(host)
    }

    fn kind_of(host: &Path) -> Option<NodeKind> {
        fs::symlink_metadata(host).ok().map(|meta| {
            if meta.is_dir() {
                NodeKind::Folder
            } else {
                NodeKind::File
            }
        })
    }

    fn require_parent_folder(&self, path: &str) -> Result<()> {
        let parent = parent_path(path);
        match Self::kind_of(&self.host_path(parent)?) {
            Some(NodeKind::Folder) => Ok(()),
            _ => Err(Error::not_found(parent)),
        }
    }

    fn sidecar(&self, id: &str) -> PathBuf {
        self.trash_dir.join(format!("{}.json", id))
    }

    fn is_trash(&self, host: &Path) -> bool {
        host == self.trash_dir
    }
}

impl Storage for LocalStorage {
    fn node(&self, path: &str) -> Result<Option<NodeKind>> {
        Ok(Self::kind_of(&self.host_path(path)?))
    }

    fn list(&self, path: &str) -> Result<Vec<String>> {
        let host = self.host_path(path)?;
        if Self::kind_of(&host) != Some(NodeKind::Folder) {
            return Err(Error::not_found(canonical_path(path)));
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&host)? {
            let entry = entry?;
            if self.is_trash(&entry.path()) {
                continue;
            }
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        names.sort();
        Ok(names)
    }

    fn create_folder(&self, path: &str) -> Result<()> {
        let path = canonical_path(path);
        let host = self.host_path(&path)?;
        if Self::kind_of(&host).is_some() {
            return Err(Error::already_exists(path));
        }
        self.require_parent_folder(&path)?;

        fs::create_dir(&host)?;
        tracing::debug!("Created folder: {:?}", host);
        Ok(())
    }

    fn create_file(&self, path: &str, contents: &[u8]) -> Result<()> {
        let path = canonical_path(path);
        let host = self.host_path(&path)?;
        if Self::kind_of(&host).is_some() {
            return Err(Error::already_exists(path));
        }
        self.require_parent_folder(&path)?;

        fs::write(&host, contents)?;
        tracing::debug!("Created file: {:?}", host);
        Ok(())
    }

    fn ensure_folder_chain(&self, components: &[&str]) -> Result<()> {
        let mut current = String::new();
        for component in components {
            current = format!("{}/{}", current, component);
            let host = self.host_path(&current)?;
            match Self::kind_of(&host) {
                Some(NodeKind::Folder) => continue,
                Some(NodeKind::File) => return Err(Error::already_exists(current)),
                None => fs::create_dir(&host)?,
            }
        }
        Ok(())
    }

    fn rename(&self, from: &str, to: &str) -> Result<()> {
        let from = canonical_path(from);
        let to = canonical_path(to);
        if from.is_empty() || to.is_empty() {
            return Err(Error::RootNode);
        }

        let from_host = self.host_path(&from)?;
        let to_host = self.host_path(&to)?;
        if Self::kind_of(&from_host).is_none() {
            return Err(Error::not_found(from));
        }
        if Self::kind_of(&to_host).is_some() {
            return Err(Error::already_exists(to));
        }
        if to.starts_with(&format!("{}/", from)) {
            return Err(Error::InvalidArgument(format!(
                "Cannot move {} into itself",
                from
            )));
        }
        self.require_parent_folder(&to)?;

        move_path(&from_host, &to_host)?;
        tracing::debug!("Moved: {:?} -> {:?}", from_host, to_host);
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<()> {
        let path = canonical_path(path);
        if path.is_empty() {
            return Err(Error::RootNode);
        }
        let host = self.host_path(&path)?;
        let kind = Self::kind_of(&host).ok_or_else(|| Error::not_found(&path))?;

        let entry = TrashEntry {
            id: Uuid::new_v4().to_string(),
            original_path: path,
            kind,
            deleted_at: self.clock.now().timestamp(),
        };

        move_path(&host, &self.trash_dir.join(&entry.id))?;
        fs::write(self.sidecar(&entry.id), serde_json::to_string_pretty(&entry)?)?;

        tracing::debug!("Moved to trash: {:?} ({})", host, entry.id);
        Ok(())
    }

    fn restore(&self, path: &str, interval: &TimeInterval) -> Result<()> {
        let path = canonical_path(path);
        let entries = self.trash()?;
        let entry = select_trash_entry(&entries, &path, interval)
            .ok_or_else(|| Error::not_found(&path))?;

        let host = self.host_path(&path)?;
        if Self::kind_of(&host).is_some() {
            return Err(Error::already_exists(path));
        }
        self.require_parent_folder(&path)?;

        move_path(&self.trash_dir.join(&entry.id), &host)?;
        remove_path(&self.sidecar(&entry.id))?;

        tracing::debug!("Restored from trash: {:?} ({})", host, entry.id);
        Ok(())
    }

    fn trash(&self) -> Result<Vec<TrashEntry>> {
        let mut entries = Vec::new();
        for entry in WalkDir::new(&self.trash_dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| Error::Storage(e.to_string()))?;
            let is_sidecar = entry.file_type().is_file()
                && entry.path().extension().and_then(|e| e.to_str()) == Some("json");
            if !is_sidecar {
                continue;
            }

            let content = fs::read_to_string(entry.path())?;
            match serde_json::from_str::<TrashEntry>(&content) {
                Ok(trash_entry) => entries.push(trash_entry),
                Err(e) => tracing::warn!("Skipping unreadable trash entry {:?}: {}", entry.path(), e),
            }
        }
        entries.sort_by_key(|e| e.deleted_at);
        Ok(entries)
    }
}
