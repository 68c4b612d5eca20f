//! In-memory storage.
//!
//! Keeps a tree of nodes, a trash, and a journal of every mutating call.
//! Used as a fake in tests and by callers that want to dry-run a queue.

use super::clock::{Clock, SystemClock};
use super::storage::{select_trash_entry, Storage};
use crate::models::node::{NodeKind, TrashEntry};
use crate::models::rollback::TimeInterval;
use crate::utils::path::{canonical_path, parent_path};
use crate::{Error, Result};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

/// A mutating call issued against a `MemoryStorage`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageCall {
    CreateFolder(String),
    CreateFile(String),
    EnsureFolderChain(String),
    Rename { from: String, to: String },
    Delete(String),
    Restore(String),
}

#[derive(Debug, Clone)]
enum MemNode {
    File(Vec<u8>),
    Folder,
}

impl MemNode {
    fn kind(&self) -> NodeKind {
        match self {
            MemNode::File(_) => NodeKind::File,
            MemNode::Folder => NodeKind::Folder,
        }
    }
}

#[derive(Debug)]
struct Trashed {
    entry: TrashEntry,
    /// Nodes keyed by path relative to the deleted node (`""` is the node itself).
    nodes: Vec<(String, MemNode)>,
}

#[derive(Debug, Default)]
struct Inner {
    nodes: BTreeMap<String, MemNode>,
    trash: Vec<Trashed>,
    journal: Vec<StorageCall>,
}

impl Inner {
    fn kind(&self, path: &str) -> Option<NodeKind> {
        if path.is_empty() {
            return Some(NodeKind::Folder);
        }
        self.nodes.get(path).map(MemNode::kind)
    }

    fn require_parent_folder(&self, path: &str) -> Result<()> {
        let parent = parent_path(path);
        match self.kind(parent) {
            Some(NodeKind::Folder) => Ok(()),
            _ => Err(Error::not_found(parent)),
        }
    }

    /// Keys of a node and all of its descendants.
    fn subtree_keys(&self, path: &str) -> Vec<String> {
        let prefix = format!("{}/", path);
        self.nodes
            .keys()
            .filter(|k| k.as_str() == path || k.starts_with(&prefix))
            .cloned()
            .collect()
    }
}

/// In-memory `Storage` implementation.
pub struct MemoryStorage {
    inner: Mutex<Inner>,
    clock: Arc<dyn Clock>,
}

impl MemoryStorage {
    /// Create an empty storage stamping deletions with the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty storage stamping deletions with the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Journal of mutating calls, in call order.
    pub fn calls(&self) -> Vec<StorageCall> {
        self.lock().journal.clone()
    }

    /// Paths passed to `delete`, in call order.
    pub fn deleted_paths(&self) -> Vec<String> {
        self.lock()
            .journal
            .iter()
            .filter_map(|c| match c {
                StorageCall::Delete(p) => Some(p.clone()),
                _ => None,
            })
            .collect()
    }

    /// Paths passed to `restore`, in call order.
    pub fn restored_paths(&self) -> Vec<String> {
        self.lock()
            .journal
            .iter()
            .filter_map(|c| match c {
                StorageCall::Restore(p) => Some(p.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        self.lock().journal.clear();
    }

    /// File contents, `None` for folders and missing nodes.
    pub fn read(&self, path: &str) -> Option<Vec<u8>> {
        match self.lock().nodes.get(&canonical_path(path)) {
            Some(MemNode::File(data)) => Some(data.clone()),
            _ => None,
        }
    }

    /// All node paths, sorted.
    pub fn paths(&self) -> Vec<String> {
        self.lock().nodes.keys().cloned().collect()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MemoryStorage {
    fn node(&self, path: &str) -> Result<Option<NodeKind>> {
        Ok(self.lock().kind(&canonical_path(path)))
    }

    fn list(&self, path: &str) -> Result<Vec<String>> {
        let path = canonical_path(path);
        let inner = self.lock();
        if inner.kind(&path) != Some(NodeKind::Folder) {
            return Err(Error::not_found(path));
        }

        let prefix = format!("{}/", path);
        Ok(inner
            .nodes
            .keys()
            .filter_map(|k| k.strip_prefix(&prefix))
            .filter(|rest| !rest.contains('/'))
            .map(str::to_string)
            .collect())
    }

    fn create_folder(&self, path: &str) -> Result<()> {
        let path = canonical_path(path);
        let mut inner = self.lock();
        inner.journal.push(StorageCall::CreateFolder(path.clone()));

        if inner.kind(&path).is_some() {
            return Err(Error::already_exists(path));
        }
        inner.require_parent_folder(&path)?;
        inner.nodes.insert(path, MemNode::Folder);
        Ok(())
    }

    fn create_file(&self, path: &str, contents: &[u8]) -> Result<()> {
        let path = canonical_path(path);
        let mut inner = self.lock();
        inner.journal.push(StorageCall::CreateFile(path.clone()));

        if inner.kind(&path).is_some() {
            return Err(Error::already_exists(path));
        }
        inner.require_parent_folder(&path)?;
        inner.nodes.insert(path, MemNode::File(contents.to_vec()));
        Ok(())
    }

    fn ensure_folder_chain(&self, components: &[&str]) -> Result<()> {
        let mut inner = self.lock();
        let mut current = String::new();
        for component in components {
            current = format!("{}/{}", current, component);
            match inner.kind(&current) {
                Some(NodeKind::Folder) => continue,
                Some(NodeKind::File) => return Err(Error::already_exists(current)),
                None => {
                    inner.nodes.insert(current.clone(), MemNode::Folder);
                }
            }
        }
        inner.journal.push(StorageCall::EnsureFolderChain(current));
        Ok(())
    }

    fn rename(&self, from: &str, to: &str) -> Result<()> {
        let from = canonical_path(from);
        let to = canonical_path(to);
        let mut inner = self.lock();
        inner.journal.push(StorageCall::Rename {
            from: from.clone(),
            to: to.clone(),
        });

        if from.is_empty() || to.is_empty() {
            return Err(Error::RootNode);
        }
        if inner.kind(&from).is_none() {
            return Err(Error::not_found(from));
        }
        if inner.kind(&to).is_some() {
            return Err(Error::already_exists(to));
        }
        if to.starts_with(&format!("{}/", from)) {
            return Err(Error::InvalidArgument(format!(
                "Cannot move {} into itself",
                from
            )));
        }
        inner.require_parent_folder(&to)?;

        for key in inner.subtree_keys(&from) {
            if let Some(node) = inner.nodes.remove(&key) {
                let moved = format!("{}{}", to, &key[from.len()..]);
                inner.nodes.insert(moved, node);
            }
        }
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<()> {
        let path = canonical_path(path);
        let deleted_at = self.clock.now().timestamp();
        let mut inner = self.lock();
        inner.journal.push(StorageCall::Delete(path.clone()));

        if path.is_empty() {
            return Err(Error::RootNode);
        }
        let kind = inner.kind(&path).ok_or_else(|| Error::not_found(&path))?;

        let mut nodes = Vec::new();
        for key in inner.subtree_keys(&path) {
            if let Some(node) = inner.nodes.remove(&key) {
                nodes.push((key[path.len()..].to_string(), node));
            }
        }

        inner.trash.push(Trashed {
            entry: TrashEntry {
                id: Uuid::new_v4().to_string(),
                original_path: path,
                kind,
                deleted_at,
            },
            nodes,
        });
        Ok(())
    }

    fn restore(&self, path: &str, interval: &TimeInterval) -> Result<()> {
        let path = canonical_path(path);
        let mut inner = self.lock();
        inner.journal.push(StorageCall::Restore(path.clone()));

        let entries: Vec<TrashEntry> = inner.trash.iter().map(|t| t.entry.clone()).collect();
        let id = select_trash_entry(&entries, &path, interval)
            .map(|e| e.id.clone())
            .ok_or_else(|| Error::not_found(&path))?;

        if inner.kind(&path).is_some() {
            return Err(Error::already_exists(path));
        }
        inner.require_parent_folder(&path)?;

        let idx = inner
            .trash
            .iter()
            .position(|t| t.entry.id == id)
            .ok_or_else(|| Error::not_found(&path))?;
        let trashed = inner.trash.remove(idx);
        for (relative, node) in trashed.nodes {
            inner.nodes.insert(format!("{}{}", path, relative), node);
        }
        Ok(())
    }

    fn trash(&self) -> Result<Vec<TrashEntry>> {
        Ok(self.lock().trash.iter().map(|t| t.entry.clone()).collect())
    }
}
