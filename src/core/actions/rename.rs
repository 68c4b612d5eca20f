//! Rename a file or folder.
//!
//! An empty source means "create the target", an empty target means "delete
//! the source"; both non-empty is a move.

use super::base::FsBase;
use super::remove::NodeRemove;
use crate::core::context::Context;
use crate::core::undoable::{PathSpec, Undoable};
use crate::models::node::NodeKind;
use crate::models::rollback::{Outcome, RenameUndo};
use crate::utils::path::{normalize_path, parent_path, path_components};
use crate::{Error, Result};

enum RenameState {
    Created { path: String },
    Moved { from: String, to: String },
    Removed(Box<NodeRemove>),
    Nothing,
}

/// File or folder rename.
pub struct Rename {
    base: FsBase,
    kind: NodeKind,
    from: PathSpec,
    to: PathSpec,
    gracefully: bool,
    mkdir: bool,
    state: Option<RenameState>,
}

impl Rename {
    fn with_kind(kind: NodeKind, from: PathSpec, to: PathSpec) -> Self {
        Self {
            base: FsBase::default(),
            kind,
            from,
            to,
            gracefully: false,
            mkdir: false,
            state: None,
        }
    }

    /// Rename a file. After a move, emptied ancestor folders of the source are
    /// pruned.
    pub fn file(from: impl Into<PathSpec>, to: impl Into<PathSpec>) -> Self {
        Self::with_kind(NodeKind::File, from.into(), to.into())
    }

    /// Rename a folder.
    pub fn folder(from: impl Into<PathSpec>, to: impl Into<PathSpec>) -> Self {
        Self::with_kind(NodeKind::Folder, from.into(), to.into())
    }

    /// Accept a missing source instead of failing.
    pub fn gracefully(mut self, gracefully: bool) -> Self {
        self.gracefully = gracefully;
        self
    }

    /// Create missing parent folders of the target.
    pub fn mkdir(mut self, mkdir: bool) -> Self {
        self.mkdir = mkdir;
        self
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Reverse operation selected by the last run.
    pub fn undo_action(&self) -> RenameUndo {
        match self.state {
            Some(RenameState::Created { .. }) => RenameUndo::Delete,
            Some(RenameState::Moved { .. }) => RenameUndo::Rename,
            Some(RenameState::Removed(ref remove)) if !remove.nothing_to_undo() => {
                RenameUndo::Restore
            }
            _ => RenameUndo::Nothing,
        }
    }

    fn label(&self) -> &'static str {
        match self.kind {
            NodeKind::File => "file rename",
            NodeKind::Folder => "folder rename",
        }
    }

    fn ensure_parent(&self, ctx: &Context, path: &str) -> Result<()> {
        if self.mkdir {
            let components = path_components(path);
            if let Some((_, parents)) = components.split_last() {
                ctx.storage().ensure_folder_chain(parents)?;
            }
        }
        Ok(())
    }

    fn create(&mut self, ctx: &Context, to: String) -> Result<Outcome> {
        if to.is_empty() {
            return Err(Error::RootNode);
        }
        let storage = ctx.storage();

        match storage.node(&to)? {
            Some(existing) if existing == self.kind && self.gracefully => {
                tracing::debug!("{} {} already exists, keeping it", self.kind, to);
                self.state = Some(RenameState::Nothing);
                return Ok(Outcome::Reused);
            }
            Some(_) => {
                return Err(Error::AlreadyExists {
                    message: ctx.t("\"{0}\" already exists.", &[&to]),
                    path: to,
                });
            }
            None => {}
        }

        self.ensure_parent(ctx, &to)?;
        match self.kind {
            NodeKind::Folder => storage.create_folder(&to)?,
            NodeKind::File => storage.create_file(&to, &[])?,
        }
        tracing::debug!("Created {} {}", self.kind, to);
        self.state = Some(RenameState::Created { path: to });
        Ok(Outcome::Done)
    }

    fn remove(&mut self, ctx: &Context, from: String) -> Result<Outcome> {
        let remove = match self.kind {
            NodeKind::File => NodeRemove::file(from),
            NodeKind::Folder => NodeRemove::folder(from).recursive(true),
        };
        let mut remove = Box::new(remove.gracefully(self.gracefully));
        remove.initialize(ctx);

        let outcome = remove.execute()?;
        self.state = Some(RenameState::Removed(remove));
        Ok(outcome)
    }

    fn rename(&mut self, ctx: &Context, from: String, to: String) -> Result<Outcome> {
        if from.is_empty() || to.is_empty() {
            return Err(Error::RootNode);
        }
        let storage = ctx.storage();

        if storage.node(&from)? != Some(self.kind) {
            if self.gracefully {
                tracing::warn!("{} {} not found, nothing to rename", self.kind, from);
                self.state = Some(RenameState::Nothing);
                return Ok(Outcome::SkippedNotFound);
            }
            return Err(Error::NotFound {
                message: ctx.t("\"{0}\" could not be found.", &[&from]),
                path: from,
            });
        }

        if from == to {
            self.state = Some(RenameState::Nothing);
            return Ok(Outcome::Unchanged);
        }

        self.ensure_parent(ctx, &to)?;
        storage.rename(&from, &to)?;
        tracing::debug!("Renamed {} -> {}", from, to);

        if self.kind == NodeKind::File {
            prune_empty_ancestors(ctx, &from);
        }

        self.state = Some(RenameState::Moved { from, to });
        Ok(Outcome::Done)
    }
}

/// Delete now-empty ancestors of `path`, stopping at the first non-empty one.
///
/// Best effort: failures are logged, and the pruned folders are not recorded
/// for rollback.
fn prune_empty_ancestors(ctx: &Context, path: &str) {
    let storage = ctx.storage();
    let mut folder = parent_path(path).to_string();

    while !path_components(&folder).is_empty() {
        match storage.list(&folder) {
            Ok(entries) if entries.is_empty() => {}
            Ok(_) => break,
            Err(e) => {
                tracing::debug!("Stopping ancestor cleanup at {}: {}", folder, e);
                break;
            }
        }
        if let Err(e) = storage.delete(&folder) {
            tracing::warn!("Could not remove empty folder {}: {}", folder, e);
            break;
        }
        tracing::debug!("Removed empty folder {}", folder);
        folder = parent_path(&folder).to_string();
    }
}

impl Undoable for Rename {
    fn initialize(&mut self, ctx: &Context) {
        self.base.initialize(ctx);
    }

    fn execute(&mut self) -> Result<Outcome> {
        let from = normalize_path(&self.from.resolve()?);
        let to = normalize_path(&self.to.resolve()?);
        let ctx = self.base.ctx(self.label())?.clone();

        match (from.is_empty(), to.is_empty()) {
            (true, true) => Err(Error::InvalidArgument(
                "rename needs a source or a target".to_string(),
            )),
            (true, false) => self.create(&ctx, to),
            (false, true) => self.remove(&ctx, from),
            (false, false) => self.rename(&ctx, from, to),
        }
    }

    fn rollback(&mut self) -> Result<()> {
        let ctx = self.base.ctx(self.label())?;
        let storage = ctx.storage();

        match self.state.take() {
            None | Some(RenameState::Nothing) => Ok(()),
            Some(RenameState::Created { path }) => {
                storage.delete(&path)?;
                tracing::debug!("Removed created {}", path);
                Ok(())
            }
            Some(RenameState::Removed(mut remove)) => remove.rollback(),
            Some(RenameState::Moved { from, to }) => {
                // Folders pruned after the move come back as new, empty folders.
                let components = path_components(&from);
                if let Some((_, parents)) = components.split_last() {
                    storage.ensure_folder_chain(parents)?;
                }
                storage.rename(&to, &from)?;
                tracing::debug!("Renamed back {} -> {}", to, from);
                Ok(())
            }
        }
    }

    fn reset(&mut self) {
        self.state = None;
    }

    fn describe(&self) -> String {
        format!("rename {} {} -> {}", self.kind, self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::clock::ManualClock;
    use crate::services::memory::MemoryStorage;
    use crate::services::storage::Storage;
    use std::sync::Arc;

    fn setup() -> (Arc<MemoryStorage>, Context) {
        let clock = Arc::new(ManualClock::at_timestamp(1_700_000_000));
        let storage = Arc::new(MemoryStorage::with_clock(clock.clone()));
        let ctx = Context::new(storage.clone()).with_clock(clock);
        (storage, ctx)
    }

    #[test]
    fn test_file_move_and_back() {
        let (storage, ctx) = setup();
        storage.ensure_folder("/in/2024").unwrap();
        storage.create_file("/in/2024/part.pdf", b"x").unwrap();
        storage.ensure_folder("/out").unwrap();

        let mut action = Rename::file("/in/2024/part.pdf", "/out/part.pdf");
        action.initialize(&ctx);
        assert_eq!(action.execute().unwrap(), Outcome::Done);
        assert_eq!(action.undo_action(), RenameUndo::Rename);
        assert_eq!(storage.read("/out/part.pdf"), Some(b"x".to_vec()));

        // Emptied source ancestors are pruned.
        assert!(!storage.exists("/in").unwrap());

        action.rollback().unwrap();
        assert_eq!(storage.read("/in/2024/part.pdf"), Some(b"x".to_vec()));
        assert!(!storage.exists("/out/part.pdf").unwrap());
    }

    #[test]
    fn test_pruning_stops_at_non_empty_folder() {
        let (storage, ctx) = setup();
        storage.ensure_folder("/in/a").unwrap();
        storage.create_file("/in/keep", b"").unwrap();
        storage.create_file("/in/a/x", b"").unwrap();

        let mut action = Rename::file("/in/a/x", "/x").mkdir(true);
        action.initialize(&ctx);
        action.execute().unwrap();

        assert!(!storage.exists("/in/a").unwrap());
        assert!(storage.exists("/in/keep").unwrap());
    }

    #[test]
    fn test_folder_move_needs_parent_unless_mkdir() {
        let (storage, ctx) = setup();
        storage.ensure_folder("/src").unwrap();

        let mut strict = Rename::folder("/src", "/deep/dst");
        strict.initialize(&ctx);
        assert!(strict.execute().unwrap_err().is_not_found());

        let mut action = Rename::folder("/src", "/deep/dst").mkdir(true);
        action.initialize(&ctx);
        action.execute().unwrap();
        assert_eq!(storage.node("/deep/dst").unwrap(), Some(NodeKind::Folder));
    }

    #[test]
    fn test_missing_source() {
        let (_, ctx) = setup();

        let mut strict = Rename::file("/nope", "/other");
        strict.initialize(&ctx);
        assert!(strict.execute().unwrap_err().is_not_found());

        let mut graceful = Rename::file("/nope", "/other").gracefully(true);
        graceful.initialize(&ctx);
        assert_eq!(graceful.execute().unwrap(), Outcome::SkippedNotFound);
        assert_eq!(graceful.undo_action(), RenameUndo::Nothing);
        graceful.rollback().unwrap();
    }

    #[test]
    fn test_empty_source_creates_target() {
        let (storage, ctx) = setup();
        let mut action = Rename::folder("", "/new/folder").mkdir(true);
        action.initialize(&ctx);
        action.execute().unwrap();
        assert_eq!(action.undo_action(), RenameUndo::Delete);
        assert!(storage.exists("/new/folder").unwrap());

        action.rollback().unwrap();
        assert!(!storage.exists("/new/folder").unwrap());
    }

    #[test]
    fn test_empty_target_deletes_source() {
        let (storage, ctx) = setup();
        storage.ensure_folder("/old/sub").unwrap();

        let mut action = Rename::folder("/old", "");
        action.initialize(&ctx);
        action.execute().unwrap();
        assert_eq!(action.undo_action(), RenameUndo::Restore);
        assert!(!storage.exists("/old").unwrap());

        action.rollback().unwrap();
        assert!(storage.exists("/old/sub").unwrap());
    }

    #[test]
    fn test_both_empty_is_invalid() {
        let (_, ctx) = setup();
        let mut action = Rename::file("", "");
        action.initialize(&ctx);
        assert!(matches!(action.execute(), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_deferred_names() {
        let (storage, ctx) = setup();
        storage.create_file("/a.txt", b"").unwrap();

        let mut action = Rename::file(
            PathSpec::deferred(|| Ok("/a.txt".to_string())),
            PathSpec::deferred(|| Ok("/b.txt".to_string())),
        );
        action.initialize(&ctx);
        action.execute().unwrap();
        assert!(storage.exists("/b.txt").unwrap());
        assert_eq!(action.describe(), "rename file <deferred> -> <deferred>");
    }
}
