//! Remove a file, a folder, or any node, restoring it from the trash on undo.

use super::base::{timed_delete, FsBase};
use crate::core::context::Context;
use crate::core::undoable::{PathSpec, Undoable};
use crate::models::node::NodeKind;
use crate::models::rollback::{Outcome, TimeInterval};
use crate::utils::path::normalize_path;
use crate::{Error, Result};
use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
enum RemoveState {
    Removed { path: String, interval: TimeInterval },
    Skipped(Outcome),
}

/// Node removal.
///
/// `kind` restricts which node type may be removed; a node of the wrong type
/// counts as not found. Non-recursive folder removal refuses folders that
/// contain anything besides ignored files.
pub struct NodeRemove {
    base: FsBase,
    path: PathSpec,
    kind: Option<NodeKind>,
    gracefully: bool,
    recursive: bool,
    state: Option<RemoveState>,
}

impl NodeRemove {
    fn with_kind(path: PathSpec, kind: Option<NodeKind>) -> Self {
        Self {
            base: FsBase::default(),
            path,
            kind,
            gracefully: false,
            recursive: false,
            state: None,
        }
    }

    /// Remove a file.
    pub fn file(path: impl Into<PathSpec>) -> Self {
        Self::with_kind(path.into(), Some(NodeKind::File))
    }

    /// Remove a folder.
    pub fn folder(path: impl Into<PathSpec>) -> Self {
        Self::with_kind(path.into(), Some(NodeKind::Folder))
    }

    /// Remove whatever node lives at `path`.
    pub fn node(path: impl Into<PathSpec>) -> Self {
        Self::with_kind(path.into(), None)
    }

    pub fn gracefully(mut self, gracefully: bool) -> Self {
        self.gracefully = gracefully;
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn ignoring(mut self, pattern: Regex) -> Self {
        self.base.set_ignored_files(pattern);
        self
    }

    /// Deletion interval recorded by the last run.
    pub fn interval(&self) -> Option<TimeInterval> {
        match self.state {
            Some(RemoveState::Removed { interval, .. }) => Some(interval),
            _ => None,
        }
    }

    /// Whether the last run skipped the removal.
    pub fn nothing_to_undo(&self) -> bool {
        matches!(self.state, Some(RemoveState::Skipped(_)))
    }

    fn label(&self) -> &'static str {
        match self.kind {
            Some(NodeKind::File) => "file remove",
            Some(NodeKind::Folder) => "folder remove",
            None => "node remove",
        }
    }

    fn skip(&mut self, outcome: Outcome) -> Result<Outcome> {
        self.state = Some(RemoveState::Skipped(outcome));
        Ok(outcome)
    }
}

fn not_found(ctx: &Context, path: &str, kind: Option<NodeKind>) -> Error {
    let message = match kind {
        Some(NodeKind::File) => ctx.t("File \"{0}\" could not be found.", &[path]),
        Some(NodeKind::Folder) => ctx.t("Folder \"{0}\" could not be found.", &[path]),
        None => ctx.t("\"{0}\" could not be found.", &[path]),
    };
    Error::NotFound {
        path: path.to_string(),
        message,
    }
}

impl Undoable for NodeRemove {
    fn initialize(&mut self, ctx: &Context) {
        self.base.initialize(ctx);
    }

    fn execute(&mut self) -> Result<Outcome> {
        let path = normalize_path(&self.path.resolve()?);
        if path.is_empty() {
            return Err(Error::RootNode);
        }
        let ctx = self.base.ctx(self.label())?.clone();

        let found = ctx.storage().node(&path)?;
        let matches = match (found, self.kind) {
            (None, _) => false,
            (Some(actual), Some(wanted)) => actual == wanted,
            (Some(_), None) => true,
        };
        if !matches {
            if self.gracefully {
                tracing::warn!("Nothing to remove at {}, skipping", path);
                return self.skip(Outcome::SkippedNotFound);
            }
            return Err(not_found(&ctx, &path, self.kind));
        }

        if found == Some(NodeKind::Folder) && !self.recursive {
            let entries = self.base.significant_entries(&ctx, &path)?;
            if !entries.is_empty() {
                if self.gracefully {
                    tracing::warn!(
                        "Folder {} is not empty ({} entries), skipping",
                        path,
                        entries.len()
                    );
                    return self.skip(Outcome::SkippedNonEmpty);
                }
                return Err(Error::NotEmpty {
                    message: ctx.t("Folder \"{0}\" is not empty.", &[&path]),
                    path,
                });
            }
        }

        let interval = timed_delete(&ctx, &path)?;
        tracing::debug!("Removed {}", path);
        self.state = Some(RemoveState::Removed { path, interval });
        Ok(Outcome::Done)
    }

    fn rollback(&mut self) -> Result<()> {
        let ctx = self.base.ctx(self.label())?;
        match self.state.take() {
            None | Some(RemoveState::Skipped(_)) => Ok(()),
            Some(RemoveState::Removed { path, interval }) => {
                ctx.storage().restore(&path, &interval)?;
                tracing::debug!("Restored {}", path);
                Ok(())
            }
        }
    }

    fn reset(&mut self) {
        self.state = None;
    }

    fn describe(&self) -> String {
        match self.kind {
            Some(kind) => format!("remove {} {}", kind, self.path),
            None => format!("remove {}", self.path),
        }
    }
}
