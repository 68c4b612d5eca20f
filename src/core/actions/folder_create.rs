//! Create a folder, optionally reusing or moving aside whatever is in the way.

use super::base::FsBase;
use crate::core::context::Context;
use crate::core::undoable::{PathSpec, Undoable};
use crate::models::node::NodeKind;
use crate::models::rollback::Outcome;
use crate::utils::path::{normalize_path, path_components, renamed_name};
use crate::{Error, Result};
use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
enum CreateState {
    Created { path: String },
    Reused { path: String },
    /// A file blocked the path and was renamed to `aside`.
    MovedAside { path: String, aside: String },
}

/// Folder creation.
///
/// An existing empty folder (ignoring README-like files) is always reused.
/// With `gracefully`, a non-empty folder is reused as well and a blocking
/// file is renamed aside before the folder is created.
pub struct FolderCreate {
    base: FsBase,
    path: PathSpec,
    gracefully: bool,
    state: Option<CreateState>,
}

impl FolderCreate {
    pub fn new(path: impl Into<PathSpec>) -> Self {
        Self {
            base: FsBase::default(),
            path: path.into(),
            gracefully: false,
            state: None,
        }
    }

    pub fn gracefully(mut self, gracefully: bool) -> Self {
        self.gracefully = gracefully;
        self
    }

    /// Override the context's ignored-files pattern.
    pub fn ignoring(mut self, pattern: Regex) -> Self {
        self.base.set_ignored_files(pattern);
        self
    }

    /// Whether the last run reused an existing folder.
    pub fn reused_existing(&self) -> bool {
        matches!(self.state, Some(CreateState::Reused { .. }))
    }

    /// Where a blocking file was moved by the last run.
    pub fn renamed_aside(&self) -> Option<&str> {
        match self.state {
            Some(CreateState::MovedAside { ref aside, .. }) => Some(aside),
            _ => None,
        }
    }

    fn already_exists(ctx: &Context, path: &str, template: &str) -> Error {
        Error::AlreadyExists {
            path: path.to_string(),
            message: ctx.t(template, &[path]),
        }
    }
}

impl Undoable for FolderCreate {
    fn initialize(&mut self, ctx: &Context) {
        self.base.initialize(ctx);
    }

    fn execute(&mut self) -> Result<Outcome> {
        let path = normalize_path(&self.path.resolve()?);
        let ctx = self.base.ctx("folder create")?;
        let storage = ctx.storage();

        let components = path_components(&path);
        let Some((_, parents)) = components.split_last() else {
            return Err(Error::RootNode);
        };
        storage.ensure_folder_chain(parents)?;

        match storage.node(&path)? {
            None => {
                storage.create_folder(&path)?;
                tracing::debug!("Created folder {}", path);
                self.state = Some(CreateState::Created { path });
                Ok(Outcome::Done)
            }
            Some(NodeKind::Folder) => {
                let entries = self.base.significant_entries(ctx, &path)?;
                if !entries.is_empty() && !self.gracefully {
                    return Err(Self::already_exists(
                        ctx,
                        &path,
                        "Folder \"{0}\" already exists and is not empty.",
                    ));
                }
                tracing::debug!("Reusing existing folder {}", path);
                self.state = Some(CreateState::Reused { path });
                Ok(Outcome::Reused)
            }
            Some(NodeKind::File) => {
                if !self.gracefully {
                    return Err(Self::already_exists(
                        ctx,
                        &path,
                        "\"{0}\" already exists and is not a folder.",
                    ));
                }

                let aside = renamed_name(&path, ctx.clock().now().timestamp());
                storage.rename(&path, &aside)?;
                if let Err(e) = storage.create_folder(&path) {
                    if let Err(back) = storage.rename(&aside, &path) {
                        tracing::warn!("Could not move {} back to {}: {}", aside, path, back);
                    }
                    return Err(e);
                }

                tracing::info!("Moved file {} aside to {} to create a folder", path, aside);
                self.state = Some(CreateState::MovedAside { path, aside });
                Ok(Outcome::Done)
            }
        }
    }

    fn rollback(&mut self) -> Result<()> {
        let ctx = self.base.ctx("folder create")?;
        let storage = ctx.storage();

        match self.state.take() {
            None | Some(CreateState::Reused { .. }) => Ok(()),
            Some(CreateState::Created { path }) => {
                storage.delete(&path)?;
                tracing::debug!("Removed created folder {}", path);
                Ok(())
            }
            Some(CreateState::MovedAside { path, aside }) => {
                storage.delete(&path)?;
                storage.rename(&aside, &path)?;
                tracing::debug!("Removed folder {} and moved {} back", path, aside);
                Ok(())
            }
        }
    }

    fn reset(&mut self) {
        self.state = None;
    }

    fn describe(&self) -> String {
        format!("create folder {}", self.path)
    }
}
