//! Closed set of actions a run-queue can hold.

use super::actions::{FolderCreate, GenericUndoable, NodeRemove, Rename};
use super::context::Context;
use super::undoable::Undoable;
use crate::models::rollback::Outcome;
use crate::Result;

/// Any queueable action.
pub enum Action {
    FolderCreate(FolderCreate),
    Remove(NodeRemove),
    Rename(Rename),
    Generic(GenericUndoable),
}

impl Action {
    fn inner(&self) -> &dyn Undoable {
        match self {
            Action::FolderCreate(a) => a,
            Action::Remove(a) => a,
            Action::Rename(a) => a,
            Action::Generic(a) => a,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Undoable {
        match self {
            Action::FolderCreate(a) => a,
            Action::Remove(a) => a,
            Action::Rename(a) => a,
            Action::Generic(a) => a,
        }
    }
}

impl Undoable for Action {
    fn initialize(&mut self, ctx: &Context) {
        self.inner_mut().initialize(ctx)
    }

    fn execute(&mut self) -> Result<Outcome> {
        self.inner_mut().execute()
    }

    fn rollback(&mut self) -> Result<()> {
        self.inner_mut().rollback()
    }

    fn reset(&mut self) {
        self.inner_mut().reset()
    }

    fn describe(&self) -> String {
        self.inner().describe()
    }
}

impl From<FolderCreate> for Action {
    fn from(action: FolderCreate) -> Self {
        Action::FolderCreate(action)
    }
}

impl From<NodeRemove> for Action {
    fn from(action: NodeRemove) -> Self {
        Action::Remove(action)
    }
}

impl From<Rename> for Action {
    fn from(action: Rename) -> Self {
        Action::Rename(action)
    }
}

impl From<GenericUndoable> for Action {
    fn from(action: GenericUndoable) -> Self {
        Action::Generic(action)
    }
}
