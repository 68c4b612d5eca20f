//! File system actions and the closure adapter.

mod base;
pub mod folder_create;
pub mod generic;
pub mod remove;
pub mod rename;

pub use folder_create::FolderCreate;
pub use generic::GenericUndoable;
pub use remove::NodeRemove;
pub use rename::Rename;
