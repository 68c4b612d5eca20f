//! Core business logic modules.

pub mod action;
pub mod actions;
pub mod context;
pub mod planner;
pub mod run_queue;
pub mod undoable;

pub use action::Action;
pub use context::Context;
pub use run_queue::UndoableRunQueue;
pub use undoable::{PathSpec, Undoable};
