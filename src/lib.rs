//! Undoable
//!
//! A run-queue for multi-step file system operations: actions run in order,
//! and completed ones can be rolled back in reverse.

pub mod cli;
pub mod core;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use crate::core::{Action, Context, PathSpec, Undoable, UndoableRunQueue};
pub use error::{Error, Result};
