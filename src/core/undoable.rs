//! The undoable contract.

use super::context::Context;
use crate::models::rollback::Outcome;
use crate::Result;
use std::fmt;

/// A reversible unit of work.
///
/// Lifecycle: `initialize` once, then any number of
/// `execute` / `rollback` / `reset` cycles. `rollback` reverses the most
/// recent successful `execute` and is only meaningful once per `execute`.
pub trait Undoable {
    /// Wire the collaborator services.
    fn initialize(&mut self, ctx: &Context);

    /// Perform the side effect and record what is needed to reverse it.
    fn execute(&mut self) -> Result<Outcome>;

    /// Reverse the effect of the last `execute`.
    fn rollback(&mut self) -> Result<()>;

    /// Forget rollback state so the action can run again.
    fn reset(&mut self);

    /// Short human-readable description for logs.
    fn describe(&self) -> String;
}

/// A path given either literally or computed right before execution.
pub enum PathSpec {
    Literal(String),
    Deferred(Box<dyn FnMut() -> Result<String>>),
}

impl PathSpec {
    pub fn deferred<F>(f: F) -> Self
    where
        F: FnMut() -> Result<String> + 'static,
    {
        PathSpec::Deferred(Box::new(f))
    }

    /// Produce the path. Deferred specs call their closure each time.
    pub fn resolve(&mut self) -> Result<String> {
        match self {
            PathSpec::Literal(path) => Ok(path.clone()),
            PathSpec::Deferred(f) => f(),
        }
    }
}

impl fmt::Display for PathSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSpec::Literal(path) => write!(f, "{}", path),
            PathSpec::Deferred(_) => write!(f, "<deferred>"),
        }
    }
}

impl fmt::Debug for PathSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSpec::Literal(path) => f.debug_tuple("Literal").field(path).finish(),
            PathSpec::Deferred(_) => f.write_str("Deferred"),
        }
    }
}

impl From<&str> for PathSpec {
    fn from(path: &str) -> Self {
        PathSpec::Literal(path.to_string())
    }
}

impl From<String> for PathSpec {
    fn from(path: String) -> Self {
        PathSpec::Literal(path)
    }
}
