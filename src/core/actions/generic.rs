//! Closure-backed action.

use crate::core::context::Context;
use crate::core::undoable::Undoable;
use crate::models::rollback::Outcome;
use crate::{Error, Result};
use std::any::Any;

type DoFn = Box<dyn FnMut() -> Result<Box<dyn Any>>>;
type UndoFn = Box<dyn FnMut(Box<dyn Any>) -> Result<()>>;

/// Wraps a do-closure and an optional undo-closure. The value returned by
/// the do-closure is handed to the undo-closure.
pub struct GenericUndoable {
    label: String,
    do_fn: DoFn,
    undo_fn: Option<UndoFn>,
    result: Option<Box<dyn Any>>,
}

impl GenericUndoable {
    pub fn new<T, D, U>(mut do_fn: D, undo_fn: Option<U>) -> Self
    where
        T: 'static,
        D: FnMut() -> Result<T> + 'static,
        U: FnMut(T) -> Result<()> + 'static,
    {
        let undo_fn = undo_fn.map(|mut undo| {
            Box::new(move |value: Box<dyn Any>| match value.downcast::<T>() {
                Ok(value) => undo(*value),
                Err(_) => Err(Error::other("closure action got a foreign result")),
            }) as UndoFn
        });

        Self {
            label: "closure".to_string(),
            do_fn: Box::new(move || do_fn().map(|value| Box::new(value) as Box<dyn Any>)),
            undo_fn,
            result: None,
        }
    }

    /// Closure action without undo.
    pub fn do_only<T, D>(do_fn: D) -> Self
    where
        T: 'static,
        D: FnMut() -> Result<T> + 'static,
    {
        Self::new::<T, D, fn(T) -> Result<()>>(do_fn, None)
    }

    /// Closure action with undo.
    pub fn with_undo<T, D, U>(do_fn: D, undo_fn: U) -> Self
    where
        T: 'static,
        D: FnMut() -> Result<T> + 'static,
        U: FnMut(T) -> Result<()> + 'static,
    {
        Self::new(do_fn, Some(undo_fn))
    }

    /// Set the description used in logs.
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

impl Undoable for GenericUndoable {
    fn initialize(&mut self, _ctx: &Context) {}

    fn execute(&mut self) -> Result<Outcome> {
        let value = (self.do_fn)()?;
        self.result = Some(value);
        Ok(Outcome::Done)
    }

    fn rollback(&mut self) -> Result<()> {
        match (self.undo_fn.as_mut(), self.result.take()) {
            (Some(undo), Some(value)) => undo(value),
            _ => Ok(()),
        }
    }

    fn reset(&mut self) {
        self.result = None;
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}
