//! Run-queue executing undoable actions in order and rolling them back in
//! reverse.
//!
//! - Actions run strictly in registration order.
//! - Completed actions are kept most-recent-first; undo walks them in that
//!   order.
//! - Every action is always in exactly one container: pending or executed.

use super::action::Action;
use super::actions::GenericUndoable;
use super::context::Context;
use super::undoable::Undoable;
use crate::{Error, Result};
use std::collections::VecDeque;
use std::sync::Arc;

struct QueuedAction {
    /// Registration order.
    seq: u32,
    action: Action,
}

/// Queue of undoable actions.
pub struct UndoableRunQueue {
    ctx: Context,
    next_seq: u32,
    pending: VecDeque<QueuedAction>,
    /// Completed actions, most recent first. `None` until the first run.
    executed: Option<VecDeque<QueuedAction>>,
    run_errors: Vec<Arc<Error>>,
    undo_errors: Vec<Arc<Error>>,
}

impl UndoableRunQueue {
    pub fn new(ctx: Context) -> Self {
        Self {
            ctx,
            next_seq: 0,
            pending: VecDeque::new(),
            executed: None,
            run_errors: Vec::new(),
            undo_errors: Vec::new(),
        }
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Initialize an action with the queue's context and append it.
    pub fn register(&mut self, action: impl Into<Action>) -> &mut Self {
        let mut action = action.into();
        action.initialize(&self.ctx);

        self.next_seq += 1;
        tracing::debug!("Registered action #{}: {}", self.next_seq, action.describe());
        self.pending.push_back(QueuedAction {
            seq: self.next_seq,
            action,
        });
        self
    }

    /// Register a closure pair. The do-closure's result is passed to the
    /// undo-closure.
    pub fn register_closure<T, D, U>(&mut self, do_fn: D, undo_fn: U) -> &mut Self
    where
        T: 'static,
        D: FnMut() -> Result<T> + 'static,
        U: FnMut(T) -> Result<()> + 'static,
    {
        self.register(GenericUndoable::with_undo(do_fn, undo_fn))
    }

    /// Register a closure without undo.
    pub fn register_do<T, D>(&mut self, do_fn: D) -> &mut Self
    where
        T: 'static,
        D: FnMut() -> Result<T> + 'static,
    {
        self.register(GenericUndoable::do_only(do_fn))
    }

    /// Run all pending actions.
    ///
    /// Without `gracefully`, the first failure stops the run and is returned
    /// wrapped in `Error::RunQueue`; the failed action stays at the front of
    /// the pending queue. With `gracefully`, failures are collected, failed
    /// actions stay pending, and the remaining actions still run.
    ///
    /// Returns `Ok(true)` when no action failed. Nothing is rolled back here;
    /// call `execute_undo` for that.
    pub fn execute_actions(&mut self, gracefully: bool) -> Result<bool> {
        self.run_errors.clear();
        self.undo_errors.clear();

        let executed = self.executed.get_or_insert_with(VecDeque::new);
        let mut failed = VecDeque::new();
        let mut completed = 0;

        tracing::info!("Executing {} queued action(s)", self.pending.len());

        while let Some(mut entry) = self.pending.pop_front() {
            match entry.action.execute() {
                Ok(outcome) => {
                    tracing::debug!(
                        "Action #{} {}: {}",
                        entry.seq,
                        entry.action.describe(),
                        outcome
                    );
                    completed += 1;
                    executed.push_front(entry);
                }
                Err(e) => {
                    let e = Arc::new(e);
                    self.run_errors.push(e.clone());

                    if !gracefully {
                        tracing::error!(
                            "Action #{} {} failed after {} successful action(s): {}",
                            entry.seq,
                            entry.action.describe(),
                            completed,
                            e
                        );
                        self.pending.push_front(entry);
                        return Err(Error::RunQueue {
                            completed,
                            source: e,
                        });
                    }

                    tracing::warn!(
                        "Action #{} {} failed, continuing: {}",
                        entry.seq,
                        entry.action.describe(),
                        e
                    );
                    failed.push_back(entry);
                }
            }
        }

        self.pending = failed;

        tracing::info!(
            "Run finished: {} succeeded, {} failed",
            completed,
            self.run_errors.len()
        );
        Ok(self.run_errors.is_empty())
    }

    /// Roll back every completed action, most recent first.
    ///
    /// Failures are logged and collected, replacing those of a previous undo;
    /// the loop always drains the executed stack. Undone actions return to the
    /// pending queue. Returns `true` when every rollback succeeded.
    pub fn execute_undo(&mut self) -> bool {
        self.undo_errors.clear();

        let Some(executed) = self.executed.as_mut() else {
            return true;
        };

        tracing::info!("Undoing {} completed action(s)", executed.len());

        let mut undone = Vec::with_capacity(executed.len());
        let mut failures = 0;
        while let Some(mut entry) = executed.pop_front() {
            match entry.action.rollback() {
                Ok(()) => {
                    tracing::debug!("Undid action #{} {}", entry.seq, entry.action.describe());
                }
                Err(e) => {
                    tracing::warn!(
                        "Undo of action #{} {} failed: {}",
                        entry.seq,
                        entry.action.describe(),
                        e
                    );
                    self.undo_errors.push(Arc::new(e));
                    failures += 1;
                }
            }
            undone.push(entry);
        }

        self.return_to_pending(undone);
        failures == 0
    }

    /// Put every action back into the pending queue in registration order and
    /// clear its rollback state, so the queue can run again from scratch.
    pub fn reset(&mut self) {
        self.run_errors.clear();
        self.undo_errors.clear();

        let Some(executed) = self.executed.take() else {
            return;
        };

        self.return_to_pending(executed);
        for entry in self.pending.iter_mut() {
            entry.action.reset();
        }
    }

    /// Drop every action and all recorded errors.
    pub fn clear_action_queue(&mut self) {
        self.pending.clear();
        self.executed = None;
        self.run_errors.clear();
        self.undo_errors.clear();
    }

    fn return_to_pending(&mut self, entries: impl IntoIterator<Item = QueuedAction>) {
        let mut all: Vec<QueuedAction> = self.pending.drain(..).chain(entries).collect();
        all.sort_by_key(|entry| entry.seq);
        self.pending = all.into();
    }

    /// Number of pending actions.
    pub fn size(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.executed.as_ref().map_or(true, VecDeque::is_empty)
    }

    /// Whether the queue has been executed since creation or the last reset.
    pub fn active(&self) -> bool {
        self.executed.is_some()
    }

    /// Number of completed actions, `None` if the queue never ran.
    pub fn execution_count(&self) -> Option<usize> {
        self.executed.as_ref().map(VecDeque::len)
    }

    pub fn run_queue_exceptions(&self) -> &[Arc<Error>] {
        &self.run_errors
    }

    /// First failure of the last run.
    pub fn run_queue_exception(&self) -> Option<&Arc<Error>> {
        self.run_errors.first()
    }

    /// Failures of the last undo.
    pub fn undo_exceptions(&self) -> &[Arc<Error>] {
        &self.undo_errors
    }

    /// Descriptions of pending actions, in execution order.
    pub fn pending_actions(&self) -> Vec<String> {
        self.pending.iter().map(|e| e.action.describe()).collect()
    }

    /// Descriptions of completed actions, most recent first.
    pub fn executed_actions(&self) -> Vec<String> {
        self.executed
            .iter()
            .flatten()
            .map(|e| e.action.describe())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::memory::MemoryStorage;
    use std::cell::Cell;
    use std::rc::Rc;

    fn queue() -> UndoableRunQueue {
        UndoableRunQueue::new(Context::new(Arc::new(MemoryStorage::new())))
    }

    #[test]
    fn test_fresh_queue() {
        let queue = queue();
        assert_eq!(queue.size(), 0);
        assert!(!queue.active());
        assert_eq!(queue.execution_count(), None);
        assert!(queue.run_queue_exception().is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_empty_run() {
        let mut queue = queue();
        assert!(queue.execute_actions(false).unwrap());
        assert!(queue.active());
        assert_eq!(queue.execution_count(), Some(0));
        assert!(queue.execute_undo());
    }

    #[test]
    fn test_undo_before_run_is_noop() {
        let mut queue = queue();
        queue.register_do(|| Ok(()));
        assert!(queue.execute_undo());
        assert_eq!(queue.size(), 1);
        assert!(!queue.active());
    }

    #[test]
    fn test_clear_action_queue() {
        let mut queue = queue();
        queue.register_do(|| Ok(()));
        queue.register_do(|| -> Result<()> { Err(Error::other("x")) });
        let _ = queue.execute_actions(true);
        assert_eq!(queue.run_queue_exceptions().len(), 1);

        queue.clear_action_queue();
        assert_eq!(queue.size(), 0);
        assert!(!queue.active());
        assert!(queue.run_queue_exceptions().is_empty());
    }

    #[test]
    fn test_reset_clears_action_state() {
        let undone = Rc::new(Cell::new(0));
        let mut queue = queue();
        for _ in 0..2 {
            let counter = undone.clone();
            queue.register_closure(
                || Ok(()),
                move |_: ()| {
                    counter.set(counter.get() + 1);
                    Ok(())
                },
            );
        }

        queue.execute_actions(false).unwrap();
        queue.reset();

        // Every action forgot its do-result, so rolling back is a no-op.
        for entry in queue.pending.iter_mut() {
            entry.action.rollback().unwrap();
        }
        assert_eq!(undone.get(), 0);
    }

    #[test]
    fn test_undo_errors_cover_last_undo_only() {
        let fail = Rc::new(Cell::new(true));
        let mut queue = queue();
        let flag = fail.clone();
        queue.register_closure(
            || Ok(()),
            move |_: ()| {
                if flag.get() {
                    Err(Error::other("undo failed"))
                } else {
                    Ok(())
                }
            },
        );

        queue.execute_actions(false).unwrap();
        assert!(!queue.execute_undo());
        assert_eq!(queue.undo_exceptions().len(), 1);

        // A second undo without a run in between has nothing to roll back.
        assert!(queue.execute_undo());
        assert!(queue.undo_exceptions().is_empty());

        fail.set(false);
        queue.execute_actions(false).unwrap();
        assert!(queue.execute_undo());
        assert!(queue.undo_exceptions().is_empty());
    }

    #[test]
    fn test_descriptions() {
        let mut queue = queue();
        queue.register(GenericUndoable::do_only(|| Ok(())).labeled("first"));
        queue.register(GenericUndoable::do_only(|| Ok(())).labeled("second"));
        assert_eq!(queue.pending_actions(), vec!["first", "second"]);

        queue.execute_actions(false).unwrap();
        assert_eq!(queue.executed_actions(), vec!["second", "first"]);
        assert!(queue.pending_actions().is_empty());
    }
}
