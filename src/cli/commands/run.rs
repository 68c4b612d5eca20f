//! Run command implementation.
//!
//! Loads a plan, executes it as a run-queue against a local directory, and
//! rolls back completed actions when the run fails.

use super::open_storage;
use crate::core::context::Context;
use crate::core::planner;
use crate::core::run_queue::UndoableRunQueue;
use crate::models::config::Config;
use crate::Result;
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;

/// Options for the run command.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Continue after failures.
    pub gracefully: bool,
    /// Skip the rollback after a failed run.
    pub keep_on_failure: bool,
}

/// Execute a plan file. Returns whether every action succeeded.
pub fn run(plan_file: &Path, root: &Path, config: &Config, options: RunOptions) -> Result<bool> {
    println!("{}", "[RUN] Executing plan...".bold().cyan());
    println!();

    if !plan_file.exists() {
        return Err(crate::Error::not_found(plan_file.display().to_string()));
    }

    println!("[INFO] Loading plan: {}", plan_file.display());
    let plan = planner::load_plan(plan_file)?;
    let gracefully = options.gracefully || plan.gracefully;

    println!("  {} {}", "Root:".bold(), root.display());
    println!("  {} {}", "Actions:".bold(), plan.actions.len());
    println!("  {} {}", "Gracefully:".bold(), gracefully);
    println!();

    let storage = open_storage(root, config)?;
    let ctx = Context::from_config(Arc::new(storage), config)?;
    let mut queue = planner::build_queue(&plan, ctx)?;

    let succeeded = match queue.execute_actions(gracefully) {
        Ok(succeeded) => succeeded,
        Err(e) => {
            println!("{} {}", "[FAILED]".bold().red(), e);
            false
        }
    };

    let completed = queue.executed_actions();
    let mut rolled_back = false;
    if !succeeded && !options.keep_on_failure {
        println!("{}", "[UNDO] Rolling back completed actions...".bold().yellow());
        queue.execute_undo();
        rolled_back = true;
    }

    print_summary(&queue, &completed, rolled_back);
    Ok(succeeded)
}

/// Print run summary.
fn print_summary(queue: &UndoableRunQueue, completed: &[String], rolled_back: bool) {
    println!();
    println!("{}", "[Run Summary]".bold().green());
    println!("  {} {}", "Completed actions:".bold(), completed.len());
    for action in completed.iter().rev() {
        println!("    - {}", action);
    }
    println!(
        "  {} {}",
        "Failed actions:".bold(),
        queue.run_queue_exceptions().len()
    );
    if rolled_back {
        println!("  {} {}", "Rolled back:".bold(), completed.len());
    }

    if !queue.run_queue_exceptions().is_empty() {
        println!();
        println!("{}", "[Errors]".bold().red());
        for error in queue.run_queue_exceptions() {
            println!("  - {}", error);
        }
    }

    if !queue.undo_exceptions().is_empty() {
        println!();
        println!("{}", "[Undo Errors]".bold().red());
        for error in queue.undo_exceptions() {
            println!("  - {}", error);
        }
    }
}
